//! Transport-facing move payloads.
//!
//! The relay between two clients carries only the from/to squares in
//! algebraic notation; there is no promotion field because promotion is
//! forced to queen. Inbound payloads are re-validated in full by the
//! session layer — the wire format proves nothing about legality.

use serde::{Deserialize, Serialize};

use crate::engine::board::MoveRecord;
use crate::engine::types::{ChessError, Square};

/// Wire payload for one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub from_square: String,
    pub to_square: String,
}

impl MovePayload {
    pub fn new(from: Square, to: Square) -> Self {
        MovePayload {
            from_square: from.to_algebraic(),
            to_square: to.to_algebraic(),
        }
    }

    /// Payload announcing a move this side just applied.
    pub fn from_record(record: &MoveRecord) -> Self {
        MovePayload::new(record.from, record.to)
    }

    /// Parse both squares, rejecting malformed notation.
    pub fn squares(&self) -> Result<(Square, Square), ChessError> {
        let from = Square::from_algebraic(&self.from_square)
            .ok_or_else(|| ChessError::InvalidSquare(self.from_square.clone()))?;
        let to = Square::from_algebraic(&self.to_square)
            .ok_or_else(|| ChessError::InvalidSquare(self.to_square.clone()))?;
        Ok((from, to))
    }
}

// =========================================================================
// Tests
// =========================================================================
