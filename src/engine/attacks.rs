//! Attack detection — the single shared oracle behind the legality filter
//! and castling path-safety checks.
//!
//! `is_attacked` scans the board for pieces of the attacking color and tests
//! whether each piece's *attack pattern* covers the queried square: pawns
//! attack diagonally forward regardless of what occupies the target, the
//! king pattern excludes castling, and sliders ray-cast until blocked.
//! Knight/king/pawn offsets are expanded once (via `OnceLock`) into tables
//! that live for the lifetime of the process.

use std::sync::OnceLock;

use crate::engine::board::Position;
use crate::engine::types::{Color, PieceKind, Square};

/// Orthogonal ray directions as (file_delta, rank_delta).
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Diagonal ray directions.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// The eight knight jumps.
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// The eight king steps.
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

// =========================================================================
// Public API
// =========================================================================

/// Get a reference to the global leaper tables.
pub fn tables() -> &'static LeaperTables {
    static TABLES: OnceLock<LeaperTables> = OnceLock::new();
    TABLES.get_or_init(LeaperTables::init)
}

/// Is `target` attacked by any piece of color `by`?
pub fn is_attacked(pos: &Position, target: Square, by: Color) -> bool {
    let t = tables();
    for (sq, piece) in pos.pieces_of(by) {
        let hits = match piece.kind {
            PieceKind::Pawn => t.pawn_targets(by, sq).contains(&target),
            PieceKind::Knight => t.knight_targets(sq).contains(&target),
            PieceKind::King => t.king_targets(sq).contains(&target),
            PieceKind::Bishop => ray_reaches(pos, sq, &BISHOP_DIRECTIONS, target),
            PieceKind::Rook => ray_reaches(pos, sq, &ROOK_DIRECTIONS, target),
            PieceKind::Queen => {
                ray_reaches(pos, sq, &BISHOP_DIRECTIONS, target)
                    || ray_reaches(pos, sq, &ROOK_DIRECTIONS, target)
            }
        };
        if hits {
            return true;
        }
    }
    false
}

/// Walk rays from `from`; true if `target` is reached before any blocker.
fn ray_reaches(pos: &Position, from: Square, directions: &[(i8, i8)], target: Square) -> bool {
    for &(df, dr) in directions {
        let mut sq = from;
        while let Some(next) = sq.offset(df, dr) {
            if next == target {
                return true;
            }
            if pos.piece_at(next).is_some() {
                break;
            }
            sq = next;
        }
    }
    false
}

// =========================================================================
// Leaper tables
// =========================================================================

/// Pre-expanded target squares for the non-sliding attack patterns.
pub struct LeaperTables {
    knight: [Vec<Square>; 64],
    king: [Vec<Square>; 64],
    /// `pawn[color][square]` — squares a pawn on `square` attacks.
    pawn: [[Vec<Square>; 64]; 2],
}

impl LeaperTables {
    /// Knight attacks from a square.
    #[inline]
    pub fn knight_targets(&self, sq: Square) -> &[Square] {
        &self.knight[sq.0 as usize]
    }

    /// King attacks from a square (castling excluded).
    #[inline]
    pub fn king_targets(&self, sq: Square) -> &[Square] {
        &self.king[sq.0 as usize]
    }

    /// Pawn attack squares for a given color.
    #[inline]
    pub fn pawn_targets(&self, color: Color, sq: Square) -> &[Square] {
        &self.pawn[color.index()][sq.0 as usize]
    }

    fn init() -> Self {
        let knight: [Vec<Square>; 64] =
            std::array::from_fn(|i| expand(Square(i as u8), &KNIGHT_JUMPS));
        let king: [Vec<Square>; 64] =
            std::array::from_fn(|i| expand(Square(i as u8), &KING_STEPS));
        let pawn: [[Vec<Square>; 64]; 2] = [
            std::array::from_fn(|i| expand(Square(i as u8), &[(-1, 1), (1, 1)])),
            std::array::from_fn(|i| expand(Square(i as u8), &[(-1, -1), (1, -1)])),
        ];
        LeaperTables { knight, king, pawn }
    }
}

/// On-board squares reached by applying each delta once.
fn expand(sq: Square, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .filter_map(|&(df, dr)| sq.offset(df, dr))
        .collect()
}

// =========================================================================
// Tests
// =========================================================================
