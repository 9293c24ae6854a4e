//! Chess960 (Fischer random chess) rules engine.
//!
//! The crate is a pure, synchronous rules engine: it generates random legal
//! Chess960 start positions, answers move-legality queries, applies moves
//! atomically, and derives terminal state (checkmate, stalemate, fifty-move
//! draw). Rendering and networking live in separate layers that consume the
//! [`session`] and [`relay`] boundary types.

pub mod engine;
pub mod relay;
pub mod session;

pub use engine::board::{CastlingDetail, MoveRecord, Position};
pub use engine::game::Game;
pub use engine::types::{
    CastleSide, CastlingRights, ChessError, Color, DrawReason, GameResult, GameStatus, Move,
    MoveFlags, Piece, PieceKind, Square, WinReason,
};
pub use relay::MovePayload;
pub use session::{GameSession, SharedSession};
