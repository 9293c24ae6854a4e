//! Stateful game controller wrapping `Position`.
//!
//! `Game` owns the move log and result, validates and applies moves, and
//! re-derives terminal state after every ply. It is the type the UI and
//! transport layers interact with.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::engine::board::{MoveRecord, Position};
use crate::engine::movegen;
use crate::engine::setup;
use crate::engine::types::{
    ChessError, Color, DrawReason, GameResult, GameStatus, Move, Square, WinReason,
};

/// A complete Chess960 game: position, history, status, and metadata.
#[derive(Clone, Debug)]
pub struct Game {
    // Core state
    position: Position,
    history: Vec<MoveRecord>,
    status: GameStatus,

    // Metadata
    pub id: Uuid,
    pub white_player: String,
    pub black_player: String,
    pub created_at: DateTime<Utc>,
    starting_fen: String,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Start a new game from a freshly generated Chess960 position.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_position(setup::start_position(rng))
    }

    /// Start a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    fn from_position(position: Position) -> Self {
        let starting_fen = position.to_fen();
        let mut game = Game {
            position,
            history: Vec::new(),
            status: GameStatus::Active,
            id: Uuid::new_v4(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
            starting_fen,
        };
        game.status = game.compute_status();
        game
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Applied-move history, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Final result, if the game has ended.
    pub fn result(&self) -> Option<GameResult> {
        match self.status {
            GameStatus::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// The FEN this game started from.
    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    /// Half-move clock (plies since the last pawn move or capture).
    pub fn halfmove_clock(&self) -> u16 {
        self.position.halfmove_clock
    }

    /// Full-move number.
    pub fn fullmove_number(&self) -> u16 {
        self.position.fullmove_number
    }

    // -----------------------------------------------------------------
    // Move queries
    // -----------------------------------------------------------------

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.position)
    }

    /// Legal moves from a specific square.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        movegen::legal_moves_from(&self.position, from)
    }

    /// Legal destination squares from one square — the query shape a UI
    /// needs for highlighting.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        self.legal_moves_from(from).into_iter().map(|m| m.to).collect()
    }

    // -----------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------

    /// Validate and apply a move, returning its record.
    ///
    /// All-or-nothing: validation happens before any state is touched, so a
    /// rejected move leaves the game exactly as it was. `IllegalMove`
    /// covers empty from-squares, opponent pieces, and self-check moves
    /// alike — anything not in the legal set.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveRecord, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }

        let mv = movegen::legal_moves_from(&self.position, from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(ChessError::IllegalMove { from, to })?;

        let record = self.position.apply_move(mv);
        self.history.push(record.clone());
        self.status = self.compute_status();

        tracing::debug!(game = %self.id, mv = %record, status = %self.status, "applied move");
        if let GameStatus::Finished(result) = self.status {
            tracing::info!(game = %self.id, result = %result, "game over");
        }

        Ok(record)
    }

    // -----------------------------------------------------------------
    // External decisions
    // -----------------------------------------------------------------

    /// Record a resignation. An external decision — the engine never infers
    /// it from the position.
    pub fn resign(&mut self, loser: Color) -> Result<(), ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }
        self.status = GameStatus::Finished(GameResult::Win {
            winner: !loser,
            reason: WinReason::Resignation,
        });
        tracing::info!(game = %self.id, loser = %loser, "resignation");
        Ok(())
    }

    /// Record a draw agreed between the players.
    pub fn agree_draw(&mut self) -> Result<(), ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }
        self.status = GameStatus::Finished(GameResult::Draw(DrawReason::Agreement));
        tracing::info!(game = %self.id, "draw agreed");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Terminal-state evaluation
    // -----------------------------------------------------------------

    /// Derive the status for the side about to move, in fixed order:
    /// checkmate, stalemate, fifty-move draw.
    fn compute_status(&self) -> GameStatus {
        let to_move = self.position.side_to_move;
        let in_check = self.position.is_in_check(to_move);

        if movegen::legal_moves(&self.position).is_empty() {
            return if in_check {
                GameStatus::Finished(GameResult::Win {
                    winner: !to_move,
                    reason: WinReason::Checkmate,
                })
            } else {
                GameStatus::Finished(GameResult::Draw(DrawReason::Stalemate))
            };
        }

        if self.position.halfmove_clock >= 100 {
            return GameStatus::Finished(GameResult::Draw(DrawReason::FiftyMoveRule));
        }

        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
