//! Single-owner access to a live game.
//!
//! The engine is synchronous and a position must never be mutated from two
//! call sites at once — a UI-driven move and a relayed remote move arriving
//! together would race. A `GameSession` therefore owns the `Game` behind a
//! mutex and funnels every mutation, local or remote, through the same
//! validated entry point.

use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::engine::board::MoveRecord;
use crate::engine::game::Game;
use crate::engine::types::{ChessError, Color, GameResult, GameStatus, Square};
use crate::relay::MovePayload;

/// Shared handle to a session, cloneable across UI and transport threads.
pub type SharedSession = Arc<GameSession>;

/// Serializes all access to one `Game`.
pub struct GameSession {
    game: Mutex<Game>,
}

impl GameSession {
    /// Wrap a game in a shared session.
    pub fn new(game: Game) -> SharedSession {
        Arc::new(GameSession {
            game: Mutex::new(game),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().expect("game session poisoned")
    }

    /// Game id, for routing transport payloads.
    pub fn id(&self) -> Uuid {
        self.lock().id
    }

    /// Run a read-only query against the game.
    pub fn with_game<T>(&self, f: impl FnOnce(&Game) -> T) -> T {
        f(&self.lock())
    }

    /// Apply a local move.
    pub fn apply_move(&self, from: Square, to: Square) -> Result<MoveRecord, ChessError> {
        self.lock().apply_move(from, to)
    }

    /// Apply a move received from the transport.
    ///
    /// The payload gets exactly the validation a local move gets — a remote
    /// peer is never trusted to have pre-validated anything.
    pub fn apply_remote(&self, payload: &MovePayload) -> Result<MoveRecord, ChessError> {
        let (from, to) = payload.squares()?;
        self.lock().apply_move(from, to)
    }

    /// Legal destination squares from one square.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        self.lock().legal_targets(from)
    }

    /// Current position as FEN.
    pub fn fen(&self) -> String {
        self.lock().to_fen()
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.lock().status()
    }

    /// Whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.lock().is_game_over()
    }

    /// Final result, if the game has ended.
    pub fn result(&self) -> Option<GameResult> {
        self.lock().result()
    }

    /// Record a resignation.
    pub fn resign(&self, loser: Color) -> Result<(), ChessError> {
        self.lock().resign(loser)
    }

    /// Record an agreed draw.
    pub fn agree_draw(&self) -> Result<(), ChessError> {
        self.lock().agree_draw()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn session() -> SharedSession {
        GameSession::new(Game::from_fen(START_FEN).unwrap())
    }

    #[test]
    fn local_move_applies_through_the_session() {
        let session = session();
        let record = session.apply_move(sq("e2"), sq("e4")).unwrap();
        assert_eq!(record.to_string(), "e2e4");
        assert!(session.fen().contains(" b "));
    }

    #[test]
    fn remote_payload_gets_full_validation() {
        let session = session();

        let bad = MovePayload {
            from_square: "e2".into(),
            to_square: "e5".into(),
        };
        assert!(matches!(
            session.apply_remote(&bad),
            Err(ChessError::IllegalMove { .. })
        ));

        let garbage = MovePayload {
            from_square: "z9".into(),
            to_square: "e4".into(),
        };
        assert!(matches!(
            session.apply_remote(&garbage),
            Err(ChessError::InvalidSquare(_))
        ));

        let good = MovePayload::new(sq("e2"), sq("e4"));
        assert!(session.apply_remote(&good).is_ok());
    }

    #[test]
    fn concurrent_callers_are_serialized() {
        let session = session();
        // Two threads race to play White's first move; the mutex serializes
        // them so exactly one wins and the other gets IllegalMove (it is
        // Black's turn by the time it runs).
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let session = Arc::clone(&session);
                    scope.spawn(move || session.apply_move(sq("e2"), sq("e4")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let ok = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok, 1);
        assert!(session.fen().contains(" b "));
    }

    #[test]
    fn queries_and_decisions_pass_through() {
        let session = session();
        assert_eq!(session.status(), GameStatus::Active);
        assert!(!session.is_game_over());
        assert_eq!(session.legal_targets(sq("e2")).len(), 2);
        assert_eq!(session.with_game(|g| g.side_to_move()), Color::White);

        session.resign(Color::Black).unwrap();
        assert!(session.is_game_over());
        assert_eq!(session.result().and_then(|r| r.winner()), Some(Color::White));
    }
}
