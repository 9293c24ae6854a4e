//! End-to-end play: en passant, Chess960 castling, terminal states, and
//! self-check safety over random playouts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fischer_chess::{
    CastleSide, ChessError, Color, DrawReason, Game, GameResult, PieceKind, Square, WinReason,
};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn play(game: &mut Game, from: &str, to: &str) {
    game.apply_move(sq(from), sq(to))
        .unwrap_or_else(|e| panic!("{from}{to} should be legal: {e}"));
}

// =====================================================================
// En passant
// =====================================================================

#[test]
fn en_passant_capture_end_to_end() {
    let mut game = Game::from_fen(START_FEN).unwrap();
    play(&mut game, "h2", "h3");
    play(&mut game, "d7", "d5");
    play(&mut game, "h3", "h4");
    play(&mut game, "d5", "d4");
    play(&mut game, "e2", "e4");

    // The double step exposes e3 for exactly one ply.
    assert_eq!(game.position().en_passant, Some(sq("e3")));
    assert!(game.legal_targets(sq("d4")).contains(&sq("e3")));

    let record = game.apply_move(sq("d4"), sq("e3")).unwrap();
    assert_eq!(record.en_passant_capture, Some(sq("e4")));
    assert_eq!(
        record.captured.map(|p| p.kind),
        Some(PieceKind::Pawn)
    );
    // The captured pawn leaves e4; the capturing pawn stands on e3.
    assert_eq!(game.position().piece_at(sq("e4")), None);
    assert_eq!(
        game.position().piece_at(sq("e3")).map(|p| (p.color, p.kind)),
        Some((Color::Black, PieceKind::Pawn))
    );
    assert_eq!(game.position().en_passant, None);
}

#[test]
fn en_passant_window_closes_after_one_ply() {
    let mut game = Game::from_fen(START_FEN).unwrap();
    play(&mut game, "h2", "h3");
    play(&mut game, "d7", "d5");
    play(&mut game, "h3", "h4");
    play(&mut game, "d5", "d4");
    play(&mut game, "e2", "e4");
    // Black declines the capture…
    play(&mut game, "a7", "a6");
    play(&mut game, "a2", "a3");
    // …and may not come back for it.
    assert!(game.position().en_passant.is_none());
    assert!(!game.legal_targets(sq("d4")).contains(&sq("e3")));
}

// =====================================================================
// Chess960 castling
// =====================================================================

#[test]
fn queenside_castle_moves_king_to_c_and_rook_to_d() {
    let mut game = Game::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let record = game.apply_move(sq("e1"), sq("c1")).unwrap();

    let detail = record.castling.expect("queenside castle records the rook");
    assert_eq!(detail.rook_from, sq("a1"));
    assert_eq!(detail.rook_to, sq("d1"));

    assert_eq!(
        game.position().piece_at(sq("c1")).map(|p| p.kind),
        Some(PieceKind::King)
    );
    assert_eq!(
        game.position().piece_at(sq("d1")).map(|p| p.kind),
        Some(PieceKind::Rook)
    );
    assert_eq!(game.position().piece_at(sq("e1")), None);
    assert_eq!(game.position().piece_at(sq("a1")), None);

    // One applied move spends both of White's rights.
    assert!(!game.position().castling.any(Color::White));
    assert!(game.position().castling.any(Color::Black));
}

#[test]
fn castle_rejected_when_king_path_is_attacked() {
    // Black rook on d2 covers d1, which the king must cross.
    let mut game = Game::from_fen("r3k3/8/8/8/8/8/3r4/R3K3 w Q - 0 1").unwrap();
    let err = game.apply_move(sq("e1"), sq("c1")).unwrap_err();
    assert!(matches!(err, ChessError::IllegalMove { .. }));
}

#[test]
fn nonstandard_files_castle_both_ways() {
    // Rooks on b/e, king on c — a genuine Chess960 arrangement.
    let mut game =
        Game::from_fen("1rk1r3/pppppppp/8/8/8/8/PPPPPPPP/1RK1R3 w EBeb - 0 1").unwrap();
    assert!(game.legal_targets(sq("c1")).contains(&sq("e1")));
    assert!(game.legal_targets(sq("c1")).contains(&sq("a1")));

    let record = game.apply_move(sq("c1"), sq("e1")).unwrap();
    let detail = record.castling.unwrap();
    assert_eq!(detail.rook_from, sq("e1"));
    assert_eq!(detail.rook_to, sq("d1"));
    assert_eq!(
        game.position().piece_at(sq("e1")).map(|p| p.kind),
        Some(PieceKind::King)
    );
}

// =====================================================================
// Fifty-move rule
// =====================================================================

#[test]
fn hundred_quiet_plies_draw_the_game() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    for cycle in 0..25 {
        play(&mut game, "a1", "b1");
        play(&mut game, "e8", "d8");
        if cycle == 24 {
            break;
        }
        play(&mut game, "b1", "a1");
        play(&mut game, "d8", "e8");
    }
    // 98 plies so far; two more quiet plies reach the threshold.
    assert_eq!(game.halfmove_clock(), 98);
    assert!(!game.is_game_over());
    play(&mut game, "b1", "a1");
    assert!(!game.is_game_over());
    play(&mut game, "d8", "e8");
    assert_eq!(game.halfmove_clock(), 100);
    assert_eq!(game.result(), Some(GameResult::Draw(DrawReason::FiftyMoveRule)));
}

// =====================================================================
// Query idempotence
// =====================================================================

#[test]
fn legal_moves_are_idempotent_between_applies() {
    let game = Game::from_fen(START_FEN).unwrap();
    assert_eq!(game.legal_moves(), game.legal_moves());
    assert_eq!(game.legal_targets(sq("b1")), game.legal_targets(sq("b1")));
}

// =====================================================================
// Random playouts
// =====================================================================

#[test]
fn random_playouts_never_leave_the_mover_in_check() {
    for seed in 0..10u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new(&mut rng);

        for _ in 0..80 {
            if game.is_game_over() {
                break;
            }
            let moves = game.legal_moves();
            let mv = moves[rng.gen_range(0..moves.len())];
            let mover = game.side_to_move();
            game.apply_move(mv.from, mv.to).unwrap();

            assert!(
                !game.position().is_in_check(mover),
                "seed {seed}: {mv} left the mover in check"
            );
        }

        // Status and result stay in lockstep.
        assert_eq!(game.is_game_over(), game.result().is_some());
    }
}

#[test]
fn random_playouts_preserve_fen_round_trips() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut game = Game::new(&mut rng);
    for _ in 0..40 {
        if game.is_game_over() {
            break;
        }
        let moves = game.legal_moves();
        let mv = moves[rng.gen_range(0..moves.len())];
        game.apply_move(mv.from, mv.to).unwrap();

        let fen = game.to_fen();
        let reparsed = fischer_chess::Position::from_fen(&fen).unwrap();
        assert_eq!(reparsed.to_fen(), fen);
    }
}

// =====================================================================
// Results
// =====================================================================

#[test]
fn resignation_mid_game() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut game = Game::new(&mut rng);
    game.resign(Color::Black).unwrap();
    assert_eq!(
        game.result(),
        Some(GameResult::Win {
            winner: Color::White,
            reason: WinReason::Resignation,
        })
    );
}

#[test]
fn fresh_chess960_games_hold_all_four_rights() {
    let mut rng = StdRng::seed_from_u64(11);
    let game = Game::new(&mut rng);
    for color in [Color::White, Color::Black] {
        for side in CastleSide::BOTH {
            assert!(game.position().castling.available(color, side));
        }
    }
}
