//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves for a square (piece geometry and
//!      occupancy only).
//!   2. Filter: apply each candidate to a clone of the position and reject
//!      it if the mover's own king is attacked afterwards.
//!
//! Trial applications run on clones, so forward application is the only
//! mutation path and there is no rollback code to drift out of sync.

use crate::engine::attacks::{self, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
use crate::engine::board::Position;
use crate::engine::types::{CastleSide, Color, Move, MoveFlags, PieceKind, Square};

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (sq, _) in pos.pieces_of(pos.side_to_move) {
        moves.extend(legal_moves_from(pos, sq));
    }
    moves
}

/// Generate all legal moves originating from a square. Empty squares and
/// pieces of the side not to move yield no moves.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    pseudo_legal_moves(pos, from)
        .into_iter()
        .filter(|&mv| !leaves_king_in_check(pos, mv))
        .collect()
}

/// Pseudo-legal moves for the piece on `from`: movement geometry and
/// occupancy rules only — the mover's king may still be left in check.
pub fn pseudo_legal_moves(pos: &Position, from: Square) -> Vec<Move> {
    let piece = match pos.piece_at(from) {
        Some(p) if p.color == pos.side_to_move => p,
        _ => return Vec::new(),
    };

    let t = attacks::tables();
    let mut moves = Vec::with_capacity(28);
    match piece.kind {
        PieceKind::Pawn => pawn_moves(pos, from, piece.color, &mut moves),
        PieceKind::Knight => leaper_moves(pos, from, piece.color, t.knight_targets(from), &mut moves),
        PieceKind::King => {
            leaper_moves(pos, from, piece.color, t.king_targets(from), &mut moves);
            castling_moves(pos, from, piece.color, &mut moves);
        }
        PieceKind::Bishop => slider_moves(pos, from, piece.color, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Rook => slider_moves(pos, from, piece.color, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            slider_moves(pos, from, piece.color, &BISHOP_DIRECTIONS, &mut moves);
            slider_moves(pos, from, piece.color, &ROOK_DIRECTIONS, &mut moves);
        }
    }
    moves
}

/// Trial-apply on a clone; true if the mover's king ends up attacked.
fn leaves_king_in_check(pos: &Position, mv: Move) -> bool {
    let us = pos.side_to_move;
    let mut copy = pos.clone();
    copy.apply_move(mv);
    copy.is_in_check(us)
}

// =========================================================================
// Pawn moves
// =========================================================================

fn pawn_moves(pos: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let dir = us.pawn_direction();

    // Single and double pushes onto empty squares.
    if let Some(one) = from.offset(0, dir) {
        if pos.piece_at(one).is_none() {
            moves.push(Move::new(from, one));
            if from.rank() == us.pawn_rank() {
                if let Some(two) = one.offset(0, dir) {
                    if pos.piece_at(two).is_none() {
                        moves.push(Move::with_flags(from, two, MoveFlags::DOUBLE_PUSH));
                    }
                }
            }
        }
    }

    // Diagonal captures, including onto the en-passant target.
    for &to in attacks::tables().pawn_targets(us, from) {
        match pos.piece_at(to) {
            Some(victim) if victim.color != us => {
                moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE));
            }
            None if pos.en_passant == Some(to) => {
                moves.push(Move::with_flags(
                    from,
                    to,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ));
            }
            _ => {}
        }
    }
}

// =========================================================================
// Knight and king steps
// =========================================================================

fn leaper_moves(
    pos: &Position,
    from: Square,
    us: Color,
    targets: &[Square],
    moves: &mut Vec<Move>,
) {
    for &to in targets {
        match pos.piece_at(to) {
            Some(p) if p.color == us => {}
            Some(_) => moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE)),
            None => moves.push(Move::new(from, to)),
        }
    }
}

// =========================================================================
// Slider moves (bishop, rook, queen)
// =========================================================================

fn slider_moves(
    pos: &Position,
    from: Square,
    us: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut sq = from;
        while let Some(next) = sq.offset(df, dr) {
            match pos.piece_at(next) {
                None => {
                    moves.push(Move::new(from, next));
                    sq = next;
                }
                Some(p) => {
                    if p.color != us {
                        moves.push(Move::with_flags(from, next, MoveFlags::CAPTURE));
                    }
                    break;
                }
            }
        }
    }
}

// =========================================================================
// Castling (Chess960)
// =========================================================================

/// Chess960 castling: the rook is identified by its remembered home square,
/// not a fixed file. The king lands two files toward the rook and the rook
/// tucks in beside it on the side nearer the king's start. Every square the
/// king crosses — destination included — must be unattacked, the span
/// strictly between king and rook must be empty, and the destination
/// squares may hold nothing but the castling pair themselves.
fn castling_moves(pos: &Position, king_from: Square, us: Color, moves: &mut Vec<Move>) {
    let them = !us;

    // Never castle out of check.
    if attacks::is_attacked(pos, king_from, them) {
        return;
    }

    for side in CastleSide::BOTH {
        let Some(rook_from) = pos.castling.rook_home(us, side) else {
            continue;
        };
        let dir: i8 = match side {
            CastleSide::King => 1,
            CastleSide::Queen => -1,
        };

        // A king too close to the edge has no castle on that side.
        let Some(king_to) = king_from.offset(2 * dir, 0) else {
            continue;
        };
        let Some(rook_to) = king_to.offset(-dir, 0) else {
            continue;
        };

        if !files_between_empty(pos, king_from, rook_from) {
            continue;
        }

        let clear = |sq: Square| sq == king_from || sq == rook_from || pos.piece_at(sq).is_none();
        if !clear(king_to) || !clear(rook_to) {
            continue;
        }

        if king_path_attacked(pos, king_from, king_to, dir, them) {
            continue;
        }

        moves.push(Move::with_flags(king_from, king_to, MoveFlags::CASTLING));
    }
}

/// Are all squares strictly between two squares on one rank empty?
fn files_between_empty(pos: &Position, a: Square, b: Square) -> bool {
    let rank = a.rank();
    let (lo, hi) = if a.file() < b.file() {
        (a.file(), b.file())
    } else {
        (b.file(), a.file())
    };
    ((lo + 1)..hi).all(|file| pos.piece_at(Square::from_file_rank(file, rank)).is_none())
}

/// Does the opponent attack any square the king crosses (destination
/// included, start square excluded)?
fn king_path_attacked(pos: &Position, from: Square, to: Square, dir: i8, them: Color) -> bool {
    let mut sq = from;
    while sq != to {
        sq = sq.offset(dir, 0).expect("king path stays on its rank");
        if attacks::is_attacked(pos, sq, them) {
            return true;
        }
    }
    false
}

// =========================================================================
// Tests
// =========================================================================
