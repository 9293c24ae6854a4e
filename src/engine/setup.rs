//! Random Chess960 start-position generation.
//!
//! Placement order: one bishop on a random even file, one on a random odd
//! file, the queen on a random remaining file, two knights on two random
//! remaining files, and the final three files become rook, king, rook in
//! ascending order — which by itself puts the king strictly between the
//! rooks. That yields 4 × 4 × 6 × (5·4/2) = 960 arrangements.

use rand::Rng;

use crate::engine::board::Position;
use crate::engine::types::{CastleSide, Color, Piece, PieceKind, Square};

/// Generate a random legal Chess960 back rank.
///
/// The random source is an injected capability so callers control
/// determinism; the engine never reaches for a process-global generator.
pub fn back_rank<R: Rng + ?Sized>(rng: &mut R) -> [PieceKind; 8] {
    let mut files: [Option<PieceKind>; 8] = [None; 8];

    // Bishops on opposite color-parity files.
    let dark = 2 * rng.gen_range(0..4usize);
    let light = 2 * rng.gen_range(0..4usize) + 1;
    files[dark] = Some(PieceKind::Bishop);
    files[light] = Some(PieceKind::Bishop);

    // Queen, then both knights, each on a uniformly-random remaining file
    // (knights sampled without replacement).
    let mut open: Vec<usize> = (0..8).filter(|&f| files[f].is_none()).collect();
    let queen = open.remove(rng.gen_range(0..open.len()));
    files[queen] = Some(PieceKind::Queen);
    for _ in 0..2 {
        let knight = open.remove(rng.gen_range(0..open.len()));
        files[knight] = Some(PieceKind::Knight);
    }

    // `open` was built in ascending order and only shrank, so the three
    // leftover files are already sorted: rook, king, rook.
    files[open[0]] = Some(PieceKind::Rook);
    files[open[1]] = Some(PieceKind::King);
    files[open[2]] = Some(PieceKind::Rook);

    files.map(|slot| slot.expect("all eight files are placed"))
}

/// Build a complete start position: the same generated back rank mirrored
/// for both colors, pawns on their home ranks, and both castling rights
/// granted with the generated rook files.
pub fn start_position<R: Rng + ?Sized>(rng: &mut R) -> Position {
    let rank = back_rank(rng);
    let king_file = rank
        .iter()
        .position(|&k| k == PieceKind::King)
        .expect("back rank has a king") as u8;

    let mut pos = Position::empty();
    for color in [Color::White, Color::Black] {
        let back = color.back_rank();
        for (file, &kind) in rank.iter().enumerate() {
            let sq = Square::from_file_rank(file as u8, back);
            pos.put_piece(sq, Piece::new(color, kind));
            if kind == PieceKind::Rook {
                let side = if file as u8 > king_file {
                    CastleSide::King
                } else {
                    CastleSide::Queen
                };
                pos.castling.grant(color, side, sq);
            }
        }
        for file in 0..8 {
            let sq = Square::from_file_rank(file, color.pawn_rank());
            pos.put_piece(sq, Piece::new(color, PieceKind::Pawn));
        }
    }
    pos
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn kind_files(rank: &[PieceKind; 8], kind: PieceKind) -> Vec<usize> {
        rank.iter()
            .enumerate()
            .filter(|(_, &k)| k == kind)
            .map(|(f, _)| f)
            .collect()
    }

    #[test]
    fn back_rank_has_the_full_piece_set() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let rank = back_rank(&mut rng);
            assert_eq!(kind_files(&rank, PieceKind::Rook).len(), 2);
            assert_eq!(kind_files(&rank, PieceKind::Knight).len(), 2);
            assert_eq!(kind_files(&rank, PieceKind::Bishop).len(), 2);
            assert_eq!(kind_files(&rank, PieceKind::Queen).len(), 1);
            assert_eq!(kind_files(&rank, PieceKind::King).len(), 1);
        }
    }

    #[test]
    fn bishops_land_on_opposite_parity_files() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            let rank = back_rank(&mut rng);
            let bishops = kind_files(&rank, PieceKind::Bishop);
            assert_ne!(bishops[0] % 2, bishops[1] % 2);
        }
    }

    #[test]
    fn king_sits_strictly_between_the_rooks() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let rank = back_rank(&mut rng);
            let rooks = kind_files(&rank, PieceKind::Rook);
            let king = kind_files(&rank, PieceKind::King)[0];
            assert!(rooks[0] < king && king < rooks[1]);
        }
    }

    #[test]
    fn start_position_mirrors_colors_and_places_pawns() {
        let mut rng = StdRng::seed_from_u64(4);
        let pos = start_position(&mut rng);
        for file in 0..8 {
            let white = pos.piece_at(Square::from_file_rank(file, 0)).unwrap();
            let black = pos.piece_at(Square::from_file_rank(file, 7)).unwrap();
            assert_eq!(white.kind, black.kind);
            assert_eq!(white.color, Color::White);
            assert_eq!(black.color, Color::Black);

            assert_eq!(
                pos.piece_at(Square::from_file_rank(file, 1)),
                Some(Piece::new(Color::White, PieceKind::Pawn))
            );
            assert_eq!(
                pos.piece_at(Square::from_file_rank(file, 6)),
                Some(Piece::new(Color::Black, PieceKind::Pawn))
            );
        }
        for rank in 2..6 {
            for file in 0..8 {
                assert_eq!(pos.piece_at(Square::from_file_rank(file, rank)), None);
            }
        }
    }

    #[test]
    fn start_position_grants_rights_on_the_rook_files() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let pos = start_position(&mut rng);
            for color in [Color::White, Color::Black] {
                let king = pos.king_square(color);
                let ks = pos.castling.rook_home(color, CastleSide::King).unwrap();
                let qs = pos.castling.rook_home(color, CastleSide::Queen).unwrap();
                assert!(qs.file() < king.file());
                assert!(king.file() < ks.file());
                assert_eq!(ks.rank(), color.back_rank());
                assert_eq!(qs.rank(), color.back_rank());
            }
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = start_position(&mut StdRng::seed_from_u64(42)).to_fen();
        let b = start_position(&mut StdRng::seed_from_u64(42)).to_fen();
        assert_eq!(a, b);
    }
}
