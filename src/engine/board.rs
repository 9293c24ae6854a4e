//! Mailbox chess position representation.
//!
//! `Position` stores piece placement as a 64-slot array of optional pieces,
//! plus side to move, Chess960 castling rights, en-passant target, and move
//! counters. All mutation goes through `apply_move`, which returns the
//! `MoveRecord` that `Game` appends to its history. Legality trials clone
//! the position instead of mutating and rolling back.

use std::fmt;

use crate::engine::attacks;
use crate::engine::types::{
    CastleSide, CastlingRights, ChessError, Color, Move, Piece, PieceKind, Square,
};

// ---------------------------------------------------------------------------
// MoveRecord — the applied-move history entry
// ---------------------------------------------------------------------------

/// Rook relocation performed as part of a castling move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingDetail {
    pub rook_from: Square,
    pub rook_to: Square,
}

/// A fully-described applied move.
///
/// Append-only: records are never mutated after creation. They carry enough
/// to render notation externally, and enough for an undo if one is added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    /// The piece that moved (pre-promotion).
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    /// Captured piece, for normal and en-passant captures alike.
    pub captured: Option<Piece>,
    pub castling: Option<CastlingDetail>,
    /// Square of the pawn removed by an en-passant capture.
    pub en_passant_capture: Option<Square>,
    /// Kind a promoting pawn became (always `Queen`).
    pub promotion: Option<PieceKind>,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.to_char(Color::White))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete chess position.
///
/// Board layout follows LERF (Little-Endian Rank-File) mapping:
/// a1 = 0, b1 = 1, … h1 = 7, a2 = 8, … h8 = 63. White's back rank is rank
/// index 0, Black's is rank index 7.
#[derive(Clone, Debug)]
pub struct Position {
    /// One optional piece per square.
    board: [Option<Piece>; 64],

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability with the conferring rooks' home squares.
    pub castling: CastlingRights,

    /// En-passant target square (the square *behind* the double-pushed
    /// pawn). Valid for exactly one ply.
    pub en_passant: Option<Square>,

    /// Half-move clock for the fifty-move rule, counted in plies and reset
    /// on pawn moves and captures.
    pub halfmove_clock: u16,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u16,
}

impl Position {
    /// Create an empty board with no pieces and no rights.
    pub fn empty() -> Self {
        Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.0 as usize]
    }

    /// All pieces of a color with their squares.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board.iter().enumerate().filter_map(move |(i, slot)| {
            slot.filter(|p| p.color == color)
                .map(|p| (Square(i as u8), p))
        })
    }

    /// Find the king square for the given color.
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
            .expect("king must exist")
    }

    /// Is this color's king currently attacked?
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        attacks::is_attacked(self, self.king_square(color), !color)
    }

    // -----------------------------------------------------------------------
    // Piece manipulation (crate-internal; external mutation goes through
    // `Game::apply_move`)
    // -----------------------------------------------------------------------

    #[inline]
    pub(crate) fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.board[sq.0 as usize] = Some(piece);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.board[sq.0 as usize].take()
    }

    // -----------------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------------

    /// Apply a move unconditionally and return its record.
    ///
    /// The caller is responsible for passing a generated (pseudo-)legal
    /// move; validation lives in `Game::apply_move` and the legality filter.
    pub fn apply_move(&mut self, mv: Move) -> MoveRecord {
        let us = self.side_to_move;
        let piece = self
            .piece_at(mv.from)
            .expect("apply_move called with an empty from-square");

        let mut record = MoveRecord {
            piece,
            from: mv.from,
            to: mv.to,
            captured: None,
            castling: None,
            en_passant_capture: None,
            promotion: None,
        };

        if mv.flags.is_castling() {
            self.castle(us, mv, &mut record);
        } else {
            // ---- Capture (normal or en passant) ----
            if mv.flags.is_en_passant() {
                let victim_sq = Square::from_file_rank(mv.to.file(), mv.from.rank());
                record.captured = self.remove_piece(victim_sq);
                record.en_passant_capture = Some(victim_sq);
            } else if let Some(victim) = self.remove_piece(mv.to) {
                record.captured = Some(victim);
                // Capturing a rook on its home square forfeits that right.
                self.castling.clear_rook(victim.color, mv.to);
            }

            // ---- Relocate, promoting on the far rank ----
            self.remove_piece(mv.from);
            let landing = if piece.kind == PieceKind::Pawn && mv.to.rank() == us.promotion_rank() {
                record.promotion = Some(PieceKind::Queen);
                Piece::new(us, PieceKind::Queen)
            } else {
                piece
            };
            self.put_piece(mv.to, landing);

            // ---- Castling rights ----
            match piece.kind {
                PieceKind::King => self.castling.clear_color(us),
                PieceKind::Rook => self.castling.clear_rook(us, mv.from),
                _ => {}
            }
        }

        // ---- En-passant target lives exactly one ply ----
        self.en_passant = None;
        if mv.flags.is_double_push() {
            self.en_passant = mv.from.offset(0, us.pawn_direction());
        }

        // ---- Clocks & side ----
        if piece.kind == PieceKind::Pawn || record.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = !us;

        record
    }

    /// Relocate king and rook for a Chess960 castle: the king's destination
    /// is two files toward the rook, the rook lands on the file adjacent to
    /// it on the side nearer the king's start.
    fn castle(&mut self, us: Color, mv: Move, record: &mut MoveRecord) {
        let side = if mv.to.file() > mv.from.file() {
            CastleSide::King
        } else {
            CastleSide::Queen
        };
        let dir: i8 = match side {
            CastleSide::King => 1,
            CastleSide::Queen => -1,
        };
        let rook_from = self
            .castling
            .rook_home(us, side)
            .expect("castling move without a matching right");
        let rook_to = mv
            .to
            .offset(-dir, 0)
            .expect("castling rook destination on board");

        // Remove both before placing either: with arbitrary start files the
        // destinations may coincide with the origin squares.
        self.remove_piece(mv.from);
        self.remove_piece(rook_from);
        self.put_piece(mv.to, Piece::new(us, PieceKind::King));
        self.put_piece(rook_to, Piece::new(us, PieceKind::Rook));

        record.castling = Some(CastlingDetail { rook_from, rook_to });
        self.castling.clear_color(us);
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8).rev() {
            s.push((b'1' + rank) as char);
            s.push(' ');
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                let ch = match self.piece_at(sq) {
                    Some(p) => p.to_char(),
                    None => '.',
                };
                s.push(ch);
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a FEN string into a `Position`.
    ///
    /// Validates all 6 fields and ensures exactly one king per side. The
    /// castling field accepts the plain `KQkq` letters (resolved to the
    /// outermost rook on that side of the king, which is exact for every
    /// position this engine can produce) as well as X-FEN file letters.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut pos = Position::empty();

        // ----- Field 1: Piece placement -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8; // FEN starts from rank 8
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        rank + 1
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            rank + 1
                        )));
                    }
                    file += digit as u8;
                } else if let Some(piece) = Piece::from_char(ch) {
                    pos.put_piece(Square::from_file_rank(file, rank), piece);
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    rank + 1,
                    file
                )));
            }
        }

        // Validate exactly one king per side.
        for color in [Color::White, Color::Black] {
            let king_count = pos
                .pieces_of(color)
                .filter(|(_, p)| p.kind == PieceKind::King)
                .count();
            if king_count != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{color} has {king_count} kings (expected 1)"
                )));
            }
        }

        // ----- Field 2: Side to move -----
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        parse_castling_field(&mut pos, fields[2])?;

        // ----- Field 4: En passant target square -----
        if fields[3] != "-" {
            let ep_sq = Square::from_algebraic(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // En passant target must be on rank 3 (for Black) or rank 6.
            let rank = ep_sq.rank();
            if rank != 2 && rank != 5 {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {} is not on rank 3 or 6",
                    fields[3]
                )));
            }
            pos.en_passant = Some(ep_sq);
        }

        // ----- Field 5: Halfmove clock -----
        pos.halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;

        // ----- Field 6: Fullmove number -----
        pos.fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if pos.fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        Ok(pos)
    }

    /// Export the position as a FEN string.
    ///
    /// The castling field uses the plain `KQkq` letters, a Chess960 fidelity
    /// simplification: rook files are recoverable for every position this
    /// engine produces, but arbitrary hand-built positions with two rooks on
    /// one side of the king would need the X-FEN file-letter form.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        // ----- Field 1: Piece placement -----
        for rank in (0..8).rev() {
            let mut empty_count = 0u8;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        // ----- Field 2: Side to move -----
        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        // ----- Field 3: Castling -----
        fen.push(' ');
        fen.push_str(&self.castling.fen_field());

        // ----- Field 4: En passant -----
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        // ----- Field 5: Halfmove clock -----
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());

        // ----- Field 6: Fullmove number -----
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }
}

/// Parse the FEN castling field into rights with rook home squares.
fn parse_castling_field(pos: &mut Position, field: &str) -> Result<(), ChessError> {
    if field == "-" {
        return Ok(());
    }
    for c in field.chars() {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let rank = color.back_rank();
        let king = pos.king_square(color);
        if king.rank() != rank {
            return Err(ChessError::InvalidFen(format!(
                "castling right '{c}' but the {color} king is not on its back rank"
            )));
        }

        let rook_sq = match c.to_ascii_lowercase() {
            // Plain letters resolve to the outermost rook on that side.
            'k' => outermost_rook(pos, color, king.file(), 1),
            'q' => outermost_rook(pos, color, king.file(), -1),
            // X-FEN file letters name the rook's file directly.
            f @ 'a'..='h' => {
                let sq = Square::from_file_rank(f as u8 - b'a', rank);
                pos.piece_at(sq)
                    .filter(|p| p.color == color && p.kind == PieceKind::Rook)
                    .map(|_| sq)
            }
            _ => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid castling character '{c}'"
                )));
            }
        };
        let rook_sq = rook_sq.ok_or_else(|| {
            ChessError::InvalidFen(format!("castling right '{c}' has no matching rook"))
        })?;

        let side = if rook_sq.file() > king.file() {
            CastleSide::King
        } else if rook_sq.file() < king.file() {
            CastleSide::Queen
        } else {
            return Err(ChessError::InvalidFen(format!(
                "castling right '{c}' names the king's own file"
            )));
        };
        pos.castling.grant(color, side, rook_sq);
    }
    Ok(())
}

/// Outermost rook of `color` on its back rank, scanning outward from the
/// king in direction `dir`.
fn outermost_rook(pos: &Position, color: Color, king_file: u8, dir: i8) -> Option<Square> {
    let rank = color.back_rank();
    let mut found = None;
    let mut file = king_file as i8 + dir;
    while (0..8).contains(&file) {
        let sq = Square::from_file_rank(file as u8, rank);
        if let Some(p) = pos.piece_at(sq) {
            if p.color == color && p.kind == PieceKind::Rook {
                found = Some(sq);
            }
        }
        file += dir;
    }
    found
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
