use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank index of this color's back rank.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank index this color's pawns start on.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank index a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank-axis direction this color's pawns advance in.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind & Piece
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Single letter: uppercase for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a piece character; case determines the color.
    pub fn from_char(c: char) -> Option<(Color, PieceKind)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((color, kind))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::King => write!(f, "king"),
        }
    }
}

/// A colored piece. Immutable value type; a square holds one or none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    /// FEN character for this piece.
    pub fn to_char(self) -> char {
        self.kind.to_char(self.color)
    }

    /// Parse a FEN piece character.
    pub fn from_char(c: char) -> Option<Piece> {
        PieceKind::from_char(c).map(|(color, kind)| Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square on the chess board (0..63, LERF: a1=0, h8=63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub u8);

impl Square {
    pub const NUM: usize = 64;

    #[inline]
    pub fn new(index: u8) -> Self {
        debug_assert!(index < 64, "Square index out of range: {index}");
        Square(index)
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    /// Step by file/rank deltas; `None` when the result leaves the board.
    ///
    /// Every generator and the attack oracle go through this single
    /// bounds-checked primitive rather than doing their own range checks.
    #[inline]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_file_rank(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Square::from_file_rank(file, rank))
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        format!("{file}{rank}")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// MoveFlags & Move
// ---------------------------------------------------------------------------

/// Flags for special move types packed in a single byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1);
    pub const EN_PASSANT: MoveFlags = MoveFlags(2);
    pub const CASTLING: MoveFlags = MoveFlags(4);
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(8);

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & Self::CAPTURE.0 != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & Self::EN_PASSANT.0 != 0
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.0 & Self::CASTLING.0 != 0
    }

    #[inline]
    pub fn is_double_push(self) -> bool {
        self.0 & Self::DOUBLE_PUSH.0 != 0
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        MoveFlags(self.0 | rhs.0)
    }
}

/// A candidate move: from-square, to-square, and flags.
///
/// There is no promotion field: promotion is forced to queen, so the move
/// application derives it from the destination rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub flags: MoveFlags,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            flags: MoveFlags::NONE,
        }
    }

    pub fn with_flags(from: Square, to: Square, flags: MoveFlags) -> Self {
        Move { from, to, flags }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

// ---------------------------------------------------------------------------
// CastleSide & CastlingRights
// ---------------------------------------------------------------------------

/// The two castling directions. King-side is the rook on the file above the
/// king's, queen-side the rook below — Chess960 has no fixed rook files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Castling availability, tracked per color and side as the home square of
/// the rook conferring the right (`None` once cleared).
///
/// Chess960 needs the square itself, not a bare flag: the right is lost
/// when that specific rook moves or is captured, and move application finds
/// the castling partner through it. Rights are monotonically
/// non-increasing — there is no way to re-grant one mid-game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastlingRights {
    rooks: [[Option<Square>; 2]; 2],
}

impl CastlingRights {
    pub const fn none() -> Self {
        CastlingRights {
            rooks: [[None; 2]; 2],
        }
    }

    /// Home square of the rook conferring the right, if still held.
    #[inline]
    pub fn rook_home(self, color: Color, side: CastleSide) -> Option<Square> {
        self.rooks[color.index()][side.index()]
    }

    /// Grant a right at game setup.
    pub fn grant(&mut self, color: Color, side: CastleSide, rook: Square) {
        self.rooks[color.index()][side.index()] = Some(rook);
    }

    /// Clear one side's right for a color.
    pub fn clear(&mut self, color: Color, side: CastleSide) {
        self.rooks[color.index()][side.index()] = None;
    }

    /// Clear both rights for a color (the king moved).
    pub fn clear_color(&mut self, color: Color) {
        self.rooks[color.index()] = [None, None];
    }

    /// Clear whichever right (if any) is conferred by a rook on `sq`.
    /// Used when a rook moves off its home square or is captured there.
    pub fn clear_rook(&mut self, color: Color, sq: Square) {
        for side in CastleSide::BOTH {
            if self.rook_home(color, side) == Some(sq) {
                self.clear(color, side);
            }
        }
    }

    #[inline]
    pub fn available(self, color: Color, side: CastleSide) -> bool {
        self.rook_home(color, side).is_some()
    }

    /// Whether the color holds any right.
    pub fn any(self, color: Color) -> bool {
        self.rooks[color.index()].iter().any(Option::is_some)
    }

    pub fn is_none(self) -> bool {
        !self.any(Color::White) && !self.any(Color::Black)
    }

    /// FEN castling field using the plain `KQkq` letters ("-" if empty).
    pub fn fen_field(self) -> String {
        if self.is_none() {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.available(Color::White, CastleSide::King) {
            s.push('K');
        }
        if self.available(Color::White, CastleSide::Queen) {
            s.push('Q');
        }
        if self.available(Color::Black, CastleSide::King) {
            s.push('k');
        }
        if self.available(Color::Black, CastleSide::Queen) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_field())
    }
}

// ---------------------------------------------------------------------------
// GameStatus & GameResult
// ---------------------------------------------------------------------------

/// How a finished game was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    Checkmate,
    Resignation,
}

/// Why a finished game was drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Stalemate,
    FiftyMoveRule,
    Agreement,
}

/// Final outcome of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win { winner: Color, reason: WinReason },
    Draw(DrawReason),
}

impl GameResult {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::Win { winner, .. } => Some(winner),
            GameResult::Draw(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::Win {
                reason: WinReason::Checkmate,
                ..
            } => "checkmate",
            GameResult::Win {
                reason: WinReason::Resignation,
                ..
            } => "resignation",
            GameResult::Draw(DrawReason::Stalemate) => "stalemate",
            GameResult::Draw(DrawReason::FiftyMoveRule) => "fifty_move_rule",
            GameResult::Draw(DrawReason::Agreement) => "draw_agreed",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Check,
    Finished(GameResult),
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Finished(result) => result.as_str(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Finished(_))
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the chess engine. All recoverable and reported with no
/// partial mutation of the position.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("game is already over: {0}")]
    GameOver(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_rank_helpers() {
        assert_eq!(Color::White.back_rank(), 0);
        assert_eq!(Color::Black.back_rank(), 7);
        assert_eq!(Color::White.pawn_rank(), 1);
        assert_eq!(Color::Black.pawn_rank(), 6);
        assert_eq!(Color::White.promotion_rank(), 7);
        assert_eq!(Color::Black.promotion_rank(), 0);
        assert_eq!(Color::White.pawn_direction(), 1);
        assert_eq!(Color::Black.pawn_direction(), -1);
    }

    #[test]
    fn piece_char_round_trip() {
        for kind in PieceKind::ALL {
            for color in [Color::White, Color::Black] {
                let piece = Piece::new(color, kind);
                assert_eq!(Piece::from_char(piece.to_char()), Some(piece));
            }
        }
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::from_char('1'), None);
    }

    #[test]
    fn square_algebraic_round_trip() {
        for i in 0..64 {
            let sq = Square(i);
            assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
        }
    }

    #[test]
    fn square_from_algebraic_invalid() {
        assert_eq!(Square::from_algebraic(""), None);
        assert_eq!(Square::from_algebraic("a"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("abc"), None);
    }

    #[test]
    fn square_offset_in_bounds() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4.offset(1, 1), Square::from_algebraic("f5"));
        assert_eq!(e4.offset(-1, -2), Square::from_algebraic("d2"));
        assert_eq!(e4.offset(0, 0), Some(e4));
    }

    #[test]
    fn square_offset_off_board() {
        let a1 = Square::from_algebraic("a1").unwrap();
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        let h8 = Square::from_algebraic("h8").unwrap();
        assert_eq!(h8.offset(1, 0), None);
        assert_eq!(h8.offset(0, 1), None);
    }

    #[test]
    fn move_flags() {
        let flags = MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
        assert!(flags.is_capture());
        assert!(flags.is_en_passant());
        assert!(!flags.is_castling());
        assert!(!flags.is_double_push());
    }

    #[test]
    fn move_display() {
        let m = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e4").unwrap(),
        );
        assert_eq!(m.to_string(), "e2e4");
    }

    #[test]
    fn castling_rights_grant_and_clear() {
        let mut rights = CastlingRights::none();
        assert!(rights.is_none());

        let a1 = Square::from_algebraic("a1").unwrap();
        let h1 = Square::from_algebraic("h1").unwrap();
        rights.grant(Color::White, CastleSide::Queen, a1);
        rights.grant(Color::White, CastleSide::King, h1);
        assert!(rights.available(Color::White, CastleSide::King));
        assert_eq!(rights.rook_home(Color::White, CastleSide::Queen), Some(a1));
        assert!(!rights.any(Color::Black));

        rights.clear(Color::White, CastleSide::King);
        assert!(!rights.available(Color::White, CastleSide::King));
        assert!(rights.available(Color::White, CastleSide::Queen));

        rights.clear_color(Color::White);
        assert!(rights.is_none());
    }

    #[test]
    fn castling_rights_clear_rook_matches_home_square() {
        let mut rights = CastlingRights::none();
        let b1 = Square::from_algebraic("b1").unwrap();
        let g1 = Square::from_algebraic("g1").unwrap();
        rights.grant(Color::White, CastleSide::Queen, b1);
        rights.grant(Color::White, CastleSide::King, g1);

        // A rook on an unrelated square clears nothing.
        rights.clear_rook(Color::White, Square::from_algebraic("d1").unwrap());
        assert!(rights.any(Color::White));

        rights.clear_rook(Color::White, g1);
        assert!(!rights.available(Color::White, CastleSide::King));
        assert!(rights.available(Color::White, CastleSide::Queen));
    }

    #[test]
    fn castling_rights_fen_field() {
        let mut rights = CastlingRights::none();
        assert_eq!(rights.fen_field(), "-");

        rights.grant(
            Color::White,
            CastleSide::King,
            Square::from_algebraic("h1").unwrap(),
        );
        rights.grant(
            Color::Black,
            CastleSide::Queen,
            Square::from_algebraic("a8").unwrap(),
        );
        assert_eq!(rights.fen_field(), "Kq");
    }

    #[test]
    fn game_result_strings() {
        let mate = GameResult::Win {
            winner: Color::White,
            reason: WinReason::Checkmate,
        };
        assert_eq!(mate.as_str(), "checkmate");
        assert_eq!(mate.winner(), Some(Color::White));

        let fifty = GameResult::Draw(DrawReason::FiftyMoveRule);
        assert_eq!(fifty.as_str(), "fifty_move_rule");
        assert_eq!(fifty.winner(), None);
    }

    #[test]
    fn game_status_is_game_over() {
        assert!(!GameStatus::Active.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
        assert!(GameStatus::Finished(GameResult::Draw(DrawReason::Stalemate)).is_game_over());
        assert_eq!(
            GameStatus::Finished(GameResult::Draw(DrawReason::Agreement)).as_str(),
            "draw_agreed"
        );
    }

    #[test]
    fn chess_error_messages() {
        let err = ChessError::IllegalMove {
            from: Square::from_algebraic("e2").unwrap(),
            to: Square::from_algebraic("e5").unwrap(),
        };
        assert_eq!(err.to_string(), "illegal move: e2 -> e5");
    }
}
