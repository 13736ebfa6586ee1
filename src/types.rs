use std::fmt;

use crate::error::{BoardError, BoardResult};

/// Width and height of the board
pub const BOARD_SIZE: u8 = 8;

/// Number of cells on the board
pub const BOARD_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Uppercase letters belong to the first side, lowercase to the second.
    pub fn from_case(c: char) -> Option<Side> {
        if c.is_uppercase() {
            Some(Side::First)
        } else if c.is_lowercase() {
            Some(Side::Second)
        } else {
            None
        }
    }

    pub fn other_side(&self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Rank delta of a pawn step. The first side advances towards rank 0.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Side::First => -1,
            Side::Second => 1,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pawn => "Pawn",
            Self::Rook => "Rook",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Queen => "Queen",
            Self::King => "King",
        };
        f.write_str(name)
    }
}

/// A square on the board. Both coordinates are always in `0..8`, so code that
/// holds a `Position` never needs to bounds check it again.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Position {
    file: u8, // column, 0 is the left edge
    rank: u8, // row, 0 is the top edge
}

impl Position {
    pub fn new(file: i64, rank: i64) -> BoardResult<Position> {
        let size = BOARD_SIZE as i64;
        if (0..size).contains(&file) && (0..size).contains(&rank) {
            Ok(Position {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            Err(BoardError::OutOfBounds { file, rank })
        }
    }

    /// For coordinates known to be on the board, such as the starting setup
    pub(crate) fn on_board(file: u8, rank: u8) -> Position {
        debug_assert!(
            file < BOARD_SIZE && rank < BOARD_SIZE,
            "({}, {}) is off the board",
            file,
            rank
        );
        Position { file, rank }
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Cell index used by the render buffer and the per-square tables
    pub fn to_linear(&self) -> usize {
        self.file as usize + self.rank as usize * BOARD_SIZE as usize
    }

    pub fn from_linear(index: usize) -> Option<Position> {
        if index >= BOARD_CELLS {
            return None;
        }
        Some(Position {
            file: (index % BOARD_SIZE as usize) as u8,
            rank: (index / BOARD_SIZE as usize) as u8,
        })
    }

    /// The square `file_delta`, `rank_delta` away, or `None` past the edge
    pub fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Position> {
        Position::new(
            self.file as i64 + file_delta as i64,
            self.rank as i64 + rank_delta as i64,
        )
        .ok()
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_CELLS).filter_map(Position::from_linear)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}

/// Stable identity of a piece: its registration index on the board. It stays
/// valid (and keeps naming the same piece) after the piece is captured.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for PieceId {
    fn from(index: usize) -> Self {
        PieceId(index)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub position: Position,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, position: Position) -> Piece {
        Piece {
            kind,
            side,
            position,
        }
    }

    /// Build a piece from its layout letter, e.g. `'R'` for a first side rook
    pub fn from_char(c: char, position: Position) -> Option<Piece> {
        Some(Piece {
            kind: PieceKind::from_char(c)?,
            side: Side::from_case(c)?,
            position,
        })
    }

    pub fn to_char(&self) -> char {
        match self.side {
            Side::First => self.kind.to_char(),
            Side::Second => self.kind.to_char().to_ascii_lowercase(),
        }
    }
}

/// One legal destination of a piece, and the piece that would be captured there
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MoveCandidate {
    pub to: Position,
    pub captured: Option<PieceId>,
}

impl MoveCandidate {
    pub fn quiet(to: Position) -> Self {
        Self { to, captured: None }
    }

    pub fn capture(to: Position, captured: PieceId) -> Self {
        Self {
            to,
            captured: Some(captured),
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn to_human(&self) -> String {
        let kill = if self.is_capture() { " and make a kill" } else { "" };
        format!("Move to x:{} y:{}{}", self.to.file(), self.to.rank(), kill)
    }
}

/// How pawns treat an occupied diagonal
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum PawnCaptures {
    /// Only pieces of the other side can be captured
    #[default]
    OpponentOnly,
    /// Any occupant can be captured, including a piece of the pawn's own side
    AnyOccupant,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RuleSet {
    pub pawn_captures: PawnCaptures,
}

/// A committed move, kept in the game history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub id: PieceId,
    /// The moving piece as it stood before the move
    pub piece: Piece,
    pub to: Position,
    /// The captured piece as it stood before removal
    pub captured: Option<(PieceId, Piece)>,
}

impl MoveRecord {
    pub fn origin(&self) -> Position {
        self.piece.position
    }

    pub fn candidate(&self) -> MoveCandidate {
        MoveCandidate {
            to: self.to,
            captured: self.captured.map(|(id, _)| id),
        }
    }

    pub fn to_human(&self) -> String {
        let maybe_capture_str = match self.captured {
            Some((id, p)) => format!(
                " capturing {} {} {}",
                p.side.to_human(),
                p.kind.to_human(),
                id
            ),
            None => "".to_string(),
        };
        format!(
            "{} {} {} moves from {} to {}{}",
            self.piece.side.to_human(),
            self.piece.kind.to_human(),
            self.id,
            self.origin(),
            self.to,
            maybe_capture_str,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_case() {
        assert_eq!(Side::from_case('R'), Some(Side::First));
        assert_eq!(Side::from_case('r'), Some(Side::Second));
        assert_eq!(Side::from_case('.'), None);
    }

    #[test]
    fn test_other_side() {
        assert_eq!(Side::First, Side::Second.other_side());
        assert_eq!(Side::Second, Side::First.other_side());
    }

    #[test]
    fn test_piece_kind_from_char() {
        assert_eq!(PieceKind::from_char('p'), Some(PieceKind::Pawn));
        assert_eq!(PieceKind::from_char('R'), Some(PieceKind::Rook));
        assert_eq!(PieceKind::from_char('n'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_ok());
        assert!(Position::new(7, 7).is_ok());
        assert_eq!(
            Position::new(8, 3),
            Err(BoardError::OutOfBounds { file: 8, rank: 3 })
        );
        assert_eq!(
            Position::new(2, -1),
            Err(BoardError::OutOfBounds { file: 2, rank: -1 })
        );
    }

    #[test]
    fn test_on_board_matches_new() {
        for pos in Position::all() {
            assert_eq!(Position::on_board(pos.file(), pos.rank()), pos);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "off the board")]
    fn test_on_board_rejects_off_board_setup() {
        Position::on_board(BOARD_SIZE, 0);
    }

    #[test]
    fn test_linear_round_trip() {
        for index in 0..BOARD_CELLS {
            let pos = Position::from_linear(index).unwrap();
            assert_eq!(pos.to_linear(), index);
        }
        for pos in Position::all() {
            assert_eq!(Position::from_linear(pos.to_linear()), Some(pos));
        }
        assert_eq!(Position::from_linear(BOARD_CELLS), None);
        assert_eq!(Position::new(3, 6).unwrap().to_linear(), 51);
    }

    #[test]
    fn test_offset_stops_at_edges() {
        let corner = Position::new(0, 7).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, 1), None);
        assert_eq!(corner.offset(1, -1), Some(Position::new(1, 6).unwrap()));
    }

    #[test]
    fn test_piece_from_char() {
        let pos = Position::new(4, 2).unwrap();
        assert_eq!(
            Piece::from_char('k', pos),
            Some(Piece::new(PieceKind::King, Side::Second, pos))
        );
        assert_eq!(Piece::from_char('R', pos).map(|p| p.to_char()), Some('R'));
        assert_eq!(Piece::from_char('?', pos), None);
    }

    #[test]
    fn test_candidate_to_human() {
        let to = Position::new(0, 5).unwrap();
        assert_eq!(MoveCandidate::quiet(to).to_human(), "Move to x:0 y:5");
        assert_eq!(
            MoveCandidate::capture(to, PieceId(8)).to_human(),
            "Move to x:0 y:5 and make a kill"
        );
    }

    #[test]
    fn test_record_to_human() {
        let record = MoveRecord {
            id: PieceId(16),
            piece: Piece::new(PieceKind::Rook, Side::First, Position::new(0, 7).unwrap()),
            to: Position::new(0, 5).unwrap(),
            captured: Some((
                PieceId(8),
                Piece::new(PieceKind::Pawn, Side::Second, Position::new(0, 5).unwrap()),
            )),
        };
        assert_eq!(
            record.to_human(),
            "first rook 16 moves from (0, 7) to (0, 5) capturing second pawn 8"
        );
        assert_eq!(
            record.candidate(),
            MoveCandidate::capture(Position::new(0, 5).unwrap(), PieceId(8))
        );
    }
}
