// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::ToPrimitive;
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::str::FromStr;

// Colors and piece kinds index the per-side and per-kind count tables used in
// position analysis.
pub trait TableIndex {
    fn as_index(self) -> usize;
}

impl<T> TableIndex for T
where
    T: ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_usize().unwrap_or(0)
    }
}

/// A square on the board, addressed by file (0 is the a-file) and rank index.
///
/// Rank index 0 is the edge where Black's pieces start (the eighth rank in
/// algebraic notation) and rank index 7 is White's home rank. Board scans walk
/// rank index 0 through 7 and, within a rank, file 0 through 7.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Constructs a square. Both coordinates must be in `0..8`.
    pub fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8, "square out of range");
        Square { file, rank }
    }

    /// Constructs a square from signed coordinates, returning `None` if the
    /// coordinates lie off the board.
    pub fn checked(file: i8, rank: i8) -> Option<Square> {
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            return None;
        }

        Some(Square::new(file as u8, rank as u8))
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Index of this square in board-scan order.
    pub fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn from_scan_index(idx: usize) -> Square {
        Square::new((idx % 8) as u8, (idx / 8) as u8)
    }

    /// The same square seen from the other side of the board. Piece-square
    /// tables are authored for White; Black looks them up through this.
    pub fn flip_vertical(self) -> Square {
        Square::new(self.file, 7 - self.rank)
    }

    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        Square::checked(self.file as i8 + file_delta, self.rank as i8 + rank_delta)
    }

    pub fn towards(self, dir: Direction) -> Option<Square> {
        let (file_delta, rank_delta) = dir.as_vector();
        self.offset(file_delta, rank_delta)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + self.file) as char)?;
        f.write_char((b'8' - self.rank) as char)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SquareParseError {
    WrongLength,
    InvalidFile(char),
    InvalidRank(char),
}

impl Display for SquareParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SquareParseError::WrongLength => write!(f, "squares are written as two characters"),
            SquareParseError::InvalidFile(c) => write!(f, "`{}` is not a file (a-h)", c),
            SquareParseError::InvalidRank(c) => write!(f, "`{}` is not a rank (1-8)", c),
        }
    }
}

impl std::error::Error for SquareParseError {}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Square, SquareParseError> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(SquareParseError::WrongLength),
        };

        if file < 'a' || file > 'h' {
            return Err(SquareParseError::InvalidFile(file));
        }
        if rank < '1' || rank > '8' {
            return Err(SquareParseError::InvalidRank(rank));
        }

        Ok(Square::new(file as u8 - b'a', b'8' - rank as u8))
    }
}

/// Iterator over all 64 squares in board-scan order.
pub fn squares() -> impl Iterator<Item = Square> {
    (0..64).map(Square::from_scan_index)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ToPrimitive)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for White, -1 for Black. Scores are White-positive, so multiplying by
    /// this turns them into side-relative scores.
    pub fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank index a pawn of this color must reach to promote.
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// The rank index this color's king and rooks start on.
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Rank delta of a single pawn step.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Color, ()> {
        match s {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ToPrimitive)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

pub static PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// (file delta, rank delta). North points towards rank index 0, the side
    /// Black starts on.
    pub fn as_vector(self) -> (i8, i8) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }
}

// Slide orders below fix the order destinations are generated in, which in
// turn fixes the order the search tries moves.
pub static ORTHOGONALS: [Direction; 4] = [
    Direction::West,
    Direction::East,
    Direction::North,
    Direction::South,
];

pub static DIAGONALS: [Direction; 4] = [
    Direction::NorthWest,
    Direction::SouthWest,
    Direction::NorthEast,
    Direction::SouthEast,
];

bitflags! {
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE =0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleStatus {
    pub fn kingside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_KINGSIDE,
            Color::Black => CastleStatus::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_QUEENSIDE,
            Color::Black => CastleStatus::BLACK_QUEENSIDE,
        }
    }

    pub fn both(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE,
            Color::Black => CastleStatus::BLACK,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
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
            _ => return Err(()),
        };

        Ok(Piece::new(kind, color))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = self.kind.to_string();
        match self.color {
            Color::White => f.write_str(&kind.to_ascii_uppercase()),
            Color::Black => f.write_str(&kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_algebraic() {
        let e2 = Square::new(4, 6);
        assert_eq!("e2", e2.to_string());
        assert_eq!(Ok(e2), "e2".parse::<Square>());
        assert_eq!(Ok(Square::new(0, 0)), "a8".parse::<Square>());
        assert_eq!(Err(SquareParseError::InvalidFile('i')), "i9".parse::<Square>());
        assert_eq!(Err(SquareParseError::InvalidRank('9')), "e9".parse::<Square>());
        assert_eq!(Err(SquareParseError::WrongLength), "e".parse::<Square>());
        assert_eq!(Err(SquareParseError::WrongLength), "e22".parse::<Square>());
    }

    #[test]
    fn square_offsets_stay_on_board() {
        let a8 = Square::new(0, 0);
        assert_eq!(None, a8.towards(Direction::North));
        assert_eq!(None, a8.towards(Direction::West));
        assert_eq!(Some(Square::new(1, 1)), a8.towards(Direction::SouthEast));
    }

    #[test]
    fn flip_vertical_mirrors_rank() {
        assert_eq!(Square::new(4, 1), Square::new(4, 6).flip_vertical());
    }

    #[test]
    fn scan_order() {
        let all: Vec<_> = squares().collect();
        assert_eq!(64, all.len());
        assert_eq!(Square::new(0, 0), all[0]);
        assert_eq!(Square::new(1, 0), all[1]);
        assert_eq!(Square::new(0, 1), all[8]);
        assert!(all.iter().enumerate().all(|(i, sq)| sq.index() == i));
    }

    #[test]
    fn piece_char_roundtrip() {
        for &c in &['P', 'n', 'B', 'r', 'Q', 'k'] {
            let piece = Piece::try_from(c).unwrap();
            assert_eq!(c.to_string(), piece.to_string());
        }
        assert!(Piece::try_from('x').is_err());
    }

    #[test]
    fn castle_masks() {
        assert_eq!(
            CastleStatus::WHITE,
            CastleStatus::kingside(Color::White) | CastleStatus::queenside(Color::White)
        );
        assert_eq!(CastleStatus::BLACK, CastleStatus::both(Color::Black));
    }
}
