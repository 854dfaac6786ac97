// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Write};
use std::sync::Arc;

use hashbrown::HashMap;
use serde_derive::{Deserialize, Serialize};

use crate::board::Board;
use crate::movegen;
use crate::moves::Move;
use crate::types::{CastleStatus, Color, Piece, PieceKind, Square};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    EmptyHalfmove,
    InvalidHalfmove,
    EmptyFullmove,
    InvalidFullmove,
    InvalidKingCount,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedChar(c) => write!(f, "unexpected character `{}`", c),
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            FenParseError::InvalidDigit => write!(f, "invalid empty-square count"),
            FenParseError::FileDoesNotSumToEight => write!(f, "rank does not sum to eight files"),
            FenParseError::UnknownPiece => write!(f, "unknown piece"),
            FenParseError::InvalidSideToMove => write!(f, "invalid side to move"),
            FenParseError::InvalidCastle => write!(f, "invalid castling rights"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en-passant square"),
            FenParseError::EmptyHalfmove => write!(f, "missing halfmove clock"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::EmptyFullmove => write!(f, "missing fullmove number"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove number"),
            FenParseError::InvalidKingCount => write!(f, "each side needs exactly one king"),
        }
    }
}

impl std::error::Error for FenParseError {}

/// Canonical identity of a position for repetition counting, search
/// memoization and the opening book: the board, the side to move and the
/// castling rights. En-passant target and halfmove clock are deliberately not
/// part of it, so two positions differing only in those share a key.
///
/// The key is the first three FEN fields, so it is identical byte-for-byte
/// whenever those three components are.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionKey(String);

impl PositionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type RepetitionHistory = HashMap<PositionKey, u32>;

#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castle_status: CastleStatus,
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_clock: u32,
    // Shared between clones and copied on first write, so the search can clone
    // positions at every ply without copying the game's history.
    history: Arc<RepetitionHistory>,
}

//
// Board state getters
//

impl Position {
    pub fn new() -> Position {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            castle_status: CastleStatus::NONE,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_clock: 1,
            history: Arc::new(HashMap::new()),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.fullmove_clock
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::kingside(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::queenside(color))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board
            .find_pieces(Piece::new(PieceKind::King, color))
            .first()
            .cloned()
    }
}

//
// Repetition history
//

impl Position {
    pub fn key(&self) -> PositionKey {
        let mut buf = String::with_capacity(80);
        // Writing to a String can't fail.
        let _ = self.board.write_placement(&mut buf);
        let _ = write!(&mut buf, " {} ", self.side_to_move);
        let _ = self.write_castle_status(&mut buf);
        PositionKey(buf)
    }

    /// Adds the current position to the repetition history. This is not done by
    /// `apply_move`; whoever owns the game calls it after each confirmed move.
    pub fn record_history(&mut self) {
        let key = self.key();
        *Arc::make_mut(&mut self.history).entry(key).or_insert(0) += 1;
    }

    pub fn repetition_count(&self, key: &PositionKey) -> u32 {
        self.history.get(key).cloned().unwrap_or(0)
    }

    /// True if any position in the history has occurred three or more times.
    pub fn has_threefold_repetition(&self) -> bool {
        self.history.values().any(|&count| count >= 3)
    }

    /// Number of plies recorded into the history.
    pub fn played_plies(&self) -> u32 {
        self.history.values().sum()
    }
}

//
// Move application
//

impl Position {
    /// Plays a move, which must be legal in this position. Nothing is
    /// validated here; callers draw moves from `legal_destinations`.
    pub fn apply_move(&mut self, mov: Move) {
        let source = mov.source();
        let dest = mov.destination();
        let moving_piece = self
            .board
            .piece_at(source)
            .expect("invalid move: no piece at source square");
        let color = moving_piece.color;

        if self.board.is_occupied(dest) || moving_piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.board.take(source);
        if let Some(captured) = self.board.put(dest, moving_piece) {
            // A rook captured on its corner takes its castle with it.
            if captured.kind == PieceKind::Rook {
                self.clear_castle_for_corner(dest);
            }
        }

        match moving_piece.kind {
            PieceKind::King => {
                self.castle_status &= !CastleStatus::both(color);
                let file_delta = dest.file() as i8 - source.file() as i8;
                if file_delta.abs() == 2 {
                    let rank = source.rank();
                    let (rook_from, rook_to) = if file_delta > 0 {
                        (Square::new(7, rank), Square::new(5, rank))
                    } else {
                        (Square::new(0, rank), Square::new(3, rank))
                    };

                    if let Some(rook) = self.board.take(rook_from) {
                        self.board.put(rook_to, rook);
                    }
                }
            }
            PieceKind::Rook => self.clear_castle_for_corner(source),
            _ => {}
        }

        if moving_piece.kind == PieceKind::Pawn {
            if Some(dest) == self.en_passant_square {
                // The captured pawn sits behind the destination square.
                let captured_rank = dest.rank() as i8 - color.forward();
                if let Some(captured_square) = Square::checked(dest.file() as i8, captured_rank) {
                    self.board.take(captured_square);
                }
            }

            let rank_delta = dest.rank() as i8 - source.rank() as i8;
            self.en_passant_square = if rank_delta.abs() == 2 {
                Some(Square::new(source.file(), (source.rank() + dest.rank()) / 2))
            } else {
                None
            };

            if dest.rank() == color.promotion_rank() {
                self.board.put(dest, Piece::new(PieceKind::Queen, color));
            }
        } else {
            self.en_passant_square = None;
        }

        if color == Color::Black {
            self.fullmove_clock += 1;
        }
        self.side_to_move = self.side_to_move.toggle();
    }

    fn clear_castle_for_corner(&mut self, corner: Square) {
        let mask = match (corner.file(), corner.rank()) {
            (0, 0) => CastleStatus::BLACK_QUEENSIDE,
            (7, 0) => CastleStatus::BLACK_KINGSIDE,
            (0, 7) => CastleStatus::WHITE_QUEENSIDE,
            (7, 7) => CastleStatus::WHITE_KINGSIDE,
            _ => return,
        };

        self.castle_status &= !mask;
    }
}

//
// Board analysis
//

impl Position {
    /// True if the king of the given color is attacked by the other side.
    pub fn is_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => movegen::attacked_by(self, king, color.toggle()),
            None => false,
        }
    }
}

//
// FEN parsing and generation.
//
// Positions can be created by parsing FEN and FEN can be produced from
// particular positions. The first FEN rank (rank 8) is rank index 0.
//

impl Position {
    pub fn from_start_position() -> Position {
        let mut pos = Position::new();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for (file, &kind) in back_rank.iter().enumerate() {
            let file = file as u8;
            pos.board
                .put(Square::new(file, 0), Piece::new(kind, Color::Black));
            pos.board
                .put(Square::new(file, 1), Piece::new(PieceKind::Pawn, Color::Black));
            pos.board
                .put(Square::new(file, 6), Piece::new(PieceKind::Pawn, Color::White));
            pos.board
                .put(Square::new(file, 7), Piece::new(kind, Color::White));
        }

        pos.castle_status = CastleStatus::WHITE | CastleStatus::BLACK;
        pos
    }

    /// Parses the six space-separated FEN fields. Each side must have exactly
    /// one king.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        let mut fields = fen.as_ref().split(' ');
        let mut field = || {
            fields
                .next()
                .filter(|f| !f.is_empty())
                .ok_or(FenParseError::UnexpectedEnd)
        };

        let mut pos = Position::new();
        parse_placement(&mut pos.board, field()?)?;
        for &color in &[Color::White, Color::Black] {
            if pos.board.find_pieces(Piece::new(PieceKind::King, color)).len() != 1 {
                return Err(FenParseError::InvalidKingCount);
            }
        }

        pos.side_to_move = match field()? {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove),
        };
        pos.castle_status = parse_castle_status(field()?)?;
        pos.en_passant_square = match field()? {
            "-" => None,
            sq => Some(sq.parse().map_err(|_| FenParseError::InvalidEnPassant)?),
        };
        pos.halfmove_clock = parse_clock(
            field()?,
            FenParseError::EmptyHalfmove,
            FenParseError::InvalidHalfmove,
        )?;
        pos.fullmove_clock = parse_clock(
            field()?,
            FenParseError::EmptyFullmove,
            FenParseError::InvalidFullmove,
        )?;
        if fields.next().is_some() {
            return Err(FenParseError::UnexpectedChar(' '));
        }

        Ok(pos)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = self.key().0;
        let _ = write!(&mut buf, " ");
        match self.en_passant_square {
            Some(ep_square) => {
                let _ = write!(&mut buf, "{}", ep_square);
            }
            None => buf.push('-'),
        }

        let _ = write!(
            &mut buf,
            " {} {}",
            self.halfmove_clock, self.fullmove_clock
        );
        buf
    }

    fn write_castle_status<W: Write>(&self, w: &mut W) -> fmt::Result {
        if self.castle_status.is_empty() {
            return w.write_char('-');
        }

        if self.can_castle_kingside(Color::White) {
            w.write_char('K')?;
        }
        if self.can_castle_queenside(Color::White) {
            w.write_char('Q')?;
        }
        if self.can_castle_kingside(Color::Black) {
            w.write_char('k')?;
        }
        if self.can_castle_queenside(Color::Black) {
            w.write_char('q')?;
        }

        Ok(())
    }
}

fn parse_placement(board: &mut Board, field: &str) -> Result<(), FenParseError> {
    let mut ranks = field.split('/');
    for rank in 0..8u8 {
        let row = ranks.next().ok_or(FenParseError::UnexpectedEnd)?;
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(run) = c.to_digit(10) {
                if run < 1 || run > 8 {
                    return Err(FenParseError::InvalidDigit);
                }

                file += run as u8;
            } else {
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
                if file < 8 {
                    board.put(Square::new(file, rank), piece);
                }
                file += 1;
            }

            if file > 8 {
                return Err(FenParseError::FileDoesNotSumToEight);
            }
        }

        if file != 8 {
            return Err(FenParseError::FileDoesNotSumToEight);
        }
    }

    match ranks.next() {
        Some(_) => Err(FenParseError::UnexpectedChar('/')),
        None => Ok(()),
    }
}

fn parse_castle_status(field: &str) -> Result<CastleStatus, FenParseError> {
    if field == "-" {
        return Ok(CastleStatus::NONE);
    }

    field.chars().try_fold(CastleStatus::NONE, |status, c| {
        let right = match c {
            'K' => CastleStatus::WHITE_KINGSIDE,
            'Q' => CastleStatus::WHITE_QUEENSIDE,
            'k' => CastleStatus::BLACK_KINGSIDE,
            'q' => CastleStatus::BLACK_QUEENSIDE,
            _ => return Err(FenParseError::InvalidCastle),
        };

        Ok(status | right)
    })
}

// A clock that doesn't even start with a digit is reported as missing.
fn parse_clock(
    field: &str,
    missing: FenParseError,
    invalid: FenParseError,
) -> Result<u32, FenParseError> {
    if !field.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(missing);
    }

    field.parse().map_err(|_| invalid)
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
