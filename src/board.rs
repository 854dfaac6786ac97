// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt::{self, Write};

use crate::types::{squares, Color, Piece, Square};

/// An 8x8 mailbox. Each square holds at most one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Places a piece on a square, returning whatever was there before.
    pub fn put(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.squares[sq.index()].replace(piece)
    }

    /// Empties a square, returning whatever was there before.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    pub fn is_occupied(&self, sq: Square) -> bool {
        self.piece_at(sq).is_some()
    }

    pub fn is_occupied_by(&self, sq: Square, color: Color) -> bool {
        match self.piece_at(sq) {
            Some(piece) => piece.color == color,
            None => false,
        }
    }

    /// All squares holding exactly this piece, in board-scan order.
    pub fn find_pieces(&self, piece: Piece) -> Vec<Square> {
        self.pieces()
            .filter(|&(_, p)| p == piece)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Occupied squares of one color, in board-scan order.
    pub fn squares_of(&self, color: Color) -> Vec<Square> {
        self.pieces()
            .filter(|&(_, p)| p.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Every occupied square with its piece, in board-scan order.
    pub fn pieces<'a>(&'a self) -> impl Iterator<Item = (Square, Piece)> + 'a {
        squares().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Writes the piece-placement field of a FEN string.
    pub fn write_placement<W: Write>(&self, w: &mut W) -> fmt::Result {
        for rank in 0..8 {
            let mut empty_squares = 0;
            for file in 0..8 {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(w, "{}", empty_squares)?;
                        }
                        write!(w, "{}", piece)?;
                        empty_squares = 0;
                    }
                    None => empty_squares += 1,
                }
            }

            if empty_squares != 0 {
                write!(w, "{}", empty_squares)?;
            }

            if rank != 7 {
                w.write_char('/')?;
            }
        }

        Ok(())
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in 0..8 {
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", 8 - rank)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 0..8u8 {
            write!(f, " {} ", (b'a' + file) as char)?;
        }

        writeln!(f)
    }
}
