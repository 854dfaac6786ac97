// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::movegen;
use crate::position::Position;
use crate::types::Color;

/// Plies without a capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_PLIES: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveRule,
    Repetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn is_draw(self) -> bool {
        match self {
            GameStatus::Stalemate | GameStatus::FiftyMoveRule | GameStatus::Repetition => true,
            _ => false,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "game in progress"),
            GameStatus::Checkmate {
                winner: Color::White,
            } => write!(f, "checkmate, white wins"),
            GameStatus::Checkmate {
                winner: Color::Black,
            } => write!(f, "checkmate, black wins"),
            GameStatus::Stalemate => write!(f, "draw by stalemate"),
            GameStatus::FiftyMoveRule => write!(f, "draw by the fifty-move rule"),
            GameStatus::Repetition => write!(f, "draw by threefold repetition"),
        }
    }
}

impl Position {
    /// `color` is in check and has no legal move.
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_check(color) && !movegen::has_legal_move(self, color)
    }

    /// The side to move is not in check and has no legal move.
    pub fn is_stalemate(&self) -> bool {
        let color = self.side_to_move();
        !self.is_check(color) && !movegen::has_legal_move(self, color)
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock() >= FIFTY_MOVE_PLIES
    }

    /// Draws by rule: the fifty-move rule or a threefold repetition in the
    /// recorded history. Stalemate is reported separately.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.has_threefold_repetition()
    }

    /// Classifies the position after a confirmed move. Checkmate wins over the
    /// draw rules.
    pub fn status(&self) -> GameStatus {
        for &color in &[Color::White, Color::Black] {
            if self.is_checkmate(color) {
                return GameStatus::Checkmate {
                    winner: color.toggle(),
                };
            }
        }

        if self.is_stalemate() {
            GameStatus::Stalemate
        } else if self.is_fifty_move_draw() {
            GameStatus::FiftyMoveRule
        } else if self.has_threefold_repetition() {
            GameStatus::Repetition
        } else {
            GameStatus::Ongoing
        }
    }
}
