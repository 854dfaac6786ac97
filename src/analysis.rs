// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind, Square, TableIndex, PIECE_KINDS};

/// Plies after which the game counts as an ending regardless of material.
const ENDING_PLIES: u32 = 40;

/// Coarse material (queen 9, rook 5, minors 3, pawn 1) below which a side
/// counts as stripped down to an ending.
const ENDING_MATERIAL: u32 = 14;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Opening,
    Ending,
}

/// Provider of common board analyses upon a static position. It is suitable for use in board
/// evaluators, where analysis queries can be aggressively cached when evaluating a single,
/// immutable board position.
pub struct Analysis<'a> {
    pos: &'a Position,
    counts: [[u32; 6]; 2],
    pawn_files: [[u32; 8]; 2],
}

impl<'a> Analysis<'a> {
    pub fn new(pos: &'a Position) -> Analysis<'a> {
        let mut counts = [[0; 6]; 2];
        let mut pawn_files = [[0; 8]; 2];
        for (sq, piece) in pos.board().pieces() {
            counts[piece.color.as_index()][piece.kind.as_index()] += 1;
            if piece.kind == PieceKind::Pawn {
                pawn_files[piece.color.as_index()][sq.file() as usize] += 1;
            }
        }

        Analysis {
            pos,
            counts,
            pawn_files,
        }
    }

    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.counts[color.as_index()][kind.as_index()]
    }

    /// Material in whole pawns, kings excluded. Only used to judge the game
    /// phase; the evaluator scores material on its own scale.
    pub fn coarse_material(&self, color: Color) -> u32 {
        PIECE_KINDS
            .iter()
            .map(|&kind| {
                let worth = match kind {
                    PieceKind::Queen => 9,
                    PieceKind::Rook => 5,
                    PieceKind::Bishop | PieceKind::Knight => 3,
                    PieceKind::Pawn => 1,
                    PieceKind::King => 0,
                };
                worth * self.count(color, kind)
            })
            .sum()
    }

    pub fn game_phase(&self) -> GamePhase {
        if self.pos.played_plies() > ENDING_PLIES
            || (self.coarse_material(Color::White) < ENDING_MATERIAL
                && self.coarse_material(Color::Black) < ENDING_MATERIAL)
        {
            GamePhase::Ending
        } else {
            GamePhase::Opening
        }
    }

    /// Number of extra pawns stacked on files: a file holding n pawns of this
    /// color contributes n - 1.
    pub fn doubled_pawns(&self, color: Color) -> u32 {
        self.pawn_files[color.as_index()]
            .iter()
            .map(|&n| n.saturating_sub(1))
            .sum()
    }

    /// Number of pawns with an enemy piece directly in front of them.
    pub fn blocked_pawns(&self, color: Color) -> u32 {
        self.pawns(color)
            .filter(|sq| match sq.offset(0, color.forward()) {
                Some(ahead) => self.pos.board().is_occupied_by(ahead, color.toggle()),
                None => false,
            })
            .count() as u32
    }

    /// Number of pawns with no friendly pawn on either adjacent file.
    pub fn isolated_pawns(&self, color: Color) -> u32 {
        let files = &self.pawn_files[color.as_index()];
        self.pawns(color)
            .filter(|sq| {
                let file = sq.file() as usize;
                let left = file > 0 && files[file - 1] > 0;
                let right = file < 7 && files[file + 1] > 0;
                !left && !right
            })
            .count() as u32
    }

    fn pawns(&self, color: Color) -> impl Iterator<Item = Square> + 'a {
        let pawn = Piece::new(PieceKind::Pawn, color);
        self.pos
            .board()
            .pieces()
            .filter(move |&(_, p)| p == pawn)
            .map(|(sq, _)| sq)
    }
}
