// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::analysis::Analysis;
use crate::eval::tables;
use crate::eval::{BoardEvaluator, Score};
use crate::position::Position;
use crate::types::{Color, PieceKind};

const QUEEN_WEIGHT: i32 = 900;
const ROOK_WEIGHT: i32 = 500;
const BISHOP_WEIGHT: i32 = 330;
const KNIGHT_WEIGHT: i32 = 320;
const PAWN_WEIGHT: i32 = 100;
const PAWN_FORMATION_WEIGHT: i32 = -30;

/// Material, pawn structure and piece-square tables, with the king switching
/// to its endgame table once the game reaches its ending phase.
pub struct TableEvaluator;

impl TableEvaluator {
    pub fn new() -> TableEvaluator {
        TableEvaluator
    }
}

impl Default for TableEvaluator {
    fn default() -> TableEvaluator {
        TableEvaluator
    }
}

impl BoardEvaluator for TableEvaluator {
    fn evaluate(&self, pos: &Position) -> Score {
        if pos.is_checkmate(Color::Black) {
            return Score::MATE;
        }
        if pos.is_checkmate(Color::White) {
            return -Score::MATE;
        }

        let analysis = Analysis::new(pos);
        let material = [
            (PieceKind::Queen, QUEEN_WEIGHT),
            (PieceKind::Rook, ROOK_WEIGHT),
            (PieceKind::Bishop, BISHOP_WEIGHT),
            (PieceKind::Knight, KNIGHT_WEIGHT),
            (PieceKind::Pawn, PAWN_WEIGHT),
        ]
        .iter()
        .map(|&(kind, weight)| evaluate_metric(weight, |c| analysis.count(c, kind) as i32))
        .sum::<i32>();

        let doubled_pawns =
            evaluate_metric(PAWN_FORMATION_WEIGHT, |c| analysis.doubled_pawns(c) as i32);
        let blocked_pawns =
            evaluate_metric(PAWN_FORMATION_WEIGHT, |c| analysis.blocked_pawns(c) as i32);
        let isolated_pawns =
            evaluate_metric(PAWN_FORMATION_WEIGHT, |c| analysis.isolated_pawns(c) as i32);

        let phase = analysis.game_phase();
        let placement: i32 = pos
            .board()
            .pieces()
            .map(|(sq, piece)| {
                let table = tables::table_for(piece.kind, phase);
                match piece.color {
                    Color::White => table[sq.index()],
                    Color::Black => -table[sq.flip_vertical().index()],
                }
            })
            .sum();

        Score::new(material + doubled_pawns + blocked_pawns + isolated_pawns + placement)
    }
}

fn evaluate_metric<F>(weight: i32, func: F) -> i32
where
    F: Fn(Color) -> i32,
{
    let white = func(Color::White);
    let black = func(Color::Black);
    weight * (white - black)
}
