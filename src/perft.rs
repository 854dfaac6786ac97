// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::movegen;
use crate::position::Position;

/// Counts the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = movegen::all_moves(pos, pos.side_to_move());
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .par_iter()
        .map(|&mov| {
            let mut new_pos = pos.clone();
            new_pos.apply_move(mov);
            perft(&new_pos, depth - 1)
        })
        .sum()
}

/// Node counts for each move from `pos`, the usual way of narrowing down a
/// perft mismatch.
pub fn divide(pos: &Position, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return vec![];
    }

    movegen::all_moves(pos, pos.side_to_move())
        .par_iter()
        .map(|&mov| {
            let mut new_pos = pos.clone();
            new_pos.apply_move(mov);
            (mov.to_string(), perft(&new_pos, depth - 1))
        })
        .collect()
}
