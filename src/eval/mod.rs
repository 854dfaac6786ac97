// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::position::Position;

mod score;
mod table_evaluator;
pub mod tables;

pub use score::Score;
pub use table_evaluator::TableEvaluator;

/// A static evaluation function. Scores are from White's point of view.
pub trait BoardEvaluator: Default {
    fn evaluate(&self, pos: &Position) -> Score;
}
