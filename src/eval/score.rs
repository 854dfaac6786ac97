// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde_derive::{Deserialize, Serialize};

/// Score is the output of a board evaluation function, in centipawns. Positive
/// scores favor White unless the score has been made relative to a side with
/// `relative_to`.
///
/// Checkmate is an ordinary value, `Score::MATE`, large enough that no sum of
/// material and positional terms reaches it.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Score(i32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const MATE: Score = Score(20000);

    /// Bound outside any score an evaluator can produce, used to open the
    /// search window.
    pub const INFINITY: Score = Score(1_000_000);

    pub fn new(centipawns: i32) -> Score {
        Score(centipawns)
    }

    pub fn centipawns(self) -> i32 {
        self.0
    }

    pub fn is_mate(self) -> bool {
        self.0.abs() >= Score::MATE.0
    }

    /// Multiplies by the sign of a side, so that a White-relative score becomes
    /// relative to `sign`'s side.
    pub fn relative_to(self, sign: i32) -> Score {
        Score(self.0 * sign)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 >= Score::MATE.0 {
            write!(f, "#")
        } else if self.0 <= -Score::MATE.0 {
            write!(f, "#-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score(-self.0)
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, other: Score) -> Score {
        Score(self.0 + other.0)
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, other: Score) -> Score {
        Score(self.0 - other.0)
    }
}

impl Mul<i32> for Score {
    type Output = Score;

    fn mul(self, factor: i32) -> Score {
        Score(self.0 * factor)
    }
}
