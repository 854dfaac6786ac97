// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::types::Square;

/// A move is a source and a destination square, nothing more. Castling is
/// encoded as the king's two-square move and promotion always yields a queen,
/// so neither needs extra bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    source: Square,
    destination: Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    WrongLength,
    InvalidSource,
    InvalidDestination,
}

impl Move {
    pub fn new(source: Square, destination: Square) -> Move {
        Move {
            source,
            destination,
        }
    }

    pub fn source(self) -> Square {
        self.source
    }

    pub fn destination(self) -> Square {
        self.destination
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Move, MoveParseError> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(MoveParseError::WrongLength);
        }

        let source = s[0..2]
            .parse()
            .map_err(|_| MoveParseError::InvalidSource)?;
        let destination = s[2..4]
            .parse()
            .map_err(|_| MoveParseError::InvalidDestination)?;
        Ok(Move::new(source, destination))
    }
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveParseError::WrongLength => write!(f, "moves are written as four characters"),
            MoveParseError::InvalidSource => write!(f, "invalid source square"),
            MoveParseError::InvalidDestination => write!(f, "invalid destination square"),
        }
    }
}

impl std::error::Error for MoveParseError {}

// Moves are persisted in the opening book in their coordinate form.
impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Move, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
