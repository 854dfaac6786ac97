// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod analysis;
mod board;
pub mod book;
mod config;
mod console;
pub mod eval;
mod game;
pub mod movegen;
mod moves;
mod perft;
mod position;
pub mod search;
mod status;
mod types;

pub use analysis::{Analysis, GamePhase};
pub use board::Board;
pub use config::EngineConfig;
pub use console::ConsoleSession;
pub use game::{Game, IllegalMove};
pub use moves::{Move, MoveParseError};
pub use perft::{divide, perft};
pub use position::{FenParseError, Position, PositionKey, START_FEN};
pub use status::{GameStatus, FIFTY_MOVE_PLIES};
pub use types::{CastleStatus, Color, Piece, PieceKind, Square, SquareParseError};
