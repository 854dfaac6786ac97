// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::{self, BufRead, Write};

use crate::game::Game;
use crate::moves::Move;
use crate::status::GameStatus;
use crate::types::{Color, Square};

/// A line-oriented game between a human at a terminal and, optionally, the
/// engine. Moves are typed in coordinate notation (`e2e4`).
pub struct ConsoleSession {
    game: Game,
    engine: Option<Color>,
}

impl ConsoleSession {
    pub fn new(game: Game, engine: Option<Color>) -> ConsoleSession {
        ConsoleSession { game, engine }
    }

    /// Plays until `quit`, the end of input or the end of the game. The
    /// opening book is saved even when reading or writing fails.
    pub fn run<R, W>(mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let result = self.play_lines(reader, &mut writer);
        if let Err(err) = self.game.shutdown() {
            warn!("failed to save the opening book: {}", err);
        }

        result
    }

    fn play_lines<R, W>(&mut self, reader: R, writer: &mut W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(writer, "{}", self.game.position())?;
        self.engine_turn(writer)?;
        for maybe_line in reader.lines() {
            if self.game.status().is_over() {
                break;
            }

            let line = maybe_line?;
            let components: Vec<_> = line.split_whitespace().collect();
            match components.split_first().unwrap_or((&"", &[])) {
                (&"", []) => {}
                (&"quit", []) => break,
                (&"help", []) => self.handle_help(writer)?,
                (&"board", []) => writeln!(writer, "{}", self.game.position())?,
                (&"fen", []) => writeln!(writer, "{}", self.game.position().as_fen())?,
                (&"moves", [square]) => self.handle_moves(writer, square)?,
                (&"go", []) => self.engine_move(writer)?,
                (&mov, []) => self.handle_move(writer, mov)?,
                _ => writeln!(writer, "unrecognized command")?,
            }
        }

        Ok(())
    }

    fn handle_help<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "e2e4        play a move")?;
        writeln!(w, "moves e2    list the legal destinations of a piece")?;
        writeln!(w, "go          let the engine move")?;
        writeln!(w, "board, fen  show the position")?;
        writeln!(w, "quit        leave the game")
    }

    fn handle_moves<W: Write>(&self, w: &mut W, square: &str) -> io::Result<()> {
        let origin: Square = match square.parse() {
            Ok(sq) => sq,
            Err(err) => return writeln!(w, "invalid square {}: {}", square, err),
        };

        let destinations: Vec<String> = self
            .game
            .legal_destinations(origin)
            .iter()
            .map(|sq| sq.to_string())
            .collect();
        writeln!(w, "{}", destinations.join(" "))
    }

    fn handle_move<W: Write>(&mut self, w: &mut W, text: &str) -> io::Result<()> {
        let mov: Move = match text.parse() {
            Ok(mov) => mov,
            Err(err) => return writeln!(w, "{}: {}", text, err),
        };

        match self.game.play(mov) {
            Ok(status) => {
                self.report(w, status)?;
                self.engine_turn(w)
            }
            Err(err) => writeln!(w, "{}", err),
        }
    }

    fn engine_turn<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if self.engine == Some(self.game.position().side_to_move()) && !self.game.status().is_over()
        {
            self.engine_move(w)
        } else {
            Ok(())
        }
    }

    fn engine_move<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if self.game.status().is_over() {
            return writeln!(w, "{}", self.game.status());
        }

        let result = self.game.start_search()?.wait();
        match self.game.play_search_result(&result) {
            Ok(Some(status)) => {
                if let Some(mov) = result.best_move {
                    writeln!(w, "engine plays {}", mov)?;
                }
                self.report(w, status)
            }
            Ok(None) => writeln!(w, "engine has no move"),
            Err(err) => writeln!(w, "{}", err),
        }
    }

    fn report<W: Write>(&self, w: &mut W, status: GameStatus) -> io::Result<()> {
        if status.is_over() {
            writeln!(w, "{}", self.game.position())?;
            writeln!(w, "{}", status)
        } else if self.game.position().is_check(self.game.position().side_to_move()) {
            writeln!(w, "check")
        } else {
            Ok(())
        }
    }
}
