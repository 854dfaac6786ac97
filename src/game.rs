// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::book::{BookError, OpeningBook};
use crate::config::EngineConfig;
use crate::eval::TableEvaluator;
use crate::movegen::{self, DestinationVec};
use crate::moves::Move;
use crate::position::Position;
use crate::search::{CsvDataRecorder, DataRecorder, NegamaxSearcher, SearchResult, SearchTask};
use crate::status::GameStatus;
use crate::types::Square;

/// Errors from `Game::play`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    /// The move is not among the legal moves of the side to move.
    NotLegal(Move),

    /// The game is already over.
    GameOver(GameStatus),
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IllegalMove::NotLegal(mov) => write!(f, "illegal move: {}", mov),
            IllegalMove::GameOver(status) => write!(f, "the game is over ({})", status),
        }
    }
}

impl Error for IllegalMove {}

/// A game in progress: the live position, the opening book and the engine
/// settings. Moves enter the game only through `play`, which keeps the
/// repetition history and the book up to date.
pub struct Game {
    config: EngineConfig,
    position: Position,
    book: Arc<OpeningBook>,
    recorder: Option<Arc<dyn DataRecorder>>,
    moves: Vec<Move>,
    status: GameStatus,
}

impl Game {
    /// Starts a game from the initial position, loading the opening book if
    /// one is configured. A missing or broken book is not an error.
    pub fn new(config: EngineConfig) -> Game {
        Game::from_position(config, Position::from_start_position())
    }

    pub fn from_position(config: EngineConfig, position: Position) -> Game {
        let book = match config.book_path {
            Some(ref path) => OpeningBook::load(path),
            None => OpeningBook::new(),
        };

        let recorder = config.stats_path.as_ref().and_then(|path| {
            match CsvDataRecorder::create(path) {
                Ok(recorder) => Some(Arc::new(recorder) as Arc<dyn DataRecorder>),
                Err(err) => {
                    warn!(
                        "not recording search statistics, {}: {}",
                        path.display(),
                        err
                    );
                    None
                }
            }
        });

        let status = position.status();
        Game {
            config,
            position,
            book: Arc::new(book),
            recorder,
            moves: vec![],
            status,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    /// Moves played so far, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn legal_destinations(&self, origin: Square) -> DestinationVec {
        match self.position.piece_at(origin) {
            Some(piece) if piece.color == self.position.side_to_move() => {
                movegen::legal_destinations(&self.position, origin)
            }
            _ => DestinationVec::new(),
        }
    }

    /// Plays a move for the side to move and reports the resulting status.
    /// When recording is on, the move goes into the opening book.
    pub fn play(&mut self, mov: Move) -> Result<GameStatus, IllegalMove> {
        let record = self.config.record_book;
        self.play_move(mov, record)
    }

    fn play_move(&mut self, mov: Move, record: bool) -> Result<GameStatus, IllegalMove> {
        if self.status.is_over() {
            return Err(IllegalMove::GameOver(self.status));
        }

        if !self
            .legal_destinations(mov.source())
            .contains(&mov.destination())
        {
            return Err(IllegalMove::NotLegal(mov));
        }

        if record {
            let key = self.position.key();
            if Arc::make_mut(&mut self.book).record(key, mov) {
                debug!("recorded {} into the opening book", mov);
            }
        }

        self.position.apply_move(mov);
        self.position.record_history();
        self.moves.push(mov);
        self.status = self.position.status();
        if self.status.is_over() {
            info!("game over after {}: {}", mov, self.status);
        }

        Ok(self.status)
    }

    /// Starts the engine thinking about the current position on a background
    /// thread. The task works on its own copy of the position and the book.
    pub fn start_search(&self) -> io::Result<SearchTask> {
        let mut searcher: NegamaxSearcher<TableEvaluator> =
            NegamaxSearcher::new().with_book(self.book.clone());
        if let Some(ref recorder) = self.recorder {
            searcher = searcher.with_recorder(recorder.clone());
        }

        SearchTask::spawn(searcher, self.position.clone(), self.config.depth)
    }

    /// Plays the move a finished search settled on. The engine's own moves
    /// are never recorded into the opening book.
    pub fn play_search_result(
        &mut self,
        result: &SearchResult,
    ) -> Result<Option<GameStatus>, IllegalMove> {
        match result.best_move {
            Some(mov) => self.play_move(mov, false).map(Some),
            None => Ok(None),
        }
    }

    /// Saves the opening book if moves are being recorded into it.
    pub fn shutdown(&self) -> Result<(), BookError> {
        match self.config.book_path {
            Some(ref path) if self.config.record_book => self.book.save(path),
            _ => Ok(()),
        }
    }
}
