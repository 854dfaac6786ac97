// Copyright 2017-2020 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

use crate::moves::Move;
use crate::position::PositionKey;

#[derive(Debug)]
pub enum BookError {
    Io(io::Error),
    Format(serde_json::Error),
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BookError::Io(err) => write!(f, "opening book i/o failed: {}", err),
            BookError::Format(err) => write!(f, "opening book is malformed: {}", err),
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BookError::Io(err) => Some(err),
            BookError::Format(err) => Some(err),
        }
    }
}

impl From<io::Error> for BookError {
    fn from(err: io::Error) -> BookError {
        BookError::Io(err)
    }
}

impl From<serde_json::Error> for BookError {
    fn from(err: serde_json::Error) -> BookError {
        BookError::Format(err)
    }
}

/// Moves played from a position in earlier games, keyed by the position's
/// key. Persisted as a JSON object mapping keys to lists of coordinate moves.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OpeningBook {
    entries: HashMap<PositionKey, Vec<Move>>,
}

impl OpeningBook {
    pub fn new() -> OpeningBook {
        Default::default()
    }

    /// Reads a book from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<OpeningBook, BookError> {
        let file = File::open(path)?;
        let book = serde_json::from_reader(BufReader::new(file))?;
        Ok(book)
    }

    /// Reads a book from `path`, starting from an empty book if the file is
    /// missing or unreadable.
    pub fn load<P: AsRef<Path>>(path: P) -> OpeningBook {
        let path = path.as_ref();
        match OpeningBook::from_file(path) {
            Ok(book) => {
                info!(
                    "loaded opening book from {} ({} positions)",
                    path.display(),
                    book.len()
                );
                book
            }
            Err(err) => {
                warn!(
                    "starting with an empty opening book, {}: {}",
                    path.display(),
                    err
                );
                OpeningBook::new()
            }
        }
    }

    /// Writes the book to `path`. The book goes to a sibling temporary file
    /// first and is renamed over `path`, so a failed save never leaves a
    /// truncated book behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BookError> {
        let path = path.as_ref();
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = Path::new(&temp_name);

        {
            let mut writer = BufWriter::new(File::create(temp_path)?);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }

        fs::rename(temp_path, path)?;
        info!(
            "saved opening book to {} ({} positions)",
            path.display(),
            self.len()
        );
        Ok(())
    }

    pub fn moves(&self, key: &PositionKey) -> &[Move] {
        self.entries.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Picks one of the moves recorded for `key` uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, key: &PositionKey, rng: &mut R) -> Option<Move> {
        self.moves(key).choose(rng).cloned()
    }

    /// Records that `mov` was played from `key`. Returns false if it was
    /// already in the book.
    pub fn record(&mut self, key: PositionKey, mov: Move) -> bool {
        let moves = self.entries.entry(key).or_insert_with(Vec::new);
        if moves.contains(&mov) {
            return false;
        }

        moves.push(mov);
        true
    }

    pub fn contains(&self, key: &PositionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of positions in the book.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::OpeningBook;
    use crate::position::Position;

    #[test]
    fn record_is_idempotent() {
        let key = Position::from_start_position().key();
        let mut book = OpeningBook::new();
        assert!(book.record(key.clone(), "e2e4".parse().unwrap()));
        assert!(!book.record(key.clone(), "e2e4".parse().unwrap()));
        assert!(book.record(key.clone(), "d2d4".parse().unwrap()));
        assert_eq!(2, book.moves(&key).len());
        assert_eq!(1, book.len());
    }

    #[test]
    fn choose_from_recorded_moves() {
        let key = Position::from_start_position().key();
        let mut book = OpeningBook::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(None, book.choose(&key, &mut rng));

        book.record(key.clone(), "e2e4".parse().unwrap());
        book.record(key.clone(), "g1f3".parse().unwrap());
        for _ in 0..16 {
            let mov = book.choose(&key, &mut rng).unwrap();
            assert!(book.moves(&key).contains(&mov));
        }
    }

    #[test]
    fn json_layout() {
        let key = Position::from_start_position().key();
        let mut book = OpeningBook::new();
        book.record(key, "e2e4".parse().unwrap());
        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(
            r#"{"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq":["e2e4"]}"#,
            json
        );

        let back: OpeningBook = serde_json::from_str(&json).unwrap();
        assert_eq!(1, back.len());
    }
}
