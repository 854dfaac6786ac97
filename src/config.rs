// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::path::PathBuf;

pub const DEFAULT_DEPTH: u32 = 3;
pub const DEFAULT_BOOK_PATH: &str = "book.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Plies searched per engine move.
    pub depth: u32,

    /// Where the opening book is loaded from and, when recording, saved to.
    /// `None` runs without a book.
    pub book_path: Option<PathBuf>,

    /// Add every confirmed move to the opening book and save it on shutdown.
    pub record_book: bool,

    /// CSV file receiving one row of statistics per engine search.
    pub stats_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            depth: DEFAULT_DEPTH,
            book_path: Some(PathBuf::from(DEFAULT_BOOK_PATH)),
            record_book: false,
            stats_path: None,
        }
    }
}

impl EngineConfig {
    /// A configuration that touches no files.
    pub fn without_files(depth: u32) -> EngineConfig {
        EngineConfig {
            depth,
            book_path: None,
            record_book: false,
            stats_path: None,
        }
    }
}
