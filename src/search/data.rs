// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use csv::Writer;
use serde_derive::{Deserialize, Serialize};

/// Statistics about a single top-level search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub depth: u32,
    pub best_move: String,
    pub score: i32,
    pub nodes: u64,
    pub cache_hits: u64,
    pub cutoffs: u64,
    pub elapsed_ms: u64,
    pub from_book: bool,
}

pub trait DataRecorder: Send + Sync {
    fn record(&self, rec: &Record);
}

pub struct CsvDataRecorder<W: Write> {
    writer: Mutex<Writer<W>>,
}

impl<W: Write> CsvDataRecorder<W> {
    pub fn new(writer: W) -> CsvDataRecorder<W> {
        CsvDataRecorder {
            writer: Mutex::new(Writer::from_writer(writer)),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Option<W> {
        self.writer
            .into_inner()
            .ok()
            .and_then(|writer| writer.into_inner().ok())
    }
}

impl CsvDataRecorder<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<CsvDataRecorder<File>> {
        Ok(CsvDataRecorder::new(File::create(path)?))
    }
}

impl<W: Write + Send> DataRecorder for CsvDataRecorder<W> {
    fn record(&self, rec: &Record) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(_) => return,
        };

        let result = writer
            .serialize(rec)
            .map_err(io::Error::from)
            .and_then(|_| writer.flush());
        if let Err(err) = result {
            warn!("failed to record search statistics: {}", err);
        }
    }
}
