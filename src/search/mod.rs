// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod data;
mod searcher;
mod task;

pub use data::{CsvDataRecorder, DataRecorder, Record};
pub use searcher::{NegamaxSearcher, SearchResult, Searcher};
pub use task::{SearchStatus, SearchTask};
