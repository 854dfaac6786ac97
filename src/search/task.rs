// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io;
use std::panic;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{Builder, JoinHandle};

use cancellation::CancellationTokenSource;

use crate::position::Position;
use crate::search::{SearchResult, Searcher};

#[derive(Clone, Debug, PartialEq)]
pub enum SearchStatus {
    InProgress,
    Finished(SearchResult),
}

/// A search running on its own thread. The searched position is a private
/// copy, so the caller's position can't change underneath it.
pub struct SearchTask {
    cts: CancellationTokenSource,
    receiver: Receiver<SearchResult>,
    handle: Option<JoinHandle<()>>,
    result: Option<SearchResult>,
}

impl SearchTask {
    pub fn spawn<S>(mut searcher: S, pos: Position, depth: u32) -> io::Result<SearchTask>
    where
        S: Searcher + Send + 'static,
    {
        let cts = CancellationTokenSource::new();
        let token = cts.token().clone();
        let (sender, receiver) = mpsc::channel();
        let handle = Builder::new().name("search".to_string()).spawn(move || {
            info!("searching {} at depth {}", pos.as_fen(), depth);
            let result = searcher.search(&pos, depth, &token);
            // The receiving end is gone if the task was dropped; nobody wants
            // the result then.
            let _ = sender.send(result);
        })?;

        Ok(SearchTask {
            cts,
            receiver,
            handle: Some(handle),
            result: None,
        })
    }

    /// Checks on the search without blocking.
    pub fn poll(&mut self) -> SearchStatus {
        if let Some(ref result) = self.result {
            return SearchStatus::Finished(result.clone());
        }

        match self.receiver.try_recv() {
            Ok(result) => SearchStatus::Finished(self.finish(result)),
            Err(TryRecvError::Empty) => SearchStatus::InProgress,
            Err(TryRecvError::Disconnected) => self.propagate_panic(),
        }
    }

    /// Blocks until the search is done.
    pub fn wait(mut self) -> SearchResult {
        if let Some(result) = self.result.take() {
            return result;
        }

        match self.receiver.recv() {
            Ok(result) => self.finish(result),
            Err(_) => self.propagate_panic(),
        }
    }

    /// Asks the search to stop. It finishes shortly after with the best move
    /// found so far; `poll` or `wait` still deliver the result.
    pub fn cancel(&self) {
        debug!("cancelling search");
        self.cts.cancel();
    }

    fn finish(&mut self, result: SearchResult) -> SearchResult {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        self.result = Some(result.clone());
        result
    }

    // The sender only disappears without sending if the search thread
    // panicked. Rethrow that panic here.
    fn propagate_panic(&mut self) -> ! {
        let payload = match self.handle.take().map(JoinHandle::join) {
            Some(Err(payload)) => payload,
            _ => Box::new("search thread exited without a result"),
        };

        panic::resume_unwind(payload)
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cts.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::{SearchStatus, SearchTask};
    use crate::eval::TableEvaluator;
    use crate::moves::Move;
    use crate::position::Position;
    use crate::search::NegamaxSearcher;

    fn searcher() -> NegamaxSearcher<TableEvaluator> {
        NegamaxSearcher::new().with_seed(1)
    }

    #[test]
    fn wait_for_result() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let task = SearchTask::spawn(searcher(), pos, 2).unwrap();
        let result = task.wait();
        assert_eq!(Some("a1a8".parse::<Move>().unwrap()), result.best_move);
    }

    #[test]
    fn poll_until_finished() {
        let pos = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mut task = SearchTask::spawn(searcher(), pos, 1).unwrap();
        let result = loop {
            match task.poll() {
                SearchStatus::InProgress => thread::sleep(Duration::from_millis(5)),
                SearchStatus::Finished(result) => break result,
            }
        };

        assert_eq!(Some("d1d5".parse::<Move>().unwrap()), result.best_move);
        // a finished task keeps reporting its result.
        assert_eq!(SearchStatus::Finished(result), task.poll());
    }

    #[test]
    fn cancel_deep_search() {
        let pos = Position::from_start_position();
        let task = SearchTask::spawn(searcher(), pos, 12).unwrap();
        task.cancel();
        let result = task.wait();
        assert!(result.cancelled);
    }
}
