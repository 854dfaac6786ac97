// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::sync::Arc;
use std::time::Instant;

use cancellation::CancellationToken;
use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::book::OpeningBook;
use crate::eval::{BoardEvaluator, Score};
use crate::movegen;
use crate::moves::Move;
use crate::position::{Position, PositionKey};
use crate::search::{DataRecorder, Record};

// Bails out of the current node with the best value seen so far if the search
// has been cancelled.
macro_rules! cancel_poll {
    ($ct:expr, $best:expr) => {
        if $ct.is_canceled() {
            return Err($best);
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// The move to play, or `None` if the side to move has no legal move.
    pub best_move: Option<Move>,

    /// Score of `best_move`, relative to the side to move.
    pub score: Score,
    pub nodes_searched: u64,
    pub cache_hits: u64,
    pub cutoffs: u64,
    pub from_book: bool,

    /// The search was cancelled before it finished; `best_move` is the best of
    /// the root moves searched to completion.
    pub cancelled: bool,
}

pub trait Searcher {
    fn search(&mut self, pos: &Position, depth: u32, ct: &CancellationToken) -> SearchResult;
}

/// Fixed-depth negamax with alpha-beta pruning.
///
/// At the root the opening book is consulted first; a book hit is returned
/// without searching. Positions reached during one search are memoized by
/// their key so transpositions are scored once. The memo does not outlive the
/// search.
pub struct NegamaxSearcher<E> {
    evaluator: E,
    book: Option<Arc<OpeningBook>>,
    recorder: Option<Arc<dyn DataRecorder>>,
    rng: StdRng,
}

impl<E: BoardEvaluator> NegamaxSearcher<E> {
    pub fn new() -> NegamaxSearcher<E> {
        NegamaxSearcher {
            evaluator: Default::default(),
            book: None,
            recorder: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_book(mut self, book: Arc<OpeningBook>) -> NegamaxSearcher<E> {
        self.book = Some(book);
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn DataRecorder>) -> NegamaxSearcher<E> {
        self.recorder = Some(recorder);
        self
    }

    /// Seeds the generator used to pick among book moves.
    pub fn with_seed(mut self, seed: u64) -> NegamaxSearcher<E> {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn book_move(&mut self, pos: &Position) -> Option<Move> {
        let book = self.book.as_ref()?;
        let mov = book.choose(&pos.key(), &mut self.rng)?;
        if movegen::legal_destinations(pos, mov.source()).contains(&mov.destination()) {
            debug!("book move {} for {}", mov, pos.key());
            Some(mov)
        } else {
            warn!("ignoring illegal book move {} for {}", mov, pos.key());
            None
        }
    }

    fn record(&self, pos: &Position, depth: u32, result: &SearchResult, start: Instant) {
        let recorder = match self.recorder {
            Some(ref recorder) => recorder,
            None => return,
        };

        let elapsed = start.elapsed();
        recorder.record(&Record {
            key: pos.key().to_string(),
            depth,
            best_move: result
                .best_move
                .map(|m| m.to_string())
                .unwrap_or_default(),
            score: result.score.centipawns(),
            nodes: result.nodes_searched,
            cache_hits: result.cache_hits,
            cutoffs: result.cutoffs,
            elapsed_ms: elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis()),
            from_book: result.from_book,
        });
    }
}

impl<E: BoardEvaluator> Default for NegamaxSearcher<E> {
    fn default() -> NegamaxSearcher<E> {
        NegamaxSearcher::new()
    }
}

impl<E: BoardEvaluator> Searcher for NegamaxSearcher<E> {
    fn search(&mut self, pos: &Position, depth: u32, ct: &CancellationToken) -> SearchResult {
        let start = Instant::now();
        if let Some(mov) = self.book_move(pos) {
            let result = SearchResult {
                best_move: Some(mov),
                score: Score::ZERO,
                nodes_searched: 0,
                cache_hits: 0,
                cutoffs: 0,
                from_book: true,
                cancelled: false,
            };
            info!("book move {}", mov);
            self.record(pos, depth, &result, start);
            return result;
        }

        let mut search = Search::new(&self.evaluator, ct);
        let sign = pos.side_to_move().sign();
        let (score, cancelled) =
            match search.negamax(pos, depth, -Score::INFINITY, Score::INFINITY, sign, true) {
                Ok(score) => (score, false),
                Err(score) => (score, true),
            };

        let result = SearchResult {
            best_move: search.best_move,
            score,
            nodes_searched: search.nodes,
            cache_hits: search.cache_hits,
            cutoffs: search.cutoffs,
            from_book: false,
            cancelled,
        };

        debug!(
            "searched {} nodes, {} cache hits, {} cutoffs",
            result.nodes_searched, result.cache_hits, result.cutoffs
        );
        if cancelled {
            warn!("search cancelled at depth {}", depth);
        }
        match result.best_move {
            Some(mov) => info!("best move {} (score: {})", mov, score),
            None => info!("no legal moves (score: {})", score),
        }

        self.record(pos, depth, &result, start);
        result
    }
}

/// State of one top-level search.
struct Search<'a, E> {
    evaluator: &'a E,
    ct: &'a CancellationToken,

    // Values of positions already searched, from the point of view of the side
    // that moved into them.
    memo: HashMap<PositionKey, Score>,
    best_move: Option<Move>,
    nodes: u64,
    cache_hits: u64,
    cutoffs: u64,
}

impl<'a, E: BoardEvaluator> Search<'a, E> {
    fn new(evaluator: &'a E, ct: &'a CancellationToken) -> Search<'a, E> {
        Search {
            evaluator,
            ct,
            memo: HashMap::new(),
            best_move: None,
            nodes: 0,
            cache_hits: 0,
            cutoffs: 0,
        }
    }

    /// Scores `pos` for the side whose sign is `sign`. `Err` carries the best
    /// value found before the search was cancelled.
    fn negamax(
        &mut self,
        pos: &Position,
        depth: u32,
        mut alpha: Score,
        beta: Score,
        sign: i32,
        is_root: bool,
    ) -> Result<Score, Score> {
        self.nodes += 1;
        if depth == 0 {
            return Ok(self.evaluator.evaluate(pos).relative_to(sign));
        }

        let moves = movegen::all_moves(pos, pos.side_to_move());
        if moves.is_empty() {
            return Ok(self.evaluator.evaluate(pos).relative_to(sign));
        }

        let mut best = -Score::INFINITY;
        for mov in moves {
            cancel_poll!(self.ct, best);
            let mut child = pos.clone();
            child.apply_move(mov);
            let key = child.key();
            let value = match self.memo.get(&key) {
                Some(&value) => {
                    self.cache_hits += 1;
                    value
                }
                None => match self.negamax(&child, depth - 1, -beta, -alpha, -sign, false) {
                    Ok(score) => {
                        let value = -score;
                        self.memo.insert(key, value);
                        value
                    }
                    // A partially searched subtree says nothing reliable about
                    // this move, so only completed moves count.
                    Err(_) => return Err(best),
                },
            };

            if value > best {
                best = value;
                if is_root {
                    self.best_move = Some(mov);
                }
            }

            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }

        Ok(best)
    }
}
