// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use cancellation::CancellationToken;

use hermes::book::OpeningBook;
use hermes::eval::{BoardEvaluator, Score, TableEvaluator};
use hermes::search::{CsvDataRecorder, NegamaxSearcher, SearchStatus, SearchTask, Searcher};
use hermes::movegen;
use hermes::{perft, Color, Move, Position};

fn searcher() -> NegamaxSearcher<TableEvaluator> {
    NegamaxSearcher::new().with_seed(3)
}

fn best_move(fen: &str, depth: u32) -> Option<Move> {
    let pos = Position::from_fen(fen).unwrap();
    searcher()
        .search(&pos, depth, CancellationToken::none())
        .best_move
}

#[test]
fn finds_back_rank_mate() {
    assert_eq!(
        Some("a1a8".parse().unwrap()),
        best_move("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 2)
    );
}

#[test]
fn avoids_losing_the_queen() {
    // the queen on d4 is attacked by the pawn on e5; any safe square will do.
    let fen = "4k3/8/8/4p3/3Q4/8/8/4K3 w - - 0 1";
    let pos = Position::from_fen(fen).unwrap();
    let mov = best_move(fen, 2).unwrap();
    let mut after = pos.clone();
    after.apply_move(mov);
    let result = searcher().search(&after, 1, CancellationToken::none());
    let mut reply = after.clone();
    reply.apply_move(result.best_move.unwrap());
    let eval = TableEvaluator::new();
    assert!(eval.evaluate(&reply) > Score::new(500));
}

// Negamax without pruning or memoization, for comparison.
fn plain_negamax(
    eval: &TableEvaluator,
    pos: &Position,
    depth: u32,
    sign: i32,
) -> (Score, Option<Move>) {
    let moves = movegen::all_moves(pos, pos.side_to_move());
    if depth == 0 || moves.is_empty() {
        return (eval.evaluate(pos).relative_to(sign), None);
    }

    let mut best = (-Score::INFINITY, None);
    for mov in moves {
        let mut child = pos.clone();
        child.apply_move(mov);
        let value = -plain_negamax(eval, &child, depth - 1, -sign).0;
        if value > best.0 {
            best = (value, Some(mov));
        }
    }

    best
}

#[test]
fn pruning_agrees_with_plain_negamax() {
    let eval = TableEvaluator::new();
    for fen in &[
        "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
        "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1",
        "4k3/8/8/8/8/8/r7/R3K3 b - - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ] {
        let pos = Position::from_fen(fen).unwrap();
        let (score, mov) = plain_negamax(&eval, &pos, 2, pos.side_to_move().sign());
        let result = searcher().search(&pos, 2, CancellationToken::none());
        assert_eq!(mov, result.best_move, "best move differs for {}", fen);
        assert_eq!(score, result.score, "score differs for {}", fen);
    }
}

#[test]
fn memo_and_cutoffs_shrink_the_tree() {
    let pos = Position::from_start_position();
    let result = searcher().search(&pos, 3, CancellationToken::none());
    assert!(result.cache_hits > 0, "no transpositions were reused");
    assert!(result.cutoffs > 0, "no branches were pruned");

    // the full tree has one node per position reachable in at most three plies.
    let full_tree = 1 + perft(&pos, 1) + perft(&pos, 2) + perft(&pos, 3);
    assert!(result.nodes_searched < full_tree);
}

#[test]
fn black_searches_for_black() {
    // black wins the undefended rook; white-relative evaluation would not.
    let fen = "4k3/8/8/8/8/8/r7/R3K3 b - - 0 1";
    assert_eq!(Some("a2a1".parse().unwrap()), best_move(fen, 1));
}

#[test]
fn book_move_is_returned_without_search() {
    let pos = Position::from_start_position();
    let mut book = OpeningBook::new();
    book.record(pos.key(), "e2e4".parse().unwrap());
    book.record(pos.key(), "d2d4".parse().unwrap());
    let book = Arc::new(book);
    let mut searcher = searcher().with_book(book.clone());
    for _ in 0..8 {
        let result = searcher.search(&pos, 3, CancellationToken::none());
        assert!(result.from_book);
        assert!(book.moves(&pos.key()).contains(&result.best_move.unwrap()));
        assert_eq!(0, result.nodes_searched);
    }
}

#[test]
fn search_does_not_touch_the_callers_position() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let fen = pos.as_fen();
    searcher().search(&pos, 2, CancellationToken::none());
    assert_eq!(fen, pos.as_fen());
    assert_eq!(Color::White, pos.side_to_move());
}

#[test]
fn background_task_can_be_cancelled() {
    let task = SearchTask::spawn(searcher(), Position::from_start_position(), 10).unwrap();
    task.cancel();
    let result = task.wait();
    assert!(result.cancelled);
}

#[test]
fn background_task_reports_completion() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut task = SearchTask::spawn(searcher(), pos, 2).unwrap();
    loop {
        if let SearchStatus::Finished(result) = task.poll() {
            assert_eq!(Some("a1a8".parse().unwrap()), result.best_move);
            break;
        }
        std::thread::yield_now();
    }
}

#[test]
fn statistics_are_recorded() {
    let recorder = Arc::new(CsvDataRecorder::new(Vec::new()));
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut searcher = searcher().with_recorder(recorder.clone());
    searcher.search(&pos, 2, CancellationToken::none());
    drop(searcher);

    let recorder = Arc::try_unwrap(recorder).ok().unwrap();
    let text = String::from_utf8(recorder.into_inner().unwrap()).unwrap();
    let row = text.lines().nth(1).unwrap();
    assert!(row.starts_with("6k1/5ppp/8/8/8/8/8/R5K1 w -,2,a1a8,20000,"));
}
