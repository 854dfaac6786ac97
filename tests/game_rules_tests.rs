// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use hermes::movegen;
use hermes::{Color, EngineConfig, Game, GameStatus, Move, Position};

fn mv(text: &str) -> Move {
    text.parse().unwrap()
}

fn play(pos: &mut Position, moves: &[&str]) {
    for text in moves {
        let mov = mv(text);
        assert!(movegen::legal_destinations(pos, mov.source()).contains(&mov.destination()));
        pos.apply_move(mov);
    }
}

#[test]
fn fools_mate() {
    let mut pos = Position::from_start_position();
    play(&mut pos, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(pos.is_check(Color::White));
    assert!(pos.is_checkmate(Color::White));
    assert!(!pos.is_stalemate());
    assert!(movegen::all_moves(&pos, Color::White).is_empty());
}

#[test]
fn fifty_move_rule() {
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/7n/R3K3 w - - 0 1").unwrap();
    for _ in 0..25 {
        assert!(!pos.is_fifty_move_draw());
        play(&mut pos, &["a1a2", "e8d8", "a2a1", "d8e8"]);
    }

    assert_eq!(100, pos.halfmove_clock());
    assert!(pos.is_fifty_move_draw());
    assert!(pos.is_draw());
    assert_eq!(GameStatus::FiftyMoveRule, pos.status());

    play(&mut pos, &["a1a2", "e8d8", "a2h2"]);
    assert_eq!(0, pos.halfmove_clock());
    assert!(!pos.is_draw());
}

#[test]
fn checkmate_and_stalemate_are_exclusive() {
    let fens = [
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        "7k/5K2/6Q1/8/8/8/8/8 b - - 0 1",
        "4k3/4Q3/4K3/8/8/8/8/8 b - - 0 1",
        "k7/8/1Q6/8/8/8/8/4K3 b - - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ];

    let mut mates = 0;
    let mut stalemates = 0;
    for fen in fens.iter() {
        let pos = Position::from_fen(fen).unwrap();
        let mate = pos.is_checkmate(pos.side_to_move());
        let stalemate = pos.is_stalemate();
        assert!(!(mate && stalemate), "{}", fen);
        mates += mate as u32;
        stalemates += stalemate as u32;
    }

    assert_eq!(2, mates);
    assert_eq!(2, stalemates);
}

#[test]
fn threefold_repetition() {
    let mut pos = Position::from_start_position();
    for _ in 0..2 {
        for text in &["b1c3", "b8c6", "c3b1", "c6b8"] {
            pos.apply_move(mv(text));
            pos.record_history();
        }
    }

    assert!(!pos.has_threefold_repetition());
    pos.apply_move(mv("b1c3"));
    pos.record_history();
    assert!(pos.has_threefold_repetition());
    assert_eq!(GameStatus::Repetition, pos.status());
}

#[test]
fn game_reports_status_after_each_move() {
    let mut game = Game::new(EngineConfig::without_files(1));
    assert_eq!(Ok(GameStatus::Ongoing), game.play(mv("f2f3")));
    assert_eq!(Ok(GameStatus::Ongoing), game.play(mv("e7e5")));
    assert_eq!(Ok(GameStatus::Ongoing), game.play(mv("g2g4")));
    assert_eq!(
        Ok(GameStatus::Checkmate {
            winner: Color::Black
        }),
        game.play(mv("d8h4"))
    );
    assert!(game.status().is_over());
    assert!(!game.status().is_draw());
}
