// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs;
use std::path::PathBuf;

use hermes::book::{BookError, OpeningBook};
use hermes::{EngineConfig, Game, Move, Position};

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("hermes-{}-{}.json", name, std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn missing_book_is_empty() {
    let path = temp_path("missing");
    assert!(OpeningBook::load(&path).is_empty());
    match OpeningBook::from_file(&path) {
        Err(BookError::Io(_)) => {}
        other => panic!("expected an i/o error, got {:?}", other),
    }
}

#[test]
fn corrupt_book_is_empty() {
    let path = temp_path("corrupt");
    fs::write(&path, "this is not json").unwrap();
    assert!(OpeningBook::load(&path).is_empty());
    match OpeningBook::from_file(&path) {
        Err(BookError::Format(_)) => {}
        other => panic!("expected a format error, got {:?}", other),
    }
    fs::remove_file(&path).unwrap();
}

#[test]
fn save_and_load() {
    let path = temp_path("roundtrip");
    let key = Position::from_start_position().key();
    let mut book = OpeningBook::new();
    book.record(key.clone(), "e2e4".parse().unwrap());
    book.record(key.clone(), "c2c4".parse().unwrap());
    book.save(&path).unwrap();

    let loaded = OpeningBook::load(&path);
    assert_eq!(book.moves(&key), loaded.moves(&key));

    let mut temp = path.clone().into_os_string();
    temp.push(".tmp");
    assert!(!PathBuf::from(temp).exists());
    fs::remove_file(&path).unwrap();
}

#[test]
fn recording_game_saves_on_shutdown() {
    let path = temp_path("recording");
    let mut config = EngineConfig::without_files(1);
    config.book_path = Some(path.clone());
    config.record_book = true;

    let mut game = Game::new(config.clone());
    let start = game.position().key();
    game.play("d2d4".parse().unwrap()).unwrap();
    let after_d4 = game.position().key();
    game.play("g8f6".parse().unwrap()).unwrap();
    game.shutdown().unwrap();

    let book = OpeningBook::load(&path);
    assert_eq!(2, book.len());
    assert_eq!(&["d2d4".parse::<Move>().unwrap()], book.moves(&start));
    assert_eq!(&["g8f6".parse::<Move>().unwrap()], book.moves(&after_d4));

    // the next game starts from the saved book and its engine follows it.
    let game = Game::new(config);
    let result = game.start_search().unwrap().wait();
    assert!(result.from_book);
    assert_eq!(Some("d2d4".parse::<Move>().unwrap()), result.best_move);
    fs::remove_file(&path).unwrap();
}

#[test]
fn not_recording_leaves_the_book_alone() {
    let path = temp_path("readonly");
    let mut config = EngineConfig::without_files(1);
    config.book_path = Some(path.clone());

    let mut game = Game::new(config);
    game.play("e2e4".parse().unwrap()).unwrap();
    game.shutdown().unwrap();
    assert!(!path.exists());
}
