// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use cancellation::CancellationToken;
use clap::{App, Arg, ArgMatches, SubCommand};

use hermes::eval::TableEvaluator;
use hermes::search::{CsvDataRecorder, NegamaxSearcher, Searcher};
use hermes::{perft, Color, ConsoleSession, EngineConfig, Game, Position};

fn main() {
    env_logger::init();
    let fen_arg = Arg::with_name("FEN")
        .help("FEN string for a board position")
        .required(true)
        .index(1);
    let depth_arg = Arg::with_name("depth")
        .help("Depth of move tree to search")
        .value_name("DEPTH")
        .short("d")
        .long("depth")
        .takes_value(true);
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg.clone())
                .arg(depth_arg.clone().required(true)),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Search a board position for the best move")
                .arg(fen_arg)
                .arg(depth_arg.clone().default_value("3"))
                .arg(
                    Arg::with_name("stats")
                        .help("CSV file to write search statistics to")
                        .value_name("FILE")
                        .long("stats")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a game on the terminal")
                .arg(
                    Arg::with_name("engine")
                        .help("Side played by the engine")
                        .long("engine")
                        .takes_value(true)
                        .possible_values(&["white", "black", "none"])
                        .default_value("black"),
                )
                .arg(depth_arg.default_value("3"))
                .arg(
                    Arg::with_name("book")
                        .help("Opening book file")
                        .value_name("FILE")
                        .long("book")
                        .takes_value(true)
                        .default_value("book.json"),
                )
                .arg(
                    Arg::with_name("record")
                        .help("Record played moves into the opening book")
                        .long("record"),
                )
                .arg(
                    Arg::with_name("stats")
                        .help("CSV file to write search statistics to")
                        .value_name("FILE")
                        .long("stats")
                        .takes_value(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("search", Some(matches)) => run_search(matches),
        ("play", Some(matches)) => run_play(matches),
        _ => {
            println!("{}", matches.usage());
            process::exit(1);
        }
    }
}

fn parse_fen_or_exit(matches: &ArgMatches) -> Position {
    let fen = matches.value_of("FEN").unwrap_or_default();
    match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            println!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let pos = parse_fen_or_exit(matches);
    let depth = value_t_or_exit!(matches, "depth", u32);

    println!("fen:   {}", pos.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();
    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&pos, i);
        let duration = start.elapsed();
        let ms = duration.as_secs() * 1000 + u64::from(duration.subsec_millis());
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

fn run_search(matches: &ArgMatches) -> ! {
    let pos = parse_fen_or_exit(matches);
    let depth = value_t_or_exit!(matches, "depth", u32);

    println!("fen:   {}", pos.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();

    let mut searcher: NegamaxSearcher<TableEvaluator> = NegamaxSearcher::new();
    if let Some(path) = matches.value_of("stats") {
        match CsvDataRecorder::create(path) {
            Ok(recorder) => searcher = searcher.with_recorder(Arc::new(recorder)),
            Err(err) => {
                println!("can't write statistics to {}: {}", path, err);
                process::exit(1);
            }
        }
    }

    let result = searcher.search(&pos, depth, CancellationToken::none());
    match result.best_move {
        Some(mov) => println!("best move: {}", mov),
        None => println!("best move: (none)"),
    }
    println!("    score: {}", result.score);
    println!("    nodes: {}", result.nodes_searched);
    process::exit(0);
}

fn run_play(matches: &ArgMatches) -> ! {
    // "none" is the one accepted value that doesn't parse as a color.
    let engine = matches
        .value_of("engine")
        .and_then(|side| side.parse::<Color>().ok());

    let config = EngineConfig {
        depth: value_t_or_exit!(matches, "depth", u32),
        book_path: matches.value_of("book").map(PathBuf::from),
        record_book: matches.is_present("record"),
        stats_path: matches.value_of("stats").map(PathBuf::from),
    };

    let session = ConsoleSession::new(Game::new(config), engine);
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = session.run(stdin.lock(), stdout.lock()) {
        println!("error: {}", err);
        process::exit(1);
    }

    process::exit(0);
}
