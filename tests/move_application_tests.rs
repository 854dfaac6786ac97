// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use hermes::movegen;
use hermes::{Color, Move, Piece, PieceKind, Position, Square};

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

fn after(fen: &str, moves: &[&str]) -> Position {
    let mut pos = Position::from_fen(fen).unwrap();
    for text in moves {
        let mov: Move = text.parse().unwrap();
        pos.apply_move(mov);
    }
    pos
}

fn changed_squares(before: &Position, after: &Position) -> usize {
    (0..64)
        .map(Square::from_scan_index)
        .filter(|&s| before.piece_at(s) != after.piece_at(s))
        .count()
}

#[test]
fn double_step_sets_en_passant_target() {
    let pos = after(hermes::START_FEN, &["e2e4"]);
    assert_eq!(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        pos.as_fen()
    );
}

#[test]
fn clocks() {
    let pos = after(hermes::START_FEN, &["g1f3", "g8f6", "b1c3"]);
    assert_eq!(3, pos.halfmove_clock());
    assert_eq!(2, pos.fullmove_clock());

    let pos = after(hermes::START_FEN, &["g1f3", "e7e5"]);
    assert_eq!(0, pos.halfmove_clock());
    assert_eq!(2, pos.fullmove_clock());
}

#[test]
fn kingside_castle_moves_the_rook() {
    let pos = after("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["e1g1"]);
    assert_eq!(
        Some(Piece::new(PieceKind::King, Color::White)),
        pos.piece_at(sq("g1"))
    );
    assert_eq!(
        Some(Piece::new(PieceKind::Rook, Color::White)),
        pos.piece_at(sq("f1"))
    );
    assert_eq!(None, pos.piece_at(sq("h1")));
    assert!(!pos.can_castle_kingside(Color::White));
    assert!(!pos.can_castle_queenside(Color::White));
    assert!(pos.can_castle_kingside(Color::Black));
    assert!(pos.can_castle_queenside(Color::Black));
}

#[test]
fn queenside_castle_moves_the_rook() {
    let pos = after("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", &["e8c8"]);
    assert_eq!(
        Some(Piece::new(PieceKind::Rook, Color::Black)),
        pos.piece_at(sq("d8"))
    );
    assert_eq!(None, pos.piece_at(sq("a8")));
    assert_eq!("2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2", pos.as_fen());
}

#[test]
fn rook_move_clears_one_side() {
    let pos = after("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["h1h4"]);
    assert!(!pos.can_castle_kingside(Color::White));
    assert!(pos.can_castle_queenside(Color::White));
}

#[test]
fn captured_corner_rook_loses_its_castle() {
    let pos = after("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["a1a8"]);
    assert!(!pos.can_castle_queenside(Color::Black));
    assert!(pos.can_castle_kingside(Color::Black));
    assert!(!pos.can_castle_queenside(Color::White));
    assert_eq!("R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1", pos.as_fen());
}

#[test]
fn promotion_is_to_a_queen() {
    let pos = after("8/P6k/8/8/8/8/p7/4K3 w - - 0 1", &["a7a8", "a2a1"]);
    assert_eq!(
        Some(Piece::new(PieceKind::Queen, Color::White)),
        pos.piece_at(sq("a8"))
    );
    assert_eq!(
        Some(Piece::new(PieceKind::Queen, Color::Black)),
        pos.piece_at(sq("a1"))
    );
}

#[test]
fn moves_touch_few_squares() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ];

    for fen in fens.iter() {
        let pos = Position::from_fen(fen).unwrap();
        for mov in movegen::all_moves(&pos, pos.side_to_move()) {
            let mut next = pos.clone();
            next.apply_move(mov);
            let piece = pos.piece_at(mov.source()).unwrap();
            let file_jump = (mov.destination().file() as i8 - mov.source().file() as i8).abs();
            let expected = if piece.kind == PieceKind::King && file_jump == 2 {
                4
            } else if piece.kind == PieceKind::Pawn
                && Some(mov.destination()) == pos.en_passant_square()
            {
                3
            } else {
                2
            };

            assert_eq!(
                expected,
                changed_squares(&pos, &next),
                "{} in {}",
                mov,
                fen
            );
        }
    }
}

#[test]
fn clones_do_not_share_boards() {
    let pos = Position::from_start_position();
    let mut clone = pos.clone();
    clone.apply_move("e2e4".parse().unwrap());
    assert_eq!(hermes::START_FEN, pos.as_fen());
}
