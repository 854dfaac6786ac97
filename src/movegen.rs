// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation on the mailbox board.
//!
//! Attack detection and move generation feed into each other: a move is legal
//! only if the mover's king is not attacked afterwards, and "attacked" is
//! answered by generating the opponent's moves. The recursion is broken by
//! generating in one of two modes. `Generation::Moves` produces the squares a
//! piece may move to, castling included; legality is then checked by playing
//! each candidate on a clone. `Generation::Attacks` produces only the squares a
//! piece controls: no pawn pushes, no castling and no legality check, so it
//! never recurses.
use arrayvec::ArrayVec;

use crate::moves::Move;
use crate::position::Position;
use crate::types::{squares, Color, Direction, Piece, PieceKind, Square, DIAGONALS, ORTHOGONALS};

/// Destinations of a single piece. A queen in the middle of an empty board has
/// 27, the most of any piece.
pub type DestinationVec = ArrayVec<[Square; 32]>;

type TargetTable = Vec<ArrayVec<[Square; 8]>>;

static KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

static KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn target_table(offsets: &[(i8, i8); 8]) -> TargetTable {
    squares()
        .map(|sq| {
            offsets
                .iter()
                .filter_map(|&(file_delta, rank_delta)| sq.offset(file_delta, rank_delta))
                .collect()
        })
        .collect()
}

lazy_static! {
    static ref KNIGHT_TARGETS: TargetTable = target_table(&KNIGHT_OFFSETS);
    static ref KING_TARGETS: TargetTable = target_table(&KING_OFFSETS);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Generation {
    Moves,
    Attacks,
}

/// Squares the piece on `origin` may move to, ignoring whether the move leaves
/// its own king in check. An empty origin yields nothing.
pub fn pseudo_legal_destinations(pos: &Position, origin: Square) -> DestinationVec {
    destinations(pos, origin, Generation::Moves)
}

/// Squares the piece on `origin` attacks.
pub fn attack_destinations(pos: &Position, origin: Square) -> DestinationVec {
    destinations(pos, origin, Generation::Attacks)
}

/// Squares the piece on `origin` may legally move to.
pub fn legal_destinations(pos: &Position, origin: Square) -> DestinationVec {
    let color = match pos.piece_at(origin) {
        Some(piece) => piece.color,
        None => return DestinationVec::new(),
    };

    pseudo_legal_destinations(pos, origin)
        .into_iter()
        .filter(|&dest| !leaves_king_in_check(pos, Move::new(origin, dest), color))
        .collect()
}

/// Every legal move for `color`, pieces visited in board-scan order.
pub fn all_moves(pos: &Position, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for origin in pos.board().squares_of(color) {
        for dest in legal_destinations(pos, origin) {
            moves.push(Move::new(origin, dest));
        }
    }

    moves
}

/// True if `color` has at least one legal move. Equivalent to
/// `!all_moves(pos, color).is_empty()`, but stops at the first one found.
pub fn has_legal_move(pos: &Position, color: Color) -> bool {
    pos.board().squares_of(color).into_iter().any(|origin| {
        pseudo_legal_destinations(pos, origin)
            .into_iter()
            .any(|dest| !leaves_king_in_check(pos, Move::new(origin, dest), color))
    })
}

/// True if any piece of `color` attacks `target`.
pub fn attacked_by(pos: &Position, target: Square, color: Color) -> bool {
    pos.board()
        .pieces()
        .filter(|&(_, piece)| piece.color == color)
        .any(|(origin, _)| attack_destinations(pos, origin).contains(&target))
}

fn leaves_king_in_check(pos: &Position, mov: Move, color: Color) -> bool {
    let mut after = pos.clone();
    after.apply_move(mov);
    after.is_check(color)
}

fn destinations(pos: &Position, origin: Square, gen: Generation) -> DestinationVec {
    let mut out = DestinationVec::new();
    let piece = match pos.piece_at(origin) {
        Some(piece) => piece,
        None => return out,
    };

    match piece.kind {
        PieceKind::Pawn => pawn_destinations(pos, origin, piece.color, gen, &mut out),
        PieceKind::Rook => rook_destinations(pos, origin, piece.color, &mut out),
        PieceKind::Bishop => bishop_destinations(pos, origin, piece.color, &mut out),
        PieceKind::Queen => {
            rook_destinations(pos, origin, piece.color, &mut out);
            bishop_destinations(pos, origin, piece.color, &mut out);
        }
        PieceKind::Knight => step_destinations(pos, origin, piece.color, &KNIGHT_TARGETS, &mut out),
        PieceKind::King => {
            step_destinations(pos, origin, piece.color, &KING_TARGETS, &mut out);
            if gen == Generation::Moves {
                castle_destinations(pos, origin, piece.color, &mut out);
            }
        }
    }

    out
}

fn pawn_destinations(
    pos: &Position,
    origin: Square,
    color: Color,
    gen: Generation,
    out: &mut DestinationVec,
) {
    let board = pos.board();
    let forward = color.forward();

    if gen == Generation::Moves {
        if let Some(single) = origin.offset(0, forward) {
            if !board.is_occupied(single) {
                out.push(single);
                if origin.rank() == color.pawn_rank() {
                    if let Some(double) = origin.offset(0, 2 * forward) {
                        if !board.is_occupied(double) {
                            out.push(double);
                        }
                    }
                }
            }
        }
    }

    for &file_delta in &[-1, 1] {
        let diagonal = match origin.offset(file_delta, forward) {
            Some(sq) => sq,
            None => continue,
        };

        match gen {
            // A pawn controls both diagonals whether or not anything stands there.
            Generation::Attacks => out.push(diagonal),
            Generation::Moves => {
                if board.is_occupied_by(diagonal, color.toggle()) {
                    out.push(diagonal);
                }
            }
        }
    }

    if gen == Generation::Moves {
        if let Some(ep_square) = pos.en_passant_square() {
            // Only a pawn of the side that didn't just double-step may take.
            if ep_square.rank() == en_passant_capture_rank(color)
                && ep_square.rank() as i8 - origin.rank() as i8 == forward
                && (ep_square.file() as i8 - origin.file() as i8).abs() == 1
            {
                out.push(ep_square);
            }
        }
    }
}

/// The rank an en-passant target lies on when `color` is the one capturing.
fn en_passant_capture_rank(color: Color) -> u8 {
    match color {
        Color::White => 2,
        Color::Black => 5,
    }
}

fn rook_destinations(pos: &Position, origin: Square, color: Color, out: &mut DestinationVec) {
    for &dir in &ORTHOGONALS {
        slide(pos, origin, color, dir, out);
    }
}

fn bishop_destinations(pos: &Position, origin: Square, color: Color, out: &mut DestinationVec) {
    for &dir in &DIAGONALS {
        slide(pos, origin, color, dir, out);
    }
}

/// Walks from `origin` in one direction until the edge of the board or a piece.
/// An enemy piece's square is included (a capture), a friendly one is not.
fn slide(pos: &Position, origin: Square, color: Color, dir: Direction, out: &mut DestinationVec) {
    let mut current = origin;
    while let Some(next) = current.towards(dir) {
        match pos.piece_at(next) {
            None => out.push(next),
            Some(piece) => {
                if piece.color != color {
                    out.push(next);
                }
                break;
            }
        }

        current = next;
    }
}

fn step_destinations(
    pos: &Position,
    origin: Square,
    color: Color,
    table: &TargetTable,
    out: &mut DestinationVec,
) {
    for &target in &table[origin.index()] {
        if !pos.board().is_occupied_by(target, color) {
            out.push(target);
        }
    }
}

/// Castling candidates for a king standing on its home square. The king may
/// not castle out of, through, or into check.
fn castle_destinations(pos: &Position, origin: Square, color: Color, out: &mut DestinationVec) {
    let rank = color.home_rank();
    if origin != Square::new(4, rank) {
        return;
    }

    let board = pos.board();
    let rook = Some(Piece::new(PieceKind::Rook, color));
    let enemy = color.toggle();
    let empty = |files: &[u8]| files.iter().all(|&f| !board.is_occupied(Square::new(f, rank)));
    let safe = |files: &[u8]| {
        files
            .iter()
            .all(|&f| !attacked_by(pos, Square::new(f, rank), enemy))
    };

    if pos.can_castle_kingside(color)
        && board.piece_at(Square::new(7, rank)) == rook
        && empty(&[5, 6])
        && safe(&[4, 5, 6])
    {
        out.push(Square::new(6, rank));
    }

    if pos.can_castle_queenside(color)
        && board.piece_at(Square::new(0, rank)) == rook
        && empty(&[1, 2, 3])
        && safe(&[4, 3, 2])
    {
        out.push(Square::new(2, rank));
    }
}
