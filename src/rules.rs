//! Per-piece movement rules.
//!
//! The rule set is deliberately reduced: geometry plus no self-capture. There is
//! no check detection, castling, en passant or promotion, and a move that leaves
//! the mover's own king attacked is still legal.

use shakmaty::{Color, Piece, Role};

use crate::board::{Board, Square};

/// Whether moving the piece on `from` to `to` is legal.
///
/// Does not check that the piece belongs to the side to move; callers do that
/// before asking.
pub fn is_legal_move(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    let target = board.get(to);
    if target.is_some_and(|t| t.color == piece.color) {
        return false;
    }

    let d_row = to.row() as i8 - from.row() as i8;
    let d_col = to.col() as i8 - from.col() as i8;

    match piece.role {
        Role::Pawn => is_legal_pawn_move(board, piece.color, from, d_row, d_col, target),
        Role::Knight => is_legal_knight_move(d_row, d_col),
        Role::Bishop => is_legal_bishop_move(board, from, to),
        Role::Rook => is_legal_rook_move(board, from, to),
        Role::Queen => is_legal_rook_move(board, from, to) || is_legal_bishop_move(board, from, to),
        Role::King => is_legal_king_move(d_row, d_col),
    }
}

/// Every square the piece on `from` may move to, row-major.
pub fn legal_destinations(board: &Board, from: Square) -> Vec<Square> {
    Square::all()
        .filter(|&to| to != from && is_legal_move(board, from, to))
        .collect()
}

/// Row step of a pawn of the given color. White moves toward row 0.
#[inline]
pub const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

/// Row from which a pawn of the given color may advance two squares.
#[inline]
pub const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::White => 6,
        Color::Black => 1,
    }
}

fn is_legal_pawn_move(
    board: &Board,
    color: Color,
    from: Square,
    d_row: i8,
    d_col: i8,
    target: Option<Piece>,
) -> bool {
    let direction = pawn_direction(color);

    // Straight advance, never onto an occupied square
    if d_col == 0 && target.is_none() {
        if d_row == direction {
            return true;
        }
        if from.row() == pawn_start_row(color) && d_row == 2 * direction {
            return from
                .offset(direction, 0)
                .is_some_and(|middle| board.get(middle).is_none());
        }
    }

    // Diagonal step only as a capture
    d_col.abs() == 1 && d_row == direction && target.is_some()
}

fn is_legal_knight_move(d_row: i8, d_col: i8) -> bool {
    matches!((d_row.abs(), d_col.abs()), (1, 2) | (2, 1))
}

fn is_legal_bishop_move(board: &Board, from: Square, to: Square) -> bool {
    let d_row = (to.row() as i8 - from.row() as i8).abs();
    let d_col = (to.col() as i8 - from.col() as i8).abs();
    d_row == d_col && d_row != 0 && board.is_path_clear(from, to)
}

fn is_legal_rook_move(board: &Board, from: Square, to: Square) -> bool {
    let straight = from.row() == to.row() || from.col() == to.col();
    straight && from != to && board.is_path_clear(from, to)
}

fn is_legal_king_move(d_row: i8, d_col: i8) -> bool {
    d_row.abs() <= 1 && d_col.abs() <= 1
}
