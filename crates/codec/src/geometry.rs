//! Board geometry constants and square arithmetic.
//!
//! Squares are numbered `rank * 8 + file` with a1 = 0 and h8 = 63, so
//! `row = square / 8` and `col = square % 8`.

use chess_core::{Color, PieceKind};

pub const NUM_PIECES: usize = 6;
pub const NUM_COLORS: usize = 2;
pub const NUM_SQUARES: usize = 64;
pub const NUM_ROWS: usize = 8;
pub const NUM_COLS: usize = 8;

/// One occupancy layer per (color, piece type).
pub const NUM_OCCUPANCY_LAYERS: usize = NUM_COLORS * NUM_PIECES;

#[inline]
pub fn row_of(square: u8) -> usize {
    square as usize / NUM_COLS
}

#[inline]
pub fn col_of(square: u8) -> usize {
    square as usize % NUM_COLS
}

#[inline]
pub fn square_of(row: usize, col: usize) -> u8 {
    (row * NUM_COLS + col) as u8
}

/// Bounds-checked square lookup for signed coordinates; off-board is `None`.
#[inline]
pub fn square_at(row: i8, col: i8) -> Option<u8> {
    chess_core::sq(col, row)
}

/// Occupancy layer for a piece: White pieces fill layers 0-5 and Black
/// pieces 6-11, pawn through king, regardless of the side to move.
#[inline]
pub fn occupancy_layer(color: Color, kind: PieceKind) -> usize {
    color.idx() * NUM_PIECES + kind.idx()
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod geometry_tests;
