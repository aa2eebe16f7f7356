//! Bitboard reader: the seam between the codec and whatever board type the
//! caller holds.
//!
//! The codec only ever asks "which squares hold this piece type of this
//! color". [`Position`] answers from its own bitboards; [`PieceMasks`] wraps raw
//! 64-bit masks (bit `i` set = square `i` occupied, least significant bit
//! first) for callers that keep their own board representation.

use chess_core::{Bitboard, Color, PieceKind, Position};

use crate::geometry::{NUM_COLORS, NUM_PIECES};

/// Read-only occupancy view of a position.
pub trait Occupancy {
    /// Squares holding `kind` pieces of `color`.
    fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard;

    /// Every square holding a piece of `color`.
    fn occupied_by(&self, color: Color) -> Bitboard {
        PieceKind::ALL
            .iter()
            .fold(Bitboard::EMPTY, |acc, &kind| acc | self.pieces(kind, color))
    }

    /// Every occupied square.
    fn occupied(&self) -> Bitboard {
        self.occupied_by(Color::White) | self.occupied_by(Color::Black)
    }
}

impl Occupancy for Position {
    #[inline]
    fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.bitboards.pieces(color, kind)
    }

    #[inline]
    fn occupied_by(&self, color: Color) -> Bitboard {
        self.bitboards.occupied_by(color)
    }

    #[inline]
    fn occupied(&self) -> Bitboard {
        self.bitboards.occupied()
    }
}

impl<T: Occupancy + ?Sized> Occupancy for &T {
    fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        (**self).pieces(kind, color)
    }

    fn occupied_by(&self, color: Color) -> Bitboard {
        (**self).occupied_by(color)
    }

    fn occupied(&self) -> Bitboard {
        (**self).occupied()
    }
}

/// Raw per-(color, kind) occupancy masks, indexed `[color][kind]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PieceMasks {
    pub masks: [[u64; NUM_PIECES]; NUM_COLORS],
}

impl PieceMasks {
    pub fn new(masks: [[u64; NUM_PIECES]; NUM_COLORS]) -> Self {
        Self { masks }
    }

    /// Snapshot any occupancy view into raw masks.
    pub fn capture<P: Occupancy>(pos: &P) -> Self {
        let mut masks = [[0u64; NUM_PIECES]; NUM_COLORS];
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                masks[color.idx()][kind.idx()] = pos.pieces(kind, color).0;
            }
        }
        Self { masks }
    }

    /// Builder used mostly by tests: add a piece on `square`.
    pub fn with(mut self, color: Color, kind: PieceKind, square: u8) -> Self {
        self.masks[color.idx()][kind.idx()] |= 1u64 << square;
        self
    }
}

impl Occupancy for PieceMasks {
    #[inline]
    fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        Bitboard(self.masks[color.idx()][kind.idx()])
    }
}

/// The occupied squares for one (kind, color) pair, lowest square first.
pub fn piece_squares<P: Occupancy + ?Sized>(pos: &P, kind: PieceKind, color: Color) -> Vec<u8> {
    pos.pieces(kind, color).squares().collect()
}

#[cfg(test)]
#[path = "occupancy_tests.rs"]
mod occupancy_tests;
