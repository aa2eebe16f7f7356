//! Bitboard set type.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the board.
//! Bit 0 = a1, bit 1 = b1, ..., bit 63 = h8.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A set of squares on the chess board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const ALL: Bitboard = Bitboard(!0);

    /// Create a bitboard with a single square set.
    #[inline(always)]
    pub const fn from_square(sq: u8) -> Self {
        Bitboard(1u64 << sq)
    }

    /// Build a bitboard from a list of squares. Squares >= 64 are ignored.
    pub fn from_squares(squares: &[u8]) -> Self {
        let mut bb = Bitboard::EMPTY;
        for &sq in squares.iter().filter(|&&sq| sq < 64) {
            bb.set(sq);
        }
        bb
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if a specific square is set. Squares outside the board are never set.
    #[inline(always)]
    pub const fn contains(self, sq: u8) -> bool {
        sq < 64 && (self.0 & (1u64 << sq)) != 0
    }

    #[inline(always)]
    pub fn set(&mut self, sq: u8) {
        self.0 |= 1u64 << sq;
    }

    #[inline(always)]
    pub fn clear(&mut self, sq: u8) {
        self.0 &= !(1u64 << sq);
    }

    /// Population count.
    #[inline(always)]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Index of the least significant set bit, or None if empty.
    #[inline(always)]
    pub const fn lsb(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Get and remove the least significant bit.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<u8> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Occupied squares in ascending order.
    ///
    /// Iteration ends as soon as no set bits remain, so a sparse mask never
    /// visits the empty high squares.
    #[inline]
    pub fn squares(self) -> Bitboard {
        self
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

/// Iterator over set bits in a bitboard, lowest square first.
impl Iterator for Bitboard {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.popcount() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

#[cfg(test)]
#[path = "bitboard_tests.rs"]
mod bitboard_tests;
