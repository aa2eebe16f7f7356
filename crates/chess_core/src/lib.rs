//! Core chess primitives: squares, pieces, bitboards, positions, legal move
//! generation and move text (UCI and SAN).

pub mod bitboard;
pub mod board;
pub mod error;
pub mod movegen;
pub mod san;
pub mod types;
pub mod uci;

pub use bitboard::*;
pub use board::*;
pub use error::*;
pub use movegen::*;
pub use san::parse_san;
pub use types::*;
pub use uci::*;
