//! Training sample generation for the chess tensor codec
//!
//! This crate provides:
//! - PGN parsing into game records with validation (ply count, forfeits)
//! - Sample generators producing (state, action, reward) and SARSA tuples
//! - A JSON sample cache keyed by source file and generator
//!
//! # Usage
//!
//! ```bash
//! # Generate featurized samples from a PGN file
//! cargo run -p chess_dataset -- generate --pgn games.pgn --generator random-white-state --encoding featurized
//!
//! # Inspect the encoding of a position
//! cargo run -p chess_dataset -- encode --fen "8/8/8/8/8/8/N7/R7 w - - 0 1" --mode featurized
//! ```

mod cache;
mod config;
mod error;
mod generator;
mod outcome;
mod pgn;

pub use cache::*;
pub use config::*;
pub use error::*;
pub use generator::*;
pub use outcome::*;
pub use pgn::*;
