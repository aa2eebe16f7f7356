//! Bidirectional tensor codec for chess positions and moves.
//!
//! - [`state`] turns a position into dense, compact or featurized tensors
//! - [`influence`] computes per-square attack/defense counts for knights,
//!   rooks, bishops and queens
//! - [`action`] maps moves to and from integers in `[0, 7 * 64 * 64)`
//! - [`policy`] turns from/to probability heads back into a legal move
//!
//! Every function here is pure: inputs are borrowed, outputs freshly
//! allocated, so encoding is safe to run from many threads at once.

pub mod action;
pub mod error;
pub mod geometry;
pub mod influence;
pub mod occupancy;
pub mod planes;
pub mod policy;
pub mod state;

pub use action::{
    decode_action, encode_action, Action, DecodedAction, NUM_ACTIONS, NUM_FROM_TO,
    NUM_PROMOTIONS,
};
pub use error::CodecError;
pub use geometry::*;
pub use influence::{
    influence_features, influence_layer, Family, Relation, FREE_SQUARES_LAYER,
    NUM_INFLUENCE_LAYERS,
};
pub use occupancy::{piece_squares, Occupancy, PieceMasks};
pub use planes::Planes;
pub use policy::{choose_move, choose_moves_batch, joint_distribution, DEFAULT_SAMPLE_ATTEMPTS};
pub use state::{
    encode, encode_batch, encode_compact, encode_dense, encode_featurized, CompactState,
    EncodeMode, EncodedState, NUM_FEATURIZED_LAYERS,
};
