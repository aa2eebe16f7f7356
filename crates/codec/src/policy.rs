//! Policy decoding
//!
//! Turns a two-head model output (64 "from" probabilities and 64 "to"
//! probabilities) into a legal move. The joint probability of a (from, to) pair
//! is the product of its two heads. Up to `attempts` pairs are sampled from the
//! joint distribution; the first that names a legal move wins. When the budget
//! runs out the legal move with the highest joint probability is played.
//!
//! Pairs that reach the last rank with a pawn resolve to the queen promotion.

use chess_core::{legal_moves, Move, PieceKind, Position};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::CodecError;
use crate::geometry::NUM_SQUARES;

pub const DEFAULT_SAMPLE_ATTEMPTS: usize = 10;

/// Outer product of the two heads, flattened as `from * 64 + to`.
pub fn joint_distribution(from: &[f32], to: &[f32]) -> Result<Vec<f32>, CodecError> {
    check_head(from)?;
    check_head(to)?;
    let mut joint = Vec::with_capacity(NUM_SQUARES * NUM_SQUARES);
    for &pf in from {
        joint.extend(to.iter().map(|&pt| pf * pt));
    }
    Ok(joint)
}

fn check_head(head: &[f32]) -> Result<(), CodecError> {
    if head.len() != NUM_SQUARES {
        return Err(CodecError::DistributionShape {
            expected: NUM_SQUARES,
            actual: head.len(),
        });
    }
    Ok(())
}

/// Legal move for a (from, to) pair; underpromotions are never chosen.
fn match_pair(legal: &[Move], from: u8, to: u8) -> Option<Move> {
    legal.iter().copied().find(|m| {
        m.from == from && m.to == to && matches!(m.promo, None | Some(PieceKind::Queen))
    })
}

/// Highest joint probability among legal moves, first in generation order on
/// ties.
fn best_legal(legal: &[Move], joint: &[f32]) -> Option<Move> {
    let mut best: Option<(Move, f32)> = None;
    for &mv in legal {
        if !matches!(mv.promo, None | Some(PieceKind::Queen)) {
            continue;
        }
        let p = joint[mv.from as usize * NUM_SQUARES + mv.to as usize];
        if best.map_or(true, |(_, bp)| p > bp) {
            best = Some((mv, p));
        }
    }
    best.map(|(mv, _)| mv)
}

/// Pick a legal move for `pos` from the two policy heads.
///
/// Returns `Ok(None)` only when `pos` has no legal moves.
pub fn choose_move<R: Rng + ?Sized>(
    pos: &Position,
    from: &[f32],
    to: &[f32],
    attempts: usize,
    rng: &mut R,
) -> Result<Option<Move>, CodecError> {
    let joint = joint_distribution(from, to)?;
    let legal = legal_moves(pos);
    if legal.is_empty() {
        return Ok(None);
    }

    match WeightedIndex::new(&joint) {
        Ok(dist) => {
            for _ in 0..attempts {
                let idx = dist.sample(rng);
                let (f, t) = ((idx / NUM_SQUARES) as u8, (idx % NUM_SQUARES) as u8);
                if let Some(mv) = match_pair(&legal, f, t) {
                    return Ok(Some(mv));
                }
            }
            debug!(attempts, "no legal move sampled, using best legal move");
        }
        Err(e) => debug!(error = %e, "policy not samplable, using best legal move"),
    }

    Ok(best_legal(&legal, &joint))
}

/// [`choose_move`] over a batch, in parallel. Each position gets its own rng
/// seeded from `seed` and its index, so results do not depend on scheduling.
pub fn choose_moves_batch(
    positions: &[Position],
    from: &[Vec<f32>],
    to: &[Vec<f32>],
    attempts: usize,
    seed: u64,
) -> Result<Vec<Option<Move>>, CodecError> {
    for heads in [from, to] {
        if heads.len() != positions.len() {
            return Err(CodecError::DistributionShape {
                expected: positions.len(),
                actual: heads.len(),
            });
        }
    }
    positions
        .par_iter()
        .enumerate()
        .map(|(i, pos)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            choose_move(pos, &from[i], &to[i], attempts, &mut rng)
        })
        .collect()
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod policy_tests;
