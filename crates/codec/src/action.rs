//! Action encoding: a move as a single integer in `[0, 7 * 64 * 64)`.
//!
//! `code = promotion * 4096 + from * 64 + to`, where `promotion` is 0 for a
//! plain move and otherwise the piece ordinal (1 = pawn .. 6 = king). Pawn and
//! king promotions never occur in play but still round-trip.
//!
//! The codec does not check chess legality. [`DecodedAction::to_move`] yields a
//! candidate that the caller must still validate against the position.

use chess_core::{Move, PieceKind};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::geometry::NUM_SQUARES;

/// "No promotion" plus one code per piece ordinal.
pub const NUM_PROMOTIONS: usize = 7;

/// Size of the (from, to) plane used by two-head policies.
pub const NUM_FROM_TO: usize = NUM_SQUARES * NUM_SQUARES;

pub const NUM_ACTIONS: usize = NUM_PROMOTIONS * NUM_FROM_TO;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Action(u32);

impl Action {
    /// Build from a raw promotion code (0..=6) and two squares.
    pub fn new(promotion: u8, from: u8, to: u8) -> Result<Action, CodecError> {
        if promotion as usize >= NUM_PROMOTIONS {
            return Err(CodecError::InvalidPromotionCode(promotion));
        }
        check_square(from)?;
        check_square(to)?;
        Ok(Action(
            promotion as u32 * NUM_FROM_TO as u32 + from as u32 * NUM_SQUARES as u32 + to as u32,
        ))
    }

    pub fn from_code(code: u32) -> Result<Action, CodecError> {
        if code as usize >= NUM_ACTIONS {
            return Err(CodecError::InvalidActionCode(code));
        }
        Ok(Action(code))
    }

    pub fn from_move(mv: Move) -> Result<Action, CodecError> {
        encode_action(mv.from, mv.to, mv.promo)
    }

    pub fn code(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `from * 64 + to`, dropping the promotion.
    pub fn from_to_index(self) -> usize {
        self.index() % NUM_FROM_TO
    }

    /// One-hot target vector over all [`NUM_ACTIONS`] codes.
    pub fn one_hot(self) -> Vec<f32> {
        let mut v = vec![0.0; NUM_ACTIONS];
        v[self.index()] = 1.0;
        v
    }

    pub fn decode(self) -> DecodedAction {
        let code = self.0 as usize;
        let rem = code % NUM_FROM_TO;
        DecodedAction {
            promotion: (code / NUM_FROM_TO) as u8,
            from: (rem / NUM_SQUARES) as u8,
            to: (rem % NUM_SQUARES) as u8,
        }
    }
}

impl TryFrom<u32> for Action {
    type Error = CodecError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Action::from_code(code)
    }
}

impl From<Action> for u32 {
    fn from(action: Action) -> u32 {
        action.0
    }
}

/// The parts of an action code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedAction {
    /// 0 for none, otherwise the piece ordinal.
    pub promotion: u8,
    pub from: u8,
    pub to: u8,
}

impl DecodedAction {
    pub fn promotion_kind(&self) -> Option<PieceKind> {
        PieceKind::from_ordinal(self.promotion)
    }

    /// Candidate move; castling and en-passant flags are left for the caller
    /// to fill in by matching against generated legal moves.
    pub fn to_move(&self) -> Move {
        match self.promotion_kind() {
            Some(kind) => Move::with_promo(self.from, self.to, kind),
            None => Move::new(self.from, self.to),
        }
    }
}

fn check_square(square: u8) -> Result<(), CodecError> {
    if square as usize >= NUM_SQUARES {
        return Err(CodecError::SquareOutOfRange(square));
    }
    Ok(())
}

pub fn encode_action(from: u8, to: u8, promotion: Option<PieceKind>) -> Result<Action, CodecError> {
    Action::new(promotion.map_or(0, PieceKind::ordinal), from, to)
}

/// Split a code into (promotion, from, to). Codes at or above
/// [`NUM_ACTIONS`] are rejected instead of wrapping.
pub fn decode_action(code: u32) -> Result<DecodedAction, CodecError> {
    Action::from_code(code).map(Action::decode)
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod action_tests;
