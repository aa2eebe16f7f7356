//! State encoding
//!
//! Converts a position into one of three tensor forms:
//! - **dense**: `[12, 8, 8]` one-hot occupancy,
//! - **compact**: one layer id per square, usable as a hash key,
//! - **featurized**: dense occupancy followed by the 17 influence layers.
//!
//! Layers are absolute-color: planes 0-5 are White (Pawn, Knight, Bishop, Rook,
//! Queen, King) and planes 6-11 Black, whoever is to move. a1 is row 0, col 0.

use std::fmt;
use std::str::FromStr;

use chess_core::{Color, PieceKind};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CodecError;
use crate::geometry::{col_of, occupancy_layer, row_of, NUM_OCCUPANCY_LAYERS, NUM_SQUARES};
use crate::influence::{influence_features, NUM_INFLUENCE_LAYERS};
use crate::occupancy::Occupancy;
use crate::planes::Planes;

/// Occupancy layers followed by influence layers.
pub const NUM_FEATURIZED_LAYERS: usize = NUM_OCCUPANCY_LAYERS + NUM_INFLUENCE_LAYERS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeMode {
    #[default]
    Dense,
    Compact,
    Featurized,
}

impl FromStr for EncodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dense" => Ok(EncodeMode::Dense),
            "compact" => Ok(EncodeMode::Compact),
            "featurized" => Ok(EncodeMode::Featurized),
            other => Err(format!("unknown encoding '{other}'")),
        }
    }
}

impl fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EncodeMode::Dense => "dense",
            EncodeMode::Compact => "compact",
            EncodeMode::Featurized => "featurized",
        })
    }
}

/// Output of [`encode`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EncodedState {
    Planes(Planes),
    Compact(CompactState),
}

impl EncodedState {
    pub fn as_planes(&self) -> Option<&Planes> {
        match self {
            EncodedState::Planes(p) => Some(p),
            EncodedState::Compact(_) => None,
        }
    }

    pub fn as_compact(&self) -> Option<&CompactState> {
        match self {
            EncodedState::Compact(c) => Some(c),
            EncodedState::Planes(_) => None,
        }
    }
}

/// Encode a position in the given mode.
pub fn encode<P: Occupancy + ?Sized>(pos: &P, mode: EncodeMode) -> EncodedState {
    match mode {
        EncodeMode::Dense => EncodedState::Planes(encode_dense(pos)),
        EncodeMode::Compact => EncodedState::Compact(encode_compact(pos)),
        EncodeMode::Featurized => EncodedState::Planes(encode_featurized(pos)),
    }
}

/// `[12, 8, 8]` one-hot occupancy. An empty board is all zeros.
pub fn encode_dense<P: Occupancy + ?Sized>(pos: &P) -> Planes {
    let mut planes = Planes::zeros(NUM_OCCUPANCY_LAYERS);
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            let layer = occupancy_layer(color, kind);
            for square in pos.pieces(kind, color).squares() {
                planes.set(layer, row_of(square), col_of(square), 1.0);
            }
        }
    }
    planes
}

pub fn encode_compact<P: Occupancy + ?Sized>(pos: &P) -> CompactState {
    let mut cells = [CompactState::EMPTY; NUM_SQUARES];
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            let layer = occupancy_layer(color, kind) as u8;
            for square in pos.pieces(kind, color).squares() {
                cells[square as usize] = layer;
            }
        }
    }
    CompactState(cells)
}

/// Dense occupancy with the influence layers appended: `[29, 8, 8]`.
pub fn encode_featurized<P: Occupancy + ?Sized>(pos: &P) -> Planes {
    encode_dense(pos).concat(influence_features(pos))
}

/// Encode many positions in parallel. Output order matches input order.
pub fn encode_batch<P>(positions: &[P], mode: EncodeMode) -> Vec<EncodedState>
where
    P: Occupancy + Sync,
{
    positions.par_iter().map(|pos| encode(pos, mode)).collect()
}

/// Per-square occupancy labels, a1 first.
///
/// Each cell holds the occupancy layer id (0..12) of the piece on that square
/// or [`CompactState::EMPTY`]; any other value reads as empty. The key form is
/// a 64-character string: `.` for an empty square, `0`-`9`, `a`, `b` for layer
/// ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactState(pub [u8; NUM_SQUARES]);

const KEY_DIGITS: &[u8; NUM_OCCUPANCY_LAYERS] = b"0123456789ab";
const KEY_EMPTY: char = '.';

impl CompactState {
    pub const EMPTY: u8 = u8::MAX;

    pub fn cells(&self) -> &[u8; NUM_SQUARES] {
        &self.0
    }

    /// Layer id at `square`, `None` when empty.
    pub fn layer_at(&self, square: u8) -> Option<usize> {
        match self.0.get(square as usize) {
            Some(&cell) if (cell as usize) < NUM_OCCUPANCY_LAYERS => Some(cell as usize),
            _ => None,
        }
    }

    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(|&cell| {
                KEY_DIGITS
                    .get(cell as usize)
                    .map_or(KEY_EMPTY, |&d| d as char)
            })
            .collect()
    }

    pub fn from_key(key: &str) -> Result<Self, CodecError> {
        let bytes = key.as_bytes();
        if bytes.len() != NUM_SQUARES {
            return Err(CodecError::CompactKey(format!(
                "expected {NUM_SQUARES} characters, got {}",
                key.chars().count()
            )));
        }
        let mut cells = [Self::EMPTY; NUM_SQUARES];
        for (cell, &b) in cells.iter_mut().zip(bytes) {
            if b as char == KEY_EMPTY {
                continue;
            }
            *cell = KEY_DIGITS
                .iter()
                .position(|&d| d == b)
                .ok_or_else(|| CodecError::CompactKey(format!("bad character '{}'", b as char)))?
                as u8;
        }
        Ok(Self(cells))
    }

    /// Dense planes holding the same occupancy.
    pub fn to_planes(&self) -> Planes {
        let mut planes = Planes::zeros(NUM_OCCUPANCY_LAYERS);
        for square in 0..NUM_SQUARES as u8 {
            if let Some(layer) = self.layer_at(square) {
                planes.set(layer, row_of(square), col_of(square), 1.0);
            }
        }
        planes
    }
}

impl Default for CompactState {
    fn default() -> Self {
        Self([Self::EMPTY; NUM_SQUARES])
    }
}

impl fmt::Display for CompactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl fmt::Debug for CompactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactState({})", self.key())
    }
}

impl FromStr for CompactState {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

impl Serialize for CompactState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for CompactState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::from_key(&key).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
