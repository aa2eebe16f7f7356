//! Attack/defense influence features.
//!
//! For every knight, rook, bishop and queen on the board, rays are cast along
//! the piece's movement directions. The first piece a ray meets stops it:
//! - a knight, bishop, rook or queen of the other color counts as *attacked*,
//! - one of the same color counts as *defended*,
//! - a pawn or king blocks the ray without being counted.
//!
//! Knights use their eight leaper offsets as single-step rays. Sliders walk up
//! to seven steps. Squares off the board end a ray; there is no wrap-around.
//!
//! Counts accumulate, so a square defended by two white rooks holds 2 in the
//! white-rook-defends layer. Families are never summed together.
//!
//! Layer layout (17 layers):
//!
//! | layers | content |
//! |--------|---------|
//! | 0-3    | knight: white attacks, white defends, black attacks, black defends |
//! | 4-7    | rook, same order |
//! | 8-11   | bishop, same order |
//! | 12-15  | queen, same order |
//! | 16     | free squares (1 where the square is empty) |

use chess_core::{
    Bitboard, Color, PieceKind, BISHOP_DIRECTIONS, KNIGHT_DELTAS, QUEEN_DIRECTIONS,
    ROOK_DIRECTIONS,
};

use crate::geometry::{col_of, row_of, square_at, NUM_COLS};
use crate::occupancy::Occupancy;
use crate::planes::Planes;

/// Piece families that produce influence features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Knight,
    Rook,
    Bishop,
    Queen,
}

impl Family {
    pub const ALL: [Family; 4] = [Family::Knight, Family::Rook, Family::Bishop, Family::Queen];

    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> PieceKind {
        match self {
            Family::Knight => PieceKind::Knight,
            Family::Rook => PieceKind::Rook,
            Family::Bishop => PieceKind::Bishop,
            Family::Queen => PieceKind::Queen,
        }
    }

    pub fn from_kind(kind: PieceKind) -> Option<Family> {
        match kind {
            PieceKind::Knight => Some(Family::Knight),
            PieceKind::Rook => Some(Family::Rook),
            PieceKind::Bishop => Some(Family::Bishop),
            PieceKind::Queen => Some(Family::Queen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    /// (file delta, rank delta) per ray.
    fn directions(self) -> &'static [(i8, i8)] {
        match self {
            Family::Knight => &KNIGHT_DELTAS,
            Family::Rook => &ROOK_DIRECTIONS,
            Family::Bishop => &BISHOP_DIRECTIONS,
            Family::Queen => &QUEEN_DIRECTIONS,
        }
    }

    fn max_steps(self) -> i8 {
        match self {
            Family::Knight => 1,
            _ => (NUM_COLS - 1) as i8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Attacks,
    Defends,
}

impl Relation {
    fn idx(self) -> usize {
        match self {
            Relation::Attacks => 0,
            Relation::Defends => 1,
        }
    }
}

/// Four layers per family plus the free-squares layer.
pub const NUM_INFLUENCE_LAYERS: usize = Family::ALL.len() * 4 + 1;

pub const FREE_SQUARES_LAYER: usize = NUM_INFLUENCE_LAYERS - 1;

/// Index of a layer within the influence block.
#[inline]
pub fn influence_layer(family: Family, color: Color, relation: Relation) -> usize {
    family.idx() * 4 + color.idx() * 2 + relation.idx()
}

/// Occupancy sets a ray needs to classify the square it stops on.
struct Rays {
    occupied: Bitboard,
    white: Bitboard,
    tracked: Bitboard,
}

impl Rays {
    fn new<P: Occupancy + ?Sized>(pos: &P) -> Self {
        let tracked = Family::ALL.iter().fold(Bitboard::EMPTY, |acc, f| {
            acc | pos.pieces(f.kind(), Color::White) | pos.pieces(f.kind(), Color::Black)
        });
        Self {
            occupied: pos.occupied(),
            white: pos.occupied_by(Color::White),
            tracked,
        }
    }

    /// Walk from `source` along `(df, dr)` and report the square the ray stops on,
    /// if it stops on a tracked piece.
    fn cast(
        &self,
        source: u8,
        (df, dr): (i8, i8),
        max_steps: i8,
        mover: Color,
    ) -> Option<(u8, Relation)> {
        let row = row_of(source) as i8;
        let col = col_of(source) as i8;
        for step in 1..=max_steps {
            let target = square_at(row + dr * step, col + df * step)?;
            if !self.occupied.contains(target) {
                continue;
            }
            if !self.tracked.contains(target) {
                return None;
            }
            let same_side = self.white.contains(target) == (mover == Color::White);
            let relation = if same_side {
                Relation::Defends
            } else {
                Relation::Attacks
            };
            return Some((target, relation));
        }
        None
    }
}

/// Compute the 17 influence layers for a position.
pub fn influence_features<P: Occupancy + ?Sized>(pos: &P) -> Planes {
    let rays = Rays::new(pos);
    let mut planes = Planes::zeros(NUM_INFLUENCE_LAYERS);

    for family in Family::ALL {
        for color in Color::ALL {
            for source in pos.pieces(family.kind(), color).squares() {
                for &dir in family.directions() {
                    if let Some((target, relation)) =
                        rays.cast(source, dir, family.max_steps(), color)
                    {
                        let layer = influence_layer(family, color, relation);
                        planes.add(layer, row_of(target), col_of(target), 1.0);
                    }
                }
            }
        }
    }

    for square in (!rays.occupied).squares() {
        planes.set(FREE_SQUARES_LAYER, row_of(square), col_of(square), 1.0);
    }

    planes
}

#[cfg(test)]
#[path = "influence_tests.rs"]
mod influence_tests;
