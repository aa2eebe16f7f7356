//! Dense `[layers, 8, 8]` feature tensors.

use serde::{Deserialize, Serialize};

use crate::geometry::{NUM_COLS, NUM_ROWS, NUM_SQUARES};

/// A stack of 8x8 feature planes stored flat, layer-major then row then column.
///
/// `data[layer * 64 + row * 8 + col]`, which is also `layer * 64 + square`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planes {
    layers: usize,
    data: Vec<f32>,
}

impl Planes {
    pub fn zeros(layers: usize) -> Self {
        Self {
            layers,
            data: vec![0.0; layers * NUM_SQUARES],
        }
    }

    /// Wrap flat data; `None` unless `data.len()` is a whole number of planes.
    pub fn from_vec(data: Vec<f32>) -> Option<Self> {
        if data.len() % NUM_SQUARES != 0 {
            return None;
        }
        Some(Self {
            layers: data.len() / NUM_SQUARES,
            data,
        })
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    /// `[layers, rows, cols]`
    pub fn shape(&self) -> [usize; 3] {
        [self.layers, NUM_ROWS, NUM_COLS]
    }

    /// # Panics
    /// Panics when any coordinate is out of range.
    #[inline]
    fn index(&self, layer: usize, row: usize, col: usize) -> usize {
        assert!(
            layer < self.layers && row < NUM_ROWS && col < NUM_COLS,
            "({layer}, {row}, {col}) is outside a [{}, {NUM_ROWS}, {NUM_COLS}] tensor",
            self.layers
        );
        layer * NUM_SQUARES + row * NUM_COLS + col
    }

    #[inline]
    pub fn get(&self, layer: usize, row: usize, col: usize) -> f32 {
        self.data[self.index(layer, row, col)]
    }

    #[inline]
    pub fn set(&mut self, layer: usize, row: usize, col: usize, value: f32) {
        let i = self.index(layer, row, col);
        self.data[i] = value;
    }

    #[inline]
    pub fn add(&mut self, layer: usize, row: usize, col: usize, value: f32) {
        let i = self.index(layer, row, col);
        self.data[i] += value;
    }

    /// The 64 values of one layer, a1 first.
    pub fn plane(&self, layer: usize) -> &[f32] {
        &self.data[layer * NUM_SQUARES..(layer + 1) * NUM_SQUARES]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Stack `other`'s layers after this tensor's layers.
    pub fn concat(mut self, other: Planes) -> Planes {
        self.layers += other.layers;
        self.data.extend(other.data);
        self
    }

    /// Layers with at least one non-zero entry.
    pub fn nonzero_layers(&self) -> Vec<usize> {
        (0..self.layers)
            .filter(|&l| self.plane(l).iter().any(|&v| v != 0.0))
            .collect()
    }
}

#[cfg(test)]
#[path = "planes_tests.rs"]
mod planes_tests;
