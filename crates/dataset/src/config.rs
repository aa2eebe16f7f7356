//! Dataset configuration, loaded from TOML
//!
//! ```toml
//! kind = "random-black-state"
//!
//! [generator]
//! gamma = 0.99
//! encoding = "featurized"
//! seed = 7
//!
//! [cache]
//! dir = "cache"
//! ```

use std::path::{Path, PathBuf};

use chess_codec::EncodeMode;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::generator::GeneratorKind;
use crate::outcome::GAMMA;

/// Settings shared by all sample generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Discount applied per remaining move
    pub gamma: f32,
    /// State encoding for supervised samples; SARSA tuples always use compact keys
    pub encoding: EncodeMode,
    /// Shuffle the (state, action) pairs within each game
    pub shuffle: bool,
    /// Use the mainline length when a record has no `PlyCount` tag
    pub infer_ply_count: bool,
    /// Override the generator's minimum game length
    pub min_plies: Option<usize>,
    /// Seed for ply selection and shuffling; entropy when unset
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            gamma: GAMMA,
            encoding: EncodeMode::Dense,
            shuffle: true,
            infer_ply_count: false,
            min_plies: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("cache"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub kind: GeneratorKind,
    pub generator: GeneratorConfig,
    pub cache: CacheConfig,
}

impl DatasetConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, DatasetError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = DatasetConfig::from_toml_str("").unwrap();
        assert_eq!(config, DatasetConfig::default());
        assert_eq!(config.generator.gamma, 0.99);
        assert_eq!(config.kind, GeneratorKind::WhiteStateAction);
        assert_eq!(config.cache.dir, PathBuf::from("cache"));
    }

    #[test]
    fn test_partial_file() {
        let config = DatasetConfig::from_toml_str(
            r#"
kind = "white-sarsa"

[generator]
encoding = "featurized"
seed = 7

[cache]
enabled = false
"#,
        )
        .unwrap();
        assert_eq!(config.kind, GeneratorKind::WhiteSarsa);
        assert_eq!(config.generator.encoding, EncodeMode::Featurized);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.generator.gamma, GAMMA);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_unknown_generator_is_rejected() {
        let err = DatasetConfig::from_toml_str("kind = \"black-sarsa\"").unwrap_err();
        assert!(matches!(err, DatasetError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DatasetConfig::load("/nonexistent/dataset.toml").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
