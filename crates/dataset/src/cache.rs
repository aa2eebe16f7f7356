//! Derived sample cache
//!
//! Generated samples are stored as JSON under
//! `<dir>/<source>.<generator>.<encoding>.json`. A cache file is only reused
//! when it parses and was written for the same key, generator settings
//! included, by the same encoder version; anything else is rebuilt from the
//! game records.

use std::path::{Path, PathBuf};

use chess_codec::EncodeMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::DatasetError;
use crate::generator::{encoding_for, GeneratorKind, Samples};

/// Bumped whenever the encoded layout changes.
pub const ENCODER_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    /// File name of the game records the samples came from
    pub source: String,
    pub generator: GeneratorKind,
    /// Settings the samples were generated with, `encoding` resolved
    pub settings: GeneratorConfig,
}

impl CacheKey {
    pub fn new(source: impl Into<String>, generator: GeneratorKind, settings: &GeneratorConfig) -> Self {
        let settings = GeneratorConfig {
            encoding: encoding_for(generator, settings),
            ..settings.clone()
        };
        Self {
            source: source.into(),
            generator,
            settings,
        }
    }

    /// Key for a PGN path: the source is its file name.
    pub fn for_path(path: &Path, generator: GeneratorKind, settings: &GeneratorConfig) -> Self {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(source, generator, settings)
    }

    pub fn encoding(&self) -> EncodeMode {
        self.settings.encoding
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}.{}.json", self.source, self.generator, self.encoding())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheFile {
    pub encoder_version: u32,
    pub key: CacheKey,
    pub samples: Samples,
}

#[derive(Debug, Clone)]
pub struct SampleCache {
    dir: PathBuf,
}

impl SampleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Cached samples for `key`, or `None` when the file is missing, stale or
    /// unreadable.
    pub fn load(&self, key: &CacheKey) -> Option<Samples> {
        let path = self.path(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cache miss");
                return None;
            }
        };
        let file: CacheFile = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable cache file");
                return None;
            }
        };
        if file.encoder_version != ENCODER_VERSION || &file.key != key {
            info!(
                path = %path.display(),
                version = file.encoder_version,
                "stale cache file"
            );
            return None;
        }
        Some(file.samples)
    }

    /// Save samples to a JSON file
    pub fn save(&self, key: &CacheKey, samples: &Samples) -> Result<PathBuf, DatasetError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let file = CacheFile {
            encoder_version: ENCODER_VERSION,
            key: key.clone(),
            samples: samples.clone(),
        };
        std::fs::write(&path, serde_json::to_string(&file)?)?;
        Ok(path)
    }

    /// Reuse the cache for `key` unless `refresh` is set or it is unusable;
    /// otherwise run `build` and store its result.
    pub fn load_or_build<F>(
        &self,
        key: &CacheKey,
        refresh: bool,
        build: F,
    ) -> Result<Samples, DatasetError>
    where
        F: FnOnce() -> Result<Samples, DatasetError>,
    {
        if !refresh {
            if let Some(samples) = self.load(key) {
                info!(path = %self.path(key).display(), samples = samples.len(), "loaded cached samples");
                return Ok(samples);
            }
        }
        let samples = build()?;
        let path = self.save(key, &samples)?;
        info!(path = %path.display(), samples = samples.len(), "wrote sample cache");
        Ok(samples)
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;
