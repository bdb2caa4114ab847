//! TOML configuration.
//!
//! ```toml
//! [linkback]
//! threshold = 0.5
//! tie_order = "reverse-insertion"
//!
//! [normalizer]
//! default_value = 0.0
//!
//! [trainer]
//! liblinear_dir = "libs/liblinear-2.0"
//! ranklib_jar = "RankLib.jar"
//! java = "java"
//!
//! [segments]
//! max_tokens = 4
//! ```
//!
//! Every key is optional; missing keys take the values above (no token cap
//! for `max_tokens`).

use crate::linkback::{LinkBackResolver, TokenSegmenter, DEFAULT_THRESHOLD};
use crate::order::TieOrder;
use crate::train::{LibLinearTrainer, RankLibTrainer, DEFAULT_LIBLINEAR_DIR, DEFAULT_RANKLIB_JAR};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Link-back settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkBackConfig {
    /// Minimum accepted score
    pub threshold: f64,
    /// Order among equal scores
    pub tie_order: TieOrder,
}

impl Default for LinkBackConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            tie_order: TieOrder::default(),
        }
    }
}

/// Normalizer settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Value of unset features
    pub default_value: f64,
}

/// External trainer locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Directory holding LIBLINEAR's `train`
    pub liblinear_dir: PathBuf,
    /// RankLib jar
    pub ranklib_jar: PathBuf,
    /// Java executable
    pub java: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            liblinear_dir: PathBuf::from(DEFAULT_LIBLINEAR_DIR),
            ranklib_jar: PathBuf::from(DEFAULT_RANKLIB_JAR),
            java: "java".to_string(),
        }
    }
}

/// Query segmentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentsConfig {
    /// Longest segment, in tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    /// `[linkback]`
    pub linkback: LinkBackConfig,
    /// `[normalizer]`
    pub normalizer: NormalizerConfig,
    /// `[trainer]`
    pub trainer: TrainerConfig,
    /// `[segments]`
    pub segments: SegmentsConfig,
}

impl LinkerConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Read a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Read `path`, or the default location when `None`.
    ///
    /// A missing file gives the defaults; a malformed one is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::debug!("loading config from {}", path.display());
        Self::load(&path)
    }

    /// `<config dir>/annolink/config.toml`, or `.annolink/config.toml` when
    /// the platform has no config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("annolink"))
            .unwrap_or_else(|| PathBuf::from(".annolink"))
            .join("config.toml")
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }

    /// Resolver with the configured threshold and tie order.
    #[must_use]
    pub fn resolver(&self) -> LinkBackResolver {
        LinkBackResolver::new(self.linkback.threshold).with_tie_order(self.linkback.tie_order)
    }

    /// Segmenter with the configured token cap.
    #[must_use]
    pub fn segmenter(&self) -> TokenSegmenter {
        match self.segments.max_tokens {
            Some(n) => TokenSegmenter::with_max_tokens(n),
            None => TokenSegmenter::new(),
        }
    }

    /// LIBLINEAR trainer in the configured directory.
    #[must_use]
    pub fn liblinear(&self, solver: u32, c: f64) -> LibLinearTrainer {
        LibLinearTrainer::new(solver, c).with_base_dir(&self.trainer.liblinear_dir)
    }

    /// RankLib trainer with the configured java and jar.
    #[must_use]
    pub fn ranklib(&self) -> RankLibTrainer {
        RankLibTrainer {
            java: self.trainer.java.clone(),
            jar: self.trainer.ranklib_jar.clone(),
            ..RankLibTrainer::default()
        }
    }
}
