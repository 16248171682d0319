//! Configuration file parser for ~/.config/reels/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as likely typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::feed::FeedSettings;
use crate::nav::{NavSettings, ScrollTiming};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys can be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Cards generated at startup.
    pub initial_batch: usize,

    /// Cards appended per pagination request.
    pub page_size: usize,

    /// Seed for engagement counters. Unset behaves like 0.
    pub seed: Option<i64>,

    /// Minimum vertical drag, in pixels, that counts as a swipe.
    pub swipe_threshold_px: f64,

    /// Pixels per terminal row when converting mouse drags.
    pub row_height_px: f64,

    /// Duration of a smooth scroll between cards.
    pub scroll_animation_ms: u64,

    /// Quiet time after free scrolling before snapping to a card.
    pub settle_delay_ms: u64,

    /// Frame tick used for scroll animation and card playback.
    pub frame_interval_ms: u64,

    /// Write logs here instead of stderr.
    pub log_file: Option<PathBuf>,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            initial_batch: 10,
            page_size: 5,
            seed: None,
            swipe_threshold_px: 50.0,
            row_height_px: 16.0,
            scroll_animation_ms: 250,
            settle_delay_ms: 150,
            frame_interval_ms: 33,
            log_file: None,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 11] = [
        "theme",
        "initial_batch",
        "page_size",
        "seed",
        "swipe_threshold_px",
        "row_height_px",
        "scroll_animation_ms",
        "settle_delay_ms",
        "frame_interval_ms",
        "log_file",
        "keybindings",
    ];

    /// Default location: `$HOME/.config/reels/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("reels")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Out-of-range values → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(path = %path.display(), theme = %config.theme, "Loaded configuration");
        Ok(config)
    }

    /// Reject values the feed cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be at least 1".to_string(),
            ));
        }
        if !(self.swipe_threshold_px.is_finite() && self.swipe_threshold_px >= 0.0) {
            return Err(ConfigError::Invalid(
                "swipe_threshold_px must be a non-negative number".to_string(),
            ));
        }
        if !(self.row_height_px.is_finite() && self.row_height_px > 0.0) {
            return Err(ConfigError::Invalid(
                "row_height_px must be positive".to_string(),
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            initial_batch: self.initial_batch,
            page_size: self.page_size,
            seed: self.seed,
        }
    }

    pub fn nav_settings(&self) -> NavSettings {
        NavSettings {
            swipe_threshold_px: self.swipe_threshold_px,
            timing: ScrollTiming {
                animation: Duration::from_millis(self.scroll_animation_ms),
                settle_delay: Duration::from_millis(self.settle_delay_ms),
            },
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================
