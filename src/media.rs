//! Media item model for the feed.
//!
//! A [`MediaItem`] is one full-screen card. The four variants are pure data;
//! the only behavior here is invariant checking and a few shared accessors.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::util::validate_url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("Text card '{0}' has empty content")]
    EmptyContent(String),

    #[error("Card '{id}' has an invalid URL: {reason}")]
    InvalidUrl { id: String, reason: String },
}

// ============================================================================
// Media Kind
// ============================================================================

/// Discriminant of a [`MediaItem`], in generator cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Text,
    Image,
    Video,
    Game,
}

impl MediaKind {
    /// Cycle order used by the generator: `position % 4` indexes this array.
    pub const CYCLE: [MediaKind; 4] = [Self::Text, Self::Image, Self::Video, Self::Game];

    /// Lowercase name, also used as the id prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Game => "game",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Media Item
// ============================================================================

/// One card in the feed.
///
/// Serialized with an internal `kind` tag so a dumped feed reads as
/// `{"kind": "video", "id": "video-2", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaItem {
    Text {
        id: String,
        title: String,
        content: String,
        /// Palette token resolved by the theme (e.g. "purple").
        background_style: String,
        text_style: String,
    },
    Image {
        id: String,
        title: String,
        url: String,
        alt_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        photographer_name: Option<String>,
    },
    Video {
        id: String,
        title: String,
        url: String,
        thumbnail_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_seconds: Option<u32>,
    },
    Game {
        id: String,
        title: String,
        description: String,
        high_score: u32,
    },
}

impl MediaItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Text { id, .. }
            | Self::Image { id, .. }
            | Self::Video { id, .. }
            | Self::Game { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Text { title, .. }
            | Self::Image { title, .. }
            | Self::Video { title, .. }
            | Self::Game { title, .. } => title,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Text { .. } => MediaKind::Text,
            Self::Image { .. } => MediaKind::Image,
            Self::Video { .. } => MediaKind::Video,
            Self::Game { .. } => MediaKind::Game,
        }
    }

    /// The URL a user can open externally, if the card has one.
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Image { url, .. } | Self::Video { url, .. } => Some(url),
            Self::Text { .. } | Self::Game { .. } => None,
        }
    }

    /// Check the per-variant invariants.
    ///
    /// Durations and high scores are unsigned, so only text content and
    /// resource locators need a runtime check.
    pub fn validate(&self) -> Result<(), MediaError> {
        match self {
            Self::Text { id, content, .. } => {
                if content.trim().is_empty() {
                    return Err(MediaError::EmptyContent(id.clone()));
                }
            }
            Self::Image { id, url, .. } => check_url(id, url)?,
            Self::Video {
                id,
                url,
                thumbnail_url,
                ..
            } => {
                check_url(id, url)?;
                check_url(id, thumbnail_url)?;
            }
            Self::Game { .. } => {}
        }
        Ok(())
    }
}

fn check_url(id: &str, url: &str) -> Result<(), MediaError> {
    validate_url(url)
        .map(|_| ())
        .map_err(|e| MediaError::InvalidUrl {
            id: id.to_string(),
            reason: e.to_string(),
        })
}

// ============================================================================
// Engagement Counters
// ============================================================================

/// Cosmetic like/share counts for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u32,
    pub shares: u32,
}

/// Counters keyed by item id. Ordered so that serialized output is stable.
pub type EngagementCounters = BTreeMap<String, Engagement>;

// ============================================================================
// Tests
// ============================================================================
