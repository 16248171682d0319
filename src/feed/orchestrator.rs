//! Page-level feed state.
//!
//! The orchestrator owns the loaded sequence and its engagement counters,
//! mirrors the controller's active index for renderers, and grows the
//! sequence when the controller asks for more.

use std::collections::HashMap;

use super::generator::{generate_engagement, MediaFeedGenerator};
use crate::media::{Engagement, EngagementCounters, MediaItem};
use crate::nav::NavEvent;

/// Sizing and seeding for a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub initial_batch: usize,
    pub page_size: usize,
    pub seed: Option<i64>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            initial_batch: 10,
            page_size: 5,
            seed: None,
        }
    }
}

/// What applying a round of controller events changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedUpdate {
    pub active_changed: bool,
    pub appended: usize,
}

pub struct FeedOrchestrator {
    settings: FeedSettings,
    generator: MediaFeedGenerator,
    items: Vec<MediaItem>,
    engagement: EngagementCounters,
    active_index: Option<usize>,
    /// Best game scores reached this session, keyed by item id.
    high_scores: HashMap<String, u32>,
}

impl FeedOrchestrator {
    pub fn new(settings: FeedSettings) -> Self {
        let mut feed = Self {
            settings,
            generator: MediaFeedGenerator::new(),
            items: Vec::new(),
            engagement: EngagementCounters::new(),
            active_index: None,
            high_scores: HashMap::new(),
        };
        feed.append_batch(settings.initial_batch);
        feed
    }

    pub fn settings(&self) -> FeedSettings {
        self.settings
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&MediaItem> {
        self.active_index.and_then(|i| self.items.get(i))
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active_index == Some(index)
    }

    pub fn engagement(&self, id: &str) -> Option<Engagement> {
        self.engagement.get(id).copied()
    }

    pub fn engagement_counters(&self) -> &EngagementCounters {
        &self.engagement
    }

    /// Best score for a game card: the larger of its generated high score
    /// and anything recorded this session.
    pub fn high_score(&self, id: &str) -> u32 {
        let base = self
            .items
            .iter()
            .find(|item| item.id() == id)
            .map(|item| match item {
                MediaItem::Game { high_score, .. } => *high_score,
                _ => 0,
            })
            .unwrap_or(0);
        self.high_scores.get(id).copied().unwrap_or(0).max(base)
    }

    /// Record a finished or in-progress score. High scores only ever rise.
    /// Returns `true` when this is a new best.
    pub fn record_high_score(&mut self, id: &str, score: u32) -> bool {
        if score <= self.high_score(id) {
            return false;
        }
        self.high_scores.insert(id.to_string(), score);
        tracing::debug!(id, score, "New high score");
        true
    }

    /// Apply the events from one controller call.
    ///
    /// Any number of `NeedMore` events in the same call append a single page.
    pub fn apply(&mut self, events: &[NavEvent]) -> FeedUpdate {
        let mut update = FeedUpdate::default();
        let mut need_more = false;

        for event in events {
            match *event {
                NavEvent::ActiveIndexChanged(index) if index < self.items.len() => {
                    self.active_index = Some(index);
                    update.active_changed = true;
                    tracing::debug!(index, "Active card changed");
                }
                NavEvent::ActiveIndexChanged(index) => {
                    tracing::warn!(index, len = self.items.len(), "Active index out of range");
                }
                NavEvent::NeedMore => need_more = true,
            }
        }

        if need_more {
            update.appended = self.load_more();
        }
        update
    }

    /// Append one page of items. Returns how many were added.
    pub fn load_more(&mut self) -> usize {
        let page = self.settings.page_size;
        self.append_batch(page)
    }

    fn append_batch(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let start = self.generator.next_position();
        let batch = self.generator.generate_batch(count);
        let ids: Vec<&str> = batch.iter().map(MediaItem::id).collect();
        let seed = self.settings.seed.unwrap_or(0).wrapping_add(start as i64);
        let counters = generate_engagement(&ids, Some(seed));
        self.engagement.extend(counters);
        self.items.extend(batch);

        if self.active_index.is_none() {
            self.active_index = Some(0);
        }
        tracing::info!(start, count, total = self.items.len(), "Loaded more cards");
        count
    }
}
