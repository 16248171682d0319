//! Feed content: the mock generator and the page-level orchestrator.
//!
//! - [`generator`] - deterministic items and engagement counters
//! - [`orchestrator`] - loaded sequence, active index mirror, pagination
//!
//! # Example
//!
//! ```
//! use reels::feed::{FeedOrchestrator, FeedSettings};
//! use reels::nav::NavEvent;
//!
//! let mut feed = FeedOrchestrator::new(FeedSettings::default());
//! assert_eq!(feed.len(), 10);
//!
//! let update = feed.apply(&[NavEvent::ActiveIndexChanged(8), NavEvent::NeedMore]);
//! assert!(update.active_changed);
//! assert_eq!(feed.len(), 15);
//! ```

mod generator;
mod orchestrator;

pub use generator::{
    generate_engagement, generate_range, item_at, seeded_unit, MediaFeedGenerator,
};
pub use orchestrator::{FeedOrchestrator, FeedSettings, FeedUpdate};
