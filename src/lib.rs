//! A vertically scrolling media feed for the terminal.
//!
//! The library holds everything the `reels` binary runs on, so integration
//! tests can drive the feed without a terminal:
//!
//! - [`media`] - the four card variants
//! - [`feed`] - mock content generation and the page-level orchestrator
//! - [`nav`] - active-card tracking, gestures and the scrolling viewport
//! - [`app`] and [`ui`] - TUI state, event loop and rendering

pub mod app;
pub mod card_state;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod media;
pub mod nav;
pub mod theme;
pub mod ui;
pub mod util;
