//! Feed navigation: turns touch, wheel and scroll input into one active index.
//!
//! - [`gesture`] - swipe classification and wheel direction
//! - [`viewport`] - scroll offset, smooth-scroll animation and snap-on-idle
//! - [`controller`] - the state machine that owns the viewport and emits
//!   [`NavEvent`]s
//!
//! # Example
//!
//! ```
//! use reels::nav::{Direction, FeedNavigationController, NavEvent, NavSettings};
//! use std::time::Duration;
//!
//! let mut nav = FeedNavigationController::new(NavSettings::default());
//! nav.set_len(10);
//! nav.mount(800.0);
//!
//! assert!(nav.navigate(Direction::Forward));
//! let mut events = Vec::new();
//! for _ in 0..20 {
//!     events.extend(nav.tick(Duration::from_millis(50)));
//! }
//! assert_eq!(events, vec![NavEvent::ActiveIndexChanged(1)]);
//! ```

mod controller;
mod gesture;
mod viewport;

pub use controller::{
    infer_index, FeedNavigationController, NavEvent, NavSettings, NavState, LOOK_AHEAD,
};
pub use gesture::{classify_swipe, wheel_direction, Direction, DEFAULT_SWIPE_THRESHOLD_PX};
pub use viewport::{Motion, ScrollBehavior, ScrollTiming, Viewport};
