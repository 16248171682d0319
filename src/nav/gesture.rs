//! Input normalization for the touch and wheel channels.
//!
//! Both channels reduce to an optional [`Direction`]; the controller turns a
//! direction into a smooth-scroll request.

/// Minimum swipe distance in device-independent pixels.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 50.0;

/// One step through the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher indices (swipe up, wheel down).
    Forward,
    /// Towards index 0 (swipe down, wheel up).
    Backward,
}

impl Direction {
    /// Apply one step to `index`, staying inside `0..len`.
    ///
    /// Returns `None` when the step would leave the range.
    pub fn step(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Forward if index + 1 < len => Some(index + 1),
            Self::Backward if index > 0 && index < len => Some(index - 1),
            _ => None,
        }
    }
}

/// Classify a completed vertical drag.
///
/// `start_y - end_y` is positive for an upward drag, which advances the feed.
/// Distances whose magnitude does not exceed `threshold` are taps or jitter.
pub fn classify_swipe(start_y: f64, end_y: f64, threshold: f64) -> Option<Direction> {
    let distance = start_y - end_y;
    if distance > threshold {
        Some(Direction::Forward)
    } else if distance < -threshold {
        Some(Direction::Backward)
    } else {
        None
    }
}

/// Map a wheel delta to a single step. Zero (and NaN) deltas do nothing.
pub fn wheel_direction(delta_y: f64) -> Option<Direction> {
    if delta_y > 0.0 {
        Some(Direction::Forward)
    } else if delta_y < 0.0 {
        Some(Direction::Backward)
    } else {
        None
    }
}

/// Tracks a single continuous touch (or mouse drag).
///
/// A touch that never moved has no end position and cannot navigate, which
/// keeps taps on a card from being read as swipes.
#[derive(Debug, Default, Clone)]
pub struct TouchTracker {
    start_y: Option<f64>,
    end_y: Option<f64>,
}

impl TouchTracker {
    pub fn start(&mut self, y: f64) {
        self.start_y = Some(y);
        self.end_y = None;
    }

    pub fn move_to(&mut self, y: f64) {
        if self.start_y.is_some() {
            self.end_y = Some(y);
        }
    }

    pub fn is_active(&self) -> bool {
        self.start_y.is_some()
    }

    /// Most recent position of an active touch.
    pub fn last_y(&self) -> Option<f64> {
        self.start_y.map(|start| self.end_y.unwrap_or(start))
    }

    /// Finish the touch and classify it. The tracker is reset either way.
    pub fn finish(&mut self, threshold: f64) -> Option<Direction> {
        let start = self.start_y.take()?;
        let end = self.end_y.take()?;
        classify_swipe(start, end, threshold)
    }

    pub fn cancel(&mut self) {
        self.start_y = None;
        self.end_y = None;
    }
}
