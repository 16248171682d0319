//! Scroll position model for the feed.
//!
//! The viewport is a one-dimensional scroll container of uniform items. It
//! knows nothing about indices beyond snapping: it animates toward targets,
//! tracks free scrolling, and reports when motion has stopped.

use std::time::Duration;

/// Offsets closer than this are treated as equal.
const EPSILON: f64 = 0.5;

/// How a scroll request moves the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Animation and settle timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTiming {
    /// Length of a smooth scroll.
    pub animation: Duration,
    /// Quiet period after free scrolling before the viewport snaps.
    pub settle_delay: Duration,
}

impl Default for ScrollTiming {
    fn default() -> Self {
        Self {
            animation: Duration::from_millis(250),
            settle_delay: Duration::from_millis(150),
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Nothing is moving.
    Still,
    /// The offset changed and motion continues.
    Moved(f64),
    /// Motion stopped at this offset.
    Settled(f64),
}

#[derive(Debug, Clone)]
struct Animation {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    extent: f64,
    offset: f64,
    content_len: usize,
    timing: ScrollTiming,
    animation: Option<Animation>,
    /// Time since the last free-scroll movement, while free scrolling.
    free_idle: Option<Duration>,
    pending_settle: bool,
}

impl Viewport {
    pub fn new(extent: f64, timing: ScrollTiming) -> Self {
        Self {
            extent: extent.max(1.0),
            offset: 0.0,
            content_len: 0,
            timing,
            animation: None,
            free_idle: None,
            pending_settle: false,
        }
    }

    /// Height of one item, which is also the height of the viewport.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_moving(&self) -> bool {
        self.animation.is_some() || self.free_idle.is_some() || self.pending_settle
    }

    /// Where the in-flight animation is headed, if any.
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    pub fn set_content_len(&mut self, len: usize) {
        self.content_len = len;
        self.offset = self.clamp(self.offset);
    }

    fn max_offset(&self) -> f64 {
        self.content_len.saturating_sub(1) as f64 * self.extent
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }

    /// Change the item extent, keeping every position at the same relative place.
    pub fn resize(&mut self, extent: f64) {
        let extent = extent.max(1.0);
        let ratio = extent / self.extent;
        self.extent = extent;
        self.offset *= ratio;
        if let Some(anim) = self.animation.as_mut() {
            anim.from *= ratio;
            anim.to *= ratio;
        }
    }

    /// Request a scroll to `offset`. A smooth request retargets any animation
    /// already in flight, starting from the current position.
    pub fn scroll_to(&mut self, offset: f64, behavior: ScrollBehavior) {
        let to = self.clamp(offset);
        self.free_idle = None;
        match behavior {
            ScrollBehavior::Instant => {
                self.animation = None;
                self.offset = to;
                self.pending_settle = true;
            }
            ScrollBehavior::Smooth => {
                self.pending_settle = false;
                self.animation = Some(Animation {
                    from: self.offset,
                    to,
                    elapsed: Duration::ZERO,
                    duration: self.timing.animation,
                });
            }
        }
    }

    /// Free scroll by `delta`, cancelling any animation.
    pub fn scroll_by(&mut self, delta: f64) {
        self.animation = None;
        self.pending_settle = false;
        self.offset = self.clamp(self.offset + delta);
        self.free_idle = Some(Duration::ZERO);
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: Duration) -> Motion {
        if let Some(anim) = self.animation.as_mut() {
            anim.elapsed += dt;
            let t = if anim.duration.is_zero() {
                1.0
            } else {
                (anim.elapsed.as_secs_f64() / anim.duration.as_secs_f64()).min(1.0)
            };
            if t >= 1.0 {
                let to = anim.to;
                self.animation = None;
                self.offset = to;
                return Motion::Settled(to);
            }
            self.offset = anim.from + (anim.to - anim.from) * ease_out_cubic(t);
            return Motion::Moved(self.offset);
        }

        if let Some(idle) = self.free_idle.as_mut() {
            *idle += dt;
            if *idle < self.timing.settle_delay {
                return Motion::Still;
            }
            self.free_idle = None;
            let snap = self.clamp((self.offset / self.extent).round() * self.extent);
            if (snap - self.offset).abs() < EPSILON {
                self.offset = snap;
                return Motion::Settled(snap);
            }
            self.scroll_to(snap, ScrollBehavior::Smooth);
            return Motion::Still;
        }

        if self.pending_settle {
            self.pending_settle = false;
            return Motion::Settled(self.offset);
        }

        Motion::Still
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
