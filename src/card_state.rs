//! Ephemeral per-card view state.
//!
//! This is the state a card holds only while it is mounted: whether its
//! media has finished loading, video playback, and the bubble game. It never
//! feeds back into the feed itself; the app drops it when a card falls out of
//! its LRU cache, and a remounted card starts over.

use rand::Rng;
use std::time::Duration;

use crate::media::MediaItem;

/// Simulated time for an image to finish loading.
pub const IMAGE_LOAD_TIME: Duration = Duration::from_millis(400);

/// Simulated time for a video's first frame to arrive.
pub const VIDEO_LOAD_TIME: Duration = Duration::from_millis(600);

/// Used when a video has no declared duration.
pub const FALLBACK_VIDEO_DURATION: Duration = Duration::from_secs(30);

/// Bubbles on screen during a game.
pub const BUBBLE_COUNT: usize = 5;

/// Points per popped bubble.
pub const POINTS_PER_POP: u32 = 10;

// ============================================================================
// Card State
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CardState {
    /// Text cards have nothing to track.
    Text,
    Image(LoadProgress),
    Video(VideoState),
    Game(GameState),
}

impl CardState {
    /// Fresh state for a card that has just mounted.
    pub fn for_item(item: &MediaItem) -> Self {
        match item {
            MediaItem::Text { .. } => Self::Text,
            MediaItem::Image { .. } => Self::Image(LoadProgress::new(IMAGE_LOAD_TIME)),
            MediaItem::Video {
                duration_seconds, ..
            } => Self::Video(VideoState::new(
                duration_seconds
                    .map(|s| Duration::from_secs(u64::from(s)))
                    .unwrap_or(FALLBACK_VIDEO_DURATION),
            )),
            MediaItem::Game { .. } => Self::Game(GameState::default()),
        }
    }

    /// Called whenever the active card changes.
    pub fn set_active(&mut self, active: bool) {
        if let Self::Video(video) = self {
            video.set_active(active);
        }
    }

    /// Advance by one frame. Returns `true` when the card looks different.
    pub fn tick<R: Rng>(&mut self, dt: Duration, active: bool, rng: &mut R) -> bool {
        match self {
            Self::Text => false,
            Self::Image(load) => load.advance(dt),
            Self::Video(video) => video.tick(dt),
            Self::Game(game) if active => game.tick(dt, rng),
            Self::Game(_) => false,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    elapsed: Duration,
    required: Duration,
}

impl LoadProgress {
    pub fn new(required: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            required,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.elapsed >= self.required
    }

    /// Returns `true` only on the frame that completes the load.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.is_loaded() {
            return false;
        }
        self.elapsed += dt;
        self.is_loaded()
    }
}

// ============================================================================
// Video
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoState {
    pub load: LoadProgress,
    pub playing: bool,
    pub position: Duration,
    pub duration: Duration,
}

impl VideoState {
    pub fn new(duration: Duration) -> Self {
        Self {
            load: LoadProgress::new(VIDEO_LOAD_TIME),
            playing: false,
            position: Duration::ZERO,
            duration,
        }
    }

    /// Becoming active starts playback; leaving pauses it.
    pub fn set_active(&mut self, active: bool) {
        self.playing = active;
    }

    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Fraction of the clip played, in `0.0..1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.position.as_secs_f64() / self.duration.as_secs_f64()
    }

    fn tick(&mut self, dt: Duration) -> bool {
        if self.load.advance(dt) {
            return true;
        }
        if !self.load.is_loaded() || !self.playing || self.duration.is_zero() {
            return false;
        }
        // Clips loop
        let nanos = (self.position + dt).as_nanos() % self.duration.as_nanos();
        self.position = Duration::from_nanos(nanos as u64);
        true
    }
}

// ============================================================================
// Bubble Game
// ============================================================================

/// One bubble, positioned in card-relative coordinates.
///
/// `x` and `y` run from 0.0 (left/top) to 1.0 (right/bottom); `radius` is in
/// card heights. Bubbles rise and wrap back below the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Card heights per second.
    pub speed: f64,
    /// Index into the renderer's bubble colors.
    pub hue: usize,
}

impl Bubble {
    fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            x: rng.gen::<f64>(),
            y: rng.gen::<f64>(),
            radius: rng.gen_range(0.06..0.14),
            speed: rng.gen_range(0.08..0.25),
            hue: rng.gen(),
        }
    }

    fn respawn_below<R: Rng>(&mut self, rng: &mut R) {
        self.y = 1.0 + self.radius;
        self.x = rng.gen::<f64>();
        self.hue = rng.gen();
    }

    /// Hit test in card coordinates. `aspect` is the card's width divided by
    /// its height, in the same units as the radius.
    pub fn contains(&self, x: f64, y: f64, aspect: f64) -> bool {
        let dx = (x - self.x) * aspect;
        let dy = y - self.y;
        (dx * dx + dy * dy).sqrt() < self.radius
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub started: bool,
    pub score: u32,
    pub bubbles: Vec<Bubble>,
}

impl GameState {
    /// Start (or restart) a round. Score resets; bubbles are kept if any.
    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        self.started = true;
        self.score = 0;
        if self.bubbles.is_empty() {
            self.bubbles = (0..BUBBLE_COUNT).map(|_| Bubble::random(rng)).collect();
        }
    }

    /// Pop every bubble under the point. Returns the points gained.
    pub fn pop_at<R: Rng>(&mut self, x: f64, y: f64, aspect: f64, rng: &mut R) -> u32 {
        if !self.started {
            return 0;
        }
        let mut gained = 0;
        for bubble in self.bubbles.iter_mut() {
            if bubble.contains(x, y, aspect) {
                gained += POINTS_PER_POP;
                bubble.respawn_below(rng);
            }
        }
        self.score += gained;
        gained
    }

    fn tick<R: Rng>(&mut self, dt: Duration, rng: &mut R) -> bool {
        if !self.started {
            return false;
        }
        let secs = dt.as_secs_f64();
        for bubble in self.bubbles.iter_mut() {
            bubble.y -= bubble.speed * secs;
            if bubble.y + bubble.radius < 0.0 {
                bubble.respawn_below(rng);
            }
        }
        !self.bubbles.is_empty()
    }
}
