//! Deterministic mock content for the feed.
//!
//! Every item is a pure function of its absolute position: the variant cycles
//! through [`MediaKind::CYCLE`] and the template is chosen from a small fixed
//! pool. The generator only remembers where the next batch starts.

use crate::media::{Engagement, EngagementCounters, MediaItem, MediaKind};

/// Number of template "rounds" before the selection wraps.
const TEMPLATE_ROUNDS: usize = 5;

struct TextTemplate {
    content: &'static str,
    background: &'static str,
}

struct ImageTemplate {
    url: &'static str,
    alt: &'static str,
}

struct VideoTemplate {
    url: &'static str,
    thumbnail: &'static str,
    duration: u32,
}

struct GameTemplate {
    title: &'static str,
    description: &'static str,
}

const TEXT_TEMPLATES: [TextTemplate; 5] = [
    TextTemplate {
        content: "The only way to do great work is to love what you do.",
        background: "purple",
    },
    TextTemplate {
        content: "Innovation distinguishes between a leader and a follower.",
        background: "blue",
    },
    TextTemplate {
        content: "Life is what happens when you're busy making other plans.",
        background: "orange",
    },
    TextTemplate {
        content: "The future belongs to those who believe in the beauty of their dreams.",
        background: "green",
    },
    TextTemplate {
        content: "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        background: "indigo",
    },
];

const IMAGE_TEMPLATES: [ImageTemplate; 5] = [
    ImageTemplate {
        url: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&h=1200&fit=crop",
        alt: "Mountain landscape",
    },
    ImageTemplate {
        url: "https://images.unsplash.com/photo-1448630360428-65456885c650?w=800&h=1200&fit=crop",
        alt: "Modern building",
    },
    ImageTemplate {
        url: "https://images.unsplash.com/photo-1541961017774-22349e4a1262?w=800&h=1200&fit=crop",
        alt: "Abstract art",
    },
    ImageTemplate {
        url: "https://images.unsplash.com/photo-1501594907352-04cda38ebc29?w=800&h=1200&fit=crop",
        alt: "Ocean waves",
    },
    ImageTemplate {
        url: "https://images.unsplash.com/photo-1470071459604-3b5ec3a7fe05?w=800&h=1200&fit=crop",
        alt: "Starry night",
    },
];

const VIDEO_TEMPLATES: [VideoTemplate; 3] = [
    VideoTemplate {
        url: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
        thumbnail: "https://images.unsplash.com/photo-1545274443-e3488c5b3d3a?w=800&h=1200&fit=crop",
        duration: 30,
    },
    VideoTemplate {
        url: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
        thumbnail: "https://images.unsplash.com/photo-1514565131-fce0801e5785?w=800&h=1200&fit=crop",
        duration: 45,
    },
    VideoTemplate {
        url: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
        thumbnail: "https://images.unsplash.com/photo-1579546929518-9e396f3a8039?w=800&h=1200&fit=crop",
        duration: 15,
    },
];

const GAME_TEMPLATES: [GameTemplate; 3] = [
    GameTemplate {
        title: "Click Master",
        description: "Click the circle as fast as you can!",
    },
    GameTemplate {
        title: "Bubble Pop",
        description: "Pop the bubbles before they disappear!",
    },
    GameTemplate {
        title: "Speed Tap",
        description: "Tap the targets as quickly as possible!",
    },
];

/// Build the item at an absolute feed position.
pub fn item_at(position: usize) -> MediaItem {
    let kind = MediaKind::CYCLE[position % MediaKind::CYCLE.len()];
    let round = (position / MediaKind::CYCLE.len()) % TEMPLATE_ROUNDS;
    let id = format!("{}-{}", kind, position);

    match kind {
        MediaKind::Text => {
            let t = &TEXT_TEMPLATES[round % TEXT_TEMPLATES.len()];
            MediaItem::Text {
                id,
                title: "Inspiration".to_string(),
                content: t.content.to_string(),
                background_style: t.background.to_string(),
                text_style: "white".to_string(),
            }
        }
        MediaKind::Image => {
            let t = &IMAGE_TEMPLATES[round % IMAGE_TEMPLATES.len()];
            MediaItem::Image {
                id,
                title: "Nature".to_string(),
                url: t.url.to_string(),
                alt_text: t.alt.to_string(),
                photographer_name: Some(format!("Photographer {}", round + 1)),
            }
        }
        MediaKind::Video => {
            let t = &VIDEO_TEMPLATES[round % VIDEO_TEMPLATES.len()];
            MediaItem::Video {
                id,
                title: "Video Content".to_string(),
                url: t.url.to_string(),
                thumbnail_url: t.thumbnail.to_string(),
                duration_seconds: Some(t.duration),
            }
        }
        MediaKind::Game => {
            let t = &GAME_TEMPLATES[round % GAME_TEMPLATES.len()];
            MediaItem::Game {
                id,
                title: t.title.to_string(),
                description: t.description.to_string(),
                high_score: 0,
            }
        }
    }
}

/// Items for positions `start..start + count`.
pub fn generate_range(start: usize, count: usize) -> Vec<MediaItem> {
    (start..start + count).map(item_at).collect()
}

/// Deterministic value in `[0, 1)` derived from `v`.
///
/// `frac(sin(v) * 10000)`: a cheap hash with no state, so the same input
/// always yields the same counters.
pub fn seeded_unit(v: i64) -> f64 {
    let x = (v as f64).sin() * 10_000.0;
    let frac = x - x.floor();
    // A tiny negative x rounds up to exactly 1.0
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

/// Cosmetic counters for `ids`.
///
/// The value for the id at list position `i` is derived from `seed + i`, or
/// from `i` alone when no seed is given. Likes land in `[10, 209]` and shares
/// in `[1, 20]`.
pub fn generate_engagement<S: AsRef<str>>(ids: &[S], seed: Option<i64>) -> EngagementCounters {
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            // Any i64 is a valid seed; the sums only feed the sine hash
            let v = seed.unwrap_or(0).wrapping_add(i as i64);
            let engagement = Engagement {
                likes: scale(seeded_unit(v), 200) + 10,
                shares: scale(seeded_unit(v.wrapping_add(1000)), 20) + 1,
            };
            (id.as_ref().to_string(), engagement)
        })
        .collect()
}

fn scale(unit: f64, span: u32) -> u32 {
    // `unit` is in [0, 1) so the product stays below `span`
    ((unit * f64::from(span)).floor() as u32).min(span - 1)
}

/// Stateful batch source: each call continues where the previous one stopped,
/// so ids stay unique across pages.
#[derive(Debug, Default)]
pub struct MediaFeedGenerator {
    next_position: usize,
}

impl MediaFeedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position the next batch will start at.
    pub fn next_position(&self) -> usize {
        self.next_position
    }

    pub fn generate_batch(&mut self, count: usize) -> Vec<MediaItem> {
        let batch = generate_range(self.next_position, count);
        tracing::debug!(
            start = self.next_position,
            count,
            "Generated media batch"
        );
        self.next_position += count;
        batch
    }
}

// ============================================================================
// Tests
// ============================================================================
