//! Integration tests for mock content: variant cycle, template selection,
//! engagement reproducibility, and the JSON shape `--dump` prints.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use reels::feed::{generate_engagement, generate_range, item_at, MediaFeedGenerator};
use reels::media::{MediaItem, MediaKind};

#[test]
fn first_batch_cycles_variants() {
    let kinds: Vec<MediaKind> = MediaFeedGenerator::new()
        .generate_batch(10)
        .iter()
        .map(MediaItem::kind)
        .collect();
    use MediaKind::*;
    assert_eq!(
        kinds,
        vec![Text, Image, Video, Game, Text, Image, Video, Game, Text, Image]
    );
}

#[test]
fn batches_continue_where_the_last_stopped() {
    let mut generator = MediaFeedGenerator::new();
    let first = generator.generate_batch(10);
    let second = generator.generate_batch(5);
    assert_eq!(second[0].id(), "video-10");
    assert_eq!(second[0], item_at(10));
    assert_eq!(
        [first, second].concat(),
        generate_range(0, 15),
    );
}

#[test]
fn templates_rotate_every_cycle() {
    let titles: Vec<String> = (0..4)
        .map(|round| item_at(round * 4 + 3).title().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["Click Master", "Bubble Pop", "Speed Tap", "Click Master"]
    );
}

#[test]
fn engagement_is_reproducible() {
    let a = generate_engagement(&["a", "b"], Some(5));
    let b = generate_engagement(&["a", "b"], Some(5));
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}

#[test]
fn missing_seed_matches_zero() {
    let ids = ["text-0", "image-1", "video-2"];
    assert_eq!(
        generate_engagement(&ids, None),
        generate_engagement(&ids, Some(0))
    );
}

#[test]
fn extreme_seeds_wrap_instead_of_overflowing() {
    let ids = ["a", "b", "c"];
    for seed in [i64::MAX, i64::MAX - 1, i64::MIN] {
        let counters = generate_engagement(&ids, Some(seed));
        assert_eq!(counters.len(), 3);
        assert_eq!(counters, generate_engagement(&ids, Some(seed)));
    }
}

#[test]
fn every_generated_item_is_valid() {
    for item in generate_range(0, 60) {
        assert_eq!(item.validate(), Ok(()), "{} failed validation", item.id());
    }
}

#[test]
fn dumped_items_are_tagged_by_kind() {
    let json = serde_json::to_value(item_at(2)).unwrap();
    assert_eq!(json["kind"], "video");
    assert_eq!(json["id"], "video-2");
    assert_eq!(json["duration_seconds"], 30);

    let back: MediaItem = serde_json::from_value(json).unwrap();
    assert_eq!(back, item_at(2));
}

proptest! {
    #[test]
    fn engagement_stays_in_range(seed in any::<i64>(), n in 1usize..40) {
        let ids: Vec<String> = (0..n).map(|i| format!("id-{}", i)).collect();
        let counters = generate_engagement(&ids, Some(seed));
        prop_assert_eq!(counters.len(), n);
        for engagement in counters.values() {
            prop_assert!((10..=209).contains(&engagement.likes));
            prop_assert!((1..=20).contains(&engagement.shares));
        }
    }

    #[test]
    fn ids_encode_kind_and_position(position in 0usize..10_000) {
        let item = item_at(position);
        let expected = format!("{}-{}", MediaKind::CYCLE[position % 4], position);
        prop_assert_eq!(item.id(), expected.as_str());
    }
}
