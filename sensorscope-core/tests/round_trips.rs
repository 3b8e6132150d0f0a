//! Integration tests for round-trip matching and grouping

mod common;

use proptest::prelude::*;
use sensorscope_core::{
    round_trip_table, Event, EventSeries, RoundTripMatcher, RoundTripTable, SENTINEL_LABEL,
};

use common::circulating_trays;

#[test]
fn reference_sequence() {
    let events = EventSeries::new(vec![
        Event::new(0, 1),
        Event::new(5_000, 2),
        Event::new(10_000, 1),
        Event::new(20_000, 2),
    ])
    .unwrap();

    let (records, table) = round_trip_table(&events);
    let pairs: Vec<_> = records.iter().map(|r| (r.label, r.elapsed_secs)).collect();
    assert_eq!(pairs, vec![(1, 10.0), (2, 15.0)]);
    assert_eq!(table.get(1).unwrap().count, 1);
    assert_eq!(table.get(2).unwrap().count, 1);
}

#[test]
fn circulating_trays_have_constant_lap_time() {
    // 4 trays, one slot every 30 s, 5 laps: every return takes 4 * 30 s
    let events = circulating_trays(&[11, 12, 13, 14], 5, 30_000, None);
    let (records, table) = round_trip_table(&events);

    assert_eq!(records.len(), 4 * 4);
    assert_eq!(table.len(), 4);
    for (_, stats) in table.iter() {
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 120.0);
        assert_eq!(stats.std_dev, Some(0.0));
    }
}

#[test]
fn idle_slots_are_excluded_but_still_take_time() {
    let events = circulating_trays(&[1, 2, 3], 4, 10_000, Some(5));
    assert!(events.events().iter().any(|e| e.label == SENTINEL_LABEL));

    let (records, table) = round_trip_table(&events);
    assert!(records.iter().all(|r| r.label != SENTINEL_LABEL));
    assert!(table.get(SENTINEL_LABEL).is_none());
    // Laps containing an idle slot take one slot longer
    assert!(records.iter().all(|r| r.elapsed_secs == 30.0 || r.elapsed_secs == 40.0));
    assert!(records.iter().any(|r| r.elapsed_secs == 40.0));
}

#[test]
fn unique_labels_give_empty_table() {
    let events = EventSeries::new((0..50).map(|i| Event::new(i * 1_000, i as u32 + 1)).collect())
        .unwrap();
    let (records, table) = round_trip_table(&events);
    assert!(records.is_empty());
    assert!(table.is_empty());
}

#[test]
fn grouping_empty_records_is_idempotent() {
    let once = RoundTripTable::from_records(&[]);
    let twice = RoundTripTable::from_records(&[]);
    assert!(once.is_empty());
    assert_eq!(once, twice);
}

proptest! {
    #[test]
    fn record_count_is_events_minus_distinct_labels(
        labels in proptest::collection::vec(0u32..6, 0..200),
    ) {
        let events = EventSeries::new(
            labels.iter().enumerate().map(|(i, &l)| Event::new(i as u64 * 1_000, l)).collect(),
        ).unwrap();

        let records = RoundTripMatcher::new().match_series(&events);
        let kept: Vec<_> = labels.iter().copied().filter(|&l| l != SENTINEL_LABEL).collect();
        let mut distinct = kept.clone();
        distinct.sort_unstable();
        distinct.dedup();

        prop_assert_eq!(records.len(), kept.len() - distinct.len());
        prop_assert!(records.iter().all(|r| r.label != SENTINEL_LABEL && r.elapsed_secs > 0.0));

        let table = RoundTripTable::from_records(&records);
        let total: usize = table.iter().map(|(_, s)| s.count).sum();
        prop_assert_eq!(total, records.len());
    }
}
