//! Property-based invariant tests for step quantization and the row model.
//!
//! 1. step_from_tick(tick_from_step(s)) == s for every step policy
//! 2. Steps map to disjoint, ordered tick ranges
//! 3. Step summaries cover every row exactly once, in order
//! 4. Rows are sorted by step and every event row sits in its own step
//! 5. Rebuilding with unchanged inputs is idempotent

use proptest::prelude::*;
use seqer_core::{EventFilter, EventKind, EventType, RowModel, Sequence, StepIndex, StepSize};

// ── Strategies ──────────────────────────────────────────────────────────

fn step_size_strategy() -> impl Strategy<Value = StepSize> {
    prop_oneof![
        (1u64..5000).prop_map(StepSize::TicksPerStep),
        (1u32..=64).prop_map(StepSize::StepsPerBeat),
        (1u32..=64).prop_map(StepSize::StepsPerMeasure),
    ]
}

fn time_signature_strategy() -> impl Strategy<Value = Vec<(u64, u8, u8)>> {
    prop::collection::vec((0u64..200_000, 1u8..16, prop_oneof![Just(2u8), Just(4u8), Just(8u8), Just(16u8)]), 0..5)
        .prop_map(|mut sigs| {
            sigs.sort_by_key(|s| s.0);
            sigs
        })
}

#[derive(Debug, Clone)]
enum Kind {
    Note(u8),
    Marker,
    Control(u8),
}

fn event_strategy() -> impl Strategy<Value = (u64, u16, Kind)> {
    (
        0u64..50_000,
        1u16..4,
        prop_oneof![
            (0u8..16).prop_map(Kind::Note),
            Just(Kind::Marker),
            (0u8..16).prop_map(Kind::Control),
        ],
    )
}

fn build_sequence(events: &[(u64, u16, Kind)]) -> Sequence {
    let mut seq = Sequence::new(480);
    for (tick, track, kind) in events {
        let kind = match kind {
            Kind::Note(channel) => EventKind::Note { channel: *channel, note: 60, velocity: 100, duration: 120 },
            Kind::Marker => EventKind::Marker("m".into()),
            Kind::Control(channel) => EventKind::ControlChange { channel: *channel, number: 7, value: 64 },
        };
        seq.create(*tick, *track, kind);
    }
    seq
}

fn filter_strategy() -> impl Strategy<Value = EventFilter> {
    (
        prop::collection::vec(prop_oneof![Just(EventType::Note), Just(EventType::Marker), Just(EventType::ControlChange)], 0..3),
        prop::collection::vec(1u16..4, 0..3),
        prop::collection::vec(0u8..16, 0..3),
    )
        .prop_map(|(types, tracks, channels)| {
            EventFilter::new()
                .with_event_types(types)
                .with_tracks(tracks)
                .with_channels(channels)
        })
}

// ── Step index ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn step_round_trip(size in step_size_strategy(), sigs in time_signature_strategy(), step in 0u64..2000) {
        let index = StepIndex::new(size, 480, &sigs).unwrap();
        prop_assert_eq!(index.step_from_tick(index.tick_from_step(step)), step);
    }

    #[test]
    fn steps_are_disjoint_and_ordered(size in step_size_strategy(), sigs in time_signature_strategy(), step in 0u64..2000) {
        let index = StepIndex::new(size, 480, &sigs).unwrap();
        let start = index.tick_from_step(step);
        let next = index.tick_from_step(step + 1);
        prop_assert!(next > start);
        prop_assert_eq!(index.step_from_tick(next - 1), step);
    }

    #[test]
    fn fractional_step_floors_to_step(size in step_size_strategy(), tick in 0u64..100_000) {
        let index = StepIndex::new(size, 480, &[]).unwrap();
        prop_assert_eq!(index.fractional_step_from_tick(tick).floor() as u64, index.step_from_tick(tick));
    }
}

// ── Row model ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn step_summaries_cover_rows(
        events in prop::collection::vec(event_strategy(), 0..60),
        filter in filter_strategy(),
        size in step_size_strategy(),
    ) {
        let seq = build_sequence(&events);
        let index = StepIndex::new(size, seq.ppq, &[]).unwrap();
        let mut model = RowModel::new();
        model.rebuild(seq.iter(), &filter, &index);

        let mut expected_first = 0usize;
        for (step, summary) in model.steps().iter().enumerate() {
            prop_assert_eq!(summary.first_row, expected_first);
            prop_assert!(summary.first_row <= summary.last_row);
            for row in summary.first_row..=summary.last_row {
                prop_assert_eq!(model.rows()[row].step, step as u64);
            }
            expected_first = summary.last_row + 1;
        }
        prop_assert_eq!(expected_first, model.row_count());
    }

    #[test]
    fn rows_hold_filtered_events_in_order(
        events in prop::collection::vec(event_strategy(), 0..60),
        filter in filter_strategy(),
        size in step_size_strategy(),
    ) {
        let seq = build_sequence(&events);
        let index = StepIndex::new(size, seq.ppq, &[]).unwrap();
        let mut model = RowModel::new();
        model.rebuild(seq.iter(), &filter, &index);

        let shown: Vec<_> = model.rows().iter().filter_map(|r| r.event.map(|e| e.id)).collect();
        let expected: Vec<_> = seq.iter().filter(|e| filter.accepts(e)).map(|e| e.id).collect();
        prop_assert_eq!(shown, expected);

        for pair in model.rows().windows(2) {
            prop_assert!(pair[0].step <= pair[1].step);
            // Placeholder rows only fill steps that have no event
            if pair[0].step == pair[1].step {
                prop_assert!(pair[0].event.is_some() && pair[1].event.is_some());
            }
        }
        for (n, row) in model.rows().iter().enumerate() {
            if let Some(event) = row.event {
                prop_assert_eq!(index.step_from_tick(event.tick), row.step);
                prop_assert_eq!(model.tick_from_row(n, &index), event.tick);
            }
        }
    }

    #[test]
    fn rebuild_is_idempotent(
        events in prop::collection::vec(event_strategy(), 0..60),
        filter in filter_strategy(),
        size in step_size_strategy(),
    ) {
        let seq = build_sequence(&events);
        let index = StepIndex::new(size, seq.ppq, &[]).unwrap();
        let mut first = RowModel::new();
        first.rebuild(seq.iter(), &filter, &index);
        let mut second = first.clone();
        second.rebuild(seq.iter(), &filter, &index);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn lookups_extrapolate_one_row_per_step(
        events in prop::collection::vec(event_strategy(), 1..30),
        extra in 1u64..50,
    ) {
        let seq = build_sequence(&events);
        let index = StepIndex::new(StepSize::StepsPerBeat(4), seq.ppq, &[]).unwrap();
        let mut model = RowModel::new();
        model.rebuild(seq.iter(), &EventFilter::new(), &index);

        let step = model.step_count() as u64 - 1 + extra;
        let row = model.first_row_from_step(step);
        prop_assert_eq!(row, model.row_count() - 1 + extra as usize);
        prop_assert_eq!(model.last_row_from_step(step), row);
        prop_assert_eq!(model.step_from_row(row), step);
    }
}
