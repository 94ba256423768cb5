// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use strand_core::{materialize, HistoryConfig, HistoryError, RetentionPolicy, Snapshot, Timeline};
use strand_dry_tests::{churn_sequence, init_test_tracing, ChurnParams};

fn ingest_all(timeline: &mut Timeline<u32, u32>, params: ChurnParams) -> Vec<Snapshot<u32, u32>> {
    let snapshots = churn_sequence(params);
    for snapshot in &snapshots {
        timeline.ingest(snapshot.records()).unwrap();
    }
    snapshots
}

#[test]
fn timeline_reproduces_every_churned_snapshot() {
    init_test_tracing();
    let params = ChurnParams {
        steps: 200,
        key_space: 64,
        ..ChurnParams::default()
    };
    let mut timeline = Timeline::default();
    let snapshots = ingest_all(&mut timeline, params);

    assert_eq!(timeline.time(), 200);
    assert_eq!(timeline.chain().len(), 200);
    for (ix, expected) in snapshots.iter().enumerate() {
        let t = ix as u64 + 1;
        assert_eq!(&timeline.snapshot_at(t).unwrap(), expected, "t = {t}");
    }
    assert!(timeline.history().set_eq(&materialize(snapshots)));
}

#[test]
fn observation_stays_bounded_by_current_snapshot() {
    let mut timeline = Timeline::default();
    let snapshots = ingest_all(&mut timeline, ChurnParams::default());
    let last = snapshots.last().unwrap();
    assert_eq!(timeline.observation().len(), last.len());
    assert_eq!(&timeline.current(), last);
}

#[test]
fn retained_window_answers_recent_queries_only() {
    let config = HistoryConfig::default().with_retention(RetentionPolicy::KeepRecent { window: 8 });
    let mut timeline = Timeline::new(config);
    let params = ChurnParams {
        seed: 0xdead_beef,
        steps: 40,
        ..ChurnParams::default()
    };
    let snapshots = ingest_all(&mut timeline, params);

    assert_eq!(timeline.chain().len(), 8);
    assert_eq!(timeline.chain().earliest_queryable(), 32);
    for t in 32..=40_u64 {
        let expected = &snapshots[usize::try_from(t - 1).unwrap()];
        assert_eq!(&timeline.snapshot_at(t).unwrap(), expected, "t = {t}");
    }
    assert_eq!(
        timeline.snapshot_at(31).unwrap_err(),
        HistoryError::TimeOutOfRange {
            requested: 31,
            earliest: 32,
        }
    );
    assert!(matches!(
        timeline.snapshot_at(41),
        Err(HistoryError::FutureTime { .. })
    ));
}

#[test]
fn bootstrapped_timeline_continues_the_sequence() {
    let params = ChurnParams {
        steps: 30,
        ..ChurnParams::default()
    };
    let snapshots = churn_sequence(params);
    let (head, tail) = snapshots.split_at(20);
    let history = materialize(head.to_vec());

    let mut timeline = Timeline::bootstrap(&history, 20, HistoryConfig::default()).unwrap();
    for snapshot in tail {
        timeline.ingest(snapshot.records()).unwrap();
    }

    assert_eq!(timeline.time(), 30);
    for (ix, expected) in snapshots.iter().enumerate() {
        let t = ix as u64 + 1;
        assert_eq!(&timeline.snapshot_at(t).unwrap(), expected, "t = {t}");
    }
}
