//! Multi-body retrieval on a shared time grid.

mod common;

use std::sync::Arc;

use common::{calendar, quick_config, synthetic_payload, Scripted, ScriptedHorizons, SyntheticHorizons};
use ephemerist::ephemerist::{Body, Ephemerist};
use ephemerist::ephemerist_errors::EphemeristError;
use ephemerist::query::{FrameSpec, Query, Step, StepUnit};

fn template() -> Query {
    let step = Step::new(1, StepUnit::Days).unwrap();
    Query::from_calendar(
        "399",
        "2020-01-01 00:00:00",
        "2020-01-05 00:00:00",
        step,
        FrameSpec::default(),
    )
    .unwrap()
}

#[test]
fn test_grid_fetch_shares_one_time_axis() {
    let mock = Arc::new(SyntheticHorizons::new());
    let engine = Ephemerist::with_service(Box::new(mock.clone()), quick_config());

    let bodies = [Body::new("Earth", "399"), Body::new("Mars", "499")];
    let dataset = engine.fetch_grid(&bodies, &template()).unwrap();

    assert_eq!(dataset.t_jd.len(), 5);
    assert_eq!(dataset.objects.len(), 2);
    for (command, vectors) in &dataset.objects {
        assert_eq!(vectors.pv.len(), dataset.t_jd.len() * 6);
        assert!(command == "399" || command == "499");
    }
    assert_eq!(dataset.objects["399"].name, "Earth");
    assert_eq!(dataset.objects["499"].name, "Mars");

    // one call per body, each carrying its own command
    let calls = mock.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].command, "399");
    assert_eq!(calls[1].command, "499");
}

#[test]
fn test_grid_mismatch_names_the_offending_body() {
    let aligned = synthetic_payload(
        calendar("2020-01-01 00:00:00"),
        calendar("2020-01-05 00:00:00"),
        86_400,
    );
    // second body's grid is shifted by one minute
    let shifted = synthetic_payload(
        calendar("2020-01-01 00:01:00"),
        calendar("2020-01-05 00:01:00"),
        86_400,
    );
    let mock = Arc::new(ScriptedHorizons::new(vec![
        Scripted::Payload(aligned),
        Scripted::Payload(shifted),
    ]));
    let engine = Ephemerist::with_service(Box::new(mock), quick_config());

    let bodies = [Body::new("Earth", "399"), Body::new("Mars", "499")];
    match engine.fetch_grid(&bodies, &template()) {
        Err(EphemeristError::GridMismatch { body, detail }) => {
            assert_eq!(body, "Mars");
            assert!(detail.contains("sample 0"));
        }
        other => panic!("expected a grid mismatch, got {other:?}"),
    }
}

#[test]
fn test_grid_length_mismatch_is_fatal() {
    let full = synthetic_payload(
        calendar("2020-01-01 00:00:00"),
        calendar("2020-01-05 00:00:00"),
        86_400,
    );
    // second body comes back one sample short
    let short = synthetic_payload(
        calendar("2020-01-01 00:00:00"),
        calendar("2020-01-04 00:00:00"),
        86_400,
    );
    let mock = Arc::new(ScriptedHorizons::new(vec![
        Scripted::Payload(full),
        Scripted::Payload(short),
    ]));
    let engine = Ephemerist::with_service(Box::new(mock), quick_config());

    let bodies = [Body::new("Earth", "399"), Body::new("Mars", "499")];
    match engine.fetch_grid(&bodies, &template()) {
        Err(EphemeristError::GridMismatch { body, .. }) => assert_eq!(body, "Mars"),
        other => panic!("expected a grid mismatch, got {other:?}"),
    }
}

#[test]
fn test_grid_fetch_with_no_bodies_is_rejected() {
    let mock = Arc::new(SyntheticHorizons::new());
    let engine = Ephemerist::with_service(Box::new(mock.clone()), quick_config());

    match engine.fetch_grid(&[], &template()) {
        Err(EphemeristError::InvalidQuery(_)) => {}
        other => panic!("expected an invalid-query error, got {other:?}"),
    }
    assert_eq!(mock.call_count(), 0);
}
