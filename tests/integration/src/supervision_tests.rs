//! Safety supervision scenarios: deadlines, liveliness reports, recovery.

use std::time::Duration;

use helmlink_bus::CommandBus;
use helmlink_core::event::BusEvent;
use helmlink_core::types::{Direction, SteeringCommand};

use crate::test_utils::{SteeringHarness, COMMAND_TOPIC, STATUS_TOPIC};

const T0: Duration = Duration::ZERO;

/// Steady 100ms cadence, 300ms deadline: silence trips the deadline flag
/// but, with the publisher still alive, produces no safe output.
#[test]
fn deadline_alone_is_informational() {
    let mut h = SteeringHarness::new();
    let only = h.bus.attach_publisher(COMMAND_TOPIC, 5).unwrap();

    for (i, at) in [0u64, 100, 200].iter().enumerate() {
        only.publish(SteeringCommand {
            position: i as f32,
        })
        .unwrap();
        h.pump_at(Duration::from_millis(*at));
    }
    assert_eq!(h.outputs().len(), 3);

    // 350ms after the last accepted sample: deadline (300ms) lapsed, lease
    // (500ms) has not.
    h.pump_at(Duration::from_millis(550));
    assert!(h.runtime.health().deadline_missed);
    assert!(!h.runtime.health().degraded());
    assert!(h.outputs().is_empty(), "deadline alone writes nothing");

    // The next accepted sample clears the flag and relays normally.
    only.publish(SteeringCommand { position: 7.0 }).unwrap();
    h.pump_at(Duration::from_millis(600));
    assert!(!h.runtime.health().deadline_missed);
    assert_eq!(h.outputs(), vec![7.0]);
}

#[test]
fn transport_liveliness_report_forces_safe_state() {
    let mut h = SteeringHarness::new();
    let only = h.bus.attach_publisher(COMMAND_TOPIC, 5).unwrap();
    h.pump_at(T0);

    let command_endpoint = h
        .bus
        .find_endpoint(COMMAND_TOPIC, Direction::Subscribe)
        .unwrap();
    let report = BusEvent::LivelinessChanged {
        endpoint: command_endpoint.id(),
        publisher: only.id(),
        alive_delta: -1,
    };
    h.runtime
        .process(vec![report], h.epoch + Duration::from_millis(10))
        .unwrap();

    assert!(h.runtime.health().liveliness_lost);
    assert_eq!(h.outputs(), vec![0.0]);

    // A fresh sample revives the publisher and resumes the relay.
    only.publish(SteeringCommand { position: 2.5 }).unwrap();
    h.pump_at(Duration::from_millis(20));
    assert!(!h.runtime.health().degraded());
    assert_eq!(h.outputs(), vec![2.5]);
}

#[test]
fn replayed_match_event_does_not_move_authority() {
    let mut h = SteeringHarness::new();
    let first = h.bus.attach_publisher(COMMAND_TOPIC, 15).unwrap();
    let second = h.bus.attach_publisher(COMMAND_TOPIC, 15).unwrap();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(first.id()));

    let command_endpoint = h
        .bus
        .find_endpoint(COMMAND_TOPIC, Direction::Subscribe)
        .unwrap();
    let replay = BusEvent::MatchChanged {
        endpoint: command_endpoint.id(),
        publisher: second.id(),
        strength: 15,
        delta: 1,
    };
    h.runtime.process(vec![replay], h.epoch).unwrap();
    assert_eq!(h.runtime.authoritative(), Some(first.id()));
}

#[test]
fn events_for_other_endpoints_are_ignored() {
    let mut h = SteeringHarness::new();
    let status_endpoint = h
        .bus
        .find_endpoint(STATUS_TOPIC, Direction::Publish)
        .unwrap();

    let stray = BusEvent::DataAvailable {
        endpoint: status_endpoint.id(),
    };
    h.runtime.process(vec![stray], h.epoch).unwrap();
    assert!(h.outputs().is_empty());
    assert_eq!(h.runtime.authoritative(), None);
}

/// Degradation, recovery, and a second degradation each produce exactly one
/// safe output: the latch resets on recovery, not before.
#[test]
fn safe_output_latch_resets_on_recovery() {
    let mut h = SteeringHarness::new();

    let first = h.bus.attach_publisher(COMMAND_TOPIC, 10).unwrap();
    h.pump_at(T0);
    first.detach();
    h.pump_at(T0);
    assert_eq!(h.outputs(), vec![0.0]);

    let second = h.bus.attach_publisher(COMMAND_TOPIC, 10).unwrap();
    h.pump_at(T0);
    assert!(h.outputs().is_empty(), "recovery writes nothing");

    second.publish(SteeringCommand { position: 6.0 }).unwrap();
    h.pump_at(T0);
    assert_eq!(h.outputs(), vec![6.0], "no residual safe value");

    second.detach();
    h.pump_at(T0);
    assert_eq!(h.outputs(), vec![0.0], "second episode, one fresh safe output");
}
