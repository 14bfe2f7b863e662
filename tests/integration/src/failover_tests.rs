//! Ownership failover scenarios over the loopback bus.

use std::time::Duration;

use helmlink_core::types::SteeringCommand;

use crate::test_utils::{SteeringHarness, COMMAND_TOPIC};

const T0: Duration = Duration::ZERO;

#[test]
fn strongest_controller_owns_the_stream() {
    let mut h = SteeringHarness::new();

    let weak = h.bus.attach_publisher(COMMAND_TOPIC, 10).unwrap();
    let strong = h.bus.attach_publisher(COMMAND_TOPIC, 20).unwrap();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(strong.id()));

    weak.publish(SteeringCommand { position: 1.0 }).unwrap();
    strong.publish(SteeringCommand { position: 2.0 }).unwrap();
    weak.publish(SteeringCommand { position: 3.0 }).unwrap();
    h.pump_at(T0);

    // Only the strong controller's command reaches the output.
    assert_eq!(h.outputs(), vec![2.0]);
}

#[test]
fn equal_strength_resolves_to_earliest_match() {
    let mut h = SteeringHarness::new();

    let first = h.bus.attach_publisher(COMMAND_TOPIC, 15).unwrap();
    let second = h.bus.attach_publisher(COMMAND_TOPIC, 15).unwrap();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(first.id()));

    // Removing the incumbent re-evaluates the tie.
    first.detach();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(second.id()));
}

#[test]
fn clean_unmatch_fails_over_without_safe_state() {
    let mut h = SteeringHarness::new();

    let backup = h.bus.attach_publisher(COMMAND_TOPIC, 10).unwrap();
    let primary = h.bus.attach_publisher(COMMAND_TOPIC, 20).unwrap();
    h.pump_at(T0);

    primary.publish(SteeringCommand { position: 8.0 }).unwrap();
    h.pump_at(T0);
    assert_eq!(h.outputs(), vec![8.0]);

    primary.detach();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(backup.id()));
    // A backup remains alive: failover is silent, no safe output.
    assert!(h.outputs().is_empty());

    backup.publish(SteeringCommand { position: -3.0 }).unwrap();
    h.pump_at(T0);
    assert_eq!(h.outputs(), vec![-3.0]);
}

#[test]
fn strength_change_reassigns_ownership_live() {
    let mut h = SteeringHarness::new();

    let a = h.bus.attach_publisher(COMMAND_TOPIC, 10).unwrap();
    let mut b = h.bus.attach_publisher(COMMAND_TOPIC, 5).unwrap();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(a.id()));

    b.set_strength(30).unwrap();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(b.id()));

    a.publish(SteeringCommand { position: 1.0 }).unwrap();
    b.publish(SteeringCommand { position: 9.0 }).unwrap();
    h.pump_at(T0);
    assert_eq!(h.outputs(), vec![9.0]);
}

/// The full redundancy walk from the design brief: A(10) and B(20) matched,
/// B owns; B unmatches, A takes over; A then lease-expires with nothing
/// else matched, producing exactly one safe output.
#[test]
fn redundancy_walkthrough_ends_in_single_safe_output() {
    let mut h = SteeringHarness::new();

    let a = h.bus.attach_publisher(COMMAND_TOPIC, 10).unwrap();
    let b = h.bus.attach_publisher(COMMAND_TOPIC, 20).unwrap();
    h.pump_at(T0);

    a.publish(SteeringCommand { position: 1.0 }).unwrap();
    b.publish(SteeringCommand { position: 2.0 }).unwrap();
    h.pump_at(T0);
    assert_eq!(h.outputs(), vec![2.0], "A is dropped, B relayed");

    b.detach();
    h.pump_at(T0);
    assert_eq!(h.runtime.authoritative(), Some(a.id()));

    a.publish(SteeringCommand { position: 4.0 }).unwrap();
    h.pump_at(Duration::from_millis(50));
    assert_eq!(h.outputs(), vec![4.0], "A relayed after failover");

    // A goes silent past its lease with no other publisher matched.
    h.pump_at(Duration::from_millis(600));
    assert!(h.runtime.health().liveliness_lost);
    assert_eq!(h.outputs(), vec![0.0], "exactly one neutral safe output");

    // Continued silence produces nothing further.
    h.pump_at(Duration::from_millis(1200));
    h.pump_at(Duration::from_millis(2400));
    assert!(h.outputs().is_empty());
}
