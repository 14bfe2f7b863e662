//! Test utilities for end-to-end steering scenarios

use std::time::{Duration, Instant};

use helmlink_bus::{CommandBus, LoopbackBus, SchemaId, StatusTap};
use helmlink_core::config::ActuatorConfig;
use helmlink_core::types::Direction;
use helmlink_supervisor::ActuatorRuntime;

pub const COMMAND_TOPIC: &str = "SteeringCommandTopic";
pub const STATUS_TOPIC: &str = "SteeringStatusTopic";

/// Lease used by the test actuator.
pub const LEASE: Duration = Duration::from_millis(500);
/// Deadline used by the test actuator (3x the nominal 100ms cadence).
pub const DEADLINE: Duration = Duration::from_millis(300);

/// Actuator configuration matching the default steering QoS.
pub fn test_actuator_config() -> ActuatorConfig {
    ActuatorConfig {
        command_endpoint: COMMAND_TOPIC.to_string(),
        status_endpoint: STATUS_TOPIC.to_string(),
        lease_ms: LEASE.as_millis() as u64,
        deadline_ms: DEADLINE.as_millis() as u64,
        wait_timeout_ms: 20,
        safe_position: 0.0,
    }
}

/// A fully wired loopback harness: bus, actuator runtime, and a tap on the
/// status endpoint.
pub struct SteeringHarness {
    pub bus: LoopbackBus,
    pub runtime: ActuatorRuntime<LoopbackBus>,
    pub tap: StatusTap,
    /// A fixed origin so scenarios can express time as offsets.
    pub epoch: Instant,
}

impl SteeringHarness {
    pub fn new() -> Self {
        let bus = LoopbackBus::builder()
            .register_schema(SchemaId::SteeringCommand)
            .register_schema(SchemaId::SteeringStatus)
            .endpoint(COMMAND_TOPIC, Direction::Subscribe, SchemaId::SteeringCommand)
            .endpoint(STATUS_TOPIC, Direction::Publish, SchemaId::SteeringStatus)
            .build()
            .expect("loopback bus");
        let runtime =
            ActuatorRuntime::new(bus.clone(), &test_actuator_config()).expect("actuator runtime");
        let tap = bus.status_tap(STATUS_TOPIC).expect("status tap");
        Self {
            bus,
            runtime,
            tap,
            epoch: Instant::now(),
        }
    }

    /// Drain pending bus events and run one dispatch pass at `epoch + at`.
    ///
    /// Driving the loop manually keeps the scenarios deterministic: the
    /// clock is an explicit offset rather than wall time.
    pub fn pump_at(&mut self, at: Duration) {
        let events = self.bus.wait(Duration::from_millis(0)).expect("wait");
        self.runtime
            .process(events, self.epoch + at)
            .expect("dispatch");
    }

    /// Positions written to the status endpoint since the last call.
    pub fn outputs(&self) -> Vec<f32> {
        self.tap.drain().iter().map(|s| s.position).collect()
    }
}

impl Default for SteeringHarness {
    fn default() -> Self {
        Self::new()
    }
}
