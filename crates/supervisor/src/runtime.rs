//! The actuator dispatch runtime.
//!
//! One reactive loop per process: the bus delivers data and status events
//! through a blocking wait with a bounded timeout; arbitration, health
//! monitoring, and output all run on this one thread, so no locking exists
//! anywhere in the core state. The loop exits after completing the in-flight
//! batch once the shutdown flag is observed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{info, trace, warn};

use helmlink_arbiter::{HealthEvent, LivelinessDeadlineMonitor, OwnershipArbitrator, StreamHealth};
use helmlink_bus::{CommandBus, Endpoint};
use helmlink_core::config::ActuatorConfig;
use helmlink_core::error::Result;
use helmlink_core::event::BusEvent;
use helmlink_core::types::{Direction, PublisherId};

use crate::relay::CommandRelay;
use crate::supervisor::SafetySupervisor;

/// Owns every core component and the dispatch loop. Construction resolves
/// the configured endpoints; teardown is scope exit, regardless of how the
/// loop ends.
pub struct ActuatorRuntime<B: CommandBus> {
    bus: B,
    command_endpoint: Endpoint,
    status_endpoint: Endpoint,
    arbiter: OwnershipArbitrator,
    monitor: LivelinessDeadlineMonitor,
    supervisor: SafetySupervisor,
    relay: CommandRelay,
    wait_timeout: Duration,
}

impl<B: CommandBus> ActuatorRuntime<B> {
    /// Resolve endpoints and assemble the core. Fails fast with
    /// `EndpointNotFound` when the bus has no matching configuration.
    pub fn new(bus: B, config: &ActuatorConfig) -> Result<Self> {
        let command_endpoint = bus.find_endpoint(&config.command_endpoint, Direction::Subscribe)?;
        let status_endpoint = bus.find_endpoint(&config.status_endpoint, Direction::Publish)?;
        info!(
            command = command_endpoint.name(),
            status = status_endpoint.name(),
            lease_ms = config.lease_ms,
            deadline_ms = config.deadline_ms,
            "actuator runtime assembled"
        );
        Ok(Self {
            bus,
            command_endpoint,
            status_endpoint,
            arbiter: OwnershipArbitrator::new(),
            monitor: LivelinessDeadlineMonitor::new(config.lease(), config.deadline()),
            supervisor: SafetySupervisor::new(config.safe_position),
            relay: CommandRelay::new(),
            wait_timeout: config.wait_timeout(),
        })
    }

    /// Run the dispatch loop until the shutdown flag is set.
    ///
    /// The flag is polled once per wait interval; an in-flight event batch
    /// always completes before the loop exits. Transport failures surface
    /// here without retry.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        info!("actuator loop starting");
        while !shutdown.load(Ordering::Relaxed) {
            let events = self.bus.wait(self.wait_timeout)?;
            self.process(events, Instant::now())?;
        }
        info!("actuator loop stopped");
        Ok(())
    }

    /// Process one batch of bus events at a given instant.
    ///
    /// Lease expiry and deadline supervision run on every wake, including
    /// empty timeout wakes, so degradation is detected even when the bus
    /// goes completely quiet.
    pub fn process(&mut self, events: Vec<BusEvent>, now: Instant) -> Result<()> {
        for event in events {
            self.dispatch(event, now)?;
        }
        for publisher in self.monitor.expire_leases(&mut self.arbiter, now) {
            info!(publisher = %publisher, "liveliness lease expired");
        }
        self.apply_health(now)
    }

    /// Current stream health, for hosts and tests.
    pub fn health(&self) -> &StreamHealth {
        self.monitor.health()
    }

    /// Current authoritative publisher, for hosts and tests.
    pub fn authoritative(&self) -> Option<PublisherId> {
        self.arbiter.authoritative()
    }

    fn dispatch(&mut self, event: BusEvent, now: Instant) -> Result<()> {
        if event.endpoint() != self.command_endpoint.id() {
            return Ok(());
        }
        match event {
            BusEvent::DataAvailable { .. } => self.drain_samples(now),
            BusEvent::MatchChanged {
                publisher,
                strength,
                delta,
                ..
            } => {
                if delta > 0 {
                    info!(publisher = %publisher, strength, "controller matched");
                } else if delta < 0 {
                    info!(publisher = %publisher, "controller unmatched");
                }
                self.arbiter.on_match_changed(publisher, strength, delta, now);
                self.apply_health(now)
            }
            BusEvent::LivelinessChanged {
                publisher,
                alive_delta,
                ..
            } => {
                if alive_delta < 0 {
                    info!(publisher = %publisher, "liveliness lost reported by transport");
                }
                self.arbiter.on_liveliness_report(publisher, alive_delta, now);
                self.apply_health(now)
            }
            BusEvent::DeadlineMissed { .. } => {
                if let Some(event) = self.monitor.note_transport_deadline() {
                    self.supervise(event)?;
                }
                Ok(())
            }
        }
    }

    fn drain_samples(&mut self, now: Instant) -> Result<()> {
        for sample in self.bus.take_samples(&self.command_endpoint)? {
            if !sample.valid {
                continue;
            }
            if let Err(err) = sample.command.validate() {
                warn!(publisher = %sample.source, %err, "dropping malformed sample");
                continue;
            }
            // Any sample counts as a liveliness assertion, accepted or not.
            self.arbiter.record_activity(sample.source, now);
            if !self.arbiter.accept(&sample) {
                trace!(publisher = %sample.source, "dropping non-authoritative sample");
                continue;
            }
            self.monitor.note_accepted(now);
            let output = self.relay.on_accepted_sample(&sample);
            self.bus.write_status(&self.status_endpoint, output)?;
        }
        Ok(())
    }

    fn apply_health(&mut self, now: Instant) -> Result<()> {
        let view = self.arbiter.view();
        for event in self.monitor.reassess(view, now) {
            self.supervise(event)?;
        }
        Ok(())
    }

    fn supervise(&mut self, event: HealthEvent) -> Result<()> {
        if let Some(safe) = self.supervisor.on_health_event(&event) {
            self.bus.write_status(&self.status_endpoint, safe)?;
        }
        Ok(())
    }
}
