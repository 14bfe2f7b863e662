//! Liveliness and deadline supervision for one command stream.
//!
//! Health is a set of non-exclusive degradation flags, not a single-state
//! machine: a stream can be unmatched and deadline-missed at once. Flag
//! transitions emit [`HealthEvent`]s exactly once; repeated events in the
//! same condition produce no duplicate action.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use helmlink_core::types::PublisherId;

use crate::ownership::{ArbiterView, OwnershipArbitrator};

/// Aggregate health for one subscribing endpoint. Derived state; recomputed
/// on every relevant event, never persisted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamHealth {
    pub matched: usize,
    pub alive: usize,
    pub authoritative: Option<PublisherId>,
    /// No publisher is matched at all (clean detach, distinct from lease
    /// expiry).
    pub unmatched: bool,
    /// Publishers are matched but none is alive.
    pub liveliness_lost: bool,
    /// No accepted sample within the configured deadline. Informational on
    /// its own.
    pub deadline_missed: bool,
}

impl Default for StreamHealth {
    fn default() -> Self {
        // A stream starts unmatched; the flag is pre-set so startup does not
        // count as a degradation transition.
        Self {
            matched: 0,
            alive: 0,
            authoritative: None,
            unmatched: true,
            liveliness_lost: false,
            deadline_missed: false,
        }
    }
}

impl StreamHealth {
    /// True when command delivery cannot be trusted and the safe fallback
    /// applies.
    pub fn degraded(&self) -> bool {
        self.unmatched || self.liveliness_lost
    }
}

/// Transition raised by the monitor and consumed by the safety supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthEvent {
    /// Matched-publisher count dropped to zero.
    Unmatched,
    /// The last alive publisher went silent past its lease.
    LivelinessLost,
    /// The inter-sample deadline lapsed. Logged, never a safe-state trigger
    /// by itself.
    DeadlineMissed,
    /// A publisher is authoritative again after a degraded episode.
    Recovered { authoritative: PublisherId },
}

/// Lease and deadline supervision for one subscribing endpoint.
#[derive(Debug)]
pub struct LivelinessDeadlineMonitor {
    lease: Duration,
    deadline: Duration,
    health: StreamHealth,
    /// Deadline clock: armed while an authority exists, refreshed on every
    /// accepted sample.
    last_accepted: Option<Instant>,
}

impl LivelinessDeadlineMonitor {
    pub fn new(lease: Duration, deadline: Duration) -> Self {
        Self {
            lease,
            deadline,
            health: StreamHealth::default(),
            last_accepted: None,
        }
    }

    pub fn health(&self) -> &StreamHealth {
        &self.health
    }

    /// Expire lapsed leases in the arbitrator's record set. Called on every
    /// dispatch wake, including timeout wakes.
    pub fn expire_leases(
        &mut self,
        arbiter: &mut OwnershipArbitrator,
        now: Instant,
    ) -> Vec<PublisherId> {
        arbiter.expire_leases(self.lease, now)
    }

    /// Record an accepted sample: refreshes the deadline clock and clears a
    /// standing deadline-missed flag.
    pub fn note_accepted(&mut self, now: Instant) {
        self.last_accepted = Some(now);
        if self.health.deadline_missed {
            self.health.deadline_missed = false;
            debug!("deadline recovered");
        }
    }

    /// Merge a transport-reported deadline miss. Idempotent.
    pub fn note_transport_deadline(&mut self) -> Option<HealthEvent> {
        if self.health.deadline_missed {
            return None;
        }
        self.health.deadline_missed = true;
        Some(HealthEvent::DeadlineMissed)
    }

    /// Recompute health from the arbitration state and the clock, returning
    /// the transitions that occurred.
    pub fn reassess(&mut self, view: ArbiterView, now: Instant) -> Vec<HealthEvent> {
        let mut events = Vec::new();

        let was_degraded = self.health.degraded();
        let unmatched = view.matched == 0;
        let liveliness_lost = view.matched > 0 && view.alive == 0;

        if unmatched && !self.health.unmatched {
            events.push(HealthEvent::Unmatched);
        }
        if liveliness_lost && !self.health.liveliness_lost {
            events.push(HealthEvent::LivelinessLost);
        }

        // Arm the deadline clock when an authority appears; disarm it (and
        // drop any standing miss) when authority is lost. Unmatched and
        // liveliness-lost supersede a stale deadline flag.
        match (self.health.authoritative, view.authoritative) {
            (None, Some(_)) => self.last_accepted = Some(now),
            (Some(_), None) => {
                self.last_accepted = None;
                self.health.deadline_missed = false;
            }
            _ => {}
        }

        self.health.matched = view.matched;
        self.health.alive = view.alive;
        self.health.authoritative = view.authoritative;
        self.health.unmatched = unmatched;
        self.health.liveliness_lost = liveliness_lost;

        if was_degraded && !self.health.degraded() {
            if let Some(authoritative) = view.authoritative {
                events.push(HealthEvent::Recovered { authoritative });
            }
        }

        if let (Some(_), Some(last)) = (view.authoritative, self.last_accepted) {
            if !self.health.deadline_missed && now.duration_since(last) >= self.deadline {
                self.health.deadline_missed = true;
                events.push(HealthEvent::DeadlineMissed);
            }
        }

        events
    }
}
