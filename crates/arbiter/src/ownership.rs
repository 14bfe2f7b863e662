//! Ownership arbitration.
//!
//! Decides, for one subscribing endpoint, which publisher's samples are
//! authoritative: the alive publisher with the highest ownership strength,
//! ties broken by earliest match. Samples from every other publisher are
//! dropped silently; that is normal redundancy behavior, not a fault.

use std::time::{Duration, Instant};

use tracing::debug;

use helmlink_core::types::{CommandSample, PublisherId, Strength};

use crate::records::PublisherTable;

/// Read-only summary of the arbitration state, consumed by the health
/// monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbiterView {
    pub matched: usize,
    pub alive: usize,
    pub authoritative: Option<PublisherId>,
}

/// Per-endpoint ownership arbitrator.
///
/// The authoritative identity is cached and recomputed incrementally on
/// each match, unmatch, or liveliness mutation; correctness only requires
/// the recomputation to be deterministic and total.
#[derive(Debug, Default)]
pub struct OwnershipArbitrator {
    table: PublisherTable,
    authoritative: Option<PublisherId>,
}

impl OwnershipArbitrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a match-status change reported by the bus.
    ///
    /// `delta > 0` inserts or re-activates the publisher, `delta < 0`
    /// removes it, `delta == 0` updates the advertised strength in place.
    /// Replaying an event with no net effect leaves the authority unchanged.
    pub fn on_match_changed(
        &mut self,
        publisher: PublisherId,
        strength: Strength,
        delta: i32,
        now: Instant,
    ) {
        if delta > 0 {
            self.table.upsert(publisher, strength, now);
        } else if delta < 0 {
            self.table.remove(publisher);
        } else {
            self.table.update_strength(publisher, strength);
        }
        self.recompute();
    }

    /// Apply a liveliness report from the bus. A non-negative delta is an
    /// assertion (the publisher is alive); a negative delta declares it
    /// not-alive.
    pub fn on_liveliness_report(&mut self, publisher: PublisherId, alive_delta: i32, now: Instant) {
        if alive_delta >= 0 {
            self.table.touch(publisher, now);
        } else {
            self.table.set_alive(publisher, false);
        }
        self.recompute();
    }

    /// Record sample arrival from a publisher. Samples count as liveliness
    /// assertions whether or not they end up accepted.
    pub fn record_activity(&mut self, publisher: PublisherId, now: Instant) {
        if self.table.touch(publisher, now) {
            self.recompute();
        }
    }

    /// Mark publishers whose lease lapsed as not-alive; returns them.
    pub fn expire_leases(&mut self, lease: Duration, now: Instant) -> Vec<PublisherId> {
        let expired = self.table.expire(lease, now);
        if !expired.is_empty() {
            self.recompute();
        }
        expired
    }

    /// Whether a sample comes from the current authority. Rejection is not
    /// an error; callers drop rejected samples without further processing.
    pub fn accept(&self, sample: &CommandSample) -> bool {
        self.authoritative == Some(sample.source)
    }

    pub fn authoritative(&self) -> Option<PublisherId> {
        self.authoritative
    }

    pub fn view(&self) -> ArbiterView {
        ArbiterView {
            matched: self.table.len(),
            alive: self.table.alive_count(),
            authoritative: self.authoritative,
        }
    }

    pub fn record(&self, id: PublisherId) -> Option<&crate::records::PublisherRecord> {
        self.table.get(id)
    }

    fn recompute(&mut self) {
        let next = self.table.best_alive().map(|r| r.id);
        if next != self.authoritative {
            debug!(
                from = ?self.authoritative,
                to = ?next,
                "authoritative publisher changed"
            );
            self.authoritative = next;
        }
    }
}
