//! Matched-publisher bookkeeping.
//!
//! One [`PublisherRecord`] per distinct publisher identity per subscribing
//! endpoint. The table preserves first-match order so strength ties resolve
//! deterministically.

use std::time::{Duration, Instant};

use helmlink_core::types::{PublisherId, Strength};

/// One remote publisher currently matched to a subscribing endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PublisherRecord {
    pub id: PublisherId,
    pub strength: Strength,
    pub alive: bool,
    /// Monotone sequence assigned at first match; lower matched earlier.
    pub matched_seq: u64,
    /// Last sample or heartbeat observed from this publisher.
    pub last_activity: Instant,
}

/// The set of matched publishers for one subscribing endpoint.
#[derive(Debug, Default)]
pub struct PublisherTable {
    records: Vec<PublisherRecord>,
    next_seq: u64,
}

impl PublisherTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly matched publisher, or re-activate an existing record.
    ///
    /// Re-inserting a known identity keeps its original match order, so a
    /// replayed match event cannot steal a strength tie. Returns true if a
    /// new record was created.
    pub fn upsert(&mut self, id: PublisherId, strength: Strength, now: Instant) -> bool {
        if let Some(rec) = self.records.iter_mut().find(|r| r.id == id) {
            rec.strength = strength;
            rec.alive = true;
            rec.last_activity = now;
            return false;
        }
        self.records.push(PublisherRecord {
            id,
            strength,
            alive: true,
            matched_seq: self.next_seq,
            last_activity: now,
        });
        self.next_seq += 1;
        true
    }

    /// Update the advertised strength of a matched publisher.
    pub fn update_strength(&mut self, id: PublisherId, strength: Strength) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(rec) => {
                rec.strength = strength;
                true
            }
            None => false,
        }
    }

    /// Remove a publisher on unmatch. Returns true if it was present.
    pub fn remove(&mut self, id: PublisherId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Mark a publisher alive or not-alive. Returns true if the flag changed.
    pub fn set_alive(&mut self, id: PublisherId, alive: bool) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(rec) if rec.alive != alive => {
                rec.alive = alive;
                true
            }
            _ => false,
        }
    }

    /// Record activity (sample or heartbeat): refreshes the lease clock and
    /// revives a not-alive record.
    pub fn touch(&mut self, id: PublisherId, now: Instant) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(rec) => {
                rec.alive = true;
                rec.last_activity = now;
                true
            }
            None => false,
        }
    }

    /// Mark every alive record whose lease has lapsed as not-alive and
    /// return their identities.
    pub fn expire(&mut self, lease: Duration, now: Instant) -> Vec<PublisherId> {
        let mut expired = Vec::new();
        for rec in &mut self.records {
            if rec.alive && now.duration_since(rec.last_activity) >= lease {
                rec.alive = false;
                expired.push(rec.id);
            }
        }
        expired
    }

    pub fn get(&self, id: PublisherId) -> Option<&PublisherRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.records.iter().filter(|r| r.alive).count()
    }

    /// The alive record with maximal strength; ties resolve to the earliest
    /// matched. Total and deterministic over any record set.
    pub fn best_alive(&self) -> Option<&PublisherRecord> {
        self.records
            .iter()
            .filter(|r| r.alive)
            .min_by_key(|r| (std::cmp::Reverse(r.strength), r.matched_seq))
    }
}
