//! Ownership arbitration and stream health for the Helmlink actuator.
//!
//! Among several concurrently publishing controllers of one command stream,
//! exactly one is authoritative at any instant, selected by ownership
//! strength with deterministic failover. The health monitor tracks
//! liveliness leases, match presence, and deadline compliance, and raises
//! the events the safety supervisor acts on.

pub mod health;
pub mod ownership;
pub mod records;

pub use health::{HealthEvent, LivelinessDeadlineMonitor, StreamHealth};
pub use ownership::{ArbiterView, OwnershipArbitrator};
pub use records::{PublisherRecord, PublisherTable};
