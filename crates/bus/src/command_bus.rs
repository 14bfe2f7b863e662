//! The transport collaborator contract consumed by the actuator core.

use std::time::Duration;

use helmlink_core::error::Result;
use helmlink_core::event::BusEvent;
use helmlink_core::types::{CommandSample, Direction, SteeringStatus};

use crate::registry::Endpoint;

/// Topic-scoped publish/subscribe primitives the core runs against.
///
/// Implementations own delivery, matching, and buffering. The core only
/// requires that events for one endpoint are reported in observation order
/// and that `wait` returns within roughly the given timeout so shutdown can
/// be polled.
pub trait CommandBus {
    /// Resolve a configured endpoint by logical name.
    fn find_endpoint(&self, name: &str, direction: Direction) -> Result<Endpoint>;

    /// Block until events are available or the timeout elapses. A timeout
    /// returns an empty vector; it is not an error.
    fn wait(&self, timeout: Duration) -> Result<Vec<BusEvent>>;

    /// Destructively read all currently buffered samples on a subscribing
    /// endpoint.
    fn take_samples(&self, endpoint: &Endpoint) -> Result<Vec<CommandSample>>;

    /// Write one outbound status sample on a publishing endpoint.
    fn write_status(&self, endpoint: &Endpoint, status: SteeringStatus) -> Result<()>;
}
