//! Bus event vocabulary.
//!
//! The bus reports everything the actuator core needs to know through one
//! tagged event stream: sample availability, publisher match changes,
//! liveliness assertions, and deadline reports. A single dispatch loop
//! consumes the stream; there are no per-status callback objects.

use serde::{Deserialize, Serialize};

use crate::types::{EndpointId, PublisherId, Strength};

/// One notification from the bus collaborator.
///
/// Events for the same endpoint are delivered in the order the bus observed
/// them. No ordering is guaranteed across independent endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BusEvent {
    /// Buffered samples are ready to be taken from a subscribing endpoint.
    DataAvailable { endpoint: EndpointId },

    /// A remote publisher matched (`delta` > 0), unmatched (`delta` < 0),
    /// or changed its advertised strength (`delta` == 0).
    MatchChanged {
        endpoint: EndpointId,
        publisher: PublisherId,
        strength: Strength,
        delta: i32,
    },

    /// A publisher asserted liveliness (`alive_delta` >= 0) or was reported
    /// not-alive by the transport (`alive_delta` < 0).
    LivelinessChanged {
        endpoint: EndpointId,
        publisher: PublisherId,
        alive_delta: i32,
    },

    /// The transport observed a missed arrival deadline on a stream.
    DeadlineMissed { endpoint: EndpointId },
}

impl BusEvent {
    /// The endpoint this event concerns.
    pub fn endpoint(&self) -> EndpointId {
        match *self {
            BusEvent::DataAvailable { endpoint } => endpoint,
            BusEvent::MatchChanged { endpoint, .. } => endpoint,
            BusEvent::LivelinessChanged { endpoint, .. } => endpoint,
            BusEvent::DeadlineMissed { endpoint } => endpoint,
        }
    }
}
