//! Shared types for the Helmlink command path.
//!
//! Commands flow from redundant controllers to a single actuator; statuses
//! flow back out. Both payloads are deliberately small: the interesting
//! state lives in the arbitration and health layers, not in the samples.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Ownership strength of a publisher. Higher wins.
pub type Strength = i32;

/// Opaque handle identifying one remote publisher matched to an endpoint.
///
/// Handles are assigned by the bus and are unique for the lifetime of the
/// process. They carry no meaning beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublisherId(pub u64);

impl std::fmt::Display for PublisherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pub-{:04x}", self.0)
    }
}

/// Opaque handle identifying one configured endpoint on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointId(pub u32);

/// Direction of an endpoint relative to the local participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The endpoint writes samples onto the bus.
    Publish,
    /// The endpoint reads samples from the bus.
    Subscribe,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Publish => write!(f, "publish"),
            Direction::Subscribe => write!(f, "subscribe"),
        }
    }
}

/// Desired steering position commanded by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringCommand {
    /// Target position in degrees, negative is left of center.
    pub position: f32,
}

impl SteeringCommand {
    /// Basic validity check. Positions must be finite; anything else is a
    /// malformed sample and is dropped by the actuator with a warning.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.position.is_finite() {
            return Err(Error::MalformedSample(format!(
                "non-finite position {}",
                self.position
            )));
        }
        Ok(())
    }
}

/// Actual steering position reported by the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringStatus {
    /// Actual position in degrees.
    pub position: f32,
}

/// One inbound command sample together with its delivery metadata.
///
/// Samples are transient: they are consumed by the arbitration layer in the
/// dispatch cycle that delivered them and never retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandSample {
    /// The command payload.
    pub command: SteeringCommand,
    /// The publisher that produced this sample.
    pub source: PublisherId,
    /// False for metadata-only samples (e.g. a dispose notification).
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_command_is_valid() {
        assert!(SteeringCommand { position: -12.5 }.validate().is_ok());
        assert!(SteeringCommand { position: 0.0 }.validate().is_ok());
    }

    #[test]
    fn test_non_finite_command_is_malformed() {
        let err = SteeringCommand {
            position: f32::NAN,
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::MalformedSample(_)));

        assert!(SteeringCommand {
            position: f32::INFINITY,
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_publisher_id_display() {
        assert_eq!(PublisherId(7).to_string(), "pub-0007");
    }
}
