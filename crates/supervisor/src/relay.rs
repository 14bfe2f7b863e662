//! Command relay: the normal output path.

use helmlink_core::types::{CommandSample, SteeringStatus};

/// Maps accepted command samples onto actuator status.
///
/// Pure transform. Filtering already happened in the arbitrator; the relay
/// is called exactly once per accepted sample and never for rejected ones.
#[derive(Debug, Default)]
pub struct CommandRelay;

impl CommandRelay {
    pub fn new() -> Self {
        Self
    }

    pub fn on_accepted_sample(&self, sample: &CommandSample) -> SteeringStatus {
        SteeringStatus {
            position: sample.command.position,
        }
    }
}
