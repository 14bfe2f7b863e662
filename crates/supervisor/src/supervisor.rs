//! Safety supervisor: the failure-mitigation output path.
//!
//! The fallback write is the designed response to upstream failure, not an
//! error path. It fires exactly once per transition into a degraded
//! condition; recovery clears the latch without an explicit output, since
//! the next accepted sample naturally overrides the safe value.

use tracing::{info, warn};

use helmlink_arbiter::HealthEvent;
use helmlink_core::types::SteeringStatus;

/// Drives the actuator to a safe position when the command stream degrades.
#[derive(Debug)]
pub struct SafetySupervisor {
    safe_position: f32,
    engaged: bool,
}

impl SafetySupervisor {
    pub fn new(safe_position: f32) -> Self {
        Self {
            safe_position,
            engaged: false,
        }
    }

    /// True while the safe state is latched.
    pub fn engaged(&self) -> bool {
        self.engaged
    }

    /// Consume one health transition. Returns the safe output to write, if
    /// any. Never returns an output twice for the same degraded episode.
    pub fn on_health_event(&mut self, event: &HealthEvent) -> Option<SteeringStatus> {
        match *event {
            HealthEvent::Unmatched | HealthEvent::LivelinessLost => {
                if self.engaged {
                    return None;
                }
                self.engaged = true;
                warn!(
                    reason = ?event,
                    position = self.safe_position,
                    "command delivery untrusted, forcing safe output"
                );
                Some(SteeringStatus {
                    position: self.safe_position,
                })
            }
            HealthEvent::DeadlineMissed => {
                // Informational on its own; only logged.
                warn!("command deadline missed");
                None
            }
            HealthEvent::Recovered { authoritative } => {
                if self.engaged {
                    info!(publisher = %authoritative, "command source recovered, resuming relay");
                }
                self.engaged = false;
                None
            }
        }
    }
}
