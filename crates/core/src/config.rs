//! Configuration management for Helmlink.
//!
//! All timing QoS (leases, deadlines, cadences) and the safe-fallback value
//! come from configuration; nothing is negotiated at runtime.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for a simulation host process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub actuator: ActuatorConfig,
    pub controllers: Vec<ControllerConfig>,
    pub display: DisplayConfig,
}

/// Actuator-side endpoint names and supervision QoS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Logical name of the subscribing command endpoint.
    pub command_endpoint: String,
    /// Logical name of the publishing status endpoint.
    pub status_endpoint: String,
    /// Liveliness lease applied to every matched publisher, in milliseconds.
    pub lease_ms: u64,
    /// Maximum interval between accepted samples, in milliseconds.
    pub deadline_ms: u64,
    /// Bounded wait used by the dispatch loop so shutdown can be polled.
    pub wait_timeout_ms: u64,
    /// Position written when command delivery becomes untrustworthy.
    pub safe_position: f32,
}

impl ActuatorConfig {
    pub fn lease(&self) -> Duration {
        Duration::from_millis(self.lease_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

/// One redundant controller instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Human-readable name used in logs.
    pub name: String,
    /// Ownership strength. The alive controller with the highest strength
    /// is authoritative.
    pub strength: i32,
    /// Interval between published commands, in milliseconds.
    pub cadence_ms: u64,
    /// Detach cleanly after publishing this many samples. `None` runs until
    /// shutdown.
    pub sample_count: Option<u32>,
}

impl ControllerConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

/// Status display tap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub enabled: bool,
    /// Poll interval for draining the status endpoint, in milliseconds.
    pub poll_ms: u64,
}

impl SimConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            actuator: ActuatorConfig {
                command_endpoint: "SteeringCommandTopic".to_string(),
                status_endpoint: "SteeringStatusTopic".to_string(),
                lease_ms: 500,
                deadline_ms: 300,
                wait_timeout_ms: 100,
                safe_position: 0.0,
            },
            controllers: vec![
                ControllerConfig {
                    name: "primary".to_string(),
                    strength: 20,
                    cadence_ms: 100,
                    sample_count: None,
                },
                ControllerConfig {
                    name: "backup".to_string(),
                    strength: 10,
                    cadence_ms: 100,
                    sample_count: None,
                },
            ],
            display: DisplayConfig {
                enabled: true,
                poll_ms: 200,
            },
        }
    }
}
