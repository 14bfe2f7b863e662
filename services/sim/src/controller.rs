//! Controller driver: one redundant command source.
//!
//! Publishes steering commands at a fixed cadence with a configured
//! ownership strength. Each write doubles as a liveliness assertion; a
//! clean exit detaches the publisher, which the actuator sees as an
//! unmatch rather than a lease expiry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use helmlink_bus::{LoopbackBus, PublisherHandle};
use helmlink_core::config::ControllerConfig;
use helmlink_core::types::SteeringCommand;

pub fn spawn(
    bus: LoopbackBus,
    topic: &str,
    config: ControllerConfig,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<JoinHandle<()>> {
    // Attach on the caller's thread so endpoint errors fail startup.
    let publisher = bus.attach_publisher(topic, config.strength)?;
    let handle = thread::Builder::new()
        .name(format!("controller-{}", config.name))
        .spawn(move || run(publisher, config, shutdown))?;
    Ok(handle)
}

fn run(publisher: PublisherHandle, config: ControllerConfig, shutdown: Arc<AtomicBool>) {
    info!(
        name = %config.name,
        publisher = %publisher.id(),
        strength = config.strength,
        "controller online"
    );

    let mut written: u32 = 0;
    while !shutdown.load(Ordering::Relaxed) {
        if config.sample_count.is_some_and(|limit| written >= limit) {
            break;
        }
        let command = SteeringCommand {
            position: steering_profile(written as u64),
        };
        if let Err(err) = publisher.publish(command) {
            warn!(name = %config.name, %err, "publish failed, stopping controller");
            break;
        }
        written += 1;
        debug!(name = %config.name, position = command.position, written, "command written");
        thread::sleep(config.cadence());
    }

    info!(name = %config.name, written, "controller offline");
    // Dropping the handle detaches cleanly.
}

/// Slow triangle sweep between hard left and hard right, ±30 degrees.
fn steering_profile(tick: u64) -> f32 {
    const SWEEP: u64 = 80;
    let phase = (tick % SWEEP) as f32 / SWEEP as f32;
    let normalized = if phase < 0.5 {
        phase * 2.0
    } else {
        2.0 - phase * 2.0
    };
    (normalized - 0.5) * 60.0
}
