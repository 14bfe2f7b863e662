//! Status display tap.
//!
//! Polls the actuator's status endpoint and logs actual positions, the
//! in-process counterpart of a cockpit steering display.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::info;

use helmlink_bus::LoopbackBus;
use helmlink_core::config::DisplayConfig;

pub fn spawn(
    bus: LoopbackBus,
    topic: &str,
    config: DisplayConfig,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<JoinHandle<()>> {
    let tap = bus.status_tap(topic)?;
    let poll = Duration::from_millis(config.poll_ms);
    let handle = thread::Builder::new()
        .name("display".to_string())
        .spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                for status in tap.drain() {
                    info!(position = status.position, "steering status");
                }
                thread::sleep(poll);
            }
        })?;
    Ok(handle)
}
