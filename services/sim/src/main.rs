//! Helmlink simulation host.
//!
//! Wires redundant controller drivers, the status display, and the actuator
//! dispatch runtime onto one in-process command bus. Configuration comes
//! from an optional `--config <path>` TOML file; ctrl-c requests a clean
//! shutdown that the dispatch loop observes at its next wait interval.

mod controller;
mod display;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use helmlink_bus::{LoopbackBus, SchemaId};
use helmlink_core::config::SimConfig;
use helmlink_core::logging;
use helmlink_core::types::Direction;
use helmlink_supervisor::ActuatorRuntime;

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_config_path(&args)? {
        Some(path) => SimConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default_config(),
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .context("installing ctrl-c handler")?;
    }

    let bus = LoopbackBus::builder()
        .register_schema(SchemaId::SteeringCommand)
        .register_schema(SchemaId::SteeringStatus)
        .endpoint(
            &config.actuator.command_endpoint,
            Direction::Subscribe,
            SchemaId::SteeringCommand,
        )
        .endpoint(
            &config.actuator.status_endpoint,
            Direction::Publish,
            SchemaId::SteeringStatus,
        )
        .build()?;

    let mut runtime = ActuatorRuntime::new(bus.clone(), &config.actuator)?;

    let mut workers = Vec::new();
    for controller_config in &config.controllers {
        workers.push(controller::spawn(
            bus.clone(),
            &config.actuator.command_endpoint,
            controller_config.clone(),
            Arc::clone(&shutdown),
        )?);
    }
    if config.display.enabled {
        workers.push(display::spawn(
            bus.clone(),
            &config.actuator.status_endpoint,
            config.display.clone(),
            Arc::clone(&shutdown),
        )?);
    }

    info!(
        controllers = config.controllers.len(),
        "simulation started"
    );
    let result = runtime.run(&shutdown);

    // The dispatch loop is down; stop the workers too, whatever the exit
    // path was.
    shutdown.store(true, Ordering::Relaxed);
    for worker in workers {
        let _ = worker.join();
    }

    Ok(result?)
}

fn parse_config_path(args: &[String]) -> anyhow::Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            return match args_iter.next() {
                Some(path) => Ok(Some(PathBuf::from(path))),
                None => Err(anyhow::anyhow!("--config was provided without a path")),
            };
        }
    }
    Ok(None)
}
