//! Core functionality for the Helmlink redundant-steering system.
//!
//! This crate provides the fundamental types, events, errors, and
//! configuration used across the Helmlink ecosystem.

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod types;

pub use config::{ActuatorConfig, ControllerConfig, DisplayConfig, SimConfig};
pub use error::{Error, Result};
pub use event::BusEvent;
pub use types::{
    CommandSample, Direction, EndpointId, PublisherId, SteeringCommand, SteeringStatus, Strength,
};
