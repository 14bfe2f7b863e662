//! Error types for Helmlink.

use thiserror::Error;

use crate::types::Direction;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No configured endpoint matches the requested name and direction.
    /// Fatal at startup: the actuator cannot run without its endpoints.
    #[error("endpoint not found: {name} ({direction})")]
    EndpointNotFound { name: String, direction: Direction },

    /// Failure reported by the bus collaborator. Surfaced to the caller of
    /// `run` without retry; recovery belongs below this layer.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A sample failed basic validity. Dropped with a warning, never fatal.
    #[error("malformed sample: {0}")]
    MalformedSample(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
