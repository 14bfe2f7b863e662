//! Type schemas carried by the bus.
//!
//! Schema identifiers are fixed at compile time and must be registered with
//! the bus before any endpoint is created, mirroring the one-time type
//! registration step of the underlying pub/sub substrate.

use serde::{Deserialize, Serialize};

/// Identifier of a registered type schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaId {
    SteeringCommand,
    SteeringStatus,
}

impl SchemaId {
    /// Registered name of the schema.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaId::SteeringCommand => "SteeringCommand",
            SchemaId::SteeringStatus => "SteeringStatus",
        }
    }

    /// Every schema the steering system uses.
    pub fn all() -> &'static [SchemaId] {
        &[SchemaId::SteeringCommand, SchemaId::SteeringStatus]
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
