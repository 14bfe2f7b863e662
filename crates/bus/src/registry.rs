//! Endpoint registry.
//!
//! Resolves logical endpoint names to concrete endpoints. Endpoints are
//! created once at startup and immutable thereafter; the registry owns no
//! behavior beyond lookup.

use helmlink_core::error::{Error, Result};
use helmlink_core::types::{Direction, EndpointId};

use crate::schema::SchemaId;

/// One configured publish or subscribe access point for a topic/type pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    id: EndpointId,
    name: String,
    direction: Direction,
    schema: SchemaId,
}

impl Endpoint {
    pub fn id(&self) -> EndpointId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }
}

/// Registry of configured endpoints, keyed by (logical name, direction).
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    schemas: Vec<SchemaId>,
    endpoints: Vec<Endpoint>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type schema. Must happen before any endpoint that uses it
    /// is created.
    pub fn register_schema(&mut self, schema: SchemaId) {
        if !self.schemas.contains(&schema) {
            self.schemas.push(schema);
        }
    }

    /// Create an endpoint. Fails if the schema was never registered or if an
    /// endpoint with the same name and direction already exists.
    pub fn register_endpoint(
        &mut self,
        name: impl Into<String>,
        direction: Direction,
        schema: SchemaId,
    ) -> Result<EndpointId> {
        let name = name.into();
        if !self.schemas.contains(&schema) {
            return Err(Error::Config(format!(
                "schema {schema} not registered before endpoint {name}"
            )));
        }
        if self
            .endpoints
            .iter()
            .any(|e| e.name == name && e.direction == direction)
        {
            return Err(Error::Config(format!(
                "duplicate endpoint {name} ({direction})"
            )));
        }
        let id = EndpointId(self.endpoints.len() as u32);
        self.endpoints.push(Endpoint {
            id,
            name,
            direction,
            schema,
        });
        Ok(id)
    }

    /// Look up an endpoint by logical name and direction.
    pub fn resolve(&self, name: &str, direction: Direction) -> Result<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.name == name && e.direction == direction)
            .ok_or_else(|| Error::EndpointNotFound {
                name: name.to_string(),
                direction,
            })
    }

    /// Look up an endpoint by id.
    pub fn by_id(&self, id: EndpointId) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }
}
