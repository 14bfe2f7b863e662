//! Publish/subscribe seam for the Helmlink actuator core.
//!
//! The core never talks to a concrete transport. It consumes the
//! [`CommandBus`] trait: endpoint lookup, a blocking event wait, destructive
//! sample reads, and status writes. The [`loopback`] module provides an
//! in-process implementation used by the simulation host and the test
//! suites; a networked substrate would live behind the same trait.

pub mod command_bus;
pub mod loopback;
pub mod registry;
pub mod schema;

pub use command_bus::CommandBus;
pub use loopback::{LoopbackBus, LoopbackBusBuilder, PublisherHandle, StatusTap};
pub use registry::{Endpoint, EndpointRegistry};
pub use schema::SchemaId;
