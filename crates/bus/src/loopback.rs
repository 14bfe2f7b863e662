//! In-process loopback bus.
//!
//! A process-local implementation of [`CommandBus`] used by the simulation
//! host and the test suites. Controller threads attach publisher handles to
//! a subscribing endpoint's topic; the actuator dispatch loop consumes the
//! resulting event stream. Internal synchronization keeps publishers and the
//! dispatch thread decoupled, but the buffering model is deliberately
//! simple: keep-last queues with a fixed depth.
//!
//! This is not a network transport. Delivery is reliable and ordered by
//! construction; only matching, liveliness, and buffering semantics are
//! modeled.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use helmlink_core::error::{Error, Result};
use helmlink_core::event::BusEvent;
use helmlink_core::types::{
    CommandSample, Direction, EndpointId, PublisherId, SteeringCommand, SteeringStatus, Strength,
};

use crate::command_bus::CommandBus;
use crate::registry::{Endpoint, EndpointRegistry};
use crate::schema::SchemaId;

/// Keep-last depth for buffered command samples per endpoint.
const SAMPLE_DEPTH: usize = 64;
/// Keep-last depth for outbound statuses awaiting a tap drain.
const STATUS_DEPTH: usize = 1024;

/// Builder configuring schemas and endpoints before the bus starts.
#[derive(Debug, Default)]
pub struct LoopbackBusBuilder {
    registry: EndpointRegistry,
    error: Option<Error>,
}

impl LoopbackBusBuilder {
    /// Register a type schema. All schemas must be registered before the
    /// endpoints that use them.
    pub fn register_schema(mut self, schema: SchemaId) -> Self {
        self.registry.register_schema(schema);
        self
    }

    /// Declare an endpoint. Errors are deferred to [`build`](Self::build).
    pub fn endpoint(mut self, name: &str, direction: Direction, schema: SchemaId) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.registry.register_endpoint(name, direction, schema) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn build(self) -> Result<LoopbackBus> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(LoopbackBus {
            shared: Arc::new(Shared {
                registry: self.registry,
                state: Mutex::new(BusState::default()),
                wake: Condvar::new(),
            }),
        })
    }
}

struct Shared {
    registry: EndpointRegistry,
    state: Mutex<BusState>,
    wake: Condvar,
}

#[derive(Default)]
struct BusState {
    events: VecDeque<BusEvent>,
    samples: HashMap<EndpointId, VecDeque<CommandSample>>,
    statuses: HashMap<EndpointId, VecDeque<SteeringStatus>>,
    attached: HashMap<PublisherId, EndpointId>,
    next_publisher: u64,
}

impl BusState {
    fn push_event(&mut self, event: BusEvent) {
        self.events.push_back(event);
    }
}

/// Process-local pub/sub substrate. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct LoopbackBus {
    shared: Arc<Shared>,
}

impl LoopbackBus {
    pub fn builder() -> LoopbackBusBuilder {
        LoopbackBusBuilder::default()
    }

    /// Attach a remote publisher to the topic of a subscribing endpoint.
    ///
    /// Emits a match event with the publisher's ownership strength. The
    /// handle detaches cleanly on drop.
    pub fn attach_publisher(&self, topic: &str, strength: Strength) -> Result<PublisherHandle> {
        let endpoint = self
            .shared
            .registry
            .resolve(topic, Direction::Subscribe)?
            .clone();

        let mut state = self.shared.state.lock();
        let id = PublisherId(state.next_publisher);
        state.next_publisher += 1;
        state.attached.insert(id, endpoint.id());
        state.push_event(BusEvent::MatchChanged {
            endpoint: endpoint.id(),
            publisher: id,
            strength,
            delta: 1,
        });
        drop(state);
        self.shared.wake.notify_all();

        Ok(PublisherHandle {
            shared: Arc::clone(&self.shared),
            endpoint: endpoint.id(),
            id,
            strength,
            attached: true,
        })
    }

    /// Open a drain on a publishing endpoint's outbound statuses.
    pub fn status_tap(&self, topic: &str) -> Result<StatusTap> {
        let endpoint = self
            .shared
            .registry
            .resolve(topic, Direction::Publish)?
            .clone();
        Ok(StatusTap {
            shared: Arc::clone(&self.shared),
            endpoint: endpoint.id(),
        })
    }
}

impl CommandBus for LoopbackBus {
    fn find_endpoint(&self, name: &str, direction: Direction) -> Result<Endpoint> {
        self.shared.registry.resolve(name, direction).cloned()
    }

    fn wait(&self, timeout: Duration) -> Result<Vec<BusEvent>> {
        let mut state = self.shared.state.lock();
        if state.events.is_empty() {
            let _ = self.shared.wake.wait_for(&mut state, timeout);
        }
        Ok(state.events.drain(..).collect())
    }

    fn take_samples(&self, endpoint: &Endpoint) -> Result<Vec<CommandSample>> {
        let mut state = self.shared.state.lock();
        Ok(state
            .samples
            .get_mut(&endpoint.id())
            .map(|q| q.drain(..).collect())
            .unwrap_or_default())
    }

    fn write_status(&self, endpoint: &Endpoint, status: SteeringStatus) -> Result<()> {
        if endpoint.direction() != Direction::Publish {
            return Err(Error::Transport(format!(
                "write on non-publishing endpoint {}",
                endpoint.name()
            )));
        }
        let mut state = self.shared.state.lock();
        let queue = state.statuses.entry(endpoint.id()).or_default();
        if queue.len() >= STATUS_DEPTH {
            queue.pop_front();
        }
        queue.push_back(status);
        Ok(())
    }
}

/// Handle held by one publishing side (a controller).
pub struct PublisherHandle {
    shared: Arc<Shared>,
    endpoint: EndpointId,
    id: PublisherId,
    strength: Strength,
    attached: bool,
}

impl PublisherHandle {
    pub fn id(&self) -> PublisherId {
        self.id
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Publish one command sample. Publishing counts as a liveliness
    /// assertion on the subscriber side.
    pub fn publish(&self, command: SteeringCommand) -> Result<()> {
        if !self.attached {
            return Err(Error::Transport("publisher is detached".to_string()));
        }
        let mut state = self.shared.state.lock();
        let queue = state.samples.entry(self.endpoint).or_default();
        if queue.len() >= SAMPLE_DEPTH {
            trace!(publisher = %self.id, "sample queue full, dropping oldest");
            queue.pop_front();
        }
        queue.push_back(CommandSample {
            command,
            source: self.id,
            valid: true,
        });
        let endpoint = self.endpoint;
        state.push_event(BusEvent::DataAvailable { endpoint });
        drop(state);
        self.shared.wake.notify_all();
        Ok(())
    }

    /// Assert liveliness without publishing data (a heartbeat).
    pub fn assert_liveliness(&self) -> Result<()> {
        if !self.attached {
            return Err(Error::Transport("publisher is detached".to_string()));
        }
        let mut state = self.shared.state.lock();
        let ev = BusEvent::LivelinessChanged {
            endpoint: self.endpoint,
            publisher: self.id,
            alive_delta: 1,
        };
        state.push_event(ev);
        drop(state);
        self.shared.wake.notify_all();
        Ok(())
    }

    /// Change the advertised ownership strength.
    pub fn set_strength(&mut self, strength: Strength) -> Result<()> {
        if !self.attached {
            return Err(Error::Transport("publisher is detached".to_string()));
        }
        self.strength = strength;
        let mut state = self.shared.state.lock();
        let ev = BusEvent::MatchChanged {
            endpoint: self.endpoint,
            publisher: self.id,
            strength,
            delta: 0,
        };
        state.push_event(ev);
        drop(state);
        self.shared.wake.notify_all();
        Ok(())
    }

    /// Detach cleanly, emitting an unmatch event.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        let mut state = self.shared.state.lock();
        state.attached.remove(&self.id);
        let ev = BusEvent::MatchChanged {
            endpoint: self.endpoint,
            publisher: self.id,
            strength: self.strength,
            delta: -1,
        };
        state.push_event(ev);
        drop(state);
        self.shared.wake.notify_all();
    }
}

impl Drop for PublisherHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Drain side of a publishing endpoint, used by the status display and the
/// test suites to observe actuator output.
pub struct StatusTap {
    shared: Arc<Shared>,
    endpoint: EndpointId,
}

impl StatusTap {
    /// Take every status written since the last drain.
    pub fn drain(&self) -> Vec<SteeringStatus> {
        let mut state = self.shared.state.lock();
        state
            .statuses
            .get_mut(&self.endpoint)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default()
    }
}
