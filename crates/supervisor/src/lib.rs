//! Safety supervision and the actuator dispatch runtime.
//!
//! The supervisor forces a defined safe output whenever command delivery
//! becomes untrustworthy; the relay mirrors accepted commands into actuator
//! status; the runtime owns the single reactive dispatch loop that ties
//! arbitration, health monitoring, and output together.

pub mod relay;
pub mod runtime;
pub mod supervisor;

pub use relay::CommandRelay;
pub use runtime::ActuatorRuntime;
pub use supervisor::SafetySupervisor;
