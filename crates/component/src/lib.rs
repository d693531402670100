//! Lifecycle workflow shared by every host-managed component.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod component;
mod context;
mod error;
mod identity;
mod phase;
mod reason;
mod workflow;

pub use component::{Component, HookError};
pub use context::{COMPONENT_ID, COMPONENT_NAME, ComponentContext};
pub use error::{Error, WorkflowError};
pub use identity::ComponentIdentity;
pub use phase::{LifecyclePhase, Operation, WorkflowStep};
pub use reason::DeactivationReason;
pub use workflow::{ComponentWorkflow, Deactivation, WorkflowOptions};

/// Tracing target for lifecycle messages.
pub const LIFECYCLE_TARGET: &str = "vessel::lifecycle";
