use crate::component::HookError;
use crate::phase::{LifecyclePhase, Operation, WorkflowStep};

use thiserror::Error;

/// A component hook failed during a lifecycle step.
#[derive(Debug, Error)]
#[error("{step} failed while {phase} component '{component}': {source}")]
pub struct WorkflowError {
    /// Phase the workflow was in when the hook failed.
    pub phase: LifecyclePhase,

    /// The failing step.
    pub step: WorkflowStep,

    /// Name of the component at the time of failure.
    pub component: String,

    /// The hook's own error.
    #[source]
    pub source: HookError,
}

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation is not allowed in the current phase.
    #[error("cannot {operation} component while {phase}")]
    InvalidTransition {
        /// The rejected operation.
        operation: Operation,

        /// Phase at the time of the call.
        phase: LifecyclePhase,
    },

    /// A hook failed during activation or modification.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}
