use std::fmt;

/// Where a component currently sits in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// Not activated, or fully deactivated.
    #[default]
    Inactive,

    /// Activation steps are running.
    Activating,

    /// Activated and serving.
    Active,

    /// A configuration modification is running, or one failed.
    Modifying,

    /// Deactivation steps are running.
    Deactivating,
}

impl LifecyclePhase {
    /// Whether `operation` may start from this phase.
    #[must_use]
    pub const fn permits(self, operation: Operation) -> bool {
        matches!(
            (operation, self),
            (Operation::Activate, Self::Inactive)
                | (Operation::Modify, Self::Active)
                | (Operation::Deactivate, Self::Active | Self::Modifying)
        )
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inactive => "inactive",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Modifying => "modifying",
            Self::Deactivating => "deactivating",
        })
    }
}

/// Host-initiated lifecycle operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// First activation with a context.
    Activate,

    /// Reconfiguration of an active component.
    Modify,

    /// Teardown.
    Deactivate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activate => "activate",
            Self::Modify => "modify",
            Self::Deactivate => "deactivate",
        })
    }
}

/// The component hook a workflow step delegates to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkflowStep {
    /// `Component::initialize_properties`
    InitializeProperties,

    /// `Component::after_activation`
    AfterActivation,

    /// `Component::after_modification`
    AfterModification,

    /// `Component::before_deactivation`
    BeforeDeactivation,

    /// `Component::reset_properties`
    ResetProperties,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InitializeProperties => "initialize_properties",
            Self::AfterActivation => "after_activation",
            Self::AfterModification => "after_modification",
            Self::BeforeDeactivation => "before_deactivation",
            Self::ResetProperties => "reset_properties",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_only_from_inactive() {
        assert!(LifecyclePhase::Inactive.permits(Operation::Activate));
        assert!(!LifecyclePhase::Active.permits(Operation::Activate));
        assert!(!LifecyclePhase::Modifying.permits(Operation::Activate));
    }

    #[test]
    fn test_modify_only_from_active() {
        assert!(LifecyclePhase::Active.permits(Operation::Modify));
        assert!(!LifecyclePhase::Inactive.permits(Operation::Modify));
        assert!(!LifecyclePhase::Modifying.permits(Operation::Modify));
    }

    #[test]
    fn test_deactivate_from_active_or_failed_modification() {
        assert!(LifecyclePhase::Active.permits(Operation::Deactivate));
        assert!(LifecyclePhase::Modifying.permits(Operation::Deactivate));
        assert!(!LifecyclePhase::Inactive.permits(Operation::Deactivate));
        assert!(!LifecyclePhase::Deactivating.permits(Operation::Deactivate));
    }
}
