use crate::LIFECYCLE_TARGET;
use crate::component::{Component, HookError};
use crate::error::{Error, WorkflowError};
use crate::identity::{self, ComponentIdentity};
use crate::phase::{LifecyclePhase, Operation, WorkflowStep};
use crate::reason::DeactivationReason;

use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::{Instrument, Span, debug, error, field, info, info_span, trace, warn};

/// Options for creating a new `ComponentWorkflow`.
#[derive(Clone, Debug, Default)]
pub struct WorkflowOptions {
    /// Name reported while no identity is captured, and captured when the
    /// host context carries no name. Defaults to the component's type name.
    pub fallback_name: Option<String>,
}

/// Outcome of a deactivation.
///
/// Hook failures during deactivation are not fatal; they are collected here.
#[derive(Debug)]
pub struct Deactivation {
    reason: DeactivationReason,
    failures: Vec<WorkflowError>,
}

impl Deactivation {
    /// The reason the host gave.
    #[must_use]
    pub const fn reason(&self) -> DeactivationReason {
        self.reason
    }

    /// Hook failures that occurred during teardown.
    #[must_use]
    pub fn failures(&self) -> &[WorkflowError] {
        &self.failures
    }

    /// Whether every deactivation hook succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consumes the outcome, returning the collected failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<WorkflowError> {
        self.failures
    }
}

/// Drives a component through activation, modification, and deactivation.
///
/// Each entry point runs a fixed sequence: a mandatory bookkeeping step, the
/// component's hooks, and a closing bookkeeping step. Entry points take
/// `&mut self`, so lifecycle calls for one component never overlap.
pub struct ComponentWorkflow<C>
where
    C: Component,
{
    component: C,
    fallback_name: String,
    identity: ComponentIdentity,
    phase: LifecyclePhase,
    span: Span,
}

impl<C> ComponentWorkflow<C>
where
    C: Component,
{
    /// Creates a new workflow with default options.
    pub fn new(component: C) -> Self {
        Self::with_options(component, WorkflowOptions::default())
    }

    /// Creates a new workflow.
    pub fn with_options(component: C, WorkflowOptions { fallback_name }: WorkflowOptions) -> Self {
        let fallback_name =
            fallback_name.unwrap_or_else(|| identity::type_name::<C>().to_string());

        let span = info_span!(
            "component",
            kind = %fallback_name,
            id = field::Empty,
            name = field::Empty
        );

        Self {
            component,
            fallback_name,
            identity: ComponentIdentity::default(),
            phase: LifecyclePhase::Inactive,
            span,
        }
    }

    /// Activates the component.
    ///
    /// Captures identity from `context`, then runs `initialize_properties`
    /// and `after_activation`. On failure the identity stays captured for
    /// diagnostics and the component returns to `Inactive`. Dropping the
    /// returned future before it completes has the same outcome.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` unless the component is inactive,
    /// or `Error::Workflow` if a hook fails.
    pub async fn activate(&mut self, context: &C::Context) -> Result<(), Error> {
        let span = self.span.clone();
        let mut call = LifecycleCall::new(self);

        let result = call.run_activation(context).instrument(span).await;
        call.complete();

        result
    }

    /// Applies a new configuration to an active component.
    ///
    /// Re-captures identity, then runs `initialize_properties` and
    /// `after_modification`. On failure, or if the returned future is dropped
    /// before it completes, the component stays `Modifying` and only accepts
    /// deactivation.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` unless the component is active, or
    /// `Error::Workflow` if a hook fails.
    pub async fn modify(&mut self, context: &C::Context) -> Result<(), Error> {
        let span = self.span.clone();
        let mut call = LifecycleCall::new(self);

        let result = call.run_modification(context).instrument(span).await;
        call.complete();

        result
    }

    /// Deactivates the component.
    ///
    /// Runs `before_deactivation` and `reset_properties`, then clears the
    /// identity. Hook failures are logged and returned in the `Deactivation`;
    /// they never stop the teardown. If the returned future is dropped before
    /// it completes, the remaining hooks are skipped but the identity is still
    /// cleared and the component returns to `Inactive`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` unless the component is active or
    /// mid-modification.
    pub async fn deactivate(&mut self, reason: DeactivationReason) -> Result<Deactivation, Error> {
        let span = self.span.clone();
        let mut call = LifecycleCall::new(self);

        let result = call.run_deactivation(reason).instrument(span).await;
        call.complete();

        result
    }

    async fn run_activation(&mut self, context: &C::Context) -> Result<(), Error> {
        self.enter(Operation::Activate, LifecyclePhase::Activating)?;
        self.capture(context);

        trace!(
            target: LIFECYCLE_TARGET,
            "Initiated activation of component instance id-{} from '{}'",
            self.id(),
            self.short_name()
        );

        if let Err(error) = self.activation_steps(context).await {
            self.phase = LifecyclePhase::Inactive;
            error!(target: LIFECYCLE_TARGET, %error, "Activation failed");
            return Err(error.into());
        }

        self.phase = LifecyclePhase::Active;

        info!(
            target: LIFECYCLE_TARGET,
            "Activated component instance id-{} from '{}'",
            self.id(),
            self.short_name()
        );

        Ok(())
    }

    async fn activation_steps(&mut self, context: &C::Context) -> Result<(), WorkflowError> {
        self.configure(context).await?;

        let result = self.component.after_activation().await;
        result.map_err(|source| self.hook_error(WorkflowStep::AfterActivation, source))
    }

    async fn run_modification(&mut self, context: &C::Context) -> Result<(), Error> {
        self.enter(Operation::Modify, LifecyclePhase::Modifying)?;
        self.capture(context);

        debug!(
            target: LIFECYCLE_TARGET,
            "Started the configuration modification of component instance id-{} from '{}'",
            self.id(),
            self.short_name()
        );

        if let Err(error) = self.modification_steps(context).await {
            error!(target: LIFECYCLE_TARGET, %error, "Modification failed");
            return Err(error.into());
        }

        self.phase = LifecyclePhase::Active;

        trace!(
            target: LIFECYCLE_TARGET,
            "Ended the configuration modification of component instance id-{} from '{}'",
            self.id(),
            self.short_name()
        );

        Ok(())
    }

    async fn modification_steps(&mut self, context: &C::Context) -> Result<(), WorkflowError> {
        self.configure(context).await?;

        let result = self.component.after_modification(context).await;
        result.map_err(|source| self.hook_error(WorkflowStep::AfterModification, source))
    }

    async fn run_deactivation(&mut self, reason: DeactivationReason) -> Result<Deactivation, Error> {
        self.enter(Operation::Deactivate, LifecyclePhase::Deactivating)?;

        debug!(
            target: LIFECYCLE_TARGET,
            "Initiated deactivation of component instance id-{} with reason '{}' from '{}'",
            self.id(),
            reason,
            self.short_name()
        );

        let mut failures = Vec::new();

        let result = self.component.before_deactivation(reason).await;
        if let Err(source) = result {
            failures.push(self.hook_error(WorkflowStep::BeforeDeactivation, source));
        }

        let result = self.component.reset_properties().await;
        if let Err(source) = result {
            failures.push(self.hook_error(WorkflowStep::ResetProperties, source));
        }

        for failure in &failures {
            warn!(target: LIFECYCLE_TARGET, error = %failure, "Deactivation hook failed");
        }

        info!(
            target: LIFECYCLE_TARGET,
            "Deactivated component instance id-{} from '{}'",
            self.id(),
            self.short_name()
        );

        self.clear();

        Ok(Deactivation { reason, failures })
    }

    async fn configure(&mut self, context: &C::Context) -> Result<(), WorkflowError> {
        trace!(
            target: LIFECYCLE_TARGET,
            "Initiated configuration of component instance id-{} from '{}'",
            self.id(),
            self.short_name()
        );

        let result = self.component.initialize_properties(context).await;
        result.map_err(|source| self.hook_error(WorkflowStep::InitializeProperties, source))?;

        trace!(
            target: LIFECYCLE_TARGET,
            "Ended configuration of component instance id-{} from '{}'",
            self.id(),
            self.short_name()
        );

        Ok(())
    }

    fn enter(&mut self, operation: Operation, next: LifecyclePhase) -> Result<(), Error> {
        if !self.phase.permits(operation) {
            debug!(target: LIFECYCLE_TARGET, %operation, phase = %self.phase, "Rejected lifecycle call");
            return Err(Error::InvalidTransition {
                operation,
                phase: self.phase,
            });
        }

        self.phase = next;
        Ok(())
    }

    fn capture(&mut self, context: &C::Context) {
        self.identity.capture(context, &self.fallback_name);
        self.identity.record(&self.span, &self.fallback_name);
    }

    fn clear(&mut self) {
        self.identity.clear();
        self.identity.record(&self.span, &self.fallback_name);
        self.phase = LifecyclePhase::Inactive;
    }

    fn settle_interrupted(&mut self) {
        let span = self.span.clone();
        let _entered = span.enter();

        match self.phase {
            LifecyclePhase::Activating => {
                warn!(
                    target: LIFECYCLE_TARGET,
                    "Interrupted activation of component instance id-{} from '{}'",
                    self.id(),
                    self.short_name()
                );
                self.phase = LifecyclePhase::Inactive;
            }
            LifecyclePhase::Modifying => {
                warn!(
                    target: LIFECYCLE_TARGET,
                    "Interrupted configuration modification of component instance id-{} from '{}'",
                    self.id(),
                    self.short_name()
                );
            }
            LifecyclePhase::Deactivating => {
                warn!(
                    target: LIFECYCLE_TARGET,
                    "Interrupted deactivation of component instance id-{} from '{}'",
                    self.id(),
                    self.short_name()
                );
                self.clear();
            }
            LifecyclePhase::Inactive | LifecyclePhase::Active => {}
        }
    }

    fn hook_error(&self, step: WorkflowStep, source: HookError) -> WorkflowError {
        WorkflowError {
            phase: self.phase,
            step,
            component: self.name().to_string(),
            source,
        }
    }

    /// The captured id, or 0 while no identity is captured.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.identity.id().unwrap_or_default()
    }

    /// The captured name, or the fallback name while no identity is captured.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identity.name().unwrap_or(&self.fallback_name)
    }

    /// The last `.`-separated segment of `name()`.
    #[must_use]
    pub fn short_name(&self) -> &str {
        identity::short_name(self.name())
    }

    /// The current identity.
    #[must_use]
    pub const fn identity(&self) -> &ComponentIdentity {
        &self.identity
    }

    /// The current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// The component span; lifecycle calls run inside it.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// The wrapped component.
    #[must_use]
    pub const fn component(&self) -> &C {
        &self.component
    }

    /// The wrapped component, mutably.
    pub const fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Consumes the workflow, returning the component.
    pub fn into_inner(self) -> C {
        self.component
    }
}

/// A lifecycle call in progress.
///
/// Dropped without `complete`, when the caller abandons the future or a hook
/// panics, it settles the workflow: an activation falls back to `Inactive`, a
/// modification stays `Modifying`, and a deactivation clears the identity.
struct LifecycleCall<'a, C>
where
    C: Component,
{
    workflow: &'a mut ComponentWorkflow<C>,
    completed: bool,
}

impl<'a, C> LifecycleCall<'a, C>
where
    C: Component,
{
    const fn new(workflow: &'a mut ComponentWorkflow<C>) -> Self {
        Self {
            workflow,
            completed: false,
        }
    }

    const fn complete(&mut self) {
        self.completed = true;
    }
}

impl<C> Deref for LifecycleCall<'_, C>
where
    C: Component,
{
    type Target = ComponentWorkflow<C>;

    fn deref(&self) -> &Self::Target {
        &*self.workflow
    }
}

impl<C> DerefMut for LifecycleCall<'_, C>
where
    C: Component,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.workflow
    }
}

impl<C> Drop for LifecycleCall<'_, C>
where
    C: Component,
{
    fn drop(&mut self) {
        if !self.completed {
            self.workflow.settle_interrupted();
        }
    }
}

impl<C> fmt::Display for ComponentWorkflow<C>
where
    C: Component,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[id=", self.fallback_name)?;

        match self.identity.id() {
            Some(id) => write!(f, "{id}")?,
            None => f.write_str("None")?,
        }

        write!(f, ", name={}, phase={}]", self.name(), self.phase)
    }
}

impl<C> fmt::Debug for ComponentWorkflow<C>
where
    C: Component,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentWorkflow")
            .field("fallback_name", &self.fallback_name)
            .field("identity", &self.identity)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
