use crate::context::ComponentContext;
use crate::reason::DeactivationReason;

use async_trait::async_trait;

/// Error type returned by component hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Extension points invoked by `ComponentWorkflow` around its mandatory steps.
///
/// Every hook defaults to a no-op. Identity is captured before the first hook
/// runs and cleared only after the last deactivation hook returns, so hooks
/// never observe a half-initialized component.
#[async_trait]
pub trait Component
where
    Self: Send + Sync + 'static,
{
    /// The context type the host passes on activation and modification.
    type Context: ComponentContext;

    /// Extracts component configuration from the context.
    ///
    /// Runs on both activation and modification.
    async fn initialize_properties(&mut self, _context: &Self::Context) -> Result<(), HookError> {
        Ok(())
    }

    /// Component-specific startup, after configuration.
    async fn after_activation(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    /// Reacts to a configuration change, after `initialize_properties`.
    async fn after_modification(&mut self, _context: &Self::Context) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs first during deactivation.
    async fn before_deactivation(&mut self, _reason: DeactivationReason) -> Result<(), HookError> {
        Ok(())
    }

    /// Releases resources acquired by the component.
    async fn reset_properties(&mut self) -> Result<(), HookError> {
        Ok(())
    }
}
