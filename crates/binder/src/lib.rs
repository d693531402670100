//! Thread-safe single-reference slots for optional collaborator services.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::trace;

/// Tracing target for bind and unbind messages.
pub const BINDING_TARGET: &str = "vessel::binding";

/// Holds zero or one reference to a collaborator service.
///
/// The host binds and unbinds the collaborator at any time, possibly out of
/// order and concurrently with readers. Unbinding compares by pointer: only
/// the exact `Arc` currently held is cleared.
pub struct ServiceSlot<T> {
    label: &'static str,
    service: ArcSwapOption<T>,
}

impl<T> ServiceSlot<T> {
    /// Creates an empty slot. `label` names the collaborator in logs.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            service: ArcSwapOption::empty(),
        }
    }

    /// Creates a slot already holding `service`.
    #[must_use]
    pub fn bound(label: &'static str, service: Arc<T>) -> Self {
        Self {
            label,
            service: ArcSwapOption::new(Some(service)),
        }
    }

    /// Stores `service`, replacing whatever was bound.
    pub fn bind(&self, service: Arc<T>) {
        self.service.store(Some(service));

        trace!(target: BINDING_TARGET, "Bound {} service", self.label);
    }

    /// Clears the slot if it currently holds exactly `service`.
    ///
    /// Returns `false`, leaving the slot untouched, when a different service
    /// has been bound since.
    pub fn unbind(&self, service: &Arc<T>) -> bool {
        let expected = Some(Arc::clone(service));
        let previous = self.service.compare_and_swap(&expected, None);

        let cleared = matches!(&*previous, Some(previous) if Arc::ptr_eq(previous, service));

        if cleared {
            trace!(target: BINDING_TARGET, "Unbound {} service", self.label);
        } else {
            trace!(target: BINDING_TARGET, "Ignored stale unbind of {} service", self.label);
        }

        cleared
    }

    /// The currently bound service, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.service.load_full()
    }

    /// Whether a service is currently bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.service.load().is_some()
    }

    /// The collaborator label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }
}

impl<T> fmt::Debug for ServiceSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSlot")
            .field("label", &self.label)
            .field("bound", &self.is_bound())
            .finish()
    }
}
