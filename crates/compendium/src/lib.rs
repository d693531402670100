//! The standard collaborator slots most components need: a configuration
//! source, an event publisher, and a preference store.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::fmt;
use std::sync::Arc;

use vessel_binder::ServiceSlot;
use vessel_events::{EventChannel, EventPublisher};

/// Marker trait for configuration source collaborators.
pub trait ConfigurationSource: Send + Sync + 'static {}

/// Marker trait for preference store collaborators.
pub trait PreferenceStore: Send + Sync + 'static {}

/// Slots for a component's standard collaborators.
///
/// Clones share the same slots, so the host can keep one clone for binding
/// while the component reads through another.
pub struct Compendium<C, E, P> {
    configuration_source: Arc<ServiceSlot<C>>,
    event_publisher: Arc<ServiceSlot<E>>,
    preference_store: Arc<ServiceSlot<P>>,
}

impl<C, E, P> Compendium<C, E, P>
where
    C: ConfigurationSource,
    E: EventPublisher,
    P: PreferenceStore,
{
    /// Creates a compendium with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            configuration_source: Arc::new(ServiceSlot::new("configuration source")),
            event_publisher: Arc::new(ServiceSlot::new("event publisher")),
            preference_store: Arc::new(ServiceSlot::new("preference store")),
        }
    }

    /// Binds a configuration source at construction.
    #[must_use]
    pub fn with_configuration_source(self, configuration_source: Arc<C>) -> Self {
        self.bind_configuration_source(configuration_source);
        self
    }

    /// Binds an event publisher at construction.
    #[must_use]
    pub fn with_event_publisher(self, event_publisher: Arc<E>) -> Self {
        self.bind_event_publisher(event_publisher);
        self
    }

    /// Binds a preference store at construction.
    #[must_use]
    pub fn with_preference_store(self, preference_store: Arc<P>) -> Self {
        self.bind_preference_store(preference_store);
        self
    }

    /// Binds the configuration source, replacing any previous one.
    pub fn bind_configuration_source(&self, configuration_source: Arc<C>) {
        self.configuration_source.bind(configuration_source);
    }

    /// Unbinds the configuration source if it is still the bound one.
    pub fn unbind_configuration_source(&self, configuration_source: &Arc<C>) -> bool {
        self.configuration_source.unbind(configuration_source)
    }

    /// The bound configuration source, if any.
    #[must_use]
    pub fn configuration_source(&self) -> Option<Arc<C>> {
        self.configuration_source.get()
    }

    /// Binds the event publisher, replacing any previous one.
    pub fn bind_event_publisher(&self, event_publisher: Arc<E>) {
        self.event_publisher.bind(event_publisher);
    }

    /// Unbinds the event publisher if it is still the bound one.
    pub fn unbind_event_publisher(&self, event_publisher: &Arc<E>) -> bool {
        self.event_publisher.unbind(event_publisher)
    }

    /// The bound event publisher, if any.
    #[must_use]
    pub fn event_publisher(&self) -> Option<Arc<E>> {
        self.event_publisher.get()
    }

    /// Binds the preference store, replacing any previous one.
    pub fn bind_preference_store(&self, preference_store: Arc<P>) {
        self.preference_store.bind(preference_store);
    }

    /// Unbinds the preference store if it is still the bound one.
    pub fn unbind_preference_store(&self, preference_store: &Arc<P>) -> bool {
        self.preference_store.unbind(preference_store)
    }

    /// The bound preference store, if any.
    #[must_use]
    pub fn preference_store(&self) -> Option<Arc<P>> {
        self.preference_store.get()
    }

    /// An event channel over the event publisher slot.
    #[must_use]
    pub fn events(&self) -> EventChannel<E> {
        EventChannel::new(Arc::clone(&self.event_publisher))
    }
}

impl<C, E, P> Default for Compendium<C, E, P>
where
    C: ConfigurationSource,
    E: EventPublisher,
    P: PreferenceStore,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E, P> Clone for Compendium<C, E, P> {
    fn clone(&self) -> Self {
        Self {
            configuration_source: Arc::clone(&self.configuration_source),
            event_publisher: Arc::clone(&self.event_publisher),
            preference_store: Arc::clone(&self.preference_store),
        }
    }
}

impl<C, E, P> fmt::Debug for Compendium<C, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compendium")
            .field("configuration_source", &self.configuration_source)
            .field("event_publisher", &self.event_publisher)
            .field("preference_store", &self.preference_store)
            .finish()
    }
}
