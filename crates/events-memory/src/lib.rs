//! In-memory (single process) implementation of the event publisher.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod filter;

pub use error::Error;
pub use filter::TopicFilter;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{trace, warn};
use vessel_events::{EVENTS_TARGET, Event, EventPublisher};

/// Error type returned by event handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Receives events whose topic matches the handler's filter.
#[async_trait]
pub trait EventHandler
where
    Self: Send + Sync + 'static,
{
    /// Handles a single event.
    async fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

/// Identifies a registered handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registration {
    id: HandlerId,
    filter: TopicFilter,
    handler: Arc<dyn EventHandler>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl Registry {
    fn matching(&self, topic: &str) -> Vec<Arc<dyn EventHandler>> {
        self.registrations
            .iter()
            .filter(|registration| registration.filter.matches(topic))
            .map(|registration| Arc::clone(&registration.handler))
            .collect()
    }
}

/// In-process event publisher.
///
/// Posted events are delivered in posting order by a background task; sent
/// events are delivered on the caller's task. Handler failures are logged and
/// do not stop delivery to the remaining handlers.
#[derive(Clone)]
pub struct MemoryEventPublisher {
    registry: Arc<RwLock<Registry>>,
    sender: mpsc::UnboundedSender<Event>,
}

impl MemoryEventPublisher {
    /// Creates a new `MemoryEventPublisher` and starts its delivery task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let registry = Arc::new(RwLock::new(Registry::default()));
        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::spawn(deliver_posted(Arc::clone(&registry), receiver));

        Self { registry, sender }
    }

    /// Registers `handler` for topics matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if `filter` cannot be parsed.
    pub fn register<H>(&self, filter: &str, handler: H) -> Result<HandlerId, Error>
    where
        H: EventHandler,
    {
        let filter: TopicFilter = filter.parse()?;
        let mut registry = self.registry.write();

        let id = HandlerId(registry.next_id);
        registry.next_id += 1;

        trace!(target: EVENTS_TARGET, %filter, "Registered event handler");

        registry.registrations.push(Registration {
            id,
            filter,
            handler: Arc::new(handler),
        });

        Ok(id)
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut registry = self.registry.write();
        let before = registry.registrations.len();

        registry
            .registrations
            .retain(|registration| registration.id != id);

        registry.registrations.len() != before
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.registry.read().registrations.len()
    }
}

impl Default for MemoryEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryEventPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryEventPublisher")
            .field("handlers", &self.handler_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EventPublisher for MemoryEventPublisher {
    type Error = Error;

    fn post(&self, event: Event) -> Result<(), Self::Error> {
        self.sender.send(event).map_err(|_| Error::Closed)
    }

    async fn send(&self, event: Event) -> Result<(), Self::Error> {
        deliver(&self.registry, &event).await;
        Ok(())
    }
}

async fn deliver_posted(registry: Arc<RwLock<Registry>>, mut receiver: mpsc::UnboundedReceiver<Event>) {
    while let Some(event) = receiver.recv().await {
        deliver(&registry, &event).await;
    }

    trace!(target: EVENTS_TARGET, "Event delivery task stopped");
}

async fn deliver(registry: &RwLock<Registry>, event: &Event) {
    let handlers = registry.read().matching(event.topic());

    trace!(
        target: EVENTS_TARGET,
        topic = event.topic(),
        handlers = handlers.len(),
        "Delivering event"
    );

    for handler in handlers {
        if let Err(error) = handler.handle(event).await {
            warn!(target: EVENTS_TARGET, topic = event.topic(), %error, "Event handler failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tokio::sync::mpsc::{Receiver, Sender, channel};
    use tokio::time::timeout;
    use tracing_test::traced_test;
    use vessel_events::Attributes;

    #[derive(Clone, Debug)]
    struct ForwardingHandler(Sender<Event>);

    #[async_trait]
    impl EventHandler for ForwardingHandler {
        async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
            self.0.send(event.clone()).await.map_err(Into::into)
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl EventHandler for FailingHandler {
        async fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
            Err("handler refused".into())
        }
    }

    fn forwarding() -> (ForwardingHandler, Receiver<Event>) {
        let (sender, receiver) = channel(16);
        (ForwardingHandler(sender), receiver)
    }

    async fn next(receiver: &mut Receiver<Event>) -> Event {
        timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap()
            .unwrap()
    }

    fn event(topic: &str) -> Event {
        Event::new(topic, Attributes::new())
    }

    #[tokio::test]
    async fn test_posted_events_arrive_in_order() {
        let publisher = MemoryEventPublisher::new();
        let (handler, mut receiver) = forwarding();
        publisher.register("org/vessel/*", handler).unwrap();

        for index in 0..5 {
            publisher.post(event(&format!("org/vessel/{index}"))).unwrap();
        }

        for index in 0..5 {
            assert_eq!(next(&mut receiver).await.topic(), format!("org/vessel/{index}"));
        }
    }

    #[tokio::test]
    async fn test_send_delivers_before_returning() {
        let publisher = MemoryEventPublisher::new();
        let (handler, mut receiver) = forwarding();
        publisher.register("org/vessel/ready", handler).unwrap();

        publisher.send(event("org/vessel/ready")).await.unwrap();

        assert_eq!(
            receiver.try_recv().unwrap().topic(),
            "org/vessel/ready"
        );
    }

    #[tokio::test]
    async fn test_filter_selects_handlers() {
        let publisher = MemoryEventPublisher::new();
        let (vessel, mut vessel_receiver) = forwarding();
        let (other, mut other_receiver) = forwarding();
        publisher.register("org/vessel/*", vessel).unwrap();
        publisher.register("org/other/*", other).unwrap();

        publisher.send(event("org/vessel/started")).await.unwrap();

        assert!(vessel_receiver.try_recv().is_ok());
        assert!(other_receiver.try_recv().is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failing_handler_does_not_block_others() {
        let publisher = MemoryEventPublisher::new();
        let (handler, mut receiver) = forwarding();
        publisher.register("*", FailingHandler).unwrap();
        publisher.register("*", handler).unwrap();

        publisher.send(event("org/vessel/any")).await.unwrap();

        assert!(receiver.try_recv().is_ok());
        assert!(logs_contain("Event handler failed"));
    }

    #[tokio::test]
    async fn test_unregister() {
        let publisher = MemoryEventPublisher::new();
        let (handler, mut receiver) = forwarding();
        let id = publisher.register("*", handler).unwrap();

        assert!(publisher.unregister(id));
        assert!(!publisher.unregister(id));
        assert_eq!(publisher.handler_count(), 0);

        publisher.send(event("org/vessel/any")).await.unwrap();
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_filter() {
        let publisher = MemoryEventPublisher::new();
        let (handler, _receiver) = forwarding();

        assert_eq!(
            publisher.register("org/*/vessel", handler),
            Err(Error::InvalidFilter("org/*/vessel".to_string()))
        );
    }
}
