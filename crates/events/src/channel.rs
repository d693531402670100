use crate::error::Error;
use crate::event::{Attributes, Event};
use crate::{EVENTS_TARGET, EventPublisher};

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use vessel_binder::ServiceSlot;

/// Whether a dispatched event reached a publisher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A publisher was bound and accepted the event.
    Delivered,

    /// No publisher was bound; the event was dropped.
    Unbound,
}

/// Sends events through whatever publisher is bound to a slot.
///
/// An unbound slot is a normal state, not an error: every call then returns
/// `Ok(Dispatch::Unbound)` without side effects.
pub struct EventChannel<P> {
    publisher: Arc<ServiceSlot<P>>,
}

impl<P> EventChannel<P>
where
    P: EventPublisher,
{
    /// Creates a channel reading the publisher from `publisher`.
    pub const fn new(publisher: Arc<ServiceSlot<P>>) -> Self {
        Self { publisher }
    }

    /// Posts an event without attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher rejects the event.
    pub fn post<K>(&self, topic: K) -> Result<Dispatch, Error>
    where
        K: Into<String>,
    {
        self.post_event(Event::new(topic, Attributes::new()))
    }

    /// Posts an event with attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher rejects the event.
    pub fn post_with_attributes<K>(&self, topic: K, attributes: Attributes) -> Result<Dispatch, Error>
    where
        K: Into<String>,
    {
        self.post_event(Event::new(topic, attributes))
    }

    /// Posts an event carrying a context string.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher rejects the event.
    pub fn post_with_context<K, C>(&self, topic: K, context: C) -> Result<Dispatch, Error>
    where
        K: Into<String>,
        C: Into<String>,
    {
        self.post_event(Event::with_context(topic, context))
    }

    /// Hands `event` to the publisher for asynchronous delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher rejects the event.
    pub fn post_event(&self, event: Event) -> Result<Dispatch, Error> {
        let Some(publisher) = self.publisher.get() else {
            debug!(target: EVENTS_TARGET, topic = event.topic(), "No event publisher bound; dropped posted event");
            return Ok(Dispatch::Unbound);
        };

        let topic = event.topic().to_string();

        publisher
            .post(event)
            .map_err(|e| Error::Publish {
                topic,
                source: Box::new(e),
            })?;

        Ok(Dispatch::Delivered)
    }

    /// Sends an event without attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher fails to deliver the event.
    pub async fn send<K>(&self, topic: K) -> Result<Dispatch, Error>
    where
        K: Into<String> + Send,
    {
        self.send_event(Event::new(topic, Attributes::new())).await
    }

    /// Sends an event with attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher fails to deliver the event.
    pub async fn send_with_attributes<K>(
        &self,
        topic: K,
        attributes: Attributes,
    ) -> Result<Dispatch, Error>
    where
        K: Into<String> + Send,
    {
        self.send_event(Event::new(topic, attributes)).await
    }

    /// Sends an event carrying a context string.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher fails to deliver the event.
    pub async fn send_with_context<K, C>(&self, topic: K, context: C) -> Result<Dispatch, Error>
    where
        K: Into<String> + Send,
        C: Into<String> + Send,
    {
        self.send_event(Event::with_context(topic, context)).await
    }

    /// Delivers `event` and waits for the publisher to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound publisher fails to deliver the event.
    pub async fn send_event(&self, event: Event) -> Result<Dispatch, Error> {
        let Some(publisher) = self.publisher.get() else {
            debug!(target: EVENTS_TARGET, topic = event.topic(), "No event publisher bound; dropped sent event");
            return Ok(Dispatch::Unbound);
        };

        let topic = event.topic().to_string();

        publisher
            .send(event)
            .await
            .map_err(|e| Error::Publish {
                topic,
                source: Box::new(e),
            })?;

        Ok(Dispatch::Delivered)
    }

    /// Whether a publisher is currently bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.publisher.is_bound()
    }
}

impl<P> Clone for EventChannel<P> {
    fn clone(&self) -> Self {
        Self {
            publisher: Arc::clone(&self.publisher),
        }
    }
}

impl<P> fmt::Debug for EventChannel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("publisher", &self.publisher)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventPublisherError;
    use crate::event::CONTEXT_ATTRIBUTE;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("publisher is closed")]
    struct ClosedError;

    impl EventPublisherError for ClosedError {}

    #[derive(Debug, Default)]
    struct RecordingPublisher {
        posted: Mutex<Vec<Event>>,
        sent: Mutex<Vec<Event>>,
        closed: bool,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        type Error = ClosedError;

        fn post(&self, event: Event) -> Result<(), Self::Error> {
            if self.closed {
                return Err(ClosedError);
            }
            self.posted.lock().push(event);
            Ok(())
        }

        async fn send(&self, event: Event) -> Result<(), Self::Error> {
            if self.closed {
                return Err(ClosedError);
            }
            self.sent.lock().push(event);
            Ok(())
        }
    }

    fn channel() -> (EventChannel<RecordingPublisher>, Arc<ServiceSlot<RecordingPublisher>>) {
        let slot = Arc::new(ServiceSlot::new("event publisher"));
        (EventChannel::new(Arc::clone(&slot)), slot)
    }

    #[tokio::test]
    async fn test_unbound_channel_is_a_no_op() {
        let (channel, _slot) = channel();

        assert_eq!(channel.post("org/vessel/a").unwrap(), Dispatch::Unbound);
        assert_eq!(
            channel.post_with_context("org/vessel/a", "ctx").unwrap(),
            Dispatch::Unbound
        );
        assert_eq!(channel.send("org/vessel/a").await.unwrap(), Dispatch::Unbound);
        assert_eq!(
            channel
                .send_with_attributes("org/vessel/a", Attributes::new())
                .await
                .unwrap(),
            Dispatch::Unbound
        );
        assert!(!channel.is_bound());
    }

    #[tokio::test]
    async fn test_post_reaches_bound_publisher() {
        let (channel, slot) = channel();
        let publisher = Arc::new(RecordingPublisher::default());
        slot.bind(Arc::clone(&publisher));

        let mut attributes = Attributes::new();
        attributes.insert("size".to_string(), json!(12));

        assert_eq!(
            channel
                .post_with_attributes("org/vessel/resized", attributes.clone())
                .unwrap(),
            Dispatch::Delivered
        );

        let posted = publisher.posted.lock();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].topic(), "org/vessel/resized");
        assert_eq!(posted[0].attributes(), &attributes);
        assert!(publisher.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_send_wraps_context() {
        let (channel, slot) = channel();
        let publisher = Arc::new(RecordingPublisher::default());
        slot.bind(Arc::clone(&publisher));

        channel
            .send_with_context("org/vessel/ready", "after reload")
            .await
            .unwrap();

        let sent = publisher.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].attribute(CONTEXT_ATTRIBUTE),
            Some(&json!("after reload"))
        );
    }

    #[tokio::test]
    async fn test_unbinding_publisher_stops_delivery() {
        let (channel, slot) = channel();
        let publisher = Arc::new(RecordingPublisher::default());
        slot.bind(Arc::clone(&publisher));

        channel.post("org/vessel/one").unwrap();
        slot.unbind(&publisher);

        assert_eq!(channel.post("org/vessel/two").unwrap(), Dispatch::Unbound);
        assert_eq!(publisher.posted.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_publisher_failure_is_reported() {
        let (channel, slot) = channel();
        slot.bind(Arc::new(RecordingPublisher {
            closed: true,
            ..RecordingPublisher::default()
        }));

        assert_matches!(
            channel.post("org/vessel/lost"),
            Err(Error::Publish { topic, .. }) if topic == "org/vessel/lost"
        );
        assert_matches!(
            channel.send("org/vessel/lost").await,
            Err(Error::Publish { .. })
        );
    }

    #[tokio::test]
    async fn test_publisher_error_is_kept_as_source() {
        let (channel, slot) = channel();
        slot.bind(Arc::new(RecordingPublisher {
            closed: true,
            ..RecordingPublisher::default()
        }));

        let error = channel.send("org/vessel/lost").await.unwrap_err();
        let source = std::error::Error::source(&error).unwrap();

        assert!(source.downcast_ref::<ClosedError>().is_some());
        assert_eq!(
            error.to_string(),
            "event publisher rejected event on topic 'org/vessel/lost': publisher is closed"
        );
    }
}
