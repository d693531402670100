//! Event notifications sent through an optionally bound event publisher.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod channel;
mod error;
mod event;

pub use channel::{Dispatch, EventChannel};
pub use error::Error;
pub use event::{Attributes, CONTEXT_ATTRIBUTE, Event};

use std::error::Error as StdError;

use async_trait::async_trait;

/// Tracing target for event dispatch messages.
pub const EVENTS_TARGET: &str = "vessel::events";

/// Marker trait for event publisher errors
pub trait EventPublisherError: StdError + Send + Sync + 'static {}

/// A collaborator able to deliver events to interested handlers.
#[async_trait]
pub trait EventPublisher
where
    Self: Send + Sync + 'static,
{
    /// The error type for the publisher.
    type Error: EventPublisherError;

    /// Queues `event` for asynchronous delivery and returns immediately.
    fn post(&self, event: Event) -> Result<(), Self::Error>;

    /// Delivers `event` and returns once every handler has seen it.
    async fn send(&self, event: Event) -> Result<(), Self::Error>;
}
