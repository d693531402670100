use thiserror::Error;
use vessel_events::EventPublisherError;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The delivery task has stopped, so posted events can no longer be queued.
    #[error("event delivery task is closed")]
    Closed,

    /// A topic filter could not be parsed.
    #[error("invalid topic filter '{0}'")]
    InvalidFilter(String),
}

impl EventPublisherError for Error {}
