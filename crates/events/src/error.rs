use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The bound publisher rejected the event.
    #[error("event publisher rejected event on topic '{topic}': {source}")]
    Publish {
        /// Topic of the rejected event.
        topic: String,

        /// The publisher's error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
