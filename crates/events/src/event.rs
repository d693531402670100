use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute key under which the free-form context string is carried.
pub const CONTEXT_ATTRIBUTE: &str = "event.context";

/// Event attributes, keyed by name.
pub type Attributes = BTreeMap<String, Value>;

/// A notification: a topic plus attributes. Immutable once built.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Event {
    topic: String,
    attributes: Attributes,
}

impl Event {
    /// Creates a new event.
    pub fn new<K>(topic: K, attributes: Attributes) -> Self
    where
        K: Into<String>,
    {
        Self {
            topic: topic.into(),
            attributes,
        }
    }

    /// Creates an event carrying only a context string.
    pub fn with_context<K, C>(topic: K, context: C) -> Self
    where
        K: Into<String>,
        C: Into<String>,
    {
        let mut attributes = Attributes::new();
        attributes.insert(CONTEXT_ATTRIBUTE.to_string(), Value::String(context.into()));

        Self::new(topic, attributes)
    }

    /// The event topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// All attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// A single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The context string, if the event carries one.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.attribute(CONTEXT_ATTRIBUTE).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_context_event() {
        let event = Event::with_context("org/vessel/started", "warm boot");

        assert_eq!(event.topic(), "org/vessel/started");
        assert_eq!(event.context(), Some("warm boot"));
        assert_eq!(event.attributes().len(), 1);
    }

    #[test]
    fn test_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("count".to_string(), json!(3));

        let event = Event::new("org/vessel/counted", attributes);

        assert_eq!(event.attribute("count"), Some(&json!(3)));
        assert_eq!(event.context(), None);
    }
}
