//! In-memory implementation of the component context, for hosts that assemble
//! properties themselves and for tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use serde::Serialize;
use serde_json::{Map, Value};
use vessel_component::{COMPONENT_ID, COMPONENT_NAME, ComponentContext};

/// In-memory property bag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryContext {
    properties: Map<String, Value>,
}

impl MemoryContext {
    /// Creates an empty `MemoryContext`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context carrying the given component identity.
    #[must_use]
    pub fn with_identity<N: Into<String>>(id: u64, name: N) -> Self {
        Self::new().with_id(id).with_name(name)
    }

    /// Sets the component id property.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.properties.insert(COMPONENT_ID.to_string(), Value::from(id));
        self
    }

    /// Sets the component name property.
    #[must_use]
    pub fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        self.properties
            .insert(COMPONENT_NAME.to_string(), Value::String(name.into()));
        self
    }

    /// Sets an arbitrary property.
    #[must_use]
    pub fn with_property<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets a property from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON.
    pub fn insert_serialized<K, V>(&mut self, key: K, value: &V) -> Result<(), serde_json::Error>
    where
        K: Into<String>,
        V: Serialize + ?Sized,
    {
        self.properties.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Removes a property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the context holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl From<Map<String, Value>> for MemoryContext {
    fn from(properties: Map<String, Value>) -> Self {
        Self { properties }
    }
}

impl ComponentContext for MemoryContext {
    fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    fn keys(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }
}
