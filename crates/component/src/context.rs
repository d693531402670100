use serde::de::DeserializeOwned;
use serde_json::Value;

/// Property carrying the host-assigned component id.
pub const COMPONENT_ID: &str = "component.id";

/// Property carrying the fully qualified component name.
pub const COMPONENT_NAME: &str = "component.name";

/// Property bag handed over by the host on every activation and modification.
pub trait ComponentContext
where
    Self: Send + Sync + 'static,
{
    /// Looks up a raw property value.
    fn property(&self, key: &str) -> Option<&Value>;

    /// All property keys.
    fn keys(&self) -> Vec<&str>;

    /// The host-assigned component id, if present and numeric.
    fn id(&self) -> Option<u64> {
        self.property(COMPONENT_ID).and_then(Value::as_u64)
    }

    /// The component name, if present.
    fn name(&self) -> Option<&str> {
        self.property(COMPONENT_NAME).and_then(Value::as_str)
    }

    /// Deserializes a property into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not match the shape of `T`.
    fn property_as<T>(&self, key: &str) -> Result<Option<T>, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        self.property(key)
            .map(|value| T::deserialize(value))
            .transpose()
    }
}
