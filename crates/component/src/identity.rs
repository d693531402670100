use crate::context::ComponentContext;

use tracing::Span;

/// Identity of a component instance, captured from the host context.
///
/// Either both the id and the name are set, or neither is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentIdentity {
    captured: Option<(u64, String)>,
}

impl ComponentIdentity {
    /// Captures the id and name from `context`.
    ///
    /// A missing id becomes 0 and a missing name becomes `fallback_name`.
    pub(crate) fn capture<X>(&mut self, context: &X, fallback_name: &str)
    where
        X: ComponentContext,
    {
        let id = context.id().unwrap_or_default();
        let name = context.name().unwrap_or(fallback_name).to_string();

        self.captured = Some((id, name));
    }

    pub(crate) fn clear(&mut self) {
        self.captured = None;
    }

    /// Whether an identity is currently captured.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.captured.is_some()
    }

    /// The captured id, or `None` before activation and after deactivation.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.captured.as_ref().map(|(id, _)| *id)
    }

    /// The captured name, or `None` before activation and after deactivation.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.captured.as_ref().map(|(_, name)| name.as_str())
    }

    /// Records the identity on the component's span.
    ///
    /// While nothing is captured the span reports id 0 and `fallback_name`.
    pub(crate) fn record(&self, span: &Span, fallback_name: &str) {
        let (id, name) = self
            .captured
            .as_ref()
            .map_or((0, fallback_name), |(id, name)| (*id, name.as_str()));

        span.record("id", id);
        span.record("name", name);
    }
}

/// Last `.`-separated segment of `name`.
#[must_use]
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, short)| short)
}

/// Unqualified name of `T`, without module path or generic arguments.
pub(crate) fn type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split_once('<').map_or(full, |(base, _)| base);

    base.rsplit_once("::").map_or(base, |(_, name)| name)
}
