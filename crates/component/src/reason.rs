use std::fmt;
use std::hash::{Hash, Hasher};

/// Why the host is deactivating a component.
///
/// Codes follow the host's numbering; unknown codes are carried verbatim.
/// Reasons compare by `code()`, so `Other(3)` equals `ConfigurationModified`.
/// `From<i32>` always yields the named variant for a listed code.
#[derive(Clone, Copy, Debug, Default)]
pub enum DeactivationReason {
    /// No reason given.
    #[default]
    Unspecified,

    /// The component was disabled.
    Disabled,

    /// A mandatory reference became unsatisfied.
    Reference,

    /// The configuration changed and the component cannot be modified in place.
    ConfigurationModified,

    /// The configuration was deleted.
    ConfigurationDeleted,

    /// The component instance was disposed.
    Disposed,

    /// The bundle hosting the component stopped.
    BundleStopped,

    /// A code the host defines that is not listed here.
    Other(i32),
}

impl DeactivationReason {
    /// Numeric code as supplied by the host.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Unspecified => 0,
            Self::Disabled => 1,
            Self::Reference => 2,
            Self::ConfigurationModified => 3,
            Self::ConfigurationDeleted => 4,
            Self::Disposed => 5,
            Self::BundleStopped => 6,
            Self::Other(code) => code,
        }
    }
}

impl PartialEq for DeactivationReason {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for DeactivationReason {}

impl Hash for DeactivationReason {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl From<i32> for DeactivationReason {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Unspecified,
            1 => Self::Disabled,
            2 => Self::Reference,
            3 => Self::ConfigurationModified,
            4 => Self::ConfigurationDeleted,
            5 => Self::Disposed,
            6 => Self::BundleStopped,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for DeactivationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("unspecified"),
            Self::Disabled => f.write_str("disabled"),
            Self::Reference => f.write_str("reference"),
            Self::ConfigurationModified => f.write_str("configuration modified"),
            Self::ConfigurationDeleted => f.write_str("configuration deleted"),
            Self::Disposed => f.write_str("disposed"),
            Self::BundleStopped => f.write_str("bundle stopped"),
            Self::Other(code) => write!(f, "code {code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        for code in 0..=6 {
            let reason = DeactivationReason::from(code);
            assert!(!matches!(reason, DeactivationReason::Other(_)));
            assert_eq!(reason.code(), code);
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let reason = DeactivationReason::from(42);
        assert_eq!(reason, DeactivationReason::Other(42));
        assert_eq!(reason.code(), 42);
        assert_eq!(reason.to_string(), "code 42");
    }

    #[test]
    fn test_equality_follows_code() {
        use std::collections::HashSet;

        assert_eq!(
            DeactivationReason::Other(3),
            DeactivationReason::ConfigurationModified
        );
        assert_ne!(DeactivationReason::Other(3), DeactivationReason::Disposed);

        let reasons: HashSet<_> = [
            DeactivationReason::Other(5),
            DeactivationReason::Disposed,
            DeactivationReason::from(5),
        ]
        .into_iter()
        .collect();
        assert_eq!(reasons.len(), 1);
    }
}
