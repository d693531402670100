use crate::error::Error;

use std::fmt;
use std::str::FromStr;

/// Selects the topics a handler receives.
///
/// Either an exact topic (`org/vessel/started`), a prefix ending in a `*`
/// segment (`org/vessel/*`, matching every topic below `org/vessel/`), or a
/// lone `*` matching everything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicFilter {
    /// Matches every topic.
    All,

    /// Matches topics starting with the prefix, which includes the trailing `/`.
    Prefix(String),

    /// Matches one topic.
    Exact(String),
}

impl TopicFilter {
    /// Whether `topic` is selected by this filter.
    #[must_use]
    pub fn matches(&self, topic: &str) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(prefix) => topic.starts_with(prefix.as_str()),
            Self::Exact(exact) => topic == exact,
        }
    }
}

impl FromStr for TopicFilter {
    type Err = Error;

    fn from_str(filter: &str) -> Result<Self, Self::Err> {
        if filter == "*" {
            return Ok(Self::All);
        }

        let (prefix, wildcard) = filter
            .strip_suffix("/*")
            .map_or((filter, false), |prefix| (prefix, true));

        let valid = !prefix.is_empty()
            && prefix
                .split('/')
                .all(|segment| !segment.is_empty() && !segment.contains('*'));

        if !valid {
            return Err(Error::InvalidFilter(filter.to_string()));
        }

        if wildcard {
            Ok(Self::Prefix(format!("{prefix}/")))
        } else {
            Ok(Self::Exact(prefix.to_string()))
        }
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
            Self::Exact(exact) => f.write_str(exact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        let filter: TopicFilter = "org/vessel/started".parse().unwrap();

        assert!(filter.matches("org/vessel/started"));
        assert!(!filter.matches("org/vessel/started/late"));
        assert!(!filter.matches("org/vessel"));
    }

    #[test]
    fn test_prefix() {
        let filter: TopicFilter = "org/vessel/*".parse().unwrap();

        assert!(filter.matches("org/vessel/started"));
        assert!(filter.matches("org/vessel/a/b"));
        assert!(!filter.matches("org/vessel"));
        assert!(!filter.matches("org/vesselx/started"));
        assert_eq!(filter.to_string(), "org/vessel/*");
    }

    #[test]
    fn test_all() {
        let filter: TopicFilter = "*".parse().unwrap();

        assert!(filter.matches("anything/at/all"));
    }

    #[test]
    fn test_invalid() {
        for filter in ["", "/", "org//vessel", "org/*/vessel", "org/ves*", "/*"] {
            assert_eq!(
                filter.parse::<TopicFilter>(),
                Err(Error::InvalidFilter(filter.to_string())),
                "{filter}"
            );
        }
    }
}
