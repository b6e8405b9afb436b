use thiserror::Error;

/// Errors raised while building or checking a benchmark entry point.
///
/// Every variant is fatal for the entry point that raised it and is reported
/// before any timing starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// E2001: HTTP method not recognized.
    #[error("E2001: unsupported HTTP method '{0}'")]
    UnsupportedMethod(String),

    /// E2002: Pattern cannot be parsed or translated.
    #[error("E2002: untranslatable pattern '{pattern}': {reason}")]
    UntranslatablePattern { pattern: String, reason: String },

    /// E2003: Multi-route table is too small to be representative.
    #[error("E2003: multi-route table has {len} routes, at least {min} required")]
    TableTooSmall { len: usize, min: usize },

    /// E2004: The router under test rejected a route.
    #[error("E2004: {router} rejected {method} {pattern}: {reason}")]
    Registration {
        router: &'static str,
        method: String,
        pattern: String,
        reason: String,
    },

    /// E2005: Correctness gate failed.
    #[error("E2005: {router} answered {method} {target} with {actual}, expected {expected}")]
    RouteMismatch {
        router: &'static str,
        method: String,
        target: String,
        expected: String,
        actual: String,
    },

    /// E2006: Route text is not `METHOD /pattern`.
    #[error("E2006: invalid route '{0}', expected 'METHOD /pattern'")]
    InvalidRoute(String),
}

impl HarnessError {
    /// Stable error code, e.g. "E2001".
    pub fn code(&self) -> &'static str {
        match self {
            HarnessError::UnsupportedMethod(_) => "E2001",
            HarnessError::UntranslatablePattern { .. } => "E2002",
            HarnessError::TableTooSmall { .. } => "E2003",
            HarnessError::Registration { .. } => "E2004",
            HarnessError::RouteMismatch { .. } => "E2005",
            HarnessError::InvalidRoute(_) => "E2006",
        }
    }

    pub(crate) fn untranslatable(pattern: &str, reason: impl Into<String>) -> Self {
        HarnessError::UntranslatablePattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
