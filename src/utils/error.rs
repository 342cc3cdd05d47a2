//! Error types for the Binix graphics blocklist

use thiserror::Error;

use crate::version::VersionComparisonOp;

/// Main error type for blocklist operations
#[derive(Debug, Error)]
pub enum GfxInfoError {
    /// Version string could not be parsed
    #[error("Version error: {0}")]
    Version(#[from] VersionParseError),
    /// Rule table construction failed
    #[error("Blocklist error: {0}")]
    Blocklist(#[from] BlocklistError),
    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Malformed driver or OS version strings
///
/// Recoverable: callers treat the version as unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("empty version string")]
    Empty,
    #[error("version has {count} components, at most 4 are allowed")]
    TooManyComponents { count: usize },
    #[error("component {index} ({component:?}) is not numeric")]
    NonNumeric { index: usize, component: String },
    #[error("component {index} ({component:?}) exceeds 0xffff")]
    OutOfRange { index: usize, component: String },
}

/// Invariant violations in rule definitions
///
/// These come from the compiled-in data set, so they are programmer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlocklistError {
    #[error("rule {rule_id}: {op:?} requires an upper bound")]
    MissingMaximum {
        rule_id: String,
        op: VersionComparisonOp,
    },
    #[error("rule {rule_id}: {op:?} does not take an upper bound")]
    UnexpectedMaximum {
        rule_id: String,
        op: VersionComparisonOp,
    },
    #[error("rule {rule_id}: invalid version literal {literal:?}: {source}")]
    InvalidVersion {
        rule_id: String,
        literal: String,
        #[source]
        source: VersionParseError,
    },
}

/// Invalid configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type for blocklist operations
pub type Result<T> = std::result::Result<T, GfxInfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_converts() {
        let err: GfxInfoError = VersionParseError::Empty.into();
        assert_eq!(err.to_string(), "Version error: empty version string");
    }

    #[test]
    fn test_blocklist_error_message_names_rule() {
        let err = BlocklistError::MissingMaximum {
            rule_id: "FEATURE_FAILURE_TEST".to_string(),
            op: VersionComparisonOp::BetweenInclusive,
        };
        assert!(err.to_string().contains("FEATURE_FAILURE_TEST"));
    }
}
