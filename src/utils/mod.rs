//! Shared utilities and error types

pub mod error;

pub use error::{BlocklistError, ConfigError, GfxInfoError, Result, VersionParseError};
