//! # Binix GfxInfo - GPU driver compatibility and feature blocklist
//!
//! Decides which graphics features (WebRender, WebGL, hardware video
//! decoding, ...) may be used on a given GPU, driver and operating system.
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - **version**: four-part driver versions and comparison operators
//! - **device**: vendors, driver vendors, window protocols, device families
//! - **system**: the system descriptor a query is made for
//! - **blocklist**: rules, the first-match-wins rule table, built-in data
//! - **engine**: configuration-aware front end and the probing seam
//! - **config**: blocklist mode, version format and spoofing settings
//! - **utils**: shared error types

pub mod blocklist;
pub mod config;
pub mod device;
pub mod engine;
pub mod system;
pub mod utils;
pub mod version;

// Re-export main types for convenience
pub use blocklist::{
    Feature, FeatureDecision, FeatureSelector, FeatureStatus, FeatureStatusProvider, Rule,
    RuleTable,
};
pub use config::{BlocklistConfig, BlocklistMode};
pub use device::{DeviceFamily, DeviceSet, DeviceVendor};
pub use engine::{GfxInfo, StaticProbe, SystemProbe};
pub use system::{AdapterInfo, OperatingSystem, SystemDescriptor};
pub use utils::error::{GfxInfoError, Result};
pub use version::{DriverVersionFormat, VersionComparisonOp, VersionTuple};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Binix GfxInfo";
