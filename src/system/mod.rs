//! Description of the system a blocklist query is made for
//!
//! Platform probing code fills a [`SystemDescriptor`]; the match predicates
//! used by rules live alongside the platform enums.

mod descriptor;
mod platform;

pub use descriptor::{AdapterInfo, AndroidDevice, SystemDescriptor};
pub use platform::{BatteryStatus, OperatingSystem, RefreshRateStatus, ScreenSizeStatus};
