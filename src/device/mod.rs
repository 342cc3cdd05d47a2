//! Graphics hardware identification
//!
//! Implements the device-side match predicates:
//! - Adapter vendors (PCI vendor ids)
//! - Driver vendors (Mesa and proprietary stacks)
//! - Window protocols
//! - Device sets and the shared device family registry

mod family;
mod set;
mod vendor;

pub use family::DeviceFamily;
pub use set::{DeviceRange, DeviceSet};
pub use vendor::{DeviceVendor, DriverVendor, WindowProtocol};
