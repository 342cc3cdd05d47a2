//! Query input describing the running system

use serde::{Deserialize, Serialize};

use super::OperatingSystem;

/// One graphics adapter as reported by the platform probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterInfo {
    /// PCI vendor id, hex encoded (`"0x10de"`)
    pub vendor_id: String,
    /// Device id, hex encoded (`"0x1b80"`) or a free-form name on mobile
    pub device_id: String,
    /// Driver version in the platform's native format
    pub driver_version: String,
    /// Driver stack on Linux (`"mesa/radeonsi"`), empty elsewhere
    pub driver_vendor: String,
}

impl AdapterInfo {
    pub fn new(
        vendor_id: impl Into<String>,
        device_id: impl Into<String>,
        driver_version: impl Into<String>,
    ) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            device_id: device_id.into(),
            driver_version: driver_version.into(),
            driver_vendor: String::new(),
        }
    }

    pub fn with_driver_vendor(mut self, driver_vendor: impl Into<String>) -> Self {
        self.driver_vendor = driver_vendor.into();
        self
    }
}

/// Android build properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidDevice {
    pub model: String,
    pub product: String,
    pub manufacturer: String,
    pub hardware: String,
}

/// Hardware, driver and display fingerprint of the running system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemDescriptor {
    pub os: OperatingSystem,
    pub os_version: Option<String>,
    pub adapter: AdapterInfo,
    pub secondary_adapter: Option<AdapterInfo>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub has_battery: bool,
    pub window_protocol: String,
    /// One entry per monitor, in Hz
    pub refresh_rates: Vec<u32>,
    pub android: AndroidDevice,
}

impl SystemDescriptor {
    pub fn new(os: OperatingSystem) -> Self {
        Self {
            os,
            ..Self::default()
        }
    }

    pub fn with_os_version(mut self, version: impl Into<String>) -> Self {
        self.os_version = Some(version.into());
        self
    }

    pub fn with_adapter(mut self, adapter: AdapterInfo) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn with_secondary_adapter(mut self, adapter: AdapterInfo) -> Self {
        self.secondary_adapter = Some(adapter);
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_battery(mut self, has_battery: bool) -> Self {
        self.has_battery = has_battery;
        self
    }

    pub fn with_window_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.window_protocol = protocol.into();
        self
    }

    pub fn with_refresh_rate(mut self, hz: u32) -> Self {
        self.refresh_rates.push(hz);
        self
    }

    pub fn with_android(mut self, android: AndroidDevice) -> Self {
        self.android = android;
        self
    }

    /// Parse a descriptor from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
