//! Vendor, driver vendor and window protocol identifiers

use serde::{Deserialize, Serialize};

/// GPU adapter vendors, identified by PCI vendor id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceVendor {
    /// Matches any vendor
    All,
    Intel,
    Nvidia,
    Ati,
    Microsoft,
    MicrosoftBasic,
    MicrosoftHyperV,
    Parallels,
    VmWare,
    VirtualBox,
    Apple,
    Amazon,
    Qualcomm,
}

/// `(vendor, name, PCI vendor id)`
const DEVICE_VENDORS: &[(DeviceVendor, &str, &str)] = &[
    (DeviceVendor::All, "All", ""),
    (DeviceVendor::Intel, "Intel", "0x8086"),
    (DeviceVendor::Nvidia, "NVIDIA", "0x10de"),
    (DeviceVendor::Ati, "ATI", "0x1002"),
    (DeviceVendor::Microsoft, "Microsoft", "0x1414"),
    (DeviceVendor::MicrosoftBasic, "MicrosoftBasic", "0x00ba"),
    (DeviceVendor::MicrosoftHyperV, "MicrosoftHyperV", "0x000b"),
    (DeviceVendor::Parallels, "Parallels", "0x1ab8"),
    (DeviceVendor::VmWare, "VMWare", "0x15ad"),
    (DeviceVendor::VirtualBox, "VirtualBox", "0x80ee"),
    (DeviceVendor::Apple, "Apple", "0x106b"),
    (DeviceVendor::Amazon, "Amazon", "0x1d0f"),
    (DeviceVendor::Qualcomm, "Qualcomm", "0x5143"),
];

impl DeviceVendor {
    fn entry(&self) -> &'static (DeviceVendor, &'static str, &'static str) {
        DEVICE_VENDORS
            .iter()
            .find(|(vendor, _, _)| vendor == self)
            .unwrap_or(&DEVICE_VENDORS[0])
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// PCI vendor id, empty for [`DeviceVendor::All`]
    pub fn id(&self) -> &'static str {
        self.entry().2
    }

    pub fn from_str(s: &str) -> Option<Self> {
        DEVICE_VENDORS
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|(vendor, _, _)| *vendor)
    }

    /// Look up a vendor by PCI vendor id (e.g. `"0x10de"`)
    pub fn from_id(id: &str) -> Option<Self> {
        DEVICE_VENDORS
            .iter()
            .skip(1)
            .find(|(_, _, vendor_id)| vendor_id.eq_ignore_ascii_case(id))
            .map(|(vendor, _, _)| *vendor)
    }

    pub fn matches(&self, vendor_id: &str) -> bool {
        *self == Self::All || self.id().eq_ignore_ascii_case(vendor_id)
    }
}

/// Driver stacks, as reported by the Linux probe (`mesa/<driver>` for Mesa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverVendor {
    /// Matches any driver vendor
    All,
    MesaAll,
    MesaLlvmPipe,
    MesaSoftPipe,
    MesaSwRast,
    MesaSwUnknown,
    MesaUnknown,
    MesaR600,
    MesaNouveau,
    MesaVm,
    NonMesaAll,
    HardwareMesaAll,
    SoftwareMesaAll,
}

const DRIVER_VENDORS: &[(DriverVendor, &str)] = &[
    (DriverVendor::All, ""),
    (DriverVendor::MesaAll, "mesa/all"),
    (DriverVendor::MesaLlvmPipe, "mesa/llvmpipe"),
    (DriverVendor::MesaSoftPipe, "mesa/softpipe"),
    (DriverVendor::MesaSwRast, "mesa/swrast"),
    (DriverVendor::MesaSwUnknown, "mesa/software-unknown"),
    (DriverVendor::MesaUnknown, "mesa/unknown"),
    (DriverVendor::MesaR600, "mesa/r600"),
    (DriverVendor::MesaNouveau, "mesa/nouveau"),
    (DriverVendor::MesaVm, "mesa/vmwgfx"),
    (DriverVendor::NonMesaAll, "non-mesa/all"),
    (DriverVendor::HardwareMesaAll, "mesa/hw-all"),
    (DriverVendor::SoftwareMesaAll, "mesa/sw-all"),
];

const SOFTWARE_MESA: &[DriverVendor] = &[
    DriverVendor::MesaLlvmPipe,
    DriverVendor::MesaSoftPipe,
    DriverVendor::MesaSwRast,
    DriverVendor::MesaSwUnknown,
];

impl DriverVendor {
    pub fn as_str(&self) -> &'static str {
        DRIVER_VENDORS
            .iter()
            .find(|(vendor, _)| vendor == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    pub fn from_str(s: &str) -> Option<Self> {
        DRIVER_VENDORS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(vendor, _)| *vendor)
    }

    /// Check a reported driver vendor string against this rule value
    pub fn matches(&self, driver_vendor: &str) -> bool {
        let is_mesa = driver_vendor
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("mesa/"));
        let is_software = SOFTWARE_MESA
            .iter()
            .any(|vendor| vendor.as_str().eq_ignore_ascii_case(driver_vendor));

        match self {
            Self::All => true,
            Self::MesaAll => is_mesa,
            Self::NonMesaAll => !driver_vendor.is_empty() && !is_mesa,
            Self::SoftwareMesaAll => is_software,
            Self::HardwareMesaAll => is_mesa && !is_software,
            _ => self.as_str().eq_ignore_ascii_case(driver_vendor),
        }
    }
}

/// Windowing protocols on Linux
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowProtocol {
    /// Matches any protocol
    All,
    X11,
    XWayland,
    Wayland,
    WaylandDrm,
    /// X11 or XWayland
    X11All,
    /// Wayland or Wayland DRM
    WaylandAll,
}

const WINDOW_PROTOCOLS: &[(WindowProtocol, &str)] = &[
    (WindowProtocol::All, ""),
    (WindowProtocol::X11, "x11"),
    (WindowProtocol::XWayland, "xwayland"),
    (WindowProtocol::Wayland, "wayland"),
    (WindowProtocol::WaylandDrm, "wayland/drm"),
    (WindowProtocol::X11All, "x11/all"),
    (WindowProtocol::WaylandAll, "wayland/all"),
];

impl WindowProtocol {
    pub fn as_str(&self) -> &'static str {
        WINDOW_PROTOCOLS
            .iter()
            .find(|(protocol, _)| protocol == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    pub fn from_str(s: &str) -> Option<Self> {
        WINDOW_PROTOCOLS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(protocol, _)| *protocol)
    }

    /// Check a reported protocol name against this rule value
    pub fn matches(&self, protocol: &str) -> bool {
        match self {
            Self::All => true,
            Self::X11All => {
                Self::X11.matches(protocol) || Self::XWayland.matches(protocol)
            }
            Self::WaylandAll => {
                Self::Wayland.matches(protocol) || Self::WaylandDrm.matches(protocol)
            }
            _ => self.as_str().eq_ignore_ascii_case(protocol),
        }
    }
}
