//! Named device families and their shared registry
//!
//! Every family resolves to one immutable [`DeviceSet`], built on first use
//! and shared by all rules that reference it.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use super::{DeviceSet, DeviceVendor};

/// Reusable groups of graphics devices referenced by blocklist rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceFamily {
    All,
    IntelAll,
    NvidiaAll,
    AtiAll,
    MicrosoftAll,
    ParallelsAll,
    QualcommAll,
    AppleAll,
    AmazonAll,
    IntelGma500,
    IntelGma900,
    IntelGma950,
    IntelGma3150,
    IntelGmaX3000,
    IntelGmaX4500Hd,
    IntelHdGraphicsToIvyBridge,
    IntelHdGraphicsToSandyBridge,
    IntelHaswell,
    IntelSandyBridge,
    IntelGen7Baytrail,
    IntelSkylake,
    IntelKabyLake,
    IntelHd520,
    IntelMobileHdGraphics,
    IntelMeteorLake,
    IntelArrowLake,
    IntelGen12,
    NvidiaBlockD3d9Layers,
    RadeonX1000,
    RadeonCaicos,
    RadeonBlockZeroVideoCopy,
    Geforce7300Gt,
    Nvidia310M,
    Nvidia8800Gts,
    NvidiaPascal,
    Bug1137716,
    Bug1116812,
    Bug1155608,
    Bug1207665,
    Bug1447141,
    AmdR600,
    IntelWebRenderBlocked,
    NvidiaWebRenderBlocked,
}

/// `(family, name, vendor)`
const DEVICE_FAMILIES: &[(DeviceFamily, &str, DeviceVendor)] = &[
    (DeviceFamily::All, "All", DeviceVendor::All),
    (DeviceFamily::IntelAll, "IntelAll", DeviceVendor::Intel),
    (DeviceFamily::NvidiaAll, "NvidiaAll", DeviceVendor::Nvidia),
    (DeviceFamily::AtiAll, "AtiAll", DeviceVendor::Ati),
    (DeviceFamily::MicrosoftAll, "MicrosoftAll", DeviceVendor::Microsoft),
    (DeviceFamily::ParallelsAll, "ParallelsAll", DeviceVendor::Parallels),
    (DeviceFamily::QualcommAll, "QualcommAll", DeviceVendor::Qualcomm),
    (DeviceFamily::AppleAll, "AppleAll", DeviceVendor::Apple),
    (DeviceFamily::AmazonAll, "AmazonAll", DeviceVendor::Amazon),
    (DeviceFamily::IntelGma500, "IntelGMA500", DeviceVendor::Intel),
    (DeviceFamily::IntelGma900, "IntelGMA900", DeviceVendor::Intel),
    (DeviceFamily::IntelGma950, "IntelGMA950", DeviceVendor::Intel),
    (DeviceFamily::IntelGma3150, "IntelGMA3150", DeviceVendor::Intel),
    (DeviceFamily::IntelGmaX3000, "IntelGMAX3000", DeviceVendor::Intel),
    (DeviceFamily::IntelGmaX4500Hd, "IntelGMAX4500HD", DeviceVendor::Intel),
    (DeviceFamily::IntelHdGraphicsToIvyBridge, "IntelHDGraphicsToIvyBridge", DeviceVendor::Intel),
    (DeviceFamily::IntelHdGraphicsToSandyBridge, "IntelHDGraphicsToSandyBridge", DeviceVendor::Intel),
    (DeviceFamily::IntelHaswell, "IntelHaswell", DeviceVendor::Intel),
    (DeviceFamily::IntelSandyBridge, "IntelSandyBridge", DeviceVendor::Intel),
    (DeviceFamily::IntelGen7Baytrail, "IntelGen7Baytrail", DeviceVendor::Intel),
    (DeviceFamily::IntelSkylake, "IntelSkylake", DeviceVendor::Intel),
    (DeviceFamily::IntelKabyLake, "IntelKabyLake", DeviceVendor::Intel),
    (DeviceFamily::IntelHd520, "IntelHD520", DeviceVendor::Intel),
    (DeviceFamily::IntelMobileHdGraphics, "IntelMobileHDGraphics", DeviceVendor::Intel),
    (DeviceFamily::IntelMeteorLake, "IntelMeteorLake", DeviceVendor::Intel),
    (DeviceFamily::IntelArrowLake, "IntelArrowLake", DeviceVendor::Intel),
    (DeviceFamily::IntelGen12, "IntelGen12", DeviceVendor::Intel),
    (DeviceFamily::NvidiaBlockD3d9Layers, "NvidiaBlockD3D9Layers", DeviceVendor::Nvidia),
    (DeviceFamily::RadeonX1000, "RadeonX1000", DeviceVendor::Ati),
    (DeviceFamily::RadeonCaicos, "RadeonCaicos", DeviceVendor::Ati),
    (DeviceFamily::RadeonBlockZeroVideoCopy, "RadeonBlockZeroVideoCopy", DeviceVendor::Ati),
    (DeviceFamily::Geforce7300Gt, "Geforce7300GT", DeviceVendor::Nvidia),
    (DeviceFamily::Nvidia310M, "Nvidia310M", DeviceVendor::Nvidia),
    (DeviceFamily::Nvidia8800Gts, "Nvidia8800GTS", DeviceVendor::Nvidia),
    (DeviceFamily::NvidiaPascal, "NvidiaPascal", DeviceVendor::Nvidia),
    (DeviceFamily::Bug1137716, "Bug1137716", DeviceVendor::Nvidia),
    (DeviceFamily::Bug1116812, "Bug1116812", DeviceVendor::Intel),
    (DeviceFamily::Bug1155608, "Bug1155608", DeviceVendor::Intel),
    (DeviceFamily::Bug1207665, "Bug1207665", DeviceVendor::Intel),
    (DeviceFamily::Bug1447141, "Bug1447141", DeviceVendor::Ati),
    (DeviceFamily::AmdR600, "AmdR600", DeviceVendor::Ati),
    (DeviceFamily::IntelWebRenderBlocked, "IntelWebRenderBlocked", DeviceVendor::Intel),
    (DeviceFamily::NvidiaWebRenderBlocked, "NvidiaWebRenderBlocked", DeviceVendor::Nvidia),
];

static REGISTRY: LazyLock<HashMap<DeviceFamily, Arc<DeviceSet>>> = LazyLock::new(|| {
    let registry: HashMap<_, _> = DEVICE_FAMILIES
        .iter()
        .map(|(family, _, _)| (*family, Arc::new(family_devices(*family))))
        .collect();
    log::debug!("Device family registry built with {} families", registry.len());
    registry
});

impl DeviceFamily {
    pub fn all() -> impl Iterator<Item = DeviceFamily> {
        DEVICE_FAMILIES.iter().map(|(family, _, _)| *family)
    }

    fn entry(&self) -> &'static (DeviceFamily, &'static str, DeviceVendor) {
        DEVICE_FAMILIES
            .iter()
            .find(|(family, _, _)| family == self)
            .unwrap_or(&DEVICE_FAMILIES[0])
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    pub fn from_str(s: &str) -> Option<Self> {
        DEVICE_FAMILIES
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|(family, _, _)| *family)
    }

    /// The single vendor every device in this family belongs to
    pub fn vendor(&self) -> DeviceVendor {
        self.entry().2
    }

    /// Shared device set for this family; empty means every device of
    /// [`vendor`](Self::vendor)
    pub fn devices(&self) -> Arc<DeviceSet> {
        REGISTRY
            .get(self)
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::new(family_devices(*self)))
    }
}

fn ids(ids: &[&str]) -> DeviceSet {
    DeviceSet::from_ids(ids.iter().copied())
}

fn family_devices(family: DeviceFamily) -> DeviceSet {
    use DeviceFamily::*;

    match family {
        All | IntelAll | NvidiaAll | AtiAll | MicrosoftAll | ParallelsAll | QualcommAll
        | AppleAll | AmazonAll => DeviceSet::new(),
        IntelGma500 => ids(&["0x8108", "0x8109"]),
        IntelGma900 => ids(&["0x2582", "0x2782", "0x2592", "0x2792"]),
        IntelGma950 => ids(&["0x2772", "0x2776", "0x27a2", "0x27a6", "0x27ae"]),
        IntelGma3150 | Bug1207665 => ids(&["0xa001", "0xa002", "0xa011", "0xa012"]),
        IntelGmaX3000 => ids(&[
            "0x2972", "0x2973", "0x2992", "0x2993", "0x29a2", "0x29a3", "0x29b2", "0x29b3",
            "0x29c2", "0x29c3", "0x29d2", "0x29d3", "0x2a02", "0x2a03", "0x2a12", "0x2a13",
        ]),
        IntelGmaX4500Hd => ids(INTEL_GMA_X4500HD),
        IntelSandyBridge => ids(INTEL_SANDY_BRIDGE),
        IntelHdGraphicsToSandyBridge => {
            let mut set = ids(INTEL_GMA_X4500HD);
            for id in INTEL_IRONLAKE.iter().chain(INTEL_SANDY_BRIDGE) {
                set.append(*id);
            }
            set
        }
        IntelHdGraphicsToIvyBridge => {
            let mut set = ids(INTEL_GMA_X4500HD);
            for id in INTEL_IRONLAKE
                .iter()
                .chain(INTEL_SANDY_BRIDGE)
                .chain(INTEL_IVY_BRIDGE)
            {
                set.append(*id);
            }
            set
        }
        IntelHaswell => ids(&[
            "0x0402", "0x0406", "0x040a", "0x0412", "0x0416", "0x041a", "0x041b", "0x041e",
            "0x0a02", "0x0a06", "0x0a0e", "0x0a16", "0x0a1e", "0x0a22", "0x0a26", "0x0a2e",
            "0x0d22", "0x0d26", "0x0d2b",
        ]),
        IntelGen7Baytrail => ids(&["0x0f30", "0x0f31", "0x0f32", "0x0f33", "0x0157", "0x0155"]),
        IntelSkylake => ids(&[
            "0x1902", "0x1906", "0x190b", "0x1912", "0x1916", "0x191b", "0x191d", "0x191e",
            "0x1921", "0x1923", "0x1926", "0x1927", "0x192b", "0x192d", "0x1932", "0x193a",
            "0x193b", "0x193d",
        ]),
        IntelKabyLake => ids(&[
            "0x5902", "0x5906", "0x5912", "0x5916", "0x5917", "0x591b", "0x591c", "0x591d",
            "0x591e", "0x5921", "0x5923", "0x5926", "0x5927", "0x593b", "0x87c0", "0x3e91",
            "0x3e92", "0x3e9b",
        ]),
        IntelHd520 => ids(&["0x1916"]),
        IntelMobileHdGraphics => ids(&["0x0046"]),
        IntelMeteorLake => ids(&["0x7d40", "0x7d45", "0x7d55", "0x7d60", "0x7dd5"]),
        IntelArrowLake => ids(&["0x7d41", "0x7d51", "0x7d67", "0x7dd1"]),
        IntelGen12 => DeviceSet::new()
            .with_range(0x4c80, 0x4c9a)
            .with_range(0x9a40, 0x9a78)
            .with_range(0x4905, 0x4908),
        NvidiaBlockD3d9Layers => ids(&[
            "0x00f3", "0x0146", "0x014f", "0x0161", "0x0163", "0x0164", "0x0167", "0x0168",
            "0x0169", "0x0222", "0x0240", "0x0241", "0x0244", "0x0245", "0x0247", "0x03d0",
            "0x03d1", "0x03d2", "0x03d5", "0x03d6", "0x0531", "0x0533", "0x053a", "0x053b",
            "0x053e",
        ]),
        RadeonX1000 => ids(&[
            "0x7187", "0x7210", "0x71de", "0x7146", "0x7142", "0x7109", "0x71c5", "0x71c0",
            "0x7240", "0x7249", "0x7291",
        ]),
        RadeonCaicos => ids(&[
            "0x6766", "0x6767", "0x6768", "0x6770", "0x6771", "0x6772", "0x6778", "0x6779",
            "0x677b",
        ]),
        RadeonBlockZeroVideoCopy => DeviceSet::new()
            .with_range(0x6920, 0x6939)
            .with_range(0x7300, 0x730f),
        Geforce7300Gt => ids(&["0x0393"]),
        Nvidia310M => ids(&["0x0a70"]),
        Nvidia8800Gts => ids(&["0x0193"]),
        NvidiaPascal => DeviceSet::new()
            .with_range(0x15f0, 0x15ff)
            .with_range(0x1b00, 0x1d7f),
        Bug1137716 => ids(&[
            "0x0a29", "0x0a2b", "0x0a2d", "0x0a35", "0x0a6c", "0x0a70", "0x0a72", "0x0a7a",
            "0x0caf", "0x0dd2", "0x0dd3",
        ]),
        Bug1116812 => ids(&["0x2e32", "0x2a02"]),
        Bug1155608 => ids(&["0x2e22"]),
        Bug1447141 => ids(&["0x9991", "0x9993", "0x9996", "0x9998", "0x9901", "0x990b"]),
        AmdR600 => DeviceSet::new()
            .with_range(0x9400, 0x9504)
            .with_range(0x9506, 0x95cf)
            .with_range(0x9610, 0x9616),
        IntelWebRenderBlocked => {
            let mut set = ids(INTEL_GMA_X4500HD);
            for id in INTEL_IRONLAKE {
                set.append(*id);
            }
            set
        }
        NvidiaWebRenderBlocked => DeviceSet::new()
            .with_range(0x6c0, 0x6ff)
            .with_range(0xdc0, 0xdff)
            .with_range(0xe20, 0xe3f)
            .with_range(0x1080, 0x109f),
    }
}

const INTEL_GMA_X4500HD: &[&str] = &[
    "0x2a42", "0x2a43", "0x2e42", "0x2e43", "0x2e92", "0x2e93", "0x2e32", "0x2e33", "0x2e22",
    "0x2e23", "0x2e12", "0x2e13",
];

const INTEL_IRONLAKE: &[&str] = &["0x0042", "0x0046"];

const INTEL_SANDY_BRIDGE: &[&str] = &[
    "0x0102", "0x0106", "0x0112", "0x0116", "0x0122", "0x0126", "0x010a",
];

const INTEL_IVY_BRIDGE: &[&str] = &["0x0152", "0x0156", "0x015a", "0x0162", "0x0166", "0x016a"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_wide_families_are_empty() {
        assert!(DeviceFamily::All.devices().is_empty());
        assert!(DeviceFamily::NvidiaAll.devices().is_empty());
        assert_eq!(DeviceFamily::NvidiaAll.vendor(), DeviceVendor::Nvidia);
        assert_eq!(DeviceFamily::All.vendor(), DeviceVendor::All);
    }

    #[test]
    fn test_family_sets_are_shared() {
        let a = DeviceFamily::IntelHaswell.devices();
        let b = DeviceFamily::IntelHaswell.devices();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_family_membership() {
        assert!(DeviceFamily::IntelHdGraphicsToIvyBridge.devices().contains("0x0166"));
        assert!(DeviceFamily::IntelHdGraphicsToIvyBridge.devices().contains("0x2A42"));
        assert!(!DeviceFamily::IntelHdGraphicsToSandyBridge.devices().contains("0x0166"));
        assert!(DeviceFamily::NvidiaPascal.devices().contains("0x1b80"));
        assert!(!DeviceFamily::NvidiaPascal.devices().contains("0x1e04"));
        assert!(!DeviceFamily::AmdR600.devices().contains("0x9505"));
    }

    #[test]
    fn test_every_family_has_a_name() {
        for family in DeviceFamily::all() {
            assert_eq!(DeviceFamily::from_str(family.as_str()), Some(family));
        }
    }

    #[test]
    fn test_named_families_are_not_wildcards() {
        let vendor_wide = [
            DeviceFamily::All,
            DeviceFamily::IntelAll,
            DeviceFamily::NvidiaAll,
            DeviceFamily::AtiAll,
            DeviceFamily::MicrosoftAll,
            DeviceFamily::ParallelsAll,
            DeviceFamily::QualcommAll,
            DeviceFamily::AppleAll,
            DeviceFamily::AmazonAll,
        ];
        for family in DeviceFamily::all().filter(|f| !vendor_wide.contains(f)) {
            assert!(!family.devices().is_empty(), "{} is empty", family.as_str());
        }
    }
}
