//! Operating system, screen, battery and refresh rate classifications

use serde::{Deserialize, Serialize};

/// Operating systems known to the blocklist
///
/// `All` only makes sense on the rule side. `Windows` and `MacOs` are
/// families: as a rule value they match every release in the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperatingSystem {
    All,
    #[default]
    Unknown,
    Windows,
    Windows7,
    Windows8,
    Windows8_1,
    Windows10,
    Windows11,
    Linux,
    MacOs,
    MacOs10_15,
    MacOs11,
    MacOs12,
    MacOs13,
    MacOs14,
    Android,
    Ios,
}

const OPERATING_SYSTEMS: &[(OperatingSystem, &str)] = &[
    (OperatingSystem::All, "All"),
    (OperatingSystem::Unknown, "Unknown"),
    (OperatingSystem::Windows, "Windows"),
    (OperatingSystem::Windows7, "Windows 7"),
    (OperatingSystem::Windows8, "Windows 8"),
    (OperatingSystem::Windows8_1, "Windows 8.1"),
    (OperatingSystem::Windows10, "Windows 10"),
    (OperatingSystem::Windows11, "Windows 11"),
    (OperatingSystem::Linux, "Linux"),
    (OperatingSystem::MacOs, "macOS"),
    (OperatingSystem::MacOs10_15, "macOS 10.15"),
    (OperatingSystem::MacOs11, "macOS 11"),
    (OperatingSystem::MacOs12, "macOS 12"),
    (OperatingSystem::MacOs13, "macOS 13"),
    (OperatingSystem::MacOs14, "macOS 14"),
    (OperatingSystem::Android, "Android"),
    (OperatingSystem::Ios, "iOS"),
];

impl OperatingSystem {
    pub fn as_str(&self) -> &'static str {
        OPERATING_SYSTEMS
            .iter()
            .find(|(os, _)| os == self)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown")
    }

    /// Parse a display name (`"Windows 10"`) or variant name (`"Windows10"`)
    pub fn from_str(s: &str) -> Option<Self> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        OPERATING_SYSTEMS.iter().map(|(os, _)| *os).find(|os| {
            let name: String = os.as_str().chars().filter(|c| !c.is_whitespace()).collect();
            name.eq_ignore_ascii_case(&wanted)
                || format!("{:?}", os).eq_ignore_ascii_case(&wanted)
        })
    }

    pub fn is_windows(&self) -> bool {
        matches!(
            self,
            Self::Windows
                | Self::Windows7
                | Self::Windows8
                | Self::Windows8_1
                | Self::Windows10
                | Self::Windows11
        )
    }

    pub fn is_macos(&self) -> bool {
        matches!(
            self,
            Self::MacOs
                | Self::MacOs10_15
                | Self::MacOs11
                | Self::MacOs12
                | Self::MacOs13
                | Self::MacOs14
        )
    }

    /// Check the system's OS against this rule value
    pub fn matches(&self, system: OperatingSystem) -> bool {
        match self {
            Self::All => true,
            Self::Windows => system.is_windows(),
            Self::MacOs => system.is_macos(),
            _ => *self == system,
        }
    }
}

/// Screen size classes, by total pixel count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenSizeStatus {
    #[default]
    All,
    /// <= 1900x1200
    Small,
    /// <= 3440x1440
    SmallAndMedium,
    /// <= 3440x1440 && > 1900x1200
    Medium,
    /// > 1900x1200
    MediumAndLarge,
    /// > 3440x1440
    Large,
}

const SMALL_SCREEN_PIXELS: u64 = 1900 * 1200;
const MEDIUM_SCREEN_PIXELS: u64 = 3440 * 1440;

impl ScreenSizeStatus {
    /// Classes overlap, so this is a predicate rather than a classification
    pub fn matches(&self, width: u32, height: u32) -> bool {
        let pixels = u64::from(width) * u64::from(height);
        match self {
            Self::All => true,
            Self::Small => pixels <= SMALL_SCREEN_PIXELS,
            Self::SmallAndMedium => pixels <= MEDIUM_SCREEN_PIXELS,
            Self::Medium => pixels > SMALL_SCREEN_PIXELS && pixels <= MEDIUM_SCREEN_PIXELS,
            Self::MediumAndLarge => pixels > SMALL_SCREEN_PIXELS,
            Self::Large => pixels > MEDIUM_SCREEN_PIXELS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BatteryStatus {
    #[default]
    All,
    Present,
    None,
}

impl BatteryStatus {
    pub fn matches(&self, has_battery: bool) -> bool {
        match self {
            Self::All => true,
            Self::Present => has_battery,
            Self::None => !has_battery,
        }
    }
}

/// How the refresh rates of multiple monitors relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RefreshRateStatus {
    /// Any monitor configuration
    #[default]
    Any,
    /// Every monitor runs at the same rate
    AnySame,
    /// Monitors run at different rates
    Mixed,
}

impl RefreshRateStatus {
    pub fn matches(&self, rates: &[u32]) -> bool {
        let mixed = rates.windows(2).any(|pair| pair[0] != pair[1]);
        match self {
            Self::Any => true,
            Self::AnySame => !mixed,
            Self::Mixed => mixed,
        }
    }
}
