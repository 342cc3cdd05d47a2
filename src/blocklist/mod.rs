//! Graphics feature blocklist
//!
//! A [`RuleTable`] holds [`Rule`]s in registration order. Queries are
//! first-match-wins: the first rule that applies to the feature, matches the
//! system and whose version or refresh rate condition holds decides the
//! status. Rule authors must therefore register specific exclusions before
//! the general rules they carve out of.

mod data;
mod rule;
mod table;

pub use data::builtin_rules;
pub use rule::{
    RateBound, RefreshRateCondition, Rule, RuleBuilder, RuleCondition, VersionCondition,
};
pub use table::RuleTable;

use serde::{Deserialize, Serialize};

use crate::system::SystemDescriptor;

/// Graphics capabilities that can be gated by the blocklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    Direct2d,
    Direct3d9Layers,
    Direct3d10Layers,
    Direct3d10_1Layers,
    Direct3d11Layers,
    Direct3d11Angle,
    HardwareVideoDecoding,
    OpenGlLayers,
    WebGlOpenGl,
    WebGlAngle,
    WebGl2,
    WebGlOutOfProcess,
    GpuProcess,
    WebRender,
    WebRenderCompositor,
    WebRenderSoftware,
    WebRenderPartialPresent,
    WebGpu,
    Canvas2dAcceleration,
    Vp8HwDecode,
    Vp9HwDecode,
    Av1HwDecode,
    H264HwDecode,
    DxInterop2,
    BackdropFilter,
}

const FEATURES: &[(Feature, &str)] = &[
    (Feature::Direct2d, "DIRECT2D"),
    (Feature::Direct3d9Layers, "DIRECT3D_9_LAYERS"),
    (Feature::Direct3d10Layers, "DIRECT3D_10_LAYERS"),
    (Feature::Direct3d10_1Layers, "DIRECT3D_10_1_LAYERS"),
    (Feature::Direct3d11Layers, "DIRECT3D_11_LAYERS"),
    (Feature::Direct3d11Angle, "DIRECT3D_11_ANGLE"),
    (Feature::HardwareVideoDecoding, "HARDWARE_VIDEO_DECODING"),
    (Feature::OpenGlLayers, "OPENGL_LAYERS"),
    (Feature::WebGlOpenGl, "WEBGL_OPENGL"),
    (Feature::WebGlAngle, "WEBGL_ANGLE"),
    (Feature::WebGl2, "WEBGL2"),
    (Feature::WebGlOutOfProcess, "ALLOW_WEBGL_OUT_OF_PROCESS"),
    (Feature::GpuProcess, "GPU_PROCESS"),
    (Feature::WebRender, "WEBRENDER"),
    (Feature::WebRenderCompositor, "WEBRENDER_COMPOSITOR"),
    (Feature::WebRenderSoftware, "WEBRENDER_SOFTWARE"),
    (Feature::WebRenderPartialPresent, "WEBRENDER_PARTIAL_PRESENT"),
    (Feature::WebGpu, "WEBGPU"),
    (Feature::Canvas2dAcceleration, "ACCELERATED_CANVAS2D"),
    (Feature::Vp8HwDecode, "VP8_HW_DECODE"),
    (Feature::Vp9HwDecode, "VP9_HW_DECODE"),
    (Feature::Av1HwDecode, "AV1_HW_DECODE"),
    (Feature::H264HwDecode, "H264_HW_DECODE"),
    (Feature::DxInterop2, "DX_INTEROP2"),
    (Feature::BackdropFilter, "BACKDROP_FILTER"),
];

impl Feature {
    pub fn all() -> impl Iterator<Item = Feature> {
        FEATURES.iter().map(|(feature, _)| *feature)
    }

    pub fn as_str(&self) -> &'static str {
        FEATURES
            .iter()
            .find(|(feature, _)| feature == self)
            .map(|(_, name)| *name)
            .unwrap_or("UNKNOWN")
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let name = s.strip_prefix("FEATURE_").unwrap_or(s);
        FEATURES
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name))
            .map(|(feature, _)| *feature)
    }

    /// Whether this feature is covered by [`FeatureSelector::Optional`] rules,
    /// i.e. only allowed on configurations the blocklist knows about.
    pub fn only_allowed_on_known_config(&self) -> bool {
        !matches!(
            self,
            // ANGLE mostly works, remote WebGL is needed regardless of
            // hardware support, and the rest have software fallbacks.
            Feature::GpuProcess
                | Feature::Direct3d11Angle
                | Feature::WebGlOutOfProcess
                | Feature::BackdropFilter
                | Feature::WebRenderSoftware
        )
    }
}

/// Which features a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureSelector {
    /// Every feature
    All,
    /// Features only allowed on known configurations
    Optional,
    Only(Feature),
}

impl FeatureSelector {
    pub fn applies_to(&self, feature: Feature) -> bool {
        match self {
            Self::All => true,
            Self::Optional => feature.only_allowed_on_known_config(),
            Self::Only(only) => *only == feature,
        }
    }
}

impl From<Feature> for FeatureSelector {
    fn from(feature: Feature) -> Self {
        Self::Only(feature)
    }
}

/// Verdict for a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureStatus {
    #[default]
    Unknown,
    Available,
    BlockedDriverVersion,
    BlockedDevice,
    Discouraged,
    BlockedOsVersion,
    BlockedMismatchedVersion,
    Denied,
    AllowAlways,
    AllowQualified,
    BlockedPlatformTest,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Available => "AVAILABLE",
            Self::BlockedDriverVersion => "BLOCKED_DRIVER_VERSION",
            Self::BlockedDevice => "BLOCKED_DEVICE",
            Self::Discouraged => "DISCOURAGED",
            Self::BlockedOsVersion => "BLOCKED_OS_VERSION",
            Self::BlockedMismatchedVersion => "BLOCKED_MISMATCHED_VERSION",
            Self::Denied => "DENIED",
            Self::AllowAlways => "ALLOW_ALWAYS",
            Self::AllowQualified => "ALLOW_QUALIFIED",
            Self::BlockedPlatformTest => "BLOCKED_PLATFORM_TEST",
        }
    }

    /// Whether the feature may be used
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            Self::Available | Self::AllowAlways | Self::AllowQualified
        )
    }
}

/// Result of a feature status query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureDecision {
    pub status: FeatureStatus,
    /// Driver version that fixes the problem, when one is known
    pub suggested_version: Option<String>,
    /// Id of the rule that decided, for diagnostics
    pub rule_id: Option<String>,
}

impl FeatureDecision {
    /// No rule had an opinion
    pub fn available() -> Self {
        Self {
            status: FeatureStatus::Available,
            suggested_version: None,
            rule_id: None,
        }
    }

    pub fn with_rule_id(status: FeatureStatus, rule_id: impl Into<String>) -> Self {
        Self {
            status,
            suggested_version: None,
            rule_id: Some(rule_id.into()),
        }
    }
}

/// Anything that can answer feature status queries
pub trait FeatureStatusProvider: Send + Sync {
    fn feature_status(&self, descriptor: &SystemDescriptor, feature: Feature) -> FeatureDecision;

    /// Status of every known feature
    fn all_feature_statuses(&self, descriptor: &SystemDescriptor) -> Vec<(Feature, FeatureDecision)> {
        Feature::all()
            .map(|feature| (feature, self.feature_status(descriptor, feature)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names() {
        assert_eq!(Feature::WebGlOpenGl.as_str(), "WEBGL_OPENGL");
        assert_eq!(Feature::from_str("FEATURE_WEBRENDER"), Some(Feature::WebRender));
        assert_eq!(Feature::from_str("webgl2"), Some(Feature::WebGl2));
        assert_eq!(Feature::from_str("TELEPORTATION"), None);
        for feature in Feature::all() {
            assert_eq!(Feature::from_str(feature.as_str()), Some(feature));
        }
    }

    #[test]
    fn test_feature_selector() {
        assert!(FeatureSelector::All.applies_to(Feature::Direct3d11Angle));
        assert!(FeatureSelector::Optional.applies_to(Feature::WebRender));
        assert!(!FeatureSelector::Optional.applies_to(Feature::Direct3d11Angle));
        assert!(FeatureSelector::from(Feature::WebGl2).applies_to(Feature::WebGl2));
        assert!(!FeatureSelector::from(Feature::WebGl2).applies_to(Feature::WebGlAngle));
    }

    #[test]
    fn test_status_allowed() {
        assert!(FeatureStatus::Available.is_allowed());
        assert!(FeatureStatus::AllowQualified.is_allowed());
        assert!(!FeatureStatus::BlockedDevice.is_allowed());
        assert!(!FeatureStatus::Unknown.is_allowed());
    }

    #[test]
    fn test_decision_serializes_status_name() {
        let decision = FeatureDecision::with_rule_id(FeatureStatus::BlockedDevice, "FEATURE_FAILURE_X");
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains("\"BLOCKED_DEVICE\""));
        assert!(json.contains("FEATURE_FAILURE_X"));
    }
}
