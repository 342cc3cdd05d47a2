//! A single blocklist entry

use std::sync::Arc;

use super::{Feature, FeatureSelector, FeatureStatus};
use crate::device::{DeviceFamily, DeviceSet, DeviceVendor, DriverVendor, WindowProtocol};
use crate::system::{
    AdapterInfo, AndroidDevice, BatteryStatus, OperatingSystem, RefreshRateStatus,
    ScreenSizeStatus, SystemDescriptor,
};
use crate::utils::BlocklistError;
use crate::version::{DriverVersionFormat, VersionComparisonOp, VersionTuple};

/// Version bound(s) and the operator comparing against them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionCondition {
    pub op: VersionComparisonOp,
    pub min: VersionTuple,
    pub max: Option<VersionTuple>,
}

impl VersionCondition {
    /// Condition that holds for every version, known or not
    pub const IGNORED: Self = Self {
        op: VersionComparisonOp::ComparisonIgnored,
        min: VersionTuple::new(0, 0, 0, 0),
        max: None,
    };

    pub fn new(op: VersionComparisonOp, bound: VersionTuple) -> Self {
        Self {
            op,
            min: bound,
            max: None,
        }
    }

    pub fn range(op: VersionComparisonOp, min: VersionTuple, max: VersionTuple) -> Self {
        Self {
            op,
            min,
            max: Some(max),
        }
    }

    /// Unknown versions only satisfy [`VersionComparisonOp::ComparisonIgnored`]
    pub fn holds(&self, observed: Option<&VersionTuple>) -> bool {
        if self.op == VersionComparisonOp::ComparisonIgnored {
            return true;
        }
        match observed {
            Some(version) => version.compare_with_op(&self.min, self.max.as_ref(), self.op),
            None => false,
        }
    }

    fn validate(&self, rule_id: &str) -> Result<(), BlocklistError> {
        validate_bounds(rule_id, self.op, self.max.is_some())
    }
}

/// One side of a refresh rate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBound {
    pub op: VersionComparisonOp,
    pub bound: u32,
    pub bound_max: Option<u32>,
}

impl RateBound {
    pub const IGNORED: Self = Self {
        op: VersionComparisonOp::ComparisonIgnored,
        bound: 0,
        bound_max: None,
    };

    pub fn new(op: VersionComparisonOp, bound: u32) -> Self {
        Self {
            op,
            bound,
            bound_max: None,
        }
    }

    pub fn range(op: VersionComparisonOp, bound: u32, bound_max: u32) -> Self {
        Self {
            op,
            bound,
            bound_max: Some(bound_max),
        }
    }

    pub fn holds(&self, rate: u32) -> bool {
        self.op.evaluate(&rate, &self.bound, self.bound_max.as_ref())
    }
}

/// Refresh rate band: the lowest monitor rate is checked against `min`, the
/// highest against `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRateCondition {
    pub status: RefreshRateStatus,
    pub min: RateBound,
    pub max: RateBound,
}

impl RefreshRateCondition {
    /// Systems without a reported refresh rate never hold
    pub fn holds(&self, rates: &[u32]) -> bool {
        let (Some(lowest), Some(highest)) = (rates.iter().min(), rates.iter().max()) else {
            return false;
        };
        self.status.matches(rates) && self.min.holds(*lowest) && self.max.holds(*highest)
    }

    fn validate(&self, rule_id: &str) -> Result<(), BlocklistError> {
        validate_bounds(rule_id, self.min.op, self.min.bound_max.is_some())?;
        validate_bounds(rule_id, self.max.op, self.max.bound_max.is_some())
    }
}

/// What a matching rule additionally checks before it decides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCondition {
    DriverVersion(VersionCondition),
    RefreshRate(RefreshRateCondition),
}

fn validate_bounds(
    rule_id: &str,
    op: VersionComparisonOp,
    has_max: bool,
) -> Result<(), BlocklistError> {
    match (op.is_between(), has_max) {
        (true, false) => Err(BlocklistError::MissingMaximum {
            rule_id: rule_id.to_string(),
            op,
        }),
        (false, true) => Err(BlocklistError::UnexpectedMaximum {
            rule_id: rule_id.to_string(),
            op,
        }),
        _ => Ok(()),
    }
}

/// A blocklist entry: match predicates plus the outcome they lead to
#[derive(Debug, Clone)]
pub struct Rule {
    os: OperatingSystem,
    os_version: Option<VersionCondition>,
    screen: ScreenSizeStatus,
    battery: BatteryStatus,
    window_protocol: WindowProtocol,
    adapter_vendor: DeviceVendor,
    driver_vendor: DriverVendor,
    devices: Arc<DeviceSet>,
    gpu2: bool,
    /// Empty fields match anything
    android: AndroidDevice,

    feature: FeatureSelector,
    status: FeatureStatus,
    condition: RuleCondition,
    suggested_version: Option<String>,
    rule_id: String,
}

impl Rule {
    /// Start a rule for `family`, which also fixes the adapter vendor
    pub fn builder(
        os: OperatingSystem,
        family: DeviceFamily,
        feature: impl Into<FeatureSelector>,
        status: FeatureStatus,
        rule_id: impl Into<String>,
    ) -> RuleBuilder {
        RuleBuilder {
            rule: Rule {
                os,
                os_version: None,
                screen: ScreenSizeStatus::All,
                battery: BatteryStatus::All,
                window_protocol: WindowProtocol::All,
                adapter_vendor: family.vendor(),
                driver_vendor: DriverVendor::All,
                devices: family.devices(),
                gpu2: false,
                android: AndroidDevice::default(),
                feature: feature.into(),
                status,
                condition: RuleCondition::DriverVersion(VersionCondition::IGNORED),
                suggested_version: None,
                rule_id: rule_id.into(),
            },
            error: None,
        }
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn feature(&self) -> FeatureSelector {
        self.feature
    }

    pub fn status(&self) -> FeatureStatus {
        self.status
    }

    pub fn condition(&self) -> &RuleCondition {
        &self.condition
    }

    pub fn suggested_version(&self) -> Option<&str> {
        self.suggested_version.as_deref()
    }

    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    /// Whether this rule targets the secondary adapter
    pub fn is_gpu2(&self) -> bool {
        self.gpu2
    }

    pub fn applies_to(&self, feature: Feature) -> bool {
        self.feature.applies_to(feature)
    }

    /// The adapter this rule inspects, if the system has one
    pub fn adapter<'a>(&self, descriptor: &'a SystemDescriptor) -> Option<&'a AdapterInfo> {
        if self.gpu2 {
            descriptor.secondary_adapter.as_ref()
        } else {
            Some(&descriptor.adapter)
        }
    }

    /// Whether every non-wildcard predicate matches the system
    pub fn matches(&self, descriptor: &SystemDescriptor) -> bool {
        if !self.os.matches(descriptor.os) {
            return false;
        }

        if let Some(condition) = &self.os_version {
            let observed = descriptor.os_version.as_deref().and_then(|text| {
                VersionTuple::parse(text, DriverVersionFormat::Decimal)
                    .inspect_err(|err| log::warn!("Unparseable OS version {:?}: {}", text, err))
                    .ok()
            });
            if !condition.holds(observed.as_ref()) {
                return false;
            }
        }

        if !self
            .screen
            .matches(descriptor.screen_width, descriptor.screen_height)
            || !self.battery.matches(descriptor.has_battery)
            || !self.window_protocol.matches(&descriptor.window_protocol)
        {
            return false;
        }

        let Some(adapter) = self.adapter(descriptor) else {
            return false;
        };

        if !self.adapter_vendor.matches(&adapter.vendor_id)
            || !self.driver_vendor.matches(&adapter.driver_vendor)
        {
            return false;
        }

        if !self.devices.is_empty() && !self.devices.contains(&adapter.device_id) {
            return false;
        }

        android_field_matches(&self.android.model, &descriptor.android.model)
            && android_field_matches(&self.android.product, &descriptor.android.product)
            && android_field_matches(&self.android.manufacturer, &descriptor.android.manufacturer)
            && android_field_matches(&self.android.hardware, &descriptor.android.hardware)
    }

    /// The rule's status if its driver version condition holds for
    /// `observed`, `None` when it has no opinion.
    pub fn evaluate_version(&self, observed: Option<&VersionTuple>) -> Option<FeatureStatus> {
        match &self.condition {
            RuleCondition::DriverVersion(condition) => {
                condition.holds(observed).then_some(self.status)
            }
            RuleCondition::RefreshRate(_) => None,
        }
    }

    /// The rule's status if its refresh rate band holds for `rates`
    pub fn evaluate_refresh_rate(&self, rates: &[u32]) -> Option<FeatureStatus> {
        match &self.condition {
            RuleCondition::RefreshRate(condition) => {
                condition.holds(rates).then_some(self.status)
            }
            RuleCondition::DriverVersion(_) => None,
        }
    }
}

fn android_field_matches(expected: &str, actual: &str) -> bool {
    expected.is_empty() || expected == actual
}

/// Builder for [`Rule`], validating bounds in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    rule: Rule,
    error: Option<BlocklistError>,
}

impl RuleBuilder {
    pub fn screen(mut self, screen: ScreenSizeStatus) -> Self {
        self.rule.screen = screen;
        self
    }

    pub fn battery(mut self, battery: BatteryStatus) -> Self {
        self.rule.battery = battery;
        self
    }

    pub fn window_protocol(mut self, protocol: WindowProtocol) -> Self {
        self.rule.window_protocol = protocol;
        self
    }

    pub fn driver_vendor(mut self, vendor: DriverVendor) -> Self {
        self.rule.driver_vendor = vendor;
        self
    }

    pub fn adapter_vendor(mut self, vendor: DeviceVendor) -> Self {
        self.rule.adapter_vendor = vendor;
        self
    }

    /// Match an explicit device set instead of the family's
    pub fn devices(mut self, devices: Arc<DeviceSet>) -> Self {
        self.rule.devices = devices;
        self
    }

    /// Match against the secondary adapter
    pub fn gpu2(mut self) -> Self {
        self.rule.gpu2 = true;
        self
    }

    pub fn android(mut self, android: AndroidDevice) -> Self {
        self.rule.android = android;
        self
    }

    pub fn os_version(mut self, condition: VersionCondition) -> Self {
        self.rule.os_version = Some(condition);
        self
    }

    pub fn driver_version(mut self, op: VersionComparisonOp, version: VersionTuple) -> Self {
        self.rule.condition = RuleCondition::DriverVersion(VersionCondition::new(op, version));
        self
    }

    pub fn driver_version_range(
        mut self,
        op: VersionComparisonOp,
        min: VersionTuple,
        max: VersionTuple,
    ) -> Self {
        self.rule.condition = RuleCondition::DriverVersion(VersionCondition::range(op, min, max));
        self
    }

    /// Driver version bound given as text; parse failures surface from
    /// [`build`](Self::build).
    pub fn driver_version_str(
        mut self,
        op: VersionComparisonOp,
        version: &str,
        format: DriverVersionFormat,
    ) -> Self {
        match VersionTuple::parse(version, format) {
            Ok(parsed) => self.driver_version(op, parsed),
            Err(source) => {
                self.error.get_or_insert(BlocklistError::InvalidVersion {
                    rule_id: self.rule.rule_id.clone(),
                    literal: version.to_string(),
                    source,
                });
                self
            }
        }
    }

    pub fn refresh_rate(
        mut self,
        status: RefreshRateStatus,
        min: RateBound,
        max: RateBound,
    ) -> Self {
        self.rule.condition = RuleCondition::RefreshRate(RefreshRateCondition { status, min, max });
        self
    }

    pub fn suggested_version(mut self, version: impl Into<String>) -> Self {
        self.rule.suggested_version = Some(version.into());
        self
    }

    pub fn build(self) -> Result<Rule, BlocklistError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let rule = self.rule;
        match &rule.condition {
            RuleCondition::DriverVersion(condition) => condition.validate(&rule.rule_id)?,
            RuleCondition::RefreshRate(condition) => condition.validate(&rule.rule_id)?,
        }
        if let Some(condition) = &rule.os_version {
            condition.validate(&rule.rule_id)?;
        }

        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VersionComparisonOp::*;

    fn nvidia_windows() -> SystemDescriptor {
        SystemDescriptor::new(OperatingSystem::Windows10)
            .with_adapter(AdapterInfo::new("0x10de", "0x1234", "24.21.13.9826"))
            .with_screen(1920, 1080)
    }

    #[test]
    fn test_between_requires_maximum() {
        let result = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::WebGlAngle,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_TEST",
        )
        .driver_version(BetweenInclusive, VersionTuple::new(1, 0, 0, 0))
        .build();

        assert!(matches!(result, Err(BlocklistError::MissingMaximum { .. })));
    }

    #[test]
    fn test_maximum_requires_between() {
        let result = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::WebGlAngle,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_TEST",
        )
        .driver_version_range(LessThan, VersionTuple::new(1, 0, 0, 0), VersionTuple::new(2, 0, 0, 0))
        .build();

        assert!(matches!(result, Err(BlocklistError::UnexpectedMaximum { .. })));
    }

    #[test]
    fn test_refresh_rate_bounds_validated() {
        let result = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::All,
            Feature::WebRender,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_TEST",
        )
        .refresh_rate(
            RefreshRateStatus::Any,
            RateBound::new(BetweenExclusive, 120),
            RateBound::IGNORED,
        )
        .build();

        assert!(matches!(result, Err(BlocklistError::MissingMaximum { .. })));
    }

    #[test]
    fn test_invalid_version_literal() {
        let result = Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::All,
            Feature::WebRender,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_BAD_LITERAL",
        )
        .driver_version_str(LessThan, "21.x", DriverVersionFormat::Decimal)
        .build();

        match result {
            Err(BlocklistError::InvalidVersion { rule_id, literal, .. }) => {
                assert_eq!(rule_id, "FEATURE_FAILURE_BAD_LITERAL");
                assert_eq!(literal, "21.x");
            }
            other => panic!("expected InvalidVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_family_sets_vendor_and_devices() {
        let rule = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::IntelHaswell,
            Feature::WebGlAngle,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_TEST",
        )
        .build()
        .unwrap();

        let haswell = SystemDescriptor::new(OperatingSystem::Windows10)
            .with_adapter(AdapterInfo::new("0x8086", "0x0416", "20.19.15.4624"));
        assert!(rule.matches(&haswell));

        // same device id from another vendor
        let other = SystemDescriptor::new(OperatingSystem::Windows10)
            .with_adapter(AdapterInfo::new("0x10de", "0x0416", "20.19.15.4624"));
        assert!(!rule.matches(&other));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let rule = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::WebRender,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_TEST",
        )
        .screen(ScreenSizeStatus::Large)
        .battery(BatteryStatus::Present)
        .build()
        .unwrap();

        let base = nvidia_windows();
        assert!(!rule.matches(&base));
        assert!(!rule.matches(&base.clone().with_screen(3840, 2160)));
        assert!(!rule.matches(&base.clone().with_battery(true)));
        assert!(rule.matches(&base.with_screen(3840, 2160).with_battery(true)));
    }

    #[test]
    fn test_gpu2_rule_needs_secondary_adapter() {
        let rule = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::HardwareVideoDecoding,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_TEST",
        )
        .gpu2()
        .build()
        .unwrap();

        let single = SystemDescriptor::new(OperatingSystem::Windows10)
            .with_adapter(AdapterInfo::new("0x10de", "0x1b80", "1.0"));
        assert!(!rule.matches(&single));

        let optimus = SystemDescriptor::new(OperatingSystem::Windows10)
            .with_adapter(AdapterInfo::new("0x8086", "0x5916", "1.0"))
            .with_secondary_adapter(AdapterInfo::new("0x10de", "0x1b80", "1.0"));
        assert!(rule.matches(&optimus));
    }

    #[test]
    fn test_os_version_condition() {
        let rule = Rule::builder(
            OperatingSystem::MacOs,
            DeviceFamily::All,
            Feature::WebGpu,
            FeatureStatus::BlockedOsVersion,
            "FEATURE_FAILURE_TEST",
        )
        .os_version(VersionCondition::new(LessThan, VersionTuple::new(13, 0, 0, 0)))
        .build()
        .unwrap();

        let old = SystemDescriptor::new(OperatingSystem::MacOs12).with_os_version("12.6.1");
        let new = SystemDescriptor::new(OperatingSystem::MacOs14).with_os_version("14.2");
        let unknown = SystemDescriptor::new(OperatingSystem::MacOs14);
        assert!(rule.matches(&old));
        assert!(!rule.matches(&new));
        assert!(!rule.matches(&unknown));
    }

    #[test]
    fn test_android_fields() {
        let rule = Rule::builder(
            OperatingSystem::Android,
            DeviceFamily::All,
            Feature::WebGl2,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_TEST",
        )
        .android(AndroidDevice {
            manufacturer: "Amazon".to_string(),
            ..AndroidDevice::default()
        })
        .build()
        .unwrap();

        let fire = SystemDescriptor::new(OperatingSystem::Android).with_android(AndroidDevice {
            manufacturer: "Amazon".to_string(),
            model: "KFTRWI".to_string(),
            ..AndroidDevice::default()
        });
        assert!(rule.matches(&fire));
        assert!(!rule.matches(&SystemDescriptor::new(OperatingSystem::Android)));
    }

    #[test]
    fn test_evaluate_version() {
        let rule = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::WebGlOpenGl,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_TEST",
        )
        .driver_version(LessThan, VersionTuple::new(25, 0, 0, 0))
        .build()
        .unwrap();

        assert_eq!(
            rule.evaluate_version(Some(&VersionTuple::new(24, 21, 13, 9826))),
            Some(FeatureStatus::BlockedDriverVersion)
        );
        assert_eq!(rule.evaluate_version(Some(&VersionTuple::new(25, 0, 0, 0))), None);
        assert_eq!(rule.evaluate_version(None), None);
        assert_eq!(rule.evaluate_refresh_rate(&[60]), None);
    }

    #[test]
    fn test_unversioned_rule_ignores_unknown_version() {
        let rule = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::WebGlOpenGl,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_TEST",
        )
        .build()
        .unwrap();

        assert_eq!(rule.evaluate_version(None), Some(FeatureStatus::BlockedDevice));
    }

    #[test]
    fn test_refresh_rate_band() {
        let rule = Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::All,
            Feature::WebRenderCompositor,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_TEST",
        )
        .refresh_rate(
            RefreshRateStatus::Any,
            RateBound::range(BetweenInclusiveStart, 120, 165),
            RateBound::IGNORED,
        )
        .build()
        .unwrap();

        assert_eq!(rule.evaluate_refresh_rate(&[144]), Some(FeatureStatus::BlockedDevice));
        assert_eq!(rule.evaluate_refresh_rate(&[120]), Some(FeatureStatus::BlockedDevice));
        assert_eq!(rule.evaluate_refresh_rate(&[165]), None);
        assert_eq!(rule.evaluate_refresh_rate(&[60]), None);
        assert_eq!(rule.evaluate_refresh_rate(&[]), None);
        assert_eq!(rule.evaluate_version(None), None);
    }

    #[test]
    fn test_refresh_rate_min_and_max_checks() {
        let condition = RefreshRateCondition {
            status: RefreshRateStatus::Mixed,
            min: RateBound::new(LessThanOrEqual, 60),
            max: RateBound::new(GreaterThan, 60),
        };
        assert!(condition.holds(&[60, 144]));
        assert!(!condition.holds(&[75, 144]));
        assert!(!condition.holds(&[60, 60]));
    }
}
