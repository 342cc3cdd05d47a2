//! Ordered rule table and the first-match-wins evaluator

use super::{Feature, FeatureDecision, FeatureStatusProvider, Rule, RuleCondition};
use crate::system::SystemDescriptor;
use crate::version::{DriverVersionFormat, VersionTuple};

/// Driver versions of the queried system, parsed once per query
struct ObservedVersions {
    primary: Option<VersionTuple>,
    secondary: Option<VersionTuple>,
}

impl ObservedVersions {
    fn for_rule(&self, rule: &Rule) -> Option<&VersionTuple> {
        if rule.is_gpu2() {
            self.secondary.as_ref()
        } else {
            self.primary.as_ref()
        }
    }
}

/// Blocklist rules in registration order
///
/// Populated once, then shared read-only (typically behind an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    version_format: DriverVersionFormat,
}

impl RuleTable {
    /// Create an empty table parsing driver versions with `version_format`
    pub fn new(version_format: DriverVersionFormat) -> Self {
        Self {
            rules: Vec::new(),
            version_format,
        }
    }

    pub fn from_rules(version_format: DriverVersionFormat, rules: Vec<Rule>) -> Self {
        Self {
            rules,
            version_format,
        }
    }

    /// Append a rule; it is consulted after every rule already present
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn version_format(&self) -> DriverVersionFormat {
        self.version_format
    }

    /// Find the status of `feature` on the described system.
    ///
    /// Rules are tried in registration order and the first one that applies,
    /// matches and whose condition holds decides. Without such a rule the
    /// feature is [`Available`](super::FeatureStatus::Available).
    pub fn query_feature_status(
        &self,
        descriptor: &SystemDescriptor,
        feature: Feature,
    ) -> FeatureDecision {
        let versions = self.observe(descriptor);
        self.decide(descriptor, feature, &versions)
    }

    /// Status of every known feature, parsing the driver versions once
    pub fn query_all(&self, descriptor: &SystemDescriptor) -> Vec<(Feature, FeatureDecision)> {
        let versions = self.observe(descriptor);
        Feature::all()
            .map(|feature| (feature, self.decide(descriptor, feature, &versions)))
            .collect()
    }

    fn decide(
        &self,
        descriptor: &SystemDescriptor,
        feature: Feature,
        versions: &ObservedVersions,
    ) -> FeatureDecision {
        for rule in &self.rules {
            if !rule.applies_to(feature) || !rule.matches(descriptor) {
                continue;
            }

            let outcome = match rule.condition() {
                RuleCondition::DriverVersion(_) => rule.evaluate_version(versions.for_rule(rule)),
                RuleCondition::RefreshRate(_) => {
                    rule.evaluate_refresh_rate(&descriptor.refresh_rates)
                }
            };

            let Some(status) = outcome else {
                log::trace!(
                    "{}: {} matched but its condition does not hold",
                    feature.as_str(),
                    rule.rule_id()
                );
                continue;
            };

            log::debug!(
                "{}: {} by rule {}",
                feature.as_str(),
                status.as_str(),
                rule.rule_id()
            );
            return FeatureDecision {
                status,
                suggested_version: rule.suggested_version().map(str::to_string),
                rule_id: Some(rule.rule_id().to_string()),
            };
        }

        FeatureDecision::available()
    }

    fn observe(&self, descriptor: &SystemDescriptor) -> ObservedVersions {
        ObservedVersions {
            primary: self.parse_driver_version(&descriptor.adapter.driver_version),
            secondary: descriptor
                .secondary_adapter
                .as_ref()
                .and_then(|adapter| self.parse_driver_version(&adapter.driver_version)),
        }
    }

    /// Unparseable versions are unknown rather than errors
    fn parse_driver_version(&self, text: &str) -> Option<VersionTuple> {
        if text.is_empty() {
            return None;
        }
        match VersionTuple::parse(text, self.version_format) {
            Ok(version) => Some(version),
            Err(err) => {
                log::warn!("Treating driver version {:?} as unknown: {}", text, err);
                None
            }
        }
    }
}

impl FeatureStatusProvider for RuleTable {
    fn feature_status(&self, descriptor: &SystemDescriptor, feature: Feature) -> FeatureDecision {
        self.query_feature_status(descriptor, feature)
    }

    fn all_feature_statuses(&self, descriptor: &SystemDescriptor) -> Vec<(Feature, FeatureDecision)> {
        self.query_all(descriptor)
    }
}
