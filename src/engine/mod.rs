//! Blocklist front end
//!
//! [`GfxInfo`] combines the rule table with configuration:
//! 1. Apply spoofed values to the probed system
//! 2. Honour the blocklist mode (enforce, ignore all, block all)
//! 3. Query the shared rule table

mod probe;

pub use probe::{StaticProbe, SystemProbe};

#[cfg(test)]
pub use probe::MockSystemProbe;

use std::borrow::Cow;
use std::sync::Arc;

use crate::blocklist::{Feature, FeatureDecision, FeatureStatus, FeatureStatusProvider, RuleTable};
use crate::config::{BlocklistConfig, BlocklistMode};
use crate::system::SystemDescriptor;

pub const RULE_ID_IGNORE_ALL: &str = "FEATURE_FAILURE_IGNORE_ALL";
pub const RULE_ID_BLOCK_ALL: &str = "FEATURE_FAILURE_BLOCK_ALL";

/// Graphics feature status service
#[derive(Debug, Clone)]
pub struct GfxInfo {
    config: BlocklistConfig,
    table: Arc<RuleTable>,
}

impl GfxInfo {
    /// Create a service backed by the built-in blocklist
    pub fn new(config: BlocklistConfig) -> Self {
        let table = RuleTable::builtin(config.version_format);
        Self::with_table(config, table)
    }

    /// Create a service backed by a custom rule table
    pub fn with_table(config: BlocklistConfig, table: Arc<RuleTable>) -> Self {
        if config.mode != BlocklistMode::Enforce {
            log::info!("Graphics blocklist mode: {:?}", config.mode);
        }
        if !config.spoof.is_empty() {
            log::info!("Graphics blocklist spoofing: {:?}", config.spoof);
        }
        Self { config, table }
    }

    pub fn config(&self) -> &BlocklistConfig {
        &self.config
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Probe the system and query one feature
    pub fn feature_status_for(&self, probe: &dyn SystemProbe, feature: Feature) -> FeatureDecision {
        self.feature_status(&probe.probe(), feature)
    }

    /// Probe the system once and query every feature
    pub fn all_feature_statuses_for(&self, probe: &dyn SystemProbe) -> Vec<(Feature, FeatureDecision)> {
        self.all_feature_statuses(&probe.probe())
    }

    fn mode_override(&self) -> Option<FeatureDecision> {
        match self.config.mode {
            BlocklistMode::Enforce => None,
            BlocklistMode::IgnoreAll => Some(FeatureDecision::with_rule_id(
                FeatureStatus::Available,
                RULE_ID_IGNORE_ALL,
            )),
            BlocklistMode::BlockAll => Some(FeatureDecision::with_rule_id(
                FeatureStatus::BlockedDevice,
                RULE_ID_BLOCK_ALL,
            )),
        }
    }

    fn effective<'a>(&self, descriptor: &'a SystemDescriptor) -> Cow<'a, SystemDescriptor> {
        if self.config.spoof.is_empty() {
            return Cow::Borrowed(descriptor);
        }
        let mut spoofed = descriptor.clone();
        self.config.spoof.apply(&mut spoofed);
        Cow::Owned(spoofed)
    }
}

impl Default for GfxInfo {
    fn default() -> Self {
        Self::new(BlocklistConfig::default())
    }
}

impl FeatureStatusProvider for GfxInfo {
    fn feature_status(&self, descriptor: &SystemDescriptor, feature: Feature) -> FeatureDecision {
        if let Some(decision) = self.mode_override() {
            return decision;
        }
        self.table
            .query_feature_status(&self.effective(descriptor), feature)
    }

    fn all_feature_statuses(&self, descriptor: &SystemDescriptor) -> Vec<(Feature, FeatureDecision)> {
        if let Some(decision) = self.mode_override() {
            return Feature::all()
                .map(|feature| (feature, decision.clone()))
                .collect();
        }
        self.table.query_all(&self.effective(descriptor))
    }
}
