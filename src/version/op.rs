//! Comparison operators shared by driver version and refresh rate checks

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Comparison applied between an observed value and a rule's bound(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionComparisonOp {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    /// `(min, max)`
    BetweenExclusive,
    /// `[min, max]`
    BetweenInclusive,
    /// `[min, max)`
    BetweenInclusiveStart,
    /// Always satisfied
    ComparisonIgnored,
}

impl VersionComparisonOp {
    pub const ALL: &'static [VersionComparisonOp] = &[
        VersionComparisonOp::LessThan,
        VersionComparisonOp::LessThanOrEqual,
        VersionComparisonOp::GreaterThan,
        VersionComparisonOp::GreaterThanOrEqual,
        VersionComparisonOp::Equal,
        VersionComparisonOp::NotEqual,
        VersionComparisonOp::BetweenExclusive,
        VersionComparisonOp::BetweenInclusive,
        VersionComparisonOp::BetweenInclusiveStart,
        VersionComparisonOp::ComparisonIgnored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::BetweenExclusive => "BETWEEN_EXCLUSIVE",
            Self::BetweenInclusive => "BETWEEN_INCLUSIVE",
            Self::BetweenInclusiveStart => "BETWEEN_INCLUSIVE_START",
            Self::ComparisonIgnored => "COMPARISON_IGNORED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == s)
    }

    /// Whether this operator needs both a lower and an upper bound
    pub fn is_between(&self) -> bool {
        matches!(
            self,
            Self::BetweenExclusive | Self::BetweenInclusive | Self::BetweenInclusiveStart
        )
    }

    /// Evaluate `observed <op> bound`, using `max` as the upper bound for
    /// the BETWEEN family.
    ///
    /// A BETWEEN operator without an upper bound never holds.
    pub fn evaluate<T: Ord>(&self, observed: &T, bound: &T, max: Option<&T>) -> bool {
        let lower = observed.cmp(bound);
        match self {
            Self::ComparisonIgnored => true,
            Self::LessThan => lower == Ordering::Less,
            Self::LessThanOrEqual => lower != Ordering::Greater,
            Self::GreaterThan => lower == Ordering::Greater,
            Self::GreaterThanOrEqual => lower != Ordering::Less,
            Self::Equal => lower == Ordering::Equal,
            Self::NotEqual => lower != Ordering::Equal,
            Self::BetweenExclusive | Self::BetweenInclusive | Self::BetweenInclusiveStart => {
                let Some(max) = max else {
                    log::warn!("{} evaluated without an upper bound", self.as_str());
                    return false;
                };
                let upper = observed.cmp(max);
                match self {
                    Self::BetweenExclusive => {
                        lower == Ordering::Greater && upper == Ordering::Less
                    }
                    Self::BetweenInclusive => {
                        lower != Ordering::Less && upper != Ordering::Greater
                    }
                    _ => lower != Ordering::Less && upper == Ordering::Less,
                }
            }
        }
    }
}
