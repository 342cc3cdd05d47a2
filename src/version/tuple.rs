//! Four-part version tuples and driver version string parsing

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::VersionComparisonOp;
use crate::utils::VersionParseError;

const MAX_PARTS: usize = 4;

/// How a platform's driver version strings are turned into numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverVersionFormat {
    /// Plain dotted integers
    #[default]
    Decimal,
    /// Windows convention: every component after the first is right-padded
    /// with `0` to four digits, so `.98` reads as 9800 and sorts above `.978`
    PaddedDecimal,
    /// Android convention: the whole string is one integer
    Integer,
}

impl DriverVersionFormat {
    /// Format used by drivers on the compile target
    pub fn native() -> Self {
        if cfg!(target_os = "windows") {
            Self::PaddedDecimal
        } else if cfg!(target_os = "android") {
            Self::Integer
        } else {
            Self::Decimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::PaddedDecimal => "padded",
            Self::Integer => "integer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "decimal" => Some(Self::Decimal),
            "padded" => Some(Self::PaddedDecimal),
            "integer" => Some(Self::Integer),
            _ => None,
        }
    }

    /// Build a table literal in this format; see [`VersionTuple::padded`]
    pub fn version(&self, a: u16, b: u16, c: u16, d: u16) -> VersionTuple {
        match self {
            Self::PaddedDecimal => VersionTuple::padded(a, b, c, d),
            Self::Decimal | Self::Integer => VersionTuple::new(a, b, c, d),
        }
    }
}

/// An `A.B.C.D` version, packed as `0xAAAABBBBCCCCDDDD` for comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VersionTuple {
    parts: [u16; MAX_PARTS],
}

impl VersionTuple {
    pub const fn new(a: u16, b: u16, c: u16, d: u16) -> Self {
        Self { parts: [a, b, c, d] }
    }

    /// Version literal with the padded-decimal transform applied to the
    /// minor components, matching what [`DriverVersionFormat::PaddedDecimal`]
    /// parsing yields for the same digits.
    pub const fn padded(a: u16, b: u16, c: u16, d: u16) -> Self {
        Self::new(a, pad_literal(b), pad_literal(c), pad_literal(d))
    }

    pub const fn from_packed(packed: u64) -> Self {
        Self::new(
            (packed >> 48) as u16,
            (packed >> 32) as u16,
            (packed >> 16) as u16,
            packed as u16,
        )
    }

    pub const fn pack(&self) -> u64 {
        ((self.parts[0] as u64) << 48)
            | ((self.parts[1] as u64) << 32)
            | ((self.parts[2] as u64) << 16)
            | self.parts[3] as u64
    }

    pub fn parts(&self) -> [u16; MAX_PARTS] {
        self.parts
    }

    /// Parse a dotted version string.
    ///
    /// Up to four components are accepted and missing trailing components
    /// are zero. More than four components is an error, never a truncation.
    pub fn parse(text: &str, format: DriverVersionFormat) -> Result<Self, VersionParseError> {
        if text.is_empty() {
            return Err(VersionParseError::Empty);
        }

        if format == DriverVersionFormat::Integer {
            return parse_integer(text);
        }

        let components: Vec<&str> = text.split('.').collect();
        if components.len() > MAX_PARTS {
            return Err(VersionParseError::TooManyComponents {
                count: components.len(),
            });
        }

        let mut parts = [0u16; MAX_PARTS];
        for (index, component) in components.iter().enumerate() {
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionParseError::NonNumeric {
                    index,
                    component: component.to_string(),
                });
            }

            let digits = if format == DriverVersionFormat::PaddedDecimal && index > 0 {
                pad_decimal(component)
            } else {
                component.to_string()
            };

            parts[index] = digits
                .parse::<u64>()
                .ok()
                .and_then(|value| u16::try_from(value).ok())
                .ok_or_else(|| VersionParseError::OutOfRange {
                    index,
                    component: component.to_string(),
                })?;
        }

        Ok(Self { parts })
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Evaluate `self <op> lower`, with `upper` bounding the BETWEEN family
    pub fn compare_with_op(
        &self,
        lower: &Self,
        upper: Option<&Self>,
        op: VersionComparisonOp,
    ) -> bool {
        op.evaluate(self, lower, upper)
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.parts;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

const fn pad_literal(mut value: u16) -> u16 {
    while value > 0 && value < 1000 {
        value *= 10;
    }
    value
}

fn pad_decimal(component: &str) -> String {
    format!("{:0<4}", component)
}

fn parse_integer(text: &str) -> Result<VersionTuple, VersionParseError> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionParseError::NonNumeric {
            index: 0,
            component: text.to_string(),
        });
    }
    text.parse::<u64>()
        .map(VersionTuple::from_packed)
        .map_err(|_| VersionParseError::OutOfRange {
            index: 0,
            component: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decimal(text: &str) -> VersionTuple {
        VersionTuple::parse(text, DriverVersionFormat::Decimal).unwrap()
    }

    fn padded(text: &str) -> VersionTuple {
        VersionTuple::parse(text, DriverVersionFormat::PaddedDecimal).unwrap()
    }

    #[test]
    fn test_parse_full_version() {
        assert_eq!(decimal("24.21.13.9826"), VersionTuple::new(24, 21, 13, 9826));
    }

    #[test]
    fn test_parse_defaults_trailing_components() {
        assert_eq!(decimal("10.6"), VersionTuple::new(10, 6, 0, 0));
        assert_eq!(decimal("7"), VersionTuple::new(7, 0, 0, 0));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(
            VersionTuple::parse("", DriverVersionFormat::Decimal),
            Err(VersionParseError::Empty)
        );
    }

    #[test]
    fn test_parse_rejects_fifth_component() {
        assert_eq!(
            VersionTuple::parse("1.2.3.4.5", DriverVersionFormat::Decimal),
            Err(VersionParseError::TooManyComponents { count: 5 })
        );
        assert!(VersionTuple::parse("1.2.3.4.", DriverVersionFormat::PaddedDecimal).is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            VersionTuple::parse("1.2b.3", DriverVersionFormat::Decimal),
            Err(VersionParseError::NonNumeric {
                index: 1,
                component: "2b".to_string()
            })
        );
        assert!(VersionTuple::parse("1..3", DriverVersionFormat::Decimal).is_err());
        assert!(VersionTuple::parse("-1.0", DriverVersionFormat::Decimal).is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(
            VersionTuple::parse("1.65536", DriverVersionFormat::Decimal),
            Err(VersionParseError::OutOfRange {
                index: 1,
                component: "65536".to_string()
            })
        );
        assert_eq!(decimal("1.65535"), VersionTuple::new(1, 65535, 0, 0));
        assert!(VersionTuple::parse("1.99999999999999999999", DriverVersionFormat::Decimal).is_err());
    }

    #[test]
    fn test_padded_parse_reads_decimal_fractions() {
        assert_eq!(padded("8.15.10.2869"), VersionTuple::new(8, 1500, 1000, 2869));
        assert_eq!(padded("6.1.7"), VersionTuple::new(6, 1000, 7000, 0));
        // the leading component is never padded
        assert_eq!(padded("9.0"), VersionTuple::new(9, 0, 0, 0));
    }

    #[test]
    fn test_padded_ordering_quirk() {
        // .98 becomes 9800 and .978 becomes 9780
        assert!(padded("1.98.0.0") > padded("1.978.0.0"));
        assert!(decimal("1.98.0.0") < decimal("1.978.0.0"));
    }

    #[test]
    fn test_padded_literal_matches_padded_parse() {
        assert_eq!(VersionTuple::padded(8, 15, 10, 2869), padded("8.15.10.2869"));
        assert_eq!(VersionTuple::padded(24, 21, 13, 9826), padded("24.21.13.9826"));
        assert_eq!(VersionTuple::padded(6, 1, 7, 0), padded("6.1.7.0"));
    }

    #[test]
    fn test_integer_format() {
        let version = VersionTuple::parse("450", DriverVersionFormat::Integer).unwrap();
        assert_eq!(version.pack(), 450);
        assert!(VersionTuple::parse("4.5", DriverVersionFormat::Integer).is_err());
    }

    #[test]
    fn test_pack_round_trip_and_order() {
        let version = VersionTuple::new(0x1, 0x2, 0x3, 0x4);
        assert_eq!(version.pack(), 0x0001_0002_0003_0004);
        assert_eq!(VersionTuple::from_packed(version.pack()), version);
        assert!(VersionTuple::new(1, 0, 0, 0).pack() > VersionTuple::new(0, 65535, 65535, 65535).pack());
    }

    #[test]
    fn test_compare_with_op() {
        let observed = decimal("24.21.13.9826");
        let bound = decimal("25.0.0.0");
        assert!(observed.compare_with_op(&bound, None, VersionComparisonOp::LessThan));
        assert!(!observed.compare_with_op(&bound, None, VersionComparisonOp::GreaterThanOrEqual));
        assert!(observed.compare_with_op(
            &decimal("24.0"),
            Some(&bound),
            VersionComparisonOp::BetweenExclusive
        ));
        assert_eq!(observed.compare(&observed), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        assert_eq!(VersionTuple::new(31, 0, 101, 4502).to_string(), "31.0.101.4502");
    }
}
