//! Device id sets

/// Inclusive range of numeric device ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRange {
    pub begin: u32,
    pub end: u32,
}

impl DeviceRange {
    pub fn contains(&self, id: u32) -> bool {
        self.begin <= id && id <= self.end
    }
}

/// Device ids to match, or an empty set for all devices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSet {
    ids: Vec<String>,
    ranges: Vec<DeviceRange>,
}

impl DeviceSet {
    /// Create an empty set, which matches every device
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from exact device ids
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for id in ids {
            set.append(id);
        }
        set
    }

    pub fn append(&mut self, device_id: impl Into<String>) {
        self.ids.push(device_id.into());
    }

    pub fn append_range(&mut self, begin: u32, end: u32) {
        self.ranges.push(DeviceRange { begin, end });
    }

    /// Builder-style [`append_range`](Self::append_range)
    pub fn with_range(mut self, begin: u32, end: u32) -> Self {
        self.append_range(begin, end);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.ranges.is_empty()
    }

    /// Check whether a device id is in this set.
    ///
    /// Exact ids compare ASCII case-insensitively. Ranges only match ids
    /// that parse as integers: base 16 with a `0x` prefix, base 10 without.
    pub fn contains(&self, device_id: &str) -> bool {
        if self
            .ids
            .iter()
            .any(|id| id.eq_ignore_ascii_case(device_id))
        {
            return true;
        }

        if self.ranges.is_empty() {
            return false;
        }

        match parse_device_id(device_id) {
            Some(id) => self.ranges.iter().any(|range| range.contains(id)),
            None => false,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn ranges(&self) -> &[DeviceRange] {
        &self.ranges
    }
}

/// Parse a device id into an integer
pub(crate) fn parse_device_id(device_id: &str) -> Option<u32> {
    let trimmed = device_id.trim();
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => trimmed.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let set = DeviceSet::new();
        assert!(set.is_empty());
        assert!(!set.contains("0x1234"));
    }

    #[test]
    fn test_exact_ids_case_insensitive() {
        let set = DeviceSet::from_ids(["0x2a42", "0x2E42"]);
        assert!(!set.is_empty());
        assert!(set.contains("0x2A42"));
        assert!(set.contains("0x2e42"));
        assert!(!set.contains("0x2e43"));
    }

    #[test]
    fn test_range_membership() {
        let set = DeviceSet::new().with_range(0x100, 0x200);
        assert!(set.contains("0x150"));
        assert!(set.contains("0x100"));
        assert!(set.contains("0x200"));
        assert!(!set.contains("0x201"));
        assert!(!set.contains("0xff"));
    }

    #[test]
    fn test_range_decimal_ids() {
        let set = DeviceSet::new().with_range(0x100, 0x200);
        assert!(set.contains("300"));
        assert!(!set.contains("600"));
    }

    #[test]
    fn test_non_numeric_ids_never_match_ranges() {
        let mut set = DeviceSet::new().with_range(0, u32::MAX);
        assert!(!set.contains("Adreno (TM) 540"));
        set.append("Adreno (TM) 540");
        assert!(set.contains("adreno (tm) 540"));
    }

    #[test]
    fn test_parse_device_id() {
        assert_eq!(parse_device_id("0x10DE"), Some(0x10de));
        assert_eq!(parse_device_id("0X1b80"), Some(0x1b80));
        assert_eq!(parse_device_id("42"), Some(42));
        assert_eq!(parse_device_id("0xzz"), None);
        assert_eq!(parse_device_id(""), None);
    }
}
