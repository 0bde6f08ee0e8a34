//! `<PRI>` decoding shared by both dialects

/// Syslog priority: `facility * 8 + severity`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    value: u8,
}

impl Priority {
    /// Largest valid value (facility 23, severity 7)
    pub const MAX: u8 = 191;

    /// Wrap a raw priority value
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self { value })
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Facility code, 0..=23
    pub fn facility(&self) -> u8 {
        self.value >> 3
    }

    /// Severity code, 0..=7
    pub fn severity(&self) -> u8 {
        self.value & 0x07
    }

    /// Parse a leading `<PRI>` (1-3 digits) and return the remainder
    pub(crate) fn parse_prefix(input: &str) -> Option<(Self, &str)> {
        let inner = input.strip_prefix('<')?;
        let close = inner.find('>')?;
        let digits = &inner[..close];
        if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u16 = digits.parse().ok()?;
        let priority = Self::new(u8::try_from(value).ok()?)?;
        Some((priority, &inner[close + 1..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_facility_and_severity() {
        let pri = Priority::new(165).unwrap();
        assert_eq!(pri.facility(), 20);
        assert_eq!(pri.severity(), 5);
    }

    #[test]
    fn every_valid_value_stays_in_range() {
        for value in 0..=Priority::MAX {
            let pri = Priority::new(value).unwrap();
            assert!(pri.facility() <= 23);
            assert!(pri.severity() <= 7);
            assert_eq!(pri.facility() * 8 + pri.severity(), value);
        }
        assert!(Priority::new(192).is_none());
    }

    #[test]
    fn parse_prefix_accepts_one_to_three_digits() {
        assert_eq!(
            Priority::parse_prefix("<0>rest"),
            Some((Priority::new(0).unwrap(), "rest"))
        );
        assert_eq!(
            Priority::parse_prefix("<191>x").map(|(p, _)| p.value()),
            Some(191)
        );
        assert!(Priority::parse_prefix("<>x").is_none());
        assert!(Priority::parse_prefix("<1234>x").is_none());
        assert!(Priority::parse_prefix("<192>x").is_none());
        assert!(Priority::parse_prefix("<1a>x").is_none());
        assert!(Priority::parse_prefix("13>x").is_none());
        assert!(Priority::parse_prefix("<13").is_none());
    }
}
