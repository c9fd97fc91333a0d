//! Rule kind definitions.

use std::fmt;

/// RuleKind is the classification of a public suffix rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RuleKind {
    /// Plain suffix rule (`com`, `org.ac`)
    #[default]
    Regular = 0,
    /// Wildcard rule (`*.ck`): any single label in front of the suffix
    Wildcard = 1,
    /// Exception rule (`!www.ck`): cancels a wildcard for one exact name
    Exception = 2,
}

impl RuleKind {
    /// Classify a rule line by its leading byte.
    pub fn of_line(line: &[u8]) -> Self {
        match line.first() {
            Some(b'*') => RuleKind::Wildcard,
            Some(b'!') => RuleKind::Exception,
            _ => RuleKind::Regular,
        }
    }

    /// Number of marker bytes in front of the rule text.
    pub fn marker_len(&self) -> usize {
        match self {
            RuleKind::Regular => 0,
            RuleKind::Wildcard => 2,
            RuleKind::Exception => 1,
        }
    }

    /// Whether rules of this kind live in the exception index.
    pub fn is_negative(&self) -> bool {
        matches!(self, RuleKind::Exception)
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Regular => "REGULAR",
            RuleKind::Wildcard => "WILDCARD",
            RuleKind::Exception => "EXCEPTION",
        }
    }

    /// Convert to a u8 value for entry packing.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert from a u8 value.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(RuleKind::Regular),
            1 => Some(RuleKind::Wildcard),
            2 => Some(RuleKind::Exception),
            _ => None,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_line() {
        assert_eq!(RuleKind::of_line(b"com"), RuleKind::Regular);
        assert_eq!(RuleKind::of_line(b"*.ck"), RuleKind::Wildcard);
        assert_eq!(RuleKind::of_line(b"!www.ck"), RuleKind::Exception);
        assert_eq!(RuleKind::of_line(b""), RuleKind::Regular);
    }

    #[test]
    fn test_kind_from_u8() {
        assert_eq!(RuleKind::from_u8(0), Some(RuleKind::Regular));
        assert_eq!(RuleKind::from_u8(1), Some(RuleKind::Wildcard));
        assert_eq!(RuleKind::from_u8(2), Some(RuleKind::Exception));
        assert_eq!(RuleKind::from_u8(3), None);
    }

    #[test]
    fn test_kind_markers() {
        assert_eq!(RuleKind::Regular.marker_len(), 0);
        assert_eq!(RuleKind::Wildcard.marker_len(), 2);
        assert_eq!(RuleKind::Exception.marker_len(), 1);
        assert!(RuleKind::Exception.is_negative());
        assert!(!RuleKind::Wildcard.is_negative());
        assert_eq!(RuleKind::Wildcard.to_string(), "WILDCARD");
    }
}
