//! Node labels: opaque non-negative integers of any size.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative integer label, kept as its canonical decimal digits.
///
/// Labels are identifiers, never used in arithmetic, so they are not bounded by
/// a machine integer width. Leading zeros are dropped: `007` and `7` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// Build a label from a run of ASCII digits. Returns `None` for an empty
    /// string or any non-digit character.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Some(Self("0".to_string()))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, if it fits into a `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for Label {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// canonical form has no leading zeros, so the longer string is the larger number
impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
