//! Breach severity bands.

use serde::{Deserialize, Serialize};

/// Ordinal breach severity, `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "low",
            SeverityLevel::Medium => "medium",
            SeverityLevel::High => "high",
            SeverityLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occurrence counts a password must exceed to enter each band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical: 100_000,
            high: 10_000,
            medium: 100,
        }
    }
}

impl SeverityThresholds {
    /// Maps a breach count to its band with strict `>` comparisons.
    pub fn categorize(&self, count: u64) -> SeverityLevel {
        if count > self.critical {
            SeverityLevel::Critical
        } else if count > self.high {
            SeverityLevel::High
        } else if count > self.medium {
            SeverityLevel::Medium
        } else {
            SeverityLevel::Low
        }
    }
}

/// Categorizes with the default thresholds.
pub fn categorize_breach_severity(count: u64) -> SeverityLevel {
    SeverityThresholds::default().categorize(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(categorize_breach_severity(0), SeverityLevel::Low);
        assert_eq!(categorize_breach_severity(50), SeverityLevel::Low);
        assert_eq!(categorize_breach_severity(5_000), SeverityLevel::Medium);
        assert_eq!(categorize_breach_severity(50_000), SeverityLevel::High);
        assert_eq!(categorize_breach_severity(2_254_650), SeverityLevel::Critical);
    }

    #[test]
    fn test_exact_threshold_stays_in_lower_band() {
        assert_eq!(categorize_breach_severity(100), SeverityLevel::Low);
        assert_eq!(categorize_breach_severity(10_000), SeverityLevel::Medium);
        assert_eq!(categorize_breach_severity(100_000), SeverityLevel::High);
    }

    #[test]
    fn test_one_past_threshold_moves_up() {
        assert_eq!(categorize_breach_severity(101), SeverityLevel::Medium);
        assert_eq!(categorize_breach_severity(10_001), SeverityLevel::High);
        assert_eq!(categorize_breach_severity(100_001), SeverityLevel::Critical);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = SeverityThresholds {
            critical: 10,
            high: 5,
            medium: 1,
        };
        assert_eq!(thresholds.categorize(1), SeverityLevel::Low);
        assert_eq!(thresholds.categorize(2), SeverityLevel::Medium);
        assert_eq!(thresholds.categorize(11), SeverityLevel::Critical);
    }

    #[test]
    fn test_ordering_and_wire_names() {
        assert!(SeverityLevel::Low < SeverityLevel::Medium);
        assert!(SeverityLevel::High < SeverityLevel::Critical);
        assert_eq!(serde_json::to_string(&SeverityLevel::Critical).unwrap(), "\"critical\"");
    }
}
