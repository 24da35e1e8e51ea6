//! Pattern analysis section - detects repetitive and sequential patterns.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

/// Flags runs of 3+ identical characters and 4+ character ascending or
/// descending sequences ("aaa", "1234", "dcba").
pub fn pattern_analysis_section(password: &SecretString) -> SectionResult {
    let chars: Vec<char> = password.expose_secret().chars().collect();
    if chars.len() < 3 {
        return None;
    }

    if chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]) {
        return Some("Avoid repeated characters like \"aaa\"".to_string());
    }

    let is_sequential = chars.windows(4).any(|window| {
        let ascending = window.windows(2).all(|w| w[1] as i64 == w[0] as i64 + 1);
        let descending = window.windows(2).all(|w| w[1] as i64 == w[0] as i64 - 1);
        ascending || descending
    });
    if is_sequential {
        return Some("Avoid sequences like \"abcd\" or \"1234\"".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_pattern_section_repetitive_chars() {
        let result = pattern_analysis_section(&secret("aaaaBBBB1111"));
        assert!(result.unwrap().contains("repeated"));
    }

    #[test]
    fn test_pattern_section_sequential_numbers() {
        let result = pattern_analysis_section(&secret("test1234xyq"));
        assert!(result.unwrap().contains("sequences"));
    }

    #[test]
    fn test_pattern_section_descending_letters() {
        let result = pattern_analysis_section(&secret("Zdcba!97"));
        assert!(result.unwrap().contains("sequences"));
    }

    #[test]
    fn test_pattern_section_strong_password() {
        assert_eq!(pattern_analysis_section(&secret("RandomPass123!@#Word")), None);
    }

    #[test]
    fn test_pattern_section_too_short() {
        assert_eq!(pattern_analysis_section(&secret("ab")), None);
    }
}
