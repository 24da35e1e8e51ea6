//! Blacklist section - checks if password is in common password list.

use crate::blacklist::PasswordBlacklist;
use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

pub fn blacklist_section(password: &SecretString, blacklist: &PasswordBlacklist) -> SectionResult {
    if blacklist.contains(password.expose_secret()) {
        return Some("Avoid common passwords; this one appears on public lists".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blacklist_section_common_password() {
        let pwd = SecretString::new("password".to_string().into());
        let result = blacklist_section(&pwd, &PasswordBlacklist::builtin());
        assert!(result.unwrap().contains("common"));
    }

    #[test]
    fn test_blacklist_section_strong_password() {
        let pwd = SecretString::new("CorrectHorseBatteryStaple!123".to_string().into());
        assert_eq!(blacklist_section(&pwd, &PasswordBlacklist::builtin()), None);
    }
}
