//! Character variety sections - one rule per character class.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

fn require(password: &SecretString, class: fn(char) -> bool, suggestion: &str) -> SectionResult {
    if password.expose_secret().chars().any(class) {
        None
    } else {
        Some(suggestion.to_string())
    }
}

pub fn lowercase_section(password: &SecretString) -> SectionResult {
    require(password, char::is_lowercase, "Add lowercase letters")
}

pub fn uppercase_section(password: &SecretString) -> SectionResult {
    require(password, char::is_uppercase, "Add uppercase letters")
}

pub fn digit_section(password: &SecretString) -> SectionResult {
    require(password, |c| c.is_ascii_digit(), "Add numbers")
}

pub fn symbol_section(password: &SecretString) -> SectionResult {
    require(password, |c| !c.is_alphanumeric(), "Add special characters")
}
