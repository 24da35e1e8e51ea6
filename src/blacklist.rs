//! Common-password blacklist
//!
//! Loaded once per analyzer, either from the compiled-in list or from an
//! external file.

use std::collections::HashSet;
use std::path::Path;

use crate::error::BlacklistError;

const BUILTIN_BLACKLIST: &str = include_str!("../assets/common-passwords.txt");

fn parse_entries(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct PasswordBlacklist {
    entries: HashSet<String>,
}

impl Default for PasswordBlacklist {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PasswordBlacklist {
    /// The compiled-in list of the most common passwords.
    pub fn builtin() -> Self {
        Self {
            entries: parse_entries(BUILTIN_BLACKLIST),
        }
    }

    /// Loads a blacklist from a file with one password per line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File is empty
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BlacklistError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Blacklist initialization FAILED: FileNotFound {:?}", path);
            return Err(BlacklistError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        if content.trim().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Blacklist initialization FAILED: Empty file {:?}", path);
            return Err(BlacklistError::EmptyFile);
        }

        let entries = parse_entries(&content);

        #[cfg(feature = "tracing")]
        tracing::info!("Blacklist initialized: {} passwords from {:?}", entries.len(), path);

        Ok(Self { entries })
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, password: &str) -> bool {
        self.entries.contains(&password.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_contains_common_passwords() {
        let blacklist = PasswordBlacklist::builtin();
        assert!(blacklist.contains("password123"));
        assert!(blacklist.contains("QWERTY"));
        assert!(!blacklist.contains("veryuncommonpassword987"));
        assert!(!blacklist.is_empty());
    }

    #[test]
    fn test_from_path_not_found() {
        let result = PasswordBlacklist::from_path("/nonexistent/path/blacklist.txt");
        assert!(matches!(result, Err(BlacklistError::FileNotFound(_))));
    }

    #[test]
    fn test_from_path_empty_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "  \n").expect("Failed to write empty content");

        let result = PasswordBlacklist::from_path(temp_file.path());
        assert!(matches!(result, Err(BlacklistError::EmptyFile)));
    }

    #[test]
    fn test_from_path_success() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "TestPassword").expect("Failed to write");
        writeln!(temp_file, "qwerty").expect("Failed to write");
        writeln!(temp_file).expect("Failed to write");

        let blacklist = PasswordBlacklist::from_path(temp_file.path()).expect("load");
        assert_eq!(blacklist.len(), 2);
        assert!(blacklist.contains("testpassword"));
        assert!(blacklist.contains("TESTPASSWORD"));
        assert!(!blacklist.contains("password123"));
    }
}
