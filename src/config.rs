//! Guard configuration
//!
//! Plain values with defaults; `from_env` layers environment overrides on
//! top.

use std::path::PathBuf;
use std::time::Duration;

use crate::consensus::DEFAULT_RESULT_CACHE_CAPACITY;
use crate::error::GuardError;
use crate::severity::SeverityThresholds;
use crate::text::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};

pub const ENV_CORPUS_DIR: &str = "CONTENT_GUARD_CORPUS_DIR";
pub const ENV_BLACKLIST_PATH: &str = "CONTENT_GUARD_BLACKLIST_PATH";
pub const ENV_BREACH_API_URL: &str = "CONTENT_GUARD_BREACH_API_URL";
pub const ENV_MIN_BREACH_SCORE: &str = "CONTENT_GUARD_MIN_BREACH_SCORE";

pub const DEFAULT_BREACH_API_URL: &str = "https://api.pwnedpasswords.com";
pub const DEFAULT_BREACH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MIN_BREACH_CHECK_SCORE: u8 = 2;

/// Settings for the range API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachConfig {
    /// Scheme and host; `/range/{prefix}` is appended.
    pub api_base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BREACH_API_URL.to_string(),
            timeout: DEFAULT_BREACH_TIMEOUT,
            user_agent: format!("content-guard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub severity: SeverityThresholds,
    /// Minimum entropy score (0-4) before a password is sent for a breach lookup.
    pub min_breach_check_score: u8,
    pub breach: BreachConfig,
    pub normalizer_cache_capacity: usize,
    pub normalizer_cache_ttl: Duration,
    pub result_cache_capacity: usize,
    /// Custom corpora layered over the built-in ones, `<dir>/<lang>/...`.
    pub corpus_dir: Option<PathBuf>,
    /// Replaces the built-in common-password list.
    pub blacklist_path: Option<PathBuf>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            severity: SeverityThresholds::default(),
            min_breach_check_score: DEFAULT_MIN_BREACH_CHECK_SCORE,
            breach: BreachConfig::default(),
            normalizer_cache_capacity: DEFAULT_CACHE_CAPACITY,
            normalizer_cache_ttl: DEFAULT_CACHE_TTL,
            result_cache_capacity: DEFAULT_RESULT_CACHE_CAPACITY,
            corpus_dir: None,
            blacklist_path: None,
        }
    }
}

impl GuardConfig {
    /// Defaults overridden by environment variables.
    ///
    /// - `CONTENT_GUARD_CORPUS_DIR`: custom corpus directory
    /// - `CONTENT_GUARD_BLACKLIST_PATH`: common-password list file
    /// - `CONTENT_GUARD_BREACH_API_URL`: range API base URL
    /// - `CONTENT_GUARD_MIN_BREACH_SCORE`: gate score, 0-4
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the gate score is not an integer in 0..=4.
    pub fn from_env() -> Result<Self, GuardError> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(ENV_CORPUS_DIR) {
            config.corpus_dir = Some(PathBuf::from(dir));
        }
        if let Ok(path) = std::env::var(ENV_BLACKLIST_PATH) {
            config.blacklist_path = Some(PathBuf::from(path));
        }
        if let Ok(url) = std::env::var(ENV_BREACH_API_URL) {
            config.breach.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var(ENV_MIN_BREACH_SCORE) {
            config.min_breach_check_score = raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|score| *score <= 4)
                .ok_or_else(|| {
                    GuardError::InvalidArgument(format!(
                        "{ENV_MIN_BREACH_SCORE} must be 0-4, got {raw:?}"
                    ))
                })?;
        }

        Ok(config)
    }
}
