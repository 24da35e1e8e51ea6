//! Content-safety and credential-hygiene checks
//!
//! This library decides whether user-supplied text contains profanity
//! despite deliberate evasion, and whether a password is known to be
//! compromised, using a k-anonymity breach lookup.
//!
//! # Features
//!
//! - `async` (default): Enables the breach checker (HTTP, cancellation, batches)
//! - `comprehensive` (default): Enables the `rustrict` dictionary engine
//! - `tracing` (default): Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `CONTENT_GUARD_CORPUS_DIR`: Custom corpora, laid out as `<dir>/<lang>/words.txt`
//! - `CONTENT_GUARD_BLACKLIST_PATH`: Custom common-password list
//! - `CONTENT_GUARD_BREACH_API_URL`: Range API base URL
//!   (default: `https://api.pwnedpasswords.com`)
//! - `CONTENT_GUARD_MIN_BREACH_SCORE`: Minimum strength score before a lookup (default: 2)
//!
//! # Example
//!
//! ```rust,no_run
//! use content_guard::{ContentGuard, DetectionMethod, GuardConfig, ProfanityVerdict};
//! use secrecy::SecretString;
//!
//! // Build once at startup and share by reference
//! let guard = ContentGuard::new(GuardConfig::default()).expect("Failed to build guard");
//!
//! assert_eq!(guard.check_email_profanity("f.u.c.k@example.com"), ProfanityVerdict::Fail);
//! println!("{}", guard.clean_text("well shit", DetectionMethod::Advanced));
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let analysis = guard.analyze_password(&password);
//! println!("Score: {} ({:?})", analysis.score, analysis.strength);
//! ```

// Internal modules
mod blacklist;
mod cache;
mod config;
mod consensus;
mod corpus;
mod engines;
mod error;
mod evaluator;
mod guard;
mod sections;
mod severity;
mod text;

#[cfg(feature = "async")]
mod breach;

// Public API
pub use blacklist::PasswordBlacklist;
pub use cache::{BoundedCache, EvictionPolicy};
pub use config::{
    BreachConfig, GuardConfig, DEFAULT_BREACH_API_URL, DEFAULT_BREACH_TIMEOUT,
    DEFAULT_MIN_BREACH_CHECK_SCORE, ENV_BLACKLIST_PATH, ENV_BREACH_API_URL, ENV_CORPUS_DIR,
    ENV_MIN_BREACH_SCORE,
};
pub use consensus::{ConsensusResult, ProfanityFilter, DEFAULT_RESULT_CACHE_CAPACITY};
pub use corpus::ProfanityCorpus;
pub use engines::{
    AdvancedEngine, DetectionMethod, EngineSet, FastEngine, ProfanityEngine, MASK_CHAR,
};
pub use error::{BlacklistError, CorpusError, GuardError, GuardResult};
pub use evaluator::{analyze_password, PasswordAnalysis, PasswordAnalyzer, PasswordStrength};
pub use guard::{BreachStatus, ContentGuard, PasswordScreening, ProfanityVerdict};
pub use severity::{categorize_breach_severity, SeverityLevel, SeverityThresholds};
pub use text::{
    detect_language, fold_diacritics, is_vietnamese_char, normalize_profanity,
    normalize_uncached, word_variations, LanguageTag, TextNormalizer, DEFAULT_CACHE_CAPACITY,
    DEFAULT_CACHE_TTL, LEET_SUBSTITUTES,
};

#[cfg(feature = "comprehensive")]
pub use engines::ComprehensiveEngine;

#[cfg(feature = "async")]
pub use breach::{
    find_suffix_count, hash_prefix_suffix, BatchEntry, BreachCheckResult, BreachChecker,
};
#[cfg(feature = "async")]
pub use tokio_util::sync::CancellationToken;
