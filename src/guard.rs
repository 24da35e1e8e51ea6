//! `ContentGuard` - the service object validation code talks to.
//!
//! Built once from a [`GuardConfig`] and shared by reference. It owns the
//! normalizer, one profanity filter per language, the password analyzer
//! and, with the `async` feature, the breach checker.

use std::collections::BTreeMap;
use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::blacklist::PasswordBlacklist;
use crate::config::GuardConfig;
use crate::consensus::{ConsensusResult, ProfanityFilter};
use crate::corpus::ProfanityCorpus;
use crate::engines::{DetectionMethod, EngineSet};
use crate::error::{CorpusError, GuardResult};
use crate::evaluator::{PasswordAnalysis, PasswordAnalyzer};
use crate::severity::SeverityLevel;
use crate::text::{
    detect_language, normalize_profanity, word_variations, LanguageTag, TextNormalizer,
};

#[cfg(feature = "async")]
use crate::breach::{BreachCheckResult, BreachChecker};
#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

/// Outcome of a field-level profanity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfanityVerdict {
    Pass,
    Fail,
}

impl ProfanityVerdict {
    fn from_flag(flagged: bool) -> Self {
        if flagged {
            ProfanityVerdict::Fail
        } else {
            ProfanityVerdict::Pass
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ProfanityVerdict::Pass)
    }
}

impl std::fmt::Display for ProfanityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfanityVerdict::Pass => f.write_str("pass"),
            ProfanityVerdict::Fail => f.write_str("fail"),
        }
    }
}

/// Breach side of a password screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BreachStatus {
    /// Score below the gate; no lookup was made.
    Skipped,
    Clean,
    Pwned { count: u64, severity: SeverityLevel },
    /// The lookup failed. The screening still stands on the local analysis.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordScreening {
    pub analysis: PasswordAnalysis,
    pub breach: BreachStatus,
}

pub struct ContentGuard {
    config: GuardConfig,
    normalizer: TextNormalizer,
    en: ProfanityFilter,
    vi: ProfanityFilter,
    analyzer: PasswordAnalyzer,
    #[cfg(feature = "async")]
    breach: BreachChecker,
}

fn load_corpus(
    language: LanguageTag,
    custom_dir: Option<&Path>,
) -> Result<ProfanityCorpus, CorpusError> {
    let mut corpus = ProfanityCorpus::builtin(language)?;
    if let Some(dir) = custom_dir {
        if dir.join(language.as_str()).is_dir() {
            corpus.merge(ProfanityCorpus::from_dir(language, dir)?);
        }
    }
    Ok(corpus)
}

impl ContentGuard {
    /// Builds every component from `config`.
    ///
    /// # Errors
    ///
    /// - `Corpus` when `corpus_dir` is missing or holds a bad entry
    /// - `Blacklist` when `blacklist_path` cannot be loaded
    /// - `NetworkFailure` when the HTTP client cannot be built
    ///
    /// A detection engine that fails to build is not an error; it is
    /// logged and left out of consensus.
    pub fn new(config: GuardConfig) -> GuardResult<Self> {
        let custom_dir = config.corpus_dir.as_deref();
        if let Some(dir) = custom_dir {
            if !dir.is_dir() {
                #[cfg(feature = "tracing")]
                tracing::error!("Corpus directory not found: {:?}", dir);
                return Err(CorpusError::FileNotFound(dir.to_path_buf()).into());
            }
        }

        let build_filter = |language: LanguageTag| -> GuardResult<ProfanityFilter> {
            let corpus = load_corpus(language, custom_dir)?;
            Ok(ProfanityFilter::with_engines(
                language,
                EngineSet::from_corpus(&corpus),
                config.result_cache_capacity,
            ))
        };
        let en = build_filter(LanguageTag::En)?;
        let vi = build_filter(LanguageTag::Vi)?;

        let blacklist = match &config.blacklist_path {
            Some(path) => PasswordBlacklist::from_path(path)?,
            None => PasswordBlacklist::builtin(),
        };

        #[cfg(feature = "async")]
        let breach = BreachChecker::new(&config.breach)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Content guard ready: en engines {:?}, vi engines {:?}",
            en.available_engines(),
            vi.available_engines()
        );

        Ok(Self {
            normalizer: TextNormalizer::new(
                config.normalizer_cache_capacity,
                config.normalizer_cache_ttl,
            ),
            en,
            vi,
            analyzer: PasswordAnalyzer::new(blacklist),
            #[cfg(feature = "async")]
            breach,
            config,
        })
    }

    /// Shorthand for `ContentGuard::new(GuardConfig::from_env()?)`.
    pub fn from_env() -> GuardResult<Self> {
        Self::new(GuardConfig::from_env()?)
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// The filter owning `language`'s corpus. `Unspecified` has none.
    pub fn filter(&self, language: LanguageTag) -> Option<&ProfanityFilter> {
        match language {
            LanguageTag::En => Some(&self.en),
            LanguageTag::Vi => Some(&self.vi),
            LanguageTag::Unspecified => None,
        }
    }

    /// Filters consulted for text in `language`. Vietnamese input often
    /// mixes in English, so it goes through both.
    fn filters_for(&self, language: LanguageTag) -> Vec<&ProfanityFilter> {
        match language {
            LanguageTag::En => vec![&self.en],
            LanguageTag::Vi | LanguageTag::Unspecified => vec![&self.vi, &self.en],
        }
    }

    // Text

    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    pub fn detect_language(&self, text: &str) -> LanguageTag {
        detect_language(text)
    }

    pub fn normalize_profanity(&self, text: &str) -> String {
        normalize_profanity(text)
    }

    pub fn word_variations(&self, word: &str) -> Vec<String> {
        word_variations(word)
    }

    // Profanity

    /// Detects the language, normalizes, then asks that language's filters.
    pub fn contains_profanity(&self, text: &str, method: DetectionMethod) -> bool {
        self.contains_profanity_in(text, method, detect_language(text))
    }

    /// Same as [`contains_profanity`](Self::contains_profanity) with an
    /// explicit language. `Unspecified` checks every corpus.
    pub fn contains_profanity_in(
        &self,
        text: &str,
        method: DetectionMethod,
        language: LanguageTag,
    ) -> bool {
        let normalized = self.normalizer.normalize(text);
        self.filters_for(language).into_iter().any(|filter| {
            filter.contains_profanity(&normalized, method)
                || (normalized != text && filter.contains_profanity(text, method))
        })
    }

    /// Masks banned spans. Text outside them keeps its original form.
    pub fn clean_text(&self, text: &str, method: DetectionMethod) -> String {
        self.filters_for(detect_language(text))
            .into_iter()
            .fold(text.to_string(), |acc, filter| filter.clean_text(&acc, method))
    }

    /// Engine-by-engine verdicts over the same filters and inputs as
    /// [`contains_profanity`](Self::contains_profanity). An engine counts as
    /// positive if it flags the text in any consulted filter.
    pub fn get_analysis(&self, text: &str) -> ConsensusResult {
        let normalized = self.normalizer.normalize(text);
        let mut verdicts: BTreeMap<String, bool> = BTreeMap::new();
        for filter in self.filters_for(detect_language(text)) {
            let mut inputs = vec![normalized.as_str()];
            if normalized != text {
                inputs.push(text);
            }
            for input in inputs {
                for (engine, flagged) in filter.engine_verdicts(input) {
                    *verdicts.entry(engine).or_insert(false) |= flagged;
                }
            }
        }
        ConsensusResult::from_verdicts(verdicts, self.clean_text(text, DetectionMethod::Hybrid))
    }

    /// Checks the local part, then the whole address.
    pub fn check_email_profanity(&self, email: &str) -> ProfanityVerdict {
        let email = email.trim();
        if email.is_empty() {
            return ProfanityVerdict::Pass;
        }
        let local = email.split('@').next().unwrap_or(email);
        let flagged = self.contains_profanity(local, DetectionMethod::Hybrid)
            || (local != email && self.contains_profanity(email, DetectionMethod::Hybrid));
        ProfanityVerdict::from_flag(flagged)
    }

    pub fn check_name_profanity(&self, name: &str) -> ProfanityVerdict {
        let name = name.trim();
        if name.is_empty() {
            return ProfanityVerdict::Pass;
        }
        ProfanityVerdict::from_flag(self.contains_profanity(name, DetectionMethod::Hybrid))
    }

    pub fn check_text_field(&self, text: &str) -> ProfanityVerdict {
        ProfanityVerdict::from_flag(self.contains_profanity(text, DetectionMethod::Hybrid))
    }

    /// Adds words to `language`'s filter (`Unspecified`: every filter).
    pub fn add_words<S: AsRef<str>>(&self, language: LanguageTag, words: &[S]) {
        match self.filter(language) {
            Some(filter) => filter.add_words(words),
            None => {
                self.en.add_words(words);
                self.vi.add_words(words);
            }
        }
    }

    /// Removes words from `language`'s filter (`Unspecified`: every filter).
    pub fn remove_words<S: AsRef<str>>(&self, language: LanguageTag, words: &[S]) {
        match self.filter(language) {
            Some(filter) => filter.remove_words(words),
            None => {
                self.en.remove_words(words);
                self.vi.remove_words(words);
            }
        }
    }

    // Passwords

    pub fn analyze_password(&self, password: &SecretString) -> PasswordAnalysis {
        self.analyzer.analyze(password)
    }

    pub fn analyze_password_with_inputs(
        &self,
        password: &SecretString,
        user_inputs: &[&str],
    ) -> PasswordAnalysis {
        self.analyzer.analyze_with_inputs(password, user_inputs)
    }

    /// Uses the configured thresholds.
    pub fn categorize_breach_severity(&self, count: u64) -> SeverityLevel {
        self.config.severity.categorize(count)
    }

    #[cfg(feature = "async")]
    pub async fn check_password_pwned(
        &self,
        password: &SecretString,
    ) -> GuardResult<BreachCheckResult> {
        self.breach.check_password_pwned(password).await
    }

    #[cfg(feature = "async")]
    pub async fn check_password_pwned_cancellable(
        &self,
        password: &SecretString,
        token: CancellationToken,
    ) -> GuardResult<BreachCheckResult> {
        self.breach.check_password_pwned_cancellable(password, token).await
    }

    #[cfg(feature = "async")]
    pub async fn check_passwords_batch(
        &self,
        passwords: &[SecretString],
    ) -> Vec<GuardResult<BreachCheckResult>> {
        self.breach.check_passwords_batch(passwords).await
    }

    /// Local analysis, then a breach lookup if the score clears the gate.
    ///
    /// Lookup failures do not fail the screening: they are logged and
    /// reported as [`BreachStatus::Unavailable`].
    #[cfg(feature = "async")]
    pub async fn screen_password(&self, password: &SecretString) -> PasswordScreening {
        let analysis = self.analyzer.analyze(password);
        if analysis.score < self.config.min_breach_check_score {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Breach lookup skipped: score {} below gate {}",
                analysis.score,
                self.config.min_breach_check_score
            );
            return PasswordScreening {
                analysis,
                breach: BreachStatus::Skipped,
            };
        }

        let breach = match self.breach.check_password_pwned(password).await {
            Ok(result) if result.is_pwned => BreachStatus::Pwned {
                count: result.count,
                severity: self.categorize_breach_severity(result.count),
            },
            Ok(_) => BreachStatus::Clean,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Breach lookup unavailable, continuing without it: {}", e);
                BreachStatus::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        PasswordScreening { analysis, breach }
    }
}
