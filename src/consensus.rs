//! Profanity consensus filter
//!
//! Owns one language's engines and a FIFO result cache. Detection never
//! fails: with no engine available it answers `false` and leaves text
//! unchanged, logging a warning.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::cache::{BoundedCache, EvictionPolicy};
use crate::corpus::ProfanityCorpus;
use crate::engines::{DetectionMethod, EngineSet, ProfanityEngine};
use crate::text::{normalize_profanity, LanguageTag};

pub const DEFAULT_RESULT_CACHE_CAPACITY: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Operation {
    Contains,
    Clean,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    operation: Operation,
    method: DetectionMethod,
    text: String,
}

#[derive(Debug, Clone)]
enum CachedValue {
    Flag(bool),
    Text(String),
}

/// Per-engine verdicts for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResult {
    pub engine_verdicts: BTreeMap<String, bool>,
    /// True if any engine flagged the text.
    pub consensus: bool,
    /// Positive verdicts over engines consulted, 0.0 when none were.
    pub confidence: f64,
    pub cleaned_text: String,
}

impl ConsensusResult {
    pub fn from_verdicts(engine_verdicts: BTreeMap<String, bool>, cleaned_text: String) -> Self {
        let total = engine_verdicts.len();
        let positive = engine_verdicts.values().filter(|&&v| v).count();
        let confidence = if total == 0 {
            0.0
        } else {
            positive as f64 / total as f64
        };
        Self {
            consensus: positive > 0,
            confidence,
            engine_verdicts,
            cleaned_text,
        }
    }
}

/// Texts an engine inspects: the input and its evasion-resistant form.
fn candidates(text: &str) -> Vec<String> {
    let mut out = vec![text.to_string()];
    let normalized = normalize_profanity(text);
    if !normalized.is_empty() && normalized != text {
        out.push(normalized);
    }
    out
}

fn engine_flags(engine: &dyn ProfanityEngine, candidates: &[String]) -> bool {
    candidates.iter().any(|c| engine.exists(c))
}

pub struct ProfanityFilter {
    language: LanguageTag,
    engines: RwLock<EngineSet>,
    cache: BoundedCache<CacheKey, CachedValue>,
}

impl ProfanityFilter {
    /// Builds every engine over `corpus`.
    pub fn new(corpus: &ProfanityCorpus) -> Self {
        Self::with_engines(
            corpus.language(),
            EngineSet::from_corpus(corpus),
            DEFAULT_RESULT_CACHE_CAPACITY,
        )
    }

    pub fn with_engines(language: LanguageTag, engines: EngineSet, cache_capacity: usize) -> Self {
        if engines.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "No profanity engine available for {}: detection will allow all input",
                language
            );
        }
        Self {
            language,
            engines: RwLock::new(engines),
            cache: BoundedCache::new(cache_capacity, EvictionPolicy::Fifo, None),
        }
    }

    fn read_engines(&self) -> RwLockReadGuard<'_, EngineSet> {
        self.engines.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_engines(&self) -> RwLockWriteGuard<'_, EngineSet> {
        self.engines.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn language(&self) -> LanguageTag {
        self.language
    }

    pub fn available_engines(&self) -> Vec<&'static str> {
        self.read_engines().available().iter().map(|e| e.name()).collect()
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// True if the engines selected by `method` flag the text.
    pub fn contains_profanity(&self, text: &str, method: DetectionMethod) -> bool {
        // Held across lookup, compute and insert so a concurrent word-list
        // change cannot interleave with a stale insert.
        let engines = self.read_engines();
        if engines.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Profanity check skipped for {}: no engine available", self.language);
            return false;
        }

        let key = CacheKey {
            operation: Operation::Contains,
            method,
            text: text.to_string(),
        };
        if let Some(CachedValue::Flag(hit)) = self.cache.get(&key) {
            return hit;
        }

        let candidates = candidates(text);
        let flagged = engines
            .for_method(method)
            .into_iter()
            .any(|engine| engine_flags(engine, &candidates));

        self.cache.insert(key, CachedValue::Flag(flagged));
        flagged
    }

    /// Masks banned spans using the engines selected by `method`.
    pub fn clean_text(&self, text: &str, method: DetectionMethod) -> String {
        let engines = self.read_engines();
        if engines.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Profanity cleaning skipped for {}: no engine available", self.language);
            return text.to_string();
        }

        let key = CacheKey {
            operation: Operation::Clean,
            method,
            text: text.to_string(),
        };
        if let Some(CachedValue::Text(hit)) = self.cache.get(&key) {
            return hit;
        }

        let cleaned = engines
            .for_method(method)
            .into_iter()
            .fold(text.to_string(), |acc, engine| engine.censor(&acc));

        self.cache.insert(key, CachedValue::Text(cleaned.clone()));
        cleaned
    }

    /// Verdict of every available engine, keyed by engine name.
    pub fn engine_verdicts(&self, text: &str) -> BTreeMap<String, bool> {
        let engines = self.read_engines();
        let candidates = candidates(text);
        engines
            .available()
            .into_iter()
            .map(|engine| (engine.name().to_string(), engine_flags(engine, &candidates)))
            .collect()
    }

    /// Consults every available engine and reports how many agree.
    pub fn get_analysis(&self, text: &str) -> ConsensusResult {
        let verdicts = self.engine_verdicts(text);
        let cleaned = self.clean_text(text, DetectionMethod::Hybrid);
        ConsensusResult::from_verdicts(verdicts, cleaned)
    }

    /// Adds words to every engine and drops all cached results.
    pub fn add_words<S: AsRef<str>>(&self, words: &[S]) {
        let words: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
        let mut engines = self.write_engines();
        for engine in engines.available_mut() {
            engine.add_words(&words);
        }
        self.cache.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!("Added {} words to {} filter, result cache cleared", words.len(), self.language);
    }

    /// Removes words from every engine and drops all cached results.
    pub fn remove_words<S: AsRef<str>>(&self, words: &[S]) {
        let words: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
        let mut engines = self.write_engines();
        for engine in engines.available_mut() {
            engine.remove_words(&words);
        }
        self.cache.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!("Removed {} words from {} filter, result cache cleared", words.len(), self.language);
    }
}
