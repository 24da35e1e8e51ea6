//! Per-language profanity corpora.
//!
//! Built-in lists are compiled into the binary. Custom lists can be layered
//! on top from a directory laid out as `<dir>/<lang>/{words,phrases,patterns,allow}.txt`.
//!
//! `allow.txt` lists innocent words that contain a banned word ("hancock",
//! "scunthorpe"). They are exempt from substring matching only.

use std::collections::HashSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::error::CorpusError;
use crate::text::{fold_diacritics, LanguageTag};

const EN_WORDS: &str = include_str!("../assets/corpus/en/words.txt");
const EN_PHRASES: &str = include_str!("../assets/corpus/en/phrases.txt");
const EN_PATTERNS: &str = include_str!("../assets/corpus/en/patterns.txt");
const EN_ALLOW: &str = include_str!("../assets/corpus/en/allow.txt");
const VI_WORDS: &str = include_str!("../assets/corpus/vi/words.txt");
const VI_PHRASES: &str = include_str!("../assets/corpus/vi/phrases.txt");
const VI_PATTERNS: &str = include_str!("../assets/corpus/vi/patterns.txt");

/// Banned words, phrases and patterns for one language.
#[derive(Debug, Clone)]
pub struct ProfanityCorpus {
    language: LanguageTag,
    words: HashSet<String>,
    phrases: HashSet<String>,
    patterns: Vec<Regex>,
    allowed: HashSet<String>,
}

/// Lowercases, folds diacritics and collapses inner whitespace.
pub fn canonical_entry(entry: &str) -> String {
    fold_diacritics(&entry.to_lowercase())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn entries(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

fn compile_pattern(pattern: &str) -> Result<Regex, CorpusError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CorpusError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

impl ProfanityCorpus {
    pub fn empty(language: LanguageTag) -> Self {
        Self {
            language,
            words: HashSet::new(),
            phrases: HashSet::new(),
            patterns: Vec::new(),
            allowed: HashSet::new(),
        }
    }

    /// Builds a corpus from in-memory lists.
    ///
    /// Entries containing whitespace are treated as phrases even when passed
    /// as words.
    pub fn from_lists<S: AsRef<str>>(
        language: LanguageTag,
        words: &[S],
        phrases: &[S],
        patterns: &[S],
    ) -> Result<Self, CorpusError> {
        let mut corpus = Self::empty(language);
        for word in words {
            corpus.insert_word(word.as_ref());
        }
        for phrase in phrases {
            corpus.insert_word(phrase.as_ref());
        }
        for pattern in patterns {
            corpus.patterns.push(compile_pattern(pattern.as_ref())?);
        }
        Ok(corpus)
    }

    fn from_contents(
        language: LanguageTag,
        words: &str,
        phrases: &str,
        patterns: &str,
        allow: &str,
    ) -> Result<Self, CorpusError> {
        let words: Vec<&str> = entries(words).collect();
        let phrases: Vec<&str> = entries(phrases).collect();
        let patterns: Vec<&str> = entries(patterns).collect();
        let mut corpus = Self::from_lists(
            language,
            words.as_slice(),
            phrases.as_slice(),
            patterns.as_slice(),
        )?;
        for entry in entries(allow) {
            corpus.allow_word(entry);
        }
        Ok(corpus)
    }

    /// The compiled-in corpus for a language. `Unspecified` merges all of them.
    pub fn builtin(language: LanguageTag) -> Result<Self, CorpusError> {
        match language {
            LanguageTag::En => {
                Self::from_contents(language, EN_WORDS, EN_PHRASES, EN_PATTERNS, EN_ALLOW)
            }
            LanguageTag::Vi => Self::from_contents(language, VI_WORDS, VI_PHRASES, VI_PATTERNS, ""),
            LanguageTag::Unspecified => {
                let mut merged = Self::builtin(LanguageTag::En)?;
                merged.merge(Self::builtin(LanguageTag::Vi)?);
                merged.language = LanguageTag::Unspecified;
                Ok(merged)
            }
        }
    }

    /// Loads a custom corpus for `language` from `<dir>/<lang>/`.
    ///
    /// Any of the three files may be missing, but at least one entry must
    /// be present overall.
    pub fn from_dir<P: AsRef<Path>>(language: LanguageTag, dir: P) -> Result<Self, CorpusError> {
        let lang_dir = dir.as_ref().join(language.as_str());

        if !lang_dir.is_dir() {
            #[cfg(feature = "tracing")]
            tracing::error!("Corpus load FAILED: directory not found {:?}", lang_dir);
            return Err(CorpusError::FileNotFound(lang_dir));
        }

        let read = |name: &str| -> Result<String, CorpusError> {
            let path = lang_dir.join(name);
            if path.exists() {
                Ok(std::fs::read_to_string(path)?)
            } else {
                Ok(String::new())
            }
        };

        let corpus = Self::from_contents(
            language,
            &read("words.txt")?,
            &read("phrases.txt")?,
            &read("patterns.txt")?,
            &read("allow.txt")?,
        )?;

        if corpus.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Corpus load FAILED: no entries in {:?}", lang_dir);
            return Err(CorpusError::EmptyFile(lang_dir));
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Custom corpus loaded for {}: {} words, {} phrases, {} patterns",
            language,
            corpus.words.len(),
            corpus.phrases.len(),
            corpus.patterns.len()
        );

        Ok(corpus)
    }

    /// Adds every entry of `other` to this corpus.
    pub fn merge(&mut self, other: ProfanityCorpus) {
        self.words.extend(other.words);
        self.phrases.extend(other.phrases);
        self.patterns.extend(other.patterns);
        self.allowed.extend(other.allowed);
    }

    /// Exempts a single word from substring matching.
    pub fn allow_word(&mut self, entry: &str) {
        let entry = canonical_entry(entry);
        if !entry.is_empty() && !entry.contains(' ') {
            self.allowed.insert(entry);
        }
    }

    /// Inserts a word, or a phrase if it contains whitespace.
    pub fn insert_word(&mut self, entry: &str) {
        let entry = canonical_entry(entry);
        if entry.is_empty() {
            return;
        }
        if entry.contains(' ') {
            self.phrases.insert(entry);
        } else {
            self.words.insert(entry);
        }
    }

    pub fn remove_word(&mut self, entry: &str) {
        let entry = canonical_entry(entry);
        self.words.remove(&entry);
        self.phrases.remove(&entry);
    }

    pub fn language(&self) -> LanguageTag {
        self.language
    }

    pub fn words(&self) -> &HashSet<String> {
        &self.words
    }

    pub fn phrases(&self) -> &HashSet<String> {
        &self.phrases
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn allowed(&self) -> &HashSet<String> {
        &self.allowed
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.phrases.is_empty() && self.patterns.is_empty()
    }
}
