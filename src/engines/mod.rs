//! Profanity detection engines
//!
//! Each engine is an independent strategy over the same corpus. The filter
//! iterates them polymorphically to build a consensus.

mod advanced;
#[cfg(feature = "comprehensive")]
mod comprehensive;
mod fast;

use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::corpus::ProfanityCorpus;
use crate::error::GuardError;
use crate::text::fold_diacritics;

pub use advanced::AdvancedEngine;
#[cfg(feature = "comprehensive")]
pub use comprehensive::ComprehensiveEngine;
pub use fast::FastEngine;

/// Character used to mask censored spans.
pub const MASK_CHAR: char = '*';

/// A detection strategy.
pub trait ProfanityEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// True if the text contains anything this engine bans.
    fn exists(&self, text: &str) -> bool;

    /// Returns the text with banned spans masked.
    fn censor(&self, text: &str) -> String;

    fn add_words(&mut self, words: &[String]);

    fn remove_words(&mut self, words: &[String]);
}

/// Which engines answer a single-method query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Fast,
    Comprehensive,
    Advanced,
    /// Logical OR across every available engine.
    #[default]
    Hybrid,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Fast => "fast",
            DetectionMethod::Comprehensive => "comprehensive",
            DetectionMethod::Advanced => "advanced",
            DetectionMethod::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(DetectionMethod::Fast),
            "comprehensive" => Ok(DetectionMethod::Comprehensive),
            "advanced" => Ok(DetectionMethod::Advanced),
            "hybrid" | "" => Ok(DetectionMethod::Hybrid),
            other => Err(GuardError::InvalidArgument(format!(
                "unknown detection method: {other}"
            ))),
        }
    }
}

/// The engines built for one corpus. A slot is `None` when that engine
/// failed to build or is compiled out; it is never rebuilt on its own.
#[derive(Default)]
pub struct EngineSet {
    pub fast: Option<Box<dyn ProfanityEngine>>,
    pub comprehensive: Option<Box<dyn ProfanityEngine>>,
    pub advanced: Option<Box<dyn ProfanityEngine>>,
}

fn build_slot<E, F>(_name: &'static str, build: F) -> Option<Box<dyn ProfanityEngine>>
where
    E: ProfanityEngine + 'static,
    F: FnOnce() -> Result<E, GuardError>,
{
    match build() {
        Ok(engine) => Some(Box::new(engine)),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Profanity engine '{}' excluded from consensus: {}", _name, _e);
            None
        }
    }
}

impl EngineSet {
    pub fn from_corpus(corpus: &ProfanityCorpus) -> Self {
        Self {
            fast: build_slot("fast", || FastEngine::new(corpus)),
            #[cfg(feature = "comprehensive")]
            comprehensive: build_slot("comprehensive", || ComprehensiveEngine::new(corpus)),
            #[cfg(not(feature = "comprehensive"))]
            comprehensive: None,
            advanced: build_slot("advanced", || AdvancedEngine::new(corpus)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fast.is_none() && self.comprehensive.is_none() && self.advanced.is_none()
    }

    /// Every available engine, in fast, comprehensive, advanced order.
    pub fn available(&self) -> Vec<&dyn ProfanityEngine> {
        [&self.fast, &self.comprehensive, &self.advanced]
            .into_iter()
            .filter_map(|slot| slot.as_deref())
            .collect()
    }

    pub fn available_mut(&mut self) -> Vec<&mut Box<dyn ProfanityEngine>> {
        [&mut self.fast, &mut self.comprehensive, &mut self.advanced]
            .into_iter()
            .filter_map(|slot| slot.as_mut())
            .collect()
    }

    /// Engines that answer for `method`. Comprehensive and advanced fall
    /// back to fast when absent.
    pub fn for_method(&self, method: DetectionMethod) -> Vec<&dyn ProfanityEngine> {
        let single = match method {
            DetectionMethod::Hybrid => return self.available(),
            DetectionMethod::Fast => self.fast.as_deref(),
            DetectionMethod::Comprehensive => {
                self.comprehensive.as_deref().or(self.fast.as_deref())
            }
            DetectionMethod::Advanced => self.advanced.as_deref().or(self.fast.as_deref()),
        };
        single.into_iter().collect()
    }
}

/// Lowercased, diacritic-folded copy of a text with a char-for-char mapping
/// back to the original byte offsets.
pub(crate) struct FoldedText {
    pub folded: String,
    folded_offsets: Vec<usize>,
    original_offsets: Vec<usize>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut folded_offsets = Vec::with_capacity(text.len() + 1);
        let mut original_offsets = Vec::with_capacity(text.len() + 1);

        for (offset, c) in text.char_indices() {
            // Only single-char lowercase mappings keep the char alignment.
            let mut lower = c.to_lowercase();
            let lowered = match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            };
            let mut buf = [0u8; 4];
            folded_offsets.push(folded.len());
            original_offsets.push(offset);
            folded.push_str(&fold_diacritics(lowered.encode_utf8(&mut buf)));
        }
        folded_offsets.push(folded.len());
        original_offsets.push(text.len());

        Self {
            folded,
            folded_offsets,
            original_offsets,
        }
    }

    /// Maps a byte range in `folded` back to the original text.
    pub fn to_original(&self, range: Range<usize>) -> Range<usize> {
        let start = self
            .folded_offsets
            .binary_search(&range.start)
            .unwrap_or_else(|i| i);
        let end = self
            .folded_offsets
            .binary_search(&range.end)
            .unwrap_or_else(|i| i);
        self.original_offsets[start]..self.original_offsets[end]
    }

    /// Byte ranges of alphanumeric runs in `folded`.
    pub fn token_spans(&self) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut start: Option<usize> = None;
        for (i, c) in self.folded.char_indices() {
            match (c.is_alphanumeric(), start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    spans.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push(s..self.folded.len());
        }
        spans
    }

    pub fn tokens(&self) -> Vec<&str> {
        self.token_spans()
            .into_iter()
            .map(|span| &self.folded[span])
            .collect()
    }
}

/// Replaces each byte range of `text` with one mask char per character.
pub(crate) fn mask_ranges(text: &str, mut ranges: Vec<Range<usize>>) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }
    ranges.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        let start = range.start.max(cursor);
        if start >= range.end {
            continue;
        }
        out.push_str(&text[cursor..start]);
        let masked = text[start..range.end].chars().count();
        out.extend(std::iter::repeat_n(MASK_CHAR, masked));
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// True if `phrase` occurs in the space-joined token stream on token boundaries.
pub(crate) fn contains_phrase(joined_tokens: &str, phrase: &str) -> bool {
    format!(" {joined_tokens} ").contains(&format!(" {phrase} "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::LanguageTag;

    #[test]
    fn test_method_from_str() {
        assert_eq!("fast".parse::<DetectionMethod>().unwrap(), DetectionMethod::Fast);
        assert_eq!("HYBRID".parse::<DetectionMethod>().unwrap(), DetectionMethod::Hybrid);
        assert_eq!("".parse::<DetectionMethod>().unwrap(), DetectionMethod::Hybrid);
        assert!("fuzzy".parse::<DetectionMethod>().is_err());
        assert_eq!(DetectionMethod::default(), DetectionMethod::Hybrid);
    }

    #[test]
    fn test_folded_text_maps_back() {
        let folded = FoldedText::new("Địt mẹ");
        assert_eq!(folded.folded, "dit me");
        let original = folded.to_original(4..6);
        assert_eq!(&"Địt mẹ"[original], "mẹ");
    }

    #[test]
    fn test_tokens() {
        let folded = FoldedText::new("Hello, Thế giới!! a_b");
        assert_eq!(folded.tokens(), vec!["hello", "the", "gioi", "a", "b"]);
    }

    #[test]
    fn test_mask_ranges_merges_overlaps() {
        assert_eq!(mask_ranges("abcdef", vec![3..5, 1..4]), "a****f");
        assert_eq!(mask_ranges("bạn ơi", vec![0..5]), "*** ơi");
        assert_eq!(mask_ranges("clean", vec![]), "clean");
    }

    #[test]
    fn test_contains_phrase_on_boundaries() {
        assert!(contains_phrase("you are a piece of shit ok", "piece of shit"));
        assert!(!contains_phrase("masterpiece of shitake", "piece of shit"));
    }

    #[test]
    fn test_empty_set_fallbacks() {
        let set = EngineSet::default();
        assert!(set.is_empty());
        assert!(set.for_method(DetectionMethod::Hybrid).is_empty());
        assert!(set.for_method(DetectionMethod::Advanced).is_empty());
    }

    #[test]
    fn test_missing_engines_fall_back_to_fast() {
        let corpus = ProfanityCorpus::from_lists(LanguageTag::En, &["heck"], &[], &[]).unwrap();
        let set = EngineSet {
            fast: Some(Box::new(FastEngine::new(&corpus).unwrap())),
            comprehensive: None,
            advanced: None,
        };
        let engines = set.for_method(DetectionMethod::Comprehensive);
        assert_eq!(engines.len(), 1);
        assert_eq!(engines[0].name(), "fast");
        assert_eq!(set.for_method(DetectionMethod::Advanced)[0].name(), "fast");
    }

    #[test]
    fn test_from_corpus_builds_all_engines() {
        let corpus = ProfanityCorpus::builtin(LanguageTag::En).unwrap();
        let set = EngineSet::from_corpus(&corpus);
        let names: Vec<_> = set.available().iter().map(|e| e.name()).collect();
        #[cfg(feature = "comprehensive")]
        assert_eq!(names, vec!["fast", "comprehensive", "advanced"]);
        #[cfg(not(feature = "comprehensive"))]
        assert_eq!(names, vec!["fast", "advanced"]);
    }

    #[test]
    fn test_failed_engines_leave_empty_slots() {
        let set = EngineSet::from_corpus(&ProfanityCorpus::empty(LanguageTag::En));
        assert!(set.fast.is_none());
        assert!(set.advanced.is_none());
        let names: Vec<_> = set.available().iter().map(|e| e.name()).collect();
        #[cfg(feature = "comprehensive")]
        assert_eq!(names, vec!["comprehensive"]);
        #[cfg(not(feature = "comprehensive"))]
        assert!(set.is_empty());
    }
}
