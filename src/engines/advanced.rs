//! Advanced engine - whole-word regex matcher with censoring.

use std::collections::HashSet;
use std::ops::Range;

use regex::{Regex, RegexBuilder};

use super::{mask_ranges, FoldedText, ProfanityEngine};
use crate::corpus::{canonical_entry, ProfanityCorpus};
use crate::error::GuardError;
use crate::text::word_variations;

/// Separator run allowed between phrase tokens.
const PHRASE_GAP: &str = r"[\W_]+";

pub struct AdvancedEngine {
    words: HashSet<String>,
    phrases: HashSet<String>,
    patterns: Vec<Regex>,
    matcher: Option<Regex>,
    /// Removed entries in `squeezed` form; pattern hits on them are dropped.
    allowed: HashSet<String>,
}

/// Alphanumerics only, with repeated chars collapsed ("s.h.i.i.t" -> "shit").
fn squeezed(text: &str) -> String {
    let mut out: Vec<char> = text.chars().filter(|c| c.is_alphanumeric()).collect();
    out.dedup();
    out.into_iter().collect()
}

fn build_matcher(words: &HashSet<String>, phrases: &HashSet<String>) -> Result<Option<Regex>, regex::Error> {
    let mut alternatives: Vec<String> = words
        .iter()
        .flat_map(|w| word_variations(w))
        .map(|v| regex::escape(&v))
        .chain(phrases.iter().map(|p| {
            p.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(PHRASE_GAP)
        }))
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    // Leftmost-first alternation: try longer spellings before their prefixes.
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    alternatives.dedup();

    RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
        .case_insensitive(true)
        .size_limit(32 * (1 << 20))
        .build()
        .map(Some)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn boundary_before(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().is_none_or(|c| !is_word_char(c))
}

fn boundary_after(text: &str, at: usize) -> bool {
    text[at..].chars().next().is_none_or(|c| !is_word_char(c))
}

impl AdvancedEngine {
    pub fn new(corpus: &ProfanityCorpus) -> Result<Self, GuardError> {
        let words = corpus.words().clone();
        let phrases = corpus.phrases().clone();
        let matcher = build_matcher(&words, &phrases).map_err(|e| GuardError::EngineUnavailable {
            engine: "advanced",
            reason: e.to_string(),
        })?;

        if matcher.is_none() && corpus.patterns().is_empty() {
            return Err(GuardError::EngineUnavailable {
                engine: "advanced",
                reason: "no words, phrases or patterns".to_string(),
            });
        }

        Ok(Self {
            words,
            phrases,
            patterns: corpus.patterns().to_vec(),
            matcher,
            allowed: HashSet::new(),
        })
    }

    /// Byte ranges in `folded` of whole-word matches and pattern matches.
    fn matches(&self, folded: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();

        if let Some(matcher) = &self.matcher {
            let mut pos = 0;
            while pos <= folded.len() {
                let Some(m) = matcher.find_at(folded, pos) else {
                    break;
                };
                if boundary_before(folded, m.start()) && boundary_after(folded, m.end()) {
                    ranges.push(m.range());
                    pos = m.end().max(m.start() + 1);
                } else {
                    // Retry from the next char so shorter spellings still get a chance.
                    let step = folded[m.start()..].chars().next().map_or(1, char::len_utf8);
                    pos = m.start() + step;
                }
            }
        }

        for pattern in &self.patterns {
            ranges.extend(
                pattern
                    .find_iter(folded)
                    .filter(|m| !self.allowed.contains(&squeezed(m.as_str())))
                    .map(|m| m.range()),
            );
        }
        ranges
    }

    fn rebuild(&mut self) {
        match build_matcher(&self.words, &self.phrases) {
            Ok(matcher) => self.matcher = matcher,
            Err(_e) => {
                // Keep serving the previous matcher.
                #[cfg(feature = "tracing")]
                tracing::warn!("Advanced engine rebuild failed, keeping previous word list: {}", _e);
            }
        }
    }
}

impl ProfanityEngine for AdvancedEngine {
    fn name(&self) -> &'static str {
        "advanced"
    }

    fn exists(&self, text: &str) -> bool {
        let folded = FoldedText::new(text);
        !self.matches(&folded.folded).is_empty()
    }

    fn censor(&self, text: &str) -> String {
        let folded = FoldedText::new(text);
        let ranges = self
            .matches(&folded.folded)
            .into_iter()
            .map(|r| folded.to_original(r))
            .collect();
        mask_ranges(text, ranges)
    }

    fn add_words(&mut self, words: &[String]) {
        for word in words.iter().map(|w| canonical_entry(w)) {
            if word.is_empty() {
                continue;
            }
            self.allowed.remove(&squeezed(&word));
            if word.contains(' ') {
                self.phrases.insert(word);
            } else {
                self.words.insert(word);
            }
        }
        self.rebuild();
    }

    fn remove_words(&mut self, words: &[String]) {
        for word in words.iter().map(|w| canonical_entry(w)) {
            if word.is_empty() {
                continue;
            }
            self.words.remove(&word);
            self.phrases.remove(&word);
            self.allowed.insert(squeezed(&word));
        }
        self.rebuild();
    }
}
