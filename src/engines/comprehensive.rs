//! Comprehensive engine - maintained dictionary from `rustrict` plus custom words.

use std::collections::HashSet;
use std::ops::Range;

use rustrict::CensorStr;

use super::{contains_phrase, mask_ranges, FoldedText, ProfanityEngine};
use crate::corpus::{canonical_entry, ProfanityCorpus};
use crate::error::GuardError;

/// Custom words are checked as whole tokens; removed words become an
/// allow-list stripped from the text before the dictionary sees it.
pub struct ComprehensiveEngine {
    custom: HashSet<String>,
    allowed: HashSet<String>,
}

impl ComprehensiveEngine {
    pub fn new(corpus: &ProfanityCorpus) -> Result<Self, GuardError> {
        let custom = corpus
            .words()
            .iter()
            .chain(corpus.phrases().iter())
            .cloned()
            .collect();
        Ok(Self {
            custom,
            allowed: HashSet::new(),
        })
    }

    fn custom_hit(&self, tokens: &[&str]) -> bool {
        let joined = tokens.join(" ");
        self.custom.iter().any(|entry| {
            if entry.contains(' ') {
                contains_phrase(&joined, entry)
            } else {
                tokens.contains(&entry.as_str())
            }
        })
    }

    /// Text with allow-listed tokens removed, or `None` if nothing is allowed.
    fn screened(&self, tokens: &[&str]) -> Option<String> {
        if self.allowed.is_empty() {
            return None;
        }
        Some(
            tokens
                .iter()
                .filter(|t| !self.allowed.contains(**t))
                .copied()
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    fn dictionary_hit(&self, text: &str, tokens: &[&str]) -> bool {
        match self.screened(tokens) {
            Some(screened) => screened.as_str().is_inappropriate(),
            None => text.is_inappropriate(),
        }
    }

    /// Dictionary censoring that leaves allow-listed tokens untouched.
    fn dictionary_censor(&self, text: &str, folded: &FoldedText) -> String {
        let censored = text.censor();
        let allowed_spans: Vec<Range<usize>> = folded
            .token_spans()
            .into_iter()
            .filter(|span| self.allowed.contains(&folded.folded[span.clone()]))
            .map(|span| folded.to_original(span))
            .collect();
        if allowed_spans.is_empty() {
            return censored;
        }

        if censored.chars().count() != text.chars().count() {
            // Char alignment lost; judge token by token instead.
            let ranges = folded
                .token_spans()
                .into_iter()
                .filter(|span| {
                    let token = &folded.folded[span.clone()];
                    !self.allowed.contains(token) && token.is_inappropriate()
                })
                .map(|span| folded.to_original(span))
                .collect();
            return mask_ranges(text, ranges);
        }

        text.char_indices()
            .zip(censored.chars())
            .map(|((offset, original), masked)| {
                if allowed_spans.iter().any(|span| span.contains(&offset)) {
                    original
                } else {
                    masked
                }
            })
            .collect()
    }
}

impl ProfanityEngine for ComprehensiveEngine {
    fn name(&self) -> &'static str {
        "comprehensive"
    }

    fn exists(&self, text: &str) -> bool {
        let folded = FoldedText::new(text);
        let tokens = folded.tokens();
        self.custom_hit(&tokens) || self.dictionary_hit(text, &tokens)
    }

    fn censor(&self, text: &str) -> String {
        let folded = FoldedText::new(text);
        let tokens = folded.tokens();

        let base = if self.dictionary_hit(text, &tokens) {
            self.dictionary_censor(text, &folded)
        } else {
            text.to_string()
        };

        let folded = FoldedText::new(&base);
        let ranges = folded
            .token_spans()
            .into_iter()
            .filter(|span| self.custom.contains(&folded.folded[span.clone()]))
            .map(|span| folded.to_original(span))
            .collect();
        mask_ranges(&base, ranges)
    }

    fn add_words(&mut self, words: &[String]) {
        for word in words.iter().map(|w| canonical_entry(w)) {
            if word.is_empty() {
                continue;
            }
            self.allowed.remove(&word);
            self.custom.insert(word);
        }
    }

    fn remove_words(&mut self, words: &[String]) {
        for word in words.iter().map(|w| canonical_entry(w)) {
            if word.is_empty() {
                continue;
            }
            self.custom.remove(&word);
            self.allowed.insert(word);
        }
    }
}
