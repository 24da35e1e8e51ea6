//! Fast engine - word-list lookup.

use std::collections::HashSet;

use super::{contains_phrase, mask_ranges, FoldedText, ProfanityEngine};
use crate::corpus::{canonical_entry, ProfanityCorpus};
use crate::error::GuardError;

/// Words at least this long also match inside longer tokens.
const MIN_SUBSTRING_LEN: usize = 4;

/// Exact token match for every word, substring match for longer words, and
/// token-aligned phrase containment. Tokens on the corpus allow-list skip
/// the substring test.
pub struct FastEngine {
    words: HashSet<String>,
    phrases: HashSet<String>,
    allowed: HashSet<String>,
}

impl FastEngine {
    pub fn new(corpus: &ProfanityCorpus) -> Result<Self, GuardError> {
        if corpus.words().is_empty() && corpus.phrases().is_empty() {
            return Err(GuardError::EngineUnavailable {
                engine: "fast",
                reason: "word list is empty".to_string(),
            });
        }
        Ok(Self {
            words: corpus.words().clone(),
            phrases: corpus.phrases().clone(),
            allowed: corpus.allowed().clone(),
        })
    }

    fn token_is_banned(&self, token: &str) -> bool {
        if self.words.contains(token) {
            return true;
        }
        !self.allowed.contains(token)
            && self
                .words
                .iter()
                .any(|w| w.chars().count() >= MIN_SUBSTRING_LEN && token.contains(w.as_str()))
    }
}

impl ProfanityEngine for FastEngine {
    fn name(&self) -> &'static str {
        "fast"
    }

    fn exists(&self, text: &str) -> bool {
        let folded = FoldedText::new(text);
        let tokens = folded.tokens();
        if tokens.iter().any(|t| self.token_is_banned(t)) {
            return true;
        }
        let joined = tokens.join(" ");
        self.phrases.iter().any(|p| contains_phrase(&joined, p))
    }

    fn censor(&self, text: &str) -> String {
        let folded = FoldedText::new(text);
        let ranges = folded
            .token_spans()
            .into_iter()
            .filter(|span| self.token_is_banned(&folded.folded[span.clone()]))
            .map(|span| folded.to_original(span))
            .collect();
        mask_ranges(text, ranges)
    }

    fn add_words(&mut self, words: &[String]) {
        for word in words.iter().map(|w| canonical_entry(w)) {
            if word.is_empty() {
                continue;
            }
            if word.contains(' ') {
                self.phrases.insert(word);
            } else {
                self.words.insert(word);
            }
        }
    }

    fn remove_words(&mut self, words: &[String]) {
        for word in words.iter().map(|w| canonical_entry(w)) {
            self.words.remove(&word);
            self.phrases.remove(&word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::LanguageTag;

    fn engine() -> FastEngine {
        let corpus = ProfanityCorpus::from_lists(
            LanguageTag::En,
            &["fuck", "ass", "shit"],
            &["go to hell"],
            &[],
        )
        .unwrap();
        FastEngine::new(&corpus).unwrap()
    }

    #[test]
    fn test_exact_and_substring_matches() {
        let engine = engine();
        assert!(engine.exists("what the FUCK"));
        assert!(engine.exists("fuckface"));
        assert!(engine.exists("you ass"));
        // Short words only match whole tokens
        assert!(!engine.exists("class assignment"));
        assert!(!engine.exists("hello world"));
    }

    #[test]
    fn test_allow_list_skips_substring_match() {
        let mut corpus =
            ProfanityCorpus::from_lists(LanguageTag::En, &["cock", "dick", "cunt"], &[], &[])
                .unwrap();
        for word in ["Hancock", "dickens", "dickinson", "scunthorpe"] {
            corpus.allow_word(word);
        }
        let engine = FastEngine::new(&corpus).unwrap();

        assert!(!engine.exists("John Hancock"));
        assert!(!engine.exists("Charles Dickens"));
        assert!(!engine.exists("Emily Dickinson"));
        assert!(!engine.exists("Scunthorpe United"));
        assert_eq!(engine.censor("Charles Dickens"), "Charles Dickens");
        // Exact tokens and other containing words still match
        assert!(engine.exists("what a dick"));
        assert!(engine.exists("dickface"));
    }

    #[test]
    fn test_phrase_match() {
        let engine = engine();
        assert!(engine.exists("Go to... HELL!"));
        assert!(!engine.exists("go to helsinki"));
    }

    #[test]
    fn test_censor_preserves_surroundings() {
        let engine = engine();
        assert_eq!(engine.censor("Oh Shit, really?"), "Oh ****, really?");
        assert_eq!(engine.censor("nothing here"), "nothing here");
    }

    #[test]
    fn test_add_and_remove_words() {
        let mut engine = engine();
        assert!(!engine.exists("foo"));
        engine.add_words(&["Foo".to_string()]);
        assert!(engine.exists("foo"));
        engine.remove_words(&["shit".to_string()]);
        assert!(!engine.exists("shit"));
    }

    #[test]
    fn test_empty_corpus_is_unavailable() {
        let corpus = ProfanityCorpus::empty(LanguageTag::En);
        assert!(matches!(
            FastEngine::new(&corpus),
            Err(GuardError::EngineUnavailable { engine: "fast", .. })
        ));
    }
}
