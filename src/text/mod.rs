//! Text canonicalization, evasion variants and language detection.

mod diacritics;
mod language;
mod normalizer;
mod profanity_form;
mod variations;

pub use diacritics::{fold_diacritics, is_vietnamese_char};
pub use language::{detect_language, LanguageTag};
pub use normalizer::{normalize_uncached, TextNormalizer, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use profanity_form::normalize_profanity;
pub use variations::{word_variations, LEET_SUBSTITUTES};
