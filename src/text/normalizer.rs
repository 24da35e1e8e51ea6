//! Display-stable text normalization.

use std::time::Duration;

use unicode_normalization::UnicodeNormalization;

use super::diacritics::fold_char;
use crate::cache::{BoundedCache, EvictionPolicy};

pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Zero-width and invisible characters stripped before comparison.
const INVISIBLE_CHARS: &[char] = &[
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{200E}', // LTR mark
    '\u{200F}', // RTL mark
    '\u{2060}', // word joiner
    '\u{FEFF}', // BOM
    '\u{00AD}', // soft hyphen
    '\u{034F}', // combining grapheme joiner
    '\u{180E}', // Mongolian vowel separator
];

fn is_invisible(c: char) -> bool {
    INVISIBLE_CHARS.contains(&c) || (c.is_control() && !c.is_whitespace())
}

fn is_latin_extended(c: char) -> bool {
    matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace() || is_latin_extended(c)
}

/// Canonicalizes text into a comparison-stable form without caching.
///
/// NFC, invisible stripping, lowercase, diacritic folding, symbol-to-space,
/// whitespace collapse. The result is a fixed point: normalizing it again
/// returns it unchanged.
pub fn normalize_uncached(text: &str) -> String {
    let stripped: String = text.nfc().filter(|&c| !is_invisible(c)).collect();

    // Lowercasing can emit combining sequences, so recompose afterwards.
    let lowered: String = stripped.to_lowercase().nfc().collect();

    let replaced: String = lowered
        .chars()
        .map(|c| fold_char(c).unwrap_or(c))
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cached normalizer. Cache keys are the raw input text.
pub struct TextNormalizer {
    cache: BoundedCache<String, String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

impl TextNormalizer {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: BoundedCache::new(capacity, EvictionPolicy::Lru, Some(ttl)),
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        if let Some(hit) = self.cache.get(&text.to_string()) {
            return hit;
        }
        let normalized = normalize_uncached(text);
        self.cache.insert(text.to_string(), normalized.clone());
        normalized
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
