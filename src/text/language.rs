//! Character-density language heuristic.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::diacritics::is_vietnamese_char;

/// Minimum visible characters before Vietnamese can be reported.
const MIN_VISIBLE_CHARS: usize = 5;
/// Share of Vietnamese accented letters above which text is Vietnamese.
const VI_DENSITY_THRESHOLD: f64 = 0.1;

/// Language a corpus belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    En,
    Vi,
    /// No preference: consult every corpus.
    Unspecified,
}

impl LanguageTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::En => "en",
            LanguageTag::Vi => "vi",
            LanguageTag::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies text as Vietnamese or English.
///
/// Returns `Vi` when more than five non-whitespace characters are present
/// and over 10% of them are Vietnamese accented letters; `En` otherwise.
/// Never returns `Unspecified`.
pub fn detect_language(text: &str) -> LanguageTag {
    let mut visible = 0usize;
    let mut matches = 0usize;

    for c in text.nfc().filter(|c| !c.is_whitespace()) {
        visible += 1;
        if is_vietnamese_char(c) {
            matches += 1;
        }
    }

    if visible > MIN_VISIBLE_CHARS && (matches as f64 / visible as f64) > VI_DENSITY_THRESHOLD {
        LanguageTag::Vi
    } else {
        LanguageTag::En
    }
}
