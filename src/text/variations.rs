//! Evasion-surface expansion for building detection patterns.

/// Leet substitutes per letter.
pub const LEET_SUBSTITUTES: &[(char, &[char])] = &[
    ('a', &['@', '4']),
    ('e', &['3']),
    ('i', &['1', '!']),
    ('o', &['0']),
    ('s', &['$', '5']),
    ('t', &['7']),
    ('g', &['9']),
];

const SPACING_SEPARATORS: &[&str] = &[" ", ".", "-"];

/// Expands a word into the forms people type to dodge a literal match.
///
/// The original word comes first, then one variant per leet substitute
/// (every occurrence of that letter replaced, one letter class at a time),
/// then the word with a space, period or hyphen between every character.
/// Output is de-duplicated and keeps first-seen order.
pub fn word_variations(word: &str) -> Vec<String> {
    let word = word.to_lowercase();
    let mut variations = vec![word.clone()];

    for &(letter, substitutes) in LEET_SUBSTITUTES {
        if !word.contains(letter) {
            continue;
        }
        for &substitute in substitutes {
            variations.push(word.replace(letter, &substitute.to_string()));
        }
    }

    let chars: Vec<String> = word.chars().map(String::from).collect();
    if chars.len() > 1 {
        for separator in SPACING_SEPARATORS {
            variations.push(chars.join(separator));
        }
    }

    let mut seen = std::collections::HashSet::new();
    variations.retain(|v| !v.is_empty() && seen.insert(v.clone()));
    variations
}
