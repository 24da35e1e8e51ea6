//! Evasion-resistant form used right before profanity checks.

use unicode_normalization::UnicodeNormalization;

/// Run length at which a repeated character collapses to one.
const STRETCH_RUN: usize = 4;

fn unleet(c: char) -> char {
    match c {
        '@' | '4' => 'a',
        '8' => 'b',
        '3' => 'e',
        '9' => 'g',
        '1' | '!' | '|' => 'i',
        '0' => 'o',
        '$' | '5' => 's',
        '7' | '+' => 't',
        other => other,
    }
}

fn collapse_stretched(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let mut out = String::with_capacity(token.len());
    let mut i = 0;
    while i < chars.len() {
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == chars[i] {
            run += 1;
        }
        let keep = if run >= STRETCH_RUN { 1 } else { run };
        out.extend(std::iter::repeat_n(chars[i], keep));
        i += run;
    }
    out
}

/// Maps text into the form profanity engines compare against.
///
/// NFKC, lowercase, then per whitespace token: undo leet digits and symbols,
/// drop anything that is not a letter or digit, and collapse runs of four or
/// more identical characters. When every surviving token is a single
/// character and there are several of them, the tokens are joined without
/// spaces ("f u c k" becomes "fuck"). Short initials such as "a b c" are
/// joined the same way.
pub fn normalize_profanity(text: &str) -> String {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();

    let tokens: Vec<String> = folded
        .split_whitespace()
        .map(|token| {
            let cleaned: String = token
                .chars()
                .map(unleet)
                .filter(|c| c.is_alphanumeric())
                .collect();
            collapse_stretched(&cleaned)
        })
        .filter(|token| !token.is_empty())
        .collect();

    let all_single = tokens.iter().all(|t| t.chars().count() == 1);
    if tokens.len() > 1 && all_single {
        tokens.concat()
    } else {
        tokens.join(" ")
    }
}
