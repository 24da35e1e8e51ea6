//! Vietnamese diacritic folding.

/// Accented lowercase letters grouped by the base Latin letter they fold to.
const FOLD_GROUPS: &[(&str, char)] = &[
    ("àáảãạăằắẳẵặâầấẩẫậ", 'a'),
    ("èéẻẽẹêềếểễệ", 'e'),
    ("ìíỉĩị", 'i'),
    ("òóỏõọôồốổỗộơờớởỡợ", 'o'),
    ("ùúủũụưừứửữự", 'u'),
    ("ỳýỷỹỵ", 'y'),
    ("đ", 'd'),
];

/// Maps a lowercase Vietnamese accented letter to its base letter.
pub fn fold_char(c: char) -> Option<char> {
    FOLD_GROUPS
        .iter()
        .find(|(accented, _)| accented.contains(c))
        .map(|&(_, base)| base)
}

/// True for any Vietnamese accented letter, either case.
pub fn is_vietnamese_char(c: char) -> bool {
    c.to_lowercase().any(|lower| fold_char(lower).is_some())
}

/// Folds every accented Vietnamese letter to base Latin; other characters pass through.
pub fn fold_diacritics(text: &str) -> String {
    text.chars().map(|c| fold_char(c).unwrap_or(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_tone_marks() {
        assert_eq!(fold_diacritics("xin chào các bạn"), "xin chao cac ban");
        assert_eq!(fold_diacritics("đường phố"), "duong pho");
        assert_eq!(fold_diacritics("tiếng việt"), "tieng viet");
    }

    #[test]
    fn test_plain_ascii_untouched() {
        assert_eq!(fold_diacritics("hello world"), "hello world");
    }

    #[test]
    fn test_vietnamese_char_class() {
        assert!(is_vietnamese_char('ạ'));
        assert!(is_vietnamese_char('Đ'));
        assert!(is_vietnamese_char('Ữ'));
        assert!(!is_vietnamese_char('a'));
        assert!(!is_vietnamese_char('ñ'));
    }
}
