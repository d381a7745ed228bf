/// Glyph used in place of a literal space so it renders visibly
pub const EXPLICIT_SPACE: char = '␣';

/// Word-edge characters shared by the lockout check, the recovery reset scan
/// and the line wrapper. A single set keeps the three in agreement.
pub fn is_boundary(c: char) -> bool {
    c == EXPLICIT_SPACE || c == ' ' || matches!(c, '.' | ',' | ':' | ';' | '!' | '?')
}

/// The text currently being typed. Immutable once created; a new unit
/// replaces it entirely when the feed advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingUnit {
    /// Seed counter, used to guard stale recovery timers
    pub id: u64,
    /// Original entry text, before normalization
    pub headword: String,
    pub display_text: String,
    pub is_article: bool,
}

impl TypingUnit {
    pub fn new(id: u64, headword: &str, is_article: bool, hide_punctuation: bool) -> Self {
        Self {
            id,
            headword: headword.to_string(),
            display_text: normalize(headword, is_article, hide_punctuation),
            is_article,
        }
    }

    pub fn chars(&self) -> Vec<char> {
        self.display_text.chars().collect()
    }

    pub fn len(&self) -> usize {
        self.display_text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.display_text.is_empty()
    }
}

/// Spaces become the explicit-space glyph, ellipses collapse to two dots, and
/// article units can optionally drop punctuation entirely. Anything that
/// cannot be normalized degrades to an empty string rather than an error.
pub fn normalize(headword: &str, is_article: bool, hide_punctuation: bool) -> String {
    let mut text: String = headword
        .trim()
        .chars()
        .map(|c| if c == ' ' { EXPLICIT_SPACE } else { c })
        .collect();

    text = text.replace('…', "..");

    if is_article && hide_punctuation {
        text.retain(|c| {
            !matches!(
                c,
                '.' | ','
                    | ':'
                    | ';'
                    | '!'
                    | '?'
                    | '"'
                    | '\''
                    | '('
                    | ')'
                    | '['
                    | ']'
                    | '{'
                    | '}'
                    | '-'
                    | '—'
            )
        });
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_spaces() {
        assert_eq!(normalize("cat dog", false, false), "cat␣dog");
    }

    #[test]
    fn test_normalize_ellipsis() {
        assert_eq!(normalize("wait…", false, false), "wait..");
    }

    #[test]
    fn test_normalize_strips_punctuation_in_articles() {
        assert_eq!(
            normalize("Hello, world!", true, true),
            "Hello␣world"
        );
    }

    #[test]
    fn test_normalize_keeps_punctuation_outside_articles() {
        assert_eq!(normalize("Hello, world!", false, true), "Hello,␣world!");
    }

    #[test]
    fn test_normalize_empty_degrades() {
        assert_eq!(normalize("   ", false, false), "");
    }

    #[test]
    fn test_boundary_set() {
        assert!(is_boundary(EXPLICIT_SPACE));
        assert!(is_boundary(' '));
        assert!(is_boundary('.'));
        assert!(is_boundary(','));
        assert!(is_boundary('?'));
        assert!(!is_boundary('a'));
        assert!(!is_boundary('\''));
    }

    #[test]
    fn test_unit_len_counts_chars_not_bytes() {
        let unit = TypingUnit::new(1, "a b", false, false);
        assert_eq!(unit.display_text, "a␣b");
        assert_eq!(unit.len(), 3);
    }
}
