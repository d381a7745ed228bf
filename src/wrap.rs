use crate::unit::is_boundary;

/// One display line of a wrapped unit. Concatenating every `text` in order
/// reconstructs the display text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    pub text: String,
    /// Offset of the line's first character into the display text
    pub start_index: usize,
}

impl WrappedLine {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Offset one past the line's last character
    pub fn end_index(&self) -> usize {
        self.start_index + self.len()
    }
}

/// Fixed-width character approximation: monospace glyphs run about 0.6 of
/// the font size, the text column takes 60% of the window capped at 1000px,
/// and 95% of that column is usable.
pub fn max_chars_per_line(window_width_px: f64, font_size_px: f64) -> usize {
    let char_width = font_size_px * 0.6;
    if char_width <= 0.0 {
        return 1;
    }
    let container = (window_width_px * 0.6).min(1000.0);
    let available = container * 0.95;
    ((available / char_width).floor() as usize).max(1)
}

/// Greedy word-boundary-aware wrap. Non-article units always come back as a
/// single line holding the full text.
pub fn wrap_lines(text: &str, max_chars: usize, is_article: bool) -> Vec<WrappedLine> {
    if !is_article {
        return vec![WrappedLine {
            text: text.to_string(),
            start_index: 0,
        }];
    }

    let chars: Vec<char> = text.chars().collect();
    let max = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = 0;

    while current < chars.len() {
        let mut end = (current + max).min(chars.len());

        if end < chars.len() && !is_boundary(chars[end]) {
            // tentative cut lands mid-word
            end = balance_cut(&chars, current, end, max);
        }

        lines.push(WrappedLine {
            text: chars[current..end].iter().collect(),
            start_index: current,
        });
        current = end;
    }

    lines
}

/// Pick a better cut point around `end`, trading line utilization against
/// keeping words whole.
fn balance_cut(chars: &[char], current: usize, end: usize, max: usize) -> usize {
    let backward = (current + 1..end)
        .rev()
        .find(|&i| is_boundary(chars[i]))
        .map(|i| i + 1);

    if let Some(back) = backward {
        let utilization = (back - current) as f64 / max as f64;
        if utilization >= 0.5 {
            return back;
        }

        // low utilization: look ahead up to 30% past the limit
        let search_limit = (end + (max as f64 * 0.3) as usize).min(chars.len());
        let forward = (end..search_limit)
            .find(|&i| is_boundary(chars[i]))
            .map(|i| i + 1);

        return match forward {
            Some(fwd) if (fwd - current) as f64 <= max as f64 * 1.2 => fwd,
            _ => back,
        };
    }

    // no boundary behind us at all: the line starts inside one long word
    let word_end = (current..chars.len())
        .find(|&i| is_boundary(chars[i]))
        .map(|i| i + 1)
        .unwrap_or(chars.len());

    if (word_end - current) as f64 > max as f64 * 1.5 {
        // over-long run, force a mid-word cut
        (current + max).min(chars.len())
    } else {
        word_end.min(chars.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(lines: &[WrappedLine]) -> String {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_non_article_single_line() {
        let lines = wrap_lines("hello world", 3, false);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "hello world");
        assert_eq!(lines[0].start_index, 0);
    }

    #[test]
    fn test_roundtrip_simple() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_lines(text, 10, true);
        assert!(lines.len() > 1);
        assert_eq!(reassemble(&lines), text);
    }

    #[test]
    fn test_roundtrip_various_widths() {
        let text = "a short sentence here, followed by quite a few more words. done!";
        for max in 1..30 {
            let lines = wrap_lines(text, max, true);
            assert_eq!(reassemble(&lines), text, "width {max}");
            for pair in lines.windows(2) {
                assert_eq!(pair[0].end_index(), pair[1].start_index);
            }
        }
    }

    #[test]
    fn test_backward_break_with_good_utilization() {
        // cut at 10 lands inside "sentence"; breaking after "a short "
        // keeps 80% of the line used
        let lines = wrap_lines("a short sentence here", 10, true);
        assert_eq!(lines[0].text, "a short ");
        assert_eq!(lines[1].start_index, 8);
    }

    #[test]
    fn test_forward_search_on_low_utilization() {
        // backward break would keep only "ab " (30%); the forward boundary
        // after "cdefghij" is within 120% so the line extends instead
        let lines = wrap_lines("ab cdefghij mn", 10, true);
        assert_eq!(lines[0].text, "ab cdefghij ");
        assert_eq!(reassemble(&lines), "ab cdefghij mn");
    }

    #[test]
    fn test_forward_search_falls_back_when_too_far() {
        // forward boundary is beyond 120% of the limit, so the backward
        // break wins despite poor utilization
        let text = "ab cdefghijklmnopq st";
        let lines = wrap_lines(text, 10, true);
        assert_eq!(lines[0].text, "ab ");
        assert_eq!(reassemble(&lines), text);
    }

    #[test]
    fn test_overlong_word_is_swallowed_when_reasonable() {
        // 13-char word from line start: under 150% of the limit, keep the
        // whole word (and its trailing boundary) on the line
        let text = "abcdefghijklm no";
        let lines = wrap_lines(text, 10, true);
        assert_eq!(lines[0].text, "abcdefghijklm ");
        assert_eq!(reassemble(&lines), text);
    }

    #[test]
    fn test_overlong_word_force_cut() {
        // a 20-char unbroken run against a 10-char limit exceeds 150%
        let text = "abcdefghijklmnopqrst";
        let lines = wrap_lines(text, 10, true);
        assert_eq!(lines[0].text, "abcdefghij");
        assert_eq!(lines[1].text, "klmnopqrst");
        assert_eq!(reassemble(&lines), text);
    }

    #[test]
    fn test_explicit_space_is_a_boundary() {
        let text = "cat␣dog␣and␣birds";
        let lines = wrap_lines(text, 8, true);
        assert_eq!(reassemble(&lines), text);
        assert!(lines[0].text.ends_with('␣'));
    }

    #[test]
    fn test_empty_article_text() {
        assert!(wrap_lines("", 10, true).is_empty());
    }

    #[test]
    fn test_max_chars_per_line_geometry() {
        // 1200px window: column = min(720, 1000) * 0.95 = 684px; 16px font
        // gives 9.6px glyphs -> 71 chars
        assert_eq!(max_chars_per_line(1200.0, 16.0), 71);
        // huge window clamps at the 1000px container
        assert_eq!(max_chars_per_line(10_000.0, 16.0), 98);
    }

    #[test]
    fn test_max_chars_per_line_degenerate() {
        assert_eq!(max_chars_per_line(10.0, 16.0), 1);
        assert_eq!(max_chars_per_line(1200.0, 0.0), 1);
    }
}
