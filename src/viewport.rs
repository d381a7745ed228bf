use crate::wrap::WrappedLine;
use std::ops::Range;

/// Lines shown at once in the typewriter window
pub const DEFAULT_VISIBLE_LINES: usize = 4;

/// Index of the wrapped line containing the typing cursor: the first line
/// whose end offset reaches the cursor, else the last line.
pub fn line_index_for(input_len: usize, lines: &[WrappedLine]) -> usize {
    for (i, line) in lines.iter().enumerate() {
        if input_len <= line.end_index() {
            return i;
        }
    }
    lines.len().saturating_sub(1)
}

/// Half-open range of visible lines, centered on the current line and
/// clamped so the window stays full while any lines remain below it.
pub fn visible_range(current_line: usize, visible_count: usize, total_lines: usize) -> Range<usize> {
    let half = visible_count / 2;
    let mut start = current_line.saturating_sub(half);
    let end = (start + visible_count).min(total_lines);

    if end == total_lines {
        start = end.saturating_sub(visible_count);
    }

    start..end
}
