//! Greedy word wrap against the static font tables.

use crate::layout::font_metrics::FontMetricTable;

/// Breaks `text` into lines no wider than `max_width_pt` at `size_pt`.
///
/// Whitespace runs collapse to a single space. A word wider than the line
/// gets a line of its own rather than being split.
pub fn wrap_lines(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;
    let space_w = metrics.space_width() * size_pt;

    for word in text.split_whitespace() {
        let word_w = metrics.width_pt(word, size_pt);

        if !current.is_empty() && current_width + space_w + word_w > max_width_pt {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            if !current.is_empty() {
                current.push(' ');
                current_width += space_w;
            }
            current.push_str(word);
            current_width += word_w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, Font};

    fn helvetica() -> &'static FontMetricTable {
        get_metrics(Font::Helvetica)
    }

    #[test]
    fn test_wrap_empty_returns_no_lines() {
        assert!(wrap_lines("", helvetica(), 9.0, 500.0).is_empty());
        assert!(wrap_lines("   \n ", helvetica(), 9.0, 500.0).is_empty());
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let lines = wrap_lines("Built  a\tthing", helvetica(), 9.0, 500.0);
        assert_eq!(lines, vec!["Built a thing".to_string()]);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let text = "Designed and shipped a streaming ingestion pipeline that cut nightly \
                    batch latency from hours to minutes across every regional deployment";
        let width = 200.0;
        let lines = wrap_lines(text, helvetica(), 9.0, width);
        assert!(lines.len() > 1, "expected wrapping, got {lines:?}");
        for line in &lines {
            assert!(helvetica().width_pt(line, 9.0) <= width, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_oversized_word_gets_own_line() {
        let lines = wrap_lines("a supercalifragilistic b", helvetica(), 12.0, 40.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }
}
