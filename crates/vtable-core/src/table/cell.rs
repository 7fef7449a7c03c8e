//! Column definitions and cell text shaping (§4.9, C9). Truncation is
//! grapheme-width aware, not byte-width — a table that chopped a row mid
//! multi-byte character would be worse than one that didn't fit at all.

use ratatui::style::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// One table column: how to read a cell's text (and optionally its style)
/// out of a row's payload, plus its current display width.
pub struct TableColumn<T> {
    pub key: String,
    pub header: String,
    pub width: u16,
    formatter: Box<dyn Fn(&T) -> String>,
    style: Box<dyn Fn(&T) -> Style>,
}

impl<T> TableColumn<T> {
    pub fn new(key: impl Into<String>, header: impl Into<String>, width: u16, formatter: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            width,
            formatter: Box::new(formatter),
            style: Box::new(|_| Style::default()),
        }
    }

    pub fn with_style(mut self, style: impl Fn(&T) -> Style + 'static) -> Self {
        self.style = Box::new(style);
        self
    }

    pub fn format(&self, data: &T) -> String {
        (self.formatter)(data)
    }

    pub fn style_for(&self, data: &T) -> Style {
        (self.style)(data)
    }
}

/// Truncates `text` to `max_width` *display columns* (not chars, not bytes),
/// appending `…` when truncation happens, grounded on the same ellipsis
/// convention the row composer's loading/error glyphs use (§6).
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let target = max_width - 1;
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        width += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Pads or truncates `text` to exactly `width` display columns (§4.9 "width
/// discipline" — every cell occupies exactly its column's width, never more,
/// never less).
pub fn fit_cell(text: &str, width: usize) -> String {
    let truncated = truncate_with_ellipsis(text, width);
    let pad = width.saturating_sub(truncated.width());
    format!("{truncated}{}", " ".repeat(pad))
}

/// Skips `offset` characters into `text` for horizontal scrolling. Character
/// granularity, not display-column granularity — good enough for the ASCII
/// and single-width content table cells typically hold, and far simpler than
/// tracking scroll position in display columns against variable-width text.
pub fn skip_chars(text: &str, offset: usize) -> String {
    text.chars().skip(offset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_with_ellipsis("hi", 10), "hi");
    }

    /// S5 — exact-width ellipsis truncation.
    #[test]
    fn long_text_truncates_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello w…");
        assert_eq!(truncate_with_ellipsis("hello world", 8).width(), 8);
    }

    #[test]
    fn fit_cell_pads_short_text_to_width() {
        assert_eq!(fit_cell("hi", 5), "hi   ");
    }

    #[test]
    fn zero_width_truncation_yields_empty_string() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
    }

    #[test]
    fn single_width_truncation_yields_bare_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
    }
}
