//! Concrete row components (§4.10). Each one owns exactly one fragment slot;
//! none of them know about each other.

use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use super::{ComponentKind, PostComponent, RowComponent, RowContext, RowFragments};

/// Draws the cursor glyph on the active row, two spaces of padding otherwise.
pub struct CursorComponent;

impl<T> RowComponent<T> for CursorComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Cursor
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        true
    }

    fn render(&self, ctx: &RowContext<T>) -> String {
        if ctx.is_cursor {
            ctx.theme.glyphs.cursor.clone()
        } else {
            " ".repeat(ctx.theme.glyphs.cursor.width())
        }
    }
}

/// A fixed run of spaces before the row's structural content.
pub struct PreSpacingComponent(pub usize);

impl<T> RowComponent<T> for PreSpacingComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::PreSpacing
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        self.0 > 0
    }

    fn render(&self, _ctx: &RowContext<T>) -> String {
        " ".repeat(self.0)
    }
}

/// Two spaces of indentation per tree depth.
pub struct IndentComponent {
    pub width_per_level: usize,
}

impl<T> RowComponent<T> for IndentComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Indent
    }

    fn is_enabled(&self, ctx: &RowContext<T>) -> bool {
        ctx.depth > 0
    }

    fn render(&self, ctx: &RowContext<T>) -> String {
        " ".repeat(ctx.depth * self.width_per_level)
    }
}

/// A zero-padded 1-based row number, `width`-digits wide.
pub struct RowNumberComponent {
    pub width: usize,
}

impl<T> RowComponent<T> for RowNumberComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::RowNumber
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        true
    }

    fn render(&self, ctx: &RowContext<T>) -> String {
        format!("{:>width$} ", ctx.index + 1, width = self.width)
    }
}

/// The selection checkbox glyph.
pub struct SelectionMarkerComponent;

impl<T> RowComponent<T> for SelectionMarkerComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::SelectionMarker
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        true
    }

    fn render(&self, ctx: &RowContext<T>) -> String {
        let glyph = if ctx.item.selected {
            &ctx.theme.glyphs.check_selected
        } else {
            &ctx.theme.glyphs.check_unselected
        };
        format!("{glyph} ")
    }
}

/// Expand/collapse/leaf glyph, tree mode only.
pub struct TreeSymbolComponent;

impl<T> RowComponent<T> for TreeSymbolComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::TreeSymbol
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        true
    }

    fn render(&self, ctx: &RowContext<T>) -> String {
        let glyph = if !ctx.has_children {
            &ctx.theme.glyphs.leaf
        } else if ctx.is_expanded {
            &ctx.theme.glyphs.expanded
        } else {
            &ctx.theme.glyphs.collapsed
        };
        format!("{glyph} ")
    }
}

/// Numbering/bulleting styles a list or tree row may be enumerated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumeratorStyle {
    Bullet,
    Arabic,
    Roman,
    Alphabet,
    Checkbox,
    None,
}

/// Renders `ctx.enumerator_index` per `style`, right-padded to
/// `ctx.enumerator_width_hint` characters of content.
pub struct EnumeratorComponent {
    pub style: EnumeratorStyle,
}

impl EnumeratorComponent {
    fn roman(mut n: usize) -> String {
        if n == 0 {
            return "0".to_string();
        }
        const TABLE: &[(usize, &str)] = &[
            (1000, "M"), (900, "CM"), (500, "D"), (400, "CD"), (100, "C"), (90, "XC"),
            (50, "L"), (40, "XL"), (10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I"),
        ];
        let mut out = String::new();
        for &(value, symbol) in TABLE {
            while n >= value {
                out.push_str(symbol);
                n -= value;
            }
        }
        out
    }

    fn alphabet(mut n: usize) -> String {
        let mut out = Vec::new();
        loop {
            out.push((b'a' + (n % 26) as u8) as char);
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        out.iter().rev().collect()
    }
}

impl<T> RowComponent<T> for EnumeratorComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Enumerator
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        self.style != EnumeratorStyle::None
    }

    fn render(&self, ctx: &RowContext<T>) -> String {
        let label = match self.style {
            EnumeratorStyle::Bullet => "•".to_string(),
            EnumeratorStyle::Arabic => (ctx.enumerator_index + 1).to_string(),
            EnumeratorStyle::Roman => Self::roman(ctx.enumerator_index + 1),
            EnumeratorStyle::Alphabet => Self::alphabet(ctx.enumerator_index),
            EnumeratorStyle::Checkbox => {
                if ctx.item.selected {
                    ctx.theme.glyphs.check_selected.clone()
                } else {
                    ctx.theme.glyphs.check_unselected.clone()
                }
            }
            EnumeratorStyle::None => String::new(),
        };
        format!("{:<width$} ", label, width = ctx.enumerator_width_hint)
    }
}

/// The payload text itself, or the loading/error/disabled glyph in its place.
pub struct ContentComponent;

impl<T> RowComponent<T> for ContentComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Content
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        true
    }

    fn render(&self, ctx: &RowContext<T>) -> String {
        if ctx.item.loading {
            format!("{} {}", ctx.theme.glyphs.loading, ctx.content)
        } else if let Some(error) = &ctx.item.error {
            format!("{} {error}", ctx.theme.glyphs.error)
        } else if ctx.item.disabled {
            format!("{} {}", ctx.theme.glyphs.disabled, ctx.content)
        } else {
            ctx.content.clone()
        }
    }

    fn style(&self, ctx: &RowContext<T>) -> Style {
        if ctx.item.loading {
            ctx.theme.loading_style
        } else if ctx.item.error.is_some() {
            ctx.theme.error_style
        } else if ctx.item.disabled {
            ctx.theme.disabled_style
        } else {
            Style::default()
        }
    }
}

/// A fixed run of spaces after the row's content.
pub struct PostSpacingComponent(pub usize);

impl<T> RowComponent<T> for PostSpacingComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::PostSpacing
    }

    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        self.0 > 0
    }

    fn render(&self, _ctx: &RowContext<T>) -> String {
        " ".repeat(self.0)
    }
}

/// Second-pass: patches `theme.cursor_style` (or `theme.selected_style` for
/// a non-cursor selected row) onto every fragment already emitted, so the
/// cursor/selection highlight actually reaches the rendered `Line` instead
/// of only ever showing up as a glyph.
pub struct BackgroundComponent;

impl<T> PostComponent<T> for BackgroundComponent {
    fn is_enabled(&self, ctx: &RowContext<T>) -> bool {
        ctx.is_cursor || ctx.item.selected
    }

    fn apply(&self, ctx: &RowContext<T>, fragments: &mut RowFragments) {
        let highlight = if ctx.is_cursor { ctx.theme.cursor_style } else { ctx.theme.selected_style };
        for (_, span) in &mut fragments.fragments {
            span.style = span.style.patch(highlight);
        }
    }
}

/// Second-pass: surrounds the row with vertical border glyphs, table mode.
pub struct BorderComponent;

impl<T> PostComponent<T> for BorderComponent {
    fn is_enabled(&self, _ctx: &RowContext<T>) -> bool {
        true
    }

    fn apply(&self, ctx: &RowContext<T>, fragments: &mut RowFragments) {
        let border = ctx.theme.glyphs.border_vertical.clone();
        fragments.fragments.insert(0, (ComponentKind::Border, Span::raw(border.clone())));
        fragments.fragments.push((ComponentKind::Border, Span::raw(border)));
    }
}
