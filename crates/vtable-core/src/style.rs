//! Glyphs and styling defaults (§6). ANSI styling *primitives* are a host
//! concern, but a row composer that cannot hand back anything styled isn't
//! useful as a library — `ratatui::style::Style` is the one styling type
//! this crate depends on, matching the teacher's own styling primitive.

use ratatui::style::{Color, Modifier, Style};

/// The glyph table from §6, overridable per controller.
#[derive(Debug, Clone)]
pub struct Glyphs {
    pub cursor: String,
    pub expanded: String,
    pub collapsed: String,
    pub leaf: String,
    pub check_selected: String,
    pub check_unselected: String,
    pub error: String,
    pub loading: String,
    pub disabled: String,
    pub selected: String,
    pub border_vertical: String,
    pub border_horizontal: String,
    pub border_top_left: String,
    pub border_top_right: String,
    pub border_bottom_left: String,
    pub border_bottom_right: String,
    pub border_t_down: String,
    pub border_t_up: String,
    pub border_t_right: String,
    pub border_t_left: String,
    pub border_cross: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            cursor: "► ".to_string(),
            expanded: "▼".to_string(),
            collapsed: "▶".to_string(),
            leaf: "•".to_string(),
            check_selected: "[✓]".to_string(),
            check_unselected: "[ ]".to_string(),
            error: "❌".to_string(),
            loading: "⏳".to_string(),
            disabled: "🚫".to_string(),
            selected: "✅".to_string(),
            border_vertical: "│".to_string(),
            border_horizontal: "─".to_string(),
            border_top_left: "┌".to_string(),
            border_top_right: "┐".to_string(),
            border_bottom_left: "└".to_string(),
            border_bottom_right: "┘".to_string(),
            border_t_down: "┬".to_string(),
            border_t_up: "┴".to_string(),
            border_t_right: "├".to_string(),
            border_t_left: "┤".to_string(),
            border_cross: "┼".to_string(),
        }
    }
}

/// Glyphs plus the styles the row composer applies for cursor, selection,
/// error, loading, and disabled rows.
#[derive(Debug, Clone)]
pub struct Theme {
    pub glyphs: Glyphs,
    pub cursor_style: Style,
    pub selected_style: Style,
    pub error_style: Style,
    pub loading_style: Style,
    pub disabled_style: Style,
    /// Used by the table controller's full-row-highlight mode (§4.9).
    pub full_row_cursor_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            glyphs: Glyphs::default(),
            cursor_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected_style: Style::default().fg(Color::Green),
            error_style: Style::default().fg(Color::Red),
            loading_style: Style::default().fg(Color::DarkGray),
            disabled_style: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            full_row_cursor_style: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}
