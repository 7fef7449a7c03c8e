//! The table controller (§4.9, C9): a superset of the list controller —
//! same chunked/virtualized data flow, with per-column formatting,
//! horizontal scrolling, and a full-row-highlight override instead of a
//! single formatted string per row.

pub mod cell;

pub use cell::{fit_cell, skip_chars, truncate_with_ellipsis, TableColumn};

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::data_source::Command;
use crate::error::ControllerError;
use crate::item::Item;
use crate::list::ListController;
use crate::message::Message;
use crate::style::Theme;
use crate::viewport::{ViewportConfig, ViewportState};

/// How a `ScrollColumnLeft`/`ScrollColumnRight` message steps a column's
/// horizontal offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalScrollMode {
    Character,
    Word,
    /// Falls back to a word-sized step; §4.9 leaves "smart" underspecified
    /// beyond "bigger than character, smaller than a full cell reset".
    Smart,
}

impl HorizontalScrollMode {
    fn step(self) -> usize {
        match self {
            HorizontalScrollMode::Character => 1,
            HorizontalScrollMode::Word | HorizontalScrollMode::Smart => 4,
        }
    }
}

/// Whether a horizontal scroll offset applies to every row or only the row
/// under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalScrollScope {
    CurrentRowOnly,
    AllRows,
}

pub struct TableController<T> {
    inner: ListController<T>,
    columns: Vec<TableColumn<T>>,
    column_offsets: Vec<usize>,
    scroll_mode: HorizontalScrollMode,
    scroll_scope: HorizontalScrollScope,
    /// When set, the cursor row's style overrides every column's own cell
    /// style rather than compositing with it (§4.9, S6).
    full_row_highlight: bool,
}

impl<T: Clone> TableController<T> {
    pub fn new(config: ViewportConfig, columns: Vec<TableColumn<T>>, placeholder_data: impl Fn(usize) -> T + 'static) -> Self {
        let column_count = columns.len();
        Self {
            inner: ListController::new(config, |_: &T| String::new(), placeholder_data),
            columns,
            column_offsets: vec![0; column_count],
            scroll_mode: HorizontalScrollMode::Character,
            scroll_scope: HorizontalScrollScope::AllRows,
            full_row_highlight: false,
        }
    }

    pub fn with_scroll_mode(mut self, mode: HorizontalScrollMode) -> Self {
        self.scroll_mode = mode;
        self
    }

    pub fn with_scroll_scope(mut self, scope: HorizontalScrollScope) -> Self {
        self.scroll_scope = scope;
        self
    }

    pub fn with_full_row_highlight(mut self, enabled: bool) -> Self {
        self.full_row_highlight = enabled;
        self
    }

    pub fn config(&self) -> &ViewportConfig {
        self.inner.config()
    }

    pub fn viewport(&self) -> &ViewportState {
        self.inner.viewport()
    }

    pub fn total_items(&self) -> usize {
        self.inner.total_items()
    }

    pub fn visible_items(&self) -> &[Item<T>] {
        self.inner.visible_items()
    }

    pub fn last_error(&self) -> Option<&ControllerError> {
        self.inner.last_error()
    }

    pub fn columns(&self) -> &[TableColumn<T>] {
        &self.columns
    }

    pub fn update(&mut self, message: Message<T>) -> Option<Command> {
        match message {
            Message::ScrollColumnLeft { column } => {
                if let Some(offset) = self.column_offsets.get_mut(column) {
                    *offset = offset.saturating_sub(self.scroll_mode.step());
                }
                None
            }
            Message::ScrollColumnRight { column } => {
                if let Some(offset) = self.column_offsets.get_mut(column) {
                    *offset += self.scroll_mode.step();
                }
                None
            }
            Message::SetColumnWidth { column, width } => {
                if let Some(col) = self.columns.get_mut(column) {
                    col.width = width;
                }
                None
            }
            other => self.inner.update(other),
        }
    }

    fn cell_text(&self, column_index: usize, column: &TableColumn<T>, item: &Item<T>, is_cursor_row: bool) -> String {
        let raw = column.format(&item.data);
        let applies = self.scroll_scope == HorizontalScrollScope::AllRows || is_cursor_row;
        let offset = if applies { self.column_offsets.get(column_index).copied().unwrap_or(0) } else { 0 };
        let scrolled = skip_chars(&raw, offset);
        fit_cell(&scrolled, column.width as usize)
    }

    pub fn header_line(&self) -> Line<'static> {
        let spans = self
            .columns
            .iter()
            .map(|col| Span::raw(fit_cell(&col.header, col.width as usize)))
            .collect::<Vec<_>>();
        Line::from(spans)
    }

    /// Renders the visible window as styled lines — table cells carry
    /// per-column style, unlike the plain-string list/tree `view`.
    pub fn view_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let cursor_offset = self.viewport().cursor_viewport_index;
        self.visible_items()
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                let is_cursor = offset == cursor_offset;
                let spans = self
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(i, col)| {
                        let text = self.cell_text(i, col, item, is_cursor);
                        let style = self.cell_style(col, item, is_cursor, theme);
                        Span::styled(text, style)
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            })
            .collect()
    }

    fn cell_style(&self, column: &TableColumn<T>, item: &Item<T>, is_cursor: bool, theme: &Theme) -> Style {
        if is_cursor && self.full_row_highlight {
            return theme.full_row_cursor_style;
        }
        if item.loading {
            return theme.loading_style;
        }
        if item.error.is_some() {
            return theme.error_style;
        }
        if item.selected {
            return theme.selected_style;
        }
        column.style_for(&item.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::VecDataSource;

    #[derive(Clone)]
    struct Row {
        name: String,
        status: String,
    }

    fn table() -> TableController<Row> {
        let columns = vec![
            TableColumn::new("name", "Name", 6, |r: &Row| r.name.clone()),
            TableColumn::new("status", "Status", 6, |r: &Row| r.status.clone()),
        ];
        TableController::new(
            ViewportConfig { height: 3, chunk_size: 10, ..ViewportConfig::default() },
            columns,
            |_| Row { name: "...".to_string(), status: "...".to_string() },
        )
    }

    fn row(name: &str, status: &str) -> Row {
        Row { name: name.to_string(), status: status.to_string() }
    }

    #[test]
    fn header_line_respects_column_widths() {
        let t = table();
        let line = t.header_line();
        assert_eq!(line.spans[0].content.as_ref(), "Name  ");
        assert_eq!(line.spans[1].content.as_ref(), "Status");
    }

    #[test]
    fn long_cell_truncates_to_column_width() {
        let source = VecDataSource::new(vec![row("alexandria", "open")]);
        let mut t = table();
        t.update(Message::DataTotal { total: source.total() });
        let request = crate::data_source::DataRequest::new(0, 10);
        let items = source.fetch(&request);
        t.update(Message::DataChunkLoaded { start: 0, items, request });
        let text = t.cell_text(0, &t.columns[0], &t.visible_items()[0], false);
        assert_eq!(text, "alexa…");
    }

    /// S6 — full-row highlight overrides per-column style.
    #[test]
    fn full_row_highlight_overrides_column_style() {
        let mut t = table().with_full_row_highlight(true);
        let theme = Theme::default();
        let item = Item::new("1", row("a", "b"));
        let style = t.cell_style(&t.columns[0], &item, true, &theme);
        assert_eq!(style, theme.full_row_cursor_style);
        let style_off_cursor = t.cell_style(&t.columns[0], &item, false, &theme);
        assert_ne!(style_off_cursor, theme.full_row_cursor_style);
    }

    #[test]
    fn scroll_column_right_shifts_visible_text() {
        let mut t = table();
        t.update(Message::ScrollColumnRight { column: 0 });
        let item = Item::new("1", row("alexandria", "open"));
        let text = t.cell_text(0, &t.columns[0], &item, true);
        assert_eq!(text, "lexan…");
    }
}
