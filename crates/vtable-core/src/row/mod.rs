//! The row composer (§4.10, C10): an ordered pipeline of components that
//! each write one fragment into a shared, keyed map, followed by a second
//! pass where background/border components may re-emit the whole line.

pub mod components;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

pub use components::{
    BackgroundComponent, BorderComponent, ContentComponent, CursorComponent, EnumeratorComponent,
    EnumeratorStyle, IndentComponent, PostSpacingComponent, PreSpacingComponent,
    RowNumberComponent, SelectionMarkerComponent, TreeSymbolComponent,
};

use crate::item::Item;
use crate::style::Theme;

/// The component slots from §4.10, in their typical pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Cursor,
    PreSpacing,
    Indent,
    RowNumber,
    SelectionMarker,
    TreeSymbol,
    Enumerator,
    Content,
    PostSpacing,
    Background,
    Border,
}

/// Everything a component might need to read, gathered once per row.
pub struct RowContext<'a, T> {
    pub item: &'a Item<T>,
    pub index: usize,
    pub is_cursor: bool,
    pub depth: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    /// The already-formatted payload text (for lists: the single formatted
    /// string; for tables: the pre-joined cell string). The composer itself
    /// never knows how to stringify `T` — that's supplied by the caller.
    pub content: String,
    pub enumerator_index: usize,
    pub enumerator_width_hint: usize,
    pub theme: &'a Theme,
}

/// A single pipeline stage. Implementors write exactly one fragment, with
/// an optional style (cursor/selection highlighting is layered on top of
/// this by a [`PostComponent`], not decided here).
pub trait RowComponent<T> {
    fn kind(&self) -> ComponentKind;
    fn is_enabled(&self, ctx: &RowContext<T>) -> bool;
    fn render(&self, ctx: &RowContext<T>) -> String;
    fn style(&self, _ctx: &RowContext<T>) -> Style {
        Style::default()
    }
}

/// A fragment-ordered, append-only row under construction. Each fragment is
/// a real `ratatui` [`Span`], so post-pass components can patch styling in
/// place instead of only ever touching text (§6).
#[derive(Debug, Clone, Default)]
pub struct RowFragments {
    pub fragments: Vec<(ComponentKind, Span<'static>)>,
}

impl RowFragments {
    pub fn get(&self, kind: ComponentKind) -> Option<&str> {
        self.fragments.iter().find(|(k, _)| *k == kind).map(|(_, s)| s.content.as_ref())
    }

    pub fn set(&mut self, kind: ComponentKind, text: String, style: Style) {
        let span = Span::styled(text, style);
        if let Some(slot) = self.fragments.iter_mut().find(|(k, _)| *k == kind) {
            slot.1 = span;
        } else {
            self.fragments.push((kind, span));
        }
    }

    pub fn joined(&self) -> String {
        self.fragments.iter().map(|(_, s)| s.content.as_ref()).collect()
    }

    pub fn into_line(self) -> Line<'static> {
        Line::from(self.fragments.into_iter().map(|(_, s)| s).collect::<Vec<_>>())
    }
}

/// A second-pass component: reads all previously-emitted fragments and may
/// rewrite the whole row (background, border). Runs after every first-pass
/// component.
pub trait PostComponent<T> {
    fn is_enabled(&self, ctx: &RowContext<T>) -> bool;
    fn apply(&self, ctx: &RowContext<T>, fragments: &mut RowFragments);
}

/// The ordered pipeline itself. Component order is configurable — callers
/// build this with whatever stage list and ordering they need.
pub struct RowComposer<T> {
    components: Vec<Box<dyn RowComponent<T>>>,
    post: Vec<Box<dyn PostComponent<T>>>,
}

impl<T> Default for RowComposer<T> {
    fn default() -> Self {
        Self { components: Vec::new(), post: Vec::new() }
    }
}

impl<T> RowComposer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, component: Box<dyn RowComponent<T>>) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_post_component(mut self, component: Box<dyn PostComponent<T>>) -> Self {
        self.post.push(component);
        self
    }

    /// The default pipeline per §4.10's typical ordering, for plain list
    /// rendering (no tree/table-specific components).
    pub fn default_list_pipeline() -> Self {
        Self::new()
            .with_component(Box::new(CursorComponent))
            .with_component(Box::new(ContentComponent))
            .with_post_component(Box::new(BackgroundComponent))
    }

    pub fn compose(&self, ctx: &RowContext<T>) -> RowFragments {
        let mut fragments = RowFragments::default();
        for component in &self.components {
            if component.is_enabled(ctx) {
                fragments.set(component.kind(), component.render(ctx), component.style(ctx));
            }
        }
        for post in &self.post {
            if post.is_enabled(ctx) {
                post.apply(ctx, &mut fragments);
            }
        }
        fragments
    }

    pub fn compose_line(&self, ctx: &RowContext<T>) -> Line<'static> {
        self.compose(ctx).into_line()
    }

    pub fn compose_string(&self, ctx: &RowContext<T>) -> String {
        self.compose(ctx).joined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(item: &'a Item<i32>, theme: &'a Theme, is_cursor: bool) -> RowContext<'a, i32> {
        RowContext {
            item,
            index: 0,
            is_cursor,
            depth: 0,
            has_children: false,
            is_expanded: false,
            content: "hello".to_string(),
            enumerator_index: 0,
            enumerator_width_hint: 1,
            theme,
        }
    }

    #[test]
    fn default_pipeline_shows_cursor_glyph_only_on_cursor_row() {
        let theme = Theme::default();
        let item = Item::new("a", 1);
        let composer: RowComposer<i32> = RowComposer::default_list_pipeline();

        let cursor_row = composer.compose_string(&ctx(&item, &theme, true));
        let other_row = composer.compose_string(&ctx(&item, &theme, false));

        assert!(cursor_row.starts_with(theme.glyphs.cursor.trim_end()));
        assert!(!other_row.starts_with(theme.glyphs.cursor.trim_end()));
        assert!(cursor_row.ends_with("hello"));
        assert!(other_row.ends_with("hello"));
    }

    #[test]
    fn compose_line_carries_cursor_highlight_into_spans() {
        let theme = Theme::default();
        let item = Item::new("a", 1);
        let composer: RowComposer<i32> = RowComposer::default_list_pipeline();

        let cursor_line = composer.compose_line(&ctx(&item, &theme, true));
        let other_line = composer.compose_line(&ctx(&item, &theme, false));

        let expected = Style::default().patch(theme.cursor_style);
        assert!(cursor_line.spans.iter().any(|span| span.style == expected));
        assert!(other_line.spans.iter().all(|span| span.style != expected));
    }
}
