//! The list controller (§4.7, C7): wires the viewport calculator, the chunk
//! store, and the bounding-area planner together behind a single
//! `update`/`view` surface. Tree and table controllers (§4.8, §4.9) build on
//! the same pieces rather than on this type directly — each assembles its
//! own [`crate::viewport`]/[`crate::chunk`]/[`crate::bounding`] trio, since
//! a tree's chunks are synthesized from a flattened forest and a table's
//! rows need per-column formatting this controller has no notion of.

use crate::bounding::{bounding_area, chunks_to_load, chunks_to_unload, is_critical};
use crate::chunk::{Chunk, ChunkStore};
use crate::data_source::{Command, DataRequest, FilterDescriptor, SortDirection};
use crate::error::ControllerError;
use crate::item::Item;
use crate::message::Message;
use crate::row::{RowComposer, RowContext};
use crate::style::Theme;
use crate::viewport::{self, ViewportConfig, ViewportState};

/// Observability-only notifications a controller emits while managing
/// chunks (design note 9): informative, never fed back into `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkEvent {
    LoadingStarted(usize),
    LoadingCompleted(usize),
    Unloaded(usize),
}

/// The list controller (§4.7). Generic over the row payload `T`; owns no
/// [`crate::data_source::DataSource`] — every data access crosses the
/// `Command`/`Message` boundary (§5).
pub struct ListController<T> {
    config: ViewportConfig,
    viewport: ViewportState,
    total_items: usize,
    chunks: ChunkStore<T>,
    visible: Vec<Item<T>>,
    focused: bool,
    last_error: Option<ControllerError>,
    sort_fields: Vec<String>,
    sort_directions: Vec<SortDirection>,
    filters: Vec<FilterDescriptor>,
    events: Vec<ChunkEvent>,
    formatter: Box<dyn Fn(&T) -> String>,
    placeholder_data: Box<dyn Fn(usize) -> T>,
}

impl<T: Clone> ListController<T> {
    /// `formatter` renders a loaded payload to display text; `placeholder_data`
    /// produces the sentinel payload a not-yet-loaded row's [`Item`] carries
    /// (§4.4) — generic `T` has no universal "loading" value, so the host
    /// supplies one.
    pub fn new(
        config: ViewportConfig,
        formatter: impl Fn(&T) -> String + 'static,
        placeholder_data: impl Fn(usize) -> T + 'static,
    ) -> Self {
        let config = config.fixed();
        Self {
            viewport: ViewportState::initial(&config, 0),
            config,
            total_items: 0,
            chunks: ChunkStore::new(),
            visible: Vec::new(),
            focused: false,
            last_error: None,
            sort_fields: Vec::new(),
            sort_directions: Vec::new(),
            filters: Vec::new(),
            events: Vec::new(),
            formatter: Box::new(formatter),
            placeholder_data: Box::new(placeholder_data),
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn visible_items(&self) -> &[Item<T>] {
        &self.visible
    }

    pub fn last_error(&self) -> Option<&ControllerError> {
        self.last_error.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Drains the observability log (design note 9) for a host that wants to
    /// surface chunk-loading activity; never required for correctness.
    pub fn drain_events(&mut self) -> Vec<ChunkEvent> {
        std::mem::take(&mut self.events)
    }

    /// Navigation is gated while any chunk overlapping the viewport is still
    /// loading (§4.3, I4) — scrolling into a window with no data to show
    /// would just flash placeholders and immediately re-request the same
    /// chunk.
    pub fn can_scroll(&self) -> bool {
        if self.total_items == 0 {
            return false;
        }
        self.chunks.loading_starts().all(|start| {
            let end = (start + self.config.chunk_size).saturating_sub(1);
            !is_critical(start, end, &self.viewport, &self.config)
        })
    }

    fn current_request(&self, start: usize, count: usize) -> DataRequest {
        DataRequest::new(start, count)
            .with_sort(self.sort_fields.clone(), self.sort_directions.clone())
            .with_filters(self.filters.clone())
    }

    /// The on-demand projector (§4.4): for every visible row, returns the
    /// resident item or a freshly-minted placeholder. Chunk loading itself is
    /// [`Self::smart_chunk_management`]'s job, invoked from `update`, not
    /// from here (design note 9(d)) — the projector only ever reads.
    fn recompute_visible(&mut self) {
        if self.total_items == 0 {
            self.visible.clear();
            return;
        }
        let end = (self.viewport.viewport_start_index + self.config.height).min(self.total_items);
        let mut visible = Vec::with_capacity(end.saturating_sub(self.viewport.viewport_start_index));
        for index in self.viewport.viewport_start_index..end {
            let item = self
                .chunks
                .get_item(self.config.chunk_size, index)
                .cloned()
                .unwrap_or_else(|| Item::placeholder(index, (self.placeholder_data)(index)));
            visible.push(item);
        }
        self.visible = visible;
    }

    /// The bounding-area planner driven end to end (§4.3): schedules loads
    /// for every chunk the area covers that isn't resident or already
    /// in flight, and unloads every resident chunk outside it.
    fn smart_chunk_management(&mut self) -> Option<Command> {
        let Some(area) = bounding_area(&self.viewport, &self.config, self.total_items) else {
            return None;
        };

        let mut commands = Vec::new();
        for start in chunks_to_load(&area, self.total_items, self.config.chunk_size) {
            if self.chunks.is_loaded(self.config.chunk_size, start) || self.chunks.is_loading(start) {
                continue;
            }
            let count = self.config.chunk_size.min(self.total_items - start);
            self.chunks.mark_loading(start);
            self.events.push(ChunkEvent::LoadingStarted(start));
            tracing::debug!(chunk_start = start, "loading chunk");
            commands.push(Command::LoadChunk(self.current_request(start, count)));
        }

        for start in chunks_to_unload(self.chunks.resident_ranges(), &area) {
            self.chunks.remove(start);
            self.events.push(ChunkEvent::Unloaded(start));
            tracing::debug!(chunk_start = start, "unloading chunk");
        }

        Command::combine(commands)
    }

    fn reset_for_refresh(&mut self) -> Option<Command> {
        self.chunks.clear();
        self.last_error = None;
        self.recompute_visible();
        Some(Command::GetTotal)
    }

    /// The protocol entrypoint (§4.7). Returns a deferred [`Command`] for the
    /// host to execute, or `None` when nothing needs to happen off the
    /// critical path.
    #[tracing::instrument(skip(self, message), fields(total_items = self.total_items))]
    pub fn update(&mut self, message: Message<T>) -> Option<Command> {
        match message {
            Message::Init => {
                self.viewport = ViewportState::initial(&self.config, self.total_items);
                self.recompute_visible();
                Some(Command::GetTotal)
            }
            Message::Reset => {
                self.viewport = ViewportState::initial(&self.config, 0);
                self.total_items = 0;
                self.reset_for_refresh()
            }
            Message::Destroy => {
                self.chunks.clear();
                None
            }

            Message::KeyPress(key) => Message::from_key(key).and_then(|mapped| self.update(mapped)),

            Message::CursorUp => self.navigate(viewport::cursor_up),
            Message::CursorDown => self.navigate(viewport::cursor_down),
            Message::PageUp => self.navigate(viewport::page_up),
            Message::PageDown => self.navigate(viewport::page_down),
            Message::JumpToStart => self.navigate(|_state, config, total| viewport::jump_to_start(config, total)),
            Message::JumpToEnd => self.navigate(|_state, config, total| viewport::jump_to_end(config, total)),
            Message::JumpTo { index } => {
                self.navigate(move |state, config, total| viewport::jump_to(state, config, total, index))
            }

            Message::DataRefresh => self.reset_for_refresh(),
            Message::DataChunksRefresh => {
                self.chunks.clear();
                self.recompute_visible();
                self.smart_chunk_management()
            }
            Message::DataChunkLoaded { start, items, request } => {
                if request.sort_fields != self.sort_fields
                    || request.sort_directions != self.sort_directions
                    || request.filters != self.filters
                {
                    tracing::trace!(chunk_start = start, "discarding stale chunk response");
                    return None;
                }
                self.chunks.insert(Chunk::new(start, items, request));
                self.events.push(ChunkEvent::LoadingCompleted(start));
                self.recompute_visible();
                if self.can_scroll() {
                    tracing::debug!(chunk_start = start, "scroll gate released: no critical chunk still loading");
                }
                None
            }
            Message::DataChunkError { start, error, .. } => {
                self.chunks.unmark_loading(start);
                self.last_error = Some(ControllerError::ChunkLoad { chunk_start: start, message: error });
                None
            }
            Message::DataTotal { total } => {
                self.total_items = total;
                self.viewport = ViewportState::initial(&self.config, total);
                self.recompute_visible();
                self.smart_chunk_management()
            }
            Message::DataTotalUpdate { total } => {
                let cursor = self.viewport.cursor_index;
                self.total_items = total;
                self.viewport = viewport::jump_to(self.viewport, &self.config, total, cursor);
                self.recompute_visible();
                self.smart_chunk_management()
            }
            Message::ChunkUnloaded { .. } => None,

            Message::SelectCurrent => {
                Some(Command::SetSelected { index: self.viewport.cursor_index, selected: true })
            }
            Message::SelectToggle => {
                let current = self
                    .chunks
                    .get_item(self.config.chunk_size, self.viewport.cursor_index)
                    .map(|item| item.selected)
                    .unwrap_or(false);
                Some(Command::SetSelected { index: self.viewport.cursor_index, selected: !current })
            }
            Message::SelectAll => Some(Command::SelectAll),
            Message::SelectClear => Some(Command::ClearSelection),
            Message::SelectRange { start, end } => Some(Command::SelectRange { start, end }),
            Message::SelectionResponse { success, error } => {
                if !success {
                    self.last_error =
                        Some(ControllerError::Selection { message: error.unwrap_or_default() });
                    return None;
                }
                self.refresh_resident_chunks()
            }

            Message::FilterSet { field, value } => {
                self.filters.retain(|f| f.field != field);
                self.filters.push(FilterDescriptor { field, value });
                self.reset_for_refresh()
            }
            Message::FilterClear { field } => {
                self.filters.retain(|f| f.field != field);
                self.reset_for_refresh()
            }
            Message::FiltersClearAll => {
                self.filters.clear();
                self.reset_for_refresh()
            }
            Message::SortSet { field, direction } => {
                self.sort_fields = vec![field];
                self.sort_directions = vec![direction];
                self.reset_for_refresh()
            }
            Message::SortAdd { field, direction } => {
                self.sort_fields.push(field);
                self.sort_directions.push(direction);
                self.reset_for_refresh()
            }
            Message::SortToggle { field } => {
                if let Some(pos) = self.sort_fields.iter().position(|f| *f == field) {
                    self.sort_directions[pos] = match self.sort_directions[pos] {
                        SortDirection::Ascending => SortDirection::Descending,
                        SortDirection::Descending => SortDirection::Ascending,
                    };
                } else {
                    self.sort_fields.push(field);
                    self.sort_directions.push(SortDirection::Ascending);
                }
                self.reset_for_refresh()
            }
            Message::SortRemove { field } => {
                if let Some(pos) = self.sort_fields.iter().position(|f| *f == field) {
                    self.sort_fields.remove(pos);
                    self.sort_directions.remove(pos);
                }
                self.reset_for_refresh()
            }
            Message::SortsClearAll => {
                self.sort_fields.clear();
                self.sort_directions.clear();
                self.reset_for_refresh()
            }

            Message::Focus => {
                self.focused = true;
                None
            }
            Message::Blur => {
                self.focused = false;
                None
            }
            Message::Resize { height } => {
                self.config.height = height.max(1);
                self.config = self.config.fixed();
                self.viewport = viewport::update_viewport_bounds(self.viewport, &self.config, self.total_items);
                self.recompute_visible();
                self.smart_chunk_management()
            }

            Message::Batch(messages) => {
                let mut commands = Vec::new();
                for message in messages {
                    if let Some(command) = self.update(message) {
                        commands.push(command);
                    }
                }
                Command::combine(commands)
            }

            // Tree/table-only variants reach here when a host wires the same
            // `Message<T>` stream into every controller (§4.6) — no-ops.
            Message::Expand { .. }
            | Message::Collapse { .. }
            | Message::Toggle { .. }
            | Message::ToggleCurrent
            | Message::ScrollColumnLeft { .. }
            | Message::ScrollColumnRight { .. }
            | Message::SetColumnWidth { .. } => None,
        }
    }

    fn navigate(
        &mut self,
        op: impl FnOnce(ViewportState, &ViewportConfig, usize) -> ViewportState,
    ) -> Option<Command> {
        if !self.can_scroll() {
            tracing::trace!("navigation blocked: critical chunk still loading");
            return None;
        }
        let previous_start = self.viewport.viewport_start_index;
        self.viewport = op(self.viewport, &self.config, self.total_items);
        if self.viewport.viewport_start_index != previous_start {
            self.recompute_visible();
            self.smart_chunk_management()
        } else {
            None
        }
    }

    /// Every resident chunk is reloaded so freshly-applied selection flags
    /// become visible (§4.7's `SelectionResponse` handling) — selection
    /// state lives in the host's data source, not locally.
    fn refresh_resident_chunks(&mut self) -> Option<Command> {
        let starts: Vec<usize> = self.chunks.resident_starts().collect();
        let mut commands = Vec::new();
        for start in starts {
            let count = self.config.chunk_size.min(self.total_items.saturating_sub(start));
            if count == 0 {
                continue;
            }
            self.chunks.mark_loading(start);
            commands.push(Command::LoadChunk(self.current_request(start, count)));
        }
        Command::combine(commands)
    }

    /// Renders the visible window through the given row composer.
    pub fn view(&self, theme: &Theme, composer: &RowComposer<T>) -> String {
        self.visible
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                let index = self.viewport.viewport_start_index + offset;
                let ctx = RowContext {
                    item,
                    index,
                    is_cursor: self.focused && offset == self.viewport.cursor_viewport_index,
                    depth: 0,
                    has_children: false,
                    is_expanded: false,
                    content: (self.formatter)(&item.data),
                    enumerator_index: index,
                    enumerator_width_hint: self.total_items.to_string().len(),
                    theme,
                };
                composer.compose_string(&ctx)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::VecDataSource;

    fn controller() -> ListController<String> {
        ListController::new(
            ViewportConfig { height: 5, chunk_size: 10, ..ViewportConfig::default() },
            |s: &String| s.clone(),
            |i| format!("loading item {i}"),
        )
    }

    #[test]
    fn init_requests_total_then_first_chunk() {
        let source = VecDataSource::new((0..30).map(|i| i.to_string()).collect());
        let mut controller = controller();
        let command = controller.update(Message::Init).unwrap();
        assert_eq!(command, Command::GetTotal);
        let command = controller.update(Message::DataTotal { total: source.total() }).unwrap();
        assert!(matches!(command, Command::LoadChunk(_)));
    }

    #[test]
    fn loaded_chunk_fills_placeholders() {
        let source = VecDataSource::new((0..30).map(|i| i.to_string()).collect());
        let mut controller = controller();
        controller.update(Message::Init);
        controller.update(Message::DataTotal { total: source.total() });
        assert!(controller.visible_items()[0].loading);
        let request = controller.current_request(0, 10);
        let items = source.fetch(&request);
        controller.update(Message::DataChunkLoaded { start: 0, items, request });
        assert!(!controller.visible_items()[0].loading);
        assert_eq!(controller.visible_items()[0].data, "0");
    }

    #[test]
    fn stale_chunk_response_is_discarded() {
        let mut controller = controller();
        controller.update(Message::DataTotal { total: 30 });
        let mut stale_request = controller.current_request(0, 10);
        stale_request.sort_fields = vec!["name".to_string()];
        let before = controller.visible_items().to_vec().iter().map(|i| i.loading).collect::<Vec<_>>();
        controller.update(Message::DataChunkLoaded {
            start: 0,
            items: vec![Item::new("x", "stale".to_string())],
            request: stale_request,
        });
        let after: Vec<bool> = controller.visible_items().iter().map(|i| i.loading).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn navigation_is_gated_while_critical_chunk_loads() {
        let mut controller = controller();
        controller.update(Message::DataTotal { total: 30 });
        assert!(!controller.can_scroll());
        let request = controller.current_request(0, 10);
        let items = (0..10).map(|i| Item::new(i.to_string(), i.to_string())).collect();
        controller.update(Message::DataChunkLoaded { start: 0, items, request });
        assert!(controller.can_scroll());
    }

    #[test]
    fn select_toggle_reads_current_selection_state() {
        let mut controller = controller();
        controller.update(Message::DataTotal { total: 5 });
        let request = controller.current_request(0, 10);
        let mut items: Vec<Item<String>> = (0..5).map(|i| Item::new(i.to_string(), i.to_string())).collect();
        items[0].selected = true;
        controller.update(Message::DataChunkLoaded { start: 0, items, request });
        let command = controller.update(Message::SelectToggle).unwrap();
        assert_eq!(command, Command::SetSelected { index: 0, selected: false });
    }

    #[test]
    fn filter_set_clears_chunks_and_requests_total_again() {
        let mut controller = controller();
        controller.update(Message::DataTotal { total: 30 });
        let request = controller.current_request(0, 10);
        let items = (0..10).map(|i| Item::new(i.to_string(), i.to_string())).collect();
        controller.update(Message::DataChunkLoaded { start: 0, items, request });
        let command = controller
            .update(Message::FilterSet { field: "status".to_string(), value: "open".to_string() })
            .unwrap();
        assert_eq!(command, Command::GetTotal);
        assert!(controller.visible_items()[0].loading);
    }
}
