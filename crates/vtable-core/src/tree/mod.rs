//! The tree controller (§4.8, C8): reuses the viewport calculator and chunk
//! store, but synthesizes chunks directly from an in-memory flattened forest
//! rather than issuing [`crate::data_source::Command::LoadChunk`] — expanding
//! a node must be instantaneous, which rules out a data-source round trip on
//! every keypress.

pub mod flatten;

use std::collections::HashSet;

pub use flatten::{descendant_ids, flatten_as_tree, FlatTreeItem, TreeNode};

use crate::chunk::{Chunk, ChunkStore};
use crate::data_source::{Command, DataRequest};
use crate::error::ControllerError;
use crate::item::Item;
use crate::message::Message;
use crate::row::{RowComposer, RowContext};
use crate::style::Theme;
use crate::viewport::{self, ViewportConfig, ViewportState};

/// Flattened-row metadata kept alongside each chunk item, so rendering never
/// has to recompute depth/expansion/parentage from the forest (§3, §4.8).
#[derive(Debug, Clone, Default)]
struct RowMeta {
    depth: usize,
    has_children: bool,
    expanded: bool,
    parent_id: Option<String>,
}

/// A selection request already sent to the host, remembered so the matching
/// [`Message::SelectionResponse`] knows what to commit (§3: selection state
/// is authoritative in the external data source, mutations are requests).
enum PendingSelection {
    Ids(Vec<String>, bool),
    SelectAll,
    ClearAll,
}

pub struct TreeController<T> {
    config: ViewportConfig,
    viewport: ViewportState,
    forest: Vec<TreeNode<T>>,
    expanded: HashSet<String>,
    selected: HashSet<String>,
    meta: Vec<RowMeta>, // parallel to chunk contents
    pending_selection: Option<PendingSelection>,
    last_error: Option<ControllerError>,
    chunks: ChunkStore<T>,
    total_items: usize,
    focused: bool,
    formatter: Box<dyn Fn(&T) -> String>,
}

impl<T: Clone> TreeController<T> {
    pub fn new(config: ViewportConfig, forest: Vec<TreeNode<T>>, formatter: impl Fn(&T) -> String + 'static) -> Self {
        let config = config.fixed();
        let mut controller = Self {
            viewport: ViewportState::default(),
            config,
            forest,
            expanded: HashSet::new(),
            selected: HashSet::new(),
            meta: Vec::new(),
            pending_selection: None,
            last_error: None,
            chunks: ChunkStore::new(),
            total_items: 0,
            focused: false,
            formatter: Box::new(formatter),
        };
        controller.rebuild(None);
        controller
    }

    pub fn last_error(&self) -> Option<&ControllerError> {
        self.last_error.as_ref()
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn visible_items(&self) -> Vec<Item<T>> {
        let end = (self.viewport.viewport_start_index + self.config.height).min(self.total_items);
        (self.viewport.viewport_start_index..end)
            .filter_map(|index| self.chunks.get_chunk(ChunkStore::<T>::chunk_start_for(self.config.chunk_size, index))
                .and_then(|chunk| chunk.items.get(index - chunk.start_index))
                .cloned())
            .collect()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// The parent node id of the row currently at `index` in the flattened
    /// view, or `None` for a root (§3's `FlatTreeItem.parent_id`).
    pub fn parent_id_at(&self, index: usize) -> Option<&str> {
        self.meta.get(index).and_then(|meta| meta.parent_id.as_deref())
    }

    /// Rebuilds the flattened view and chunk store from the current forest
    /// and expanded set. `keep_node_id`, when given, re-centers the cursor
    /// on that node after the rebuild if it's still visible; otherwise the
    /// cursor clamps to the nearest valid index.
    fn rebuild(&mut self, keep_node_id: Option<String>) {
        let flattened = flatten_as_tree(&self.forest, &self.expanded);
        self.total_items = flattened.len();
        self.meta = flattened
            .iter()
            .map(|f| RowMeta {
                depth: f.depth,
                has_children: f.has_children,
                expanded: f.expanded,
                parent_id: f.parent_id.clone(),
            })
            .collect();

        self.chunks.clear();
        for chunk_start in (0..flattened.len()).step_by(self.config.chunk_size.max(1)) {
            let end = (chunk_start + self.config.chunk_size).min(flattened.len());
            let items: Vec<Item<T>> = flattened[chunk_start..end]
                .iter()
                .map(|row| Item::new(row.id.clone(), row.data.clone()).with_selected(self.selected.contains(&row.id)))
                .collect();
            self.chunks.insert(Chunk::new(chunk_start, items, DataRequest::new(chunk_start, end - chunk_start)));
        }

        let target_index = keep_node_id
            .and_then(|id| flattened.iter().position(|row| row.id == id))
            .unwrap_or(self.viewport.cursor_index);
        self.viewport = viewport::jump_to(self.viewport, &self.config, self.total_items, target_index);
    }

    fn current_node_id(&self) -> Option<String> {
        let index = self.viewport.cursor_index;
        let chunk_start = ChunkStore::<T>::chunk_start_for(self.config.chunk_size, index);
        self.chunks
            .get_chunk(chunk_start)
            .and_then(|chunk| chunk.items.get(index - chunk.start_index))
            .map(|item| item.id.clone())
    }

    /// Requests the host select (or deselect) `id` and cascade the change to
    /// every forest descendant, per §4.8's cascading-selection rule. Nothing
    /// is committed locally until the matching `SelectionResponse` arrives.
    fn request_select_cascade(&mut self, id: &str, selected: bool) -> Option<Command> {
        let mut ids = vec![id.to_string()];
        ids.extend(descendant_ids(&self.forest, id));
        let commands = ids.iter().cloned().map(|id| Command::SetSelectedById { id, selected }).collect();
        self.pending_selection = Some(PendingSelection::Ids(ids, selected));
        Command::combine(commands)
    }

    /// The protocol entrypoint (§4.6, §4.8). Returns a deferred [`Command`]
    /// for the host to execute; expand/collapse/navigation complete locally
    /// since the forest is fully resident, but selection is always a
    /// request to the data source (§3).
    pub fn update(&mut self, message: Message<T>) -> Option<Command> {
        match message {
            Message::Init | Message::Reset => {
                self.viewport = ViewportState::default();
                self.rebuild(None);
                None
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
            Message::JumpToStart => self.navigate(|_s, c, t| viewport::jump_to_start(c, t)),
            Message::JumpToEnd => self.navigate(|_s, c, t| viewport::jump_to_end(c, t)),
            Message::JumpTo { index } => self.navigate(move |s, c, t| viewport::jump_to(s, c, t, index)),

            Message::Expand { id } => {
                self.expanded.insert(id.clone());
                self.rebuild(Some(id));
                None
            }
            Message::Collapse { id } => {
                self.expanded.remove(&id);
                self.rebuild(Some(id));
                None
            }
            Message::Toggle { id } => {
                if !self.expanded.insert(id.clone()) {
                    self.expanded.remove(&id);
                }
                self.rebuild(Some(id));
                None
            }
            Message::ToggleCurrent => {
                let id = self.current_node_id()?;
                self.update(Message::Toggle { id })
            }

            Message::SelectCurrent => {
                let id = self.current_node_id()?;
                self.request_select_cascade(&id, true)
            }
            Message::SelectToggle => {
                let id = self.current_node_id()?;
                let now_selected = !self.selected.contains(&id);
                self.request_select_cascade(&id, now_selected)
            }
            Message::SelectClear => {
                self.pending_selection = Some(PendingSelection::ClearAll);
                Some(Command::ClearSelection)
            }
            Message::SelectAll => {
                self.pending_selection = Some(PendingSelection::SelectAll);
                Some(Command::SelectAll)
            }
            Message::SelectionResponse { success, error } => {
                let pending = self.pending_selection.take();
                if !success {
                    self.last_error = Some(ControllerError::Selection { message: error.unwrap_or_default() });
                    return None;
                }
                match pending {
                    Some(PendingSelection::Ids(ids, selected)) => {
                        for id in ids {
                            if selected {
                                self.selected.insert(id);
                            } else {
                                self.selected.remove(&id);
                            }
                        }
                    }
                    Some(PendingSelection::SelectAll) => {
                        self.selected = all_ids(&self.forest).into_iter().collect();
                    }
                    Some(PendingSelection::ClearAll) => self.selected.clear(),
                    None => {}
                }
                self.rebuild(self.current_node_id());
                None
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
                None
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
            _ => None,
        }
    }

    fn navigate(&mut self, op: impl FnOnce(ViewportState, &ViewportConfig, usize) -> ViewportState) -> Option<Command> {
        self.viewport = op(self.viewport, &self.config, self.total_items);
        None
    }

    pub fn view(&self, theme: &Theme, composer: &RowComposer<T>) -> String {
        let start = self.viewport.viewport_start_index;
        self.visible_items()
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                let index = start + offset;
                let meta = self.meta.get(index).cloned().unwrap_or_default();
                let ctx = RowContext {
                    item,
                    index,
                    is_cursor: self.focused && offset == self.viewport.cursor_viewport_index,
                    depth: meta.depth,
                    has_children: meta.has_children,
                    is_expanded: meta.expanded,
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

fn all_ids<T>(forest: &[TreeNode<T>]) -> Vec<String> {
    let mut out = Vec::new();
    fn walk<T>(nodes: &[TreeNode<T>], out: &mut Vec<String>) {
        for node in nodes {
            out.push(node.id.clone());
            walk(&node.children, out);
        }
    }
    walk(forest, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<TreeNode<&'static str>> {
        vec![
            TreeNode::new("a", "A").with_children(vec![TreeNode::new("a1", "A1"), TreeNode::new("a2", "A2")]),
            TreeNode::new("b", "B"),
        ]
    }

    fn controller() -> TreeController<&'static str> {
        TreeController::new(ViewportConfig { height: 5, chunk_size: 10, ..ViewportConfig::default() }, forest(), |s| s.to_string())
    }

    #[test]
    fn collapsed_by_default_shows_only_roots() {
        let c = controller();
        assert_eq!(c.total_items(), 2);
    }

    #[test]
    fn expand_reveals_children_and_collapse_hides_them_again() {
        let mut c = controller();
        c.update(Message::Expand { id: "a".to_string() });
        assert_eq!(c.total_items(), 4);
        c.update(Message::Collapse { id: "a".to_string() });
        assert_eq!(c.total_items(), 2);
    }

    #[test]
    fn toggle_current_flips_node_under_cursor() {
        let mut c = controller();
        c.update(Message::ToggleCurrent);
        assert_eq!(c.total_items(), 4);
        c.update(Message::ToggleCurrent);
        assert_eq!(c.total_items(), 2);
    }

    #[test]
    fn select_current_requests_a_cascade_and_commits_only_on_response() {
        let mut c = controller();
        c.update(Message::Expand { id: "a".to_string() });
        let command = c.update(Message::SelectCurrent).unwrap();
        assert!(matches!(command, Command::Batch(ids) if ids.len() == 3));
        assert!(c.selected.is_empty());

        c.update(Message::SelectionResponse { success: true, error: None });
        assert!(c.selected.contains("a"));
        assert!(c.selected.contains("a1"));
        assert!(c.selected.contains("a2"));
        assert!(!c.selected.contains("b"));
    }

    #[test]
    fn failed_selection_response_records_error_without_committing() {
        let mut c = controller();
        c.update(Message::SelectCurrent);
        c.update(Message::SelectionResponse { success: false, error: Some("denied".to_string()) });
        assert!(c.selected.is_empty());
        assert!(matches!(c.last_error(), Some(ControllerError::Selection { .. })));
    }

    #[test]
    fn select_all_requests_select_all_and_commits_on_response() {
        let mut c = controller();
        let command = c.update(Message::SelectAll).unwrap();
        assert_eq!(command, Command::SelectAll);
        c.update(Message::SelectionResponse { success: true, error: None });
        assert!(c.selected.contains("a"));
        assert!(c.selected.contains("b"));
    }
}
