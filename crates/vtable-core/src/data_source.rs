//! The data-source contract (§4.5) and the commands the core emits to drive it.
//!
//! The core never holds or calls a [`DataSource`] implementation directly —
//! "the data source is consulted only via commands; the core never reaches
//! into data-source internals" (§5). [`Command`] is the tagged, inert value
//! a controller's `update` hands back to the host; the host matches on it
//! and drives its own `DataSource` implementation, eventually feeding the
//! resulting [`crate::Message`] back into `update`. [`DataSource`] itself is
//! the documented contract a host implements (and the trait our own
//! in-memory test double, [`VecDataSource`], implements) — it is not wired
//! into any controller field.

use std::collections::HashMap;

use crate::item::Item;

/// Sort direction for a single sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single active filter: field name to match, and the value to match it against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub field: String,
    pub value: String,
}

/// A request for a range of items, carrying the sort/filter state that was
/// active when the request was built — used to detect and discard stale
/// chunk responses (§5, §7 "Stale chunk").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRequest {
    pub start: usize,
    pub count: usize,
    pub sort_fields: Vec<String>,
    pub sort_directions: Vec<SortDirection>,
    pub filters: Vec<FilterDescriptor>,
}

impl DataRequest {
    pub fn new(start: usize, count: usize) -> Self {
        Self {
            start,
            count,
            sort_fields: Vec::new(),
            sort_directions: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_sort(mut self, fields: Vec<String>, directions: Vec<SortDirection>) -> Self {
        self.sort_fields = fields;
        self.sort_directions = directions;
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterDescriptor>) -> Self {
        self.filters = filters;
        self
    }
}

/// A deferred unit of work a controller's `update` returns for the host to
/// execute off the critical path (§5, §9 "Commands instead of async"). Plain
/// tagged data — never a closure — so it can cross thread/task boundaries
/// without binding the crate to any particular async runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GetTotal,
    LoadChunk(DataRequest),
    SetSelected { index: usize, selected: bool },
    SetSelectedById { id: String, selected: bool },
    SelectAll,
    ClearSelection,
    SelectRange { start: usize, end: usize },
    /// Several commands to run independently; order is not significant.
    Batch(Vec<Command>),
}

impl Command {
    /// Folds zero-or-more optional commands into a single optional command,
    /// collapsing to `None` when empty and to a bare value when there is
    /// exactly one (avoids `Batch([x])` noise).
    pub fn combine(mut commands: Vec<Command>) -> Option<Command> {
        match commands.len() {
            0 => None,
            1 => commands.pop(),
            _ => Some(Command::Batch(commands)),
        }
    }
}

/// The capability set a host implements to back a controller (§4.5). Default
/// bodies build the matching [`Command`] tag directly; override only when a
/// host needs to attach extra context to the request.
pub trait DataSource<T> {
    fn get_total(&self) -> Command {
        Command::GetTotal
    }

    fn load_chunk(&self, request: DataRequest) -> Command {
        Command::LoadChunk(request)
    }

    /// Optional synchronous fast-path the projector may use to fill a gap
    /// during rendering instead of placeholder-then-async-load (design note
    /// 9(d)). Dropped from this crate's controllers in favor of always
    /// rendering placeholders; the hook remains for hosts that want it.
    fn load_chunk_immediate(&self, _request: DataRequest) -> Option<Vec<Item<T>>> {
        None
    }

    fn set_selected(&self, index: usize, selected: bool) -> Command {
        Command::SetSelected { index, selected }
    }

    fn set_selected_by_id(&self, id: String, selected: bool) -> Command {
        Command::SetSelectedById { id, selected }
    }

    fn select_all(&self) -> Command {
        Command::SelectAll
    }

    fn clear_selection(&self) -> Command {
        Command::ClearSelection
    }

    fn select_range(&self, start: usize, end: usize) -> Command {
        Command::SelectRange { start, end }
    }

    fn get_item_id(&self, item: &T) -> String;
}

/// An in-memory `DataSource` test double: wraps a `Vec<T>`, synthesizes ids
/// from index unless the host supplies an id extractor. Used by this
/// crate's own integration tests and useful as a reference host
/// implementation for consumers wiring up a new controller.
pub struct VecDataSource<T> {
    items: Vec<T>,
    selected: HashMap<usize, bool>,
    id_of: Box<dyn Fn(usize, &T) -> String>,
}

impl<T> VecDataSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            selected: HashMap::new(),
            id_of: Box::new(|index, _| index.to_string()),
        }
    }

    pub fn with_id_fn(mut self, id_of: impl Fn(usize, &T) -> String + 'static) -> Self {
        self.id_of = Box::new(id_of);
        self
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn fetch(&self, request: &DataRequest) -> Vec<Item<T>>
    where
        T: Clone,
    {
        let end = (request.start + request.count).min(self.items.len());
        (request.start..end)
            .map(|index| {
                let mut item = Item::new((self.id_of)(index, &self.items[index]), self.items[index].clone());
                item.selected = self.selected.get(&index).copied().unwrap_or(false);
                item
            })
            .collect()
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) {
        self.selected.insert(index, selected);
    }

    pub fn select_all(&mut self) {
        for index in 0..self.items.len() {
            self.selected.insert(index, true);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn select_range(&mut self, start: usize, end: usize) {
        for index in start..=end.min(self.items.len().saturating_sub(1)) {
            self.selected.insert(index, true);
        }
    }
}

impl<T: PartialEq> DataSource<T> for VecDataSource<T> {
    fn get_item_id(&self, item: &T) -> String {
        match self.items.iter().position(|existing| existing == item) {
            Some(index) => (self.id_of)(index, item),
            None => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_collapses_single_command() {
        assert_eq!(Command::combine(vec![]), None);
        assert_eq!(Command::combine(vec![Command::GetTotal]), Some(Command::GetTotal));
        assert!(matches!(
            Command::combine(vec![Command::GetTotal, Command::SelectAll]),
            Some(Command::Batch(v)) if v.len() == 2
        ));
    }

    #[test]
    fn vec_data_source_fetch_respects_range_and_selection() {
        let mut source = VecDataSource::new(vec!["a", "b", "c"]);
        source.set_selected(1, true);
        let request = DataRequest::new(0, 2);
        let items = source.fetch(&request);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].data, "a");
        assert!(!items[0].selected);
        assert_eq!(items[1].data, "b");
        assert!(items[1].selected);
    }

    #[test]
    fn vec_data_source_fetch_clamps_to_total() {
        let source = VecDataSource::new(vec![1, 2, 3]);
        let items = source.fetch(&DataRequest::new(2, 10));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].data, 3);
    }

    #[test]
    fn vec_data_source_implements_data_source_get_item_id() {
        let source = VecDataSource::new(vec!["a", "b", "c"]);
        assert_eq!(DataSource::get_item_id(&source, &"b"), "1");
        assert_eq!(DataSource::get_item_id(&source, &"missing"), "unknown");
        assert_eq!(DataSource::set_selected(&source, 2, true), Command::SetSelected { index: 2, selected: true });
    }
}
