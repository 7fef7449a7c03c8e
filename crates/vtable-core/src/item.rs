//! The per-row payload wrapper (§3 `Item<T>`).

use std::collections::HashMap;

use serde_json::Value;

/// A single row: a user payload `T` plus the state flags the viewport and
/// row composer need regardless of what `T` is.
#[derive(Debug, Clone)]
pub struct Item<T> {
    /// Stable identifier, used for selection-by-id and chunk validation.
    pub id: String,
    /// The user payload.
    pub data: T,
    pub selected: bool,
    pub disabled: bool,
    pub hidden: bool,
    pub loading: bool,
    pub error: Option<String>,
    /// Free-form typed metadata a host can stash per-item without the crate
    /// needing a variant for every use case.
    pub metadata: HashMap<String, Value>,
}

impl<T> Item<T> {
    /// A plain, fully-resident item.
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            selected: false,
            disabled: false,
            hidden: false,
            loading: false,
            error: None,
            metadata: HashMap::new(),
        }
    }

    /// A placeholder item standing in for a row whose chunk has not loaded
    /// yet (§4.4). `id` is `"loading-<index>"` per spec.
    pub fn placeholder(index: usize, data: T) -> Self {
        let mut item = Self::new(format!("loading-{index}"), data);
        item.loading = true;
        item
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_marked_loading_with_stable_id() {
        let item = Item::placeholder(42, "pending");
        assert!(item.loading);
        assert_eq!(item.id, "loading-42");
        assert_eq!(item.data, "pending");
    }

    #[test]
    fn new_item_has_no_flags_set() {
        let item = Item::new("a", 1);
        assert!(!item.selected && !item.disabled && !item.hidden && !item.loading);
        assert!(item.error.is_none());
        assert!(item.metadata.is_empty());
    }
}
