//! The chunked data cache (§4.2, C2): a keyed store of loaded item ranges
//! with access times and loading flags. The store imposes no eviction
//! policy itself — that is [`crate::bounding`]'s job (§4.3).

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::data_source::DataRequest;
use crate::item::Item;

/// A contiguous, chunk-aligned run of items (§3).
#[derive(Debug, Clone)]
pub struct Chunk<T> {
    pub start_index: usize,
    pub end_index: usize,
    pub items: Vec<Item<T>>,
    pub loaded_at: Instant,
    pub request: DataRequest,
}

impl<T> Chunk<T> {
    pub fn new(start_index: usize, items: Vec<Item<T>>, request: DataRequest) -> Self {
        let end_index = start_index + items.len().saturating_sub(1);
        Self {
            start_index,
            end_index,
            items,
            loaded_at: Instant::now(),
            request,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, absolute_index: usize) -> bool {
        absolute_index >= self.start_index && absolute_index <= self.end_index
    }
}

/// Keyed cache of resident chunks, plus the bookkeeping (access times,
/// in-flight loads) the bounding-area planner and controllers need.
pub struct ChunkStore<T> {
    chunks: HashMap<usize, Chunk<T>>,
    access_times: HashMap<usize, Instant>,
    loading: HashSet<usize>,
}

impl<T> Default for ChunkStore<T> {
    fn default() -> Self {
        Self {
            chunks: HashMap::new(),
            access_times: HashMap::new(),
            loading: HashSet::new(),
        }
    }
}

impl<T> ChunkStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chunk-aligned start index containing `absolute_index`.
    pub fn chunk_start_for(chunk_size: usize, absolute_index: usize) -> usize {
        (absolute_index / chunk_size) * chunk_size
    }

    pub fn is_loaded(&self, chunk_size: usize, absolute_index: usize) -> bool {
        self.chunks
            .contains_key(&Self::chunk_start_for(chunk_size, absolute_index))
    }

    pub fn is_loading(&self, chunk_start: usize) -> bool {
        self.loading.contains(&chunk_start)
    }

    /// Returns the item at `absolute_index`, refreshing its chunk's access
    /// time, or `None` if the containing chunk isn't resident.
    pub fn get_item(&mut self, chunk_size: usize, absolute_index: usize) -> Option<&Item<T>> {
        let chunk_start = Self::chunk_start_for(chunk_size, absolute_index);
        if self.chunks.contains_key(&chunk_start) {
            self.access_times.insert(chunk_start, Instant::now());
        }
        let chunk = self.chunks.get(&chunk_start)?;
        let offset = absolute_index - chunk.start_index;
        chunk.items.get(offset)
    }

    pub fn get_item_mut(&mut self, chunk_size: usize, absolute_index: usize) -> Option<&mut Item<T>> {
        let chunk_start = Self::chunk_start_for(chunk_size, absolute_index);
        let chunk = self.chunks.get_mut(&chunk_start)?;
        let offset = absolute_index - chunk.start_index;
        chunk.items.get_mut(offset)
    }

    /// Linear scan across resident chunks; chunk stores don't index by id.
    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.chunks.values().find_map(|chunk| {
            chunk
                .items
                .iter()
                .position(|item| item.id == id)
                .map(|offset| chunk.start_index + offset)
        })
    }

    /// Installs a freshly loaded chunk and clears its loading flag.
    pub fn insert(&mut self, chunk: Chunk<T>) {
        let start = chunk.start_index;
        self.loading.remove(&start);
        self.access_times.insert(start, chunk.loaded_at);
        self.chunks.insert(start, chunk);
    }

    pub fn remove(&mut self, chunk_start: usize) -> Option<Chunk<T>> {
        self.access_times.remove(&chunk_start);
        self.chunks.remove(&chunk_start)
    }

    pub fn mark_loading(&mut self, chunk_start: usize) {
        self.loading.insert(chunk_start);
    }

    pub fn unmark_loading(&mut self, chunk_start: usize) {
        self.loading.remove(&chunk_start);
    }

    pub fn has_loading(&self) -> bool {
        !self.loading.is_empty()
    }

    pub fn loading_starts(&self) -> impl Iterator<Item = usize> + '_ {
        self.loading.iter().copied()
    }

    pub fn resident_ranges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.chunks.values().map(|c| (c.start_index, c.end_index))
    }

    pub fn resident_starts(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.keys().copied()
    }

    pub fn get_chunk(&self, chunk_start: usize) -> Option<&Chunk<T>> {
        self.chunks.get(&chunk_start)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.access_times.clear();
        self.loading.clear();
    }
}
