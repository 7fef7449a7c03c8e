//! The bounding-area planner (§4.3, C3): decides which chunks to load and
//! unload for the current viewport. Derived fresh from the viewport and
//! config every time it's needed — never cached (§3).

use crate::viewport::{ViewportConfig, ViewportState};

/// The range of absolute indices to keep resident around the viewport, plus
/// its chunk-aligned boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingArea {
    pub start_index: usize,
    pub end_index: usize,
    pub chunk_start: usize,
    /// Exclusive.
    pub chunk_end: usize,
}

/// Returns `None` when the dataset is empty — there is nothing to bound.
pub fn bounding_area(
    viewport: &ViewportState,
    config: &ViewportConfig,
    total_items: usize,
) -> Option<BoundingArea> {
    if total_items == 0 {
        return None;
    }
    let start = viewport
        .viewport_start_index
        .saturating_sub(config.bounding_area_before);
    let end = (viewport.viewport_start_index + config.height - 1 + config.bounding_area_after)
        .min(total_items - 1);
    let chunk_start = (start / config.chunk_size) * config.chunk_size;
    let chunk_end = (end / config.chunk_size) * config.chunk_size + config.chunk_size;
    Some(BoundingArea {
        start_index: start,
        end_index: end,
        chunk_start,
        chunk_end,
    })
}

/// Chunk-aligned start indices in `[area.chunk_start, area.chunk_end)`,
/// bounded by `total_items`.
pub fn chunks_to_load(area: &BoundingArea, total_items: usize, chunk_size: usize) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut start = area.chunk_start;
    while start < area.chunk_end && start < total_items {
        starts.push(start);
        start += chunk_size;
    }
    starts
}

/// Every resident chunk (given as `(start_index, end_index)` pairs) whose
/// range doesn't intersect `[area.start_index, area.end_index]`.
pub fn chunks_to_unload<I>(resident: I, area: &BoundingArea) -> Vec<usize>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    resident
        .into_iter()
        .filter(|&(start, end)| end < area.start_index || start > area.end_index)
        .map(|(start, _)| start)
        .collect()
}

/// A chunk is critical when its range overlaps the current viewport;
/// while any critical chunk is loading, navigation is gated (§4.3, I4).
pub fn is_critical(
    chunk_start: usize,
    chunk_end_inclusive: usize,
    viewport: &ViewportState,
    config: &ViewportConfig,
) -> bool {
    let viewport_start = viewport.viewport_start_index;
    let viewport_end = viewport_start + config.height.saturating_sub(1);
    chunk_start <= viewport_end && chunk_end_inclusive >= viewport_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::update_viewport_bounds;

    fn config(height: usize, chunk_size: usize, before: usize, after: usize) -> ViewportConfig {
        ViewportConfig {
            height,
            top_threshold: -1,
            bottom_threshold: -1,
            chunk_size,
            initial_index: 0,
            bounding_area_before: before,
            bounding_area_after: after,
        }
    }

    /// S3 — chunk load gate setup: jumping to index 25 with chunk_size 10
    /// should schedule chunk 20.
    #[test]
    fn bounding_area_aligns_to_chunk_boundaries() {
        let cfg = config(5, 10, 0, 0);
        let viewport = crate::viewport::jump_to(ViewportState::default(), &cfg, 50, 25);
        let area = bounding_area(&viewport, &cfg, 50).unwrap();
        let to_load = chunks_to_load(&area, 50, 10);
        assert!(to_load.contains(&20));
    }

    #[test]
    fn empty_dataset_has_no_bounding_area() {
        let cfg = config(5, 10, 0, 0);
        let viewport = update_viewport_bounds(ViewportState::default(), &cfg, 0);
        assert!(bounding_area(&viewport, &cfg, 0).is_none());
    }

    #[test]
    fn chunks_outside_area_are_flagged_for_unload() {
        let cfg = config(5, 10, 0, 0);
        let viewport = update_viewport_bounds(ViewportState::default(), &cfg, 100);
        let area = bounding_area(&viewport, &cfg, 100).unwrap();
        let resident = vec![(0, 9), (50, 59)];
        let unload = chunks_to_unload(resident, &area);
        assert_eq!(unload, vec![50]);
    }

    #[test]
    fn critical_chunk_overlaps_viewport() {
        let cfg = config(5, 10, 0, 0);
        let viewport = update_viewport_bounds(ViewportState::default(), &cfg, 100);
        assert!(is_critical(0, 9, &viewport, &cfg));
        assert!(!is_critical(10, 19, &viewport, &cfg));
    }
}
