//! The viewport calculator (§4.1, C1): pure functions computing a new
//! [`ViewportState`] from navigation intent. None of these functions touch a
//! chunk store or a data source — they only know `total_items`.

/// Immutable-per-session sizing/threshold configuration (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportConfig {
    pub height: usize,
    /// Row offset from the top at which the cursor locks while scrolling
    /// down through the dataset. `-1` disables top-threshold locking.
    pub top_threshold: i64,
    /// Row offset from the *bottom* at which the cursor locks while
    /// scrolling up. `-1` disables bottom-threshold locking.
    pub bottom_threshold: i64,
    pub chunk_size: usize,
    pub initial_index: usize,
    pub bounding_area_before: usize,
    pub bounding_area_after: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            height: 10,
            top_threshold: -1,
            bottom_threshold: -1,
            chunk_size: 50,
            initial_index: 0,
            bounding_area_before: 0,
            bounding_area_after: 0,
        }
    }
}

impl ViewportConfig {
    /// Fixes an invalid configuration to the nearest legal value rather than
    /// failing (§7 "Configuration violation"): height flows from terminal
    /// dimensions the host doesn't fully control, so clamping beats erroring.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.height = self.height.max(1);
        self.chunk_size = self.chunk_size.max(1);
        self.top_threshold = Self::clamp_threshold(self.top_threshold, self.height);
        self.bottom_threshold = Self::clamp_threshold(self.bottom_threshold, self.height);
        self
    }

    fn clamp_threshold(threshold: i64, height: usize) -> i64 {
        if threshold < 0 {
            return -1;
        }
        let height = height as i64;
        if threshold >= height { -1 } else { threshold }
    }

    pub fn top_threshold_enabled(&self) -> bool {
        self.top_threshold >= 0 && (self.top_threshold as usize) < self.height
    }

    pub fn bottom_threshold_enabled(&self) -> bool {
        self.bottom_threshold >= 0 && (self.bottom_threshold as usize) < self.height
    }

    /// The viewport row (from the top) at which the bottom threshold locks:
    /// an offset *from the bottom* translated to an absolute row.
    pub fn bottom_threshold_row(&self) -> usize {
        self.height
            .saturating_sub(self.bottom_threshold.max(0) as usize)
            .saturating_sub(1)
    }

    pub fn top_threshold_row(&self) -> usize {
        self.top_threshold.max(0) as usize
    }

    fn max_viewport_start(&self, total_items: usize) -> usize {
        total_items.saturating_sub(self.height)
    }
}

/// The user's window into the virtual sequence (§3). All fields are derived
/// deterministically from `viewport_start_index`, `cursor_index`, the
/// config, and `total_items` — see [`update_viewport_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportState {
    pub viewport_start_index: usize,
    pub cursor_index: usize,
    pub cursor_viewport_index: usize,
    pub is_at_top_threshold: bool,
    pub is_at_bottom_threshold: bool,
    pub at_dataset_start: bool,
    pub at_dataset_end: bool,
}

impl ViewportState {
    /// The state for an empty or freshly-initialized dataset, cursor parked
    /// at `config.initial_index`.
    pub fn initial(config: &ViewportConfig, total_items: usize) -> Self {
        let state = Self {
            cursor_index: config.initial_index.min(total_items.saturating_sub(1)),
            ..Self::default()
        };
        jump_to(state, config, total_items, state.cursor_index)
    }
}

/// Recomputes `cursor_viewport_index` and the four derived flags, and
/// re-clamps `viewport_start_index` into `[0, max(0, total_items - height)]`
/// (§3 invariants 1-6). Called at the end of every operation below.
pub fn update_viewport_bounds(
    mut state: ViewportState,
    config: &ViewportConfig,
    total_items: usize,
) -> ViewportState {
    let max_start = config.max_viewport_start(total_items);
    state.viewport_start_index = state.viewport_start_index.min(max_start);
    if total_items == 0 {
        state.cursor_index = 0;
        state.cursor_viewport_index = 0;
    } else {
        state.cursor_index = state.cursor_index.min(total_items - 1);
        state.cursor_viewport_index = state.cursor_index.saturating_sub(state.viewport_start_index);
    }

    state.is_at_top_threshold = config.top_threshold_enabled()
        && state.cursor_viewport_index == config.top_threshold_row();
    state.is_at_bottom_threshold = config.bottom_threshold_enabled()
        && state.cursor_viewport_index == config.bottom_threshold_row();
    state.at_dataset_start = state.viewport_start_index == 0;
    state.at_dataset_end = state.viewport_start_index + config.height >= total_items;
    state
}

/// No-op if `cursor_index <= 0` (B1). Otherwise moves the cursor up one row,
/// scrolling the viewport to hold the cursor at the top threshold if one is
/// configured and active, else letting the cursor travel until it hits the
/// viewport's top edge before scrolling (§4.1).
pub fn cursor_up(state: ViewportState, config: &ViewportConfig, total_items: usize) -> ViewportState {
    if total_items == 0 || state.cursor_index == 0 {
        return update_viewport_bounds(state, config, total_items);
    }
    let mut next = state;
    next.cursor_index -= 1;

    let at_top_threshold = config.top_threshold_enabled()
        && state.cursor_viewport_index == config.top_threshold_row();
    let at_viewport_edge = state.cursor_viewport_index == 0;
    if (at_top_threshold || at_viewport_edge) && state.viewport_start_index > 0 {
        next.viewport_start_index = state.viewport_start_index - 1;
    }
    update_viewport_bounds(next, config, total_items)
}

/// Symmetric to [`cursor_up`] (B2 at `total_items - 1`); the bottom
/// threshold is expressed as an offset from the bottom edge.
pub fn cursor_down(state: ViewportState, config: &ViewportConfig, total_items: usize) -> ViewportState {
    if total_items == 0 || state.cursor_index + 1 >= total_items {
        return update_viewport_bounds(state, config, total_items);
    }
    let mut next = state;
    next.cursor_index += 1;

    let at_bottom_threshold = config.bottom_threshold_enabled()
        && state.cursor_viewport_index == config.bottom_threshold_row();
    let at_viewport_edge = state.cursor_viewport_index + 1 == config.height;
    if (at_bottom_threshold || at_viewport_edge) && !state.at_dataset_end {
        next.viewport_start_index = state.viewport_start_index + 1;
    }
    update_viewport_bounds(next, config, total_items)
}

/// Moves the cursor up a full page, then repositions the viewport so the
/// cursor sits at the top threshold (or the viewport's top edge when
/// disabled).
pub fn page_up(state: ViewportState, config: &ViewportConfig, total_items: usize) -> ViewportState {
    if total_items == 0 {
        return update_viewport_bounds(state, config, total_items);
    }
    let mut next = state;
    next.cursor_index = state.cursor_index.saturating_sub(config.height);
    let row = if config.top_threshold_enabled() {
        config.top_threshold_row()
    } else {
        0
    };
    next.viewport_start_index = next.cursor_index.saturating_sub(row);
    update_viewport_bounds(next, config, total_items)
}

/// Moves the cursor down a full page, then repositions the viewport so the
/// cursor sits at the bottom threshold (or the viewport's bottom edge when
/// disabled).
pub fn page_down(state: ViewportState, config: &ViewportConfig, total_items: usize) -> ViewportState {
    if total_items == 0 {
        return update_viewport_bounds(state, config, total_items);
    }
    let mut next = state;
    next.cursor_index = (state.cursor_index + config.height).min(total_items - 1);
    let row = if config.bottom_threshold_enabled() {
        config.bottom_threshold_row()
    } else {
        config.height.saturating_sub(1)
    };
    next.viewport_start_index = next.cursor_index.saturating_sub(row);
    update_viewport_bounds(next, config, total_items)
}

pub fn jump_to_start(config: &ViewportConfig, total_items: usize) -> ViewportState {
    update_viewport_bounds(ViewportState::default(), config, total_items)
}

pub fn jump_to_end(config: &ViewportConfig, total_items: usize) -> ViewportState {
    if total_items == 0 {
        return update_viewport_bounds(ViewportState::default(), config, total_items);
    }
    let state = ViewportState {
        cursor_index: total_items - 1,
        viewport_start_index: config.max_viewport_start(total_items),
        ..ViewportState::default()
    };
    update_viewport_bounds(state, config, total_items)
}

/// Clamps `index` into `[0, total_items)` and places the viewport per the
/// priority in §4.1: dataset fits → start at 0; near start → start at 0;
/// near end → pin the viewport to the end; otherwise center the cursor on
/// the top threshold (or the vertical middle if thresholds are disabled).
pub fn jump_to(
    state: ViewportState,
    config: &ViewportConfig,
    total_items: usize,
    index: usize,
) -> ViewportState {
    if total_items == 0 {
        return update_viewport_bounds(ViewportState::default(), config, total_items);
    }
    let index = index.min(total_items - 1);
    let mut next = state;
    next.cursor_index = index;

    let max_start = config.max_viewport_start(total_items);
    if total_items <= config.height {
        next.viewport_start_index = 0;
    } else if config.top_threshold_enabled() && index < config.top_threshold_row() {
        next.viewport_start_index = 0;
    } else {
        let row = if config.top_threshold_enabled() {
            config.top_threshold_row()
        } else {
            config.height / 2
        };
        let desired_start = index.saturating_sub(row);
        next.viewport_start_index = desired_start.min(max_start);
    }
    update_viewport_bounds(next, config, total_items)
}
