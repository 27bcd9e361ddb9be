//! Virtualized photo grid geometry and its persisted view preferences.

use cache::{get_json, scoped_key, set_json, KeyValueStore};
use std::ops::Range;

pub const MIN_COLUMNS: u16 = 3;
pub const MAX_COLUMNS: u16 = 16;
pub const DEFAULT_COLUMNS: u16 = 4;
/// Rows realized beyond each edge of the viewport.
pub const OVERSCAN: usize = 5;
pub const GAP: f32 = 2.0;
pub const FALLBACK_ROW_HEIGHT: f32 = 280.0;

pub const GRID_SIZE_KEY: &str = "photosGridSize";
pub const SCROLL_OFFSET_KEY: &str = "galleryScrollOffset";

pub fn clamp_columns(columns: u16) -> u16 {
    columns.clamp(MIN_COLUMNS, MAX_COLUMNS)
}

pub fn row_count(photo_count: usize, columns: u16) -> usize {
    let columns = columns.max(1) as usize;
    (photo_count + columns - 1) / columns
}

/// Photo index shown at `(row, col)`, or `None` for cells past the end.
pub fn cell_index(row: usize, col: usize, columns: u16, photo_count: usize) -> Option<usize> {
    let columns = columns as usize;
    if col >= columns {
        return None;
    }
    let index = row * columns + col;
    (index < photo_count).then_some(index)
}

pub fn cell_position(index: usize, columns: u16) -> (usize, usize) {
    let columns = columns.max(1) as usize;
    (index / columns, index % columns)
}

/// Row height for a 3:2 cell in a container `width` pixels wide.
pub fn estimate_row_height(width: Option<f32>, columns: u16) -> f32 {
    match width {
        Some(w) if w > 0.0 => (w / columns.max(1) as f32 / 3.0 * 2.0).floor(),
        _ => FALLBACK_ROW_HEIGHT,
    }
}

/// Rows to realize for the given scroll position, overscan included.
pub fn visible_rows(
    scroll_offset: f32,
    viewport_height: f32,
    row_height: f32,
    rows: usize,
    overscan: usize,
) -> Range<usize> {
    if rows == 0 {
        return 0..0;
    }
    let pitch = (row_height + GAP).max(1.0);
    let offset = scroll_offset.max(0.0);
    let first = (offset / pitch).floor() as usize;
    let last = ((offset + viewport_height.max(0.0)) / pitch).ceil() as usize;
    let start = first.saturating_sub(overscan).min(rows);
    let end = (last + overscan).min(rows).max(start);
    start..end
}

/// Photo indices whose cells fall in `rows`.
pub fn indices_in_rows(rows: Range<usize>, columns: u16, photo_count: usize) -> Range<usize> {
    let columns = columns as usize;
    let start = (rows.start * columns).min(photo_count);
    let end = (rows.end * columns).min(photo_count);
    start..end
}

fn grid_size_key(directory: Option<&str>) -> String {
    scoped_key(GRID_SIZE_KEY, directory)
}

fn scroll_offset_key(directory: Option<&str>) -> String {
    scoped_key(SCROLL_OFFSET_KEY, directory)
}

/// Stored column count, stored as a one-element JSON array. Falls back to
/// the global value, then to [`DEFAULT_COLUMNS`].
pub fn load_grid_size(store: &dyn KeyValueStore, directory: Option<&str>) -> u16 {
    let mut keys = vec![grid_size_key(directory)];
    if directory.is_some() {
        keys.push(grid_size_key(None));
    }
    for key in keys {
        match get_json::<Vec<u16>>(store, &key) {
            Ok(Some(values)) => {
                if let Some(first) = values.first() {
                    return clamp_columns(*first);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring stored grid size {}: {}", key, e),
        }
    }
    DEFAULT_COLUMNS
}

pub fn save_grid_size(store: &dyn KeyValueStore, directory: Option<&str>, columns: u16) {
    let key = grid_size_key(directory);
    if let Err(e) = set_json(store, &key, &[clamp_columns(columns)]) {
        tracing::warn!("Failed to persist grid size: {}", e);
    }
}

pub fn load_scroll_offset(store: &dyn KeyValueStore, directory: Option<&str>) -> f32 {
    let key = scroll_offset_key(directory);
    match store.get_item(&key) {
        Ok(Some(raw)) => raw
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0),
        Ok(None) => 0.0,
        Err(e) => {
            tracing::warn!("Failed to read scroll offset: {}", e);
            0.0
        }
    }
}

pub fn save_scroll_offset(store: &dyn KeyValueStore, directory: Option<&str>, offset: f32) {
    let key = scroll_offset_key(directory);
    if let Err(e) = store.set_item(&key, &offset.max(0.0).round().to_string()) {
        tracing::warn!("Failed to persist scroll offset: {}", e);
    }
}

/// Live geometry of the grid viewport.
#[derive(Debug, Clone)]
pub struct GridState {
    pub columns: u16,
    pub pending_columns: u16,
    pub width: Option<f32>,
    pub viewport_height: f32,
    pub scroll_offset: f32,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            pending_columns: DEFAULT_COLUMNS,
            width: None,
            viewport_height: 800.0,
            scroll_offset: 0.0,
        }
    }
}

impl GridState {
    pub fn set_columns(&mut self, columns: u16) {
        self.columns = clamp_columns(columns);
        self.pending_columns = self.columns;
    }

    pub fn row_height(&self) -> f32 {
        estimate_row_height(self.width, self.columns)
    }

    pub fn visible_rows(&self, photo_count: usize) -> Range<usize> {
        visible_rows(
            self.scroll_offset,
            self.viewport_height,
            self.row_height(),
            row_count(photo_count, self.columns),
            OVERSCAN,
        )
    }

    /// Photo indices actually on screen, without overscan.
    pub fn on_screen(&self, photo_count: usize) -> Range<usize> {
        let rows = visible_rows(
            self.scroll_offset,
            self.viewport_height,
            self.row_height(),
            row_count(photo_count, self.columns),
            0,
        );
        indices_in_rows(rows, self.columns, photo_count)
    }
}
