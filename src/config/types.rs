use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::categories::{CategoryBinding, CategoryError, CategoryMap};

use super::defaults::{
    clamp_fallback_fps, clamp_first_frame_hold_ms, clamp_pane_size, clamp_undo_limit,
    default_categories, default_fallback_fps, default_first_frame_hold_ms, default_pane_size,
    default_true, default_undo_key, default_undo_limit, sanitize_undo_key,
};

/// Settings persisted between launches.
///
/// Config keys (TOML): `input_dir`, `output_dir`, `categories`, `sorting`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryBinding>,
    #[serde(default)]
    pub sorting: SortingOptions,
}

impl AppConfig {
    pub(crate) fn normalized(mut self) -> Self {
        if self.categories.is_empty() {
            self.categories = default_categories();
        }
        self.sorting = self.sorting.normalized();
        self
    }

    /// Validate the stored legend against the configured undo key.
    pub fn category_map(&self) -> Result<CategoryMap, CategoryError> {
        CategoryMap::from_bindings(self.categories.clone(), self.sorting.undo_key)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            categories: default_categories(),
            sorting: SortingOptions::default(),
        }
    }
}

/// Display and session preferences.
///
/// Config keys: `undo_key`, `pane_width`, `pane_height`, `remove_empty_frames`,
/// `undo_limit`, `first_frame_hold_ms`, `fallback_fps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortingOptions {
    #[serde(default = "default_undo_key")]
    pub undo_key: char,
    /// Initial width of one pane; the window opens two panes wide.
    #[serde(default = "default_pane_size")]
    pub pane_width: u32,
    #[serde(default = "default_pane_size")]
    pub pane_height: u32,
    #[serde(default = "default_true")]
    pub remove_empty_frames: bool,
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
    /// Extra time the first frame stays up so the loop point is visible.
    #[serde(default = "default_first_frame_hold_ms")]
    pub first_frame_hold_ms: u64,
    /// Playback rate for clips whose header carries none.
    #[serde(default = "default_fallback_fps")]
    pub fallback_fps: f64,
}

impl SortingOptions {
    pub(crate) fn normalized(mut self) -> Self {
        self.undo_key = sanitize_undo_key(self.undo_key);
        self.pane_width = clamp_pane_size(self.pane_width);
        self.pane_height = clamp_pane_size(self.pane_height);
        self.undo_limit = clamp_undo_limit(self.undo_limit);
        self.first_frame_hold_ms = clamp_first_frame_hold_ms(self.first_frame_hold_ms);
        self.fallback_fps = clamp_fallback_fps(self.fallback_fps);
        self
    }

    pub fn first_frame_hold(&self) -> Duration {
        Duration::from_millis(self.first_frame_hold_ms)
    }
}

impl Default for SortingOptions {
    fn default() -> Self {
        Self {
            undo_key: default_undo_key(),
            pane_width: default_pane_size(),
            pane_height: default_pane_size(),
            remove_empty_frames: true,
            undo_limit: default_undo_limit(),
            first_frame_hold_ms: default_first_frame_hold_ms(),
            fallback_fps: default_fallback_fps(),
        }
    }
}
