use crate::categories::{CategoryBinding, DEFAULT_UNDO_KEY, default_bindings};
use crate::playback::{MAX_FPS, MIN_FPS};
use crate::session::DEFAULT_UNDO_LIMIT;

const MIN_UNDO_LIMIT: usize = 1;
const MAX_UNDO_LIMIT: usize = 10_000;
const MIN_PANE_SIZE: u32 = 64;
const MAX_PANE_SIZE: u32 = 4096;
const MAX_FIRST_FRAME_HOLD_MS: u64 = 5_000;

pub(super) fn clamp_undo_limit(value: usize) -> usize {
    value.clamp(MIN_UNDO_LIMIT, MAX_UNDO_LIMIT)
}

pub(super) fn clamp_pane_size(value: u32) -> u32 {
    value.clamp(MIN_PANE_SIZE, MAX_PANE_SIZE)
}

pub(super) fn clamp_first_frame_hold_ms(value: u64) -> u64 {
    value.min(MAX_FIRST_FRAME_HOLD_MS)
}

pub(super) fn clamp_fallback_fps(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_FPS, MAX_FPS)
    } else {
        default_fallback_fps()
    }
}

pub(super) fn sanitize_undo_key(key: char) -> char {
    if key.is_alphanumeric() {
        key
    } else {
        DEFAULT_UNDO_KEY
    }
}

pub(super) fn default_categories() -> Vec<CategoryBinding> {
    default_bindings()
}

pub(super) fn default_undo_key() -> char {
    DEFAULT_UNDO_KEY
}

pub(super) fn default_pane_size() -> u32 {
    600
}

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

pub(super) fn default_first_frame_hold_ms() -> u64 {
    500
}

pub(super) fn default_fallback_fps() -> f64 {
    30.0
}
