//! Library exports for the sorting tool, shared by the binary and tests.
/// Application folder resolution.
pub mod app_dirs;
/// Category legend parsing and lookup.
pub mod categories;
/// Persisted settings.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Tracing setup.
pub mod logging;
/// Still and clip decoding.
pub mod media;
/// Frame composition, legend fitting and playback timing.
pub mod playback;
/// Sample pair discovery.
pub mod samples;
/// Sorting session: classify, navigate, undo.
pub mod session;
