//! Bridges the sorting session and playback state to the egui UI.

mod hotkeys;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use egui::ColorImage;
use rfd::FileDialog;
use tracing::{error, info};

use crate::categories::CategoryMap;
use crate::config::{self, AppConfig};
use crate::egui_app::state::{Screen, SortingViewState, UiState};
use crate::egui_app::ui::style::StatusTone;
use crate::playback::{
    FrameBuffer, LegendLayout, PaneSize, PlaybackClock, compose_frames, frame_interval,
};
use crate::session::{
    LoadedSample, SessionOptions, SortCommand, SortEvent, SortingSession,
};

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    config: AppConfig,
    session: Option<SortingSession>,
    current: Option<CurrentSample>,
    /// Bumped whenever the composed frames are replaced.
    generation: u64,
}

/// The decoded sample on screen and its display-sized frames.
struct CurrentSample {
    loaded: LoadedSample,
    interval: Duration,
    buffer: Option<FrameBuffer>,
    legend: Option<LegendLayout>,
    clock: Option<PlaybackClock>,
}

impl EguiController {
    pub fn new() -> Self {
        Self::from_config(AppConfig::default())
    }

    /// Build a controller around an already loaded config.
    pub fn from_config(config: AppConfig) -> Self {
        let mut controller = Self {
            ui: UiState::default(),
            config: AppConfig::default(),
            session: None,
            current: None,
            generation: 0,
        };
        controller.apply_config(config);
        controller
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&SortingSession> {
        self.session.as_ref()
    }

    fn apply_config(&mut self, cfg: AppConfig) {
        let setup = &mut self.ui.setup;
        setup.input_dir = display_path(cfg.input_dir.as_deref());
        setup.output_dir = display_path(cfg.output_dir.as_deref());
        setup.legend = crate::categories::format_bindings(&cfg.categories);
        self.config = cfg;
    }

    pub fn pick_input_dir_via_dialog(&mut self) {
        if let Some(path) = pick_folder(&self.ui.setup.input_dir) {
            self.ui.setup.input_dir = path.display().to_string();
        }
    }

    pub fn pick_output_dir_via_dialog(&mut self) {
        if let Some(path) = pick_folder(&self.ui.setup.output_dir) {
            self.ui.setup.output_dir = path.display().to_string();
        }
    }

    /// Validate the setup form, persist it and begin sorting.
    pub fn start_session(&mut self) {
        let input_dir = self.ui.setup.input_dir.trim().to_string();
        if input_dir.is_empty() {
            self.set_status("No input directory", StatusTone::Warning);
            return;
        }
        let output_dir = self.ui.setup.output_dir.trim().to_string();
        if output_dir.is_empty() {
            self.set_status("No output directory", StatusTone::Warning);
            return;
        }
        let categories = match CategoryMap::parse(&self.ui.setup.legend, self.config.sorting.undo_key) {
            Ok(categories) => categories,
            Err(err) => {
                self.set_status(err.to_string(), StatusTone::Warning);
                return;
            }
        };
        self.config.input_dir = Some(PathBuf::from(&input_dir));
        self.config.output_dir = Some(PathBuf::from(&output_dir));
        self.config.categories = categories.bindings().to_vec();
        self.ui.setup.legend = categories.format();
        if let Err(err) = config::save(&self.config) {
            error!(error = %err, "Failed to save config");
        }

        let options = SessionOptions {
            input_dir: PathBuf::from(input_dir),
            output_dir: PathBuf::from(output_dir),
            categories,
            remove_empty_frames: self.config.sorting.remove_empty_frames,
            undo_limit: self.config.sorting.undo_limit,
        };
        match SortingSession::start(options) {
            Ok(session) => {
                let total = session.remaining();
                self.session = Some(session);
                self.set_status(format!("Found {total} samples"), StatusTone::Info);
                self.load_current_sample();
            }
            Err(err) => self.set_status(err.to_string(), StatusTone::Error),
        }
    }

    /// Drop the session and go back to the setup form.
    pub fn return_to_setup(&mut self) {
        self.session = None;
        self.current = None;
        self.ui.screen = Screen::Setup;
        self.ui.sorting = SortingViewState::default();
        self.set_status("Session closed", StatusTone::Idle);
    }

    /// Run the commands encoded in this frame's key events.
    pub fn handle_events(&mut self, events: &[egui::Event]) {
        if self.ui.screen == Screen::Setup {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        for command in hotkeys::commands_for_events(events, session.categories()) {
            self.apply_command(command);
        }
    }

    pub fn apply_command(&mut self, command: SortCommand) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.apply(command) {
            Ok(SortEvent::Unchanged) => {}
            Ok(SortEvent::Navigated(_)) => self.load_current_sample(),
            Ok(SortEvent::Classified(done)) => {
                self.set_status(
                    format!(
                        "Moved {} to {} ({} remaining)",
                        done.sample.stem, done.category, done.remaining
                    ),
                    StatusTone::Info,
                );
                self.load_current_sample();
            }
            Ok(SortEvent::Finished(done)) => {
                self.set_status(
                    format!("Moved {} to {}; all samples sorted", done.sample.stem, done.category),
                    StatusTone::Info,
                );
                self.load_current_sample();
            }
            Ok(SortEvent::Undone(undone)) => {
                self.set_status(
                    format!("Restored {} from {}", undone.sample.stem, undone.category),
                    StatusTone::Info,
                );
                self.load_current_sample();
            }
            Err(err) => self.set_status(err.to_string(), StatusTone::Error),
        }
    }

    /// Compose frames and fit the legend for `pane` unless they already match it.
    ///
    /// `measure(text, font_size)` returns the rendered size of a legend line.
    pub fn prepare_frames(
        &mut self,
        pane: PaneSize,
        measure: impl FnMut(&str, f32) -> (f32, f32),
        now: Instant,
    ) {
        let up_to_date = self
            .current
            .as_ref()
            .is_none_or(|current| current.buffer.as_ref().is_some_and(|b| b.pane == pane));
        if up_to_date {
            return;
        }
        let lines = self
            .session
            .as_ref()
            .map(|session| session.categories().legend_lines())
            .unwrap_or_default();
        let hold = self.config.sorting.first_frame_hold();
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let buffer = compose_frames(&current.loaded.still, &current.loaded.clip, pane, current.interval);
        current.legend = Some(LegendLayout::fit(lines, pane, measure));
        if current.clock.is_none() {
            current.clock = Some(PlaybackClock::new(buffer.len(), current.interval, hold, now));
        }
        current.buffer = Some(buffer);
        self.generation += 1;
    }

    /// Advance playback. Returns whether a different frame is now current.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.current
            .as_mut()
            .and_then(|current| current.clock.as_mut())
            .is_some_and(|clock| clock.advance(now))
    }

    pub fn until_next_frame(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .and_then(|current| current.clock.as_ref())
            .and_then(|clock| clock.until_due(now))
    }

    /// Frame to show now, with a key that changes whenever the image does.
    pub fn current_frame(&self) -> Option<((u64, usize), &ColorImage)> {
        let current = self.current.as_ref()?;
        let index = current.clock.as_ref().map_or(0, PlaybackClock::frame);
        let frame = current.buffer.as_ref()?.frame(index)?;
        Some(((self.generation, index), frame))
    }

    pub fn legend(&self) -> Option<&LegendLayout> {
        self.current.as_ref()?.legend.as_ref()
    }

    pub fn pane(&self) -> Option<PaneSize> {
        Some(self.current.as_ref()?.buffer.as_ref()?.pane)
    }

    fn load_current_sample(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let skipped_before = session.skipped().len();
        let loaded = session.load_current();
        let newly_skipped: Vec<String> = session.skipped()[skipped_before..]
            .iter()
            .map(|skip| format!("{} ({})", skip.sample.stem, skip.reason))
            .collect();
        let view = SortingViewState {
            sample_label: session
                .current_sample()
                .map(|sample| sample.clip_path().display().to_string())
                .unwrap_or_default(),
            progress_label: if session.is_finished() {
                String::new()
            } else {
                format!("{} / {}", session.current_index() + 1, session.remaining())
            },
            can_undo: session.can_undo(),
        };
        self.ui.sorting = view;
        let fallback_fps = self.config.sorting.fallback_fps;
        self.current = loaded.map(|loaded| {
            let interval = frame_interval(loaded.clip.fps, fallback_fps);
            CurrentSample {
                loaded,
                interval,
                buffer: None,
                legend: None,
                clock: None,
            }
        });
        self.generation += 1;
        if !newly_skipped.is_empty() {
            self.set_status(
                format!("Skipped {}", newly_skipped.join(", ")),
                StatusTone::Warning,
            );
        }
        if self.current.is_some() {
            self.ui.screen = Screen::Sorting;
        } else {
            info!("All samples processed");
            self.ui.screen = Screen::Finished;
        }
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }
}

impl Default for EguiController {
    fn default() -> Self {
        Self::new()
    }
}

fn pick_folder(current: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new();
    let current = Path::new(current.trim());
    if current.is_dir() {
        dialog = dialog.set_directory(current);
    }
    dialog.pick_folder()
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_default()
}
