//! Shared state types for the egui UI.

mod status;

pub use status::*;

/// Which screen the central panel shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Setup,
    Sorting,
    Finished,
}

/// Editable fields of the setup screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetupForm {
    pub input_dir: String,
    pub output_dir: String,
    /// Legend in `name{key},name{key}` form.
    pub legend: String,
}

/// Labels describing the sample on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortingViewState {
    pub sample_label: String,
    /// `position / total` of the sample in the pending list.
    pub progress_label: String,
    pub can_undo: bool,
}

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub screen: Screen,
    pub setup: SetupForm,
    pub sorting: SortingViewState,
    pub status: StatusBarState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            screen: Screen::default(),
            setup: SetupForm::default(),
            sorting: SortingViewState::default(),
            status: StatusBarState::idle(),
        }
    }
}
