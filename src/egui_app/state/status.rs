use crate::egui_app::ui::style::{self, StatusTone};
use egui::Color32;

/// Entries kept in the rolling status log.
const STATUS_LOG_LIMIT: usize = 200;

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
    /// Rolling status log entries, newest last.
    pub log: Vec<String>,
}

impl StatusBarState {
    /// Default status shown before a session starts.
    pub fn idle() -> Self {
        let (label, color) = style::status_badge(StatusTone::Idle);
        Self {
            text: "Pick an input and output folder to start sorting".into(),
            badge_label: label.into(),
            badge_color: color,
            log: Vec::new(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = style::status_badge(tone);
        self.text = text.into();
        self.badge_label = label.into();
        self.badge_color = color;
        self.log.push(format!("[{label}] {}", self.text));
        if self.log.len() > STATUS_LOG_LIMIT {
            let excess = self.log.len() - STATUS_LOG_LIMIT;
            self.log.drain(..excess);
        }
    }

    /// Concatenate log entries into a single displayable string.
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}
