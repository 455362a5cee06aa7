//! egui front end: setup form, sorting display and status bar.

pub mod controller;
pub mod state;
pub mod ui;
