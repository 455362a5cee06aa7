//! Display-ready frames for the current sample and the timing to replay them.

mod clock;
mod compose;
mod legend;

pub use clock::PlaybackClock;
pub use compose::{FrameBuffer, compose_frames};
pub use legend::{LEGEND_START_SIZE, LegendLayout};

use std::time::Duration;

/// Fastest and slowest rates a clip is replayed at.
pub const MIN_FPS: f64 = 1.0;
pub const MAX_FPS: f64 = 240.0;

/// Size of one half of the display: the still or the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSize {
    pub width: u32,
    pub height: u32,
}

impl PaneSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Split the drawable area into two side-by-side panes.
    pub fn from_available(width: f32, height: f32) -> Self {
        Self::new((width / 2.0).floor() as u32, height.floor() as u32)
    }
}

/// Delay between frames for a clip recorded at `fps`.
pub fn frame_interval(fps: f64, fallback_fps: f64) -> Duration {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        fallback_fps
    };
    Duration::from_secs_f64(1.0 / fps.clamp(MIN_FPS, MAX_FPS))
}
