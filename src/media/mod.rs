//! Reading a sample's still and decoding its clip into frames.

mod avi;
mod mjpeg;
#[cfg(test)]
#[path = "../../tests/support/avi.rs"]
pub(crate) mod test_avi;

pub use avi::{AviError, VideoCodec};

use std::path::{Path, PathBuf};

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a sample's media files.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Invalid clip {path}: {source}")]
    Clip { path: PathBuf, source: AviError },
}

/// Every frame of a clip plus the rate it should play at.
#[derive(Debug, Clone)]
pub struct DecodedClip {
    pub frames: Vec<RgbImage>,
    /// Frames per second from the container; `0.0` when the file does not say.
    pub fps: f64,
}

impl DecodedClip {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|frame| frame.dimensions())
            .unwrap_or((0, 0))
    }

    /// Index of the first frame whose pixels are all black.
    pub fn first_empty_frame(&self) -> Option<usize> {
        self.frames
            .iter()
            .position(|frame| frame.as_raw().iter().all(|&value| value == 0))
    }
}

/// Decode the still shown next to the clip.
pub fn load_still(path: &Path) -> Result<RgbImage, MediaError> {
    let bytes = read(path)?;
    image::load_from_memory(&bytes)
        .map(|image| image.to_rgb8())
        .map_err(|source| MediaError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Demux and decode every video frame of an AVI clip.
pub fn decode_clip(path: &Path) -> Result<DecodedClip, MediaError> {
    let bytes = read(path)?;
    decode_clip_bytes(&bytes).map_err(|source| MediaError::Clip {
        path: path.to_path_buf(),
        source,
    })
}

pub fn decode_clip_bytes(bytes: &[u8]) -> Result<DecodedClip, AviError> {
    let clip = avi::parse(bytes)?;
    debug!(
        codec = ?clip.codec(),
        frames = clip.frame_count(),
        fps = clip.fps(),
        "Decoding clip"
    );
    let frames = clip.decode_frames()?;
    Ok(DecodedClip {
        frames,
        fps: clip.fps(),
    })
}

fn read(path: &Path) -> Result<Vec<u8>, MediaError> {
    std::fs::read(path).map_err(|source| MediaError::Read {
        path: path.to_path_buf(),
        source,
    })
}
