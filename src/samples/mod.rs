//! Discovery of still/clip sample pairs in the input tree.

mod natural;
mod scan;

pub use natural::{natural_cmp, sort_samples};
pub use scan::{ScanError, scan_samples};

use std::path::{Path, PathBuf};

/// Extension of the looping clip that defines a sample.
pub const CLIP_EXTENSION: &str = "avi";
/// Extension of the still paired with each clip.
pub const STILL_EXTENSION: &str = "jpg";

/// A `<stem>.jpg` / `<stem>.avi` pair living in `dir`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SamplePair {
    pub dir: PathBuf,
    pub stem: String,
}

impl SamplePair {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    pub fn image_path(&self) -> PathBuf {
        self.path_in(&self.dir, STILL_EXTENSION)
    }

    pub fn clip_path(&self) -> PathBuf {
        self.path_in(&self.dir, CLIP_EXTENSION)
    }

    /// Both file names of the pair, still first.
    pub fn file_names(&self) -> [String; 2] {
        [
            format!("{}.{STILL_EXTENSION}", self.stem),
            format!("{}.{CLIP_EXTENSION}", self.stem),
        ]
    }

    fn path_in(&self, dir: &Path, extension: &str) -> PathBuf {
        dir.join(format!("{}.{extension}", self.stem))
    }
}
