//! The sorting session: pending samples, the cursor, moves and undo.

mod moves;
mod undo;

pub use moves::MoveError;
pub use undo::MoveRecord;

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::RgbImage;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    categories::CategoryMap,
    media::{self, DecodedClip},
    samples::{SamplePair, ScanError, scan_samples},
};
use moves::move_pair;
use undo::UndoLog;

/// Folder under the output directory that holds one folder per category.
pub const CATEGORIES_DIR: &str = "categories";
/// Moves remembered for undo when nothing else is configured.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Errors raised while starting or driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("No samples found in {0}")]
    NoSamples(PathBuf),
    #[error("Failed to create category folder {path}: {source}")]
    CreateCategoryDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Everything needed to start a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub categories: CategoryMap,
    /// Skip clips that contain an all-black frame.
    pub remove_empty_frames: bool,
    pub undo_limit: usize,
}

impl SessionOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            categories: CategoryMap::default(),
            remove_empty_frames: true,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }

    pub fn with_categories(mut self, categories: CategoryMap) -> Self {
        self.categories = categories;
        self
    }

    pub fn category_root(&self) -> PathBuf {
        self.output_dir.join(CATEGORIES_DIR)
    }
}

/// A sample whose still and clip decoded cleanly.
#[derive(Debug, Clone)]
pub struct LoadedSample {
    pub sample: SamplePair,
    pub still: RgbImage,
    pub clip: DecodedClip,
}

/// Why a sample was dropped from the pending list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable(String),
    EmptyFrame(usize),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unreadable(message) => f.write_str(message),
            SkipReason::EmptyFrame(index) => write!(f, "frame {index} is empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSample {
    pub sample: SamplePair,
    pub reason: SkipReason,
}

/// Outcome of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub sample: SamplePair,
    pub category: String,
    pub destination: PathBuf,
    pub remaining: usize,
}

/// Outcome of a successful undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undone {
    pub sample: SamplePair,
    pub category: String,
    pub index: usize,
}

/// Input from the annotator, already mapped from keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCommand {
    Previous,
    Next,
    Classify(char),
    Undo,
}

/// What a command changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortEvent {
    Navigated(usize),
    /// The command did not apply: an unmapped key, the end of the list, or nothing to undo.
    Unchanged,
    Classified(Classified),
    /// The last pending sample was classified.
    Finished(Classified),
    Undone(Undone),
}

/// Ordered pending samples with a cursor and a bounded undo log.
#[derive(Debug)]
pub struct SortingSession {
    options: SessionOptions,
    pending: Vec<SamplePair>,
    current: usize,
    category_dirs: Vec<PathBuf>,
    undo: UndoLog,
    skipped: Vec<SkippedSample>,
}

impl SortingSession {
    /// Scan the input tree and prepare one output folder per category.
    pub fn start(options: SessionOptions) -> Result<Self, SessionError> {
        let category_root = options.category_root();
        let pending = scan_samples(&options.input_dir, Some(&category_root))?;
        if pending.is_empty() {
            return Err(SessionError::NoSamples(options.input_dir.clone()));
        }
        let mut category_dirs = Vec::with_capacity(options.categories.len());
        for binding in options.categories.bindings() {
            let path = category_root.join(&binding.name);
            fs::create_dir_all(&path)
                .map_err(|source| SessionError::CreateCategoryDir { path: path.clone(), source })?;
            category_dirs.push(path);
        }
        info!(
            samples = pending.len(),
            categories = category_dirs.len(),
            input = %options.input_dir.display(),
            output = %options.output_dir.display(),
            "Sorting session started"
        );
        Ok(Self {
            undo: UndoLog::new(options.undo_limit),
            options,
            pending,
            current: 0,
            category_dirs,
            skipped: Vec::new(),
        })
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.options.categories
    }

    pub fn pending(&self) -> &[SamplePair] {
        &self.pending
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_sample(&self) -> Option<&SamplePair> {
        self.pending.get(self.current)
    }

    /// Samples dropped because they could not be shown.
    pub fn skipped(&self) -> &[SkippedSample] {
        &self.skipped
    }

    /// Number of moves that can still be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_depth() != 0
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.undo.latest()
    }

    /// Output folder for the binding at `index` in the legend.
    pub fn category_dir(&self, index: usize) -> Option<&Path> {
        self.category_dirs.get(index).map(PathBuf::as_path)
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.pending.len() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 || self.pending.is_empty() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Decode the sample under the cursor, dropping any that cannot be shown.
    ///
    /// Dropped samples keep their files; only the pending list forgets them.
    pub fn load_current(&mut self) -> Option<LoadedSample> {
        while let Some(sample) = self.pending.get(self.current).cloned() {
            match load_sample(&sample, self.options.remove_empty_frames) {
                Ok(loaded) => return Some(loaded),
                Err(reason) => {
                    warn!(
                        sample = %sample.clip_path().display(),
                        reason = %reason,
                        "Skipping sample"
                    );
                    self.pending.remove(self.current);
                    self.clamp_cursor();
                    self.skipped.push(SkippedSample { sample, reason });
                }
            }
        }
        None
    }

    /// Move the current sample into the category bound to `key`.
    ///
    /// Returns `Ok(None)` when the key is not bound or nothing is pending.
    pub fn classify(&mut self, key: char) -> Result<Option<Classified>, SessionError> {
        let Some(binding_index) = self.options.categories.lookup(key) else {
            return Ok(None);
        };
        let Some(sample) = self.pending.get(self.current).cloned() else {
            return Ok(None);
        };
        let category = self.options.categories.bindings()[binding_index].name.clone();
        let destination = self.category_dirs[binding_index].clone();
        if let Err(err) = move_pair(&sample, &sample.dir, &destination) {
            error!(
                sample = %sample.stem,
                category = %category,
                error = %err,
                "Failed to move sample"
            );
            return Err(err.into());
        }
        self.undo.push(MoveRecord {
            sample: sample.clone(),
            index: self.current,
            category: category.clone(),
            destination: destination.clone(),
        });
        self.pending.remove(self.current);
        self.clamp_cursor();
        info!(
            sample = %sample.stem,
            category = %category,
            remaining = self.pending.len(),
            "Sample classified"
        );
        Ok(Some(Classified {
            sample,
            category,
            destination,
            remaining: self.pending.len(),
        }))
    }

    /// Put the most recently moved sample back and select it.
    pub fn undo(&mut self) -> Result<Option<Undone>, SessionError> {
        let Some(record) = self.undo.pop() else {
            return Ok(None);
        };
        if let Err(err) = move_pair(&record.sample, &record.destination, &record.sample.dir) {
            error!(
                sample = %record.sample.stem,
                category = %record.category,
                error = %err,
                "Failed to undo sample move"
            );
            self.undo.push(record);
            return Err(err.into());
        }
        let index = record.index.min(self.pending.len());
        self.pending.insert(index, record.sample.clone());
        self.current = index;
        info!(
            sample = %record.sample.stem,
            category = %record.category,
            "Sample move undone"
        );
        Ok(Some(Undone {
            sample: record.sample,
            category: record.category,
            index,
        }))
    }

    pub fn apply(&mut self, command: SortCommand) -> Result<SortEvent, SessionError> {
        let event = match command {
            SortCommand::Previous => navigated(self.previous(), self.current),
            SortCommand::Next => navigated(self.next(), self.current),
            SortCommand::Classify(key) => match self.classify(key)? {
                Some(done) if done.remaining == 0 => SortEvent::Finished(done),
                Some(done) => SortEvent::Classified(done),
                None => SortEvent::Unchanged,
            },
            SortCommand::Undo => self
                .undo()?
                .map_or(SortEvent::Unchanged, SortEvent::Undone),
        };
        Ok(event)
    }

    fn clamp_cursor(&mut self) {
        self.current = self.current.min(self.pending.len().saturating_sub(1));
    }
}

fn navigated(moved: bool, index: usize) -> SortEvent {
    if moved {
        SortEvent::Navigated(index)
    } else {
        SortEvent::Unchanged
    }
}

fn load_sample(sample: &SamplePair, remove_empty_frames: bool) -> Result<LoadedSample, SkipReason> {
    let unreadable = |err: media::MediaError| SkipReason::Unreadable(err.to_string());
    let still = media::load_still(&sample.image_path()).map_err(unreadable)?;
    let clip = media::decode_clip(&sample.clip_path()).map_err(unreadable)?;
    if remove_empty_frames && let Some(index) = clip.first_empty_frame() {
        return Err(SkipReason::EmptyFrame(index));
    }
    Ok(LoadedSample {
        sample: sample.clone(),
        still,
        clip,
    })
}
