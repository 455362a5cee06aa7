use std::{collections::VecDeque, path::PathBuf};

use crate::samples::SamplePair;

/// A completed move that can be reversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub sample: SamplePair,
    /// Position of the sample in the pending list when it was moved.
    pub index: usize,
    pub category: String,
    pub destination: PathBuf,
}

/// Bounded history of moves, newest last.
#[derive(Debug)]
pub(crate) struct UndoLog {
    entries: VecDeque<MoveRecord>,
    limit: usize,
}

impl UndoLog {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record a move, forgetting the oldest one once the log is full.
    pub(crate) fn push(&mut self, record: MoveRecord) {
        self.entries.push_back(record);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub(crate) fn pop(&mut self) -> Option<MoveRecord> {
        self.entries.pop_back()
    }

    pub(crate) fn latest(&self) -> Option<&MoveRecord> {
        self.entries.back()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
