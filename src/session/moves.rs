use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::error;

use crate::samples::SamplePair;

/// Errors raised while moving a sample pair between folders.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("Sample file not found: {0}")]
    Missing(PathBuf),
    #[error("Destination already exists: {0}")]
    Exists(PathBuf),
    #[error("Failed to move {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Move both files of `sample` from `from_dir` to `to_dir`.
///
/// Nothing moves unless both sources exist and both destinations are free;
/// if the second file fails the first is moved back.
pub(crate) fn move_pair(sample: &SamplePair, from_dir: &Path, to_dir: &Path) -> Result<(), MoveError> {
    let planned: Vec<(PathBuf, PathBuf)> = sample
        .file_names()
        .iter()
        .map(|name| (from_dir.join(name), to_dir.join(name)))
        .collect();
    for (from, to) in &planned {
        if !from.is_file() {
            return Err(MoveError::Missing(from.clone()));
        }
        if to.exists() {
            return Err(MoveError::Exists(to.clone()));
        }
    }
    for (done, (from, to)) in planned.iter().enumerate() {
        if let Err(err) = move_file(from, to) {
            roll_back(&planned[..done]);
            return Err(err);
        }
    }
    Ok(())
}

fn roll_back(moved: &[(PathBuf, PathBuf)]) {
    for (from, to) in moved.iter().rev() {
        if let Err(err) = move_file(to, from) {
            error!(
                from = %to.display(),
                to = %from.display(),
                error = %err,
                "Failed to roll back partial sample move"
            );
        }
    }
}

/// Rename, or copy then remove when the rename crosses filesystems.
pub(crate) fn move_file(from: &Path, to: &Path) -> Result<(), MoveError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    let io_error = |source| MoveError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    if let Err(source) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(io_error(source));
    }
    if let Err(source) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(io_error(source));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_pair(dir: &Path, stem: &str) -> SamplePair {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(format!("{stem}.jpg")), b"still").unwrap();
        fs::write(dir.join(format!("{stem}.avi")), b"clip").unwrap();
        SamplePair::new(dir, stem)
    }

    #[test]
    fn moves_both_files() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("in");
        let target = temp.path().join("out");
        fs::create_dir_all(&target).unwrap();
        let pair = write_pair(&source, "s1");

        move_pair(&pair, &source, &target).unwrap();

        assert!(!pair.image_path().exists());
        assert!(!pair.clip_path().exists());
        assert_eq!(fs::read(target.join("s1.jpg")).unwrap(), b"still");
        assert_eq!(fs::read(target.join("s1.avi")).unwrap(), b"clip");
    }

    #[test]
    fn missing_partner_moves_nothing() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("in");
        let target = temp.path().join("out");
        fs::create_dir_all(&target).unwrap();
        let pair = write_pair(&source, "s1");
        fs::remove_file(pair.image_path()).unwrap();

        let err = move_pair(&pair, &source, &target).unwrap_err();

        assert!(matches!(err, MoveError::Missing(path) if path == pair.image_path()));
        assert!(pair.clip_path().exists());
    }

    #[test]
    fn occupied_destination_moves_nothing() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("in");
        let target = temp.path().join("out");
        let pair = write_pair(&source, "s1");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("s1.avi"), b"older").unwrap();

        let err = move_pair(&pair, &source, &target).unwrap_err();

        assert!(matches!(err, MoveError::Exists(path) if path == target.join("s1.avi")));
        assert!(pair.image_path().exists());
        assert!(!target.join("s1.jpg").exists());
        assert_eq!(fs::read(target.join("s1.avi")).unwrap(), b"older");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_copy_leaves_no_partial_destination() {
        let temp = tempdir().unwrap();
        let to = temp.path().join("partial.avi");

        // Renaming across filesystems fails, and reading the unmapped start
        // of this file fails after the copy has created `to`.
        let err = move_file(Path::new("/proc/self/mem"), &to).unwrap_err();

        assert!(matches!(err, MoveError::Io { .. }));
        assert!(!to.exists());
    }
}
