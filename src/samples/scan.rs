use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;

use super::{CLIP_EXTENSION, SamplePair, sort_samples};

/// Errors that can occur while scanning the input folder.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Input folder is not a directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Recursively collect every clip under `root` as a sample pair, in natural order.
///
/// `skip_dir` (typically the category output tree) is never descended into, so
/// samples that were already sorted are not presented again.
pub fn scan_samples(root: &Path, skip_dir: Option<&Path>) -> Result<Vec<SamplePair>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::InvalidRoot(root.to_path_buf()));
    }
    let skip_dir = skip_dir.map(|skip| skip_path_under(root, skip));
    let mut samples = Vec::new();
    visit_dir(root, skip_dir.as_deref(), &mut |path| {
        if let Some(pair) = pair_for_clip(path) {
            samples.push(pair);
        }
    })?;
    sort_samples(&mut samples);
    Ok(samples)
}

/// Spell `skip` the way the walk from `root` will reach it, so symlinked or
/// `..`-laden roots still match the folder to skip.
fn skip_path_under(root: &Path, skip: &Path) -> PathBuf {
    let canonical_root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let canonical_skip = fs::canonicalize(skip).unwrap_or_else(|_| skip.to_path_buf());
    match canonical_skip.strip_prefix(&canonical_root) {
        Ok(relative) => root.join(relative),
        Err(_) => skip.to_path_buf(),
    }
}

fn pair_for_clip(path: &Path) -> Option<SamplePair> {
    let is_clip = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == CLIP_EXTENSION);
    if !is_clip {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let dir = path.parent()?;
    Some(SamplePair::new(dir, stem))
}

fn visit_dir(
    root: &Path,
    skip_dir: Option<&Path>,
    visitor: &mut impl FnMut(&Path),
) -> Result<(), ScanError> {
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if dir != root => {
                warn!(
                    dir = %dir.display(),
                    error = %source,
                    "Skipping unreadable folder during scan"
                );
                continue;
            }
            Err(source) => {
                return Err(ScanError::Io {
                    path: dir.clone(),
                    source,
                });
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "Failed to read folder entry");
                    continue;
                }
            };
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                warn!(path = %path.display(), "Failed to read file type during scan");
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                if skip_dir.is_none_or(|skip| skip != path) {
                    stack.push(path);
                }
            } else if file_type.is_file() {
                visitor(&path);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn finds_nested_clips_in_natural_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("animal2/b10.avi"));
        touch(&root.join("animal2/b10.jpg"));
        touch(&root.join("animal2/b9.avi"));
        touch(&root.join("animal10/a1.avi"));
        touch(&root.join("animal10/notes.txt"));
        touch(&root.join("animal10/a1.jpg"));

        let samples = scan_samples(root, None).unwrap();

        assert_eq!(
            samples,
            vec![
                SamplePair::new(root.join("animal2"), "b9"),
                SamplePair::new(root.join("animal2"), "b10"),
                SamplePair::new(root.join("animal10"), "a1"),
            ]
        );
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_samples(&missing, None),
            Err(ScanError::InvalidRoot(path)) if path == missing
        ));
    }

    #[test]
    fn skip_dir_hides_already_sorted_samples() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("animal1/a.avi"));
        touch(&root.join("categories/junk/b.avi"));

        let samples = scan_samples(root, Some(&root.join("categories"))).unwrap();

        assert_eq!(samples, vec![SamplePair::new(root.join("animal1"), "a")]);
    }

    #[cfg(unix)]
    #[test]
    fn skip_dir_matches_through_a_symlinked_root() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real");
        touch(&real.join("animal1/a.avi"));
        touch(&real.join("categories/junk/done.avi"));
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let samples = scan_samples(&link, Some(&real.join("categories"))).unwrap();

        assert_eq!(samples, vec![SamplePair::new(link.join("animal1"), "a")]);
    }

    #[test]
    fn skip_dir_matches_a_root_spelled_with_parent_components() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        touch(&input.join("animal1/a.avi"));
        touch(&input.join("categories/junk/done.avi"));
        let roundabout = input.join("animal1").join("..");

        let samples = scan_samples(&roundabout, Some(&input.join("categories"))).unwrap();

        assert_eq!(samples, vec![SamplePair::new(roundabout.join("animal1"), "a")]);
    }

    #[test]
    fn pair_paths_share_the_stem() {
        let pair = SamplePair::new("/data/a", "clip7");
        assert_eq!(pair.image_path(), Path::new("/data/a/clip7.jpg"));
        assert_eq!(pair.clip_path(), Path::new("/data/a/clip7.avi"));
        assert_eq!(pair.file_names(), ["clip7.jpg".to_string(), "clip7.avi".to_string()]);
    }
}
