//! Where SortingHat keeps its config file and logs: a `.sortinghat` folder
//! under the OS config directory, or under `SORTINGHAT_CONFIG_HOME` when set.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application folder under the config base.
pub const APP_DIR_NAME: &str = ".sortinghat";
/// Environment variable that replaces the OS config directory as the base.
pub const CONFIG_HOME_ENV: &str = "SORTINGHAT_CONFIG_HOME";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No config directory available for SortingHat files")]
    NoBaseDir,
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The folders SortingHat writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
    /// Holds `config.toml`.
    Root,
    Logs,
}

impl AppDir {
    /// Resolve the folder, creating it and its parents if needed.
    pub fn ensure(self) -> Result<PathBuf, AppDirError> {
        let root = config_base().ok_or(AppDirError::NoBaseDir)?.join(APP_DIR_NAME);
        let path = match self {
            AppDir::Root => root,
            AppDir::Logs => root.join("logs"),
        };
        std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

fn config_base() -> Option<PathBuf> {
    test_base()
        .or_else(|| std::env::var_os(CONFIG_HOME_ENV).map(PathBuf::from))
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
}

#[cfg(not(test))]
fn test_base() -> Option<PathBuf> {
    None
}

#[cfg(test)]
fn test_base() -> Option<PathBuf> {
    TEST_BASE.with(|base| base.borrow().clone())
}

#[cfg(test)]
thread_local! {
    static TEST_BASE: std::cell::RefCell<Option<PathBuf>> = const { std::cell::RefCell::new(None) };
}

/// Points the config base of the current test thread at `path` until dropped.
#[cfg(test)]
pub(crate) struct ConfigBaseGuard(());

#[cfg(test)]
impl ConfigBaseGuard {
    pub(crate) fn set(path: PathBuf) -> Self {
        TEST_BASE.with(|base| *base.borrow_mut() = Some(path));
        Self(())
    }
}

#[cfg(test)]
impl Drop for ConfigBaseGuard {
    fn drop(&mut self) {
        TEST_BASE.with(|base| *base.borrow_mut() = None);
    }
}
