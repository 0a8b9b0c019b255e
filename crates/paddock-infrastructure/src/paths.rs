//! Unified path management for paddock files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/paddock/
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/paddock/      # Data directory (overridable)
//! ├── sessions.toml            # Active session slot + completed history
//! ├── ballots.toml             # Votes and cancellations
//! ├── settings.toml            # Daily mode
//! ├── roster.toml              # Voters and cars
//! ├── notifications.toml       # Notification inbox
//! └── logs/
//!     └── paddock.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "paddock";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// No platform config/data directory could be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Store files living under the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFile {
    Sessions,
    Ballots,
    Settings,
    Roster,
    Notifications,
}

impl StoreFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            StoreFile::Sessions => "sessions.toml",
            StoreFile::Ballots => "ballots.toml",
            StoreFile::Settings => "settings.toml",
            StoreFile::Roster => "roster.toml",
            StoreFile::Notifications => "notifications.toml",
        }
    }
}

/// Resolves every file location from one data directory.
#[derive(Debug, Clone)]
pub struct PaddockPaths {
    data_dir: PathBuf,
}

impl PaddockPaths {
    /// Uses `base_dir` as the data directory, or the platform default.
    pub fn new(base_dir: Option<&Path>) -> Result<Self, PathError> {
        let data_dir = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::default_data_dir()?,
        };
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store_file(&self, file: StoreFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// `~/.local/share/paddock` on Linux, the platform equivalent elsewhere.
    pub fn default_data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// `~/.config/paddock` on Linux, the platform equivalent elsewhere.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_files_live_under_data_dir() {
        let paths = PaddockPaths::new(Some(Path::new("/tmp/paddock-test"))).unwrap();
        assert_eq!(
            paths.store_file(StoreFile::Ballots),
            PathBuf::from("/tmp/paddock-test/ballots.toml")
        );
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/paddock-test/logs"));
    }
}
