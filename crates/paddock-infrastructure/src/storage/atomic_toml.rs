//! Atomic TOML file operations.
//!
//! Every store file is rewritten whole: serialize to a sibling tmp file,
//! fsync, rename over the original. Read-modify-write cycles additionally
//! hold an exclusive lock on a `.lock` sibling so that two writers (threads
//! or processes) cannot interleave.

use fs2::FileExt;
use paddock_core::PaddockError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error on {path}: {message}")]
    Lock { path: PathBuf, message: String },
}

impl From<AtomicTomlError> for PaddockError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io { .. } | AtomicTomlError::Lock { .. } => {
                PaddockError::io(err.to_string())
            }
            AtomicTomlError::Parse { .. } | AtomicTomlError::Serialize(_) => {
                PaddockError::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
        }
    }
}

/// A handle to a TOML document stored in a single file.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for AtomicTomlFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for AtomicTomlFile<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicTomlFile")
            .field("path", &self.path)
            .finish()
    }
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(AtomicTomlError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Saves data atomically via tmp file + rename.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path).map_err(|source| self.io_error(source))?;
        tmp_file
            .write_all(toml_string.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|source| self.io_error(source))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))
    }

    /// Performs a locked read-modify-write.
    ///
    /// `f` sees the current document (or `T::default()` when the file is
    /// missing). If it returns `Ok`, the document is written back before the
    /// lock is released; if it returns `Err`, nothing is written.
    pub fn update<R, E, F>(&self, f: F) -> Result<R, E>
    where
        T: Default,
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or_default();
        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }

    fn io_error(&self, source: std::io::Error) -> AtomicTomlError {
        AtomicTomlError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Exclusive advisory lock held for the duration of an update.
///
/// The lock file itself is left in place; deleting it while another writer
/// waits on the old inode would let a third writer in.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|source| AtomicTomlError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| AtomicTomlError::Io {
                path: lock_path.clone(),
                source,
            })?;

        file.lock_exclusive().map_err(|e| AtomicTomlError::Lock {
            path: lock_path,
            message: e.to_string(),
        })?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("counter.toml"));

        let counter = Counter {
            name: "laps".to_string(),
            count: 42,
        };
        file.save(&counter).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter));
        assert!(!temp_dir.path().join(".counter.toml.tmp").exists());
    }

    #[test]
    fn test_clone_shares_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("counter.toml"));
        let copy = file.clone();
        assert_eq!(copy.path(), file.path());

        copy.update(|c: &mut Counter| {
            c.count = 7;
            Ok::<_, PaddockError>(())
        })
        .unwrap();
        assert_eq!(file.load().unwrap().unwrap().count, 7);
    }

    #[test]
    fn test_load_missing_or_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "   \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "count = [").unwrap();
        let file = AtomicTomlFile::<Counter>::new(path);

        let err = file.load().unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_update_writes_only_on_success() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("counter.toml"));

        let seen: u32 = file
            .update(|c: &mut Counter| {
                c.count += 10;
                Ok::<_, PaddockError>(c.count)
            })
            .unwrap();
        assert_eq!(seen, 10);

        let err = file
            .update(|c: &mut Counter| {
                c.count += 5;
                Err::<(), _>(PaddockError::conflict("refused"))
            })
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(file.load().unwrap().unwrap().count, 10);
    }

    #[test]
    fn test_concurrent_updates_do_not_lose_writes() {
        let temp_dir = TempDir::new().unwrap();
        let file = Arc::new(AtomicTomlFile::<Counter>::new(
            temp_dir.path().join("counter.toml"),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let file = Arc::clone(&file);
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        file.update(|c: &mut Counter| {
                            c.count += 1;
                            Ok::<_, PaddockError>(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(file.load().unwrap().unwrap().count, 40);
    }
}
