//! Storage layer for atomic file operations.

mod atomic_toml;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};

use paddock_core::error::{PaddockError, Result};

/// Runs blocking file I/O off the async executor.
pub(crate) async fn run_blocking<R, F>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PaddockError::internal(format!("storage task failed: {e}")))?
}
