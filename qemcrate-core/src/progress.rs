//! Progress reporting and cooperative cancellation for batch stages.
//!
//! Stages that walk every face or vertex report once per batch and check
//! the cancellation flag between batches.
//!
//! # Example
//!
//! ```
//! use qemcrate_core::{CancellationToken, Progress};
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(1, 2, "Calculating plane equations");
//!
//! let token = CancellationToken::new();
//! assert!(token.check().is_ok());
//! token.cancel();
//! assert!(token.check().is_err());
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A progress callback receiving `(current, total, message)`.
pub struct Progress {
    callback: Option<Box<dyn Fn(usize, usize, &str) + Send + Sync>>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self { callback: None }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        if let Some(callback) = &self.callback {
            callback(current, total, message);
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("active", &self.callback.is_some())
            .finish()
    }
}

/// Shared flag for cancelling a running stage.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Return `Error::Cancelled` if cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
