//! In-memory profile storage.
//!
//! # Why an in-memory backend?
//!
//! The store's parsing and editing rules do not depend on the filesystem.
//! `MemoryBackend` keeps the profile text in a `Mutex<Option<String>>` so
//! tests (and tools that build a profile before saving it) can exercise the
//! store without touching disk.
//!
//! # `fail_writes` flag
//!
//! Call [`MemoryBackend::set_fail_writes`] to make every write return
//! [`PersistenceError::Rejected`].  This simulates an unwritable path.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::persistence::{PersistenceError, ProfileBackend};

/// A profile held in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    text: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    /// Creates an empty backend; reads return `None` until the first write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-loaded with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(Some(text.into())),
            ..Self::default()
        }
    }

    /// Returns a copy of the current text.
    pub fn text(&self) -> Option<String> {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// When `true`, every subsequent write fails.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl ProfileBackend for MemoryBackend {
    fn read_raw(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.text())
    }

    fn write_raw(&self, text: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(PersistenceError::Rejected("memory backend is read-only".into()));
        }
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_backend_reads_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read_raw().unwrap(), None);
    }

    #[test]
    fn test_write_replaces_text_and_counts() {
        // Arrange
        let backend = MemoryBackend::with_text("[Old]\r\n");

        // Act
        backend.write_raw("[New]\r\n").unwrap();

        // Assert
        assert_eq!(backend.text().as_deref(), Some("[New]\r\n"));
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_fail_writes_rejects_and_keeps_text() {
        let backend = MemoryBackend::with_text("[A]\r\n");
        backend.set_fail_writes(true);

        let result = backend.write_raw("[B]\r\n");

        assert!(matches!(result, Err(PersistenceError::Rejected(_))));
        assert_eq!(backend.text().as_deref(), Some("[A]\r\n"));
        assert_eq!(backend.write_count(), 0);
    }
}
