//! Persistence layer: where profile text lives between calls.
//!
//! The store never touches the filesystem directly.  It reads and writes the
//! whole text through a [`ProfileBackend`], which keeps the parser and editor
//! testable without any OS primitive:
//!
//! - [`file::FileBackend`] – a real file, encoded as UTF-16LE by default.
//! - [`memory::MemoryBackend`] – an in-memory string, for tests and tools.
//!
//! Backends hold no open handle between calls.

pub mod encoding;
pub mod file;
pub mod memory;

use std::path::PathBuf;

use thiserror::Error;

/// Error type for backend reads and writes.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing profile at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-file backend refused the operation.
    #[error("backend rejected operation: {0}")]
    Rejected(String),
}

/// Whole-text storage for one profile.
///
/// `read_raw` returns `Ok(None)` when nothing has been persisted yet (for a
/// file: it does not exist).  That case is not an error; the store treats it
/// as an empty profile.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileBackend {
    /// Reads the complete profile text.
    fn read_raw(&self) -> Result<Option<String>, PersistenceError>;

    /// Replaces the complete profile text.
    fn write_raw(&self, text: &str) -> Result<(), PersistenceError>;
}

impl<B: ProfileBackend + ?Sized> ProfileBackend for &B {
    fn read_raw(&self) -> Result<Option<String>, PersistenceError> {
        (**self).read_raw()
    }

    fn write_raw(&self, text: &str) -> Result<(), PersistenceError> {
        (**self).write_raw(text)
    }
}

impl<B: ProfileBackend + ?Sized> ProfileBackend for Box<B> {
    fn read_raw(&self) -> Result<Option<String>, PersistenceError> {
        (**self).read_raw()
    }

    fn write_raw(&self, text: &str) -> Result<(), PersistenceError> {
        (**self).write_raw(text)
    }
}
