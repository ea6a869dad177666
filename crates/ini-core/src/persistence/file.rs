//! File-backed profile storage.
//!
//! Each call opens, reads or writes, and closes the file; nothing is held
//! between calls.  A missing file reads as `None`.  Writes create missing
//! parent directories, then replace the whole file.
//!
//! Concurrent writers from other processes are not arbitrated: two
//! read-modify-write cycles can interleave and the last write wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::persistence::encoding::TextEncoding;
use crate::persistence::{PersistenceError, ProfileBackend};

/// A profile stored in a single file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBackend {
    path: PathBuf,
    encoding: TextEncoding,
}

impl FileBackend {
    /// Creates a backend for `path`, writing UTF-16LE.  Does not touch the
    /// filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: TextEncoding::default(),
        }
    }

    /// Uses `encoding` for every subsequent write.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ProfileBackend for FileBackend {
    fn read_raw(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let (text, detected) = TextEncoding::decode(&bytes);
                trace!(
                    path = %self.path.display(),
                    encoding = %detected,
                    bytes = bytes.len(),
                    "read profile"
                );
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_raw(&self, text: &str) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|source| PersistenceError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let bytes = self.encoding.encode(text);
        fs::write(&self.path, &bytes).map_err(|e| self.io_error(e))?;
        trace!(
            path = %self.path.display(),
            encoding = %self.encoding,
            bytes = bytes.len(),
            "wrote profile"
        );
        Ok(())
    }
}
