//! # ini-core
//!
//! Persistent, section-keyed configuration store compatible with the legacy
//! INI file convention.
//!
//! # Architecture overview (for beginners)
//!
//! An INI file is plain text split into named sections, each holding ordered
//! `key=value` lines:
//!
//! ```text
//! [Controller1]
//! Type=Virtual ; trailing comments are stripped on read
//! ```
//!
//! This crate is split into three layers:
//!
//! - **`domain`** – Pure text logic with no I/O: the line-preserving
//!   [`IniDocument`] parser/renderer, the comment rule, the legacy integer
//!   parser, and the [`SnapshotTable`] transport structure.
//!
//! - **`persistence`** – The [`ProfileBackend`] trait (`read_raw` /
//!   `write_raw`) and its implementations: [`FileBackend`] for real files
//!   (UTF-16LE by default) and [`MemoryBackend`] for tests.
//!
//! - **`store`** – [`ConfigStore`], the public get/set/remove/list contract.
//!   Every call reads (and, for mutations, rewrites) the whole backing text;
//!   nothing is cached between calls.

pub mod domain;
pub mod persistence;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `ini_core::ConfigStore` instead of `ini_core::store::ConfigStore`.
pub use domain::comment::strip_comment;
pub use domain::document::IniDocument;
pub use domain::snapshot::{Column, Entry, SnapshotTable};
pub use domain::value::WriteValue;
pub use persistence::encoding::TextEncoding;
pub use persistence::file::FileBackend;
pub use persistence::memory::MemoryBackend;
pub use persistence::{PersistenceError, ProfileBackend};
pub use store::{ConfigStore, StoreError, StoreOptions};
