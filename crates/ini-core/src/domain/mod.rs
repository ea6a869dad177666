//! Domain module: pure INI text logic with no I/O.

pub mod comment;
pub mod document;
pub mod numeric;
pub mod snapshot;
pub mod value;

pub use comment::{strip_comment, trim_blanks};
pub use document::IniDocument;
pub use snapshot::{Column, Entry, SnapshotTable};
pub use value::WriteValue;
