//! ConfigStore: the get/set/remove/list contract over one INI profile.
//!
//! # Call model (for beginners)
//!
//! A `ConfigStore` owns a backend (normally a [`FileBackend`] wrapping a file
//! path) and nothing else.  There is no cache:
//!
//! - Every *get* reads and parses the whole profile, answers, and drops it.
//! - Every *set*/*remove* reads, edits the parsed [`IniDocument`], and writes
//!   the whole profile back before returning.
//!
//! Each call is therefore consistent with the file as it was at call time,
//! at the cost of no batching.  Two processes writing the same file can race;
//! the store does not arbitrate between them.
//!
//! # Failure model
//!
//! - Absent sections or keys are never errors: getters return the caller's
//!   default (or `""`), removals are no-ops.
//! - Getters never fail.  An unreadable profile is logged at `warn` and
//!   treated as empty.
//! - Mutations return `Result<(), StoreError>`; `Err` is the failure signal
//!   for unwritable paths, rejected names, and similar.
//!
//! # Legacy truncation
//!
//! Old profile readers copied values into a 255-character buffer and section
//! or key listings into a 32 767-character buffer.  [`StoreOptions`] keeps
//! those limits by default; set either to `None` to lift it.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::comment::{strip_comment, trim_blanks};
use crate::domain::document::IniDocument;
use crate::domain::numeric::{parse_profile_bool, parse_profile_dword, parse_profile_int};
use crate::domain::snapshot::{Entry, SnapshotTable};
use crate::domain::value::WriteValue;
use crate::persistence::encoding::TextEncoding;
use crate::persistence::file::FileBackend;
use crate::persistence::{PersistenceError, ProfileBackend};

/// Default maximum length, in characters, of a value returned by a getter.
pub const DEFAULT_MAX_VALUE_LEN: usize = 254;

/// Default maximum length of a section or key listing, counting one
/// separator per name.
pub const DEFAULT_MAX_LIST_LEN: usize = 32_766;

/// Which kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Section,
    Key,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Section => f.write_str("section"),
            NameKind::Key => f.write_str("key"),
        }
    }
}

/// Error type for store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The section or key name cannot be written without corrupting the file.
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: NameKind,
        name: String,
        reason: &'static str,
    },

    /// The value contains a line break.
    #[error("invalid value for [{section}] {key}: values cannot contain line breaks")]
    InvalidValue { section: String, key: String },

    /// The backend could not be read or written.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Tunable read limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Values longer than this many characters are silently truncated before
    /// comment stripping.  `None` disables truncation.
    pub max_value_len: Option<usize>,
    /// Section and key listings stop before the name that would push the
    /// total (name lengths plus one separator each) past this.  `None`
    /// disables the limit.
    pub max_list_len: Option<usize>,
}

impl StoreOptions {
    /// Options with both limits lifted.
    pub fn unlimited() -> Self {
        Self {
            max_value_len: None,
            max_list_len: None,
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_value_len: Some(DEFAULT_MAX_VALUE_LEN),
            max_list_len: Some(DEFAULT_MAX_LIST_LEN),
        }
    }
}

/// Section-keyed configuration store over one profile.
///
/// # Examples
///
/// ```rust
/// use ini_core::{ConfigStore, MemoryBackend, StoreOptions};
///
/// let store = ConfigStore::with_backend(MemoryBackend::new(), StoreOptions::default());
/// store.set_value("Controller1", "Type", "Virtual").unwrap();
/// assert_eq!(store.get_value("Controller1", "Type", "Physical"), "Virtual");
///
/// store.remove_section("Controller1").unwrap();
/// assert!(store.get_sections().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore<B = FileBackend> {
    backend: B,
    options: StoreOptions,
}

impl ConfigStore<FileBackend> {
    /// Creates a store for the file at `path`.
    ///
    /// Does not touch the filesystem and never fails; a missing file behaves
    /// as an empty profile.  New content is written as UTF-16LE.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(FileBackend::new(path), StoreOptions::default())
    }

    /// Like [`ConfigStore::open`] but writes with `encoding`.
    pub fn open_with_encoding(path: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        Self::with_backend(
            FileBackend::new(path).with_encoding(encoding),
            StoreOptions::default(),
        )
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.backend.path()
    }
}

impl<B: ProfileBackend> ConfigStore<B> {
    /// Creates a store over any backend.
    pub fn with_backend(backend: B, options: StoreOptions) -> Self {
        Self { backend, options }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Creates an empty snapshot table with `Section`, `Key` and `Value`
    /// columns.
    pub fn new_snapshot_table() -> SnapshotTable {
        SnapshotTable::new()
    }

    // ── Getters ──────────────────────────────────────────────────────────────

    /// Returns the value of `key` in `section`, or `default` if absent.
    ///
    /// An existing value is truncated to `max_value_len`, then has its
    /// trailing comment and outer spaces/tabs removed.  `default` is returned
    /// exactly as given.
    pub fn get_value(&self, section: &str, key: &str, default: &str) -> String {
        self.read_existing(section, key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Returns the value of `key` in `section`, or `""` if absent.
    pub fn get_value_or_empty(&self, section: &str, key: &str) -> String {
        self.read_existing(section, key).unwrap_or_default()
    }

    /// Reads an integer with legacy profile-int rules, or `default` when the
    /// entry is absent or has no leading digits.
    pub fn get_long(&self, section: &str, key: &str, default: i64) -> i64 {
        self.read_existing(section, key)
            .and_then(|v| parse_profile_int(&v))
            .unwrap_or(default)
    }

    /// Reads an unsigned 32-bit value (`0x` hex accepted), or `default`.
    pub fn get_dword(&self, section: &str, key: &str, default: u32) -> u32 {
        self.read_existing(section, key)
            .and_then(|v| parse_profile_dword(&v))
            .unwrap_or(default)
    }

    /// Reads a boolean (`0`/`1`, `true`/`false`, `yes`/`no`, `on`/`off`), or
    /// `default`.
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.read_existing(section, key)
            .and_then(|v| parse_profile_bool(&v))
            .unwrap_or(default)
    }

    /// Section names in file order, each listed once.
    pub fn get_sections(&self) -> Vec<String> {
        let doc = self.load();
        self.bound_list(doc.sections())
    }

    /// Key names of `section` in file order, each listed once.  Empty if the
    /// section is absent.
    pub fn get_keys(&self, section: &str) -> Vec<String> {
        let section = trim_blanks(section);
        if section.is_empty() {
            return Vec::new();
        }
        let doc = self.load();
        self.bound_list(doc.keys(section))
    }

    /// Returns `true` if the profile contains a header for `section`.
    pub fn has_section(&self, section: &str) -> bool {
        let section = trim_blanks(section);
        !section.is_empty() && self.load().has_section(section)
    }

    /// Reads the whole profile into a snapshot table, one row per entry, in
    /// file order.
    ///
    /// Uses a single read, so the rows are mutually consistent.  Values go
    /// through the same truncation and comment rules as [`get_value`].
    ///
    /// [`get_value`]: ConfigStore::get_value
    pub fn snapshot(&self) -> SnapshotTable {
        let doc = self.load();
        let mut table = Self::new_snapshot_table();
        for section in self.bound_list(doc.sections()) {
            for key in self.bound_list(doc.keys(&section)) {
                let value = doc
                    .get(&section, &key)
                    .map(|raw| self.clean_value(raw))
                    .unwrap_or_default();
                table.push(Entry::new(section.clone(), key, value));
            }
        }
        table
    }

    // ── Mutations ────────────────────────────────────────────────────────────

    /// Writes `value` for `key` in `section`, creating the section if needed.
    ///
    /// Accepts anything convertible to [`WriteValue`]: a string sets the
    /// value (empty is allowed), `None` or [`WriteValue::Delete`] removes the
    /// key exactly like [`remove_value`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] or [`StoreError::InvalidValue`] for
    /// input that would corrupt the file (checked before any I/O), and
    /// [`StoreError::Persistence`] when the profile cannot be read or written.
    ///
    /// [`remove_value`]: ConfigStore::remove_value
    pub fn set_value(
        &self,
        section: &str,
        key: &str,
        value: impl Into<WriteValue>,
    ) -> Result<(), StoreError> {
        let section = trim_blanks(section);
        let key = trim_blanks(key);
        validate_section(section)?;
        validate_key(key)?;

        let value = match value.into() {
            WriteValue::Set(v) => v,
            WriteValue::Delete => return self.remove_value(section, key),
        };
        if value.contains(['\r', '\n']) {
            return Err(StoreError::InvalidValue {
                section: section.to_string(),
                key: key.to_string(),
            });
        }

        let mut doc = self.load_for_update()?;
        doc.set(section, key, &value);
        self.persist(&doc)?;
        debug!(section, key, "profile value written");
        Ok(())
    }

    /// Deletes `key` from `section`.  Absent keys are a no-op and nothing is
    /// written.  The section header stays even if this was its last key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] for empty or unwritable names and
    /// [`StoreError::Persistence`] when the profile cannot be read or written.
    pub fn remove_value(&self, section: &str, key: &str) -> Result<(), StoreError> {
        let section = trim_blanks(section);
        let key = trim_blanks(key);
        validate_section(section)?;
        validate_key(key)?;

        let mut doc = self.load_for_update()?;
        if !doc.remove_value(section, key) {
            debug!(section, key, "profile value already absent");
            return Ok(());
        }
        self.persist(&doc)?;
        debug!(section, key, "profile value removed");
        Ok(())
    }

    /// Deletes `section` and every entry in it.  Absent sections are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] for an empty or unwritable name and
    /// [`StoreError::Persistence`] when the profile cannot be read or written.
    pub fn remove_section(&self, section: &str) -> Result<(), StoreError> {
        let section = trim_blanks(section);
        validate_section(section)?;

        let mut doc = self.load_for_update()?;
        if !doc.remove_section(section) {
            debug!(section, "profile section already absent");
            return Ok(());
        }
        self.persist(&doc)?;
        debug!(section, "profile section removed");
        Ok(())
    }

    /// Writes every row of `table` in one read-modify-write cycle.
    ///
    /// Rows are applied in order, so a later duplicate overwrites an earlier
    /// one.  Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Every row is validated before anything is written; the first invalid
    /// row aborts the whole batch.
    pub fn apply_snapshot(&self, table: &SnapshotTable) -> Result<usize, StoreError> {
        for row in table {
            let (section, key) = (trim_blanks(&row.section), trim_blanks(&row.key));
            validate_section(section)?;
            validate_key(key)?;
            if row.value.contains(['\r', '\n']) {
                return Err(StoreError::InvalidValue {
                    section: section.to_string(),
                    key: key.to_string(),
                });
            }
        }
        if table.is_empty() {
            return Ok(0);
        }

        let mut doc = self.load_for_update()?;
        for row in table {
            doc.set(trim_blanks(&row.section), trim_blanks(&row.key), &row.value);
        }
        self.persist(&doc)?;
        debug!(rows = table.len(), "snapshot applied to profile");
        Ok(table.len())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    /// Loads the profile for a getter.  Read failures degrade to empty.
    fn load(&self) -> IniDocument {
        match self.backend.read_raw() {
            Ok(Some(text)) => IniDocument::parse(&text),
            Ok(None) => IniDocument::new(),
            Err(e) => {
                warn!(error = %e, "profile unreadable, treating as empty");
                IniDocument::new()
            }
        }
    }

    /// Loads the profile for a mutation.  Read failures abort, since
    /// rewriting an unreadable profile would discard its content.
    fn load_for_update(&self) -> Result<IniDocument, StoreError> {
        Ok(match self.backend.read_raw()? {
            Some(text) => IniDocument::parse(&text),
            None => IniDocument::new(),
        })
    }

    fn persist(&self, doc: &IniDocument) -> Result<(), StoreError> {
        self.backend.write_raw(&doc.render()).map_err(|e| {
            warn!(error = %e, "profile write failed");
            StoreError::from(e)
        })
    }

    fn read_existing(&self, section: &str, key: &str) -> Option<String> {
        let section = trim_blanks(section);
        let key = trim_blanks(key);
        if section.is_empty() || key.is_empty() {
            return None;
        }
        let doc = self.load();
        doc.get(section, key).map(|raw| self.clean_value(raw))
    }

    fn clean_value(&self, raw: &str) -> String {
        match self.options.max_value_len {
            Some(max) if raw.chars().count() > max => {
                let truncated: String = raw.chars().take(max).collect();
                strip_comment(&truncated).to_string()
            }
            _ => strip_comment(raw).to_string(),
        }
    }

    fn bound_list(&self, names: Vec<&str>) -> Vec<String> {
        let Some(limit) = self.options.max_list_len else {
            return names.into_iter().map(str::to_string).collect();
        };
        let mut used = 0usize;
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let cost = name.chars().count() + 1;
            if used + cost > limit {
                debug!(limit, kept = out.len(), "profile listing truncated");
                break;
            }
            used += cost;
            out.push(name.to_string());
        }
        out
    }
}

fn validate_section(section: &str) -> Result<(), StoreError> {
    let reason = if section.is_empty() {
        Some("must not be empty")
    } else if section.contains(']') {
        Some("must not contain ']'")
    } else if section.contains(['\r', '\n']) {
        Some("must not contain line breaks")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            kind: NameKind::Section,
            name: section.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let reason = if key.is_empty() {
        Some("must not be empty")
    } else if key.contains('=') {
        Some("must not contain '='")
    } else if key.contains(['\r', '\n']) {
        Some("must not contain line breaks")
    } else if key.starts_with(['[', ';', '#']) {
        Some("must not start with '[', ';' or '#'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            kind: NameKind::Key,
            name: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::Column;
    use crate::persistence::memory::MemoryBackend;
    use crate::persistence::MockProfileBackend;

    fn memory_store() -> ConfigStore<MemoryBackend> {
        ConfigStore::with_backend(MemoryBackend::new(), StoreOptions::default())
    }

    fn store_with(text: &str) -> ConfigStore<MemoryBackend> {
        ConfigStore::with_backend(MemoryBackend::with_text(text), StoreOptions::default())
    }

    // ── Defaults and absence ──────────────────────────────────────────────────

    #[test]
    fn test_get_value_on_untouched_store_returns_default_exactly() {
        // Arrange
        let store = memory_store();

        // Act
        let value = store.get_value("S", "K", "  X ; not stripped ");

        // Assert
        assert_eq!(value, "  X ; not stripped ");
    }

    #[test]
    fn test_get_value_or_empty_on_untouched_store_returns_empty() {
        let store = memory_store();
        assert_eq!(store.get_value_or_empty("S", "K"), "");
    }

    #[test]
    fn test_empty_value_is_distinct_from_absent() {
        // Arrange
        let store = memory_store();
        store.set_value("S", "K", "").unwrap();

        // Act / Assert
        assert_eq!(store.get_value("S", "K", "D"), "");
        assert_eq!(store.get_value("S", "Other", "D"), "D");
    }

    // ── Round-trip and comment rule ──────────────────────────────────────────

    #[test]
    fn test_set_then_get_round_trips_interior_content() {
        let store = memory_store();
        store.set_value("Mappings", "PAD1", "IG_ab cd\tef").unwrap();
        assert_eq!(store.get_value("Mappings", "PAD1", ""), "IG_ab cd\tef");
    }

    #[test]
    fn test_comment_stripping_on_read() {
        // Arrange
        let store = memory_store();
        store.set_value("S", "semi", "foo ; bar").unwrap();
        store.set_value("S", "hash", "foo # bar").unwrap();
        store.set_value("S", "pad", "  foo  ").unwrap();

        // Act / Assert
        assert_eq!(store.get_value("S", "semi", ""), "foo");
        assert_eq!(store.get_value("S", "hash", ""), "foo");
        assert_eq!(store.get_value("S", "pad", ""), "foo");
    }

    #[test]
    fn test_comment_is_stored_verbatim() {
        let store = memory_store();
        store.set_value("S", "K", "foo ; bar").unwrap();
        let text = store.backend().text().unwrap();
        assert!(text.contains("K=foo ; bar\r\n"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = store_with("[Options]\nUseInitBeep=1\n");
        assert_eq!(store.get_value("OPTIONS", "useinitbeep", "0"), "1");
    }

    #[test]
    fn test_names_are_trimmed() {
        let store = memory_store();
        store.set_value(" S\t", " K ", "v").unwrap();
        assert_eq!(store.get_value("S", "K", ""), "v");
        assert_eq!(store.get_sections(), vec!["S"]);
    }

    // ── Removal ──────────────────────────────────────────────────────────────

    #[test]
    fn test_remove_value_then_get_returns_default() {
        // Arrange
        let store = memory_store();
        store.set_value("S", "K", "v").unwrap();

        // Act
        store.remove_value("S", "K").unwrap();

        // Assert
        assert_eq!(store.get_value("S", "K", "D"), "D");
    }

    #[test]
    fn test_remove_value_twice_is_a_silent_noop() {
        // Arrange
        let store = memory_store();

        // Act
        let first = store.remove_value("S", "missing");
        let second = store.remove_value("S", "missing");

        // Assert – no failure signal and nothing written
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_remove_last_key_keeps_section() {
        let store = memory_store();
        store.set_value("A", "k", "1").unwrap();

        store.remove_value("A", "k").unwrap();

        assert!(store.has_section("A"));
        assert!(store.get_keys("A").is_empty());
    }

    #[test]
    fn test_set_delete_is_remove() {
        // Arrange
        let store = memory_store();
        store.set_value("S", "K", "v").unwrap();

        // Act
        store.set_value("S", "K", WriteValue::Delete).unwrap();
        store.set_value("S", "Never", Option::<String>::None).unwrap();

        // Assert
        assert_eq!(store.get_value("S", "K", "D"), "D");
        assert!(store.get_keys("S").is_empty());
    }

    #[test]
    fn test_remove_section_removes_all_keys() {
        // Arrange
        let store = memory_store();
        store.set_value("A", "x", "1").unwrap();
        store.set_value("A", "y", "2").unwrap();
        store.set_value("B", "z", "3").unwrap();

        // Act
        store.remove_section("A").unwrap();

        // Assert
        assert!(store.get_keys("A").is_empty());
        assert!(!store.has_section("A"));
        assert_eq!(store.get_sections(), vec!["B"]);
    }

    #[test]
    fn test_remove_value_clears_every_duplicate() {
        // Arrange: the key repeats within [A] and again under a second header
        let store = store_with("[A]\nk=1\nk=2\n[B]\n[a]\nK=3\n");

        // Act
        store.remove_value("A", "k").unwrap();

        // Assert
        assert_eq!(store.get_value("A", "k", "D"), "D");
        assert!(store.get_keys("A").is_empty());
        assert_eq!(
            store.backend().text().as_deref(),
            Some("[A]\r\n[B]\r\n[a]\r\n")
        );
    }

    #[test]
    fn test_set_new_key_lands_in_first_duplicate_section() {
        // Arrange
        let store = store_with("[A]\nx=1\n[B]\nz=0\n[a]\ny=2\n");

        // Act
        store.set_value("A", "new", "3").unwrap();

        // Assert
        assert_eq!(
            store.backend().text().as_deref(),
            Some("[A]\r\nx=1\r\nnew=3\r\n[B]\r\nz=0\r\n[a]\r\ny=2\r\n")
        );
        assert_eq!(store.get_keys("A"), vec!["x", "new", "y"]);
    }

    #[test]
    fn test_remove_absent_section_is_noop() {
        let store = memory_store();
        assert!(store.remove_section("Nope").is_ok());
        assert_eq!(store.backend().write_count(), 0);
    }

    // ── Enumeration ──────────────────────────────────────────────────────────

    #[test]
    fn test_get_sections_lists_each_once() {
        // Arrange
        let store = memory_store();
        store.set_value("A", "x", "1").unwrap();
        store.set_value("B", "y", "2").unwrap();
        store.set_value("a", "z", "3").unwrap();

        // Act
        let sections = store.get_sections();

        // Assert
        assert_eq!(sections, vec!["A", "B"]);
    }

    #[test]
    fn test_get_sections_on_missing_profile_is_empty() {
        assert!(memory_store().get_sections().is_empty());
    }

    #[test]
    fn test_get_keys_in_file_order() {
        let store = store_with("[S]\nz=1\na=2\nm=3\n");
        assert_eq!(store.get_keys("S"), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_get_keys_of_absent_section_is_empty() {
        let store = store_with("[S]\nz=1\n");
        assert!(store.get_keys("T").is_empty());
        assert!(store.get_keys("").is_empty());
    }

    #[test]
    fn test_controller_scenario() {
        // Arrange
        let store = memory_store();

        // Act / Assert
        store.set_value("Controller1", "Type", "Virtual").unwrap();
        assert_eq!(store.get_value("Controller1", "Type", "Physical"), "Virtual");

        store.remove_section("Controller1").unwrap();
        assert!(store.get_sections().is_empty());
    }

    // ── Truncation ───────────────────────────────────────────────────────────

    #[test]
    fn test_long_values_truncate_to_default_limit() {
        // Arrange
        let store = memory_store();
        let long = "x".repeat(400);
        store.set_value("S", "K", long.as_str()).unwrap();

        // Act
        let value = store.get_value("S", "K", "");

        // Assert
        assert_eq!(value.len(), DEFAULT_MAX_VALUE_LEN);
    }

    #[test]
    fn test_truncation_happens_before_comment_stripping() {
        // Arrange: the comment starts beyond the limit, so it is cut off first
        let options = StoreOptions {
            max_value_len: Some(5),
            ..StoreOptions::default()
        };
        let store = ConfigStore::with_backend(MemoryBackend::new(), options);
        store.set_value("S", "K", "ab cdef;comment").unwrap();

        // Act / Assert
        assert_eq!(store.get_value("S", "K", ""), "ab cd");
    }

    #[test]
    fn test_unlimited_options_do_not_truncate() {
        let store = ConfigStore::with_backend(MemoryBackend::new(), StoreOptions::unlimited());
        let long = "y".repeat(1000);
        store.set_value("S", "K", long.as_str()).unwrap();
        assert_eq!(store.get_value("S", "K", ""), long);
    }

    #[test]
    fn test_list_limit_drops_names_that_do_not_fit() {
        // Arrange: "aaa\0" + "bbb\0" = 8, "ccc\0" would make 12
        let options = StoreOptions {
            max_list_len: Some(10),
            ..StoreOptions::default()
        };
        let store = ConfigStore::with_backend(
            MemoryBackend::with_text("[aaa]\n[bbb]\n[ccc]\n"),
            options,
        );

        // Act / Assert
        assert_eq!(store.get_sections(), vec!["aaa", "bbb"]);
    }

    // ── Typed getters ────────────────────────────────────────────────────────

    #[test]
    fn test_typed_getters() {
        let store = store_with(
            "[InputHook]\nHookMask=0x00000021\nFakeVID=0x045E\nHookLL=1\nPeriod=60 ; ms\nBad=abc\n",
        );

        assert_eq!(store.get_dword("InputHook", "HookMask", 0), 0x21);
        assert_eq!(store.get_dword("InputHook", "FakeVID", 0), 0x045E);
        assert!(store.get_bool("InputHook", "HookLL", false));
        assert_eq!(store.get_long("InputHook", "Period", 0), 60);
        assert_eq!(store.get_long("InputHook", "Bad", -1), -1);
        assert_eq!(store.get_long("InputHook", "Missing", 7), 7);
        assert!(store.get_bool("InputHook", "Missing", true));
    }

    // ── Snapshot ─────────────────────────────────────────────────────────────

    #[test]
    fn test_new_snapshot_table_is_empty_with_columns() {
        let table = ConfigStore::<MemoryBackend>::new_snapshot_table();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &Column::ALL);
    }

    #[test]
    fn test_snapshot_composes_sections_keys_and_values() {
        // Arrange
        let store = store_with("[A]\nx=1 ; one\ny=2\n[B]\nz=3\n");

        // Act
        let table = store.snapshot();

        // Assert
        assert_eq!(
            table.rows(),
            &[
                Entry::new("A", "x", "1"),
                Entry::new("A", "y", "2"),
                Entry::new("B", "z", "3"),
            ]
        );
    }

    #[test]
    fn test_snapshot_matches_primitive_composition() {
        // Arrange
        let store = store_with("[A]\nx=1\n[B]\nz=3 # c\n");
        let mut manual = ConfigStore::<MemoryBackend>::new_snapshot_table();
        for section in store.get_sections() {
            for key in store.get_keys(&section) {
                let value = store.get_value_or_empty(&section, &key);
                manual.push(Entry::new(section.clone(), key, value));
            }
        }

        // Act / Assert
        assert_eq!(store.snapshot(), manual);
    }

    #[test]
    fn test_apply_snapshot_writes_all_rows_once() {
        // Arrange
        let store = memory_store();
        let mut table = SnapshotTable::new();
        table.push(Entry::new("A", "x", "1"));
        table.push(Entry::new("B", "y", "2"));

        // Act
        let written = store.apply_snapshot(&table).unwrap();

        // Assert
        assert_eq!(written, 2);
        assert_eq!(store.backend().write_count(), 1);
        assert_eq!(store.get_value("B", "y", ""), "2");
    }

    #[test]
    fn test_apply_snapshot_rejects_invalid_row_before_writing() {
        let store = memory_store();
        let mut table = SnapshotTable::new();
        table.push(Entry::new("A", "x", "1"));
        table.push(Entry::new("", "y", "2"));

        let result = store.apply_snapshot(&table);

        assert!(matches!(result, Err(StoreError::InvalidName { .. })));
        assert_eq!(store.backend().write_count(), 0);
    }

    // ── Validation ───────────────────────────────────────────────────────────

    #[test]
    fn test_empty_names_are_rejected() {
        let store = memory_store();
        assert!(matches!(
            store.set_value("", "K", "v"),
            Err(StoreError::InvalidName { kind: NameKind::Section, .. })
        ));
        assert!(matches!(
            store.set_value("S", "  ", "v"),
            Err(StoreError::InvalidName { kind: NameKind::Key, .. })
        ));
    }

    #[test]
    fn test_names_that_would_corrupt_the_file_are_rejected() {
        let store = memory_store();
        assert!(store.set_value("A]B", "K", "v").is_err());
        assert!(store.set_value("S", "K=1", "v").is_err());
        assert!(store.set_value("S", ";K", "v").is_err());
        assert!(matches!(
            store.set_value("S", "K", "line1\nline2"),
            Err(StoreError::InvalidValue { .. })
        ));
        assert_eq!(store.backend().write_count(), 0);
    }

    // ── Backend failures ─────────────────────────────────────────────────────

    #[test]
    fn test_write_failure_is_reported_not_raised() {
        // Arrange
        let store = memory_store();
        store.backend().set_fail_writes(true);

        // Act
        let result = store.set_value("S", "K", "v");

        // Assert
        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert_eq!(store.get_value("S", "K", "D"), "D");
    }

    #[test]
    fn test_read_failure_degrades_getters_to_defaults() {
        // Arrange
        let mut backend = MockProfileBackend::new();
        backend
            .expect_read_raw()
            .returning(|| Err(PersistenceError::Rejected("disk on fire".into())));
        let store = ConfigStore::with_backend(backend, StoreOptions::default());

        // Act / Assert
        assert_eq!(store.get_value("S", "K", "D"), "D");
        assert_eq!(store.get_value_or_empty("S", "K"), "");
        assert!(store.get_sections().is_empty());
        assert!(!store.has_section("S"));
    }

    #[test]
    fn test_read_failure_aborts_mutation_without_writing() {
        // Arrange: any write attempt would violate the expectation count
        let mut backend = MockProfileBackend::new();
        backend
            .expect_read_raw()
            .returning(|| Err(PersistenceError::Rejected("locked".into())));
        backend.expect_write_raw().never();
        let store = ConfigStore::with_backend(backend, StoreOptions::default());

        // Act
        let result = store.set_value("S", "K", "v");

        // Assert
        assert!(matches!(result, Err(StoreError::Persistence(_))));
    }

    #[test]
    fn test_set_writes_rendered_document_through_backend() {
        // Arrange
        let mut backend = MockProfileBackend::new();
        backend
            .expect_read_raw()
            .times(1)
            .returning(|| Ok(Some("; keep me\r\n".to_string())));
        backend
            .expect_write_raw()
            .withf(|text| text.to_string() == "; keep me\r\n\r\n[S]\r\nK=v\r\n")
            .times(1)
            .returning(|_| Ok(()));
        let store = ConfigStore::with_backend(backend, StoreOptions::default());

        // Act / Assert
        store.set_value("S", "K", "v").unwrap();
    }
}
