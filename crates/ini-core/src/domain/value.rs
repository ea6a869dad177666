//! Value passed to [`crate::ConfigStore::set_value`].
//!
//! Legacy profile writers treat a null value as "delete this key".  A nullable
//! string makes "set to empty" and "remove" easy to confuse, so the two cases
//! are separate variants here.

/// What a set operation should do with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteValue {
    /// Write (or overwrite) the entry with this exact text.  May be empty.
    Set(String),
    /// Remove the entry; same effect as `remove_value`.
    Delete,
}

impl WriteValue {
    /// Returns the text to write, or `None` for [`WriteValue::Delete`].
    pub fn as_set(&self) -> Option<&str> {
        match self {
            WriteValue::Set(v) => Some(v),
            WriteValue::Delete => None,
        }
    }
}

impl From<&str> for WriteValue {
    fn from(value: &str) -> Self {
        WriteValue::Set(value.to_string())
    }
}

impl From<String> for WriteValue {
    fn from(value: String) -> Self {
        WriteValue::Set(value)
    }
}

/// `None` maps to [`WriteValue::Delete`], mirroring the null-as-delete
/// convention of legacy callers.
impl<T: Into<String>> From<Option<T>> for WriteValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => WriteValue::Set(v.into()),
            None => WriteValue::Delete,
        }
    }
}
