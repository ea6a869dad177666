//! Line-preserving INI document model.
//!
//! [`IniDocument`] keeps every line of the source text, classified as a
//! section header, an entry, or "other" (blank lines, comments, malformed
//! lines, entries outside any section).  Edits touch only the lines they
//! must, so hand-written comments and layout survive a rewrite.
//!
//! # Parsing rules
//!
//! Each line is trimmed of spaces and tabs, then:
//!
//! - `[name]` is a section header.  Text after the first `]` is ignored; an
//!   empty name or a missing `]` makes the line malformed.
//! - A line starting with `;` or `#` is a comment.
//! - `key=value` (split at the first `=`) inside a section is an entry.  Key
//!   and raw value are trimmed; an empty key is malformed.
//! - Anything else is kept verbatim and ignored by every query.
//!
//! # Name matching
//!
//! Section and key names compare case-insensitively (ASCII folding).  Two
//! headers with the same name form one logical section: lookups scan both in
//! file order and the first matching key wins.

use tracing::trace;

use crate::domain::comment::trim_blanks;

/// Line terminator used when rendering.
const NEWLINE: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Section { name: String, raw: String },
    Entry { key: String, value: String, raw: String },
    Other(String),
}

impl Line {
    fn raw(&self) -> &str {
        match self {
            Line::Section { raw, .. } | Line::Entry { raw, .. } | Line::Other(raw) => raw.as_str(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Line::Other(raw) if trim_blanks(raw).is_empty())
    }

    fn entry(key: &str, value: &str) -> Self {
        Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: format!("{key}={value}"),
        }
    }

    fn section(name: &str) -> Self {
        Line::Section {
            name: name.to_string(),
            raw: format!("[{name}]"),
        }
    }
}

/// Parsed INI text that can be queried, edited, and rendered back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<Line>,
}

impl IniDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses INI text.  Never fails: malformed lines are kept but ignored.
    ///
    /// Accepts `\r\n`, `\n` and bare `\r` line endings and a leading BOM.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_core::IniDocument;
    ///
    /// let doc = IniDocument::parse("[Options]\nLog=1 ; enable\n");
    /// assert_eq!(doc.get("options", "LOG"), Some("1 ; enable"));
    /// ```
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut lines = Vec::new();
        let mut in_section = false;
        let mut ignored = 0usize;

        for raw in split_lines(text) {
            let line = classify(raw, in_section);
            match &line {
                Line::Section { .. } => in_section = true,
                Line::Other(raw) => {
                    let t = trim_blanks(raw);
                    if !t.is_empty() && !t.starts_with(';') && !t.starts_with('#') {
                        ignored += 1;
                    }
                }
                Line::Entry { .. } => {}
            }
            lines.push(line);
        }

        if ignored > 0 {
            trace!(ignored, "skipped malformed INI lines");
        }
        Self { lines }
    }

    /// Renders the document with `\r\n` line endings.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.raw());
            out.push_str(NEWLINE);
        }
        out
    }

    /// Returns `true` when the document has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Section names in file order, each once (first spelling wins).
    pub fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for line in &self.lines {
            if let Line::Section { name, .. } = line {
                if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Returns `true` if at least one header named `section` exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.lines
            .iter()
            .any(|l| matches!(l, Line::Section { name, .. } if name.eq_ignore_ascii_case(section)))
    }

    /// Key names of `section` in file order, each once.
    pub fn keys(&self, section: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (key, _) in self.entries_of(section) {
            if !keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                keys.push(key);
            }
        }
        keys
    }

    /// Raw value (comment included, outer blanks trimmed) of the first
    /// matching entry.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries_of(section)
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Writes `key=value` into `section`.
    ///
    /// An existing entry is rewritten in place, keeping its key spelling.  A
    /// new key goes after the last entry of the first matching section.  A
    /// new section is appended at the end, after one blank separator line.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let mut in_match = false;
        let mut left_first_match = false;
        let mut insert_at: Option<usize> = None;

        for (idx, line) in self.lines.iter_mut().enumerate() {
            match line {
                Line::Section { name, .. } => {
                    if in_match {
                        left_first_match = true;
                    }
                    in_match = name.eq_ignore_ascii_case(section);
                    if in_match && insert_at.is_none() {
                        insert_at = Some(idx + 1);
                    }
                }
                Line::Entry { key: existing, .. } if in_match => {
                    if existing.eq_ignore_ascii_case(key) {
                        let kept = existing.clone();
                        *line = Line::entry(&kept, value);
                        return;
                    }
                    if !left_first_match {
                        insert_at = Some(idx + 1);
                    }
                }
                _ => {}
            }
        }

        match insert_at {
            Some(idx) => self.lines.insert(idx, Line::entry(key, value)),
            None => {
                if self.lines.last().is_some_and(|l| !l.is_blank()) {
                    self.lines.push(Line::Other(String::new()));
                }
                self.lines.push(Line::section(section));
                self.lines.push(Line::entry(key, value));
            }
        }
    }

    /// Removes every `key` entry in `section`.  Returns `true` if anything
    /// was removed.
    pub fn remove_value(&mut self, section: &str, key: &str) -> bool {
        let before = self.lines.len();
        let mut in_match = false;
        self.lines.retain(|line| match line {
            Line::Section { name, .. } => {
                in_match = name.eq_ignore_ascii_case(section);
                true
            }
            Line::Entry { key: k, .. } => !(in_match && k.eq_ignore_ascii_case(key)),
            Line::Other(_) => true,
        });
        self.lines.len() != before
    }

    /// Removes every header named `section` together with all lines up to the
    /// next header.  Returns `true` if anything was removed.
    pub fn remove_section(&mut self, section: &str) -> bool {
        let before = self.lines.len();
        let mut in_match = false;
        self.lines.retain(|line| {
            if let Line::Section { name, .. } = line {
                in_match = name.eq_ignore_ascii_case(section);
            }
            !in_match
        });
        self.lines.len() != before
    }

    /// Iterates `(key, raw value)` pairs of every occurrence of `section`.
    fn entries_of<'a, 's>(
        &'a self,
        section: &'s str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 's
    where
        'a: 's,
    {
        let mut in_match = false;
        self.lines.iter().filter_map(move |line| match line {
            Line::Section { name, .. } => {
                in_match = name.eq_ignore_ascii_case(section);
                None
            }
            Line::Entry { key, value, .. } if in_match => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }
}

fn classify(raw: &str, in_section: bool) -> Line {
    let t = trim_blanks(raw);

    if let Some(rest) = t.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let name = trim_blanks(&rest[..end]);
            if !name.is_empty() {
                return Line::Section {
                    name: name.to_string(),
                    raw: raw.to_string(),
                };
            }
        }
        return Line::Other(raw.to_string());
    }

    if t.starts_with(';') || t.starts_with('#') || !in_section {
        return Line::Other(raw.to_string());
    }

    match t.split_once('=') {
        Some((key, value)) if !trim_blanks(key).is_empty() => Line::Entry {
            key: trim_blanks(key).to_string(),
            value: trim_blanks(value).to_string(),
            raw: raw.to_string(),
        },
        _ => Line::Other(raw.to_string()),
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(i) => {
                lines.push(&rest[..i]);
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}
