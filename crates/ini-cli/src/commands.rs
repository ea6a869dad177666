//! `inictl` subcommands and their execution.
//!
//! Each subcommand maps onto one [`ConfigStore`] call.  Output goes to the
//! writer passed in, so tests can run commands against an in-memory profile
//! and inspect exactly what would have been printed.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use ini_core::{Column, ConfigStore, Entry, ProfileBackend, SnapshotTable};
use pad_config::EmulatorSettings;
use tracing::info;

/// Operation to perform on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print a value with its trailing comment stripped.
    ///
    /// Prints `--default` (or an empty line) when the key is absent.
    Get {
        section: String,
        key: String,
        #[arg(long, short)]
        default: Option<String>,
    },

    /// Write a value, creating the section if needed.
    Set {
        section: String,
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Delete a key.  Succeeds when the key is already absent.
    Unset { section: String, key: String },

    /// Delete a section and all its keys.
    RemoveSection { section: String },

    /// List section names, one per line.
    Sections,

    /// List the key names of a section, one per line.
    Keys { section: String },

    /// Print `true` or `false`; exits with status 1 when the section is absent.
    HasSection { section: String },

    /// Print every entry as `section<TAB>key<TAB>value`.
    Dump {
        /// Print a JSON array of `{section, key, value}` objects instead.
        #[arg(long)]
        json: bool,
        /// Sort rows by this column (stable) instead of file order.
        #[arg(long, value_enum)]
        sort: Option<SortColumn>,
    },

    /// Write every row of a JSON array of `{section, key, value}` objects.
    Import {
        /// JSON file to read; `-` reads standard input.
        input: PathBuf,
    },

    /// Print the emulator settings the profile describes, as JSON.
    Pads {
        /// Game database profile consulted for a per-executable hook mask.
        #[arg(long, env = "INICTL_GAME_DB", requires = "exe")]
        game_db: Option<PathBuf>,
        /// Executable name to look up in the game database.
        #[arg(long, requires = "game_db")]
        exe: Option<String>,
    },
}

/// Column accepted by `dump --sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Section,
    Key,
    Value,
}

impl From<SortColumn> for Column {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Section => Column::Section,
            SortColumn::Key => Column::Key,
            SortColumn::Value => Column::Value,
        }
    }
}

/// Result of a command that ran without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The queried item does not exist (`has-section`).
    Absent,
}

/// Runs `command` against `store`, printing to `out`.
///
/// # Errors
///
/// Returns an error when a mutation is rejected or cannot be persisted, when
/// an import file cannot be read or parsed, or when writing to `out` fails.
pub fn run<B: ProfileBackend, W: Write>(
    store: &ConfigStore<B>,
    command: Command,
    out: &mut W,
) -> Result<Outcome> {
    match command {
        Command::Get {
            section,
            key,
            default,
        } => {
            let value = store.get_value(&section, &key, default.as_deref().unwrap_or(""));
            writeln!(out, "{value}")?;
        }
        Command::Set {
            section,
            key,
            value,
        } => {
            store
                .set_value(&section, &key, value.as_str())
                .with_context(|| format!("failed to set [{section}] {key}"))?;
            info!(%section, %key, "value written");
        }
        Command::Unset { section, key } => {
            store
                .remove_value(&section, &key)
                .with_context(|| format!("failed to remove [{section}] {key}"))?;
        }
        Command::RemoveSection { section } => {
            store
                .remove_section(&section)
                .with_context(|| format!("failed to remove section [{section}]"))?;
        }
        Command::Sections => {
            for section in store.get_sections() {
                writeln!(out, "{section}")?;
            }
        }
        Command::Keys { section } => {
            for key in store.get_keys(&section) {
                writeln!(out, "{key}")?;
            }
        }
        Command::HasSection { section } => {
            let present = store.has_section(&section);
            writeln!(out, "{present}")?;
            if !present {
                return Ok(Outcome::Absent);
            }
        }
        Command::Dump { json, sort } => {
            let mut table = store.snapshot();
            if let Some(column) = sort {
                table.sort_by(column.into());
            }
            if json {
                serde_json::to_writer_pretty(&mut *out, table.rows())?;
                writeln!(out)?;
            } else {
                for entry in &table {
                    writeln!(out, "{}\t{}\t{}", entry.section, entry.key, entry.value)?;
                }
            }
        }
        Command::Import { input } => {
            let text = read_input(&input)?;
            let rows: Vec<Entry> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON array of entries", input.display()))?;
            let mut table = SnapshotTable::new();
            table.extend(rows);
            let written = store
                .apply_snapshot(&table)
                .context("failed to import entries")?;
            info!(rows = written, "entries imported");
            writeln!(out, "imported {written} entries")?;
        }
        Command::Pads { game_db, exe } => {
            let settings = match (game_db, exe) {
                (Some(path), Some(exe)) => {
                    let database = ConfigStore::open(path);
                    EmulatorSettings::load_with_game_database(store, &database, &exe)
                }
                _ => EmulatorSettings::load(store),
            };
            serde_json::to_writer_pretty(&mut *out, &settings)?;
            writeln!(out)?;
        }
    }
    Ok(Outcome::Success)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
