//! `inictl`: inspect and edit INI profiles from the command line.
//!
//! # Usage
//!
//! ```text
//! inictl --file <PATH> [OPTIONS] <COMMAND>
//!
//! Commands:
//!   get <SECTION> <KEY> [--default <D>]   Print a value
//!   set <SECTION> <KEY> <VALUE>           Write a value
//!   unset <SECTION> <KEY>                 Delete a key
//!   remove-section <SECTION>              Delete a section
//!   sections                              List sections
//!   keys <SECTION>                        List keys of a section
//!   has-section <SECTION>                 Exit 1 if the section is absent
//!   dump [--json] [--sort <COLUMN>]       Print every entry
//!   import <FILE|->                       Write entries from JSON
//!   pads [--game-db <PATH> --exe <NAME>]  Print emulator settings as JSON
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable              | Default   | Description                          |
//! |-----------------------|-----------|--------------------------------------|
//! | `INICTL_FILE`         | –         | Profile to operate on                |
//! | `INICTL_ENCODING`     | `utf16le` | Encoding used when writing           |
//! | `INICTL_MAX_VALUE_LEN`| `254`     | Value truncation limit (`0` = none)  |
//! | `INICTL_GAME_DB`      | –         | Game database for `pads`             |
//! | `RUST_LOG`            | `warn`    | Log filter (logs go to stderr)       |

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ini_cli::commands::{run, Command, Outcome};
use ini_core::store::DEFAULT_MAX_VALUE_LEN;
use ini_core::{ConfigStore, FileBackend, StoreOptions, TextEncoding};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and edit INI profiles.
///
/// Reads detect UTF-16 (with or without BOM) and UTF-8 automatically; writes
/// use `--encoding`.
#[derive(Debug, Parser)]
#[command(name = "inictl", about = "Inspect and edit INI profiles", version)]
struct Cli {
    /// Profile file to operate on.  A missing file behaves as empty.
    #[arg(long, short, env = "INICTL_FILE")]
    file: PathBuf,

    /// Encoding used when writing: `utf16le`, `utf16be` or `utf8`.
    #[arg(long, default_value = "utf16le", env = "INICTL_ENCODING")]
    encoding: TextEncoding,

    /// Values longer than this are truncated on read.  `0` disables it.
    #[arg(long, default_value_t = DEFAULT_MAX_VALUE_LEN, env = "INICTL_MAX_VALUE_LEN")]
    max_value_len: usize,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Builds the store the command will run against, handing back the
    /// command itself.
    fn into_store(self) -> (ConfigStore<FileBackend>, Command) {
        let options = StoreOptions {
            max_value_len: (self.max_value_len > 0).then_some(self.max_value_len),
            ..StoreOptions::default()
        };
        let backend = FileBackend::new(self.file).with_encoding(self.encoding);
        (ConfigStore::with_backend(backend, options), self.command)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    // Quiet by default: stdout carries command output, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (store, command) = cli.into_store();
    debug!(file = %store.path().display(), ?command, "running command");

    let stdout = std::io::stdout();
    let outcome = run(&store, command, &mut stdout.lock())
        .with_context(|| format!("inictl failed on {}", store.path().display()))?;

    Ok(match outcome {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Absent => ExitCode::from(1),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ini_cli::commands::SortColumn;

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["inictl", "--file", "x360ce.ini", "sections"]);

        // Assert
        assert_eq!(cli.file, PathBuf::from("x360ce.ini"));
        assert_eq!(cli.encoding, TextEncoding::Utf16Le);
        assert_eq!(cli.max_value_len, DEFAULT_MAX_VALUE_LEN);
        assert_eq!(cli.command, Command::Sections);
    }

    #[test]
    fn test_cli_encoding_override() {
        let cli = Cli::parse_from(["inictl", "-f", "p.ini", "--encoding", "utf8", "sections"]);
        assert_eq!(cli.encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_cli_rejects_unknown_encoding() {
        let result =
            Cli::try_parse_from(["inictl", "-f", "p.ini", "--encoding", "latin1", "sections"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_get_with_default() {
        let cli = Cli::parse_from([
            "inictl", "-f", "p.ini", "get", "Options", "Log", "--default", "0",
        ]);
        assert_eq!(
            cli.command,
            Command::Get {
                section: "Options".into(),
                key: "Log".into(),
                default: Some("0".into()),
            }
        );
    }

    #[test]
    fn test_cli_set_accepts_negative_value() {
        let cli = Cli::parse_from([
            "inictl", "-f", "p.ini", "set", "PAD1", "AxisToDPadOffset", "-3",
        ]);
        assert_eq!(
            cli.command,
            Command::Set {
                section: "PAD1".into(),
                key: "AxisToDPadOffset".into(),
                value: "-3".into(),
            }
        );
    }

    #[test]
    fn test_cli_dump_flags() {
        let cli = Cli::parse_from(["inictl", "-f", "p.ini", "dump", "--json", "--sort", "key"]);
        assert_eq!(
            cli.command,
            Command::Dump {
                json: true,
                sort: Some(SortColumn::Key),
            }
        );
    }

    #[test]
    fn test_cli_pads_requires_exe_with_game_db() {
        let result =
            Cli::try_parse_from(["inictl", "-f", "p.ini", "pads", "--game-db", "x360ce.gdb"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_file() {
        // INICTL_FILE is not set in the test environment
        if std::env::var_os("INICTL_FILE").is_none() {
            assert!(Cli::try_parse_from(["inictl", "sections"]).is_err());
        }
    }

    #[test]
    fn test_into_store_zero_max_value_len_is_unlimited() {
        // Arrange
        let cli = Cli::parse_from(["inictl", "-f", "p.ini", "--max-value-len", "0", "sections"]);

        // Act
        let (store, _) = cli.into_store();

        // Assert
        assert_eq!(store.options().max_value_len, None);
        assert_eq!(store.path(), std::path::Path::new("p.ini"));
    }

    #[test]
    fn test_end_to_end_against_temp_file() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profile.ini");
        let file = path.to_string_lossy().into_owned();
        let set = Cli::parse_from(["inictl", "-f", &file, "set", "Controller1", "Type", "Virtual"]);
        let get = Cli::parse_from(["inictl", "-f", &file, "get", "Controller1", "Type"]);

        // Act
        let (store, command) = set.into_store();
        run(&store, command, &mut Vec::new()).expect("set");
        let (store, command) = get.into_store();
        let mut out = Vec::new();
        run(&store, command, &mut out).expect("get");

        // Assert
        assert_eq!(String::from_utf8(out).expect("utf8"), "Virtual\n");
        assert_eq!(&std::fs::read(&path).expect("file")[..2], &[0xFF, 0xFE]);
    }
}
