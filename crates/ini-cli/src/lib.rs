//! ini-cli library crate.
//!
//! Holds the `inictl` subcommands so they can be driven against any
//! [`ini_core::ConfigStore`] backend.  The binary in `main.rs` only parses
//! arguments, builds a file-backed store and calls [`commands::run`].
//!
//! # For beginners: why a library next to a binary?
//!
//! Code in `main.rs` can only be tested from inside that file.  Moving the
//! command logic into a library lets integration tests and other tools call
//! it with an in-memory profile and capture its output.

/// Subcommand definitions and their execution.
pub mod commands;
