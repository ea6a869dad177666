//! `[Options]` section: global emulator switches.

use ini_core::{ConfigStore, ProfileBackend};
use serde::Serialize;

/// Section holding the global switches.
pub const SECTION: &str = "Options";

/// Global switches from `[Options]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlobalOptions {
    /// When set, the emulator is inert and nothing else is read.
    pub disable: bool,
    /// Beep once the emulator initialises.
    pub init_beep: bool,
    /// Write a log file.
    pub log: bool,
    /// Open a console window for log output.
    pub console: bool,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            disable: false,
            init_beep: true,
            log: false,
            console: false,
        }
    }
}

impl GlobalOptions {
    /// Reads `[Options]`.  When `Disable` is set, the remaining switches keep
    /// their defaults.
    pub fn load<B: ProfileBackend>(store: &ConfigStore<B>) -> Self {
        let defaults = Self::default();
        let disable = store.get_bool(SECTION, "Disable", defaults.disable);
        if disable {
            return Self {
                disable,
                ..defaults
            };
        }
        Self {
            disable,
            init_beep: store.get_bool(SECTION, "UseInitBeep", defaults.init_beep),
            log: store.get_bool(SECTION, "Log", defaults.log),
            console: store.get_bool(SECTION, "Console", defaults.console),
        }
    }
}
