//! `[InputHook]` section: which input APIs the emulator hooks.
//!
//! # Where the mask comes from (for beginners)
//!
//! The hook set is a bit mask.  It is resolved from the first of these that
//! yields a non-zero value:
//!
//! 1. The game database (a second profile keyed by executable name), unless
//!    `[InputHook] Override` is set.
//! 2. `[InputHook] HookMask`, a raw number (`0x` hex accepted).
//! 3. The individual `HookLL`, `HookCOM`, ... switches, folded into a mask.
//!
//! When the VID/PID hook ends up enabled, `FakeVID`/`FakePID` are read too.

use std::fmt;

use ini_core::{ConfigStore, ProfileBackend};
use serde::Serialize;
use tracing::debug;

/// Section holding the hook settings.
pub const SECTION: &str = "InputHook";

/// Vendor ID reported for the emulated controller unless overridden.
pub const DEFAULT_FAKE_VID: u32 = 0x045E;

/// Product ID reported for the emulated controller unless overridden.
pub const DEFAULT_FAKE_PID: u32 = 0x028E;

/// Bit set of enabled hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct HookMask(pub u32);

impl HookMask {
    pub const LL: u32 = 1 << 0;
    pub const COM: u32 = 1 << 1;
    pub const DI: u32 = 1 << 2;
    pub const VIDPID: u32 = 1 << 3;
    pub const SA: u32 = 1 << 4;
    pub const NAME: u32 = 1 << 5;
    pub const STOP: u32 = 1 << 6;
    pub const WT: u32 = 1 << 7;

    /// Profile switch name and bit for every individually switchable hook.
    pub const SWITCHES: [(&'static str, u32); 8] = [
        ("HookLL", Self::LL),
        ("HookCOM", Self::COM),
        ("HookDI", Self::DI),
        ("HookVIDPID", Self::VIDPID),
        ("HookSA", Self::SA),
        ("HookNAME", Self::NAME),
        ("HookSTOP", Self::STOP),
        ("HookWT", Self::WT),
    ];

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `flag` is set.
    pub fn contains(&self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    pub fn insert(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Switch names of the known bits that are set, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        Self::SWITCHES
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl fmt::Display for HookMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Which source supplied the effective hook mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookSource {
    GameDatabase,
    ProfileMask,
    #[default]
    Switches,
}

/// Vendor/product pair reported through the VID/PID hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FakeDevice {
    pub vid: u32,
    pub pid: u32,
}

impl FakeDevice {
    /// Returns `true` when the pair equals the stock controller IDs, in which
    /// case the hook has nothing to rewrite.
    pub fn is_stock(&self) -> bool {
        self.vid == DEFAULT_FAKE_VID && self.pid == DEFAULT_FAKE_PID
    }
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self {
            vid: DEFAULT_FAKE_VID,
            pid: DEFAULT_FAKE_PID,
        }
    }
}

/// Resolved `[InputHook]` settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HookSettings {
    /// `Override`: ignore the game database.
    pub override_database: bool,
    pub mask: HookMask,
    pub source: HookSource,
    /// Present only when the VID/PID hook is enabled.
    pub fake_device: Option<FakeDevice>,
}

impl HookSettings {
    /// Hooks are active when any bit is set.
    pub fn enabled(&self) -> bool {
        !self.mask.is_empty()
    }

    /// Reads `[InputHook]`.  `database_mask` is the mask the game database
    /// holds for the running executable, or `0` when there is none.
    pub fn load<B: ProfileBackend>(store: &ConfigStore<B>, database_mask: u32) -> Self {
        let override_database = store.get_bool(SECTION, "Override", false);

        let (mask, source) = if database_mask != 0 && !override_database {
            (HookMask(database_mask), HookSource::GameDatabase)
        } else {
            let raw = store.get_dword(SECTION, "HookMask", 0);
            if raw != 0 {
                (HookMask(raw), HookSource::ProfileMask)
            } else {
                let mut folded = HookMask::default();
                for (switch, bit) in HookMask::SWITCHES {
                    if store.get_bool(SECTION, switch, false) {
                        folded.insert(bit);
                    }
                }
                (folded, HookSource::Switches)
            }
        };

        let fake_device = mask.contains(HookMask::VIDPID).then(|| FakeDevice {
            vid: store.get_dword(SECTION, "FakeVID", DEFAULT_FAKE_VID),
            pid: store.get_dword(SECTION, "FakePID", DEFAULT_FAKE_PID),
        });

        debug!(%mask, ?source, "hook settings resolved");
        Self {
            override_database,
            mask,
            source,
            fake_device,
        }
    }
}

/// Looks up the hook mask recorded for `exe_name` in a game database profile.
/// Returns `0` when the executable is not listed.
pub fn game_database_mask<D: ProfileBackend>(database: &ConfigStore<D>, exe_name: &str) -> u32 {
    database.get_dword(exe_name, "HookMask", 0)
}
