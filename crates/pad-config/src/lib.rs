//! # pad-config
//!
//! Typed view of a controller-emulator profile (`x360ce.ini` style) built on
//! top of [`ini_core::ConfigStore`].
//!
//! # How a profile is laid out (for beginners)
//!
//! ```text
//! [Options]
//! UseInitBeep=1
//!
//! [InputHook]
//! HookMask=0x00000000
//! HookLL=1
//!
//! [Mappings]
//! PAD1=IG_6f1d2b60d5a011cf   ; names the section holding pad 1
//!
//! [IG_6f1d2b60d5a011cf]
//! ProductGUID={...}
//! A=1                        ; button numbers are 1-based in the file
//! ```
//!
//! - **`options`** – `[Options]`: global switches.
//! - **`hooks`** – `[InputHook]`: the hook bit set and the fake VID/PID,
//!   optionally overridden by a per-executable game database.
//! - **`pads`** – one [`PadSettings`] per `PADn` entry of `[Mappings]`.
//! - **`settings`** – [`EmulatorSettings::load`] ties the three together.
//!
//! Loading never fails: every value falls back to its documented default, the
//! same way the store's getters do.

pub mod hooks;
pub mod options;
pub mod pads;
pub mod settings;

pub use hooks::{FakeDevice, HookMask, HookSettings, HookSource};
pub use options::GlobalOptions;
pub use pads::{
    AxisKind, AxisSource, AxisTuning, DeviceSettings, ForceFeedback, PadMapping, PadSettings,
    PovTarget, TriggerKind, TriggerSource,
};
pub use settings::EmulatorSettings;
