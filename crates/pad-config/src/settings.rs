//! Whole-profile loader.

use ini_core::{ConfigStore, ProfileBackend};
use serde::Serialize;
use tracing::info;

use crate::hooks::{game_database_mask, HookSettings};
use crate::options::GlobalOptions;
use crate::pads::PadSettings;

/// Everything the emulator reads from its profile at start-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmulatorSettings {
    pub options: GlobalOptions,
    pub hooks: HookSettings,
    pub pads: Vec<PadSettings>,
}

impl EmulatorSettings {
    /// Reads the profile behind `store`.
    ///
    /// When `[Options] Disable` is set, hooks and pads are left at their
    /// defaults.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_core::{ConfigStore, MemoryBackend, StoreOptions};
    /// use pad_config::EmulatorSettings;
    ///
    /// let store = ConfigStore::with_backend(
    ///     MemoryBackend::with_text("[InputHook]\nHookLL=1\n"),
    ///     StoreOptions::default(),
    /// );
    /// let settings = EmulatorSettings::load(&store);
    /// assert!(settings.hooks.enabled());
    /// assert!(settings.pads.is_empty());
    /// ```
    pub fn load<B: ProfileBackend>(store: &ConfigStore<B>) -> Self {
        Self::load_with_database_mask(store, 0)
    }

    /// Like [`EmulatorSettings::load`], but consults a game database profile
    /// for a hook mask registered under `exe_name`.
    pub fn load_with_game_database<B: ProfileBackend, D: ProfileBackend>(
        store: &ConfigStore<B>,
        database: &ConfigStore<D>,
        exe_name: &str,
    ) -> Self {
        Self::load_with_database_mask(store, game_database_mask(database, exe_name))
    }

    fn load_with_database_mask<B: ProfileBackend>(
        store: &ConfigStore<B>,
        database_mask: u32,
    ) -> Self {
        let options = GlobalOptions::load(store);
        if options.disable {
            info!("emulator disabled by profile");
            return Self {
                options,
                ..Self::default()
            };
        }

        let hooks = HookSettings::load(store, database_mask);
        let pads = PadSettings::load_all(store);
        info!(
            hooks = %hooks.mask,
            pads = pads.len(),
            enabled = pads.iter().filter(|p| p.enabled).count(),
            "emulator settings loaded"
        );
        Self {
            options,
            hooks,
            pads,
        }
    }

    /// Pads that will actually be emulated.
    pub fn enabled_pads(&self) -> impl Iterator<Item = &PadSettings> {
        self.pads.iter().filter(|p| p.enabled)
    }
}
