//! Theme preference service.
//!
//! # Invariants
//! - The in-memory mode changes before the write and stays changed when the
//!   write fails; this preference is the one non-fatal persistence path.
//! - `is_loaded` becomes `true` after `load_theme` whatever the read outcome.

use crate::model::theme::ThemeMode;
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::storage::Storage;
use log::{info, warn};

pub struct ThemePreference<S: KeyValueStore> {
    storage: Storage<S>,
    mode: ThemeMode,
    is_loaded: bool,
}

impl<S: KeyValueStore> ThemePreference<S> {
    /// Starts in dark mode, not yet loaded.
    pub fn new(storage: Storage<S>) -> Self {
        Self {
            storage,
            mode: ThemeMode::default(),
            is_loaded: false,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Applies the stored mode if it is a known value.
    pub fn load_theme(&mut self) {
        match self.storage.get_theme_mode() {
            Ok(Some(mode)) => self.mode = mode,
            Ok(None) => {}
            Err(err) => {
                warn!("event=theme_load module=theme status=error error={err}");
            }
        }
        self.is_loaded = true;
        info!(
            "event=theme_load module=theme status=ok mode={}",
            self.mode.as_str()
        );
    }

    /// Flips between dark and light and returns the new mode.
    pub fn toggle_theme(&mut self) -> ThemeMode {
        let next = self.mode.toggled();
        self.set_theme(next);
        next
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.mode = mode;
        if let Err(err) = self.storage.set_theme_mode(mode) {
            warn!(
                "event=theme_save module=theme status=error mode={} error={err}",
                mode.as_str()
            );
        }
    }
}
