//! Game settings and preferences
//!
//! Persisted separately from scores: LocalStorage in the browser, a JSON file
//! next to the binary natively.

use serde::{Deserialize, Serialize};

use crate::consts::CELL_PX;
use crate::tuning::Variant;

/// Smallest / largest cell size accepted from a settings file
const MIN_CELL_PX: u32 = 8;
const MAX_CELL_PX: u32 = 64;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which game to launch
    pub variant: Variant,
    /// Faint cell lines over the board
    pub show_grid: bool,
    /// Edge length of one cell in pixels
    pub cell_px: u32,
    /// Fixed RNG seed; `None` picks one per session
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            show_grid: true,
            cell_px: CELL_PX,
            seed: None,
        }
    }
}

impl Settings {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Cell size clamped to a drawable range
    pub fn cell_px(&self) -> u32 {
        self.cell_px.clamp(MIN_CELL_PX, MAX_CELL_PX)
    }

    /// Configured seed, or `fallback` when none is pinned
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                None
            }
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "grid_snake_settings";

    /// Settings file used by the native runner
    pub const FILE_NAME: &'static str = "grid_snake_settings.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
            && let Some(settings) = Self::from_json(&json)
        {
            log::info!("Loaded settings from LocalStorage");
            return settings;
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                log::warn!("Failed to save settings");
            } else {
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the working directory (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(Self::FILE_NAME)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(Self::FILE_NAME);
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        if let Ok(json) = std::fs::read_to_string(path)
            && let Some(settings) = Self::from_json(&json)
        {
            log::info!("Loaded settings from {}", path.display());
            return settings;
        }

        log::info!("Using default settings");
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) {
        let path = path.as_ref();
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));
        match result {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::warn!("Failed to save settings to {}: {}", path.display(), e),
        }
    }
}
