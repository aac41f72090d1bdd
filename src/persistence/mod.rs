//! Key-value persistence boundary
//!
//! Scores are stored as decimal strings under fixed keys. Reads never fail:
//! a missing or unparsable value is treated as zero.

use std::collections::HashMap;

/// Minimal string store (LocalStorage on web, a JSON file natively)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Storage keys for every persisted counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreKey {
    ClassicHigh,
    CompetitiveGreenWins,
    CompetitiveRedWins,
    PortalScore,
    PortalHigh,
}

impl ScoreKey {
    pub const ALL: [ScoreKey; 5] = [
        ScoreKey::ClassicHigh,
        ScoreKey::CompetitiveGreenWins,
        ScoreKey::CompetitiveRedWins,
        ScoreKey::PortalScore,
        ScoreKey::PortalHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreKey::ClassicHigh => "classic-high",
            ScoreKey::CompetitiveGreenWins => "competitive-green-wins",
            ScoreKey::CompetitiveRedWins => "competitive-red-wins",
            ScoreKey::PortalScore => "portal-score",
            ScoreKey::PortalHigh => "portal-high",
        }
    }
}

/// Read a counter, defaulting to 0 when missing or malformed
pub fn load_counter(store: &impl KeyValueStore, key: ScoreKey) -> u32 {
    match store.get(key.as_str()) {
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring malformed value {:?} for {}", raw, key.as_str());
                0
            }
        },
        None => 0,
    }
}

pub fn save_counter(store: &mut impl KeyValueStore, key: ScoreKey, value: u32) {
    store.set(key.as_str(), &value.to_string());
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
