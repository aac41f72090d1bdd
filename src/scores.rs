//! Per-variant score bookkeeping
//!
//! Loaded once at startup; written back only on game over and on an explicit
//! score clear.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, ScoreKey, load_counter, save_counter};
use crate::sim::{GameOutcome, SnakeId};
use crate::tuning::Variant;

/// Result of recording a finished round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Counters that changed and need to be persisted
    pub touched: Vec<ScoreKey>,
    /// The variant's high score went up
    pub new_high: bool,
}

/// Persisted counters for all three variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBook {
    pub classic_high: u32,
    pub green_wins: u32,
    pub red_wins: u32,
    /// Final score of the last portal round
    pub portal_score: u32,
    pub portal_high: u32,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        let mut book = Self::new();
        for key in ScoreKey::ALL {
            book.set(key, load_counter(store, key));
        }
        log::info!("Loaded scores: {:?}", book);
        book
    }

    /// Write the given counters back to the store
    pub fn save(&self, store: &mut impl KeyValueStore, keys: &[ScoreKey]) {
        for &key in keys {
            save_counter(store, key, self.get(key));
        }
        if !keys.is_empty() {
            log::info!("Scores saved ({} keys)", keys.len());
        }
    }

    pub fn get(&self, key: ScoreKey) -> u32 {
        match key {
            ScoreKey::ClassicHigh => self.classic_high,
            ScoreKey::CompetitiveGreenWins => self.green_wins,
            ScoreKey::CompetitiveRedWins => self.red_wins,
            ScoreKey::PortalScore => self.portal_score,
            ScoreKey::PortalHigh => self.portal_high,
        }
    }

    fn set(&mut self, key: ScoreKey, value: u32) {
        match key {
            ScoreKey::ClassicHigh => self.classic_high = value,
            ScoreKey::CompetitiveGreenWins => self.green_wins = value,
            ScoreKey::CompetitiveRedWins => self.red_wins = value,
            ScoreKey::PortalScore => self.portal_score = value,
            ScoreKey::PortalHigh => self.portal_high = value,
        }
    }

    pub fn wins(&self, id: SnakeId) -> u32 {
        match id {
            SnakeId::Green => self.green_wins,
            SnakeId::Red => self.red_wins,
        }
    }

    /// Best result for a variant; competitive uses the larger win count
    pub fn high_score(&self, variant: Variant) -> u32 {
        match variant {
            Variant::Classic => self.classic_high,
            Variant::Competitive => self.green_wins.max(self.red_wins),
            Variant::Portal => self.portal_high,
        }
    }

    /// Apply game-over bookkeeping for a finished round
    pub fn record(&mut self, variant: Variant, outcome: GameOutcome) -> ScoreUpdate {
        let high_before = self.high_score(variant);
        let mut touched = Vec::new();

        match (variant, outcome) {
            (Variant::Classic, GameOutcome::Crashed { score }) => {
                if score > self.classic_high {
                    self.classic_high = score;
                    touched.push(ScoreKey::ClassicHigh);
                }
            }
            (Variant::Portal, GameOutcome::Crashed { score }) => {
                self.portal_score = score;
                touched.push(ScoreKey::PortalScore);
                if score > self.portal_high {
                    self.portal_high = score;
                    touched.push(ScoreKey::PortalHigh);
                }
            }
            (Variant::Competitive, GameOutcome::Won { winner, .. }) => {
                let key = match winner {
                    SnakeId::Green => ScoreKey::CompetitiveGreenWins,
                    SnakeId::Red => ScoreKey::CompetitiveRedWins,
                };
                self.set(key, self.get(key).saturating_add(1));
                touched.push(key);
            }
            (variant, outcome) => {
                log::warn!("Outcome {:?} does not apply to {} mode", outcome, variant.as_str());
            }
        }

        ScoreUpdate {
            new_high: self.high_score(variant) > high_before,
            touched,
        }
    }

    /// Zero every counter belonging to a variant; returns the keys to persist
    pub fn clear(&mut self, variant: Variant) -> Vec<ScoreKey> {
        let keys = match variant {
            Variant::Classic => vec![ScoreKey::ClassicHigh],
            Variant::Competitive => vec![
                ScoreKey::CompetitiveGreenWins,
                ScoreKey::CompetitiveRedWins,
            ],
            Variant::Portal => vec![ScoreKey::PortalScore, ScoreKey::PortalHigh],
        };
        for &key in &keys {
            self.set(key, 0);
        }
        keys
    }
}
