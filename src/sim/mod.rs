//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Wall-clock time enters only as the `now_ms` tick argument
//! - Stable snake order (green first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod grid;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::{autopilot_input, choose_direction};
pub use grid::{Grid, Position};
pub use spawn::maybe_spawn;
pub use state::{
    ActiveEffect, CrashReason, Direction, Food, FoodTier, GameEvent, GameOutcome, GamePhase,
    GameState, PortalPair, PowerUp, PowerUpKind, Snake, SnakeId,
};
pub use tick::{TickInput, tick, tick_interval_ms};
