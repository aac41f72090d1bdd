//! Grid Snake - three snake variants on a wrap-around grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, game state)
//! - `tuning`: Data-driven per-variant rules
//! - `session`: Scheduler-owned game session (start/pause/reset, score bookkeeping)
//! - `scores`: Typed score book over the key-value store
//! - `persistence`: Key-value store boundary
//! - `platform`: Browser/native input and storage
//! - `renderer`: Scene construction for the 2D canvas

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use scores::ScoreBook;
pub use session::Session;
pub use settings::Settings;
pub use tuning::{Rules, Variant};

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in pixels
    pub const CELL_PX: u32 = 20;

    /// Grid used before the first viewport measurement
    pub const DEFAULT_COLS: i32 = 40;
    pub const DEFAULT_ROWS: i32 = 30;

    /// Smallest grid a viewport can shrink to
    pub const MIN_COLS: i32 = 15;
    pub const MIN_ROWS: i32 = 12;

    /// Horizontal / vertical page chrome around the canvas (pixels)
    pub const CHROME_WIDTH: u32 = 24;
    pub const CHROME_HEIGHT: u32 = 160;

    /// Tick interval at the start of a round (ms)
    pub const BASE_TICK_MS: u32 = 150;
    /// Fastest tick interval (ms)
    pub const MIN_TICK_MS: u32 = 50;

    /// Attempts before a bounded placement gives up
    pub const PLACEMENT_ATTEMPTS: u32 = 20;
}
