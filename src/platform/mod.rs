//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names to game actions)
//! - Storage (LocalStorage on web, a JSON file natively)

pub mod input;
pub mod storage;

pub use input::{InputAction, map_key};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStore;
