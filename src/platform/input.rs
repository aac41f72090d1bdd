//! Keyboard mapping
//!
//! Arrow keys steer the green snake; WASD steers red in competitive mode.
//! Reversal filtering is not done here; `Snake::steer` owns it.

use crate::sim::{Direction, SnakeId};
use crate::tuning::Variant;

/// Something the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Steer(SnakeId, Direction),
    /// Begin a round (resets first if the last one ended)
    Start,
    /// Reset and begin immediately
    Restart,
    /// Toggle pause
    Pause,
    /// Back to idle, optionally wiping the persisted scores
    Reset { clear_scores: bool },
}

/// Translate a `KeyboardEvent.key` value
pub fn map_key(variant: Variant, key: &str) -> Option<InputAction> {
    let arrow = match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = arrow {
        return Some(InputAction::Steer(SnakeId::Green, direction));
    }

    if variant == Variant::Competitive {
        let wasd = match key.to_lowercase().as_str() {
            "w" => Some(Direction::Up),
            "s" => Some(Direction::Down),
            "a" => Some(Direction::Left),
            "d" => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = wasd {
            return Some(InputAction::Steer(SnakeId::Red, direction));
        }
    }

    match key {
        " " | "Escape" => Some(InputAction::Pause),
        "Enter" => Some(InputAction::Start),
        _ => None,
    }
}
