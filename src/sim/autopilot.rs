//! Demo mode: a greedy food-seeking driver
//!
//! Picks, for each snake, the legal heading whose next cell is free and
//! closest (toroidal Manhattan distance) to the nearest edible item.

use super::grid::{Grid, Position};
use super::state::{Direction, GameState, SnakeId};
use super::tick::TickInput;

/// Wrap-aware Manhattan distance
pub fn torus_distance(grid: Grid, a: Position, b: Position) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    dx.min(grid.cols - dx) + dy.min(grid.rows - dy)
}

/// Input that steers every snake on the board
pub fn autopilot_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    for snake in &state.snakes {
        if let Some(direction) = choose_direction(state, snake.id) {
            match snake.id {
                SnakeId::Green => input.green = Some(direction),
                SnakeId::Red => input.red = Some(direction),
            }
        }
    }
    input
}

/// Best heading for one snake, or `None` to keep going straight
pub fn choose_direction(state: &GameState, id: SnakeId) -> Option<Direction> {
    let snake = state.snake(id)?;
    let head = snake.head();
    let current = snake.direction;

    let target = state
        .foods
        .iter()
        .filter(|f| f.edible_by(id))
        .map(|f| f.pos)
        .min_by_key(|&pos| torus_distance(state.grid, head, pos));

    // Straight first so ties keep the heading
    let candidates = std::iter::once(current).chain(
        Direction::ALL
            .into_iter()
            .filter(move |d| !d.same_axis(current)),
    );

    let best = candidates
        .filter_map(|direction| {
            let next = landing_cell(state, head, direction);
            if state.snakes.iter().any(|s| s.occupies(next)) {
                return None;
            }
            let cost = target.map_or(0, |t| torus_distance(state.grid, next, t));
            Some((cost, direction))
        })
        .min_by_key(|&(cost, _)| cost)
        .map(|(_, direction)| direction)?;

    (best != current).then_some(best)
}

/// Cell a head ends up in after one step, portals included
fn landing_cell(state: &GameState, head: Position, direction: Direction) -> Position {
    let next = state.grid.wrap(head + direction.delta());
    state
        .portals
        .and_then(|p| p.exit_for(next))
        .unwrap_or(next)
}
