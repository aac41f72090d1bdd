//! Discrete simulation tick
//!
//! One call advances every snake by one cell. Ordering inside a tick:
//! steering, spawning, effect expiry, then each snake in turn (green first):
//! commit heading, wrap, portal, opponent collision, self collision, push
//! head, eat, tail.

use super::spawn;
use super::state::{
    CrashReason, Direction, Food, GameEvent, GameOutcome, GamePhase, GameState, SnakeId,
};
use crate::tuning::RareTrigger;

/// Direction input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub green: Option<Direction>,
    pub red: Option<Direction>,
}

impl TickInput {
    pub fn steer(id: SnakeId, direction: Direction) -> Self {
        let mut input = Self::default();
        match id {
            SnakeId::Green => input.green = Some(direction),
            SnakeId::Red => input.red = Some(direction),
        }
        input
    }

    pub fn for_snake(&self, id: SnakeId) -> Option<Direction> {
        match id {
            SnakeId::Green => self.green,
            SnakeId::Red => self.red,
        }
    }
}

/// Advance the game state by one tick. `now_ms` is wall-clock time used by
/// the spawn timers. Does nothing unless the game is running.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> Vec<GameEvent> {
    if state.phase != GamePhase::Running {
        return Vec::new();
    }

    for snake in &mut state.snakes {
        if let Some(direction) = input.for_snake(snake.id) {
            snake.steer(direction);
        }
    }

    state.time_ticks += 1;

    let mut events = spawn::maybe_spawn(state, now_ms);
    expire_effects(state, now_ms, &mut events);

    for idx in 0..state.snakes.len() {
        if let Some(outcome) = advance_snake(state, idx, &mut events) {
            state.phase = GamePhase::GameOver;
            state.outcome = Some(outcome);
            log::info!("Game over after {} ticks: {:?}", state.time_ticks, outcome);
            events.push(GameEvent::GameOver(outcome));
            break;
        }
    }

    events
}

/// Current scheduler interval for this state
pub fn tick_interval_ms(state: &GameState) -> u32 {
    state.rules.speed.interval_ms(state.top_score())
}

fn expire_effects(state: &mut GameState, now_ms: u64, events: &mut Vec<GameEvent>) {
    for snake in &mut state.snakes {
        if let Some(effect) = snake.active_effect
            && now_ms > effect.ends_at_ms
        {
            snake.active_effect = None;
            events.push(GameEvent::EffectExpired {
                snake: snake.id,
                kind: effect.kind,
            });
        }
    }
}

/// Move one snake. Returns the outcome if the move was terminal; the body is
/// left untouched in that case.
fn advance_snake(
    state: &mut GameState,
    idx: usize,
    events: &mut Vec<GameEvent>,
) -> Option<GameOutcome> {
    let grid = state.grid;
    let snake = &mut state.snakes[idx];
    snake.direction = snake.next_direction;
    let id = snake.id;
    let mut head = grid.wrap(snake.head() + snake.direction.delta());

    if let Some(exit) = state.portals.and_then(|p| p.exit_for(head)) {
        log::debug!("{} teleported ({}, {}) -> ({}, {})", id.as_str(), head.x, head.y, exit.x, exit.y);
        events.push(GameEvent::Teleported {
            snake: id,
            from: head,
            to: exit,
        });
        head = exit;
    }

    if let Some(other) = state
        .snakes
        .iter()
        .find(|s| s.id != id && s.occupies(head))
    {
        return Some(GameOutcome::Won {
            winner: other.id,
            loser: id,
            reason: CrashReason::HitOpponent,
        });
    }

    if state.snakes[idx].occupies(head) {
        return Some(crash_outcome(state, idx, CrashReason::SelfCollision));
    }

    state.snakes[idx].body.push_front(head);
    eat(state, idx, events);

    let snake = &mut state.snakes[idx];
    if snake.pending_growth > 0 {
        snake.pending_growth -= 1;
    } else {
        snake.body.pop_back();
    }

    None
}

fn crash_outcome(state: &GameState, idx: usize, reason: CrashReason) -> GameOutcome {
    let snake = &state.snakes[idx];
    if state.rules.is_multiplayer() {
        GameOutcome::Won {
            winner: snake.id.opponent(),
            loser: snake.id,
            reason,
        }
    } else {
        GameOutcome::Crashed { score: snake.score }
    }
}

/// Consume every edible item under the head
fn eat(state: &mut GameState, idx: usize, events: &mut Vec<GameEvent>) {
    let head = state.snakes[idx].head();
    let id = state.snakes[idx].id;

    let (eaten, kept): (Vec<Food>, Vec<Food>) = state
        .foods
        .drain(..)
        .partition(|f| f.pos == head && f.edible_by(id));
    state.foods = kept;
    if eaten.is_empty() {
        return;
    }

    let rewards = state.rules.rewards;
    let mut ate_ordinary = false;
    for food in eaten {
        let reward = rewards.get(food.tier);
        let snake = &mut state.snakes[idx];
        snake.score += reward.score;
        snake.pending_growth += reward.growth;
        ate_ordinary |= !food.tier.is_rare();
        events.push(GameEvent::FoodEaten {
            snake: id,
            tier: food.tier,
            at: food.pos,
            score: reward.score,
            growth: reward.growth,
        });
    }

    if ate_ordinary {
        if state.rules.rare_trigger == RareTrigger::OnOrdinaryPickup {
            spawn::maybe_spawn_rare(state);
        }
        spawn::refill_food(state);
    }
}
