//! Food, power-up and portal spawning
//!
//! Ordinary food and portals use bounded random placement; rare tiers keep
//! drawing until they find a free cell.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::grid::Position;
use super::state::{
    Food, FoodTier, GameEvent, GameState, PortalPair, PowerUp, PowerUpKind, SnakeId, SpawnTimers,
};
use crate::consts::PLACEMENT_ATTEMPTS;
use crate::tuning::{OrdinarySpawn, RareTrigger};

/// True if any snake segment, food, power-up or portal sits on `pos`
pub fn is_occupied(state: &GameState, pos: Position) -> bool {
    state.snakes.iter().any(|s| s.occupies(pos))
        || state.foods.iter().any(|f| f.pos == pos)
        || state.power_ups.iter().any(|p| p.pos == pos)
        || state.portals.is_some_and(|p| p.contains(pos))
}

fn occupied_cells(state: &GameState) -> HashSet<Position> {
    let mut cells: HashSet<Position> = state
        .snakes
        .iter()
        .flat_map(|s| s.body.iter().copied())
        .collect();
    cells.extend(state.foods.iter().map(|f| f.pos));
    cells.extend(state.power_ups.iter().map(|p| p.pos));
    if let Some(portals) = state.portals {
        cells.insert(portals.a);
        cells.insert(portals.b);
    }
    cells
}

/// Draw up to `attempts` random cells. Returns the last candidate and
/// whether it is free.
fn draw_bounded(state: &mut GameState, attempts: u32, also_blocked: &[Position]) -> (Position, bool) {
    let mut candidate = state.random_cell();
    for attempt in 0..attempts.max(1) {
        if attempt > 0 {
            candidate = state.random_cell();
        }
        if !is_occupied(state, candidate) && !also_blocked.contains(&candidate) {
            return (candidate, true);
        }
    }
    (candidate, false)
}

/// Random free cell, giving up silently after a fixed number of draws
pub fn place_bounded(state: &mut GameState) -> Option<Position> {
    match draw_bounded(state, PLACEMENT_ATTEMPTS, &[]) {
        (pos, true) => Some(pos),
        _ => None,
    }
}

/// Random free cell, drawing until one is found. `None` only when the board
/// is completely full.
pub fn place_anywhere(state: &mut GameState) -> Option<Position> {
    let occupied = occupied_cells(state);
    if occupied.len() >= state.grid.cell_count() {
        return None;
    }
    loop {
        let candidate = state.random_cell();
        if !occupied.contains(&candidate) {
            return Some(candidate);
        }
    }
}

/// Keep the single refill-style ordinary food on the board
pub fn refill_food(state: &mut GameState) {
    if state.rules.ordinary != OrdinarySpawn::Refill {
        return;
    }
    let lanes = state.rules.lanes.clone();
    for lane in lanes {
        if state.lane_food(lane) > 0 || state.total_food() >= state.rules.max_total_food {
            continue;
        }
        if let Some(pos) = place_anywhere(state) {
            state.foods.push(Food {
                pos,
                tier: FoodTier::Ordinary,
                lane,
            });
        }
    }
}

/// One timed ordinary-food attempt for `lane`
fn spawn_ordinary(state: &mut GameState, lane: Option<SnakeId>, per_lane_cap: usize) -> bool {
    if state.lane_food(lane) >= per_lane_cap || state.total_food() >= state.rules.max_total_food {
        return false;
    }
    match place_bounded(state) {
        Some(pos) => {
            state.foods.push(Food {
                pos,
                tier: FoodTier::Ordinary,
                lane,
            });
            true
        }
        None => {
            log::debug!("Ordinary food placement exhausted, skipping");
            false
        }
    }
}

/// Place a rare singleton if it is absent and the global cap allows
pub fn spawn_rare(state: &mut GameState, tier: FoodTier) -> bool {
    if !tier.is_rare()
        || state.has_tier(tier)
        || state.total_food() >= state.rules.max_total_food
    {
        return false;
    }
    match place_anywhere(state) {
        Some(pos) => {
            state.foods.push(Food {
                pos,
                tier,
                lane: None,
            });
            log::debug!("{:?} food spawned at ({}, {})", tier, pos.x, pos.y);
            true
        }
        None => false,
    }
}

/// Roll every rare tier once, in rule order
pub fn maybe_spawn_rare(state: &mut GameState) {
    let chances = state.rules.rare_chances.clone();
    for (tier, chance) in chances {
        if state.has_tier(tier) || state.total_food() >= state.rules.max_total_food {
            continue;
        }
        if state.rng().random_bool(chance) {
            spawn_rare(state, tier);
        }
    }
}

/// Replace the portal pair. Each endpoint gets a bounded search; if that
/// runs dry the last drawn cell is used anyway.
pub fn spawn_portals(state: &mut GameState) -> PortalPair {
    let (a, _) = draw_bounded(state, PLACEMENT_ATTEMPTS, &[]);
    let (b, _) = draw_bounded(state, PLACEMENT_ATTEMPTS, &[a]);
    let pair = PortalPair { a, b };
    state.portals = Some(pair);
    log::debug!("Portals at ({}, {}) <-> ({}, {})", a.x, a.y, b.x, b.y);
    pair
}

/// Drop a power-up of random kind on a random cell (occupancy is not checked)
pub fn spawn_power_up(state: &mut GameState, now_ms: u64) -> PowerUp {
    let pos = state.random_cell();
    let kind = *PowerUpKind::ALL
        .choose(state.rng())
        .unwrap_or(&PowerUpKind::Invincibility);
    let power_up = PowerUp {
        pos,
        kind,
        spawned_at_ms: now_ms,
    };
    state.power_ups.push(power_up);
    power_up
}

/// Per-tick spawning: timed ordinary food, rare tiers, power-ups and portals
pub fn maybe_spawn(state: &mut GameState, now_ms: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.rules.ordinary {
        OrdinarySpawn::Refill => refill_food(state),
        OrdinarySpawn::Timed {
            cooldown_ms,
            chance,
            per_lane_cap,
        } => {
            let lanes = state.rules.lanes.clone();
            for (i, lane) in lanes.into_iter().enumerate() {
                let last = state.timers.lanes.get(i).copied().flatten();
                if state.lane_food(lane) >= per_lane_cap
                    || !SpawnTimers::due(last, now_ms, cooldown_ms)
                {
                    continue;
                }
                if state.total_food() < state.rules.max_total_food
                    && state.rng().random_bool(chance)
                {
                    spawn_ordinary(state, lane, per_lane_cap);
                }
                if let Some(slot) = state.timers.lanes.get_mut(i) {
                    *slot = Some(now_ms);
                }
            }
        }
    }

    if state.rules.rare_trigger == RareTrigger::EveryTick {
        maybe_spawn_rare(state);
    }

    if let Some(interval) = state.rules.power_up_interval_ms
        && SpawnTimers::due(state.timers.power_up, now_ms, interval)
    {
        let power_up = spawn_power_up(state, now_ms);
        state.timers.power_up = Some(now_ms);
        events.push(GameEvent::PowerUpSpawned {
            kind: power_up.kind,
            at: power_up.pos,
        });
    }

    if let Some(interval) = state.rules.portal_interval_ms
        && SpawnTimers::due(state.timers.portals, now_ms, interval)
    {
        let pair = spawn_portals(state);
        state.timers.portals = Some(now_ms);
        events.push(GameEvent::PortalsSpawned(pair));
    }

    events
}
