//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; the scheduler owns
//! it and passes it by reference.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};
use super::spawn;
use crate::tuning::{Rules, StartCell, Variant};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh board, waiting for a start action
    Idle,
    /// Ticks are being applied
    Running,
    /// Frozen; no tick is applied
    Paused,
    /// Terminal collision happened
    GameOver,
}

/// Heading of a snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid coordinates (y grows downwards)
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True if both directions lie on the same axis (equal or opposite)
    pub fn same_axis(&self, other: Direction) -> bool {
        self.is_horizontal() == other.is_horizontal()
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Player identity; single-player variants only use `Green`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SnakeId {
    Green,
    Red,
}

impl SnakeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnakeId::Green => "Green",
            SnakeId::Red => "Red",
        }
    }

    pub fn opponent(&self) -> SnakeId {
        match self {
            SnakeId::Green => SnakeId::Red,
            SnakeId::Red => SnakeId::Green,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Invincibility,
    Magnet,
    Ghost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Invincibility,
        PowerUpKind::Magnet,
        PowerUpKind::Ghost,
    ];
}

/// A power-up lying on the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Position,
    pub kind: PowerUpKind,
    pub spawned_at_ms: u64,
}

/// Timed effect attached to a snake.
///
/// Nothing in movement, collision or scoring consults it yet; it is only
/// expired once `ends_at_ms` has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub ends_at_ms: u64,
}

/// A pair of linked teleport cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalPair {
    pub a: Position,
    pub b: Position,
}

impl PortalPair {
    /// Where a head entering `pos` comes out, if `pos` is an endpoint
    pub fn exit_for(&self, pos: Position) -> Option<Position> {
        if pos == self.a {
            Some(self.b)
        } else if pos == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos == self.a || pos == self.b
    }
}

/// Food categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodTier {
    Ordinary,
    Bronze,
    Golden,
    Diamond,
    Sapphire,
}

impl FoodTier {
    /// Rare tiers exist at most once on the board
    pub fn is_rare(&self) -> bool {
        !matches!(self, FoodTier::Ordinary)
    }
}

/// A food item on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub pos: Position,
    pub tier: FoodTier,
    /// Colour lane of an ordinary item; `None` means any snake may eat it
    pub lane: Option<SnakeId>,
}

impl Food {
    pub fn edible_by(&self, id: SnakeId) -> bool {
        self.lane.is_none_or(|lane| lane == id)
    }
}

/// A snake: body segments with the head at the front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    pub id: SnakeId,
    pub body: VecDeque<Position>,
    /// Heading applied on the last tick
    pub direction: Direction,
    /// Heading that the next tick will commit
    pub next_direction: Direction,
    /// Ticks for which tail removal is still suppressed
    pub pending_growth: u32,
    /// Points earned this round
    pub score: u32,
    pub active_effect: Option<ActiveEffect>,
}

impl Snake {
    pub fn new(id: SnakeId, head: Position, direction: Direction) -> Self {
        Self {
            id,
            body: VecDeque::from([head]),
            direction,
            next_direction: direction,
            pending_growth: 0,
            score: 0,
            active_effect: None,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Queue a turn. Only turns onto the axis orthogonal to the active
    /// heading are accepted, so a reversal can never be queued.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.direction.same_axis(direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }
}

/// Single-player crash or competitive win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashReason {
    SelfCollision,
    HitOpponent,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Single-player round over with the final score
    Crashed { score: u32 },
    /// Competitive round decided; `loser` crashed for `reason`
    Won {
        winner: SnakeId,
        loser: SnakeId,
        reason: CrashReason,
    },
}

/// Side effects of a tick, for the renderer and score bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten {
        snake: SnakeId,
        tier: FoodTier,
        at: Position,
        score: u32,
        growth: u32,
    },
    Teleported {
        snake: SnakeId,
        from: Position,
        to: Position,
    },
    PortalsSpawned(PortalPair),
    PowerUpSpawned {
        kind: PowerUpKind,
        at: Position,
    },
    EffectExpired {
        snake: SnakeId,
        kind: PowerUpKind,
    },
    GameOver(GameOutcome),
}

/// Last spawn attempt per timer; `None` means never, so the first tick fires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimers {
    /// One entry per ordinary-food lane
    pub lanes: Vec<Option<u64>>,
    pub power_up: Option<u64>,
    pub portals: Option<u64>,
}

impl SpawnTimers {
    pub fn new(lanes: usize) -> Self {
        Self {
            lanes: vec![None; lanes],
            power_up: None,
            portals: None,
        }
    }

    /// True if `interval_ms` has elapsed since `last` (or it never fired)
    pub fn due(last: Option<u64>, now_ms: u64, interval_ms: u64) -> bool {
        last.is_none_or(|t| now_ms.saturating_sub(t) >= interval_ms)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rules: Rules,
    pub grid: Grid,
    pub phase: GamePhase,
    /// Snakes in resolution order (green first)
    pub snakes: Vec<Snake>,
    pub foods: Vec<Food>,
    pub power_ups: Vec<PowerUp>,
    pub portals: Option<PortalPair>,
    pub timers: SpawnTimers,
    /// Simulation tick counter for the current round
    pub time_ticks: u64,
    /// Set on entry to `GameOver`
    pub outcome: Option<GameOutcome>,
    rng: Pcg32,
}

impl GameState {
    /// Create a fresh, idle board for `variant`
    pub fn new(variant: Variant, grid: Grid, seed: u64) -> Self {
        Self::with_rules(variant.rules(), grid, seed)
    }

    pub fn with_rules(rules: Rules, grid: Grid, seed: u64) -> Self {
        let lanes = rules.lanes.len();
        let mut state = Self {
            seed,
            rules,
            grid,
            phase: GamePhase::Idle,
            snakes: Vec::new(),
            foods: Vec::new(),
            power_ups: Vec::new(),
            portals: None,
            timers: SpawnTimers::new(lanes),
            time_ticks: 0,
            outcome: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset();
        state
    }

    /// Back to `Idle`: clear transient entities, timers and round scores, and
    /// place the snakes at their starting cells
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.foods.clear();
        self.power_ups.clear();
        self.portals = None;
        self.timers = SpawnTimers::new(self.rules.lanes.len());
        self.time_ticks = 0;
        self.outcome = None;

        let starts = self.rules.snakes.clone();
        self.snakes = starts
            .iter()
            .map(|start| {
                let head = match start.cell {
                    StartCell::Fixed(x, y) => self.grid.wrap(IVec2::new(x, y)),
                    StartCell::Random => self.random_cell(),
                };
                Snake::new(start.id, head, start.heading)
            })
            .collect();

        spawn::refill_food(self);
    }

    /// Adopt new board dimensions, remapping every entity through `wrap`
    pub fn resize(&mut self, grid: Grid) {
        if grid == self.grid {
            return;
        }
        self.grid = grid;
        for snake in &mut self.snakes {
            for segment in snake.body.iter_mut() {
                *segment = grid.wrap(*segment);
            }
        }
        for food in &mut self.foods {
            food.pos = grid.wrap(food.pos);
        }
        for power_up in &mut self.power_ups {
            power_up.pos = grid.wrap(power_up.pos);
        }
        if let Some(portals) = &mut self.portals {
            portals.a = grid.wrap(portals.a);
            portals.b = grid.wrap(portals.b);
        }
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }

    pub fn snake_mut(&mut self, id: SnakeId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|s| s.id == id)
    }

    /// Queue a turn for one snake (reversals are filtered out)
    pub fn steer(&mut self, id: SnakeId, direction: Direction) -> bool {
        self.snake_mut(id).is_some_and(|s| s.steer(direction))
    }

    pub fn total_food(&self) -> usize {
        self.foods.len()
    }

    /// Ordinary items in one lane
    pub fn lane_food(&self, lane: Option<SnakeId>) -> usize {
        self.foods
            .iter()
            .filter(|f| f.tier == FoodTier::Ordinary && f.lane == lane)
            .count()
    }

    pub fn has_tier(&self, tier: FoodTier) -> bool {
        self.foods.iter().any(|f| f.tier == tier)
    }

    /// Best round score among the snakes (drives the speed curve)
    pub fn top_score(&self) -> u32 {
        self.snakes.iter().map(|s| s.score).max().unwrap_or(0)
    }

    /// Uniformly random cell (no occupancy check)
    pub fn random_cell(&mut self) -> Position {
        let x = self.rng.random_range(0..self.grid.cols);
        let y = self.rng.random_range(0..self.grid.rows);
        IVec2::new(x, y)
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_axes() {
        assert!(Direction::Left.same_axis(Direction::Right));
        assert!(Direction::Up.same_axis(Direction::Down));
        assert!(Direction::Up.same_axis(Direction::Up));
        assert!(!Direction::Up.same_axis(Direction::Left));
        for d in Direction::ALL {
            assert_eq!(d.delta() + d.opposite().delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_steer_rejects_reversal() {
        let mut snake = Snake::new(SnakeId::Green, IVec2::new(5, 5), Direction::Right);
        assert!(!snake.steer(Direction::Left));
        assert!(!snake.steer(Direction::Right));
        assert_eq!(snake.next_direction, Direction::Right);

        assert!(snake.steer(Direction::Up));
        assert_eq!(snake.next_direction, Direction::Up);
        // Filtering is against the active heading, not the queued one
        assert!(!snake.steer(Direction::Left));
        assert!(snake.steer(Direction::Down));
        assert_eq!(snake.next_direction, Direction::Down);
    }

    #[test]
    fn test_portal_exit() {
        let pair = PortalPair {
            a: IVec2::new(1, 1),
            b: IVec2::new(8, 3),
        };
        assert_eq!(pair.exit_for(IVec2::new(1, 1)), Some(IVec2::new(8, 3)));
        assert_eq!(pair.exit_for(IVec2::new(8, 3)), Some(IVec2::new(1, 1)));
        assert_eq!(pair.exit_for(IVec2::new(2, 2)), None);
    }

    #[test]
    fn test_food_lanes() {
        let shared = Food {
            pos: IVec2::ZERO,
            tier: FoodTier::Golden,
            lane: None,
        };
        let red = Food {
            pos: IVec2::ZERO,
            tier: FoodTier::Ordinary,
            lane: Some(SnakeId::Red),
        };
        assert!(shared.edible_by(SnakeId::Green));
        assert!(shared.edible_by(SnakeId::Red));
        assert!(red.edible_by(SnakeId::Red));
        assert!(!red.edible_by(SnakeId::Green));
    }

    #[test]
    fn test_new_classic_state() {
        let state = GameState::new(Variant::Classic, Grid::default(), 7);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snakes.len(), 1);
        assert_eq!(state.snakes[0].head(), IVec2::new(10, 10));
        assert_eq!(state.snakes[0].direction, Direction::Right);
        // Classic keeps exactly one food on the board
        assert_eq!(state.total_food(), 1);
        assert!(!state.snakes[0].occupies(state.foods[0].pos));
    }

    #[test]
    fn test_new_competitive_state() {
        let state = GameState::new(Variant::Competitive, Grid::default(), 7);
        assert_eq!(state.snakes.len(), 2);
        assert_eq!(state.snakes[0].id, SnakeId::Green);
        assert_eq!(state.snakes[0].direction, Direction::Right);
        assert_eq!(state.snakes[1].id, SnakeId::Red);
        assert_eq!(state.snakes[1].direction, Direction::Left);
        assert_eq!(state.timers.lanes.len(), 2);
        assert!(state.foods.is_empty());
        for snake in &state.snakes {
            assert!(state.grid.contains(snake.head()));
        }
    }

    #[test]
    fn test_reset_clears_transients() {
        let mut state = GameState::new(Variant::Portal, Grid::default(), 3);
        state.phase = GamePhase::GameOver;
        state.foods.push(Food {
            pos: IVec2::new(3, 3),
            tier: FoodTier::Diamond,
            lane: None,
        });
        state.portals = Some(PortalPair {
            a: IVec2::new(1, 1),
            b: IVec2::new(2, 2),
        });
        state.timers.portals = Some(500);
        state.snakes[0].pending_growth = 4;
        state.snakes[0].score = 120;

        state.reset();

        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.foods.is_empty());
        assert!(state.portals.is_none());
        assert_eq!(state.timers, SpawnTimers::new(1));
        assert_eq!(state.snakes[0].pending_growth, 0);
        assert_eq!(state.snakes[0].score, 0);
        assert_eq!(state.snakes[0].len(), 1);
    }

    #[test]
    fn test_resize_remaps_entities() {
        let mut state = GameState::new(Variant::Portal, Grid::new(40, 30), 3);
        state.snakes[0].body = VecDeque::from([IVec2::new(35, 25), IVec2::new(34, 25)]);
        state.foods.push(Food {
            pos: IVec2::new(39, 29),
            tier: FoodTier::Ordinary,
            lane: None,
        });
        state.power_ups.push(PowerUp {
            pos: IVec2::new(22, 3),
            kind: PowerUpKind::Ghost,
            spawned_at_ms: 0,
        });
        state.portals = Some(PortalPair {
            a: IVec2::new(30, 1),
            b: IVec2::new(2, 28),
        });

        state.resize(Grid::new(20, 15));

        assert_eq!(
            state.snakes[0].body,
            VecDeque::from([IVec2::new(15, 10), IVec2::new(14, 10)])
        );
        assert_eq!(state.foods[0].pos, IVec2::new(19, 14));
        assert_eq!(state.power_ups[0].pos, IVec2::new(2, 3));
        assert_eq!(
            state.portals,
            Some(PortalPair {
                a: IVec2::new(10, 1),
                b: IVec2::new(2, 13),
            })
        );
    }

    #[test]
    fn test_determinism() {
        let a = GameState::new(Variant::Competitive, Grid::default(), 99999);
        let b = GameState::new(Variant::Competitive, Grid::default(), 99999);
        assert_eq!(a.snakes, b.snakes);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(Variant::Classic, Grid::default(), 11);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.snakes, state.snakes);
        assert_eq!(back.foods, state.foods);
        assert_eq!(back.grid, state.grid);
    }
}
