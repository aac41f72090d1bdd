//! Game session: the aggregate the scheduler owns
//!
//! Wraps the simulation state with the start/pause/reset state machine and
//! the score book. The simulation itself never touches storage; scores are
//! written here, on game over and on an explicit clear.

use crate::persistence::KeyValueStore;
use crate::platform::InputAction;
use crate::scores::{ScoreBook, ScoreUpdate};
use crate::sim::{
    Direction, GameEvent, GamePhase, GameState, Grid, SnakeId, TickInput, autopilot_input, tick,
    tick_interval_ms,
};
use crate::tuning::Variant;

pub struct Session<S: KeyValueStore> {
    state: GameState,
    scores: ScoreBook,
    store: S,
    /// Bookkeeping from the most recent game over
    last_update: Option<ScoreUpdate>,
    /// Demo mode: the autopilot steers every snake
    demo: bool,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(variant: Variant, grid: Grid, seed: u64, store: S) -> Self {
        let scores = ScoreBook::load(&store);
        log::info!(
            "New {} session on {}x{} grid (seed {})",
            variant.as_str(),
            grid.cols,
            grid.rows,
            seed
        );
        Self {
            state: GameState::new(variant, grid, seed),
            scores,
            store,
            last_update: None,
            demo: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scores(&self) -> &ScoreBook {
        &self.scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn last_update(&self) -> Option<&ScoreUpdate> {
        self.last_update.as_ref()
    }

    pub fn variant(&self) -> Variant {
        self.state.rules.variant
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    pub fn demo(&self) -> bool {
        self.demo
    }

    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
        log::info!("Demo mode: {}", demo);
    }

    pub fn high_score(&self) -> u32 {
        self.scores.high_score(self.variant())
    }

    /// Apply a player action. Returns true when the game just entered
    /// `Running` and the scheduler has to be armed.
    pub fn handle(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Steer(id, direction) => self.steer(id, direction),
            InputAction::Start => self.start(),
            InputAction::Restart => self.restart(),
            InputAction::Pause => self.toggle_pause(),
            InputAction::Reset { clear_scores } => {
                self.reset(clear_scores);
                false
            }
        }
    }

    /// Idle -> Running. A finished round is reset first.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => false,
            GamePhase::GameOver => {
                self.reset(false);
                self.begin()
            }
            GamePhase::Idle => self.begin(),
        }
    }

    pub fn restart(&mut self) -> bool {
        self.reset(false);
        self.begin()
    }

    fn begin(&mut self) -> bool {
        self.state.phase = GamePhase::Running;
        self.last_update = None;
        log::info!("{} round started", self.variant().as_str());
        true
    }

    /// Running <-> Paused; other phases ignore it
    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Running => {
                self.state.phase = GamePhase::Paused;
                log::info!("Paused");
                false
            }
            GamePhase::Paused => {
                self.state.phase = GamePhase::Running;
                log::info!("Resumed");
                true
            }
            _ => false,
        }
    }

    /// Back to Idle. Persisted scores survive unless `clear_scores` is set.
    pub fn reset(&mut self, clear_scores: bool) {
        self.state.reset();
        if clear_scores {
            let keys = self.scores.clear(self.variant());
            self.scores.save(&mut self.store, &keys);
            log::info!("Scores cleared for {} mode", self.variant().as_str());
        }
    }

    /// Queue a turn. In variants where a direction key starts play, a key
    /// pressed while idle or after game over begins a fresh round first.
    pub fn steer(&mut self, id: SnakeId, direction: Direction) -> bool {
        let mut armed = false;
        if matches!(self.state.phase, GamePhase::Idle | GamePhase::GameOver) {
            if !self.state.rules.direction_starts {
                return false;
            }
            armed = self.restart();
        }
        self.state.steer(id, direction);
        armed
    }

    /// One scheduled tick. Game over is recorded and persisted here.
    pub fn step(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let input = if self.demo {
            autopilot_input(&self.state)
        } else {
            TickInput::default()
        };
        let events = tick(&mut self.state, &input, now_ms);
        for event in &events {
            if let GameEvent::GameOver(outcome) = *event {
                let update = self.scores.record(self.variant(), outcome);
                self.scores.save(&mut self.store, &update.touched);
                if update.new_high {
                    log::info!("New {} high score: {}", self.variant().as_str(), self.high_score());
                }
                self.last_update = Some(update);
            }
        }
        events
    }

    pub fn tick_interval_ms(&self) -> u32 {
        tick_interval_ms(&self.state)
    }

    /// Refit the grid to a new drawing surface, keeping every entity
    pub fn resize_viewport(&mut self, width_px: u32, height_px: u32, cell_px: u32) -> Grid {
        let grid = Grid::fit_viewport(width_px, height_px, cell_px);
        self.state.resize(grid);
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::sim::{Food, FoodTier, GameOutcome};
    use crate::tuning::OrdinarySpawn;
    use glam::IVec2;
    use std::collections::VecDeque;

    fn session(variant: Variant) -> Session<MemoryStore> {
        Session::new(variant, Grid::new(40, 30), 7, MemoryStore::new())
    }

    /// Curl the classic snake so the next upward move bites its own body
    fn arrange_self_collision(session: &mut Session<MemoryStore>, score: u32) {
        let snake = &mut session.state.snakes[0];
        snake.body = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 4),
            IVec2::new(5, 4),
            IVec2::new(4, 4),
        ]);
        snake.direction = Direction::Left;
        snake.next_direction = Direction::Up;
        snake.score = score;
    }

    #[test]
    fn test_phase_machine() {
        let mut s = session(Variant::Classic);
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(s.handle(InputAction::Start));
        assert!(s.is_running());
        // Start while running does nothing
        assert!(!s.handle(InputAction::Start));

        assert!(!s.handle(InputAction::Pause));
        assert_eq!(s.phase(), GamePhase::Paused);
        assert!(s.handle(InputAction::Pause));
        assert_eq!(s.phase(), GamePhase::Running);

        s.handle(InputAction::Reset { clear_scores: false });
        assert_eq!(s.phase(), GamePhase::Idle);
        // Pause is meaningless while idle
        assert!(!s.handle(InputAction::Pause));
        assert_eq!(s.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_paused_step_is_noop() {
        let mut s = session(Variant::Classic);
        s.start();
        s.toggle_pause();
        let head = s.state().snakes[0].head();
        assert!(s.step(0).is_empty());
        assert_eq!(s.state().snakes[0].head(), head);
    }

    #[test]
    fn test_game_over_persists_high_score() {
        let mut s = session(Variant::Classic);
        s.start();
        arrange_self_collision(&mut s, 70);

        let events = s.step(0);
        assert!(events.contains(&GameEvent::GameOver(GameOutcome::Crashed { score: 70 })));
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.high_score(), 70);
        assert_eq!(s.store().get("classic-high").as_deref(), Some("70"));
        assert!(s.last_update().is_some_and(|u| u.new_high));

        // A worse round leaves the stored high score alone
        s.start();
        arrange_self_collision(&mut s, 20);
        s.step(0);
        assert_eq!(s.high_score(), 70);
        assert_eq!(s.store().get("classic-high").as_deref(), Some("70"));
    }

    #[test]
    fn test_start_after_game_over_resets() {
        let mut s = session(Variant::Classic);
        s.start();
        arrange_self_collision(&mut s, 10);
        s.step(0);
        assert_eq!(s.phase(), GamePhase::GameOver);

        assert!(s.start());
        assert!(s.is_running());
        assert_eq!(s.state().snakes[0].len(), 1);
        assert_eq!(s.state().snakes[0].score, 0);
        assert!(s.state().outcome.is_none());
    }

    #[test]
    fn test_reset_clear_scores() {
        let mut store = MemoryStore::new();
        store.set("portal-high", "500");
        store.set("portal-score", "120");
        store.set("classic-high", "90");
        let mut s = Session::new(Variant::Portal, Grid::default(), 1, store);
        assert_eq!(s.high_score(), 500);

        s.handle(InputAction::Reset { clear_scores: false });
        assert_eq!(s.high_score(), 500);

        s.handle(InputAction::Reset { clear_scores: true });
        assert_eq!(s.high_score(), 0);
        assert_eq!(s.store().get("portal-high").as_deref(), Some("0"));
        assert_eq!(s.store().get("portal-score").as_deref(), Some("0"));
        // Other variants keep theirs
        assert_eq!(s.store().get("classic-high").as_deref(), Some("90"));
    }

    #[test]
    fn test_direction_starts_competitive() {
        let mut s = session(Variant::Competitive);
        assert!(s.handle(InputAction::Steer(SnakeId::Red, Direction::Up)));
        assert!(s.is_running());
        assert_eq!(s.state().snakes[1].next_direction, Direction::Up);
        // Further keys do not re-arm the scheduler
        assert!(!s.handle(InputAction::Steer(SnakeId::Green, Direction::Down)));
    }

    #[test]
    fn test_direction_ignored_when_idle_in_classic() {
        let mut s = session(Variant::Classic);
        assert!(!s.handle(InputAction::Steer(SnakeId::Green, Direction::Up)));
        assert_eq!(s.phase(), GamePhase::Idle);
        assert_eq!(s.state().snakes[0].next_direction, Direction::Right);
    }

    #[test]
    fn test_competitive_win_recorded() {
        let mut s = session(Variant::Competitive);
        s.start();
        // Clear the board so random spawns cannot interfere
        s.state.power_ups.clear();
        s.state.foods.clear();
        s.state.rules.power_up_interval_ms = None;
        s.state.snakes[0].body = VecDeque::from([IVec2::new(9, 10)]);
        s.state.snakes[0].direction = Direction::Right;
        s.state.snakes[0].next_direction = Direction::Right;
        s.state.snakes[1].body = VecDeque::from([IVec2::new(10, 9), IVec2::new(10, 10)]);
        s.state.snakes[1].direction = Direction::Up;
        s.state.snakes[1].next_direction = Direction::Up;

        s.step(0);

        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.scores().wins(SnakeId::Red), 1);
        assert_eq!(s.store().get("competitive-red-wins").as_deref(), Some("1"));
        assert_eq!(s.high_score(), 1);

        // Wins survive a normal restart
        s.restart();
        assert_eq!(s.scores().wins(SnakeId::Red), 1);
    }

    #[test]
    fn test_portal_scores_recorded() {
        let mut s = session(Variant::Portal);
        s.start();
        s.state.rules.portal_interval_ms = None;
        s.state.rules.rare_chances.clear();
        s.state.rules.ordinary = OrdinarySpawn::Timed {
            cooldown_ms: 600,
            chance: 0.0,
            per_lane_cap: 30,
        };
        s.state.foods = vec![Food {
            pos: IVec2::new(6, 5),
            tier: FoodTier::Golden,
            lane: None,
        }];
        let snake = &mut s.state.snakes[0];
        snake.body = VecDeque::from([IVec2::new(5, 5)]);
        snake.direction = Direction::Right;
        snake.next_direction = Direction::Right;
        s.step(0);
        assert_eq!(s.state().snakes[0].score, 50);

        // Drive the snake into itself: it is 2 long with 4 growth pending
        s.steer(SnakeId::Green, Direction::Down);
        s.step(1);
        s.steer(SnakeId::Green, Direction::Left);
        s.step(2);
        s.steer(SnakeId::Green, Direction::Up);
        s.step(3);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.store().get("portal-score").as_deref(), Some("50"));
        assert_eq!(s.store().get("portal-high").as_deref(), Some("50"));
    }

    #[test]
    fn test_resize_keeps_snake_on_board() {
        let mut s = session(Variant::Classic);
        let grid = s.resize_viewport(324, 400, 20);
        assert_eq!(grid, Grid::new(15, 12));
        let head = s.state().snakes[0].head();
        assert_eq!(head, IVec2::new(10, 10));
        assert!(s.state().foods.iter().all(|f| grid.contains(f.pos)));
    }

    #[test]
    fn test_demo_mode_steers() {
        let mut s = session(Variant::Classic);
        s.state.foods = vec![Food {
            pos: IVec2::new(10, 20),
            tier: FoodTier::Ordinary,
            lane: None,
        }];
        s.set_demo(true);
        s.start();
        s.step(0);
        assert_eq!(s.state().snakes[0].direction, Direction::Down);
        assert_eq!(s.state().snakes[0].head(), IVec2::new(10, 11));
    }

    #[test]
    fn test_tick_interval_tracks_score() {
        let mut s = session(Variant::Classic);
        assert_eq!(s.tick_interval_ms(), 150);
        s.state.snakes[0].score = 50;
        assert_eq!(s.tick_interval_ms(), 125);
    }
}
