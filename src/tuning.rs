//! Data-driven game balance
//!
//! Each variant is described by a [`Rules`] record; the simulation never
//! branches on [`Variant`] directly.

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_TICK_MS, MIN_TICK_MS};
use crate::sim::state::{Direction, FoodTier, SnakeId};

/// Which of the three games is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Variant {
    #[default]
    Classic,
    Competitive,
    Portal,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Classic, Variant::Competitive, Variant::Portal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Competitive => "competitive",
            Variant::Portal => "portal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "competitive" | "versus" | "power-up" => Some(Variant::Competitive),
            "portal" => Some(Variant::Portal),
            _ => None,
        }
    }

    pub fn rules(&self) -> Rules {
        match self {
            Variant::Classic => Rules::classic(),
            Variant::Competitive => Rules::competitive(),
            Variant::Portal => Rules::portal(),
        }
    }
}

/// Score and growth granted by one food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub score: u32,
    pub growth: u32,
}

impl Reward {
    pub const fn new(score: u32, growth: u32) -> Self {
        Self { score, growth }
    }
}

/// Reward per food tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    pub ordinary: Reward,
    pub bronze: Reward,
    pub golden: Reward,
    pub diamond: Reward,
    pub sapphire: Reward,
}

impl RewardTable {
    pub fn get(&self, tier: FoodTier) -> Reward {
        match tier {
            FoodTier::Ordinary => self.ordinary,
            FoodTier::Bronze => self.bronze,
            FoodTier::Golden => self.golden,
            FoodTier::Diamond => self.diamond,
            FoodTier::Sapphire => self.sapphire,
        }
    }
}

/// How ordinary food enters the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrdinarySpawn {
    /// Exactly one item, replaced as soon as it is eaten
    Refill,
    /// Periodic probabilistic attempts, one timer per lane
    Timed {
        cooldown_ms: u64,
        chance: f64,
        per_lane_cap: usize,
    },
}

/// When the singleton rare tiers get a chance to appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RareTrigger {
    Never,
    /// After every ordinary food pickup
    OnOrdinaryPickup,
    /// On every simulation tick
    EveryTick,
}

/// Tick interval as a function of score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedCurve {
    pub base_ms: u32,
    pub floor_ms: u32,
    /// Interval reduction per step (0 = constant speed)
    pub step_ms: u32,
    /// Score needed per step
    pub points_per_step: u32,
}

impl SpeedCurve {
    pub const fn constant(ms: u32) -> Self {
        Self {
            base_ms: ms,
            floor_ms: ms,
            step_ms: 0,
            points_per_step: 1,
        }
    }

    pub fn interval_ms(&self, score: u32) -> u32 {
        let steps = score / self.points_per_step.max(1);
        self.base_ms
            .saturating_sub(steps.saturating_mul(self.step_ms))
            .max(self.floor_ms)
    }
}

/// Starting placement for one snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartCell {
    Fixed(i32, i32),
    Random,
}

/// Starting configuration for one snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeStart {
    pub id: SnakeId,
    pub cell: StartCell,
    pub heading: Direction,
}

/// Complete rule set for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub variant: Variant,
    pub snakes: Vec<SnakeStart>,
    /// Ordinary food lanes; `None` means any snake may eat it
    pub lanes: Vec<Option<SnakeId>>,
    pub ordinary: OrdinarySpawn,
    pub max_total_food: usize,
    pub rare_trigger: RareTrigger,
    /// Spawn chance per rare tier, rolled in this order
    pub rare_chances: Vec<(FoodTier, f64)>,
    pub rewards: RewardTable,
    pub power_up_interval_ms: Option<u64>,
    pub portal_interval_ms: Option<u64>,
    pub speed: SpeedCurve,
    /// A direction key while not running starts a fresh round
    pub direction_starts: bool,
}

impl Rules {
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            snakes: vec![SnakeStart {
                id: SnakeId::Green,
                cell: StartCell::Fixed(10, 10),
                heading: Direction::Right,
            }],
            lanes: vec![None],
            ordinary: OrdinarySpawn::Refill,
            max_total_food: 1,
            rare_trigger: RareTrigger::Never,
            rare_chances: Vec::new(),
            rewards: RewardTable {
                ordinary: Reward::new(10, 1),
                bronze: Reward::new(0, 0),
                golden: Reward::new(0, 0),
                diamond: Reward::new(0, 0),
                sapphire: Reward::new(0, 0),
            },
            power_up_interval_ms: None,
            portal_interval_ms: None,
            speed: SpeedCurve {
                base_ms: BASE_TICK_MS,
                floor_ms: MIN_TICK_MS,
                step_ms: 5,
                points_per_step: 10,
            },
            direction_starts: false,
        }
    }

    pub fn competitive() -> Self {
        Self {
            variant: Variant::Competitive,
            snakes: vec![
                SnakeStart {
                    id: SnakeId::Green,
                    cell: StartCell::Random,
                    heading: Direction::Right,
                },
                SnakeStart {
                    id: SnakeId::Red,
                    cell: StartCell::Random,
                    heading: Direction::Left,
                },
            ],
            lanes: vec![Some(SnakeId::Green), Some(SnakeId::Red)],
            ordinary: OrdinarySpawn::Timed {
                cooldown_ms: 1100,
                chance: 0.25,
                per_lane_cap: 5,
            },
            max_total_food: 25,
            rare_trigger: RareTrigger::OnOrdinaryPickup,
            rare_chances: vec![
                (FoodTier::Golden, 0.25),
                (FoodTier::Diamond, 0.10),
                (FoodTier::Sapphire, 0.01),
                (FoodTier::Bronze, 0.50),
            ],
            // Rounds are scored by wins; food only grows the snake
            rewards: RewardTable {
                ordinary: Reward::new(0, 1),
                bronze: Reward::new(0, 3),
                golden: Reward::new(0, 5),
                diamond: Reward::new(0, 10),
                sapphire: Reward::new(0, 25),
            },
            power_up_interval_ms: Some(8000),
            portal_interval_ms: None,
            speed: SpeedCurve::constant(BASE_TICK_MS),
            direction_starts: true,
        }
    }

    pub fn portal() -> Self {
        Self {
            variant: Variant::Portal,
            snakes: vec![SnakeStart {
                id: SnakeId::Green,
                cell: StartCell::Random,
                heading: Direction::Right,
            }],
            lanes: vec![None],
            ordinary: OrdinarySpawn::Timed {
                cooldown_ms: 600,
                chance: 0.5,
                per_lane_cap: 30,
            },
            max_total_food: 30,
            rare_trigger: RareTrigger::EveryTick,
            rare_chances: vec![
                (FoodTier::Golden, 0.20),
                (FoodTier::Diamond, 0.08),
                (FoodTier::Sapphire, 0.01),
                (FoodTier::Bronze, 0.40),
            ],
            rewards: RewardTable {
                ordinary: Reward::new(10, 1),
                bronze: Reward::new(30, 3),
                golden: Reward::new(50, 5),
                diamond: Reward::new(100, 10),
                sapphire: Reward::new(250, 25),
            },
            power_up_interval_ms: None,
            portal_interval_ms: Some(10_000),
            speed: SpeedCurve::constant(BASE_TICK_MS),
            direction_starts: true,
        }
    }

    pub fn is_multiplayer(&self) -> bool {
        self.snakes.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_speed_curve() {
        let speed = Rules::classic().speed;
        assert_eq!(speed.interval_ms(0), 150);
        assert_eq!(speed.interval_ms(9), 150);
        assert_eq!(speed.interval_ms(10), 145);
        assert_eq!(speed.interval_ms(100), 100);
        // Floor
        assert_eq!(speed.interval_ms(10_000), 50);
    }

    #[test]
    fn test_constant_speed() {
        let speed = Rules::portal().speed;
        assert_eq!(speed.interval_ms(0), 150);
        assert_eq!(speed.interval_ms(5000), 150);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("Classic"), Some(Variant::Classic));
        assert_eq!(Variant::from_str("versus"), Some(Variant::Competitive));
        assert_eq!(Variant::from_str("PORTAL"), Some(Variant::Portal));
        assert_eq!(Variant::from_str("tetris"), None);
    }

    #[test]
    fn test_rules_match_variant() {
        for variant in Variant::ALL {
            assert_eq!(variant.rules().variant, variant);
        }
        assert!(Rules::competitive().is_multiplayer());
        assert!(!Rules::portal().is_multiplayer());
    }

    #[test]
    fn test_reward_table_lookup() {
        let rewards = Rules::portal().rewards;
        assert_eq!(rewards.get(FoodTier::Sapphire), Reward::new(250, 25));
        assert_eq!(rewards.get(FoodTier::Ordinary), Reward::new(10, 1));
    }
}
