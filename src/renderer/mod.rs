//! Scene construction for the 2D canvas
//!
//! `build_scene` turns a [`GameState`] into a flat list of draw commands in
//! pixel space. Painting them is left to the platform (the wasm binary uses
//! `CanvasRenderingContext2d`), so everything here is testable natively.

pub mod shapes;

use glam::Vec2;

pub use shapes::{Shape, polygon};

use crate::sim::{Food, FoodTier, GameState, Position, PowerUpKind, SnakeId};
use crate::tuning::Variant;

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const GRID_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.05];

    pub const GREEN_HEAD: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const GREEN_BODY: [f32; 4] = [0.0, 0.8, 0.0, 1.0];
    pub const RED_HEAD: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
    pub const RED_BODY: [f32; 4] = [0.8, 0.0, 0.0, 1.0];

    /// Single food of the classic board
    pub const CLASSIC_FOOD: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const GOLDEN: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const DIAMOND: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const SAPPHIRE: [f32; 4] = [0.65, 0.42, 1.0, 1.0];
    pub const BRONZE: [f32; 4] = [0.8, 0.5, 0.2, 1.0];

    pub const INVINCIBILITY: [f32; 4] = [1.0, 0.55, 0.0, 1.0];
    pub const MAGNET: [f32; 4] = [1.0, 0.08, 0.58, 1.0];
    pub const GHOST: [f32; 4] = [0.5, 1.0, 0.0, 1.0];

    pub const PORTAL_A: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const PORTAL_B: [f32; 4] = [0.8, 0.0, 1.0, 1.0];
}

/// One filled shape in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmd {
    pub shape: Shape,
    pub center: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
    /// Shadow blur in pixels (0 = none)
    pub glow: f32,
}

impl DrawCmd {
    pub fn outline(&self) -> Vec<Vec2> {
        polygon(self.shape, self.center, self.radius)
    }
}

/// Faint cell lines drawn over the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOverlay {
    pub cols: i32,
    pub rows: i32,
    pub cell_px: f32,
    pub color: [f32; 4],
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: [f32; 4],
    pub commands: Vec<DrawCmd>,
    pub grid: Option<GridOverlay>,
}

/// Build the frame for `state`. Draw order: snakes, food, power-ups,
/// portals, then the grid overlay.
pub fn build_scene(state: &GameState, cell_px: u32, show_grid: bool) -> Scene {
    let cell = cell_px as f32;
    let (width, height) = state.grid.pixel_size(cell_px);
    let mut commands = Vec::new();

    // Item radius leaves a 2px margin inside the cell
    let item_r = (cell / 2.0 - 2.0).max(1.0);

    for snake in &state.snakes {
        let (head_color, body_color) = snake_colors(snake.id);
        for (i, &segment) in snake.body.iter().enumerate() {
            let head = i == 0;
            commands.push(DrawCmd {
                shape: Shape::Block,
                center: cell_center(segment, cell),
                radius: (cell / 2.0 - 1.0).max(0.5),
                color: if head { head_color } else { body_color },
                glow: if head { 10.0 } else { 5.0 },
            });
        }
    }

    for food in &state.foods {
        let (shape, color, glow) = food_style(state.rules.variant, food);
        let radius = if food.tier == FoodTier::Diamond {
            cell / 2.3
        } else {
            item_r
        };
        commands.push(DrawCmd {
            shape,
            center: cell_center(food.pos, cell),
            radius,
            color,
            glow,
        });
    }

    for power_up in &state.power_ups {
        let (shape, color, radius) = match power_up.kind {
            PowerUpKind::Invincibility => (Shape::Pentagon, colors::INVINCIBILITY, cell / 2.3),
            PowerUpKind::Magnet => (Shape::Square, colors::MAGNET, cell / 2.5),
            PowerUpKind::Ghost => (Shape::Triangle, colors::GHOST, cell / 2.3),
        };
        commands.push(DrawCmd {
            shape,
            center: cell_center(power_up.pos, cell),
            radius,
            color,
            glow: 15.0,
        });
    }

    if let Some(portals) = state.portals {
        for (pos, color) in [(portals.a, colors::PORTAL_A), (portals.b, colors::PORTAL_B)] {
            commands.push(DrawCmd {
                shape: Shape::Ring,
                center: cell_center(pos, cell),
                radius: item_r,
                color,
                glow: 15.0,
            });
        }
    }

    let grid = show_grid.then_some(GridOverlay {
        cols: state.grid.cols,
        rows: state.grid.rows,
        cell_px: cell,
        color: colors::GRID_LINE,
    });

    Scene {
        width: width as f32,
        height: height as f32,
        background: colors::BACKGROUND,
        commands,
        grid,
    }
}

/// Pixel centre of a grid cell
pub fn cell_center(pos: Position, cell: f32) -> Vec2 {
    (pos.as_vec2() + Vec2::splat(0.5)) * cell
}

pub fn snake_colors(id: SnakeId) -> ([f32; 4], [f32; 4]) {
    match id {
        SnakeId::Green => (colors::GREEN_HEAD, colors::GREEN_BODY),
        SnakeId::Red => (colors::RED_HEAD, colors::RED_BODY),
    }
}

fn food_style(variant: Variant, food: &Food) -> (Shape, [f32; 4], f32) {
    match food.tier {
        FoodTier::Ordinary => {
            let color = match (food.lane, variant) {
                (Some(SnakeId::Red), _) => colors::RED_HEAD,
                (Some(SnakeId::Green), _) => colors::GREEN_HEAD,
                (None, Variant::Classic) => colors::CLASSIC_FOOD,
                (None, _) => colors::GREEN_HEAD,
            };
            (Shape::Circle, color, 10.0)
        }
        FoodTier::Golden => (Shape::Star5, colors::GOLDEN, 12.0),
        FoodTier::Diamond => (Shape::Diamond, colors::DIAMOND, 12.0),
        FoodTier::Sapphire => (Shape::Gem, colors::SAPPHIRE, 12.0),
        FoodTier::Bronze => (Shape::Hexagon, colors::BRONZE, 10.0),
    }
}

/// CSS `rgba()` string for a canvas fill or shadow style
pub fn css_color(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Grid, PortalPair, PowerUp};
    use glam::IVec2;
    use std::collections::VecDeque;

    fn classic() -> GameState {
        let mut state = GameState::new(Variant::Classic, Grid::new(40, 30), 5);
        state.snakes[0].body = VecDeque::from([IVec2::new(3, 2), IVec2::new(2, 2)]);
        state.foods = vec![Food {
            pos: IVec2::new(7, 7),
            tier: FoodTier::Ordinary,
            lane: None,
        }];
        state
    }

    #[test]
    fn test_classic_scene() {
        let scene = build_scene(&classic(), 20, true);
        assert_eq!(scene.width, 800.0);
        assert_eq!(scene.height, 600.0);
        assert_eq!(scene.commands.len(), 3);

        let head = scene.commands[0];
        assert_eq!(head.shape, Shape::Block);
        assert_eq!(head.center, Vec2::new(70.0, 50.0));
        assert_eq!(head.color, colors::GREEN_HEAD);
        assert_eq!(scene.commands[1].color, colors::GREEN_BODY);
        assert!(head.glow > scene.commands[1].glow);

        let food = scene.commands[2];
        assert_eq!(food.shape, Shape::Circle);
        assert_eq!(food.color, colors::CLASSIC_FOOD);
        assert_eq!(food.radius, 8.0);
        assert!(scene.grid.is_some());
    }

    #[test]
    fn test_grid_overlay_optional() {
        let scene = build_scene(&classic(), 20, false);
        assert!(scene.grid.is_none());
    }

    #[test]
    fn test_competitive_colors() {
        let mut state = GameState::new(Variant::Competitive, Grid::new(40, 30), 5);
        state.foods = vec![
            Food {
                pos: IVec2::new(1, 1),
                tier: FoodTier::Ordinary,
                lane: Some(SnakeId::Red),
            },
            Food {
                pos: IVec2::new(2, 1),
                tier: FoodTier::Ordinary,
                lane: Some(SnakeId::Green),
            },
        ];
        let scene = build_scene(&state, 20, false);
        // Two single-cell snakes, then the lane food
        assert_eq!(scene.commands[0].color, colors::GREEN_HEAD);
        assert_eq!(scene.commands[1].color, colors::RED_HEAD);
        assert_eq!(scene.commands[2].color, colors::RED_HEAD);
        assert_eq!(scene.commands[3].color, colors::GREEN_HEAD);
    }

    #[test]
    fn test_rare_tiers_and_extras() {
        let mut state = GameState::new(Variant::Portal, Grid::new(40, 30), 5);
        let tiers = [
            (FoodTier::Golden, Shape::Star5),
            (FoodTier::Diamond, Shape::Diamond),
            (FoodTier::Sapphire, Shape::Gem),
            (FoodTier::Bronze, Shape::Hexagon),
        ];
        state.foods = tiers
            .iter()
            .enumerate()
            .map(|(i, &(tier, _))| Food {
                pos: IVec2::new(i as i32 + 5, 5),
                tier,
                lane: None,
            })
            .collect();
        state.power_ups = vec![PowerUp {
            pos: IVec2::new(9, 9),
            kind: PowerUpKind::Magnet,
            spawned_at_ms: 0,
        }];
        state.portals = Some(PortalPair {
            a: IVec2::new(0, 0),
            b: IVec2::new(20, 20),
        });

        let scene = build_scene(&state, 20, false);
        let shapes: Vec<Shape> = scene.commands.iter().map(|c| c.shape).collect();
        assert_eq!(
            shapes,
            vec![
                Shape::Block,
                Shape::Star5,
                Shape::Diamond,
                Shape::Gem,
                Shape::Hexagon,
                Shape::Square,
                Shape::Ring,
                Shape::Ring,
            ]
        );
        let portal_b = scene.commands[7];
        assert_eq!(portal_b.center, Vec2::new(410.0, 410.0));
        assert_eq!(portal_b.color, colors::PORTAL_B);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(colors::GREEN_HEAD), "rgba(0, 255, 0, 1)");
        assert_eq!(css_color(colors::GRID_LINE), "rgba(255, 255, 255, 0.05)");
    }
}
