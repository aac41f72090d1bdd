//! Outline generation for the 2D primitives drawn on the board

use glam::Vec2;
use std::f32::consts::PI;

/// Segments used to approximate circles and rings
pub const CIRCLE_SEGMENTS: u32 = 24;

/// Shape of a single draw command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Snake segment: square inset by one pixel on each side
    Block,
    Circle,
    /// Five-point star (golden food)
    Star5,
    /// Rhombus (diamond food)
    Diamond,
    /// Elongated hexagonal gem (sapphire food)
    Gem,
    /// Flat-sided hexagon (bronze food)
    Hexagon,
    Pentagon,
    Square,
    Triangle,
    /// Portal endpoint
    Ring,
}

impl Shape {
    /// Circles and rings are painted as arcs rather than paths
    pub fn is_round(&self) -> bool {
        matches!(self, Shape::Circle | Shape::Ring)
    }
}

/// Closed outline of `shape` centred on `center`. `radius` is the
/// circumradius, or the half-side for square shapes.
pub fn polygon(shape: Shape, center: Vec2, radius: f32) -> Vec<Vec2> {
    match shape {
        Shape::Block | Shape::Square => vec![
            center + Vec2::new(-radius, -radius),
            center + Vec2::new(radius, -radius),
            center + Vec2::new(radius, radius),
            center + Vec2::new(-radius, radius),
        ],
        Shape::Circle | Shape::Ring => regular(center, radius, CIRCLE_SEGMENTS, 0.0),
        Shape::Star5 => star(center, radius, radius * 0.45, 5),
        Shape::Diamond => vec![
            center + Vec2::new(0.0, -radius),
            center + Vec2::new(radius, 0.0),
            center + Vec2::new(0.0, radius),
            center + Vec2::new(-radius, 0.0),
        ],
        Shape::Gem => [
            (0.0, -1.0),
            (0.6, -0.2),
            (0.6, 0.4),
            (0.0, 1.0),
            (-0.6, 0.4),
            (-0.6, -0.2),
        ]
        .iter()
        .map(|&(x, y)| center + Vec2::new(x, y) * radius)
        .collect(),
        Shape::Hexagon => regular(center, radius, 6, 0.0),
        // Point up
        Shape::Pentagon => regular(center, radius, 5, -PI / 2.0),
        Shape::Triangle => vec![
            center + Vec2::new(0.0, -radius),
            center + Vec2::new(radius, radius * 0.75),
            center + Vec2::new(-radius, radius * 0.75),
        ],
    }
}

/// Regular polygon with `sides` vertices, the first at angle `start`
fn regular(center: Vec2, radius: f32, sides: u32, start: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let theta = start + (i as f32 / sides as f32) * 2.0 * PI;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Star alternating between outer and inner radius, first point straight up
fn star(center: Vec2, outer: f32, inner: f32, points: u32) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let theta = -PI / 2.0 + (PI * i as f32) / points as f32;
            center + Vec2::new(theta.cos(), theta.sin()) * r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_vertex_counts() {
        let c = Vec2::new(10.0, 10.0);
        assert_eq!(polygon(Shape::Block, c, 9.0).len(), 4);
        assert_eq!(polygon(Shape::Diamond, c, 8.0).len(), 4);
        assert_eq!(polygon(Shape::Triangle, c, 8.0).len(), 3);
        assert_eq!(polygon(Shape::Pentagon, c, 8.0).len(), 5);
        assert_eq!(polygon(Shape::Hexagon, c, 8.0).len(), 6);
        assert_eq!(polygon(Shape::Gem, c, 8.0).len(), 6);
        assert_eq!(polygon(Shape::Star5, c, 8.0).len(), 10);
        assert_eq!(polygon(Shape::Circle, c, 8.0).len(), CIRCLE_SEGMENTS as usize);
    }

    #[test]
    fn test_regular_vertices_on_circumcircle() {
        let c = Vec2::new(30.0, 50.0);
        for shape in [Shape::Hexagon, Shape::Pentagon, Shape::Circle] {
            for v in polygon(shape, c, 8.0) {
                assert!((v.distance(c) - 8.0).abs() < EPS, "{:?}", shape);
            }
        }
    }

    #[test]
    fn test_star_alternates_radii() {
        let c = Vec2::ZERO;
        let points = polygon(Shape::Star5, c, 10.0);
        // First tip points up (negative y on the canvas)
        assert!((points[0] - Vec2::new(0.0, -10.0)).length() < EPS);
        for (i, p) in points.iter().enumerate() {
            let expected = if i % 2 == 0 { 10.0 } else { 4.5 };
            assert!((p.length() - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_pentagon_points_up() {
        let points = polygon(Shape::Pentagon, Vec2::ZERO, 5.0);
        assert!((points[0] - Vec2::new(0.0, -5.0)).length() < EPS);
    }

    #[test]
    fn test_block_bounds() {
        let points = polygon(Shape::Block, Vec2::new(10.0, 10.0), 9.0);
        assert_eq!(points[0], Vec2::new(1.0, 1.0));
        assert_eq!(points[2], Vec2::new(19.0, 19.0));
    }
}
