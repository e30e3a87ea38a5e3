//! Danger field over candidate destinations.
//!
//! Lower is safer. Forbidden points (too close to a wall, or on the straight
//! line along our heading that an opponent can extrapolate) score infinity.

use glam::DVec2;

use eureka_core::types::{bearing, normal_relative_angle, range, Arena, Point};

use crate::config::LegConfig;
use crate::tracker::Opponent;

/// Everything the field depends on besides the candidate point.
#[derive(Debug, Clone, Copy)]
pub struct DangerField {
    pub arena: Arena,
    /// Our position.
    pub origin: Point,
    /// Our body heading (radians).
    pub heading: f64,
    /// Previous destination, penalised to avoid clustering.
    pub last_destination: Option<Point>,
    pub border: f64,
    pub linear_cone: f64,
    pub revisit_penalty: f64,
}

impl DangerField {
    pub fn new(arena: Arena, origin: Point, heading: f64, last_destination: Option<Point>, config: &LegConfig) -> Self {
        Self {
            arena,
            origin,
            heading,
            last_destination,
            border: config.border,
            linear_cone: config.linear_cone,
            revisit_penalty: config.revisit_penalty,
        }
    }

    fn margin(&self) -> DVec2 {
        self.arena.half_robot() * self.border
    }

    /// Whether `p` lies on the axis of our heading (either direction).
    pub fn on_linear_axis(&self, p: Point) -> bool {
        let relative = normal_relative_angle(bearing(self.origin, p) - self.heading).abs();
        relative < self.linear_cone || relative > std::f64::consts::PI - self.linear_cone
    }

    /// Score of `p` against the given opponents.
    pub fn evaluate(&self, p: Point, opponents: &[&Opponent]) -> f64 {
        if self.arena.near_border(p, self.margin()) || self.on_linear_axis(p) {
            return f64::INFINITY;
        }

        let revisit = match self.last_destination {
            Some(last) => self.revisit_penalty / p.distance_squared(last),
            None => self.revisit_penalty,
        };

        let own_bearing = bearing(self.origin, p);
        let threat: f64 = opponents
            .iter()
            .map(|opponent| {
                let position = opponent.last_contact().position;
                let alignment = 1.0 + (own_bearing - bearing(position, p)).cos().abs();
                opponent.danger() * alignment / range(position, p)
            })
            .sum();

        revisit + threat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Contact;

    fn field(last: Option<Point>) -> DangerField {
        let config = crate::config::BrainConfig::default().leg;
        let arena = Arena::new(DVec2::new(800.0, 600.0), DVec2::new(36.0, 36.0));
        DangerField::new(arena, Point::new(400.0, 300.0), 0.0, last, &config)
    }

    fn opponent(x: f64, y: f64, energy: f64) -> Opponent {
        Opponent::new(
            "Target",
            Contact {
                position: Point::new(x, y),
                tick: 1,
                heading: 0.0,
                velocity: 0.0,
                bearing: 0.0,
                energy,
                distance: 0.0,
            },
        )
    }

    #[test]
    fn test_out_of_bounds_is_infinite() {
        let f = field(None);
        for p in [
            Point::new(-10.0, 300.0),
            Point::new(20.0, 250.0),
            Point::new(790.0, 250.0),
            Point::new(600.0, 640.0),
        ] {
            assert_eq!(f.evaluate(p, &[]), f64::INFINITY, "{p:?}");
        }
    }

    #[test]
    fn test_heading_axis_is_infinite() {
        let f = field(None);
        // Straight ahead and straight behind while facing north.
        assert_eq!(f.evaluate(Point::new(405.0, 450.0), &[]), f64::INFINITY);
        assert_eq!(f.evaluate(Point::new(395.0, 150.0), &[]), f64::INFINITY);
        assert!(f.evaluate(Point::new(550.0, 300.0), &[]).is_finite());
    }

    #[test]
    fn test_adding_opponent_increases_danger() {
        let f = field(Some(Point::new(300.0, 300.0)));
        let p = Point::new(550.0, 350.0);
        let first = opponent(600.0, 450.0, 100.0);
        let second = opponent(450.0, 200.0, 40.0);

        let none = f.evaluate(p, &[]);
        let one = f.evaluate(p, &[&first]);
        let two = f.evaluate(p, &[&first, &second]);
        assert!(one > none);
        assert!(two > one);
    }

    #[test]
    fn test_revisit_penalty_favours_distance() {
        let f = field(Some(Point::new(550.0, 350.0)));
        let near = f.evaluate(Point::new(560.0, 360.0), &[]);
        let far = f.evaluate(Point::new(250.0, 380.0), &[]);
        assert!(near > far);
    }
}
