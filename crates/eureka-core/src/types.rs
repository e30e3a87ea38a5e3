//! Fundamental geometric types and angle helpers.
//!
//! The arena uses compass conventions: `x` grows East, `y` grows North,
//! headings are radians measured clockwise from North.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Simulation tick (turn number within a round).
pub type Tick = u64;

/// A point (or displacement) on the arena floor.
pub type Point = DVec2;

/// Absolute bearing in radians from `from` to `to` (0 = North, clockwise).
pub fn bearing(from: Point, to: Point) -> f64 {
    (to.x - from.x).atan2(to.y - from.y)
}

/// Euclidean distance between two points.
pub fn range(from: Point, to: Point) -> f64 {
    from.distance(to)
}

/// Point reached by travelling `distance` along compass `heading` from `origin`.
pub fn project(origin: Point, heading: f64, distance: f64) -> Point {
    origin + DVec2::new(heading.sin(), heading.cos()) * distance
}

/// Normalize an angle to `(-PI, PI]`.
pub fn normal_relative_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Normalize an angle given in degrees to `(-180, 180]`.
pub fn normal_relative_degrees(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Rectangular arena dimensions together with the robot footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    /// Battlefield width and height.
    pub size: DVec2,
    /// Robot width and height.
    pub robot: DVec2,
}

impl Arena {
    pub fn new(size: DVec2, robot: DVec2) -> Self {
        Self { size, robot }
    }

    /// Half of the robot footprint.
    pub fn half_robot(&self) -> DVec2 {
        self.robot * 0.5
    }

    /// Whether `p` lies closer than `margin` to any edge.
    pub fn near_border(&self, p: Point, margin: DVec2) -> bool {
        p.x < margin.x || p.x > self.size.x - margin.x || p.y < margin.y || p.y > self.size.y - margin.y
    }

    /// Clamp `p` so a robot centred on it stays inside the walls.
    pub fn clamp(&self, p: Point) -> Point {
        let half = self.half_robot();
        p.clamp(half, self.size - half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bearing_follows_compass() {
        let origin = Point::new(100.0, 100.0);
        assert_abs_diff_eq!(bearing(origin, Point::new(100.0, 200.0)), 0.0);
        assert_abs_diff_eq!(bearing(origin, Point::new(200.0, 100.0)), PI / 2.0);
        assert_abs_diff_eq!(bearing(origin, Point::new(0.0, 100.0)), -PI / 2.0);
    }

    #[test]
    fn project_inverts_bearing() {
        let origin = Point::new(50.0, 80.0);
        let p = project(origin, 1.1, 40.0);
        assert_abs_diff_eq!(bearing(origin, p), 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(range(origin, p), 40.0, epsilon = 1e-12);
    }

    #[test]
    fn relative_angle_is_shortest_turn() {
        assert_abs_diff_eq!(normal_relative_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normal_relative_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normal_relative_angle(PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normal_relative_degrees(270.0), -90.0);
    }

    #[test]
    fn arena_border_and_clamp() {
        let arena = Arena::new(DVec2::new(800.0, 600.0), DVec2::new(36.0, 36.0));
        let margin = arena.half_robot() * 3.0;
        assert!(arena.near_border(Point::new(10.0, 300.0), margin));
        assert!(arena.near_border(Point::new(400.0, 590.0), margin));
        assert!(!arena.near_border(Point::new(400.0, 300.0), margin));

        let clamped = arena.clamp(Point::new(-50.0, 900.0));
        assert_eq!(clamped, Point::new(18.0, 582.0));
    }
}
