//! Prediction utilities for targeting.
//!
//! Provides linear/circular extrapolation of an opponent's path, the
//! range-dependent fire power and bullet speed, the iterative intercept-time
//! solve and a closed-form deflection angle.

use eureka_core::constants::*;
use eureka_core::types::{bearing, normal_relative_angle, project, range, Point, Tick};

use crate::tracker::{Contact, Opponent};

/// Extrapolate a path to absolute tick `tick` from its two newest contacts.
///
/// Speed is the distance between the contacts divided by the elapsed ticks and
/// the turn rate is the heading delta per tick. Below `CIRCULAR_EPSILON` the
/// path continues straight along the last heading, otherwise along an arc of
/// radius `speed / turn_rate`. Without a previous contact the last position is
/// returned.
pub fn extrapolate(last: &Contact, previous: Option<&Contact>, tick: f64) -> Point {
    let Some(previous) = previous else {
        return last.position;
    };
    let span = last.tick.saturating_sub(previous.tick);
    if span == 0 {
        return last.position;
    }
    let span = span as f64;
    let speed = range(previous.position, last.position) / span;
    let turn_rate = normal_relative_angle(last.heading - previous.heading) / span;
    let dt = tick - last.tick as f64;

    let (x, y) = (last.position.x, last.position.y);
    let h = last.heading;
    if turn_rate.abs() < CIRCULAR_EPSILON {
        return Point::new(x + h.sin() * speed * dt, y + h.cos() * speed * dt);
    }

    let radius = speed / turn_rate;
    let turned = dt * turn_rate;
    Point::new(
        x + radius * h.cos() - radius * (h + turned).cos(),
        y + radius * (h + turned).sin() - radius * h.sin(),
    )
}

/// Fire power for a target at `range`, capped at the host maximum.
pub fn fire_power(range: f64, power_constant: f64) -> f64 {
    (power_constant / range).min(MAX_BULLET_POWER)
}

/// Bullet speed (units per tick) for a given power.
pub fn bullet_speed(power: f64) -> f64 {
    BULLET_BASE_SPEED - BULLET_SPEED_FACTOR * power
}

/// Zeroth-order travel time for a bullet sized for `range`.
pub fn travel_time(range: f64, power_constant: f64) -> f64 {
    range / bullet_speed(fire_power(range, power_constant))
}

/// Result of the intercept solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptSolution {
    /// Ticks from now until the bullet meets the target.
    pub time: f64,
    /// Predicted target position at `time`.
    pub position: Point,
    /// Range from the shooter to `position`.
    pub range: f64,
    /// Power sized for `range`.
    pub power: f64,
    /// Secant iterations performed.
    pub iterations: usize,
}

/// Find the time at which a bullet fired now from `shooter` meets `target`.
///
/// Secant iteration on `f(t) = range(shooter, p(t)) - speed(power(range)) * t`
/// with the initial bracket centred on the travel time to the last contact.
/// A flat residual stops the iteration early with the last iterate.
pub fn solve_intercept(shooter: Point, now: Tick, target: &Opponent, power_constant: f64) -> InterceptSolution {
    let now = now as f64;
    let residual = |t: f64| {
        let d = range(shooter, target.predict_position(now + t));
        d - bullet_speed(fire_power(d, power_constant)) * t
    };

    let estimate = travel_time(range(shooter, target.last_contact().position), power_constant);
    let half = SECANT_BRACKET_TICKS / 2.0;
    let (mut t0, mut t1) = (estimate - half, estimate + half);
    let mut f0 = residual(t0);
    let mut iterations = 0;

    while (t1 - t0).abs() >= SECANT_TOLERANCE && iterations < SECANT_ITERATIONS {
        iterations += 1;
        let f1 = residual(t1);
        let denominator = f1 - f0;
        if denominator == 0.0 {
            break;
        }
        let t2 = t1 - f1 * (t1 - t0) / denominator;
        t0 = t1;
        f0 = f1;
        t1 = t2;
    }

    let time = t1.max(0.0);
    let position = target.predict_position(now + time);
    let distance = range(shooter, position);
    InterceptSolution {
        time,
        position,
        range: distance,
        power: fire_power(distance, power_constant),
        iterations,
    }
}

/// Absolute gun heading that leads `target` assuming constant velocity.
pub fn deflection_angle(shooter: Point, target: &Contact, bullet_speed: f64) -> f64 {
    let direct = bearing(shooter, target.position);
    let lateral = target.velocity * (target.heading - direct).sin();
    direct + (lateral / bullet_speed).clamp(-1.0, 1.0).asin()
}

/// Point along `heading` at `distance` from `shooter`, used to report a
/// deflection shot in the same shape as an intercept.
pub fn deflection_solution(shooter: Point, target: &Contact, power_constant: f64) -> (f64, InterceptSolution) {
    let distance = range(shooter, target.position);
    let power = fire_power(distance, power_constant);
    let heading = deflection_angle(shooter, target, bullet_speed(power));
    let solution = InterceptSolution {
        time: distance / bullet_speed(power),
        position: project(shooter, heading, distance),
        range: distance,
        power,
        iterations: 0,
    };
    (heading, solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn contact(x: f64, y: f64, heading: f64, tick: Tick) -> Contact {
        Contact {
            position: Point::new(x, y),
            tick,
            heading,
            velocity: 8.0,
            bearing: 0.0,
            energy: 100.0,
            distance: 0.0,
        }
    }

    #[test]
    fn test_single_contact_holds_position() {
        let last = contact(120.0, 340.0, 1.0, 10);
        for tick in [10.0, 11.5, 40.0, 1e4] {
            assert_eq!(extrapolate(&last, None, tick), last.position);
        }
    }

    #[test]
    fn test_linear_branch_matches_closed_form() {
        let h = 0.6_f64;
        let previous = contact(100.0, 100.0, h, 10);
        let moved = project(previous.position, h, 16.0);
        let last = contact(moved.x, moved.y, h, 12);

        let p = extrapolate(&last, Some(&previous), 17.0);
        // 8 units per tick, five ticks ahead.
        let expected = last.position + Point::new(h.sin(), h.cos()) * 8.0 * 5.0;
        assert_abs_diff_eq!(p.x, expected.x, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, expected.y, epsilon = 1e-9);
    }

    #[test]
    fn test_circular_branch_follows_arc() {
        let delta = 5f64.to_radians();
        let previous = contact(200.0, 200.0, 0.0, 20);
        let last = contact(200.0, 208.0, delta, 21);

        let speed = 8.0;
        let radius = speed / delta;
        // Heading 5 degrees east of north, turning clockwise: the centre sits
        // one radius to the right of the direction of travel.
        let centre = last.position + Point::new(delta.cos(), -delta.sin()) * radius;
        let ahead = 6.0;
        let angle_from_centre = (delta + ahead * delta) - std::f64::consts::FRAC_PI_2;
        let expected = centre + Point::new(angle_from_centre.sin(), angle_from_centre.cos()) * radius;

        let p = extrapolate(&last, Some(&previous), 21.0 + ahead);
        assert_abs_diff_eq!(p.x, expected.x, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, expected.y, epsilon = 1e-6);
        // Stays on the circle.
        assert_abs_diff_eq!(range(centre, p), radius, epsilon = 1e-6);
    }

    #[test]
    fn test_power_and_speed() {
        assert_abs_diff_eq!(fire_power(100.0, 500.0), 3.0);
        assert_abs_diff_eq!(fire_power(500.0, 500.0), 1.0);
        assert_abs_diff_eq!(bullet_speed(1.0), 17.0);
        assert_abs_diff_eq!(travel_time(500.0, 500.0), 500.0 / 17.0);
    }

    #[test]
    fn test_secant_converges_on_stationary_target() {
        let shooter = Point::new(100.0, 100.0);
        let target = Opponent::new("Sitting", contact(100.0, 600.0, 0.0, 30));

        let solution = solve_intercept(shooter, 30, &target, 500.0);
        let expected = 500.0 / bullet_speed(fire_power(500.0, 500.0));
        assert!(solution.iterations <= SECANT_ITERATIONS);
        assert_abs_diff_eq!(solution.time, expected, epsilon = SECANT_TOLERANCE);
        assert_eq!(solution.position, Point::new(100.0, 600.0));
        assert_abs_diff_eq!(solution.power, 1.0);
    }

    #[test]
    fn test_secant_leads_a_moving_target() {
        let shooter = Point::new(400.0, 100.0);
        let mut target = Opponent::new("Crosser", contact(300.0, 400.0, std::f64::consts::FRAC_PI_2, 10));
        target.push(contact(308.0, 400.0, std::f64::consts::FRAC_PI_2, 11));

        let solution = solve_intercept(shooter, 11, &target, 500.0);
        assert!(solution.time > 0.0);
        assert!(solution.position.x > 308.0);
        // Self-consistent: bullet covers the range in the solved time.
        let flight = bullet_speed(solution.power) * solution.time;
        assert_abs_diff_eq!(flight, solution.range, epsilon = 0.5);
    }

    #[test]
    fn test_deflection_of_stationary_target_is_direct_bearing() {
        let shooter = Point::new(0.0, 0.0);
        let mut target = contact(100.0, 100.0, 0.0, 1);
        target.velocity = 0.0;
        assert_abs_diff_eq!(
            deflection_angle(shooter, &target, 17.0),
            bearing(shooter, target.position),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_deflection_leads_lateral_motion() {
        let shooter = Point::new(0.0, 0.0);
        // Due north, crossing eastward.
        let target = contact(0.0, 200.0, std::f64::consts::FRAC_PI_2, 1);
        let (heading, solution) = deflection_solution(shooter, &target, 500.0);
        assert!(heading > 0.0);
        assert_abs_diff_eq!(solution.range, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.power, 2.5);
    }
}
