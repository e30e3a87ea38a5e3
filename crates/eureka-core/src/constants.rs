//! Physical rules of the host arena and fixed engine constants.

// --- Ballistics (host rules) ---

/// Smallest bullet power the host accepts.
pub const MIN_BULLET_POWER: f64 = 0.1;

/// Largest bullet power the host accepts.
pub const MAX_BULLET_POWER: f64 = 3.0;

/// Bullet speed at zero power (units per tick).
pub const BULLET_BASE_SPEED: f64 = 20.0;

/// Speed lost per unit of bullet power.
pub const BULLET_SPEED_FACTOR: f64 = 3.0;

// --- Tracking ---

/// Contacts older than this many ticks no longer make an opponent relevant.
pub const STALENESS_TICKS: u64 = 8;

/// Maximum number of contacts kept per opponent.
pub const CONTACT_HISTORY: usize = 32;

/// Energy level that maps to a danger weight of 1.0.
pub const DANGER_ENERGY_SCALE: f64 = 50.0;

/// Heading deltas (radians per tick) below this are extrapolated linearly.
pub const CIRCULAR_EPSILON: f64 = 1e-5;

// --- Intercept solve ---

/// Maximum secant iterations.
pub const SECANT_ITERATIONS: usize = 15;

/// Convergence tolerance between consecutive secant iterates.
pub const SECANT_TOLERANCE: f64 = 0.01;

/// Width of the initial secant bracket in ticks (centered on the estimate).
pub const SECANT_BRACKET_TICKS: f64 = 20.0;

// --- Radar ---

/// Degrees of a full radar sweep.
pub const FULL_SWEEP_DEGREES: f64 = 360.0;

/// Degrees of a half sweep in the alternating direction.
pub const HALF_SWEEP_DEGREES: f64 = 180.0;

/// Overshoot beyond the extreme bearing when locking the radar.
pub const SWEEP_OVERSHOOT_DEGREES: f64 = 22.5;

/// Chance (numerator, denominator) of a random full sweep after the first one.
pub const RANDOM_FULL_SWEEP_CHANCE: (u32, u32) = (1, 3);

// --- Movement ---

/// Number of candidate destinations sampled per movement decision.
pub const FLIGHT_POINTS: usize = 80;

/// Distance backed off after touching another robot.
pub const RETREAT_DISTANCE: f64 = 15.0;

/// Opponents closer than this straight ahead trigger a back-off.
pub const RAM_DISTANCE: f64 = 20.0;

/// Half-width of the frontal cone used for ram avoidance (degrees).
pub const RAM_CONE_DEGREES: f64 = 20.0;

// --- Persistence ---

/// Parameter table read while training.
pub const TRAINING_FILENAME: &str = "training.json";

/// Parameter table written at battle end outside training.
pub const CONFIG_FILENAME: &str = "config.json";

/// Survival statistics per opponent archetype.
pub const PERFORMANCE_FILENAME: &str = "enemy_scores.json";
