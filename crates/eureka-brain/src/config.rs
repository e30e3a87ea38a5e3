//! Resolved engine configuration.
//!
//! Every tunable knob lives in a `ParameterTable` keyed by dotted names.
//! `BrainConfig::resolve` reads each knob (inserting its default when absent)
//! into plain per-unit structs that are handed to the units at construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use eureka_core::error::ConfigError;
use eureka_core::params::{Parameter, ParameterTable};

// --- Parameter names ---

pub const NEARBY_THRESHOLD: &str = "Eye/NearbyThreshold";
pub const POWER_CONSTANT: &str = "Fist/PowerConstant";
pub const AIM_STRATEGY: &str = "Fist/AimStrategy";
pub const MIN_MOVEMENT: &str = "Leg/MinMovement";
pub const MAX_MOVEMENT: &str = "Leg/MaxMovement";
pub const BORDER: &str = "Leg/Border";
pub const LINEAR_CONE: &str = "Leg/LinearCone";
pub const REVISIT_PENALTY: &str = "Leg/RevisitPenalty";
pub const RETALIATION_POWER: &str = "Brain/RetaliationPower";

/// How the fist turns a target into a gun heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimStrategy {
    /// Iterative intercept solve against the extrapolated path.
    #[default]
    Intercept,
    /// Closed-form lead for a constant-velocity target.
    Deflection,
}

impl AimStrategy {
    fn from_value(value: f64) -> Self {
        if value.round() as i64 == 1 {
            AimStrategy::Deflection
        } else {
            AimStrategy::Intercept
        }
    }
}

/// Radar settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeConfig {
    /// Opponents closer than this raise `RobotNearby`.
    pub nearby_threshold: f64,
}

/// Gun settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FistConfig {
    /// Numerator of the range-to-power curve.
    pub power_constant: f64,
    pub strategy: AimStrategy,
}

/// Drive settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegConfig {
    pub min_movement: f64,
    pub max_movement: f64,
    /// Border margin in multiples of the robot half-size.
    pub border: f64,
    /// Half-width of the forbidden heading cone (radians).
    pub linear_cone: f64,
    /// Numerator of the revisit penalty.
    pub revisit_penalty: f64,
}

/// Configuration for every unit plus the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrainConfig {
    pub eye: EyeConfig,
    pub fist: FistConfig,
    pub leg: LegConfig,
    /// Power of the shot fired back after a collision.
    pub retaliation_power: f64,
}

impl BrainConfig {
    /// Read every knob from `table`, inserting defaults for missing ones.
    pub fn resolve(table: &mut ParameterTable) -> Self {
        Self {
            eye: EyeConfig {
                nearby_threshold: table
                    .value_or_insert(NEARBY_THRESHOLD, Parameter::range(200.0, 100.0, 300.0, 10.0)),
            },
            fist: FistConfig {
                power_constant: table
                    .value_or_insert(POWER_CONSTANT, Parameter::range(500.0, 400.0, 600.0, 50.0)),
                strategy: AimStrategy::from_value(
                    table.value_or_insert(AIM_STRATEGY, Parameter::constant(0.0)),
                ),
            },
            leg: LegConfig {
                min_movement: table
                    .value_or_insert(MIN_MOVEMENT, Parameter::range(80.0, 60.0, 200.0, 10.0)),
                max_movement: table
                    .value_or_insert(MAX_MOVEMENT, Parameter::range(180.0, 120.0, 300.0, 10.0)),
                border: table.value_or_insert(BORDER, Parameter::range(3.0, 1.0, 4.0, 0.5)),
                linear_cone: table
                    .value_or_insert(LINEAR_CONE, Parameter::constant(20.0))
                    .to_radians(),
                revisit_penalty: table.value_or_insert(REVISIT_PENALTY, Parameter::constant(0.08)),
            },
            retaliation_power: table.value_or_insert(RETALIATION_POWER, Parameter::constant(3.0)),
        }
    }

    /// The default table with every knob present.
    pub fn default_table() -> ParameterTable {
        let mut table = ParameterTable::new();
        Self::resolve(&mut table);
        table
    }

    /// Reject combinations that cannot drive a sensible robot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leg.min_movement > self.leg.max_movement {
            return Err(ConfigError::Invalid(format!(
                "{MIN_MOVEMENT} ({}) exceeds {MAX_MOVEMENT} ({})",
                self.leg.min_movement, self.leg.max_movement
            )));
        }
        if self.leg.min_movement <= 0.0 {
            return Err(ConfigError::Invalid(format!("{MIN_MOVEMENT} must be positive")));
        }
        if self.fist.power_constant <= 0.0 {
            return Err(ConfigError::Invalid(format!("{POWER_CONSTANT} must be positive")));
        }
        Ok(())
    }

    /// Whether `table` resolves to a valid configuration. Used to prune sweeps.
    pub fn is_valid_table(table: &ParameterTable) -> bool {
        Self::resolve(&mut table.clone()).validate().is_ok()
    }
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self::resolve(&mut ParameterTable::new())
    }
}

/// Where the brain keeps its files and how it seeds randomness.
#[derive(Debug, Clone)]
pub struct BrainSettings {
    /// Directory holding `training.json`, `config.json` and `enemy_scores.json`.
    /// `None` disables persistence entirely.
    pub data_dir: Option<PathBuf>,
    /// RNG seed for determinism. Same seed = same decisions.
    pub seed: u64,
}

impl Default for BrainSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed: 42,
        }
    }
}
