//! Commands broadcast by the coordinator to every unit.
//!
//! A command states intent only. Each unit decides independently whether
//! and how its actuator reacts.

use serde::{Deserialize, Serialize};

/// All high-level decisions the coordinator can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Pick a new destination and drive there.
    Move,
    /// Halt any movement in progress.
    Stop,
    /// Continue scanning the arena.
    Scan,
    /// Aim at and shoot the named opponent.
    Attack { target: String },
    /// Turn the gun by `rotation` radians and shoot with `power`.
    Fire { rotation: f64, power: f64 },
}

impl Command {
    /// Short name used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Move => "Move",
            Command::Stop => "Stop",
            Command::Scan => "Scan",
            Command::Attack { .. } => "Attack",
            Command::Fire { .. } => "Fire",
        }
    }
}
