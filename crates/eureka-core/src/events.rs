//! Events delivered by the host or derived by the units.

use serde::{Deserialize, Serialize};

use crate::commands::Command;
use crate::host::Condition;
use crate::types::Tick;

/// Raw radar observation of an opponent, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedRobot {
    /// Unique name, including any clone suffix such as `"Walls (2)"`.
    pub name: String,
    /// Bearing relative to our body heading (radians).
    pub bearing: f64,
    pub distance: f64,
    /// Opponent heading (absolute, radians).
    pub heading: f64,
    pub velocity: f64,
    pub energy: f64,
    /// Tick of the observation.
    pub tick: Tick,
}

/// Every event the engine reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // --- Host events ---
    /// The radar swept over an opponent.
    RobotFound(ScannedRobot),
    /// Our body touched an opponent at `bearing` (radians, relative to body).
    RobotHit { bearing: f64 },
    /// A registered completion condition fired.
    CustomOperationDone(Condition),
    /// The round is over after `turns` ticks.
    RoundEnded { turns: u64 },
    /// The whole battle is over.
    BattleEnded,
    /// An opponent was destroyed.
    EnemyDied { name: String },

    // --- Derived events ---
    /// An opponent was observed inside the nearby threshold.
    RobotNearby { name: String },
    /// The current radar rotation finished.
    ScanningComplete,
    /// The current move finished.
    MovementDone,
    /// A bullet left the gun.
    BulletFired,
    /// An aim request was rejected.
    AimAborted,
}

impl Event {
    /// Short name used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Event::RobotFound(_) => "RobotFound",
            Event::RobotHit { .. } => "RobotHit",
            Event::CustomOperationDone(_) => "CustomOperationDone",
            Event::RoundEnded { .. } => "RoundEnded",
            Event::BattleEnded => "BattleEnded",
            Event::EnemyDied { .. } => "EnemyDied",
            Event::RobotNearby { .. } => "RobotNearby",
            Event::ScanningComplete => "ScanningComplete",
            Event::MovementDone => "MovementDone",
            Event::BulletFired => "BulletFired",
            Event::AimAborted => "AimAborted",
        }
    }
}

/// Anything travelling over the signal bus.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Command(Command),
    Event(Event),
}

impl From<Command> for Signal {
    fn from(command: Command) -> Self {
        Signal::Command(command)
    }
}

impl From<Event> for Signal {
    fn from(event: Event) -> Self {
        Signal::Event(event)
    }
}
