//! Boundary between the behavior engine and the battle simulation.
//!
//! The host owns physics and turn scheduling. The engine only reads the
//! robot's pose through queries and queues actuator commands, which the host
//! applies when `execute` is called.

use serde::{Deserialize, Serialize};

use crate::types::{Arena, Point, Tick};

/// Correlator tying a completion notification to the operation that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(pub u64);

/// What the host has to observe before signalling completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// The radar finished its pending rotation.
    RadarTurnComplete,
    /// The gun finished its pending rotation.
    GunTurnComplete,
    /// The body finished its pending move.
    MoveComplete,
}

/// A completion condition registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub id: OperationId,
    pub kind: ConditionKind,
}

/// Monotonic source of operation ids, shared by all units of one engine.
#[derive(Debug, Default)]
pub struct OperationIds {
    next: u64,
}

impl OperationIds {
    pub fn next(&mut self) -> OperationId {
        self.next += 1;
        OperationId(self.next)
    }
}

/// Queries and commands offered by the surrounding simulation.
pub trait Host {
    // --- Queries ---
    fn position(&self) -> Point;
    /// Body heading (radians, compass).
    fn heading(&self) -> f64;
    /// Gun heading (radians, compass).
    fn gun_heading(&self) -> f64;
    /// Radar heading (radians, compass).
    fn radar_heading(&self) -> f64;
    /// Remaining gun heat; the gun can only fire at zero.
    fn gun_heat(&self) -> f64;
    fn arena(&self) -> Arena;
    fn time(&self) -> Tick;
    /// Number of opponents still alive.
    fn others(&self) -> usize;

    // --- Actuator commands (applied on `execute`) ---
    /// Turn the radar clockwise by `degrees`.
    fn set_turn_radar(&mut self, degrees: f64);
    /// Turn the gun clockwise by `radians`.
    fn set_turn_gun(&mut self, radians: f64);
    /// Turn the body clockwise by `radians`.
    fn set_turn_body(&mut self, radians: f64);
    /// Drive `distance` forward (negative drives backward).
    fn set_ahead(&mut self, distance: f64);
    fn fire(&mut self, power: f64);
    /// Ask to be notified through `Event::CustomOperationDone` once `condition` holds.
    fn add_custom_event(&mut self, condition: Condition);
    fn remove_custom_event(&mut self, condition: Condition);
    /// Halt all motion immediately.
    fn stop(&mut self);
    /// Flush queued commands to the simulation.
    fn execute(&mut self);
}
