//! In-memory host that records every outbound call.

use glam::DVec2;

use eureka_core::events::{Event, ScannedRobot};
use eureka_core::host::{Condition, ConditionKind, Host};
use eureka_core::types::{Arena, Point, Tick};

/// One outbound call made by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    TurnRadar(f64),
    TurnGun(f64),
    TurnBody(f64),
    Ahead(f64),
    Fire(f64),
    AddCustomEvent(Condition),
    RemoveCustomEvent(Condition),
    Stop,
    Execute,
}

/// Scriptable host state plus a log of calls.
#[derive(Debug)]
pub struct RecordingHost {
    pub position: Point,
    pub heading: f64,
    pub gun_heading: f64,
    pub radar_heading: f64,
    pub gun_heat: f64,
    pub arena: Arena,
    pub time: Tick,
    pub others: usize,
    pub calls: Vec<HostCall>,
    /// Conditions registered and not yet removed.
    pub active: Vec<Condition>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            position: Point::new(400.0, 300.0),
            heading: 0.0,
            gun_heading: 0.0,
            radar_heading: 0.0,
            gun_heat: 0.0,
            arena: Arena::new(DVec2::new(800.0, 600.0), DVec2::new(36.0, 36.0)),
            time: 1,
            others: 1,
            calls: Vec::new(),
            active: Vec::new(),
        }
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active condition of `kind`, if any.
    pub fn pending(&self, kind: ConditionKind) -> Option<Condition> {
        self.active.iter().copied().find(|c| c.kind == kind)
    }

    /// Completion event for the active condition of `kind`.
    pub fn completion(&self, kind: ConditionKind) -> Option<Event> {
        self.pending(kind).map(Event::CustomOperationDone)
    }

    pub fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn shots(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Fire(power) => Some(*power),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// A scan of `name` at `distance`, `bearing` radians off our body heading.
    pub fn scan(&self, name: &str, bearing: f64, distance: f64) -> Event {
        Event::RobotFound(ScannedRobot {
            name: name.to_string(),
            bearing,
            distance,
            heading: 0.0,
            velocity: 0.0,
            energy: 100.0,
            tick: self.time,
        })
    }
}

impl Host for RecordingHost {
    fn position(&self) -> Point {
        self.position
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn gun_heading(&self) -> f64 {
        self.gun_heading
    }

    fn radar_heading(&self) -> f64 {
        self.radar_heading
    }

    fn gun_heat(&self) -> f64 {
        self.gun_heat
    }

    fn arena(&self) -> Arena {
        self.arena
    }

    fn time(&self) -> Tick {
        self.time
    }

    fn others(&self) -> usize {
        self.others
    }

    fn set_turn_radar(&mut self, degrees: f64) {
        self.calls.push(HostCall::TurnRadar(degrees));
    }

    fn set_turn_gun(&mut self, radians: f64) {
        self.calls.push(HostCall::TurnGun(radians));
    }

    fn set_turn_body(&mut self, radians: f64) {
        self.calls.push(HostCall::TurnBody(radians));
    }

    fn set_ahead(&mut self, distance: f64) {
        self.calls.push(HostCall::Ahead(distance));
    }

    fn fire(&mut self, power: f64) {
        self.calls.push(HostCall::Fire(power));
    }

    fn add_custom_event(&mut self, condition: Condition) {
        self.active.push(condition);
        self.calls.push(HostCall::AddCustomEvent(condition));
    }

    fn remove_custom_event(&mut self, condition: Condition) {
        self.active.retain(|c| *c != condition);
        self.calls.push(HostCall::RemoveCustomEvent(condition));
    }

    fn stop(&mut self) {
        self.calls.push(HostCall::Stop);
    }

    fn execute(&mut self) {
        self.calls.push(HostCall::Execute);
    }
}
