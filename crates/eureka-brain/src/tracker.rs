//! Opponent registry.
//!
//! Keeps every opponent seen during the current round together with a
//! bounded history of contacts, and aggregates survival statistics across
//! rounds per opponent archetype.

use std::collections::{btree_map, BTreeMap, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};

use eureka_core::constants::{CONTACT_HISTORY, DANGER_ENERGY_SCALE, STALENESS_TICKS};
use eureka_core::contract_violation;
use eureka_core::error::{ConfigError, PersistenceError};
use eureka_core::events::ScannedRobot;
use eureka_core::params::{load_json, save_json};
use eureka_core::types::{project, range, Point, Tick};

use crate::prediction;

/// Immutable snapshot of an opponent at one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Absolute position derived from our pose, bearing and distance.
    pub position: Point,
    pub tick: Tick,
    /// Opponent heading (radians, compass).
    pub heading: f64,
    pub velocity: f64,
    /// Bearing relative to our body at observation time (radians).
    pub bearing: f64,
    pub energy: f64,
    /// Distance from us at observation time.
    pub distance: f64,
}

impl Contact {
    /// Build a contact from a scan taken at `observer` facing `observer_heading`.
    pub fn from_scan(observer: Point, observer_heading: f64, scan: &ScannedRobot) -> Self {
        let position = project(observer, observer_heading + scan.bearing, scan.distance);
        Self {
            position,
            tick: scan.tick,
            heading: scan.heading,
            velocity: scan.velocity,
            bearing: scan.bearing,
            energy: scan.energy,
            distance: range(observer, position),
        }
    }
}

/// A tracked adversary.
#[derive(Debug, Clone)]
pub struct Opponent {
    name: String,
    /// Newest first, never empty.
    contacts: VecDeque<Contact>,
    death_tick: Option<Tick>,
}

impl Opponent {
    pub fn new(name: impl Into<String>, first: Contact) -> Self {
        let mut contacts = VecDeque::with_capacity(CONTACT_HISTORY);
        contacts.push_front(first);
        Self {
            name: name.into(),
            contacts,
            death_tick: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without a clone suffix: `"Walls (2)"` becomes `"Walls"`.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Append a newer contact.
    ///
    /// A contact for the same tick replaces the newest one. Contacts older
    /// than the newest are a protocol violation and are dropped.
    pub fn push(&mut self, contact: Contact) {
        let newest = self.last_contact().tick;
        if contact.tick < newest {
            contract_violation!(
                "contact for {} at tick {} is older than tick {}",
                self.name,
                contact.tick,
                newest
            );
        }
        if contact.tick == newest {
            self.contacts[0] = contact;
            return;
        }
        if self.contacts.len() == CONTACT_HISTORY {
            self.contacts.pop_back();
        }
        self.contacts.push_front(contact);
    }

    pub fn last_contact(&self) -> &Contact {
        &self.contacts[0]
    }

    /// Second most recent contact, if any.
    pub fn previous_contact(&self) -> Option<&Contact> {
        self.contacts.get(1)
    }

    /// Contacts, newest first.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    /// Threat weight: higher energy is scarier.
    pub fn danger(&self) -> f64 {
        self.last_contact().energy / DANGER_ENERGY_SCALE
    }

    pub fn is_alive(&self) -> bool {
        self.death_tick.is_none()
    }

    pub fn death_tick(&self) -> Option<Tick> {
        self.death_tick
    }

    pub fn mark_dead(&mut self, tick: Tick) {
        self.death_tick = Some(tick);
    }

    /// Extrapolated position at absolute tick `tick`.
    pub fn predict_position(&self, tick: f64) -> Point {
        prediction::extrapolate(self.last_contact(), self.previous_contact(), tick)
    }
}

/// Strip a trailing clone suffix such as `" (2)"`.
pub fn base_name(name: &str) -> &str {
    match name.rfind('(') {
        Some(index) if index > 0 && name.ends_with(')') => name[..index].trim_end(),
        _ => name,
    }
}

/// Incremental mean of per-round survival scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningAverage {
    pub average: f64,
    pub samples: u64,
}

impl RunningAverage {
    pub fn add(&mut self, value: f64) {
        self.samples += 1;
        self.average += (value - self.average) / self.samples as f64;
    }
}

/// Survival statistics keyed by opponent base name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceTable {
    entries: BTreeMap<String, RunningAverage>,
}

impl PerformanceTable {
    pub fn get(&self, base_name: &str) -> Option<&RunningAverage> {
        self.entries.get(base_name)
    }

    pub fn add(&mut self, base_name: &str, value: f64) {
        self.entries
            .entry(base_name.to_string())
            .or_default()
            .add(value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        save_json(path, self)
    }
}

/// Registry of known opponents.
#[derive(Debug, Default)]
pub struct OpponentTracker {
    opponents: BTreeMap<String, Opponent>,
    performance: PerformanceTable,
}

impl OpponentTracker {
    pub fn new(performance: PerformanceTable) -> Self {
        Self {
            opponents: BTreeMap::new(),
            performance,
        }
    }

    /// Record a scan taken from `observer` facing `observer_heading`.
    pub fn observe(&mut self, observer: Point, observer_heading: f64, scan: &ScannedRobot) -> &Opponent {
        let contact = Contact::from_scan(observer, observer_heading, scan);
        match self.opponents.entry(scan.name.clone()) {
            btree_map::Entry::Occupied(entry) => {
                let opponent = entry.into_mut();
                opponent.push(contact);
                opponent
            }
            btree_map::Entry::Vacant(entry) => {
                log::debug!("new opponent {}", scan.name);
                entry.insert(Opponent::new(scan.name.clone(), contact))
            }
        }
    }

    /// Mark `name` dead at `tick`. Returns false if it was never seen.
    pub fn mark_dead(&mut self, name: &str, tick: Tick) -> bool {
        match self.opponents.get_mut(name) {
            Some(opponent) => {
                opponent.mark_dead(tick);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Opponent> {
        self.opponents.get(name)
    }

    pub fn len(&self) -> usize {
        self.opponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opponents.is_empty()
    }

    /// Opponents alive and seen within the default staleness window.
    pub fn relevant(&self, current_tick: Tick) -> RelevantOpponents<'_> {
        self.relevant_within(current_tick, STALENESS_TICKS)
    }

    /// Opponents alive and seen within `staleness` ticks of `current_tick`.
    pub fn relevant_within(&self, current_tick: Tick, staleness: Tick) -> RelevantOpponents<'_> {
        RelevantOpponents {
            inner: self.opponents.values(),
            current_tick,
            staleness,
        }
    }

    /// Fold the finished round into the survival statistics.
    pub fn record_round_performance(&mut self, total_turns: u64) {
        for opponent in self.opponents.values() {
            let score = match opponent.death_tick() {
                None => 1.0,
                Some(_) if total_turns == 0 => 0.0,
                Some(tick) => tick as f64 / total_turns as f64,
            };
            self.performance.add(opponent.base_name(), score);
        }
    }

    /// Forget every opponent; statistics are kept.
    pub fn reset_round(&mut self) {
        self.opponents.clear();
    }

    pub fn performance(&self) -> &PerformanceTable {
        &self.performance
    }
}

/// Single-pass iterator over relevant opponents.
pub struct RelevantOpponents<'a> {
    inner: btree_map::Values<'a, String, Opponent>,
    current_tick: Tick,
    staleness: Tick,
}

impl<'a> Iterator for RelevantOpponents<'a> {
    type Item = &'a Opponent;

    fn next(&mut self) -> Option<&'a Opponent> {
        let (current, staleness) = (self.current_tick, self.staleness);
        self.inner
            .by_ref()
            .find(|o| o.is_alive() && o.last_contact().tick + staleness >= current)
    }
}
