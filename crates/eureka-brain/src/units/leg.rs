//! Movement unit: picks the safest nearby destination and drives there.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use eureka_core::commands::Command;
use eureka_core::constants::{FLIGHT_POINTS, RAM_CONE_DEGREES, RAM_DISTANCE, RETREAT_DISTANCE};
use eureka_core::events::{Event, Signal};
use eureka_core::host::{Condition, ConditionKind};
use eureka_core::types::{bearing, normal_relative_angle, range, Point};

use super::{Context, Unit};
use crate::config::LegConfig;
use crate::danger::DangerField;
use crate::operation::{Completion, Operation};
use crate::tracker::Opponent;

/// One sampled destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Sampling angle (radians, counter-clockwise from East).
    pub angle: f64,
    pub distance: f64,
    pub position: Point,
    pub danger: f64,
}

/// The drive.
#[derive(Debug)]
pub struct Leg {
    config: LegConfig,
    operation: Operation,
    last_destination: Option<Point>,
    candidates: Vec<Candidate>,
}

impl Leg {
    pub fn new(config: LegConfig) -> Self {
        Self {
            config,
            operation: Operation::Idle,
            last_destination: None,
            candidates: Vec::with_capacity(FLIGHT_POINTS),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.operation.is_pending()
    }

    pub fn last_destination(&self) -> Option<Point> {
        self.last_destination
    }

    /// Candidates of the most recent movement decision.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Sample destinations around us, pick the least dangerous and go there.
    pub fn flight(&mut self, ctx: &mut Context<'_>) -> Point {
        let own = ctx.host.position();
        let arena = ctx.host.arena();
        let field = DangerField::new(arena, own, ctx.host.heading(), self.last_destination, &self.config);
        let opponents: Vec<&Opponent> = ctx.tracker.relevant(ctx.host.time()).collect();

        let step = TAU / FLIGHT_POINTS as f64;
        self.candidates.clear();
        for i in 0..FLIGHT_POINTS {
            let angle = step / 2.0 + i as f64 * step;
            let distance = if self.config.max_movement > self.config.min_movement {
                ctx.rng.gen_range(self.config.min_movement..self.config.max_movement)
            } else {
                self.config.min_movement
            };
            let position = own + DVec2::new(angle.cos(), angle.sin()) * distance;
            self.candidates.push(Candidate {
                angle,
                distance,
                position,
                danger: field.evaluate(position, &opponents),
            });
        }

        let mut best = self.candidates[0];
        for candidate in &self.candidates[1..] {
            if candidate.danger < best.danger {
                best = *candidate;
            }
        }
        if best.danger.is_infinite() {
            log::debug!("every destination is forbidden, taking the first");
        }

        let destination = arena.clamp(best.position);
        self.go_to(destination, ctx);
        destination
    }

    /// Turn toward `destination` and drive, backwards if that is shorter.
    fn go_to(&mut self, destination: Point, ctx: &mut Context<'_>) {
        self.last_destination = Some(destination);
        let delta = destination - ctx.host.position();
        let angle = delta.x.atan2(delta.y) - ctx.host.heading();
        // Within a quarter turn of either end of the body axis.
        ctx.host.set_turn_body(angle.tan().atan());
        let distance = delta.length();
        self.advance(if angle.cos() < 0.0 { -distance } else { distance }, ctx);
    }

    fn advance(&mut self, distance: f64, ctx: &mut Context<'_>) {
        ctx.host.set_ahead(distance);
        self.operation.start(ctx.host, ctx.ids, ConditionKind::MoveComplete);
    }

    /// Cancel the pending move and halt. Calling it while idle does nothing.
    pub fn stop(&mut self, ctx: &mut Context<'_>) {
        if self.operation.cancel(ctx.host) {
            ctx.host.stop();
        }
    }

    /// Back away from `from` after touching (or nearly touching) a robot.
    fn retreat(&mut self, from: Point, ctx: &mut Context<'_>) {
        self.last_destination = Some(from);
        self.stop(ctx);
        self.advance(-RETREAT_DISTANCE, ctx);
    }

    fn check_ram(&mut self, name: &str, ctx: &mut Context<'_>) {
        let Some(position) = ctx.tracker.get(name).map(|o| o.last_contact().position) else {
            return;
        };
        let own = ctx.host.position();
        let off_axis = normal_relative_angle(bearing(own, position) - ctx.host.heading()).abs();
        if range(own, position) < RAM_DISTANCE && off_axis < RAM_CONE_DEGREES.to_radians() {
            log::debug!("{name} straight ahead, backing off");
            self.retreat(position, ctx);
        }
    }

    fn completed(&mut self, condition: &Condition, ctx: &mut Context<'_>) {
        if self.operation.complete(ctx.host, ConditionKind::MoveComplete, condition) == Completion::Finished {
            ctx.emit(Event::MovementDone);
        }
    }
}

impl Unit for Leg {
    fn receive(&mut self, signal: &Signal, ctx: &mut Context<'_>) {
        match signal {
            Signal::Command(Command::Move) => {
                self.flight(ctx);
            }
            Signal::Command(Command::Stop) => self.stop(ctx),
            Signal::Command(_) => {}
            Signal::Event(Event::RobotHit { .. }) => {
                let own = ctx.host.position();
                self.retreat(own, ctx);
            }
            Signal::Event(Event::RobotNearby { name }) => self.check_ram(name, ctx),
            Signal::Event(Event::CustomOperationDone(condition)) => self.completed(condition, ctx),
            Signal::Event(_) => {}
        }
    }

    fn reset(&mut self) {
        self.operation = Operation::Idle;
        self.last_destination = None;
        self.candidates.clear();
    }
}
