//! Perception unit: radar sweeps and opponent bookkeeping.

use rand::Rng;

use eureka_core::commands::Command;
use eureka_core::constants::*;
use eureka_core::events::{Event, ScannedRobot, Signal};
use eureka_core::host::{Condition, ConditionKind};
use eureka_core::types::{bearing, normal_relative_degrees};

use super::{Context, Unit};
use crate::config::EyeConfig;
use crate::operation::{Completion, Operation};

/// Rotation direction of the next partial sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Right,
    Left,
}

impl SweepDirection {
    pub fn signum(self) -> f64 {
        match self {
            SweepDirection::Right => 1.0,
            SweepDirection::Left => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SweepDirection::Right => SweepDirection::Left,
            SweepDirection::Left => SweepDirection::Right,
        }
    }
}

/// What the pending radar rotation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Full,
    /// Half turn or overshoot past the extreme bearing.
    Partial,
    /// Turn onto an attack target.
    Lock,
}

/// The radar.
#[derive(Debug)]
pub struct Eye {
    config: EyeConfig,
    operation: Operation,
    sweep: Option<Sweep>,
    direction: SweepDirection,
    swept_full: bool,
}

impl Eye {
    pub fn new(config: EyeConfig) -> Self {
        Self {
            config,
            operation: Operation::Idle,
            sweep: None,
            direction: SweepDirection::Left,
            swept_full: false,
        }
    }

    /// Whether at least one full sweep finished this round.
    pub fn has_swept_full(&self) -> bool {
        self.swept_full
    }

    /// Issue exactly one radar rotation.
    fn scan(&mut self, ctx: &mut Context<'_>) {
        let (numerator, denominator) = RANDOM_FULL_SWEEP_CHANCE;
        if !self.swept_full || ctx.rng.gen_ratio(numerator, denominator) {
            self.turn(FULL_SWEEP_DEGREES, Sweep::Full, ctx);
            return;
        }

        let own = ctx.host.position();
        let radar = ctx.host.radar_heading();
        let mut extreme: f64 = 0.0;
        let mut seen = 0;
        for opponent in ctx.tracker.relevant(ctx.host.time()) {
            let offset = normal_relative_degrees(
                (bearing(own, opponent.last_contact().position) - radar).to_degrees(),
            );
            if offset.abs() > extreme.abs() {
                extreme = offset;
            }
            seen += 1;
        }

        let degrees = if seen > 0 && seen == ctx.host.others() {
            extreme + extreme.signum() * SWEEP_OVERSHOOT_DEGREES
        } else {
            self.direction.signum() * HALF_SWEEP_DEGREES
        };
        self.direction = self.direction.reversed();
        self.turn(degrees, Sweep::Partial, ctx);
    }

    /// Point the radar at the last known position of `target`.
    fn lock(&mut self, target: &str, ctx: &mut Context<'_>) {
        let Some(opponent) = ctx.tracker.get(target) else {
            log::debug!("radar lock on unknown opponent {target}");
            return;
        };
        let offset = bearing(ctx.host.position(), opponent.last_contact().position) - ctx.host.radar_heading();
        self.turn(normal_relative_degrees(offset.to_degrees()), Sweep::Lock, ctx);
    }

    fn turn(&mut self, degrees: f64, sweep: Sweep, ctx: &mut Context<'_>) {
        log::trace!("radar {sweep:?} {degrees:.1} deg");
        ctx.host.set_turn_radar(degrees);
        self.operation.start(ctx.host, ctx.ids, ConditionKind::RadarTurnComplete);
        self.sweep = Some(sweep);
    }

    fn observe(&mut self, scan: &ScannedRobot, ctx: &mut Context<'_>) {
        let (own, heading) = (ctx.host.position(), ctx.host.heading());
        let opponent = ctx.tracker.observe(own, heading, scan);
        if opponent.last_contact().distance < self.config.nearby_threshold {
            let name = opponent.name().to_string();
            ctx.emit(Event::RobotNearby { name });
        }
    }

    fn completed(&mut self, condition: &Condition, ctx: &mut Context<'_>) {
        if self.operation.complete(ctx.host, ConditionKind::RadarTurnComplete, condition) != Completion::Finished {
            return;
        }
        if self.sweep.take() == Some(Sweep::Full) {
            self.swept_full = true;
        }
        ctx.emit(Event::ScanningComplete);
    }
}

impl Unit for Eye {
    fn receive(&mut self, signal: &Signal, ctx: &mut Context<'_>) {
        match signal {
            Signal::Command(Command::Scan) => self.scan(ctx),
            Signal::Command(Command::Attack { target }) => self.lock(target, ctx),
            Signal::Command(_) => {}
            Signal::Event(Event::RobotFound(scan)) => self.observe(scan, ctx),
            Signal::Event(Event::CustomOperationDone(condition)) => self.completed(condition, ctx),
            Signal::Event(Event::EnemyDied { name }) => {
                let tick = ctx.host.time();
                if !ctx.tracker.mark_dead(name, tick) {
                    log::debug!("{name} died unseen");
                }
            }
            Signal::Event(Event::RoundEnded { turns }) => {
                ctx.tracker.record_round_performance(*turns);
                log::info!("round ended after {turns} turns, {} opponents tracked", ctx.tracker.len());
                ctx.tracker.reset_round();
            }
            Signal::Event(_) => {}
        }
    }

    fn reset(&mut self) {
        self.operation = Operation::Idle;
        self.sweep = None;
        self.direction = SweepDirection::Left;
        self.swept_full = false;
    }
}
