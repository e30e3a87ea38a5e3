//! Targeting unit: aims the gun and fires once the rotation completes.

use eureka_core::commands::Command;
use eureka_core::constants::{MAX_BULLET_POWER, MIN_BULLET_POWER};
use eureka_core::events::{Event, Signal};
use eureka_core::host::{Condition, ConditionKind};
use eureka_core::types::{bearing, normal_relative_angle};

use super::{Context, Unit};
use crate::config::{AimStrategy, FistConfig};
use crate::operation::{Completion, Operation};
use crate::prediction::{deflection_solution, solve_intercept, InterceptSolution};

/// Why an aim request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The gun is still cooling down.
    GunHeat,
    /// The range calls for less power than the host accepts.
    PowerTooLow,
    /// The target was never observed this round.
    UnknownTarget,
}

/// Result of an aim request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimOutcome {
    /// The gun is turning; `turn` radians, firing `power` on completion.
    Aiming { turn: f64, power: f64 },
    Aborted(AbortReason),
}

/// The gun.
#[derive(Debug)]
pub struct Fist {
    config: FistConfig,
    operation: Operation,
    /// Power of the shot fired when the pending rotation completes.
    pending_shot: Option<f64>,
    last_solution: Option<InterceptSolution>,
}

impl Fist {
    pub fn new(config: FistConfig) -> Self {
        Self {
            config,
            operation: Operation::Idle,
            pending_shot: None,
            last_solution: None,
        }
    }

    /// Whether a shot is waiting for its gun rotation.
    pub fn is_aiming(&self) -> bool {
        self.pending_shot.is_some()
    }

    /// Solution behind the most recent accepted aim.
    pub fn last_solution(&self) -> Option<&InterceptSolution> {
        self.last_solution.as_ref()
    }

    /// Aim at `target` and schedule a shot.
    ///
    /// A refusal has no side effect on the gun.
    pub fn aim(&mut self, target: &str, ctx: &mut Context<'_>) -> AimOutcome {
        let Some(opponent) = ctx.tracker.get(target) else {
            return AimOutcome::Aborted(AbortReason::UnknownTarget);
        };
        if ctx.host.gun_heat() != 0.0 {
            return AimOutcome::Aborted(AbortReason::GunHeat);
        }

        let own = ctx.host.position();
        let (heading, solution) = match self.config.strategy {
            AimStrategy::Intercept => {
                let solution = solve_intercept(own, ctx.host.time(), opponent, self.config.power_constant);
                (bearing(own, solution.position), solution)
            }
            AimStrategy::Deflection => {
                deflection_solution(own, opponent.last_contact(), self.config.power_constant)
            }
        };
        if solution.power < MIN_BULLET_POWER {
            return AimOutcome::Aborted(AbortReason::PowerTooLow);
        }

        log::debug!(
            "aim at {target}: t={:.1} range={:.0} power={:.2} ({} iterations)",
            solution.time,
            solution.range,
            solution.power,
            solution.iterations
        );
        self.last_solution = Some(solution);
        let turn = normal_relative_angle(heading - ctx.host.gun_heading());
        self.rotate(turn, solution.power, ctx)
    }

    /// Turn the gun by `turn` radians and fire `power` afterwards.
    pub fn fire(&mut self, turn: f64, power: f64, ctx: &mut Context<'_>) -> AimOutcome {
        if ctx.host.gun_heat() != 0.0 {
            return AimOutcome::Aborted(AbortReason::GunHeat);
        }
        if power < MIN_BULLET_POWER {
            return AimOutcome::Aborted(AbortReason::PowerTooLow);
        }
        self.rotate(normal_relative_angle(turn), power.min(MAX_BULLET_POWER), ctx)
    }

    fn rotate(&mut self, turn: f64, power: f64, ctx: &mut Context<'_>) -> AimOutcome {
        ctx.host.set_turn_gun(turn);
        self.operation.start(ctx.host, ctx.ids, ConditionKind::GunTurnComplete);
        self.pending_shot = Some(power);
        AimOutcome::Aiming { turn, power }
    }

    fn report(&self, outcome: AimOutcome, ctx: &mut Context<'_>) {
        if let AimOutcome::Aborted(reason) = outcome {
            log::debug!("aim aborted: {reason:?}");
            ctx.emit(Event::AimAborted);
        }
    }

    fn completed(&mut self, condition: &Condition, ctx: &mut Context<'_>) {
        if self.operation.complete(ctx.host, ConditionKind::GunTurnComplete, condition) != Completion::Finished {
            return;
        }
        if let Some(power) = self.pending_shot.take() {
            ctx.host.fire(power);
            ctx.emit(Event::BulletFired);
        }
    }
}

impl Unit for Fist {
    fn receive(&mut self, signal: &Signal, ctx: &mut Context<'_>) {
        match signal {
            Signal::Command(Command::Attack { target }) => {
                let outcome = self.aim(target, ctx);
                self.report(outcome, ctx);
            }
            Signal::Command(Command::Fire { rotation, power }) => {
                // Retaliation only: a refusal leaves the retreat in charge.
                if let AimOutcome::Aborted(reason) = self.fire(*rotation, *power, ctx) {
                    log::debug!("retaliation skipped: {reason:?}");
                }
            }
            Signal::Command(Command::Move) if !self.is_aiming() => {
                // Keep the gun forward while not aiming.
                let turn = normal_relative_angle(ctx.host.heading() - ctx.host.gun_heading());
                ctx.host.set_turn_gun(turn);
            }
            Signal::Command(_) => {}
            Signal::Event(Event::CustomOperationDone(condition)) => self.completed(condition, ctx),
            Signal::Event(_) => {}
        }
    }

    fn reset(&mut self) {
        self.operation = Operation::Idle;
        self.pending_shot = None;
        self.last_solution = None;
    }
}
