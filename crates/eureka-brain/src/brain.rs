//! Coordinator: the reactive core of the robot.
//!
//! `Brain` owns the opponent tracker, the three units and one ordered event
//! queue. Each event is handled in two steps: the coordinator reacts first
//! (possibly issuing commands, which every unit sees immediately), then the
//! event itself is relayed to every unit. Events derived by the units are
//! appended to the queue and handled in order before `receive` returns.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use eureka_core::commands::Command;
use eureka_core::constants::{CONFIG_FILENAME, PERFORMANCE_FILENAME, TRAINING_FILENAME};
use eureka_core::events::{Event, Signal};
use eureka_core::host::{Host, OperationIds};
use eureka_core::params::ParameterTable;
use eureka_core::types::normal_relative_angle;

use crate::config::{BrainConfig, BrainSettings};
use crate::tracker::{OpponentTracker, PerformanceTable};
use crate::units::eye::Eye;
use crate::units::fist::Fist;
use crate::units::leg::Leg;
use crate::units::{Context, Unit};

/// Commands chosen by the coordinator for one event.
#[derive(Debug, Default)]
struct Reaction {
    commands: Vec<Command>,
    /// Flush the host once the event has been fully handled.
    execute: bool,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn execute(commands: Vec<Command>) -> Self {
        Self {
            commands,
            execute: true,
        }
    }
}

/// The behavior engine.
pub struct Brain {
    config: BrainConfig,
    table: ParameterTable,
    training: bool,
    data_dir: Option<PathBuf>,
    tracker: OpponentTracker,
    ids: OperationIds,
    rng: ChaCha8Rng,
    queue: VecDeque<Event>,
    eye: Eye,
    fist: Fist,
    leg: Leg,
}

impl Brain {
    /// Create a brain from the files in `settings.data_dir`.
    ///
    /// A readable `training.json` switches to training mode; otherwise
    /// `config.json` is used when present. Unreadable files fall back to
    /// defaults.
    pub fn new(settings: BrainSettings) -> Self {
        let (table, training) = settings
            .data_dir
            .as_deref()
            .map(load_parameters)
            .unwrap_or_default();
        let performance = settings
            .data_dir
            .as_deref()
            .map(load_performance)
            .unwrap_or_default();
        Self::assemble(table, training, performance, settings)
    }

    /// Create a brain for an explicit parameter table (not training).
    pub fn with_table(table: ParameterTable, settings: BrainSettings) -> Self {
        Self::assemble(table, false, PerformanceTable::default(), settings)
    }

    fn assemble(
        mut table: ParameterTable,
        training: bool,
        performance: PerformanceTable,
        settings: BrainSettings,
    ) -> Self {
        let mut config = BrainConfig::resolve(&mut table);
        if let Err(e) = config.validate() {
            log::warn!("{e}; falling back to default parameters");
            table = BrainConfig::default_table();
            config = BrainConfig::default();
        }
        if training {
            log::info!("training mode: parameters will not be saved");
        }

        Self {
            config,
            table,
            training,
            data_dir: settings.data_dir,
            tracker: OpponentTracker::new(performance),
            ids: OperationIds::default(),
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
            queue: VecDeque::new(),
            eye: Eye::new(config.eye),
            fist: Fist::new(config.fist),
            leg: Leg::new(config.leg),
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.table
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn tracker(&self) -> &OpponentTracker {
        &self.tracker
    }

    pub fn eye(&self) -> &Eye {
        &self.eye
    }

    pub fn fist(&self) -> &Fist {
        &self.fist
    }

    pub fn leg(&self) -> &Leg {
        &self.leg
    }

    // --- Dispatch ---

    /// Start of a round: forget per-round unit state and begin scanning.
    pub fn life(&mut self, host: &mut dyn Host) -> Vec<Command> {
        self.queue.clear();
        self.eye.reset();
        self.fist.reset();
        self.leg.reset();

        log::debug!("[Command] Scan");
        let mut issued = vec![Command::Scan];
        self.broadcast(host, &Signal::Command(Command::Scan));
        issued.extend(self.drain(host));
        issued
    }

    /// Handle one host event and everything it leads to.
    ///
    /// Returns the commands broadcast while handling it, in order.
    pub fn receive(&mut self, host: &mut dyn Host, event: Event) -> Vec<Command> {
        self.queue.push_back(event);
        self.drain(host)
    }

    fn drain(&mut self, host: &mut dyn Host) -> Vec<Command> {
        let mut issued = Vec::new();
        let mut flush = false;

        while let Some(event) = self.queue.pop_front() {
            log::debug!("[Event] {}", event.label());
            let reaction = self.react(&*host, &event);
            for command in reaction.commands {
                log::debug!("[Command] {}", command.label());
                self.broadcast(host, &Signal::Command(command.clone()));
                issued.push(command);
            }
            flush |= reaction.execute;
            self.broadcast(host, &Signal::Event(event));
        }

        if flush {
            host.execute();
        }
        issued
    }

    /// Coordinator transition table.
    fn react(&self, host: &dyn Host, event: &Event) -> Reaction {
        let aiming = self.fist.is_aiming();
        match event {
            Event::MovementDone | Event::BulletFired | Event::AimAborted if !aiming => {
                Reaction::execute(vec![Command::Move])
            }
            Event::RobotNearby { name } if !aiming => Reaction::execute(vec![
                Command::Stop,
                Command::Attack {
                    target: name.clone(),
                },
            ]),
            Event::ScanningComplete => {
                let mut commands = vec![Command::Scan];
                if !self.leg.is_moving() {
                    commands.push(Command::Move);
                }
                Reaction::execute(commands)
            }
            Event::RobotHit { bearing } if !aiming => {
                let rotation = normal_relative_angle(host.heading() - host.gun_heading() + bearing);
                Reaction::execute(vec![
                    Command::Stop,
                    Command::Fire {
                        rotation,
                        power: self.config.retaliation_power,
                    },
                ])
            }
            Event::BattleEnded => {
                self.persist();
                Reaction::none()
            }
            _ => Reaction::none(),
        }
    }

    fn broadcast(&mut self, host: &mut dyn Host, signal: &Signal) {
        let mut ctx = Context::new(host, &mut self.tracker, &mut self.ids, &mut self.rng, &mut self.queue);
        let units: [&mut dyn Unit; 3] = [&mut self.eye, &mut self.fist, &mut self.leg];
        for unit in units {
            unit.receive(signal, &mut ctx);
        }
    }

    /// Save survival statistics and, outside training, the parameter table.
    /// Failures only cost the next battle its tuning, so they are logged.
    fn persist(&self) {
        let Some(dir) = self.data_dir.as_deref() else {
            return;
        };
        log::info!("battle ended, saving to {}", dir.display());
        if let Err(e) = self.tracker.performance().save(&dir.join(PERFORMANCE_FILENAME)) {
            log::warn!("could not save opponent statistics: {e}");
        }
        if self.training {
            return;
        }
        if let Err(e) = self.table.save(&dir.join(CONFIG_FILENAME)) {
            log::warn!("could not save parameters: {e}");
        }
    }
}

fn load_parameters(dir: &Path) -> (ParameterTable, bool) {
    match ParameterTable::load(&dir.join(TRAINING_FILENAME)) {
        Ok(Some(table)) => return (table, true),
        Ok(None) => {}
        Err(e) => log::warn!("{e}; ignoring training table"),
    }
    match ParameterTable::load(&dir.join(CONFIG_FILENAME)) {
        Ok(Some(table)) => (table, false),
        Ok(None) => (ParameterTable::new(), false),
        Err(e) => {
            log::warn!("{e}; using default parameters");
            (ParameterTable::new(), false)
        }
    }
}

fn load_performance(dir: &Path) -> PerformanceTable {
    match PerformanceTable::load(&dir.join(PERFORMANCE_FILENAME)) {
        Ok(table) => table.unwrap_or_default(),
        Err(e) => {
            log::warn!("{e}; starting without opponent statistics");
            PerformanceTable::default()
        }
    }
}
