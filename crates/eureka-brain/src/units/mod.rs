//! The three actuator units and the context they run in.
//!
//! Each unit sees every signal on the bus, in dispatch order. Units never call
//! each other; they talk to the host through `Context::host` and to the rest of
//! the engine by emitting derived events.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;

use eureka_core::events::{Event, Signal};
use eureka_core::host::{Host, OperationIds};

use crate::tracker::OpponentTracker;

pub mod eye;
pub mod fist;
pub mod leg;

/// Everything a unit may touch while handling one signal.
pub struct Context<'a> {
    pub host: &'a mut dyn Host,
    pub tracker: &'a mut OpponentTracker,
    pub ids: &'a mut OperationIds,
    pub rng: &'a mut ChaCha8Rng,
    outbox: &'a mut VecDeque<Event>,
}

impl<'a> Context<'a> {
    pub fn new(
        host: &'a mut dyn Host,
        tracker: &'a mut OpponentTracker,
        ids: &'a mut OperationIds,
        rng: &'a mut ChaCha8Rng,
        outbox: &'a mut VecDeque<Event>,
    ) -> Self {
        Self {
            host,
            tracker,
            ids,
            rng,
            outbox,
        }
    }

    /// Queue a derived event behind everything already pending.
    pub fn emit(&mut self, event: Event) {
        log::trace!("emit {}", event.label());
        self.outbox.push_back(event);
    }
}

/// A subscriber on the signal bus.
pub trait Unit {
    /// Handle one command or event.
    fn receive(&mut self, signal: &Signal, ctx: &mut Context<'_>);

    /// Forget per-round state at the start of a round.
    fn reset(&mut self);
}
