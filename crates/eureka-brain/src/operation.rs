//! Pending-operation state machine shared by the units.
//!
//! Each actuator (radar, gun, drive) has at most one asynchronous operation in
//! flight. Starting a new one supersedes the old one; a completion only counts
//! when its correlator matches the operation currently pending.

use eureka_core::host::{Condition, ConditionKind, Host, OperationIds};

/// State of one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    Idle,
    Pending(Condition),
}

/// How a completion notification relates to the pending operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The notification matches the pending operation, which is now finished.
    Finished,
    /// Same actuator, but a superseded operation.
    Stale,
    /// Not for this actuator.
    Foreign,
}

impl Operation {
    /// Register a new operation of `kind`, replacing any pending one.
    pub fn start(&mut self, host: &mut dyn Host, ids: &mut OperationIds, kind: ConditionKind) -> Condition {
        self.cancel(host);
        let condition = Condition { id: ids.next(), kind };
        host.add_custom_event(condition);
        *self = Operation::Pending(condition);
        condition
    }

    /// Drop the pending operation. Returns whether one was pending.
    pub fn cancel(&mut self, host: &mut dyn Host) -> bool {
        match std::mem::take(self) {
            Operation::Pending(condition) => {
                host.remove_custom_event(condition);
                true
            }
            Operation::Idle => false,
        }
    }

    /// Match a host completion against this actuator.
    pub fn complete(&mut self, host: &mut dyn Host, kind: ConditionKind, condition: &Condition) -> Completion {
        if condition.kind != kind {
            return Completion::Foreign;
        }
        match *self {
            Operation::Pending(pending) if pending == *condition => {
                host.remove_custom_event(pending);
                *self = Operation::Idle;
                Completion::Finished
            }
            _ => {
                log::warn!("ignoring stale completion {:?} ({:?})", condition.id, condition.kind);
                Completion::Stale
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Operation::Pending(_))
    }
}
