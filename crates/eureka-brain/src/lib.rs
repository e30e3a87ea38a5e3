//! Behavior engine for the Eureka robot.
//!
//! A coordinator (`Brain`) and three units (radar, gun, drive) react to host
//! events over an ordered signal queue. Long-running actuator work is tracked
//! as one pending operation per unit.

pub mod brain;
pub mod config;
pub mod danger;
pub mod operation;
pub mod prediction;
pub mod tracker;
pub mod units;

pub use brain::Brain;
pub use config::{BrainConfig, BrainSettings};
pub use eureka_core as core;

#[cfg(test)]
mod testing;
