//! Core types and definitions for the Eureka behavior engine.
//!
//! This crate defines the vocabulary shared by the engine and its tools:
//! geometry, the command/event signals, the host boundary, tuning
//! parameters and constants. It contains no decision logic.

pub mod commands;
pub mod constants;
pub mod error;
pub mod events;
pub mod host;
pub mod params;
pub mod tuning;
pub mod types;

#[doc(hidden)]
pub use log as __log;
