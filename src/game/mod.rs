//! Simulation Module
//!
//! The tap-rhythm locomotion core. Pure, synchronous, tick-driven.
//!
//! ## Module Structure
//!
//! - `config`: gameplay tuning, validated at construction
//! - `input`: per-tick input surface (taps, food pickups)
//! - `rhythm`: tap judgement, combo, smooth run, retention
//! - `energy`: bounded energy pool with notifications
//! - `movement`: acceleration, deviation tiers, decay, distance
//! - `tick`: the `Simulation` façade and intra-tick ordering
//! - `events`: notifications for UI/effects collaborators
//! - `replay`: session recording and deterministic replay

pub mod config;
pub mod input;
pub mod rhythm;
pub mod energy;
pub mod movement;
pub mod tick;
pub mod events;
pub mod replay;

// Re-export key types
pub use config::{ConfigError, EnergyConfig, MovementConfig, RhythmConfig, SimConfig};
pub use events::{SimEvent, SimEventData};
pub use input::{FoodPickup, TickInput};
pub use rhythm::{RhythmEvaluator, RhythmState, NO_INTERVAL};
pub use tick::{Simulation, TickResult};
