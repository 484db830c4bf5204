//! # Snail Dash Simulation Core
//!
//! Tap-rhythm locomotion simulation: discrete player taps become a
//! continuously evolving movement state (speed, travelled distance, an
//! energy resource) by judging how closely each tap matches a target
//! cadence.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SNAIL DASH CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── scalar.rs    - Float clamping and division guards       │
//! │  └── hash.rs      - State hashing for replay verification    │
//! │                                                              │
//! │  game/            - Simulation logic (pure, tick-driven)     │
//! │  ├── config.rs    - Tuning, validated at construction        │
//! │  ├── input.rs     - Per-tick taps and food pickups           │
//! │  ├── rhythm.rs    - Tap judgement, combo, smooth run         │
//! │  ├── energy.rs    - Bounded energy pool                      │
//! │  ├── movement.rs  - Deviation tiers, decay, distance         │
//! │  ├── tick.rs      - Simulation façade and tick ordering      │
//! │  ├── events.rs    - Notifications for collaborators          │
//! │  └── replay.rs    - Session recording and replay             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary
//!
//! Rendering, animation, audio, particles, camera work, collision
//! detection, and spawn scheduling are external collaborators. They feed
//! the core inputs (tap timestamps, food pickups, tick durations) through
//! the documented entry points and consume its outputs (speed, normalized
//! speed, energy, travelled distance, events). The core performs no I/O,
//! never blocks, and owns its state exclusively.
//!
//! ## Tick ordering
//!
//! Within one frame the order is fixed: resolve tap input, apply passive
//! decay, integrate distance. [`Simulation::step`] enforces it; callers
//! using the individual entry points must preserve it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::hash::{StateHash, StateHasher};
pub use game::config::{ConfigError, EnergyConfig, MovementConfig, RhythmConfig, SimConfig};
pub use game::events::{SimEvent, SimEventData};
pub use game::input::{FoodPickup, TickInput};
pub use game::replay::{FrameInput, RecordingError, ReplayOutcome, SessionRecording};
pub use game::rhythm::{RhythmEvaluator, RhythmState, NO_INTERVAL};
pub use game::tick::{Simulation, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal simulation tick rate of the demo driver (Hz). The core itself is
/// `dt`-driven and works at any rate.
pub const DEFAULT_TICK_RATE: u32 = 60;
