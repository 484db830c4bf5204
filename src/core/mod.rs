//! Core deterministic primitives.
//!
//! Numeric policy helpers and state hashing. Everything here is pure and
//! side-effect free; the simulation in `game/` builds on these.

pub mod scalar;
pub mod hash;

// Re-export core types
pub use scalar::{clamp01, lerp, DENOM_EPSILON, STOP_EPSILON};
pub use hash::{StateHash, StateHasher, compute_state_hash};
