//! Simulation Events
//!
//! Notifications generated during simulation for UI, effects, and scoring
//! collaborators. Events accumulate inside the simulation during a tick and
//! are drained into [`TickResult`](crate::game::tick::TickResult); consumers
//! subscribe by polling the drained list rather than registering callbacks,
//! so the core never depends on collaborator types.

use serde::{Serialize, Deserialize};

use crate::game::input::FoodPickup;
use crate::game::rhythm::RhythmState;

/// Event payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEventData {
    /// A tap was judged and the rhythm snapshot was replaced.
    RhythmUpdated {
        /// The new rhythm snapshot.
        state: RhythmState,
    },

    /// The energy pool actually changed value.
    EnergyChanged {
        /// Energy after the change.
        current: f32,
        /// Pool capacity.
        max: f32,
    },

    /// A positive spend was requested, whether or not the pool moved.
    /// Spend-rate trackers (rolling-window UI) consume this.
    EnergySpent {
        /// Requested spend amount.
        amount: f32,
    },

    /// A food item was consumed.
    FoodConsumed {
        /// The item as reported by the collision collaborator.
        pickup: FoodPickup,
        /// Bonus actually applied after the guaranteed minimum.
        granted_bonus: f32,
        /// Speed after the bonus was applied.
        speed_after: f32,
    },

    /// Passive decay drove the speed down to exactly 0.
    /// Animation and trail feedback key off this edge.
    CameToRest,
}

/// A simulation event with the tick it occurred on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Tick when the event occurred.
    pub tick: u64,

    /// Event payload.
    pub data: SimEventData,
}

impl SimEvent {
    /// Create a new event.
    pub const fn new(tick: u64, data: SimEventData) -> Self {
        Self { tick, data }
    }

    /// Create a rhythm-updated event.
    pub const fn rhythm_updated(tick: u64, state: RhythmState) -> Self {
        Self::new(tick, SimEventData::RhythmUpdated { state })
    }

    /// Create an energy-changed event.
    pub const fn energy_changed(tick: u64, current: f32, max: f32) -> Self {
        Self::new(tick, SimEventData::EnergyChanged { current, max })
    }

    /// Create an energy-spent event.
    pub const fn energy_spent(tick: u64, amount: f32) -> Self {
        Self::new(tick, SimEventData::EnergySpent { amount })
    }

    /// Create a food-consumed event.
    pub const fn food_consumed(
        tick: u64,
        pickup: FoodPickup,
        granted_bonus: f32,
        speed_after: f32,
    ) -> Self {
        Self::new(
            tick,
            SimEventData::FoodConsumed {
                pickup,
                granted_bonus,
                speed_after,
            },
        )
    }

    /// Create a came-to-rest event.
    pub const fn came_to_rest(tick: u64) -> Self {
        Self::new(tick, SimEventData::CameToRest)
    }
}

// =============================================================================
// TESTS
// =============================================================================
