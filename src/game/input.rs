//! Per-Tick Input Surface
//!
//! The input-polling collaborator resolves raw touches/clicks/keys and the
//! collision collaborator resolves pickups; the core sees at most one tap
//! and one food pickup per tick. Any coalescing of multiple raw taps into
//! one tick belongs to those collaborators, not here.

use serde::{Serialize, Deserialize};

/// A consumable picked up by the snail, as reported by the collision
/// collaborator. Echoed back in the `FoodConsumed` event as the item
/// descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodPickup {
    /// Speed bonus carried by the item (units/second).
    pub speed_bonus: f32,
}

impl FoodPickup {
    /// Create a pickup with the given speed bonus.
    pub const fn new(speed_bonus: f32) -> Self {
        Self { speed_bonus }
    }
}

/// Input resolved for a single simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Tap timestamp in seconds on the collaborator's monotonic clock,
    /// if a tap was detected this tick.
    pub tap: Option<f32>,

    /// Food pickup triggered this tick, if any.
    pub food: Option<FoodPickup>,
}

impl TickInput {
    /// An idle tick: no tap, no pickup.
    pub const fn idle() -> Self {
        Self {
            tap: None,
            food: None,
        }
    }

    /// A tick carrying a tap at the given timestamp.
    pub const fn tap(at: f32) -> Self {
        Self {
            tap: Some(at),
            food: None,
        }
    }

    /// Attach a food pickup to this tick.
    pub const fn with_food(mut self, pickup: FoodPickup) -> Self {
        self.food = Some(pickup);
        self
    }

    /// Check if this tick carries no input at all.
    pub const fn is_idle(&self) -> bool {
        self.tap.is_none() && self.food.is_none()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_detection() {
        assert!(TickInput::idle().is_idle());
        assert!(!TickInput::tap(1.0).is_idle());
        assert!(!TickInput::idle().with_food(FoodPickup::new(2.0)).is_idle());
    }

    #[test]
    fn test_tap_with_food() {
        let input = TickInput::tap(0.5).with_food(FoodPickup::new(1.5));
        assert_eq!(input.tap, Some(0.5));
        assert_eq!(input.food, Some(FoodPickup { speed_bonus: 1.5 }));
    }
}
