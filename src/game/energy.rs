//! Energy Ledger
//!
//! A bounded energy pool with spend/restore and change notification.
//! No state machine; the interesting part is the notification policy:
//! `EnergyChanged` fires only when the value actually moved (tolerance
//! compare), `EnergySpent` fires for every positive spend request so
//! spend-rate trackers see charges even when the pool is already empty.

use crate::core::scalar::approx_eq;
use crate::game::config::EnergyConfig;
use crate::game::events::SimEvent;

/// Bounded energy accumulator. Starts full.
#[derive(Clone, Debug)]
pub struct EnergyLedger {
    max_energy: f32,
    current: f32,
}

impl EnergyLedger {
    /// Create a full pool.
    pub fn new(config: &EnergyConfig) -> Self {
        Self {
            max_energy: config.max_energy,
            current: config.max_energy,
        }
    }

    /// Deduct `amount` from the pool, clamping at 0.
    ///
    /// `amount <= 0` is a no-op and emits nothing.
    pub fn spend(&mut self, amount: f32, tick: u64, events: &mut Vec<SimEvent>) {
        if amount <= 0.0 {
            return;
        }

        let before = self.current;
        self.current = (self.current - amount).max(0.0);

        if !approx_eq(before, self.current) {
            events.push(SimEvent::energy_changed(tick, self.current, self.max_energy));
        }
        events.push(SimEvent::energy_spent(tick, amount));
    }

    /// Add `amount` to the pool, clamping at capacity.
    ///
    /// `amount <= 0` is a no-op; `EnergyChanged` follows the same
    /// actually-changed policy as [`spend`](Self::spend).
    pub fn restore(&mut self, amount: f32, tick: u64, events: &mut Vec<SimEvent>) {
        if amount <= 0.0 {
            return;
        }

        let before = self.current;
        self.current = (self.current + amount).min(self.max_energy);

        if !approx_eq(before, self.current) {
            events.push(SimEvent::energy_changed(tick, self.current, self.max_energy));
        }
    }

    /// Refill the pool to capacity without notification (explicit reset).
    pub fn refill(&mut self) {
        self.current = self.max_energy;
    }

    /// Current energy.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Pool capacity.
    pub fn max(&self) -> f32 {
        self.max_energy
    }

    /// Current energy as a fraction of capacity.
    pub fn normalised(&self) -> f32 {
        if self.max_energy <= 0.0 {
            0.0
        } else {
            self.current / self.max_energy
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
