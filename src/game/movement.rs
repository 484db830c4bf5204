//! Movement Simulation
//!
//! Translates rhythm metrics into speed changes, charges energy for taps,
//! applies passive decay, and integrates travelled distance.
//!
//! The deviation-tier policy lives here: how far the measured tap interval
//! sits from the target cadence decides both the speed adjustment and the
//! energy price of the tap. Speed and energy are clamped after every
//! mutation; no transient out-of-bound value is ever observable.

use serde::{Serialize, Deserialize};

use crate::core::scalar::{clamp01, guard_denominator, lerp, percent, STOP_EPSILON};
use crate::game::config::MovementConfig;
use crate::game::energy::EnergyLedger;
use crate::game::events::SimEvent;
use crate::game::input::FoodPickup;
use crate::game::rhythm::{RhythmState, NO_INTERVAL};

/// Locomotion state of the snail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnailState {
    /// Current speed in [0, max_speed].
    pub current_speed: f32,

    /// Total distance travelled; never decreases.
    pub travelled_distance: f32,

    /// Timestamp of the last tap that accelerated the snail.
    pub last_tap_time: Option<f32>,
}

/// Speed and cost adjustments derived from one tap's deviation.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TapAdjustment {
    /// Combined rhythm and tier multiplier applied to speed.
    speed_multiplier: f32,

    /// Multiplicative slow-tap penalty in [0, 1].
    penalty_multiplier: f32,

    /// Energy charged for the tap.
    energy_cost: f32,
}

/// Owns the snail's speed and distance; driven by rhythm snapshots.
#[derive(Clone, Debug)]
pub struct MovementSimulator {
    config: MovementConfig,
    target_interval: f32,
    state: SnailState,
}

impl MovementSimulator {
    /// Create a stationary simulator.
    ///
    /// `target_interval` is shared with the rhythm evaluator; the tier
    /// policy needs it to express deviation as a percentage.
    pub fn new(config: MovementConfig, target_interval: f32) -> Self {
        Self {
            config,
            target_interval,
            state: SnailState::default(),
        }
    }

    /// Apply a judged tap: accelerate, scale by the deviation tiers, and
    /// charge the energy ledger.
    pub fn on_tap(
        &mut self,
        tap_time: f32,
        rhythm: &RhythmState,
        ledger: &mut EnergyLedger,
        tick: u64,
        events: &mut Vec<SimEvent>,
    ) {
        let adjustment = self.tap_adjustment(rhythm);

        let mut acceleration = self.config.tap_acceleration;
        if rhythm.in_smooth_run {
            acceleration += self.config.smooth_run_bonus;
        }

        let mut speed = (self.state.current_speed + acceleration).min(self.config.max_speed);
        speed = (speed * adjustment.speed_multiplier).min(self.config.max_speed);
        speed *= adjustment.penalty_multiplier;
        self.state.current_speed = self.clamp_speed(speed);
        self.state.last_tap_time = Some(tap_time);

        ledger.spend(adjustment.energy_cost.max(0.0), tick, events);
    }

    /// Apply passive decay for `dt` seconds.
    ///
    /// `retention` in [0, 1] blends the decay rate from `base_decay` (cold)
    /// to `smooth_decay` (full rhythm momentum). Returns `true` when this
    /// call drove the speed down to exactly 0.
    pub fn apply_decay(&mut self, dt: f32, retention: f32) -> bool {
        if self.state.current_speed <= 0.0 {
            return false;
        }

        let decay_rate = lerp(self.config.base_decay, self.config.smooth_decay, retention);
        let mut speed = (self.state.current_speed - decay_rate * dt).max(0.0);

        let came_to_rest = speed <= STOP_EPSILON;
        if came_to_rest {
            speed = 0.0;
        }
        self.state.current_speed = speed;

        came_to_rest
    }

    /// Advance travelled distance by `speed * dt`.
    pub fn integrate(&mut self, dt: f32) {
        if self.state.current_speed > 0.0 {
            self.state.travelled_distance += self.state.current_speed * dt;
        }
    }

    /// Consume a food item: add its speed bonus (never less than the
    /// configured guaranteed minimum) and notify collaborators.
    pub fn on_food_pickup(&mut self, pickup: FoodPickup, tick: u64, events: &mut Vec<SimEvent>) {
        let granted = pickup
            .speed_bonus
            .max(self.config.minimum_guaranteed_food_bonus);

        self.state.current_speed = self.clamp_speed(self.state.current_speed + granted);

        events.push(SimEvent::food_consumed(
            tick,
            pickup,
            granted,
            self.state.current_speed,
        ));
    }

    /// Current speed.
    pub fn current_speed(&self) -> f32 {
        self.state.current_speed
    }

    /// Current speed as a fraction of the ceiling; 0 when the ceiling is ~0.
    pub fn normalised_speed(&self) -> f32 {
        if self.config.max_speed <= crate::core::scalar::DENOM_EPSILON {
            0.0
        } else {
            self.state.current_speed / self.config.max_speed
        }
    }

    /// Total travelled distance.
    pub fn travelled_distance(&self) -> f32 {
        self.state.travelled_distance
    }

    /// Full state snapshot.
    pub fn state(&self) -> SnailState {
        self.state
    }

    /// Return to a standing start (speed 0, distance 0).
    pub fn reset(&mut self) {
        self.state = SnailState::default();
    }

    fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(0.0, self.config.max_speed)
    }

    /// Derive the tier adjustments for one tap.
    ///
    /// An on-beat tap (and the bootstrap first tap, which has no measured
    /// interval) skips tiering entirely: the rhythm multiplier is used as-is.
    /// Off-beat taps scale it by the tier and may take a slow-tap penalty.
    fn tap_adjustment(&self, rhythm: &RhythmState) -> TapAdjustment {
        let cfg = &self.config;
        let mut energy_cost = cfg.base_tap_energy_cost;
        let mut tier_multiplier = 1.0;
        let mut penalty_multiplier = 1.0;

        if !rhythm.on_beat && rhythm.interval > NO_INTERVAL {
            let target = guard_denominator(self.target_interval);
            let deviation_percent = (rhythm.interval - target) / target * 100.0;

            if deviation_percent < 0.0 {
                // Tapping faster than target.
                let magnitude = -deviation_percent;
                if magnitude <= cfg.slight_fast_threshold_percent {
                    // Ramp linearly up to the threshold.
                    let blend =
                        clamp01(magnitude / guard_denominator(cfg.slight_fast_threshold_percent));
                    tier_multiplier =
                        1.0 + percent(cfg.slight_fast_max_speed_increase_percent) * blend;
                    energy_cost *=
                        1.0 + percent(cfg.slight_fast_max_energy_increase_percent) * blend;
                } else {
                    // Flat tier: more speed at more cost, but it does not
                    // keep scaling with how much faster.
                    tier_multiplier = 1.0 + percent(cfg.very_fast_speed_increase_percent);
                    energy_cost *= 1.0 + percent(cfg.very_fast_energy_increase_percent);
                }
            } else {
                // Tapping slower than target: cheaper, but penalized.
                let reduction_factor = clamp01(
                    deviation_percent
                        / guard_denominator(cfg.slow_energy_reduction_threshold_percent),
                );
                energy_cost *=
                    1.0 - percent(cfg.slow_max_energy_reduction_percent) * reduction_factor;

                let speed_drop_percent = deviation_percent * cfg.slow_speed_drop_per_percent;
                penalty_multiplier = clamp01(1.0 - percent(speed_drop_percent));
            }
        }

        TapAdjustment {
            speed_multiplier: rhythm.speed_multiplier * tier_multiplier,
            penalty_multiplier,
            energy_cost,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
