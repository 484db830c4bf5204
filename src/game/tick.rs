//! Simulation Tick Orchestration
//!
//! [`Simulation`] owns the three core components and enforces the fixed
//! intra-tick ordering:
//!
//! 1. resolve tap input (rhythm judgement, acceleration, energy charge)
//! 2. apply passive decay
//! 3. integrate travelled distance
//!
//! Reversing (1) and (2) changes observable speed, because decay would bite
//! before the tap's acceleration lands. External collaborators either call
//! the individual entry points in that order or use [`Simulation::step`],
//! which applies at most one tap and one food pickup before ticking.

use crate::core::hash::{compute_state_hash, StateHash};
use crate::game::config::{ConfigError, SimConfig};
use crate::game::energy::EnergyLedger;
use crate::game::events::SimEvent;
use crate::game::input::TickInput;
use crate::game::movement::MovementSimulator;
use crate::game::rhythm::{RhythmEvaluator, RhythmState};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated since the previous tick (input events included).
    pub events: Vec<SimEvent>,

    /// Whether passive decay drove the speed to exactly 0 this tick.
    pub came_to_rest: bool,
}

/// The tap-rhythm locomotion simulation.
///
/// Single-threaded and tick-driven; nothing here suspends or blocks.
/// Collaborators push inputs through the documented entry points and read
/// outputs through accessors or the drained event list.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    rhythm: RhythmEvaluator,
    movement: MovementSimulator,
    energy: EnergyLedger,
    clock: f32,
    tick: u64,
    pending_events: Vec<SimEvent>,
}

impl Simulation {
    /// Create a simulation from validated configuration.
    ///
    /// Constraint violations (`max_speed <= 0`, negative percentages, ...)
    /// are rejected here; nothing is tolerated mid-run.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            rhythm: RhythmEvaluator::new(config.rhythm),
            movement: MovementSimulator::new(config.movement, config.rhythm.target_interval),
            energy: EnergyLedger::new(&config.energy),
            clock: 0.0,
            tick: 0,
            pending_events: Vec::new(),
        })
    }

    /// Register a detected tap.
    ///
    /// Judges the tap, applies acceleration and the deviation tiers, and
    /// charges the energy ledger. Returns the fresh rhythm snapshot; the
    /// same snapshot is queued as a `RhythmUpdated` event.
    pub fn register_tap(&mut self, tap_time: f32) -> RhythmState {
        let state = self.rhythm.register_tap(tap_time);
        self.pending_events
            .push(SimEvent::rhythm_updated(self.tick, state));

        self.movement.on_tap(
            tap_time,
            &state,
            &mut self.energy,
            self.tick,
            &mut self.pending_events,
        );

        state
    }

    /// Consume a food item reported by the collision collaborator.
    pub fn on_food_pickup(&mut self, pickup: crate::game::input::FoodPickup) {
        self.movement
            .on_food_pickup(pickup, self.tick, &mut self.pending_events);
    }

    /// Refund energy (pickup/regeneration collaborators).
    pub fn restore_energy(&mut self, amount: f32) {
        self.energy
            .restore(amount, self.tick, &mut self.pending_events);
    }

    /// Advance the simulation by `dt` seconds: passive decay, then distance
    /// integration. Drains and returns the events accumulated since the
    /// previous tick.
    ///
    /// `dt <= 0` is a no-op that returns an empty result.
    pub fn tick(&mut self, dt: f32) -> TickResult {
        if dt <= 0.0 {
            return TickResult::default();
        }

        self.tick += 1;
        self.clock += dt;

        let retention = self.rhythm.retention_factor(self.clock);
        let came_to_rest = self.movement.apply_decay(dt, retention);
        if came_to_rest {
            self.pending_events.push(SimEvent::came_to_rest(self.tick));
        }

        self.movement.integrate(dt);

        TickResult {
            events: std::mem::take(&mut self.pending_events),
            came_to_rest,
        }
    }

    /// Apply one frame of resolved input, then tick.
    ///
    /// Input is applied in the required order: tap first, food pickup
    /// second, decay and integration last.
    pub fn step(&mut self, dt: f32, input: TickInput) -> TickResult {
        if let Some(tap_time) = input.tap {
            self.register_tap(tap_time);
        }
        if let Some(pickup) = input.food {
            self.on_food_pickup(pickup);
        }
        self.tick(dt)
    }

    /// Return to the initial state: speed 0, distance 0, energy full,
    /// rhythm cleared. Pending events are dropped.
    pub fn reset(&mut self) {
        self.rhythm.reset();
        self.movement.reset();
        self.energy.refill();
        self.clock = 0.0;
        self.tick = 0;
        self.pending_events.clear();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Current speed (units/second).
    pub fn current_speed(&self) -> f32 {
        self.movement.current_speed()
    }

    /// Current speed as a fraction of `max_speed`; 0 when the ceiling is ~0.
    pub fn normalised_speed(&self) -> f32 {
        self.movement.normalised_speed()
    }

    /// Total travelled distance.
    pub fn travelled_distance(&self) -> f32 {
        self.movement.travelled_distance()
    }

    /// Current energy.
    pub fn current_energy(&self) -> f32 {
        self.energy.current()
    }

    /// Current energy as a fraction of capacity.
    pub fn normalised_energy(&self) -> f32 {
        self.energy.normalised()
    }

    /// Latest rhythm snapshot.
    pub fn rhythm_state(&self) -> RhythmState {
        self.rhythm.current_state()
    }

    /// Configured target tap interval.
    pub fn target_interval(&self) -> f32 {
        self.rhythm.target_interval()
    }

    /// Ticks elapsed since start (or the last reset).
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Simulation clock in seconds.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// The configuration this simulation was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Hash the observable state for replay verification.
    pub fn state_hash(&self) -> StateHash {
        let rhythm = self.rhythm.current_state();
        let snail = self.movement.state();

        compute_state_hash(self.tick, |hasher| {
            hasher.update_f32(self.clock);
            hasher.update_f32(snail.current_speed);
            hasher.update_f32(snail.travelled_distance);
            hasher.update_opt_f32(snail.last_tap_time);
            hasher.update_f32(self.energy.current());
            hasher.update_u32(rhythm.combo);
            hasher.update_f32(rhythm.interval);
            hasher.update_f32(rhythm.accuracy);
            hasher.update_bool(rhythm.on_beat);
            hasher.update_bool(rhythm.in_smooth_run);
            hasher.update_f32(rhythm.speed_multiplier);
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
