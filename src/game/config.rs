//! Simulation Configuration
//!
//! All gameplay tuning lives here. Values are loaded once at construction
//! and immutable afterwards; `Simulation::new` rejects invalid values with a
//! [`ConfigError`] instead of tolerating them mid-run.
//!
//! Percentage knobs are expressed on a 0-100 scale and converted to
//! fractions at their use sites.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Configuration constraint violation, reported at construction time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field that must be strictly positive was zero or negative.
    #[error("{field} must be > 0")]
    NotPositive {
        /// Offending field name.
        field: &'static str,
    },

    /// A field that must be non-negative was negative.
    #[error("{field} must be >= 0")]
    Negative {
        /// Offending field name.
        field: &'static str,
    },

    /// A count field that must be at least 1 was 0.
    #[error("{field} must be >= 1")]
    BelowOne {
        /// Offending field name.
        field: &'static str,
    },
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field })
    }
}

fn require_at_least_one(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ConfigError::BelowOne { field })
    }
}

// =============================================================================
// RHYTHM
// =============================================================================

/// Configuration for tap-timing judgement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    /// Target interval between taps in seconds.
    pub target_interval: f32,

    /// On-beat tolerance as a fraction of the target interval.
    pub allowed_deviation_fraction: f32,

    /// Upper bound for the combo counter.
    pub combo_cap: u32,

    /// Consecutive on-beat taps required to enter a smooth run.
    pub smooth_run_combo_requirement: u32,

    /// Speed multiplier for an on-beat tap.
    pub on_beat_multiplier: f32,

    /// Speed multiplier for an off-beat tap.
    pub off_beat_multiplier: f32,

    /// Additional multiplier while in a smooth run.
    pub smooth_run_bonus_multiplier: f32,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            target_interval: 0.5,
            allowed_deviation_fraction: 0.12,
            combo_cap: 99,
            smooth_run_combo_requirement: 3,
            on_beat_multiplier: 1.08,
            off_beat_multiplier: 0.92,
            smooth_run_bonus_multiplier: 0.12,
        }
    }
}

impl RhythmConfig {
    /// Validate all constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("target_interval", self.target_interval)?;
        require_positive("allowed_deviation_fraction", self.allowed_deviation_fraction)?;
        require_at_least_one("combo_cap", self.combo_cap)?;
        require_at_least_one("smooth_run_combo_requirement", self.smooth_run_combo_requirement)?;
        require_non_negative("on_beat_multiplier", self.on_beat_multiplier)?;
        require_non_negative("off_beat_multiplier", self.off_beat_multiplier)?;
        require_non_negative("smooth_run_bonus_multiplier", self.smooth_run_bonus_multiplier)?;
        Ok(())
    }
}

// =============================================================================
// MOVEMENT
// =============================================================================

/// Configuration for tap acceleration, deviation tiers, and passive decay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Speed gained per tap (units/second).
    pub tap_acceleration: f32,

    /// Extra speed per tap while in a smooth run.
    pub smooth_run_bonus: f32,

    /// Speed ceiling (units/second).
    pub max_speed: f32,

    /// Passive decay rate with no rhythm momentum (units/second^2).
    pub base_decay: f32,

    /// Passive decay rate with full rhythm momentum (units/second^2).
    pub smooth_decay: f32,

    /// Energy charged for a tap before tier adjustments.
    pub base_tap_energy_cost: f32,

    /// Fast-tap deviation magnitude (percent) covered by the linear ramp.
    pub slight_fast_threshold_percent: f32,

    /// Speed bonus (percent) at the top of the slight-fast ramp.
    pub slight_fast_max_speed_increase_percent: f32,

    /// Energy surcharge (percent) at the top of the slight-fast ramp.
    pub slight_fast_max_energy_increase_percent: f32,

    /// Flat speed bonus (percent) beyond the slight-fast threshold.
    pub very_fast_speed_increase_percent: f32,

    /// Flat energy surcharge (percent) beyond the slight-fast threshold.
    pub very_fast_energy_increase_percent: f32,

    /// Slow-tap deviation (percent) at which the energy relief saturates.
    pub slow_energy_reduction_threshold_percent: f32,

    /// Maximum energy relief (percent) for slow taps.
    pub slow_max_energy_reduction_percent: f32,

    /// Speed penalty (percent) per percent of slow deviation.
    pub slow_speed_drop_per_percent: f32,

    /// Floor applied to the speed bonus of a food pickup.
    pub minimum_guaranteed_food_bonus: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            tap_acceleration: 1.2,
            smooth_run_bonus: 0.6,
            max_speed: 8.0,
            base_decay: 2.4,
            smooth_decay: 0.8,
            base_tap_energy_cost: 4.0,
            slight_fast_threshold_percent: 15.0,
            slight_fast_max_speed_increase_percent: 10.0,
            slight_fast_max_energy_increase_percent: 20.0,
            very_fast_speed_increase_percent: 15.0,
            very_fast_energy_increase_percent: 35.0,
            slow_energy_reduction_threshold_percent: 10.0,
            slow_max_energy_reduction_percent: 5.0,
            slow_speed_drop_per_percent: 0.5,
            minimum_guaranteed_food_bonus: 0.5,
        }
    }
}

impl MovementConfig {
    /// Validate all constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("max_speed", self.max_speed)?;
        require_non_negative("tap_acceleration", self.tap_acceleration)?;
        require_non_negative("smooth_run_bonus", self.smooth_run_bonus)?;
        require_non_negative("base_decay", self.base_decay)?;
        require_non_negative("smooth_decay", self.smooth_decay)?;
        require_non_negative("base_tap_energy_cost", self.base_tap_energy_cost)?;
        require_non_negative(
            "slight_fast_threshold_percent",
            self.slight_fast_threshold_percent,
        )?;
        require_non_negative(
            "slight_fast_max_speed_increase_percent",
            self.slight_fast_max_speed_increase_percent,
        )?;
        require_non_negative(
            "slight_fast_max_energy_increase_percent",
            self.slight_fast_max_energy_increase_percent,
        )?;
        require_non_negative(
            "very_fast_speed_increase_percent",
            self.very_fast_speed_increase_percent,
        )?;
        require_non_negative(
            "very_fast_energy_increase_percent",
            self.very_fast_energy_increase_percent,
        )?;
        require_non_negative(
            "slow_energy_reduction_threshold_percent",
            self.slow_energy_reduction_threshold_percent,
        )?;
        require_non_negative(
            "slow_max_energy_reduction_percent",
            self.slow_max_energy_reduction_percent,
        )?;
        require_non_negative("slow_speed_drop_per_percent", self.slow_speed_drop_per_percent)?;
        require_non_negative(
            "minimum_guaranteed_food_bonus",
            self.minimum_guaranteed_food_bonus,
        )?;
        Ok(())
    }
}

// =============================================================================
// ENERGY
// =============================================================================

/// Configuration for the energy pool.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Energy capacity; the pool starts full.
    pub max_energy: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self { max_energy: 100.0 }
    }
}

impl EnergyConfig {
    /// Validate all constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("max_energy", self.max_energy)
    }
}

// =============================================================================
// TOP-LEVEL
// =============================================================================

/// Complete simulation configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Tap-timing judgement tuning.
    pub rhythm: RhythmConfig,
    /// Movement and deviation-tier tuning.
    pub movement: MovementConfig,
    /// Energy pool tuning.
    pub energy: EnergyConfig,
}

impl SimConfig {
    /// Validate all sub-configurations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rhythm.validate()?;
        self.movement.validate()?;
        self.energy.validate()?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_max_speed_rejected() {
        let mut config = SimConfig::default();
        config.movement.max_speed = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "max_speed" })
        );
    }

    #[test]
    fn test_negative_percentage_rejected() {
        let mut config = SimConfig::default();
        config.movement.slow_speed_drop_per_percent = -0.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "slow_speed_drop_per_percent"
            })
        );
    }

    #[test]
    fn test_zero_smooth_run_requirement_rejected() {
        let mut config = SimConfig::default();
        config.rhythm.smooth_run_combo_requirement = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BelowOne {
                field: "smooth_run_combo_requirement"
            })
        );
    }

    #[test]
    fn test_zero_max_energy_rejected() {
        let mut config = SimConfig::default();
        config.energy.max_energy = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "max_energy" })
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        // The demo binary accepts sparse overrides; missing fields keep
        // their defaults.
        let config: SimConfig =
            serde_json::from_str(r#"{"rhythm": {"target_interval": 0.4}}"#).unwrap();
        assert_eq!(config.rhythm.target_interval, 0.4);
        assert_eq!(
            config.rhythm.allowed_deviation_fraction,
            RhythmConfig::default().allowed_deviation_fraction
        );
        assert_eq!(config.movement, MovementConfig::default());
    }
}
