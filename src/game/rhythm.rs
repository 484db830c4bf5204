//! Rhythm Judgement
//!
//! Converts the stream of tap timestamps into rhythm metrics: measured
//! interval, accuracy against the target cadence, combo count, smooth-run
//! state, and a speed multiplier. Also estimates how much rhythm momentum
//! remains for the passive-decay path.
//!
//! The evaluator has no knowledge of movement or energy; it only judges
//! timing.

use serde::{Serialize, Deserialize};

use crate::core::scalar::{clamp01, guard_denominator};
use crate::game::config::RhythmConfig;

/// Sentinel interval for "no previous tap".
pub const NO_INTERVAL: f32 = -1.0;

/// Grace window for retention, as a multiple of the target interval.
const GRACE_WINDOW_FACTOR: f32 = 1.1;

/// Retention reaches 0 at this multiple of the target interval.
const FULL_FALLOFF_FACTOR: f32 = 3.0;

/// Retention inside the grace window when the last tap missed the beat.
const OFF_BEAT_GRACE_RETENTION: f32 = 0.5;

// =============================================================================
// RHYTHM STATE
// =============================================================================

/// Immutable snapshot of the rhythm judgement for one tap.
///
/// Replaced wholesale on every tap; collaborators receive copies and can
/// never alias evaluator-owned storage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RhythmState {
    /// Consecutive on-beat tap count (>= 1 once a tap has been judged).
    pub combo: u32,

    /// Measured interval since the previous tap in seconds, or
    /// [`NO_INTERVAL`] when this was the first tap.
    pub interval: f32,

    /// Timing accuracy in [0, 1]; 1.0 means dead on the beat.
    pub accuracy: f32,

    /// Whether the tap landed within tolerance of the target interval.
    pub on_beat: bool,

    /// Whether the player is in a smooth run.
    pub in_smooth_run: bool,

    /// Speed multiplier earned by this tap.
    pub speed_multiplier: f32,
}

impl Default for RhythmState {
    /// The "never tapped" snapshot.
    fn default() -> Self {
        Self {
            combo: 0,
            interval: NO_INTERVAL,
            accuracy: 0.0,
            on_beat: false,
            in_smooth_run: false,
            speed_multiplier: 0.0,
        }
    }
}

// =============================================================================
// RHYTHM EVALUATOR
// =============================================================================

/// Judges tap timing against the configured target cadence.
#[derive(Clone, Debug)]
pub struct RhythmEvaluator {
    config: RhythmConfig,
    last_tap_time: Option<f32>,
    combo: u32,
    state: RhythmState,
}

impl RhythmEvaluator {
    /// Create an evaluator that has seen no taps.
    pub fn new(config: RhythmConfig) -> Self {
        Self {
            config,
            last_tap_time: None,
            combo: 0,
            state: RhythmState::default(),
        }
    }

    /// Judge a tap at `tap_time` (seconds, monotonic clock) and return the
    /// new snapshot.
    ///
    /// The first tap ever is always on-beat with accuracy 1.0 so motion can
    /// start; a tap stamped earlier than its predecessor is clamped to a
    /// zero interval.
    pub fn register_tap(&mut self, tap_time: f32) -> RhythmState {
        let was_in_smooth_run = self.state.in_smooth_run;

        let (interval, on_beat, accuracy) = match self.last_tap_time {
            None => (NO_INTERVAL, true, 1.0),
            Some(previous) => {
                let interval = (tap_time - previous).max(0.0);
                let tolerance = guard_denominator(
                    self.config.target_interval * self.config.allowed_deviation_fraction,
                );
                let deviation = (interval - self.config.target_interval).abs();
                let on_beat = deviation <= tolerance;
                let accuracy = clamp01(1.0 - deviation / tolerance);
                (interval, on_beat, accuracy)
            }
        };

        if on_beat {
            self.combo = (self.combo + 1).min(self.config.combo_cap);
        } else {
            self.combo = 1;
        }

        let in_smooth_run = on_beat && self.combo >= self.config.smooth_run_combo_requirement;

        // Dropping out of a smooth run wipes any residual combo.
        if was_in_smooth_run && !in_smooth_run {
            self.combo = 1;
        }

        let mut speed_multiplier = if on_beat {
            self.config.on_beat_multiplier
        } else {
            self.config.off_beat_multiplier
        };
        if in_smooth_run {
            speed_multiplier += self.config.smooth_run_bonus_multiplier;
        }

        self.state = RhythmState {
            combo: self.combo,
            interval,
            accuracy,
            on_beat,
            in_smooth_run,
            speed_multiplier,
        };
        self.last_tap_time = Some(tap_time);

        self.state
    }

    /// Estimate how much rhythm momentum remains at `now`, in [0, 1].
    ///
    /// 0 before any tap. Inside the grace window (`target * 1.1` after the
    /// last tap) returns 1.0 for an on-beat tap and 0.5 otherwise; beyond it,
    /// falls off linearly to 0 at `target * 3`.
    pub fn retention_factor(&self, now: f32) -> f32 {
        let Some(last_tap) = self.last_tap_time else {
            return 0.0;
        };

        let since = (now - last_tap).max(0.0);
        let grace = self.config.target_interval * GRACE_WINDOW_FACTOR;
        if since <= grace {
            return if self.state.on_beat {
                1.0
            } else {
                OFF_BEAT_GRACE_RETENTION
            };
        }

        let falloff_end = self.config.target_interval * FULL_FALLOFF_FACTOR;
        let span = guard_denominator(falloff_end - grace);
        clamp01((falloff_end - since) / span)
    }

    /// Clear combo, smooth-run state, and the last-tap time.
    ///
    /// The next tap is treated as a first tap and will set the combo to 1.
    pub fn reset(&mut self) {
        self.last_tap_time = None;
        self.combo = 0;
        self.state = RhythmState::default();
    }

    /// Latest rhythm snapshot (the default snapshot before any tap).
    pub fn current_state(&self) -> RhythmState {
        self.state
    }

    /// Configured target interval in seconds.
    pub fn target_interval(&self) -> f32 {
        self.config.target_interval
    }

    /// Timestamp of the most recent tap, if any.
    pub fn last_tap_time(&self) -> Option<f32> {
        self.last_tap_time
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> RhythmEvaluator {
        RhythmEvaluator::new(RhythmConfig::default())
    }

    #[test]
    fn test_first_tap_bootstraps() {
        let mut rhythm = evaluator();
        let state = rhythm.register_tap(0.0);

        assert!(state.on_beat);
        assert_eq!(state.accuracy, 1.0);
        assert_eq!(state.interval, NO_INTERVAL);
        assert_eq!(state.combo, 1);
        assert!(!state.in_smooth_run);
    }

    #[test]
    fn test_perfect_cadence_builds_combo_and_smooth_run() {
        // target 0.5s, smooth run at combo 3: taps at 0.0, 0.5, 1.0
        let mut rhythm = evaluator();

        let first = rhythm.register_tap(0.0);
        assert_eq!((first.combo, first.on_beat, first.in_smooth_run), (1, true, false));

        let second = rhythm.register_tap(0.5);
        assert_eq!((second.combo, second.on_beat, second.in_smooth_run), (2, true, false));
        assert_eq!(second.interval, 0.5);
        assert!(second.accuracy > 0.99);

        let third = rhythm.register_tap(1.0);
        assert_eq!((third.combo, third.on_beat, third.in_smooth_run), (3, true, true));
    }

    #[test]
    fn test_off_beat_resets_combo_to_one() {
        let mut rhythm = evaluator();
        rhythm.register_tap(0.0);
        rhythm.register_tap(0.5);

        // Way past tolerance (0.5 * 0.12 = 0.06)
        let state = rhythm.register_tap(1.4);
        assert!(!state.on_beat);
        assert_eq!(state.combo, 1);
        assert_eq!(state.accuracy, 0.0);
        assert!(!state.in_smooth_run);
    }

    #[test]
    fn test_accuracy_scales_inside_tolerance() {
        let mut rhythm = evaluator();
        rhythm.register_tap(0.0);

        // Deviation 0.03 of tolerance 0.06 -> accuracy 0.5
        let state = rhythm.register_tap(0.53);
        assert!(state.on_beat);
        assert!((state.accuracy - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_combo_caps() {
        let config = RhythmConfig {
            combo_cap: 3,
            ..RhythmConfig::default()
        };
        let mut rhythm = RhythmEvaluator::new(config);

        for i in 0..6 {
            rhythm.register_tap(i as f32 * 0.5);
        }
        assert_eq!(rhythm.current_state().combo, 3);
    }

    #[test]
    fn test_leaving_smooth_run_wipes_combo() {
        let mut rhythm = evaluator();
        for i in 0..4 {
            rhythm.register_tap(i as f32 * 0.5);
        }
        assert!(rhythm.current_state().in_smooth_run);
        assert_eq!(rhythm.current_state().combo, 4);

        let state = rhythm.register_tap(3.0);
        assert!(!state.in_smooth_run);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_speed_multiplier_composition() {
        let config = RhythmConfig::default();
        let mut rhythm = RhythmEvaluator::new(config);

        let first = rhythm.register_tap(0.0);
        assert_eq!(first.speed_multiplier, config.on_beat_multiplier);

        rhythm.register_tap(0.5);
        let third = rhythm.register_tap(1.0);
        assert!(third.in_smooth_run);
        assert_eq!(
            third.speed_multiplier,
            config.on_beat_multiplier + config.smooth_run_bonus_multiplier
        );

        let off = rhythm.register_tap(3.0);
        assert_eq!(off.speed_multiplier, config.off_beat_multiplier);
    }

    #[test]
    fn test_backwards_timestamp_clamps_to_zero_interval() {
        let mut rhythm = evaluator();
        rhythm.register_tap(1.0);

        let state = rhythm.register_tap(0.2);
        assert_eq!(state.interval, 0.0);
        assert!(!state.on_beat);
    }

    #[test]
    fn test_retention_before_any_tap_is_zero() {
        let rhythm = evaluator();
        assert_eq!(rhythm.retention_factor(10.0), 0.0);
    }

    #[test]
    fn test_retention_grace_window() {
        let mut rhythm = evaluator();
        rhythm.register_tap(0.0);
        rhythm.register_tap(0.5); // on-beat

        // Inside grace window (0.55s after last tap)
        assert_eq!(rhythm.retention_factor(1.0), 1.0);

        // Off-beat tap gets partial retention inside the window
        let mut rhythm = evaluator();
        rhythm.register_tap(0.0);
        rhythm.register_tap(1.4); // off-beat
        assert_eq!(rhythm.retention_factor(1.5), OFF_BEAT_GRACE_RETENTION);
    }

    #[test]
    fn test_retention_falloff_and_floor() {
        let mut rhythm = evaluator();
        rhythm.register_tap(0.0);

        // target 0.5: grace ends at 0.55, hits zero at 1.5.
        let mid = rhythm.retention_factor(1.025); // halfway through falloff
        assert!((mid - 0.5).abs() < 1e-3);

        assert_eq!(rhythm.retention_factor(1.5), 0.0);
        assert_eq!(rhythm.retention_factor(20.0), 0.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut rhythm = evaluator();
        for i in 0..4 {
            rhythm.register_tap(i as f32 * 0.5);
        }

        rhythm.reset();
        assert_eq!(rhythm.current_state(), RhythmState::default());
        assert_eq!(rhythm.last_tap_time(), None);
        assert_eq!(rhythm.retention_factor(100.0), 0.0);

        // Next tap bootstraps again
        let state = rhythm.register_tap(100.0);
        assert_eq!(state.combo, 1);
        assert!(state.on_beat);
        assert_eq!(state.interval, NO_INTERVAL);
    }
}
