//! Session Recording and Replay
//!
//! Records the per-frame inputs of a play session together with the
//! configuration it ran under, so the whole session can be re-simulated
//! later and checked against the live run's state hash. The simulation is
//! pure over its inputs, so a replay reproduces it bit-for-bit.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::hash::StateHash;
use crate::game::config::{ConfigError, SimConfig};
use crate::game::events::SimEvent;
use crate::game::input::TickInput;
use crate::game::tick::Simulation;

/// Recording failure.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The recording could not be serialized.
    #[error("failed to encode session recording: {0}")]
    Encode(#[source] bincode::Error),

    /// The byte stream is not a valid recording.
    #[error("failed to decode session recording: {0}")]
    Decode(#[source] bincode::Error),

    /// The recording carries a configuration the simulation rejects.
    #[error("recording carries an invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// One frame of recorded input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Frame duration in seconds.
    pub dt: f32,

    /// Input resolved for the frame.
    pub input: TickInput,
}

/// A complete recorded session: configuration plus every frame of input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecording {
    /// Recording identifier.
    pub session_id: Uuid,

    /// Wall-clock time the recording started.
    pub recorded_at: DateTime<Utc>,

    /// Configuration the session ran under.
    pub config: SimConfig,

    /// Recorded frames in order.
    pub frames: Vec<FrameInput>,
}

/// Result of replaying a recording.
#[derive(Debug)]
pub struct ReplayOutcome {
    /// The simulation in its final state.
    pub simulation: Simulation,

    /// Every event the replay generated, in order.
    pub events: Vec<SimEvent>,

    /// Hash of the final state, for comparison with the live run.
    pub final_hash: StateHash,
}

impl SessionRecording {
    /// Start an empty recording for the given configuration.
    pub fn new(config: SimConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            config,
            frames: Vec::new(),
        }
    }

    /// Append one frame of input.
    pub fn push_frame(&mut self, dt: f32, input: TickInput) {
        self.frames.push(FrameInput { dt, input });
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the recording holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Serialize to a compact byte stream.
    pub fn encode(&self) -> Result<Vec<u8>, RecordingError> {
        bincode::serialize(self).map_err(RecordingError::Encode)
    }

    /// Deserialize from a byte stream produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordingError> {
        bincode::deserialize(bytes).map_err(RecordingError::Decode)
    }

    /// Re-simulate the whole session and return the final state, the full
    /// event log, and the final state hash.
    pub fn replay(&self) -> Result<ReplayOutcome, RecordingError> {
        let mut simulation = Simulation::new(self.config)?;
        let mut events = Vec::new();

        for frame in &self.frames {
            let result = simulation.step(frame.dt, frame.input);
            events.extend(result.events);
        }

        let final_hash = simulation.state_hash();
        Ok(ReplayOutcome {
            simulation,
            events,
            final_hash,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::FoodPickup;

    const DT: f32 = 1.0 / 60.0;

    /// A session with on-beat taps, a sloppy stretch, and a pickup.
    fn recorded_session() -> SessionRecording {
        let mut recording = SessionRecording::new(SimConfig::default());

        for frame in 0..600u32 {
            let t = frame as f32 * DT;
            let input = match frame {
                // On-beat taps every 30 frames for the first 5 seconds
                f if f < 300 && f % 30 == 0 => TickInput::tap(t),
                // A couple of late taps
                330 | 390 => TickInput::tap(t),
                // A pickup on the way
                450 => TickInput::idle().with_food(FoodPickup::new(1.5)),
                _ => TickInput::idle(),
            };
            recording.push_frame(DT, input);
        }

        recording
    }

    #[test]
    fn test_replay_is_deterministic() {
        let recording = recorded_session();

        let first = recording.replay().unwrap();
        let second = recording.replay().unwrap();

        assert_eq!(first.final_hash, second.final_hash);
        assert_eq!(first.events.len(), second.events.len());
        assert_eq!(
            first.simulation.travelled_distance(),
            second.simulation.travelled_distance()
        );
    }

    #[test]
    fn test_replay_matches_live_run() {
        let recording = recorded_session();

        // Drive a live simulation with the same frames.
        let mut live = Simulation::new(recording.config).unwrap();
        for frame in &recording.frames {
            live.step(frame.dt, frame.input);
        }

        let outcome = recording.replay().unwrap();
        assert_eq!(outcome.final_hash, live.state_hash());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let recording = recorded_session();

        let bytes = recording.encode().unwrap();
        let decoded = SessionRecording::decode(&bytes).unwrap();

        assert_eq!(decoded.session_id, recording.session_id);
        assert_eq!(decoded.config, recording.config);
        assert_eq!(decoded.frames, recording.frames);

        // And the decoded copy replays to the same state.
        assert_eq!(
            decoded.replay().unwrap().final_hash,
            recording.replay().unwrap().final_hash
        );
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            SessionRecording::decode(&[0xde, 0xad, 0xbe]),
            Err(RecordingError::Decode(_))
        ));
    }

    #[test]
    fn test_replay_rejects_invalid_config() {
        let mut recording = SessionRecording::new(SimConfig::default());
        recording.config.movement.max_speed = 0.0;
        recording.push_frame(DT, TickInput::idle());

        assert!(matches!(
            recording.replay(),
            Err(RecordingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_recording_replays_to_initial_state() {
        let recording = SessionRecording::new(SimConfig::default());
        assert!(recording.is_empty());

        let outcome = recording.replay().unwrap();
        assert_eq!(outcome.simulation.current_speed(), 0.0);
        assert_eq!(outcome.simulation.travelled_distance(), 0.0);
        assert!(outcome.events.is_empty());
    }
}
