//! Snail Dash Demo Driver
//!
//! Drives the simulation core through a scripted tap session: a steady
//! on-beat run, a sloppy stretch, a food pickup, and an idle tail that
//! decays to rest. The session is recorded, replayed, and verified against
//! the live run's state hash.

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use snail_dash::{
    DEFAULT_TICK_RATE, VERSION,
    FoodPickup, SessionRecording, SimConfig, SimEventData, Simulation, TickInput,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    // Optional JSON config file as the first argument; sparse overrides are
    // fine, missing fields keep their defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => SimConfig::default(),
    };

    info!("Snail Dash Core v{}", VERSION);
    info!("Tick Rate: {} Hz", DEFAULT_TICK_RATE);
    info!(
        "Target Interval: {:.2}s (tolerance {:.0}%)",
        config.rhythm.target_interval,
        config.rhythm.allowed_deviation_fraction * 100.0
    );

    demo_session(config)
}

/// Load a configuration override file.
fn load_config(path: &str) -> anyhow::Result<SimConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path}"))?;
    let config: SimConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {path}"))?;
    Ok(config)
}

/// Run the scripted demo session.
fn demo_session(config: SimConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Session ===");

    let dt = 1.0 / DEFAULT_TICK_RATE as f32;
    let mut sim = Simulation::new(config)?;
    let mut recording = SessionRecording::new(config);

    info!("Session ID: {}", recording.session_id);

    let total_frames = 12 * DEFAULT_TICK_RATE;
    let mut event_count = 0usize;

    for frame in 0..total_frames {
        let input = scripted_input(frame, dt);
        recording.push_frame(dt, input);

        let result = sim.step(dt, input);
        for event in &result.events {
            match event.data {
                SimEventData::RhythmUpdated { state } => {
                    info!(
                        "Tap judged: combo={} on_beat={} smooth_run={} accuracy={:.2}",
                        state.combo, state.on_beat, state.in_smooth_run, state.accuracy
                    );
                }
                SimEventData::FoodConsumed { granted_bonus, speed_after, .. } => {
                    info!(
                        "Food consumed: bonus={:.2} speed now {:.2}",
                        granted_bonus, speed_after
                    );
                }
                SimEventData::CameToRest => {
                    info!("Snail came to rest");
                }
                _ => {}
            }
        }
        event_count += result.events.len();

        if (frame + 1) % (2 * DEFAULT_TICK_RATE) == 0 {
            info!(
                "t={:.1}s speed={:.2} ({:.0}%) energy={:.1} ({:.0}%) distance={:.2}",
                sim.clock(),
                sim.current_speed(),
                sim.normalised_speed() * 100.0,
                sim.current_energy(),
                sim.normalised_energy() * 100.0,
                sim.travelled_distance()
            );
        }
    }

    info!("=== Session Complete ===");
    info!(
        "Frames: {}  Events: {}  Distance: {:.2}  Energy left: {:.1}",
        total_frames,
        event_count,
        sim.travelled_distance(),
        sim.current_energy()
    );

    // Record, replay, verify.
    let live_hash = sim.state_hash();
    info!("Final state hash: {}", hex::encode(live_hash));

    let bytes = recording.encode()?;
    info!("Recording: {} bytes for {} frames", bytes.len(), recording.len());

    let outcome = SessionRecording::decode(&bytes)?.replay()?;
    if outcome.final_hash != live_hash {
        anyhow::bail!(
            "replay hash mismatch: live {} vs replay {}",
            hex::encode(live_hash),
            hex::encode(outcome.final_hash)
        );
    }
    info!(
        "Replay verified: {} events, hash {}",
        outcome.events.len(),
        hex::encode(outcome.final_hash)
    );

    Ok(())
}

/// Scripted input for the demo session.
fn scripted_input(frame: u32, dt: f32) -> TickInput {
    let t = frame as f32 * dt;
    let cadence = DEFAULT_TICK_RATE / 2; // a tap every half second

    match frame {
        // Steady on-beat taps for the first six seconds
        f if f < 6 * DEFAULT_TICK_RATE && f % cadence == 0 => TickInput::tap(t),
        // Sloppy stretch: late taps that drop the beat
        400 | 460 | 520 => TickInput::tap(t),
        // A pickup on the way
        430 => TickInput::idle().with_food(FoodPickup::new(1.5)),
        // Idle tail: decay to rest
        _ => TickInput::idle(),
    }
}
