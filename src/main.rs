//! Gub Runner - headless native driver
//!
//! Runs the simulation at 60 Hz with the autopilot pressing jump, routes sound
//! cues to the log, and prints a summary when the run ends.
//!
//! Usage: `gub-runner [seed] [max_frames]`
//! Environment: `GUB_TUNING` and `GUB_SETTINGS` point at optional JSON files.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use gub_runner::audio::{AudioRouter, LogSink};
use gub_runner::sim::{GameEvent, RunPhase, SpriteHandle};
use gub_runner::{Engine, Settings, Tuning};

/// One minute of frames
const DEFAULT_MAX_FRAMES: u64 = 60 * 60;
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(seed_from_time);
    let max_frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_FRAMES);

    let tuning = std::env::var("GUB_TUNING")
        .map(|path| Tuning::load_from(path))
        .unwrap_or_default();
    let settings = std::env::var("GUB_SETTINGS")
        .map(|path| Settings::load_from(path))
        .unwrap_or_default();

    log::info!("Gub Runner (headless) starting with seed {seed}");

    let mut engine = Engine::new(seed, tuning, settings);
    let mut audio = AudioRouter::new(LogSink, engine.settings());
    engine.set_sprite(SpriteHandle::default());
    engine.set_idle_mode(true);
    engine.start();

    let started = Instant::now();
    let mut frames = 0u64;
    let mut final_stats = None;

    while frames < max_frames {
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        let out = engine.frame(now_ms);
        audio.dispatch(&out.events);
        frames += 1;

        for event in &out.events {
            if let GameEvent::Milestone { score } = event {
                println!("  milestone: {score}");
            }
        }
        if out.game_over_edge {
            final_stats = out.events.iter().find_map(|e| match e {
                GameEvent::GameOver { stats } => Some(*stats),
                _ => None,
            });
            break;
        }

        std::thread::sleep(FRAME_TIME);
    }

    match final_stats {
        Some(stats) => {
            println!("\nGame over after {frames} frames");
            println!("  score:       {}", stats.score);
            println!("  distance:    {:.0}", stats.distance);
            println!("  items:       {}", stats.items_collected);
            println!("  near misses: {}", stats.near_misses);
            println!("  best combo:  {}", stats.max_combo);
        }
        None => {
            let phase = engine.phase();
            let note = if phase == RunPhase::Running { " (still running)" } else { "" };
            println!("\nStopped after {frames} frames{note}, score {}", engine.score());
        }
    }
}
