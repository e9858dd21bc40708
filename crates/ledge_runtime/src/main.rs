//! Ledge Runtime
//!
//! Headless driver: loads settings, builds a small test level and runs the
//! fixed-step simulation under a scripted input track.
//!
//! ```text
//! ledge [CONFIG.json] [--frames N]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ledge_core::glam::Vec2;
use ledge_core::{CollisionRules, EntityKind, FrameInput, Handle, SimConfig, Simulation};
use ledge_metrics::{Counters, FrameTimer, SystemProfiler};

const DEFAULT_FRAMES: u64 = 600;
const SUMMARY_EVERY: u64 = 120;

struct Args {
    config: Option<PathBuf>,
    frames: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        frames: DEFAULT_FRAMES,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--frames" => {
                let value = it.next().context("--frames needs a value")?;
                args.frames = value
                    .parse()
                    .with_context(|| format!("invalid frame count {value:?}"))?;
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SimConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// A floor with a gap, a raised ledge, a wall at each end and something
/// to interact with on every stretch. Returns the player handle.
fn build_level(sim: &mut Simulation) -> Result<Handle> {
    let tile = Vec2::ONE;

    for x in -12..=24 {
        if (6..=7).contains(&x) {
            continue;
        }
        sim.spawn(EntityKind::Tile, Vec2::new(x as f32, -0.5), tile)?;
    }
    for y in 0..4 {
        sim.spawn(EntityKind::Tile, Vec2::new(-12.0, y as f32 + 0.5), tile)?;
        sim.spawn(EntityKind::Tile, Vec2::new(24.0, y as f32 + 0.5), tile)?;
    }
    for x in 12..=16 {
        sim.spawn(EntityKind::Tile, Vec2::new(x as f32, 2.5), tile)?;
    }

    sim.spawn(EntityKind::Spikes, Vec2::new(20.0, 0.25), Vec2::new(1.0, 0.5))?;
    for x in [2.0, 4.0, 10.0, 14.0] {
        let y = if x == 14.0 { 3.5 } else { 0.5 };
        sim.spawn(EntityKind::Pickup, Vec2::new(x, y), Vec2::splat(0.5))?;
    }
    sim.spawn(EntityKind::Patroller, Vec2::new(14.0, 3.5), tile)?;
    sim.spawn(EntityKind::Patroller, Vec2::new(-6.0, 0.5), tile)?;

    let player = sim.spawn(EntityKind::Player, Vec2::new(0.0, 0.5), tile)?;
    tracing::info!(
        entities = sim.store().len(),
        capacity = sim.store().capacity(),
        "level built"
    );
    Ok(player)
}

/// Run right, hop every second and a half, shoot now and then, and turn
/// back for the last third.
fn scripted_input(frame: u64, frames: u64) -> FrameInput {
    let heading_back = frame * 3 >= frames * 2;
    FrameInput {
        move_x: if heading_back { -1.0 } else { 1.0 },
        jump: frame % 90 == 30,
        fire: frame % 45 == 0,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("Ledge v{}", ledge_core::VERSION);

    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;
    let mut sim = Simulation::new(config, CollisionRules::default())
        .context("invalid simulation config")?;
    let player = build_level(&mut sim)?;

    let mut timer = FrameTimer::new(SUMMARY_EVERY as usize);
    let mut profiler = SystemProfiler::new();
    let mut counters = Counters::new();
    let mut player_alive = true;

    for frame in 0..args.frames {
        let input = scripted_input(frame, args.frames);

        timer.begin();
        let report = ledge_metrics::time_scope!(profiler, "step", { sim.step(&input) })
            .with_context(|| format!("frame {frame}"))?;
        timer.end();

        counters.add("moved", u64::from(report.moved));
        counters.add("substeps", u64::from(report.substeps));
        counters.add("hits", u64::from(report.hits));
        counters.add("turns", u64::from(report.turns));
        counters.add("spawned", u64::from(report.spawned));
        counters.add("removed", u64::from(report.removed));

        if player_alive && !sim.store().contains(player) {
            player_alive = false;
            tracing::info!(frame, "player removed");
        }

        if (frame + 1) % SUMMARY_EVERY == 0 {
            let position = sim.store().by_handle(player).map(|p| p.position);
            tracing::info!(
                tick = report.tick,
                live = sim.store().len(),
                ?position,
                "frame summary"
            );
            ledge_metrics::metrics! {
                let (lo, hi) = timer.frame_time_range_ms();
                tracing::info!(
                    avg_ms = timer.frame_time_ms(),
                    last_ms = timer.last_frame_ms(),
                    min_ms = lo,
                    max_ms = hi,
                    steps_per_sec = timer.steps_per_sec(),
                    step_ms = profiler.get_timing("step").as_secs_f64() * 1000.0,
                    "step timing"
                );
                for (name, total) in counters.take() {
                    tracing::info!(name, total, "counter");
                }
                profiler.reset();
            }
        }
    }

    tracing::info!(
        ticks = sim.clock().tick_count(),
        simulated_secs = sim.clock().elapsed_secs(),
        live = sim.store().len(),
        "run finished"
    );
    Ok(())
}
