//! Flap Sim headless host
//!
//! Paces a core with a fixed-timestep accumulator, lets the autopilot fly,
//! and optionally records or replays the run.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;

use flap_sim::autopilot::Autopilot;
use flap_sim::platform::{Clock, FixedTimestep, ManualClock};
use flap_sim::replay::{Replay, ReplayRecorder};
use flap_sim::{
    CeilingPolicy, Difficulty, DifficultyConfig, GameEvent, GamePhase, SimulationCore, Snapshot,
};

#[derive(Parser)]
#[command(name = "flap-sim")]
#[command(about = "Run the flap simulation headless with an autopilot")]
struct Args {
    /// Difficulty preset (easy, medium, hard)
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// JSON difficulty table; overrides --difficulty
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (defaults to the current time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Host seconds to run before giving up
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Simulated display refresh rate
    #[arg(long, default_value_t = 144.0)]
    frame_rate: f64,

    #[arg(long, default_value_t = 400.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Pin the bird at the ceiling instead of crashing
    #[arg(long)]
    clamp_ceiling: bool,

    /// Save the run as a replay
    #[arg(long)]
    record: Option<PathBuf>,

    /// Play back a saved replay instead of flying
    #[arg(long, conflicts_with = "record")]
    replay: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Some(path) = &args.replay {
        return play_back(path);
    }

    let config = match &args.config {
        Some(path) => DifficultyConfig::load(path)
            .with_context(|| format!("failed to load difficulty table {}", path.display()))?,
        None => args.difficulty.config(),
    };
    let seed = args.seed.unwrap_or_else(time_seed);
    let ceiling = if args.clamp_ceiling {
        CeilingPolicy::Clamp
    } else {
        CeilingPolicy::Crash
    };

    for (name, value) in [("--frame-rate", args.frame_rate), ("--seconds", args.seconds)] {
        if !value.is_finite() || value <= 0.0 {
            bail!("{name} must be positive, got {value}");
        }
    }

    let mut core = SimulationCore::seeded(config, args.width, args.height, seed)
        .context("difficulty table does not fit the play field")?
        .with_ceiling_policy(ceiling);
    log::info!("Flap Sim starting: seed {seed}, {config:?}");

    let pilot = Autopilot::new(config);
    let mut recorder = ReplayRecorder::new(seed, &core);

    let mut clock = ManualClock::new();
    let mut stepper = FixedTimestep::default();
    stepper.advance_to(clock.now());

    let frame = Duration::from_secs_f64(1.0 / args.frame_rate);
    let frames = (args.seconds * args.frame_rate).ceil() as u64;

    'frames: for _ in 0..frames {
        clock.advance(frame);
        for _ in 0..stepper.advance_to(clock.now()) {
            let flap = pilot.should_flap(&core.snapshot());
            let events = recorder.step(&mut core, flap, stepper.step())?;
            for event in events {
                report(&event);
            }
            if core.phase() == GamePhase::Over {
                break 'frames;
            }
        }
    }

    let snapshot = core.snapshot();
    summarize(&snapshot);

    if let Some(path) = &args.record {
        let replay = recorder.finish();
        replay
            .verify(&snapshot)
            .context("recorded replay does not reproduce the run")?;
        replay
            .save(path)
            .with_context(|| format!("failed to write replay {}", path.display()))?;
        println!("  Replay:     {} ({} steps)", path.display(), replay.steps.len());
    }

    Ok(())
}

fn play_back(path: &Path) -> Result<()> {
    let replay =
        Replay::load(path).with_context(|| format!("failed to load replay {}", path.display()))?;
    log::info!(
        "Replaying seed {} ({} steps, {:.1}s simulated)",
        replay.seed,
        replay.steps.len(),
        replay.duration()
    );
    let core = replay.play().context("replay table does not fit its play field")?;
    summarize(&core.snapshot());
    Ok(())
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::PipeSpawned { gap_top } => log::debug!("Pipe spawned, gap at {gap_top:.1}"),
        GameEvent::PipePassed { score } => log::info!("Passed pipe, score {score}"),
        GameEvent::Crashed { cause } => log::info!("Crashed into the {cause}"),
    }
}

fn summarize(snapshot: &Snapshot) {
    println!();
    println!("=== RUN ===");
    println!("  Phase:      {:?}", snapshot.phase);
    println!("  Score:      {}", snapshot.score);
    println!("  Best:       {}", snapshot.best_score);
    println!("  Ticks:      {}", snapshot.ticks);
    println!("  Distance:   {:.1}", snapshot.distance);
    if let Some(cause) = snapshot.crash {
        println!("  Crash:      {cause}");
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
