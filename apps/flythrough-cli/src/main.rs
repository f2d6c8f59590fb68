use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use flythrough_input::{Action, Command};
use flythrough_kernel::{FlightConfig, FlightLoop};
use flythrough_pacing::FrameTimer;
use flythrough_render::{DebugTextRenderer, Extent, FrameUniforms, Renderer};
use flythrough_tools::{FrameInspector, FrameSummary};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flythrough-cli", about = "Headless flythrough driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default tuning
    Info,
    /// Drive the render loop with synthetic frame timestamps
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "300")]
        frames: u64,
        /// Simulated frame time in milliseconds
        #[arg(long, default_value = "16.7")]
        frame_ms: f64,
        /// Output width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,
        /// Output height in pixels
        #[arg(long, default_value = "720")]
        height: u32,
        /// Loop configuration file (.yaml, .yml or .json)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Commands held for the whole run
        #[arg(long, value_enum)]
        hold: Vec<HeldCommand>,
        /// Print a rendered frame line every N frames (0 disables)
        #[arg(long, default_value = "60")]
        every: u64,
    },
    /// Print the effective configuration as YAML
    Config {
        /// Configuration file to validate and print; defaults if omitted
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HeldCommand {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    RollLeft,
    RollRight,
}

impl From<HeldCommand> for Command {
    fn from(held: HeldCommand) -> Self {
        match held {
            HeldCommand::Forward => Command::Forward,
            HeldCommand::Back => Command::Back,
            HeldCommand::Left => Command::Left,
            HeldCommand::Right => Command::Right,
            HeldCommand::Up => Command::Up,
            HeldCommand::Down => Command::Down,
            HeldCommand::PitchUp => Command::PitchUp,
            HeldCommand::PitchDown => Command::PitchDown,
            HeldCommand::YawLeft => Command::YawLeft,
            HeldCommand::YawRight => Command::YawRight,
            HeldCommand::RollLeft => Command::RollLeft,
            HeldCommand::RollRight => Command::RollRight,
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<FlightConfig> {
    let config = match path {
        Some(path) => FlightConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FlightConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Tick a fresh loop `frames` times, `frame_ms` apart.
fn simulate(
    config: FlightConfig,
    base: Extent,
    hold: &[Command],
    frames: u64,
    frame_ms: f64,
    every: u64,
) -> anyhow::Result<FrameSummary> {
    anyhow::ensure!(
        frame_ms.is_finite() && frame_ms >= 0.0,
        "frame time must be a non-negative number of milliseconds"
    );

    let mut flight = FlightLoop::new(config);
    for &command in hold {
        flight.apply(Action::Press(command));
    }

    let renderer = DebugTextRenderer::new();
    let mut timer = FrameTimer::default();

    println!("Simulating {frames} frames at {frame_ms} ms, {}x{}", base.width, base.height);
    for i in 0..frames {
        let timestamp = Duration::try_from_secs_f64(frame_ms * i as f64 / 1000.0)
            .with_context(|| format!("frame {i} at {frame_ms} ms is out of range"))?;
        let frame = flight.tick(timestamp);
        if !frame.dt.is_zero() {
            timer.record(frame.dt);
        }
        if every > 0 && i % every == 0 {
            let uniforms = FrameUniforms::new(&frame, flight.scene(), base);
            println!("[{i:>6}] {}", renderer.render(&uniforms));
        }
    }

    Ok(FrameInspector::summary(&flight, &timer))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = FlightConfig::default();
            println!("flythrough-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "scheduler: scale={} range=[{}, {}] step_down={} budget={:?} warmup={:?}",
                config.scheduler.default_scale,
                config.scheduler.min_scale,
                config.scheduler.max_scale,
                config.scheduler.step_down,
                config.scheduler.frame_budget,
                config.scheduler.warmup,
            );
            println!(
                "camera: movement_speed={} roll_speed={}",
                config.camera.movement_speed, config.camera.roll_speed
            );
            println!("quality_step: {}", config.quality_step);
        }
        Commands::Simulate {
            frames,
            frame_ms,
            width,
            height,
            config,
            hold,
            every,
        } => {
            let config = load_config(config.as_deref())?;
            let base = Extent::new(width.max(1), height.max(1));
            let hold: Vec<Command> = hold.into_iter().map(Command::from).collect();
            let summary = simulate(config, base, &hold, frames, frame_ms, every)?;
            println!("{summary}");
        }
        Commands::Config { path } => {
            let config = load_config(path.as_deref())?;
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}
