//! Forum Pong entry point
//!
//! Runs a headless match: scripted (idle) controls for the home paddle, the
//! predictive opponent on the away side, and a screen that writes to the
//! trace log. Use `RUST_LOG=debug` to follow the opponent's planning.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use forum_pong::consts::DEFAULT_MAX_TICKS;
use forum_pong::frontend::{InputEvent, LogScreen, ScriptedControls};
use forum_pong::{ControllerState, Settings, game};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
    /// Settings JSON file (defaults are used for missing fields)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the match seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many simulation ticks
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Send a quit request on this tick
    #[arg(long)]
    quit_at: Option<u64>,

    /// Print the effective settings as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_settings: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    settings.validate().context("checking settings")?;

    if args.dump_settings {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    log::info!("Forum Pong (headless) starting, seed {:#x}", settings.seed);

    let mut controls = ScriptedControls::idle();
    if let Some(tick) = args.quit_at {
        controls = controls.at(tick, InputEvent::Quit);
    }

    let dt = settings.timestep;
    let screen = Box::new(LogScreen::default());
    let mut controller = game::new_match(settings, Box::new(controls), screen)?;
    let steps = usize::try_from(args.max_ticks).unwrap_or(usize::MAX);
    let state = controller
        .run(std::iter::repeat_n(dt, steps))
        .context("running match")?;

    match state {
        ControllerState::Finished => {
            log::info!("Match finished after {} ticks", controller.ticks())
        }
        ControllerState::Aborted => {
            log::info!("Match aborted after {} ticks", controller.ticks())
        }
        ControllerState::Failed => {
            log::error!("Match stopped on an error after {} ticks", controller.ticks())
        }
        ControllerState::Running => log::warn!(
            "Tick limit reached in phase '{}'",
            controller.active_phase().unwrap_or("none")
        ),
    }
    Ok(())
}
