//! Courier - a skateboard delivery game
//!
//! Runs the demo level headless, replaying a scripted ride through the
//! controller at a fixed frame rate.

mod level;
mod script;
mod session;
mod settings;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use level::Level;
use script::InputScript;
use session::Session;
use settings::GameSettings;

/// Frame length of the headless run
const FRAME_TIME: f32 = 1.0 / 120.0;

/// Extra seconds simulated after the script ends
const SETTLE_TIME: f32 = 2.0;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Courier");

    let seconds = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<f32>()
            .with_context(|| format!("Invalid run length '{arg}', expected seconds"))?,
        None => InputScript::demo().duration() + SETTLE_TIME,
    };

    let settings = GameSettings::load();
    settings.validate().context("Invalid settings")?;

    let level = Level::demo();
    let mut session = Session::new(&settings, &level).context("Failed to build session")?;
    let mut script = InputScript::demo();

    let frames = (seconds / FRAME_TIME).ceil() as u64;
    info!(level = %level.name, seconds, frames, "running scripted ride");

    for frame in 0..frames {
        let time = frame as f32 * FRAME_TIME;
        script.apply(time, session.input_mut());
        session.frame(FRAME_TIME);
    }

    let stats = session.stats();
    let player = session.player();
    info!(
        frames = stats.frames,
        ticks = stats.ticks,
        jumps = stats.jumps,
        tricks = stats.tricks,
        crashes = stats.crashes,
        knockbacks = stats.knockbacks,
        deliveries = stats.deliveries,
        score = stats.score,
        "run finished"
    );
    info!(
        position = ?player.position(),
        velocity = ?player.velocity(),
        state = player.state().name(),
        clip = ?session.current_clip(),
        tint = ?session.player_tint(),
        facing = session.facing_scale(),
        combo = player.combo_step(),
        script_done = script.is_finished(),
        "final player state"
    );
    if let Some(target) = session.deliveries().current_target() {
        info!(door = %target.name, arrow_alpha = session.arrow().alpha(), "current order");
    }

    for (text, alpha) in session.messages().visible() {
        info!(alpha, "hud: {}", text.replace('\n', " "));
    }
    if session.time().paused {
        info!("run ended paused");
    }

    Ok(())
}
