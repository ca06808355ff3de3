//! Falling Tower entry point
//!
//! Reads settings and options, seeds the tower from OS entropy and runs a
//! headless session with a simple autopilot until the first game over. A
//! graphical frontend drives the same `Game` API from its event loop.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use rand::TryRngCore;
use rand::rngs::OsRng;

use falling_tower::consts::*;
use falling_tower::game::{Game, Phase};
use falling_tower::highscores::{HighScoreFile, ScoreSink};
use falling_tower::input::Key;
use falling_tower::settings::{LaunchRequest, Settings};
use falling_tower::sim::TowerRng;

/// Frame time the headless loop pretends to render at (60 Hz)
const FRAME: Duration = Duration::from_micros(16_667);
/// Give up on a run after ten minutes of game time
const MAX_FRAMES: u32 = 60 * 60 * 10;

/// The OS could not provide entropy for the tower
#[derive(Debug, thiserror::Error)]
#[error("could not seed the random number generator: {0}")]
struct SeedError(String);

fn seed_rng() -> Result<TowerRng, SeedError> {
    let mut os = OsRng;
    let mut draw = || os.try_next_u64().map_err(|e| SeedError(e.to_string()));
    let state = draw()?;
    let sequence = draw()?;
    Ok(TowerRng::new(state, sequence))
}

/// `$XDG_CONFIG_HOME/falling-tower.json`, falling back to `~/.config`
fn settings_path() -> Option<PathBuf> {
    let non_empty = |var: &str| std::env::var_os(var).filter(|v| !v.is_empty());
    non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("falling-tower.json"))
}

/// Hold jump and run, turning around every couple of seconds
fn autopilot<S: ScoreSink>(game: &mut Game<S>, frame: u32) {
    const TURN_FRAMES: u32 = 150;
    if frame == 0 {
        game.on_key_down(Key::Up, false);
    }
    if frame % TURN_FRAMES == 0 {
        let (release, press) = if (frame / TURN_FRAMES) % 2 == 0 {
            (Key::Left, Key::Right)
        } else {
            (Key::Right, Key::Left)
        };
        game.on_key_up(release);
        game.on_key_down(press, false);
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "falling-tower".to_string());

    let mut settings = match settings_path() {
        Some(path) => Settings::load_or_default(&path),
        None => Settings::default(),
    };
    match settings.apply_args(args) {
        Ok(LaunchRequest::Play) => {}
        Ok(LaunchRequest::ShowHelp) => {
            print!("{}", Settings::usage(&program));
            return ExitCode::SUCCESS;
        }
        Ok(LaunchRequest::ShowVersion) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{program}: {e}");
            eprint!("{}", Settings::usage(&program));
            return ExitCode::FAILURE;
        }
    }

    log::info!("Falling Tower starting...");
    log::info!(
        "Scroll mode: {}, theme: {}",
        settings.scroll_mode.as_str(),
        settings.theme_path().display()
    );

    let rng = match seed_rng() {
        Ok(rng) => rng,
        Err(e) => {
            eprintln!("{program}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sink = HighScoreFile::open_or_memory(settings.highscore_path.as_deref());
    let mut game = Game::new(rng, settings.scroll_mode, sink);

    for frame in 0..MAX_FRAMES {
        autopilot(&mut game, frame);
        game.advance(FRAME);

        let snapshot = game.snapshot_for_render(game.fraction());
        log::trace!(
            "Frame {frame}: hero {:?} sprite {} score {}",
            snapshot.hero.pos,
            snapshot.hero.sprite_index(),
            snapshot.score_digits
        );

        if game.phase() != Phase::Running {
            break;
        }
    }

    let score = game.state().score;
    log::info!(
        "Run finished on floor {score} after {:.1}s",
        game.state().time_ticks as f64 * TICK.as_secs_f64()
    );
    println!("Final score: {score}");
    if let Some(standings) = game.sink().standings() {
        for line in standings.lines() {
            println!("{line}");
        }
    }

    ExitCode::SUCCESS
}
