//! Falling Tower - A vertical-scrolling tower climbing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (RNG, floor generation, physics, scrolling)
//! - `input`: Keyboard to joystick translation
//! - `game`: Screen state machine and fixed timestep driver
//! - `render`: Read-only frame snapshots for a renderer
//! - `highscores`: Score sink and on-disk highscore file
//! - `settings`: Startup configuration

pub mod game;
pub mod highscores;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use game::{Flow, Game, Phase};
pub use highscores::{HighScoreFile, HighScores, ScoreSink};
pub use input::{Joystick, Key, LogicalKey};
pub use render::RenderState;
pub use settings::{ScrollMode, Settings};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Size of a floor/wall tile, in pixels
    pub const TILE: i32 = 16;
    /// Size of the hero sprite, in pixels
    pub const HERO_SIZE: i32 = 32;

    /// Width of the playing field, in tiles (walls included)
    pub const FIELD_W: i32 = 32;
    /// Height of the playing field, in tiles
    pub const FIELD_H: i32 = 24;
    /// Rows drawn above the field so soft scrolling has something to reveal
    pub const FIELD_EXTRA: i32 = 3;

    /// Floors held in the generator ring
    pub const FLOOR_RING_LEN: usize = 64;

    /// Fixed simulation timestep (40 Hz)
    pub const TICK_MS: i32 = 25;
    pub const TICK: Duration = Duration::from_millis(TICK_MS as u64);
    /// Longest frame the catch-up loop will consume at once
    pub const MAX_FRAME: Duration = Duration::from_millis(250);

    /// Accumulated scroll count that advances the tower by one row
    pub const SCROLL_THRESHOLD: i32 = 20_000;
    /// Per-tick scroll count increment at full speed
    pub const MAX_SCROLL_SPEED: i32 = 5_000;
    /// Scroll speed set by the first jump of a run
    pub const START_SCROLL_SPEED: i32 = 200;

    /// x coordinate that collides with the left wall
    pub const LEFT_LIMIT: i32 = TILE;
    /// x coordinate that collides with the right wall
    pub const RIGHT_LIMIT: i32 = (FIELD_W - 1) * TILE - HERO_SIZE;
    /// y coordinate that triggers a forced scroll
    pub const TOP_LIMIT: i32 = 5 * TILE;
    /// y coordinate that ends the run
    pub const BOT_LIMIT: i32 = FIELD_H * TILE;

    /// Horizontal speed clamp, in half-pixels per tick
    pub const MAX_VX: i32 = 32;
    /// Terminal fall speed, in pixels per tick
    pub const MAX_FALL: i32 = 16;

    /// Ticks spent on the game over banner before the highscores appear (2 s)
    pub const GAMEOVER_DELAY_TICKS: u32 = 80;

    /// Digits shown in the score counter
    pub const SCORE_DIGITS: usize = 10;
}
