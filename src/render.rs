//! Frame snapshots for the renderer
//!
//! A `RenderState` is everything a frontend needs to draw one frame: where
//! the hero sprite goes and which frame to use, the floor spans on screen,
//! the score counter and the overlay for the current screen. Building one
//! never changes the simulation.

use glam::IVec2;

use crate::consts::*;
use crate::game::Phase;
use crate::highscores::HighScores;
use crate::sim::{SimulationState, scroll};

/// Hero sprite placement and animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroPose {
    /// Top-left of the sprite, relative to the playfield
    pub pos: IVec2,
    pub standing: bool,
    pub facing_right: bool,
    /// Second idle frame while standing, falling frame while airborne
    pub variant: bool,
}

impl HeroPose {
    /// Index into the 8-frame hero strip: stand L/R, stand alt L/R,
    /// jump L/R, fall L/R
    pub fn sprite_index(&self) -> usize {
        (usize::from(!self.standing) << 2) | (usize::from(self.variant) << 1) | usize::from(self.facing_right)
    }
}

/// One floor visible on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorSpan {
    /// Screen row, negative for the rows above the field
    pub row: i32,
    /// First and last tile column (inclusive)
    pub left: i32,
    pub right: i32,
    /// Pixel y of the span's top edge, scroll shift included
    pub y: i32,
}

/// Banner or listing drawn over the playfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Paused,
    GameOver,
    HighScores(Vec<String>),
}

/// Read-only picture of one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub phase: Phase,
    pub hero: HeroPose,
    pub floors: Vec<FloorSpan>,
    /// Pixels the tower (background and floors) is shifted down by
    pub scroll_shift: i32,
    pub score: i64,
    /// Zero-padded counter text
    pub score_digits: String,
    pub overlay: Overlay,
}

/// Build a snapshot `fraction` of a tick after the last simulation step
pub fn snapshot(
    state: &SimulationState,
    phase: Phase,
    fraction: f64,
    standings: Option<HighScores>,
) -> RenderState {
    // Only a running game moves between ticks
    let elapsed_ms = if phase == Phase::Running {
        (fraction.clamp(0.0, 1.0) * TICK_MS as f64) as i32
    } else {
        0
    };
    let camera = scroll::camera(state, elapsed_ms);

    let hero = HeroPose {
        pos: camera.hero,
        standing: camera.standing,
        facing_right: state.hero.facing_right,
        variant: if camera.standing {
            state.hero.idle_variant
        } else {
            state.hero.vel.y > 0
        },
    };

    let floors = (-FIELD_EXTRA..FIELD_H)
        .filter_map(|row| {
            let floor = state.floor_on_screen_row(row);
            (!floor.is_empty()).then_some(FloorSpan {
                row,
                left: floor.left,
                right: floor.right,
                y: row * TILE + camera.shift,
            })
        })
        .collect();

    let overlay = match phase {
        Phase::Running => Overlay::None,
        Phase::Paused => Overlay::Paused,
        Phase::GameOver { .. } => Overlay::GameOver,
        Phase::HighScores => Overlay::HighScores(standings.map(|s| s.lines()).unwrap_or_default()),
    };

    RenderState {
        phase,
        hero,
        floors,
        scroll_shift: camera.shift,
        score: state.score,
        score_digits: format!("{:0width$}", state.score, width = SCORE_DIGITS),
        overlay,
    }
}
