//! Simulation state and core types
//!
//! Everything a run needs to continue deterministically lives here.
//! Coordinates are in pixels relative to the top-left corner of the
//! playfield; y grows toward the bottom (the death line).

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::floors::{Floor, FloorRing};
use super::rng::TowerRng;
use crate::consts::*;

/// How the camera follows the tower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScrollMode {
    /// Interpolated, pixel-smooth camera
    #[default]
    Soft,
    /// Tile-snapped camera of the classic game
    Hard,
}

impl ScrollMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollMode::Soft => "soft",
            ScrollMode::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "soft" => Some(ScrollMode::Soft),
            "hard" => Some(ScrollMode::Hard),
            _ => None,
        }
    }
}

/// Effective left/right stick position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Neutral,
    Left,
    Right,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub direction: Direction,
    /// Jump button is held
    pub jump: bool,
}

/// The climbing hero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    /// Top-left corner of the sprite
    pub pos: IVec2,
    /// x in half-pixels per tick, y in pixels per tick
    pub vel: IVec2,
    /// Remaining low-gravity ticks while the jump button is held
    pub jump: i32,
    pub standing: bool,
    pub facing_right: bool,
    /// Alternate frame of the idle animation
    pub idle_variant: bool,
    pub idle_count: u32,
}

impl Hero {
    /// Hero standing in the middle of the start floor
    pub fn spawn() -> Self {
        Self {
            pos: IVec2::new((FIELD_W / 2) * TILE - HERO_SIZE / 2, (FIELD_H - 4) * TILE - HERO_SIZE),
            vel: IVec2::ZERO,
            jump: 0,
            standing: true,
            facing_right: false,
            idle_variant: false,
            idle_count: 0,
        }
    }
}

/// Camera progress up the tower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollState {
    /// Scrolling only begins with the first jump
    pub has_started: bool,
    /// Tower row shown at the top of the field
    pub floor_offset: i32,
    /// Camera catch-up owed because the hero got too close to the top, in pixels
    pub forced: i32,
    /// Fixed-point accumulator; a row scrolls each time it passes `SCROLL_THRESHOLD`
    pub count: i32,
    /// Accumulator increment per tick
    pub speed: i32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            has_started: false,
            floor_offset: FIELD_H - 4,
            forced: 0,
            count: 0,
            speed: 0,
        }
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub mode: ScrollMode,
    /// Best floor reached this run
    pub score: i64,
    /// Simulation ticks since the run began
    pub time_ticks: u64,
    pub hero: Hero,
    pub scroll: ScrollState,
    pub floors: FloorRing,
}

impl SimulationState {
    /// Start a new run, generating a fresh tower from `rng`
    pub fn new(rng: &mut TowerRng, mode: ScrollMode) -> Self {
        Self {
            mode,
            score: 0,
            time_ticks: 0,
            hero: Hero::spawn(),
            scroll: ScrollState::default(),
            floors: FloorRing::new(rng),
        }
    }

    /// Reinitialize in place for another run
    pub fn reset(&mut self, rng: &mut TowerRng) {
        self.score = 0;
        self.time_ticks = 0;
        self.hero = Hero::spawn();
        self.scroll = ScrollState::default();
        self.floors.refill(rng);
    }

    /// Floor drawn on screen row `row` (0 = top of the field)
    pub fn floor_on_screen_row(&self, row: i32) -> Floor {
        self.floors.get(self.scroll.floor_offset - row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_stands_on_full_floor() {
        let mut rng = TowerRng::new(3, 4);
        let state = SimulationState::new(&mut rng, ScrollMode::Soft);
        let row = (state.hero.pos.y + HERO_SIZE) / TILE;
        assert_eq!(state.floor_on_screen_row(row), Floor::FULL);
        assert_eq!(state.score, 0);
        assert!(!state.scroll.has_started);
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut rng = TowerRng::default();
        let mut state = SimulationState::new(&mut rng, ScrollMode::Hard);
        state.score = 12;
        state.hero.pos.x = 20;
        state.reset(&mut rng);
        assert_eq!(state.mode, ScrollMode::Hard);
        assert_eq!(state.score, 0);
        assert_eq!(state.hero, Hero::spawn());
    }

    #[test]
    fn test_reset_matches_new_run() {
        let mut rng = TowerRng::new(31, 41);
        let mut state = SimulationState::new(&mut rng, ScrollMode::Soft);
        state.score = 3;
        state.time_ticks = 900;
        state.scroll.has_started = true;
        state.scroll.floor_offset += 40;
        for _ in 0..40 {
            state.floors.generate_next(&mut rng);
        }

        let fresh = SimulationState::new(&mut rng.clone(), ScrollMode::Soft);
        state.reset(&mut rng);
        assert_eq!(state, fresh);
    }

    #[test]
    fn test_scroll_mode_from_str() {
        assert_eq!(ScrollMode::from_str("SOFT"), Some(ScrollMode::Soft));
        assert_eq!(ScrollMode::from_str("hard"), Some(ScrollMode::Hard));
        assert_eq!(ScrollMode::from_str("wobbly"), None);
        assert_eq!(ScrollMode::Hard.as_str(), "hard");
    }
}
