//! Tower scrolling
//!
//! The camera climbs on its own once the run has started, at a speed that
//! keeps increasing. On top of that, a hero who gets too close to the top of
//! the field drags the camera up with them (a forced scroll).
//!
//! In hard mode a forced scroll snaps whole tiles. In soft mode the owed
//! distance is kept in pixels (`ScrollState::forced`) and repaid one tile at
//! a time, so the renderer can slide the camera smoothly.

use glam::IVec2;

use super::physics::{snap_to_floor, stands_at};
use super::rng::TowerRng;
use super::state::{ScrollMode, SimulationState};
use crate::consts::*;

/// Move the tower down by one row and generate the row that appears on top
pub fn scroll(state: &mut SimulationState, rng: &mut TowerRng) {
    state.floors.generate_next(rng);
    state.scroll.floor_offset += 1;
    state.hero.pos.y += TILE;
    if state.scroll.forced >= TILE {
        state.scroll.forced -= TILE;
    }
}

/// Camera-relative hero y at the instant of the tick, including owed and
/// accumulated scroll
pub fn camera_y(state: &SimulationState) -> i32 {
    state.hero.pos.y + state.scroll.forced + TILE * state.scroll.count / SCROLL_THRESHOLD
}

/// Run the scroll accumulator and the forced-scroll rule for one tick
pub fn advance(state: &mut SimulationState, rng: &mut TowerRng) {
    if state.scroll.has_started {
        state.scroll.speed = (state.scroll.speed + 1).min(MAX_SCROLL_SPEED);
        state.scroll.count += state.scroll.speed;
    }

    while state.scroll.count > SCROLL_THRESHOLD {
        state.scroll.count -= SCROLL_THRESHOLD;
        scroll(state, rng);
    }

    // Only while airborne, so snapping onto a floor never yanks the camera.
    match state.mode {
        ScrollMode::Hard => {
            if state.hero.standing {
                return;
            }
            while state.hero.pos.y < TOP_LIMIT {
                scroll(state, rng);
            }
        }
        ScrollMode::Soft => {
            // A hero leaving the ground this tick is already airborne.
            let airborne = !state.hero.standing || state.hero.vel.y < 0;
            let y = camera_y(state);
            if airborne && y < TOP_LIMIT {
                log::trace!("Forced scroll of {}px", TOP_LIMIT - y);
                state.scroll.forced += TOP_LIMIT - y;
                state.scroll.count = 0;
            }
            while state.scroll.forced >= TILE {
                scroll(state, rng);
            }
        }
    }
}

/// The hero has dropped past the bottom of the field
pub fn is_dead(state: &SimulationState) -> bool {
    state.hero.pos.y + state.scroll.forced >= BOT_LIMIT
}

/// Where to draw things between two ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    /// Hero sprite position on screen
    pub hero: IVec2,
    /// Whether the predicted hero position rests on a floor
    pub standing: bool,
    /// Pixels to shift the tower rows down by
    pub shift: i32,
}

/// Predict the camera `elapsed_ms` after the last tick without touching the
/// simulation. Hard mode always shows the tick state as-is.
pub fn camera(state: &SimulationState, elapsed_ms: i32) -> Camera {
    let hero = &state.hero;
    if state.mode == ScrollMode::Hard {
        return Camera {
            hero: hero.pos,
            standing: hero.standing,
            shift: 0,
        };
    }

    let dt = elapsed_ms.clamp(0, TICK_MS);
    let hx = (hero.pos.x + (hero.vel.x / 2) * dt / TICK_MS).clamp(LEFT_LIMIT, RIGHT_LIMIT);
    let mut hy = hero.pos.y + hero.vel.y * dt / TICK_MS;

    let standing = stands_at(
        &state.floors,
        state.scroll.floor_offset,
        hero.vel.y,
        IVec2::new(hx, hy),
    );
    if standing {
        hy = snap_to_floor(hy);
    }

    let count = state.scroll.count + dt * state.scroll.speed / TICK_MS;
    let mut sy = hy + state.scroll.forced + TILE * count / SCROLL_THRESHOLD;
    if !standing && sy < TOP_LIMIT {
        sy = TOP_LIMIT;
    }

    Camera {
        hero: IVec2::new(hx, sy),
        standing,
        shift: sy - hy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(mode: ScrollMode) -> (SimulationState, TowerRng) {
        let mut rng = TowerRng::new(77, 88);
        let state = SimulationState::new(&mut rng, mode);
        (state, rng)
    }

    #[test]
    fn test_no_scroll_before_first_jump() {
        let (mut state, mut rng) = fresh(ScrollMode::Soft);
        state.hero.standing = true;
        for _ in 0..500 {
            advance(&mut state, &mut rng);
        }
        assert_eq!(state.scroll.floor_offset, FIELD_H - 4);
        assert_eq!(state.scroll.count, 0);
    }

    #[test]
    fn test_scroll_moves_tower_and_hero() {
        let (mut state, mut rng) = fresh(ScrollMode::Hard);
        let y = state.hero.pos.y;
        let next = state.floors.next_row();
        scroll(&mut state, &mut rng);
        assert_eq!(state.scroll.floor_offset, FIELD_H - 3);
        assert_eq!(state.hero.pos.y, y + TILE);
        assert_eq!(state.floors.next_row(), next + 1);
    }

    #[test]
    fn test_accumulator_carries_remainder() {
        let (mut state, mut rng) = fresh(ScrollMode::Hard);
        state.hero.standing = true;
        state.scroll.has_started = true;
        state.scroll.speed = MAX_SCROLL_SPEED;
        state.scroll.count = SCROLL_THRESHOLD - 1000;
        advance(&mut state, &mut rng);
        assert_eq!(state.scroll.floor_offset, FIELD_H - 3);
        assert_eq!(state.scroll.count, 4000);
    }

    #[test]
    fn test_speed_is_capped() {
        let (mut state, mut rng) = fresh(ScrollMode::Hard);
        state.hero.standing = true;
        state.scroll.has_started = true;
        state.scroll.speed = MAX_SCROLL_SPEED - 1;
        advance(&mut state, &mut rng);
        advance(&mut state, &mut rng);
        assert_eq!(state.scroll.speed, MAX_SCROLL_SPEED);
    }

    #[test]
    fn test_hard_forced_scroll_snaps_tiles() {
        let (mut state, mut rng) = fresh(ScrollMode::Hard);
        state.hero.standing = false;
        state.hero.pos.y = TOP_LIMIT - 20;
        advance(&mut state, &mut rng);
        assert_eq!(state.hero.pos.y, TOP_LIMIT + 12);
        assert_eq!(state.scroll.floor_offset, FIELD_H - 2);
    }

    #[test]
    fn test_soft_forced_scroll_keeps_pixel_debt() {
        let (mut state, mut rng) = fresh(ScrollMode::Soft);
        state.hero.standing = false;
        state.hero.pos.y = TOP_LIMIT - 20;
        advance(&mut state, &mut rng);
        // 20px owed: one whole tile repaid, 4px left over
        assert_eq!(state.scroll.forced, 4);
        assert_eq!(state.hero.pos.y, TOP_LIMIT - 4);
        assert_eq!(camera_y(&state), TOP_LIMIT);
        assert_eq!(state.scroll.floor_offset, FIELD_H - 3);
    }

    #[test]
    fn test_no_forced_scroll_while_standing() {
        let (mut state, mut rng) = fresh(ScrollMode::Hard);
        state.hero.standing = true;
        state.hero.pos.y = TOP_LIMIT - 20;
        advance(&mut state, &mut rng);
        assert_eq!(state.hero.pos.y, TOP_LIMIT - 20);
    }

    #[test]
    fn test_soft_forced_scroll_on_takeoff_tick() {
        let (mut state, mut rng) = fresh(ScrollMode::Soft);
        state.hero.standing = true;
        state.hero.vel.y = -15;
        state.hero.pos.y = TOP_LIMIT - 20;
        advance(&mut state, &mut rng);
        assert_eq!(state.scroll.forced, 4);
        assert_eq!(camera_y(&state), TOP_LIMIT);

        // Hard mode keeps waiting for the hero to leave the floor
        let (mut state, mut rng) = fresh(ScrollMode::Hard);
        state.hero.standing = true;
        state.hero.vel.y = -15;
        state.hero.pos.y = TOP_LIMIT - 20;
        advance(&mut state, &mut rng);
        assert_eq!(state.hero.pos.y, TOP_LIMIT - 20);
    }

    #[test]
    fn test_death_line_counts_debt() {
        let (mut state, _) = fresh(ScrollMode::Soft);
        state.hero.pos.y = BOT_LIMIT - 5;
        assert!(!is_dead(&state));
        state.scroll.forced = 5;
        assert!(is_dead(&state));
    }

    #[test]
    fn test_camera_hard_is_tick_state() {
        let (state, _) = fresh(ScrollMode::Hard);
        let cam = camera(&state, 12);
        assert_eq!(cam.hero, state.hero.pos);
        assert_eq!(cam.shift, 0);
    }

    #[test]
    fn test_camera_soft_interpolates() {
        let (mut state, _) = fresh(ScrollMode::Soft);
        state.hero.standing = false;
        state.hero.vel = IVec2::new(20, -10);
        state.hero.pos.y = 200;
        let before = state.clone();

        let cam = camera(&state, TICK_MS / 2);
        assert_eq!(cam.hero.x, state.hero.pos.x + 10 * 12 / TICK_MS);
        assert_eq!(cam.hero.y, 200 - 10 * 12 / TICK_MS);
        assert!(!cam.standing);
        assert_eq!(cam.shift, 0);
        // Read-only
        assert_eq!(state, before);
    }

    #[test]
    fn test_camera_soft_clamps_to_top_margin() {
        let (mut state, _) = fresh(ScrollMode::Soft);
        state.hero.standing = false;
        state.hero.vel = IVec2::new(0, -16);
        state.hero.pos.y = TOP_LIMIT + 2;
        let cam = camera(&state, TICK_MS);
        assert_eq!(cam.hero.y, TOP_LIMIT);
        assert_eq!(cam.shift, 14);
    }
}
