//! Hero physics and collision
//!
//! Everything is integer arithmetic with truncating division, so identical
//! inputs always give identical trajectories. The order of the steps inside
//! [`step`] matters: the floor test depends on the x set by the wall test,
//! and acceleration depends on whether the floor test found ground.

use glam::IVec2;

use super::floors::FloorRing;
use super::state::{Direction, Hero, SimulationState, TickInput};
use crate::consts::*;

/// Horizontal acceleration on the ground and in the air
pub const GROUND_ACCEL: i32 = 3;
pub const AIR_ACCEL: i32 = 2;
/// Ground friction when no direction is held
pub const FRICTION: i32 = 3;
/// Downward acceleration once the jump budget is spent
pub const GRAVITY: i32 = 2;

/// How far past a floor's edge tiles the hero still counts as standing.
/// Both ends of the test are inclusive.
pub const STAND_REACH_LEFT: i32 = 24;
pub const STAND_REACH_RIGHT: i32 = 8;

/// Jump budget is `|vx| / JUMP_SPEED_DIV + JUMP_BASE`
const JUMP_BASE: i32 = 7;
const JUMP_SPEED_DIV: i32 = 4;
/// Upward speed is `budget / 2 + JUMP_KICK`
const JUMP_KICK: i32 = 12;

/// Wall overshoot absorbed before the bounce pushes back
const WALL_DAMPING: i32 = 2;

/// Standing ticks per idle animation frame
const IDLE_PERIOD: u32 = 5;
/// Tower rows per score point
pub const ROWS_PER_FLOOR: i32 = 5;

/// Snap a y coordinate down onto the tile grid
#[inline]
pub fn snap_to_floor(y: i32) -> i32 {
    (y / TILE) * TILE
}

/// Whether a hero at `pos` moving at vertical speed `vy` rests on a floor
pub fn stands_at(floors: &FloorRing, floor_offset: i32, vy: i32, pos: IVec2) -> bool {
    if vy < 0 {
        return false;
    }

    let row = (pos.y + HERO_SIZE) / TILE;
    if row >= FIELD_H {
        return false;
    }

    let floor = floors.get(floor_offset - row);
    floor.left * TILE - STAND_REACH_LEFT <= pos.x && pos.x <= floor.right * TILE + STAND_REACH_RIGHT
}

impl SimulationState {
    /// Floor test for the current hero velocity at an arbitrary position
    pub fn is_standing_at(&self, pos: IVec2) -> bool {
        stands_at(&self.floors, self.scroll.floor_offset, self.hero.vel.y, pos)
    }
}

/// Bounce off the side walls.
///
/// The bounce keeps half the speed and pushes the hero back by half of the
/// overshoot beyond `WALL_DAMPING` pixels, which avoids 1px flicker when
/// running slowly into a wall.
pub fn collide_walls(hero: &mut Hero) {
    if hero.pos.x < LEFT_LIMIT && hero.vel.x <= 0 {
        hero.pos.x = LEFT_LIMIT + (LEFT_LIMIT - hero.pos.x - WALL_DAMPING).max(0) / 2;
        hero.vel.x = -hero.vel.x / 2;
    }

    if hero.pos.x > RIGHT_LIMIT && hero.vel.x >= 0 {
        hero.pos.x = RIGHT_LIMIT - (hero.pos.x - RIGHT_LIMIT - WALL_DAMPING).max(0) / 2;
        hero.vel.x = -hero.vel.x / 2;
    }
}

/// Advance the hero by one tick: move, collide, jump, accelerate and fall
pub fn step(state: &mut SimulationState, input: &TickInput) {
    let hero = &mut state.hero;
    hero.pos.x += hero.vel.x / 2;
    hero.pos.y += hero.vel.y;

    collide_walls(hero);

    let standing = state.is_standing_at(state.hero.pos);
    let hero = &mut state.hero;
    hero.standing = standing;

    if standing {
        hero.pos.y = snap_to_floor(hero.pos.y);
        hero.vel.y = 0;

        let reached = (state.scroll.floor_offset - (hero.pos.y + HERO_SIZE) / TILE) / ROWS_PER_FLOOR;
        state.score = state.score.max(reached as i64);

        hero.idle_count += 1;
        if hero.idle_count >= IDLE_PERIOD {
            hero.idle_variant = !hero.idle_variant;
            hero.idle_count = 0;
        }

        if input.jump {
            hero.jump = hero.vel.x.abs() / JUMP_SPEED_DIV + JUMP_BASE;
            hero.vel.y = -hero.jump / 2 - JUMP_KICK;
            if !state.scroll.has_started {
                state.scroll.has_started = true;
                state.scroll.speed = START_SCROLL_SPEED;
                log::debug!("First jump at tick {}, tower starts scrolling", state.time_ticks);
            }
        }
    }

    let accel = if standing { GROUND_ACCEL } else { AIR_ACCEL };
    match input.direction {
        Direction::Left => {
            hero.vel.x = (hero.vel.x - accel).max(-MAX_VX);
            hero.facing_right = false;
        }
        Direction::Right => {
            hero.vel.x = (hero.vel.x + accel).min(MAX_VX);
            hero.facing_right = true;
        }
        Direction::Neutral => {
            if standing {
                hero.vel.x = if hero.vel.x < -2 {
                    hero.vel.x + FRICTION
                } else if hero.vel.x > 2 {
                    hero.vel.x - FRICTION
                } else {
                    0
                };
            }
        }
    }

    if !standing {
        if hero.jump > 0 {
            hero.vel.y = -hero.jump / 2 - JUMP_KICK;
            hero.jump = if input.jump { hero.jump - 1 } else { 0 };
        } else {
            hero.vel.y = (hero.vel.y + GRAVITY).min(MAX_FALL);
            hero.jump = 0;
        }
    }

    debug_assert!((-MAX_VX..=MAX_VX).contains(&hero.vel.x));
    debug_assert!(hero.jump > 0 || hero.vel.y <= MAX_FALL);
}
