//! Fixed timestep simulation tick
//!
//! Core step that advances a run deterministically.

use super::physics;
use super::rng::TowerRng;
use super::scroll;
use super::state::{SimulationState, TickInput};

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Alive,
    /// The hero fell past the bottom of the field
    Died,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut SimulationState, input: &TickInput, rng: &mut TowerRng) -> TickOutcome {
    state.time_ticks += 1;

    // Scrolling must come after the hero move, it depends on the final x/y.
    physics::step(state, input);
    scroll::advance(state, rng);

    if scroll::is_dead(state) {
        TickOutcome::Died
    } else {
        TickOutcome::Alive
    }
}
