//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, seeded by the caller
//! - Integer arithmetic with truncating division
//! - No rendering, clock or platform dependencies

pub mod floors;
pub mod physics;
pub mod rng;
pub mod scroll;
pub mod state;
pub mod tick;

pub use floors::{Floor, FloorRing};
pub use rng::TowerRng;
pub use scroll::Camera;
pub use state::{Direction, Hero, ScrollMode, ScrollState, SimulationState, TickInput};
pub use tick::{TickOutcome, tick};
