//! Screen state machine and fixed timestep driver
//!
//! `Game` owns everything a session needs: the seeded RNG, the current run,
//! the joystick and the score sink. The frontend feeds it input events and
//! wall-clock time and asks it for render snapshots.

use std::time::Duration;

use crate::consts::*;
use crate::highscores::ScoreSink;
use crate::input::{Joystick, Key, LogicalKey};
use crate::render::{self, RenderState};
use crate::sim::{self, ScrollMode, SimulationState, TickOutcome, TowerRng};

/// Which screen is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Active gameplay
    Running,
    /// Frozen until any key or focus comes back
    Paused,
    /// Game over banner, shown for a fixed delay
    GameOver { remaining_ticks: u32 },
    /// Highscore listing, any key starts a new run
    HighScores,
}

/// Something that may move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Key(LogicalKey),
    FocusLost,
    FocusGained,
    /// The hero fell off the bottom of the field
    Died,
    /// The game over banner has been shown long enough
    DelayElapsed,
}

impl Phase {
    /// Transition table. Events that mean nothing in a phase leave it as is.
    pub fn next(self, event: PhaseEvent) -> Phase {
        match (self, event) {
            // Quitting is handled by the driver, never a transition
            (phase, PhaseEvent::Key(LogicalKey::Quit)) => phase,

            (Phase::Running, PhaseEvent::Key(LogicalKey::PauseToggle) | PhaseEvent::FocusLost) => {
                Phase::Paused
            }
            (Phase::Running, PhaseEvent::Died) => Phase::GameOver {
                remaining_ticks: GAMEOVER_DELAY_TICKS,
            },

            (Phase::Paused, PhaseEvent::Key(_) | PhaseEvent::FocusGained) => Phase::Running,

            (Phase::GameOver { .. }, PhaseEvent::Key(_) | PhaseEvent::DelayElapsed) => {
                Phase::HighScores
            }

            (Phase::HighScores, PhaseEvent::Key(_)) => Phase::Running,

            (phase, _) => phase,
        }
    }

    /// Whether the catch-up loop consumes time in this phase
    pub fn is_ticking(&self) -> bool {
        matches!(self, Phase::Running | Phase::GameOver { .. })
    }
}

/// What the frontend should do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A game session
#[derive(Debug)]
pub struct Game<S: ScoreSink> {
    rng: TowerRng,
    state: SimulationState,
    joystick: Joystick,
    sink: S,
    phase: Phase,
    /// Wall-clock time not yet consumed by ticks
    accumulator: Duration,
}

impl<S: ScoreSink> Game<S> {
    /// Start a session with a seeded RNG. The first run begins immediately.
    pub fn new(mut rng: TowerRng, mode: ScrollMode, sink: S) -> Self {
        let state = SimulationState::new(&mut rng, mode);
        log::info!("New run ({} scroll)", mode.as_str());
        Self {
            rng,
            state,
            joystick: Joystick::new(),
            sink,
            phase: Phase::Running,
            accumulator: Duration::ZERO,
        }
    }

    /// Throw away the current run and start a fresh one
    pub fn init_game(&mut self) {
        self.joystick.clear();
        self.state.reset(&mut self.rng);
        self.accumulator = Duration::ZERO;
        self.phase = Phase::Running;
        log::info!("New run ({} scroll)", self.state.mode.as_str());
    }

    pub fn on_key_down(&mut self, key: Key, shift: bool) -> Flow {
        self.joystick.key_down(key);
        let logical = key.logical(shift);
        if logical == LogicalKey::Quit {
            log::info!("Quit requested");
            return Flow::Quit;
        }
        self.transition(PhaseEvent::Key(logical));
        Flow::Continue
    }

    pub fn on_key_up(&mut self, key: Key) {
        self.joystick.key_up(key);
    }

    pub fn on_focus_lost(&mut self) {
        self.transition(PhaseEvent::FocusLost);
    }

    pub fn on_focus_gained(&mut self) {
        self.transition(PhaseEvent::FocusGained);
    }

    /// One fixed timestep. Only a running game touches the simulation.
    pub fn tick(&mut self) {
        match self.phase {
            Phase::Running => {
                let input = self.joystick.tick_input();
                if sim::tick(&mut self.state, &input, &mut self.rng) == TickOutcome::Died {
                    self.transition(PhaseEvent::Died);
                }
            }
            Phase::GameOver { remaining_ticks } => {
                if remaining_ticks <= 1 {
                    self.transition(PhaseEvent::DelayElapsed);
                } else {
                    self.phase = Phase::GameOver {
                        remaining_ticks: remaining_ticks - 1,
                    };
                }
            }
            Phase::Paused | Phase::HighScores => {}
        }
    }

    /// Feed wall-clock time and run as many ticks as it pays for.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.phase.is_ticking() {
            return 0;
        }
        self.accumulator += elapsed.min(MAX_FRAME);

        let mut ticks = 0;
        while self.accumulator >= TICK && self.phase.is_ticking() {
            self.accumulator -= TICK;
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick accumulated since the last one, in `[0, 1)`
    pub fn fraction(&self) -> f64 {
        self.accumulator.as_secs_f64() / TICK.as_secs_f64()
    }

    /// Read-only picture of the session `fraction` of a tick after the last one
    pub fn snapshot_for_render(&self, fraction: f64) -> RenderState {
        render::snapshot(&self.state, self.phase, fraction, self.sink.standings())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn transition(&mut self, event: PhaseEvent) {
        let from = self.phase;
        let to = from.next(event);
        if from == to {
            return;
        }
        log::debug!("{from:?} -> {to:?} on {event:?}");

        match (from, to) {
            (Phase::Running, Phase::GameOver { .. }) => {
                log::info!(
                    "Game over on floor {} after {} ticks",
                    self.state.score,
                    self.state.time_ticks
                );
                self.sink.report_score(self.state.score);
            }
            (Phase::GameOver { .. }, Phase::HighScores) => {
                self.accumulator = Duration::ZERO;
            }
            (Phase::HighScores, Phase::Running) => self.init_game(),
            _ => {}
        }
        self.phase = to;
    }
}
