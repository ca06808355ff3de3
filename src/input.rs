//! Keyboard to joystick translation
//!
//! Several physical keys map onto each logical input (arrows, WASD and the
//! keypad all work). The joystick tracks which physical keys are held, so
//! key-repeat events and overlapping keys for the same direction are harmless.
//! When left and right are both held, the most recently pressed one wins.

use std::collections::BTreeSet;

use crate::sim::{Direction, TickInput};

/// Physical keys the frontend can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    Keypad2,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad8,
    P,
    Pause,
    Q,
    Enter,
    Escape,
    /// Anything else, identified by a frontend-specific code
    Other(u32),
}

/// What a key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Jump,
    Left,
    Right,
    PauseToggle,
    Confirm,
    Quit,
    /// Unmapped; still counts as "any key" on the menu screens
    Other,
}

impl Key {
    /// Translate a physical key. Quit needs shift so it is hard to hit by
    /// accident.
    pub fn logical(self, shift: bool) -> LogicalKey {
        match self {
            Key::Up
            | Key::Down
            | Key::W
            | Key::S
            | Key::Space
            | Key::Keypad8
            | Key::Keypad5
            | Key::Keypad2 => LogicalKey::Jump,
            Key::Left | Key::A | Key::Keypad4 => LogicalKey::Left,
            Key::Right | Key::D | Key::Keypad6 => LogicalKey::Right,
            Key::P | Key::Pause => LogicalKey::PauseToggle,
            Key::Enter => LogicalKey::Confirm,
            Key::Q if shift => LogicalKey::Quit,
            _ => LogicalKey::Other,
        }
    }
}

/// Held-key state folded into a stick direction and a jump button
#[derive(Debug, Clone, Default)]
pub struct Joystick {
    held: BTreeSet<Key>,
    direction: Direction,
}

impl Joystick {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any physical key for `input` is down
    pub fn is_pressing(&self, input: LogicalKey) -> bool {
        // Shift only matters for Quit, which the joystick does not track.
        self.held.iter().any(|k| k.logical(false) == input)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn key_down(&mut self, key: Key) {
        if !self.held.insert(key) {
            // Key repeat
            return;
        }
        match key.logical(false) {
            LogicalKey::Left => self.direction = Direction::Left,
            LogicalKey::Right => self.direction = Direction::Right,
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if !self.held.remove(&key) {
            return;
        }
        let (released, other, other_dir) = match key.logical(false) {
            LogicalKey::Left => (Direction::Left, LogicalKey::Right, Direction::Right),
            LogicalKey::Right => (Direction::Right, LogicalKey::Left, Direction::Left),
            _ => return,
        };
        if self.direction != released || self.is_pressing(key.logical(false)) {
            return;
        }
        self.direction = if self.is_pressing(other) {
            other_dir
        } else {
            Direction::Neutral
        };
    }

    /// Forget all held keys
    pub fn clear(&mut self) {
        self.held.clear();
        self.direction = Direction::Neutral;
    }

    /// Snapshot consumed by one simulation tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            direction: self.direction,
            jump: self.is_pressing(LogicalKey::Jump),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::Space.logical(false), LogicalKey::Jump);
        assert_eq!(Key::Keypad2.logical(false), LogicalKey::Jump);
        assert_eq!(Key::A.logical(false), LogicalKey::Left);
        assert_eq!(Key::Keypad6.logical(false), LogicalKey::Right);
        assert_eq!(Key::Pause.logical(false), LogicalKey::PauseToggle);
        assert_eq!(Key::Enter.logical(false), LogicalKey::Confirm);
        assert_eq!(Key::Q.logical(true), LogicalKey::Quit);
        assert_eq!(Key::Q.logical(false), LogicalKey::Other);
        assert_eq!(Key::Other(1234).logical(true), LogicalKey::Other);
    }

    #[test]
    fn test_most_recent_side_wins() {
        let mut joy = Joystick::new();
        joy.key_down(Key::Left);
        assert_eq!(joy.direction(), Direction::Left);
        joy.key_down(Key::Right);
        assert_eq!(joy.direction(), Direction::Right);

        // Releasing the winner falls back to the side still held
        joy.key_up(Key::Right);
        assert_eq!(joy.direction(), Direction::Left);
        joy.key_up(Key::Left);
        assert_eq!(joy.direction(), Direction::Neutral);
    }

    #[test]
    fn test_releasing_loser_keeps_winner() {
        let mut joy = Joystick::new();
        joy.key_down(Key::Left);
        joy.key_down(Key::Right);
        joy.key_up(Key::Left);
        assert_eq!(joy.direction(), Direction::Right);
    }

    #[test]
    fn test_key_repeat_is_ignored() {
        let mut joy = Joystick::new();
        joy.key_down(Key::Left);
        joy.key_down(Key::Right);
        // Auto-repeat of the older key must not steal the direction
        joy.key_down(Key::Left);
        assert_eq!(joy.direction(), Direction::Right);
    }

    #[test]
    fn test_two_keys_same_side() {
        let mut joy = Joystick::new();
        joy.key_down(Key::Left);
        joy.key_down(Key::A);
        joy.key_up(Key::Left);
        assert_eq!(joy.direction(), Direction::Left);
        assert!(joy.is_pressing(LogicalKey::Left));
        joy.key_up(Key::A);
        assert_eq!(joy.direction(), Direction::Neutral);
    }

    #[test]
    fn test_jump_and_clear() {
        let mut joy = Joystick::new();
        joy.key_down(Key::W);
        joy.key_down(Key::D);
        let input = joy.tick_input();
        assert!(input.jump);
        assert_eq!(input.direction, Direction::Right);

        joy.clear();
        assert_eq!(joy.tick_input(), TickInput::default());
    }

    #[test]
    fn test_stray_release_is_ignored() {
        let mut joy = Joystick::new();
        joy.key_down(Key::Right);
        joy.key_up(Key::Left);
        joy.key_up(Key::Other(3));
        assert_eq!(joy.direction(), Direction::Right);
    }
}
