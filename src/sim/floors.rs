//! Procedural floor generation
//!
//! Floor positions are measured in tiles. The left and right walls sit in
//! columns 0 and 31, so a walkable floor spans at most columns 1..=30. Each
//! tower row gets one `Floor`; rows are generated strictly in order and kept
//! in a fixed ring indexed by row number.

use serde::{Deserialize, Serialize};

use super::rng::TowerRng;
use crate::consts::*;

/// Every row that is a multiple of this is a full-width rest floor
pub const FULL_FLOOR_PERIOD: i32 = 250;
/// Every row that is a multiple of this carries a floor
pub const FLOOR_PERIOD: i32 = 5;
/// The floor origin cursor ranges over `[0, ORIGIN_SPAN)`
pub const ORIGIN_SPAN: i32 = 22;
/// First row generated by a new tower (a few rows below the start floor)
pub const FIRST_ROW: i32 = -3;

/// Tile offset from the origin cursor to the floor center
const ORIGIN_OFFSET: i32 = 5;
/// Cursor step magnitude between consecutive floors
const STEP_MIN: u32 = 5;
const STEP_MAX: u32 = 9;
/// Tiles on each side of the floor center
const SIDE_MIN: u32 = 2;
const SIDE_MAX: u32 = 4;

/// A walkable span of tiles at one tower row (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub left: i32,
    pub right: i32,
}

impl Floor {
    /// No floor on this row. Negative on both sides so it can never alias a
    /// real span.
    pub const EMPTY: Floor = Floor {
        left: -10,
        right: -20,
    };

    /// Wall to wall
    pub const FULL: Floor = Floor {
        left: 1,
        right: FIELD_W - 2,
    };

    pub fn is_empty(&self) -> bool {
        self.left > self.right
    }

    /// Width in tiles (0 for an empty row)
    pub fn width(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.right - self.left + 1
        }
    }
}

/// Ring of the most recently generated floors plus the generator cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRing {
    floors: Vec<Floor>,
    /// Horizontal origin of the last floor, in `[0, ORIGIN_SPAN)`
    fpos: i32,
    /// Row number of the next floor to generate
    next_row: i32,
}

impl FloorRing {
    /// Start a fresh tower and fill the whole ring
    pub fn new(rng: &mut TowerRng) -> Self {
        let mut ring = Self {
            floors: vec![Floor::EMPTY; FLOOR_RING_LEN],
            fpos: 0,
            next_row: FIRST_ROW,
        };
        ring.refill(rng);
        ring
    }

    /// Start a fresh tower in the existing buffer
    pub fn refill(&mut self, rng: &mut TowerRng) {
        self.fpos = rng.range(0, (ORIGIN_SPAN - 1) as u32) as i32;
        self.next_row = FIRST_ROW;
        for _ in 0..FLOOR_RING_LEN {
            self.generate_next(rng);
        }
    }

    fn slot(row: i32) -> usize {
        row.rem_euclid(FLOOR_RING_LEN as i32) as usize
    }

    /// Generate the floor for the next row and advance the row counter
    pub fn generate_next(&mut self, rng: &mut TowerRng) {
        let row = self.next_row;
        self.next_row += 1;

        let floor = if row % FULL_FLOOR_PERIOD == 0 {
            Floor::FULL
        } else if row % FLOOR_PERIOD == 0 {
            let sign = if rng.coin() { 1 } else { -1 };
            let step = rng.range(STEP_MIN, STEP_MAX) as i32;
            self.fpos = (self.fpos + sign * step).rem_euclid(ORIGIN_SPAN);

            let center = self.fpos + ORIGIN_OFFSET;
            let left = center - rng.range(SIDE_MIN, SIDE_MAX) as i32;
            let right = center + rng.range(SIDE_MIN, SIDE_MAX) as i32;
            Floor { left, right }
        } else {
            Floor::EMPTY
        };

        debug_assert!(
            floor.is_empty() || (1 <= floor.left && floor.right <= FIELD_W - 2),
            "floor {floor:?} at row {row} pokes into a wall"
        );
        self.floors[Self::slot(row)] = floor;
    }

    /// Floor at a tower row. The row must still be held by the ring.
    pub fn get(&self, row: i32) -> Floor {
        debug_assert!(
            self.holds(row),
            "row {row} outside ring window ending at {}",
            self.next_row
        );
        self.floors[Self::slot(row)]
    }

    /// Whether `row` has been generated and not yet overwritten
    pub fn holds(&self, row: i32) -> bool {
        row < self.next_row && row >= self.next_row - FLOOR_RING_LEN as i32
    }

    pub fn next_row(&self) -> i32 {
        self.next_row
    }

    pub fn cursor(&self) -> i32 {
        self.fpos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Generate `rows` more rows, yielding each (row, floor) right after it
    /// is produced
    fn walk(ring: &mut FloorRing, rng: &mut TowerRng, rows: usize) -> Vec<(i32, Floor)> {
        (0..rows)
            .map(|_| {
                ring.generate_next(rng);
                let row = ring.next_row() - 1;
                (row, ring.get(row))
            })
            .collect()
    }

    #[test]
    fn test_new_fills_ring() {
        let mut rng = TowerRng::new(1, 2);
        let ring = FloorRing::new(&mut rng);
        assert_eq!(ring.next_row(), FIRST_ROW + FLOOR_RING_LEN as i32);
        assert!(ring.holds(FIRST_ROW));
        assert!(!ring.holds(FIRST_ROW - 1));
        // Row 0 is where the hero starts
        assert_eq!(ring.get(0), Floor::FULL);
    }

    #[test]
    fn test_refill_reuses_buffer() {
        let mut rng = TowerRng::new(6, 6);
        let mut ring = FloorRing::new(&mut rng);
        walk(&mut ring, &mut rng, 500);
        let buffer = ring.floors.as_ptr();

        let fresh = FloorRing::new(&mut rng.clone());
        ring.refill(&mut rng);
        assert_eq!(ring, fresh);
        assert_eq!(ring.floors.as_ptr(), buffer);
    }

    #[test]
    fn test_floor_policy() {
        let mut rng = TowerRng::new(99, 3);
        let mut ring = FloorRing::new(&mut rng);
        for (row, floor) in walk(&mut ring, &mut rng, 3000) {
            if row % FULL_FLOOR_PERIOD == 0 {
                assert_eq!(floor, Floor::FULL, "row {row}");
            } else if row % FLOOR_PERIOD == 0 {
                assert!((5..=9).contains(&floor.width()), "row {row}: {floor:?}");
                assert!(floor.left >= 1 && floor.right <= FIELD_W - 2);
            } else {
                assert!(floor.is_empty(), "row {row}: {floor:?}");
            }
        }
    }

    #[test]
    fn test_cursor_random_walk() {
        let mut rng = TowerRng::new(5, 5);
        let mut ring = FloorRing::new(&mut rng);
        let mut last = ring.cursor();
        for (row, _) in walk(&mut ring, &mut rng, 1000) {
            if row % FULL_FLOOR_PERIOD != 0 && row % FLOOR_PERIOD == 0 {
                let step = (ring.cursor() - last).rem_euclid(ORIGIN_SPAN);
                assert!(
                    (5..=9).contains(&step) || (13..=17).contains(&step),
                    "cursor jumped by {step}"
                );
                last = ring.cursor();
            }
            assert!((0..ORIGIN_SPAN).contains(&ring.cursor()));
        }
    }

    #[test]
    fn test_all_widths_occur() {
        let mut rng = TowerRng::new(1234, 0);
        let mut ring = FloorRing::new(&mut rng);
        let mut seen = [false; 10];
        for (_, floor) in walk(&mut ring, &mut rng, 5000) {
            if !floor.is_empty() && floor != Floor::FULL {
                seen[floor.width() as usize] = true;
            }
        }
        assert_eq!(&seen[5..=9], &[true; 5]);
    }

    #[test]
    fn test_ring_window_slides() {
        let mut rng = TowerRng::default();
        let mut ring = FloorRing::new(&mut rng);
        let first = ring.next_row() - FLOOR_RING_LEN as i32;
        ring.generate_next(&mut rng);
        assert!(!ring.holds(first));
        assert!(ring.holds(first + 1));
    }

    #[test]
    fn test_same_seed_same_tower() {
        let a = FloorRing::new(&mut TowerRng::new(10, 20));
        let b = FloorRing::new(&mut TowerRng::new(10, 20));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(Floor::EMPTY.is_empty());
        assert_eq!(Floor::EMPTY.width(), 0);
        assert_eq!(Floor::FULL.width(), 30);
    }

    proptest! {
        #[test]
        fn prop_generated_floors_follow_policy(state in any::<u64>(), seq in any::<u64>()) {
            let mut rng = TowerRng::new(state, seq);
            let mut ring = FloorRing::new(&mut rng);
            for (row, floor) in walk(&mut ring, &mut rng, 300) {
                if row % FULL_FLOOR_PERIOD == 0 {
                    prop_assert_eq!(floor, Floor::FULL);
                } else if row % FLOOR_PERIOD == 0 {
                    prop_assert!((5..=9).contains(&floor.width()));
                } else {
                    prop_assert!(floor.is_empty());
                }
            }
        }
    }
}
