//! Robot/obstacle-face heading and the kinematic arc table.
//!
//! Headings are deliberately integer-valued at {0, 2, 4, 6} rather than a
//! plain 0..4 enum: turn classification throughout the planner is done with
//! `(h' - h) mod 8`, and that only comes out to the clean {2, 4, 6} set of
//! outcomes when the four headings are spaced two apart. Keep these exact
//! values if you ever touch this type.

use serde::{Deserialize, Serialize};

/// One of the four cardinal directions the robot (or an obstacle face) can
/// point in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Heading {
    North = 0,
    East = 2,
    South = 4,
    West = 6,
}

impl Heading {
    /// All four headings, in a fixed canonical order.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// The integer value used in mod-8 turn arithmetic.
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Build a `Heading` from one of the raw values `{0, 2, 4, 6}`.
    pub fn from_value(v: i32) -> Option<Heading> {
        match v.rem_euclid(8) {
            0 => Some(Heading::North),
            2 => Some(Heading::East),
            4 => Some(Heading::South),
            6 => Some(Heading::West),
            _ => None,
        }
    }

    /// Heading rotated 180 degrees — the direction a robot faces when it
    /// stands looking back at a face pointing this way.
    pub fn opposite(self) -> Heading {
        Heading::from_value(self.value() + 4).expect("opposite of a valid heading is valid")
    }

    /// Minimum angular distance (in units of 2 == 90 degrees) to rotate from
    /// `self` to `other`, taking the shorter way around the compass.
    pub fn rotation_cost(self, other: Heading) -> i32 {
        let diff = (self.value() - other.value()).abs();
        diff.min(8 - diff)
    }

    /// Signed `(other - self) mod 8` turn delta, as used to classify
    /// FR90/FL90/180 turns in the command encoder.
    pub fn turn_delta(self, other: Heading) -> i32 {
        (other.value() - self.value()).rem_euclid(8)
    }

    /// Unit step `(dx, dy)` for moving one cell forward while facing this
    /// heading (north is +y, east is +x).
    pub fn unit_step(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::South => (0, -1),
            Heading::East => (1, 0),
            Heading::West => (-1, 0),
        }
    }
}

/// The four 90-degree arc manoeuvres a differential-drive robot with a fixed
/// 3-cell turn radius can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arc {
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
}

impl Arc {
    /// All four arc manoeuvres, in the order neighbour expansion tries them.
    pub const ALL: [Arc; 4] = [
        Arc::ForwardLeft,
        Arc::ForwardRight,
        Arc::BackwardLeft,
        Arc::BackwardRight,
    ];

    /// Displacement `(dx, dy)` (in units of the turn radius `r`) and
    /// resulting heading for executing this arc while facing `heading`.
    ///
    /// Values are exact-valued fixed tables, not derived by rotating a
    /// single base case, so that a transcription error in one heading can't
    /// silently propagate to the other three.
    pub fn displacement(self, heading: Heading, r: i32) -> (i32, i32, Heading) {
        use Heading::*;
        let (sx, sy, new_h) = match (self, heading) {
            (Arc::ForwardLeft, North) => (-1, 1, West),
            (Arc::ForwardLeft, East) => (1, 1, North),
            (Arc::ForwardLeft, South) => (1, -1, East),
            (Arc::ForwardLeft, West) => (-1, -1, South),

            (Arc::ForwardRight, North) => (1, 1, East),
            (Arc::ForwardRight, East) => (1, -1, South),
            (Arc::ForwardRight, South) => (-1, -1, West),
            (Arc::ForwardRight, West) => (-1, 1, North),

            (Arc::BackwardLeft, North) => (-1, -1, East),
            (Arc::BackwardLeft, East) => (-1, 1, South),
            (Arc::BackwardLeft, South) => (1, 1, West),
            (Arc::BackwardLeft, West) => (1, -1, North),

            (Arc::BackwardRight, North) => (1, -1, West),
            (Arc::BackwardRight, East) => (-1, -1, North),
            (Arc::BackwardRight, South) => (-1, 1, East),
            (Arc::BackwardRight, West) => (1, 1, South),
        };
        (sx * r, sy * r, new_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for h in Heading::ALL {
            assert_eq!(h.opposite().opposite(), h);
        }
    }

    #[test]
    fn rotation_cost_takes_shorter_way() {
        assert_eq!(Heading::North.rotation_cost(Heading::East), 2);
        assert_eq!(Heading::North.rotation_cost(Heading::West), 2);
        assert_eq!(Heading::North.rotation_cost(Heading::South), 4);
        assert_eq!(Heading::North.rotation_cost(Heading::North), 0);
    }

    #[test]
    fn turn_delta_matches_fr_fl_classification() {
        assert_eq!(Heading::North.turn_delta(Heading::East), 2); // FR90
        assert_eq!(Heading::North.turn_delta(Heading::West), 6); // FL90
        assert_eq!(Heading::North.turn_delta(Heading::South), 4); // 180
    }

    #[test]
    fn arc_table_displacements_match_spec() {
        assert_eq!(
            Arc::ForwardLeft.displacement(Heading::North, 3),
            (-3, 3, Heading::West)
        );
        assert_eq!(
            Arc::ForwardRight.displacement(Heading::South, 3),
            (-3, -3, Heading::West)
        );
        assert_eq!(
            Arc::BackwardLeft.displacement(Heading::West, 3),
            (3, -3, Heading::North)
        );
        assert_eq!(
            Arc::BackwardRight.displacement(Heading::East, 3),
            (-3, -3, Heading::North)
        );
    }

    #[test]
    fn from_value_rejects_odd_headings() {
        assert!(Heading::from_value(1).is_none());
        assert_eq!(Heading::from_value(0), Some(Heading::North));
        assert_eq!(Heading::from_value(8), Some(Heading::North));
    }
}
