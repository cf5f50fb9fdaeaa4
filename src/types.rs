//! Core position/state value types.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::heading::Heading;

/// A robot (or obstacle-face) position and facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub x: i32,
    pub y: i32,
    pub h: Heading,
}

impl Pose {
    pub fn new(x: i32, y: i32, h: Heading) -> Self {
        Self { x, y, h }
    }
}

/// A pathfinding state: a [`Pose`] plus bookkeeping the scheduler and
/// command encoder need but that must *not* participate in A*'s notion of
/// "the same state" — two `Cell`s at the same `(x, y, h)` with different
/// `snap`/`penalty` are the same search node.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub pose: Pose,
    /// Obstacle id to snapshot at this waypoint, or `-1` for none.
    pub snap: i32,
    /// Extra cost the scheduler's cost matrix charges for ending a segment
    /// here. Never added to an A* edge cost.
    pub penalty: f64,
}

impl Cell {
    pub fn new(x: i32, y: i32, h: Heading) -> Self {
        Self {
            pose: Pose::new(x, y, h),
            snap: -1,
            penalty: 0.0,
        }
    }

    pub fn with_snap(x: i32, y: i32, h: Heading, snap: i32, penalty: f64) -> Self {
        Self {
            pose: Pose::new(x, y, h),
            snap,
            penalty,
        }
    }

    pub fn x(&self) -> i32 {
        self.pose.x
    }

    pub fn y(&self) -> i32 {
        self.pose.y
    }

    pub fn heading(&self) -> Heading {
        self.pose.h
    }
}

/// Equality over `(x, y, h)` only — `snap`/`penalty` are metadata, not part
/// of the search state. This is what lets the A* cost cache hit when the
/// scheduler passes two viewing cells for the same obstacle that differ only
/// in penalty.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.pose == other.pose
    }
}
impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pose.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_equality_ignores_snap_and_penalty() {
        let a = Cell::with_snap(5, 5, Heading::North, 1, 0.0);
        let b = Cell::with_snap(5, 5, Heading::North, -1, 50.0);
        assert_eq!(a, b);

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn cell_inequality_on_position_or_heading() {
        let a = Cell::new(5, 5, Heading::North);
        let b = Cell::new(5, 6, Heading::North);
        let c = Cell::new(5, 5, Heading::East);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
