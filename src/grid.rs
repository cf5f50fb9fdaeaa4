//! 2D collision grid over the obstacle-photography arena.
//!
//! Unlike `horus_library`'s probabilistic `OccupancyGrid` (a dense
//! width x height array of occupancy floats built from sensor sweeps), this
//! grid has no cells at all: obstacles are few (a handful) and fixed for the
//! duration of one planning call, so clearance is checked analytically
//! against the obstacle list rather than by indexing a raster.

use crate::config::PlannerConfig;
use crate::obstacle::Obstacle;

/// The bounded square arena plus the obstacles currently occupying it.
pub struct Grid<'a> {
    config: &'a PlannerConfig,
    pub obstacles: Vec<Obstacle>,
}

impl<'a> Grid<'a> {
    pub fn new(config: &'a PlannerConfig, obstacles: Vec<Obstacle>) -> Self {
        Self { config, obstacles }
    }

    pub fn config(&self) -> &PlannerConfig {
        self.config
    }

    /// Whether `(x, y)` lies in the valid interior band, leaving a one-cell
    /// buffer from the physical arena walls.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= self.config.min_index
            && x <= self.config.max_index
            && y >= self.config.min_index
            && y <= self.config.max_index
    }

    /// Whether the robot could occupy `(x, y)` without clipping any
    /// obstacle: in bounds, and outside the Chebyshev clearance box of
    /// every obstacle.
    ///
    /// `turn` is accepted for interface symmetry with the arc-sweep check
    /// callers but has no effect — reserved for a future turn-specific
    /// clearance rule.
    pub fn reachable(&self, x: i32, y: i32, turn: bool) -> bool {
        let _ = turn;
        if !self.in_bounds(x, y) {
            return false;
        }
        let clearance = self.config.clearance;
        self.obstacles
            .iter()
            .all(|o| (o.x - x).abs() > clearance || (o.y - y).abs() > clearance)
    }

    pub fn obstacle_by_id(&self, id: i32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacle_by_id_mut(&mut self, id: i32) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }
}
