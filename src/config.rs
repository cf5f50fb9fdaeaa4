//! Planner configuration.
//!
//! Every geometric and cost constant the planning core uses is collected
//! here instead of being scattered through the algorithm modules as
//! literals. [`PlannerConfig::default`] reproduces the bit-exact constants
//! table; callers who need to recalibrate for a different arena or camera
//! can load overrides from TOML with [`PlannerConfig::from_toml_str`].
//!
//! # Example
//!
//! ```rust
//! use arena_planner::config::PlannerConfig;
//!
//! let cfg = PlannerConfig::default();
//! assert_eq!(cfg.grid_size, 20);
//! assert_eq!(cfg.turn_radius, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// All tunable constants for the collision model, A*, viewing-pose
/// generator, and scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Cell edge length in centimetres.
    pub cell_size_cm: u32,
    /// Arena width/height in cells (square arena).
    pub grid_size: i32,
    /// Lowest valid interior index (inclusive).
    pub min_index: i32,
    /// Highest valid interior index (inclusive).
    pub max_index: i32,
    /// Turn radius in cells for a 90-degree arc.
    pub turn_radius: i32,
    /// Chebyshev clearance cells required around every obstacle.
    pub clearance: i32,
    /// Cost of a single straight one-cell step.
    pub straight_cost: f64,
    /// Fixed penalty added to a turn edge's cost, before the radius term.
    pub turn_cost: f64,
    /// Camera focus distance in centimetres.
    pub camera_focus_cm: u32,
    /// Obstacle face width in centimetres.
    pub obstacle_size_cm: u32,
    /// Floor on the computed stand-off distance, in cells.
    pub min_stand_off: i32,
    /// Penalty applied to the "one cell further back" viewing candidate.
    pub opposite_retry_penalty: f64,
    /// Penalty applied to the two lateral viewing candidates.
    pub screenshot_penalty: f64,
    /// Sentinel value treated as "infeasible" in the TSP cost matrix.
    pub tsp_infinity: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cell_size_cm: 10,
            grid_size: 20,
            min_index: 1,
            max_index: 18,
            turn_radius: 3,
            clearance: 2,
            straight_cost: 1.0,
            turn_cost: 20.0,
            camera_focus_cm: 20,
            obstacle_size_cm: 10,
            min_stand_off: 3,
            opposite_retry_penalty: 5.0,
            screenshot_penalty: 50.0,
            tsp_infinity: 1e9,
        }
    }
}

impl PlannerConfig {
    /// Total cost of a single 90-degree arc edge (`turn_cost + turn_radius`).
    pub fn turn_edge_cost(&self) -> f64 {
        self.turn_cost + self.turn_radius as f64
    }

    /// Nominal stand-off distance in cells for a given `retrying` flag.
    ///
    /// `d = max(min_stand_off, (camera_focus_cm + obstacle_size_cm/2) / cell_size_cm)`,
    /// `+1` when retrying.
    pub fn stand_off_cells(&self, retrying: bool) -> i32 {
        let nominal =
            (self.camera_focus_cm + self.obstacle_size_cm / 2) as i32 / self.cell_size_cm as i32;
        let base = nominal.max(self.min_stand_off);
        if retrying {
            base + 1
        } else {
            base
        }
    }

    /// Parse a `PlannerConfig` from a TOML document, applying defaults for
    /// any field the document omits, then validate it.
    pub fn from_toml_str(s: &str) -> PlannerResult<Self> {
        let cfg: PlannerConfig =
            toml::from_str(s).map_err(|e| PlannerError::Config(format!("bad TOML: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a `PlannerConfig` from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> PlannerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PlannerError::Config(format!("cannot read {:?}: {e}", path.as_ref())))?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations that cannot possibly produce a usable arena.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.cell_size_cm == 0 {
            return Err(PlannerError::Config("cell_size_cm must be > 0".into()));
        }
        if self.grid_size <= 0 {
            return Err(PlannerError::Config("grid_size must be > 0".into()));
        }
        if self.turn_radius <= 0 {
            return Err(PlannerError::Config("turn_radius must be > 0".into()));
        }
        if self.clearance < 0 {
            return Err(PlannerError::Config("clearance must be >= 0".into()));
        }
        if self.min_index > self.max_index {
            return Err(PlannerError::Config(
                "min_index must be <= max_index".into(),
            ));
        }
        if self.max_index - self.min_index < 2 * self.clearance {
            return Err(PlannerError::Config(
                "clearance leaves no reachable interior cell".into(),
            ));
        }
        Ok(())
    }
}
