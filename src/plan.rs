//! Top-level entry points: [`Planner::plan`] for a fresh itinerary and
//! [`Planner::recover`] for mid-mission bullseye correction.
//!
//! Everything below this module is pure and stateless across calls; a
//! `Planner` just holds the [`PlannerConfig`] and wires the pipeline
//! together the same way for every request.

use log::warn;

use crate::astar::AStar;
use crate::bullseye::{BullseyeHandler, BullseyeResult};
use crate::commands::generate_commands_from_cells;
use crate::config::PlannerConfig;
use crate::error::{PlannerError, PlannerResult};
use crate::grid::Grid;
use crate::heading::Heading;
use crate::obstacle::Obstacle;
use crate::scheduler::Scheduler;
use crate::types::{Cell, Pose};

/// The result of a [`Planner::plan`] call: an itinerary, its command tape,
/// its total distance, and whichever obstacles couldn't be fit in.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub path: Vec<Cell>,
    pub commands: Vec<String>,
    pub distance: f64,
    pub skipped: Vec<i32>,
}

pub struct Planner {
    cfg: PlannerConfig,
}

impl Planner {
    pub fn new(cfg: PlannerConfig) -> Self {
        Self { cfg }
    }

    pub fn with_default_config() -> Self {
        Self::new(PlannerConfig::default())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.cfg
    }

    /// Plan a full obstacle tour from `(robot_x, robot_y, robot_dir)`.
    ///
    /// An out-of-range `robot_dir` is coerced to north rather than
    /// rejected — the pose is passed through regardless, and a genuinely
    /// unreachable start simply yields an empty or partial tour.
    pub fn plan(
        &self,
        obstacles: Vec<Obstacle>,
        robot_x: i32,
        robot_y: i32,
        robot_dir: i32,
        retrying: bool,
    ) -> PlannerResult<Plan> {
        let heading = Heading::from_value(robot_dir).unwrap_or(Heading::North);
        let start = Pose::new(robot_x, robot_y, heading);

        if obstacles.is_empty() {
            return Ok(Plan {
                path: vec![],
                commands: vec!["FIN".to_string()],
                distance: 0.0,
                skipped: vec![],
            });
        }

        let grid = Grid::new(&self.cfg, obstacles.clone());
        let mut astar = AStar::new(&self.cfg);
        let sched = Scheduler::new(&self.cfg);

        let result = sched.plan(&grid, &mut astar, start, &obstacles, retrying);
        if !result.skipped.is_empty() {
            warn!("plan() dropped obstacles {:?} with no feasible tour", result.skipped);
        }
        let path = sched.full_path(&grid, &mut astar, start, &obstacles, &result.order, retrying);
        let commands = generate_commands_from_cells(&path, self.cfg.cell_size_cm);

        Ok(Plan {
            path,
            commands,
            distance: result.cost,
            skipped: result.skipped,
        })
    }

    /// Recover from a bullseye mis-identification: correct `obstacle_id`'s
    /// face to `new_direction`, then re-tour `remaining_obstacles` (which
    /// must include the bullseye obstacle itself, with its old face — this
    /// call corrects it) from the robot's live pose.
    pub fn recover(
        &self,
        obstacle_id: i32,
        new_direction: i32,
        robot_x: i32,
        robot_y: i32,
        robot_dir: i32,
        remaining_obstacles: Vec<Obstacle>,
    ) -> PlannerResult<BullseyeResult> {
        let new_direction = Heading::from_value(new_direction).ok_or_else(|| {
            PlannerError::InvalidInput(format!("new_direction {new_direction} is not one of {{0,2,4,6}}"))
        })?;
        let robot_heading = Heading::from_value(robot_dir).unwrap_or(Heading::North);
        let robot = Pose::new(robot_x, robot_y, robot_heading);

        let mut grid = Grid::new(&self.cfg, remaining_obstacles);
        let mut astar = AStar::new(&self.cfg);

        BullseyeHandler::handle(&mut grid, obstacle_id, new_direction, robot, &mut astar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading::Heading as H;

    #[test]
    fn empty_obstacle_list_plans_trivially() {
        let planner = Planner::with_default_config();
        let plan = planner.plan(vec![], 1, 1, 0, false).unwrap();
        assert!(plan.path.is_empty());
        assert_eq!(plan.commands, vec!["FIN".to_string()]);
        assert_eq!(plan.distance, 0.0);
    }

    #[test]
    fn invalid_robot_heading_is_coerced_to_north() {
        let planner = Planner::with_default_config();
        let plan = planner.plan(vec![], 1, 1, 3, false).unwrap();
        assert_eq!(plan.path.len(), 0);
    }

    #[test]
    fn single_obstacle_is_visited_and_tagged() {
        let planner = Planner::with_default_config();
        let obstacles = vec![Obstacle::new(10, 10, H::North, 1)];
        let plan = planner.plan(obstacles, 1, 1, 0, false).unwrap();
        assert!(plan.skipped.is_empty());
        assert!(plan.path.iter().any(|c| c.snap == 1));
        assert_eq!(plan.commands.last().map(String::as_str), Some("FIN"));
    }

    #[test]
    fn recover_rejects_an_invalid_new_direction() {
        let planner = Planner::with_default_config();
        let obstacles = vec![Obstacle::new(5, 5, H::North, 1)];
        let err = planner.recover(1, 3, 1, 1, 0, obstacles).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput(_)));
    }

    #[test]
    fn recover_corrects_face_and_stitches_phases() {
        let planner = Planner::with_default_config();
        let obstacles = vec![
            Obstacle::new(5, 5, H::North, 1),
            Obstacle::new(10, 10, H::North, 2),
        ];
        let result = planner.recover(1, 2, 1, 1, 0, obstacles).unwrap();
        assert!(result.skipped_obstacle.is_none());
        assert!(result.full_commands.contains(&"SP1".to_string()));
    }
}
