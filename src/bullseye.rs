//! Recovery from a "bullseye" pose correction: the robot discovers an
//! obstacle's true face is not the one it was told about mid-run, and the
//! plan for the rest of the obstacle tour has to be salvaged around that.
//!
//! Recovery happens in two phases. Phase 1 drives the robot to a viewing
//! pose for the obstacle's *corrected* face, from wherever it currently
//! sits — if no such pose is reachable, the obstacle is marked skipped and
//! the robot stays put. Phase 2 re-schedules every other obstacle still
//! outstanding from the phase-1 end pose (or the original pose, if phase 1
//! was skipped). The two phases' paths and commands are then stitched into
//! one continuous tape.

use log::info;

use crate::astar::AStar;
use crate::commands::{generate_commands_from_cells, snap_failed};
use crate::error::{PlannerError, PlannerResult};
use crate::grid::Grid;
use crate::heading::Heading;
use crate::scheduler::Scheduler;
use crate::types::{Cell, Pose};

#[derive(Debug, Clone, PartialEq)]
pub struct BullseyeResult {
    pub full_path: Vec<Cell>,
    pub full_commands: Vec<String>,
    pub phase1_path: Vec<Cell>,
    pub phase1_commands: Vec<String>,
    pub phase2_path: Vec<Cell>,
    pub phase2_commands: Vec<String>,
    pub phase2_distance: f64,
    pub resolved_position: Pose,
    pub new_direction: Heading,
    pub skipped_obstacle: Option<i32>,
}

/// Stateless handler: every method takes the grid it operates on as a
/// parameter rather than owning it, since correcting an obstacle's face
/// means mutating the grid in between phases while an `AStar` built before
/// the correction is still in use.
pub struct BullseyeHandler;

impl BullseyeHandler {
    /// Phase 1: drive from `robot` to a viewing pose for `obstacle_id`'s
    /// current face. Returns `(end_pose, path, commands)`, or `None` if no
    /// viewing candidate for that face is reachable.
    fn path_to_correct_face(
        grid: &Grid,
        obstacle_id: i32,
        robot: Pose,
        astar: &mut AStar,
    ) -> Option<(Pose, Vec<Cell>, Vec<String>)> {
        let obstacle = *grid.obstacle_by_id(obstacle_id)?;
        let cfg = grid.config();

        for retrying in [false, true] {
            let candidates = obstacle.valid_viewing_candidates(grid, cfg, retrying, false);
            for cand in candidates {
                if let Some((path, _cost)) = astar.find_path(grid, robot, cand.pose) {
                    let mut cells: Vec<Cell> = path.iter().map(|p| Cell::new(p.x, p.y, p.h)).collect();
                    if let Some(last) = cells.last_mut() {
                        last.snap = obstacle_id;
                    }
                    // `generate_commands_from_cells` already emits `SP{id}`
                    // for the tagged last cell; just drop the trailing `FIN`
                    // so phase 2's commands continue the same tape.
                    let mut commands = generate_commands_from_cells(&cells, cfg.cell_size_cm);
                    if commands.last().map(String::as_str) == Some("FIN") {
                        commands.pop();
                    }
                    return Some((cand.pose, cells, commands));
                }
            }
        }
        None
    }

    /// Phase 2: re-schedule `visit_obstacle_ids` starting from `robot`.
    fn reroute_remaining(
        grid: &Grid,
        robot: Pose,
        visit_obstacle_ids: &[i32],
        astar: &mut AStar,
    ) -> (Vec<Cell>, Vec<String>, f64) {
        let cfg = grid.config();
        let targets: Vec<_> = grid
            .obstacles
            .iter()
            .filter(|o| visit_obstacle_ids.contains(&o.id))
            .copied()
            .collect();

        let sched = Scheduler::new(cfg);
        let result = sched.plan(grid, astar, robot, &targets, false);
        let path = sched.full_path(grid, astar, robot, &targets, &result.order, false);
        let commands = generate_commands_from_cells(&path, cfg.cell_size_cm);
        (path, commands, result.cost)
    }

    /// Full recovery: correct `obstacle_id`'s face to `new_direction`, drive
    /// to photograph it, then re-tour whatever other obstacles remain.
    ///
    /// `astar`'s cache is cleared before use, since the face correction
    /// below changes which cells are reachable and any entry computed
    /// before this call could be stale.
    pub fn handle(
        grid: &mut Grid,
        obstacle_id: i32,
        new_direction: Heading,
        robot: Pose,
        astar: &mut AStar,
    ) -> PlannerResult<BullseyeResult> {
        {
            let obstacle = grid
                .obstacle_by_id_mut(obstacle_id)
                .ok_or_else(|| PlannerError::InvalidInput(format!("unknown obstacle id {obstacle_id}")))?;
            obstacle.face = new_direction;
        }
        astar.clear_cache();

        let phase1 = Self::path_to_correct_face(grid, obstacle_id, robot, astar);
        let (resolved_position, phase1_path, phase1_commands, skipped_obstacle) = match phase1 {
            Some((pose, path, commands)) => {
                info!("bullseye phase 1 reached obstacle {obstacle_id} at {pose:?}");
                (pose, path, commands, None)
            }
            None => {
                info!("bullseye phase 1 could not reach obstacle {obstacle_id}, skipping it");
                (
                    robot,
                    vec![],
                    vec![snap_failed(obstacle_id)],
                    Some(obstacle_id),
                )
            }
        };

        let visit_ids: Vec<i32> = grid
            .obstacles
            .iter()
            .map(|o| o.id)
            .filter(|&id| id != obstacle_id)
            .collect();
        let (phase2_path, phase2_commands, phase2_distance) =
            Self::reroute_remaining(grid, resolved_position, &visit_ids, astar);

        let mut full_path = phase1_path.clone();
        if phase2_path.len() > 1 {
            full_path.extend(phase2_path.iter().skip(1).copied());
        } else if full_path.is_empty() {
            full_path.extend(phase2_path.iter().copied());
        }

        let mut full_commands = phase1_commands.clone();
        full_commands.extend(phase2_commands.iter().cloned());

        Ok(BullseyeResult {
            full_path,
            full_commands,
            phase1_path,
            phase1_commands,
            phase2_path,
            phase2_commands,
            phase2_distance,
            resolved_position,
            new_direction,
            skipped_obstacle,
        })
    }
}
