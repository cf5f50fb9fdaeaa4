//! `serde`-derived wire types mirroring the external JSON interfaces, plus
//! thin request/response handlers that translate to and from the core
//! types in [`crate::plan`]. The core itself never imports this module —
//! it's an adapter a host process (or the CLI binary) sits behind.

use serde::{Deserialize, Serialize};

use crate::bullseye::BullseyeResult;
use crate::error::PlannerResult;
use crate::heading::Heading;
use crate::obstacle::Obstacle;
use crate::plan::{Plan, Planner};
use crate::types::{Cell, Pose};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleWire {
    pub id: i32,
    pub x: i32,
    pub y: i32,
    pub d: i32,
}

impl From<&Obstacle> for ObstacleWire {
    fn from(o: &Obstacle) -> Self {
        Self {
            id: o.id,
            x: o.x,
            y: o.y,
            d: o.face.value(),
        }
    }
}

impl ObstacleWire {
    /// Convert to an [`Obstacle`], coercing an off-grid heading value to
    /// north rather than rejecting the whole request over one bad field.
    pub fn into_obstacle(self) -> Obstacle {
        let face = Heading::from_value(self.d).unwrap_or(Heading::North);
        Obstacle::new(self.x, self.y, face, self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellWire {
    pub x: i32,
    pub y: i32,
    pub d: i32,
    pub s: i32,
}

impl From<&Cell> for CellWire {
    fn from(c: &Cell) -> Self {
        Self {
            x: c.x(),
            y: c.y(),
            d: c.heading().value(),
            s: c.snap,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoseWire {
    pub x: i32,
    pub y: i32,
    pub d: i32,
}

impl From<Pose> for PoseWire {
    fn from(p: Pose) -> Self {
        Self { x: p.x, y: p.y, d: p.h.value() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub obstacles: Vec<ObstacleWire>,
    pub robot_x: i32,
    pub robot_y: i32,
    pub robot_dir: i32,
    #[serde(default)]
    pub retrying: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponseData {
    pub commands: Vec<String>,
    pub snap_positions: Vec<CellWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub data: PlanResponseData,
    pub path: Vec<CellWire>,
    pub distance: f64,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        let path: Vec<CellWire> = plan.path.iter().map(CellWire::from).collect();
        let snap_positions = path.iter().filter(|c| c.s != -1).copied().collect();
        Self {
            data: PlanResponseData {
                commands: plan.commands,
                snap_positions,
            },
            path,
            distance: plan.distance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverRequest {
    pub obstacle_id: i32,
    pub new_direction: i32,
    pub robot_x: i32,
    pub robot_y: i32,
    pub robot_dir: i32,
    pub remaining_obstacles: Vec<ObstacleWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverResponse {
    pub full_path: Vec<CellWire>,
    pub full_commands: Vec<String>,
    pub phase1_path: Vec<CellWire>,
    pub phase1_commands: Vec<String>,
    pub phase2_path: Vec<CellWire>,
    pub phase2_commands: Vec<String>,
    pub phase2_distance: f64,
    pub resolved_position: PoseWire,
    pub new_direction: i32,
    pub skipped_obstacle: Option<i32>,
}

impl From<BullseyeResult> for RecoverResponse {
    fn from(r: BullseyeResult) -> Self {
        Self {
            full_path: r.full_path.iter().map(CellWire::from).collect(),
            full_commands: r.full_commands,
            phase1_path: r.phase1_path.iter().map(CellWire::from).collect(),
            phase1_commands: r.phase1_commands,
            phase2_path: r.phase2_path.iter().map(CellWire::from).collect(),
            phase2_commands: r.phase2_commands,
            phase2_distance: r.phase2_distance,
            resolved_position: r.resolved_position.into(),
            new_direction: r.new_direction.value(),
            skipped_obstacle: r.skipped_obstacle,
        }
    }
}

pub fn handle_plan_request(planner: &Planner, req: PlanRequest) -> PlannerResult<PlanResponse> {
    let obstacles = req.obstacles.into_iter().map(ObstacleWire::into_obstacle).collect();
    let plan = planner.plan(obstacles, req.robot_x, req.robot_y, req.robot_dir, req.retrying)?;
    Ok(plan.into())
}

pub fn handle_recover_request(planner: &Planner, req: RecoverRequest) -> PlannerResult<RecoverResponse> {
    let remaining = req
        .remaining_obstacles
        .into_iter()
        .map(ObstacleWire::into_obstacle)
        .collect();
    let result = planner.recover(
        req.obstacle_id,
        req.new_direction,
        req.robot_x,
        req.robot_y,
        req.robot_dir,
        remaining,
    )?;
    Ok(result.into())
}
