//! Kinematic A* over (x, y, heading) states.
//!
//! Neighbour expansion mirrors what a differential-drive robot can actually
//! execute: a one-cell straight step forward or backward along the current
//! heading, or one of four fixed-radius 90-degree arc manoeuvres. Arc moves
//! are additionally swept for clearance along the curve they trace, not just
//! checked at their endpoint — a robot with a 3-cell turn radius clips
//! corners a pure point-to-point check would miss.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::debug;

use crate::config::PlannerConfig;
use crate::grid::Grid;
use crate::heading::{Arc, Heading};
use crate::types::Pose;

/// A* search bound to one [`PlannerConfig`], with a cache of previously
/// found path costs keyed on `(start, goal)`.
///
/// The grid is *not* stored here — it's passed to [`AStar::find_path`] on
/// every call instead. Obstacles can change between calls (a bullseye
/// correction mutates one mid-run) while this cache and its config keep
/// being reused, so the search can't afford to hold the grid borrowed for
/// its own lifetime.
pub struct AStar<'a> {
    cfg: &'a PlannerConfig,
    cache: HashMap<(Pose, Pose), (Vec<Pose>, f64)>,
}

#[derive(Clone, Copy)]
struct OpenNode {
    f: f64,
    g: f64,
    pose: Pose,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}
impl Eq for OpenNode {}
impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OpenNode {
    // Reversed so `BinaryHeap` (a max-heap) pops the lowest f-cost first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f)
    }
}

impl<'a> AStar<'a> {
    pub fn new(cfg: &'a PlannerConfig) -> Self {
        Self {
            cfg,
            cache: HashMap::new(),
        }
    }

    /// Find the lowest-cost path from `start` to `goal` on `grid`, caching
    /// the result under `(start, goal)`.
    ///
    /// Returns `None` if `goal` is unreachable from `start`. Callers that
    /// mutate `grid` between calls (e.g. correcting an obstacle's face)
    /// should be aware stale cache entries are *not* invalidated — see
    /// `AStar::clear_cache`.
    pub fn find_path(&mut self, grid: &Grid, start: Pose, goal: Pose) -> Option<(Vec<Pose>, f64)> {
        if let Some(hit) = self.cache.get(&(start, goal)) {
            debug!("astar cache hit for {start:?} -> {goal:?}");
            return Some(hit.clone());
        }
        let result = self.search(grid, start, goal);
        if let Some(ref r) = result {
            self.cache.insert((start, goal), r.clone());
        }
        result
    }

    /// Drop every cached path. Call this after mutating the grid's obstacle
    /// layout so stale costs can't leak into a later search.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn heuristic(&self, pose: Pose, goal: Pose) -> f64 {
        let dx = (pose.x - goal.x) as f64;
        let dy = (pose.y - goal.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    fn search(&self, grid: &Grid, start: Pose, goal: Pose) -> Option<(Vec<Pose>, f64)> {
        if start == goal {
            return Some((vec![start], 0.0));
        }

        let mut open = BinaryHeap::new();
        let mut g_scores: HashMap<Pose, f64> = HashMap::new();
        let mut came_from: HashMap<Pose, Pose> = HashMap::new();

        g_scores.insert(start, 0.0);
        open.push(OpenNode {
            f: self.heuristic(start, goal),
            g: 0.0,
            pose: start,
        });

        let mut closed: HashMap<Pose, bool> = HashMap::new();

        while let Some(current) = open.pop() {
            if closed.get(&current.pose).copied().unwrap_or(false) {
                continue;
            }
            if current.pose == goal {
                return Some((self.reconstruct(&came_from, goal), current.g));
            }
            closed.insert(current.pose, true);

            for (next_pose, edge_cost) in self.neighbours(grid, current.pose) {
                let tentative_g = current.g + edge_cost;
                let better = g_scores
                    .get(&next_pose)
                    .map(|&g| tentative_g < g)
                    .unwrap_or(true);
                if better {
                    g_scores.insert(next_pose, tentative_g);
                    came_from.insert(next_pose, current.pose);
                    open.push(OpenNode {
                        f: tentative_g + self.heuristic(next_pose, goal),
                        g: tentative_g,
                        pose: next_pose,
                    });
                }
            }
        }
        None
    }

    fn reconstruct(&self, came_from: &HashMap<Pose, Pose>, goal: Pose) -> Vec<Pose> {
        let mut path = vec![goal];
        let mut cur = goal;
        while let Some(&prev) = came_from.get(&cur) {
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        path
    }

    /// Every kinematically valid neighbour of `pose`, with its edge cost.
    fn neighbours(&self, grid: &Grid, pose: Pose) -> Vec<(Pose, f64)> {
        let mut out = Vec::with_capacity(6);
        let (ux, uy) = pose.h.unit_step();

        for (dx, dy) in [(ux, uy), (-ux, -uy)] {
            let (nx, ny) = (pose.x + dx, pose.y + dy);
            if grid.reachable(nx, ny, false) {
                out.push((Pose::new(nx, ny, pose.h), self.cfg.straight_cost));
            }
        }

        for arc in Arc::ALL {
            if let Some((nx, ny, nh)) = self.arc_sweep_clear(grid, pose.x, pose.y, pose.h, arc) {
                out.push((Pose::new(nx, ny, nh), self.cfg.turn_edge_cost()));
            }
        }
        out
    }

    /// Check an arc manoeuvre's full swept path for clearance, not just its
    /// endpoint, so the robot's body can't clip an obstacle on the inside of
    /// the curve. The eight sample cells below trace the quarter-circle the
    /// robot's body sweeps through at one-third and two-thirds radius, in
    /// both relative axis orders; corner clipping is the one failure mode a
    /// plain endpoint check would miss. `unit` assumes `turn_radius` is a
    /// multiple of 3, true for the default and any sane override.
    fn arc_sweep_clear(
        &self,
        grid: &Grid,
        x: i32,
        y: i32,
        heading: Heading,
        arc: Arc,
    ) -> Option<(i32, i32, Heading)> {
        let r = self.cfg.turn_radius;
        let (dx, dy, new_h) = arc.displacement(heading, r);
        let sx = dx.signum();
        let sy = dy.signum();
        let unit = (r / 3).max(1);

        let points = [
            (sx * unit, 0),
            (0, sy * unit),
            (sx * unit, sy * unit),
            (2 * sx * unit, sy * unit),
            (sx * unit, 2 * sy * unit),
            (2 * sx * unit, 2 * sy * unit),
            (2 * sx * unit, 3 * sy * unit),
            (3 * sx * unit, 2 * sy * unit),
        ];

        if points
            .iter()
            .all(|&(ox, oy)| grid.reachable(x + ox, y + oy, true))
            && grid.reachable(x + dx, y + dy, true)
        {
            Some((x + dx, y + dy, new_h))
        } else {
            None
        }
    }
}
