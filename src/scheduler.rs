//! Visit-order scheduling: pick one viewing pose per obstacle and solve the
//! open-path travelling-salesman problem over them.
//!
//! The "open tour" framing matters here: the robot does not need to return
//! to its start position, so the cost matrix has no return edges, and the
//! DP below solves the shortest Hamiltonian *path* from the start rather
//! than the shortest cycle. When not every obstacle has a reachable viewing
//! pose, or full coverage is simply too far to justify, [`Scheduler::plan`]
//! degrades by searching smaller subsets of obstacles until it finds one
//! with a finite-cost tour, logging whichever obstacles it had to drop.

use log::{debug, warn};

use crate::astar::AStar;
use crate::config::PlannerConfig;
use crate::grid::Grid;
use crate::obstacle::Obstacle;
use crate::types::{Cell, Pose};

/// The chosen visiting order plus bookkeeping about what had to be dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleResult {
    /// Target indices (into the obstacle slice passed to [`Scheduler::plan`])
    /// in visiting order, excluding the start.
    pub order: Vec<usize>,
    pub cost: f64,
    /// Obstacle ids left out of `order` because no finite-cost tour covering
    /// them could be found.
    pub skipped: Vec<i32>,
}

pub struct Scheduler<'a> {
    cfg: &'a PlannerConfig,
}

impl<'a> Scheduler<'a> {
    pub fn new(cfg: &'a PlannerConfig) -> Self {
        Self { cfg }
    }

    /// Pick a viewing [`Cell`] and build the cost matrix for `start` plus
    /// every obstacle in `targets`. Row/column `0` is the start. An obstacle
    /// with no reachable viewing candidate gets a sentinel row/column of
    /// `tsp_infinity` so it can never usefully appear in a tour.
    ///
    /// Candidate choice is two-tier: prefer the first candidate A* can
    /// actually reach from `start`, falling back to the first geometrically
    /// valid candidate only if none of them are reachable from there. Using
    /// the first valid candidate unconditionally would mis-cost an obstacle
    /// whose nearest candidate happens to be reachable only from elsewhere in
    /// the tour, dropping it into `skipped` even though a later leg could
    /// have reached it.
    fn cost_matrix(
        &self,
        grid: &Grid,
        astar: &mut AStar,
        start: Pose,
        targets: &[Obstacle],
        retrying: bool,
    ) -> (Vec<Vec<f64>>, Vec<Option<Cell>>) {
        let n = targets.len() + 1;
        let mut viewing: Vec<Option<Cell>> = Vec::with_capacity(n);
        viewing.push(Some(Cell::new(start.x, start.y, start.h)));
        for t in targets {
            let cands = t.valid_viewing_candidates(grid, self.cfg, retrying, false);
            let chosen = cands
                .iter()
                .find(|c| astar.find_path(grid, start, c.pose).is_some())
                .copied()
                .or_else(|| cands.into_iter().next());
            viewing.push(chosen);
        }

        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    matrix[i][j] = 0.0;
                    continue;
                }
                // Open-tour trick: any edge back into the start costs nothing,
                // since the robot is never required to return there.
                if j == 0 {
                    matrix[i][j] = 0.0;
                    continue;
                }
                let (from, to) = match (viewing[i], viewing[j]) {
                    (Some(a), Some(b)) => (a, b),
                    _ => {
                        matrix[i][j] = self.cfg.tsp_infinity;
                        continue;
                    }
                };
                match astar.find_path(grid, from.pose, to.pose) {
                    Some((_, cost)) => matrix[i][j] = cost + to.penalty,
                    None => matrix[i][j] = self.cfg.tsp_infinity,
                }
            }
        }
        (matrix, viewing)
    }

    /// Exact Held-Karp DP for the shortest Hamiltonian path starting at
    /// vertex `0` and visiting every vertex in `subset` exactly once, ending
    /// anywhere. Returns `None` if every path through `subset` is blocked by
    /// an infinite edge.
    fn held_karp_open_path(matrix: &[Vec<f64>], subset: &[usize], infinity: f64) -> Option<(f64, Vec<usize>)> {
        let k = subset.len();
        if k == 0 {
            return Some((0.0, vec![]));
        }
        // dp[mask][i] = (cost, predecessor-index-within-subset) for the
        // shortest path starting at 0, covering exactly the members of
        // `subset` named by `mask`, ending at subset[i].
        let full_mask = (1usize << k) - 1;
        let mut dp = vec![vec![f64::INFINITY; k]; 1 << k];
        let mut parent = vec![vec![usize::MAX; k]; 1 << k];

        for i in 0..k {
            let cost = matrix[0][subset[i]];
            if cost < infinity {
                dp[1 << i][i] = cost;
            }
        }

        for mask in 1..=full_mask {
            for i in 0..k {
                if mask & (1 << i) == 0 || dp[mask][i] == f64::INFINITY {
                    continue;
                }
                for j in 0..k {
                    if mask & (1 << j) != 0 {
                        continue;
                    }
                    let edge = matrix[subset[i]][subset[j]];
                    if edge >= infinity {
                        continue;
                    }
                    let next_mask = mask | (1 << j);
                    let cand = dp[mask][i] + edge;
                    if cand < dp[next_mask][j] {
                        dp[next_mask][j] = cand;
                        parent[next_mask][j] = i;
                    }
                }
            }
        }

        let (best_cost, best_end) = (0..k)
            .map(|i| (dp[full_mask][i], i))
            .filter(|(c, _)| c.is_finite())
            .fold(None, |acc, (c, i)| match acc {
                None => Some((c, i)),
                Some((bc, _)) if c < bc => Some((c, i)),
                other => other,
            })?;

        let mut order_rev = Vec::with_capacity(k);
        let mut mask = full_mask;
        let mut i = best_end;
        loop {
            order_rev.push(subset[i]);
            let prev = parent[mask][i];
            if prev == usize::MAX {
                break;
            }
            mask ^= 1 << i;
            i = prev;
        }
        order_rev.reverse();
        Some((best_cost, order_rev))
    }

    /// Try every `k`-sized subset of `target_indices` (indices 1..=n in
    /// matrix space), largest `k` first, returning the best finite-cost tour
    /// found at the largest feasible `k`.
    fn best_subset_tour(matrix: &[Vec<f64>], target_indices: &[usize], infinity: f64) -> (f64, Vec<usize>, Vec<usize>) {
        let n = target_indices.len();
        for k in (0..=n).rev() {
            let mut best: Option<(f64, Vec<usize>)> = None;
            for combo in combinations(target_indices, k) {
                if let Some((cost, order)) = Self::held_karp_open_path(matrix, &combo, infinity) {
                    if best.as_ref().map(|(bc, _)| cost < *bc).unwrap_or(true) {
                        best = Some((cost, order));
                    }
                }
            }
            if let Some((cost, order)) = best {
                let chosen: std::collections::HashSet<usize> = order.iter().copied().collect();
                let skipped = target_indices
                    .iter()
                    .copied()
                    .filter(|i| !chosen.contains(i))
                    .collect();
                return (cost, order, skipped);
            }
        }
        (0.0, vec![], target_indices.to_vec())
    }

    /// Solve for a visiting order over `targets` starting from `start`.
    ///
    /// `targets` must align 1:1 with the obstacles a caller wants a photo
    /// of; `order` in the result refers back to this slice by index.
    pub fn plan(
        &self,
        grid: &Grid,
        astar: &mut AStar,
        start: Pose,
        targets: &[Obstacle],
        retrying: bool,
    ) -> ScheduleResult {
        if targets.is_empty() {
            return ScheduleResult {
                order: vec![],
                cost: 0.0,
                skipped: vec![],
            };
        }
        let (matrix, _) = self.cost_matrix(grid, astar, start, targets, retrying);
        let target_indices: Vec<usize> = (1..=targets.len()).collect();
        let (cost, order, skipped_indices) =
            Self::best_subset_tour(&matrix, &target_indices, self.cfg.tsp_infinity);

        if !skipped_indices.is_empty() {
            let skipped_ids: Vec<i32> = skipped_indices.iter().map(|&i| targets[i - 1].id).collect();
            warn!("scheduler dropped obstacles with no feasible tour: {skipped_ids:?}");
        } else {
            debug!("scheduler found a full-coverage tour of cost {cost}");
        }

        let skipped = skipped_indices.iter().map(|&i| targets[i - 1].id).collect();
        ScheduleResult { order, cost, skipped }
    }

    /// Stitch the A* sub-paths for a visiting `order` (as produced by
    /// [`Scheduler::plan`]) into one continuous pose path, tagging the
    /// waypoint that completes each obstacle's viewing pose with its id.
    pub fn full_path(
        &self,
        grid: &Grid,
        astar: &mut AStar,
        start: Pose,
        targets: &[Obstacle],
        order: &[usize],
        retrying: bool,
    ) -> Vec<Cell> {
        let mut path = vec![Cell::new(start.x, start.y, start.h)];
        let mut current = start;
        for &idx in order {
            let obstacle = &targets[idx - 1];
            let candidates = obstacle.valid_viewing_candidates(grid, self.cfg, retrying, false);
            let Some(target_cell) = candidates.into_iter().next() else {
                continue;
            };
            let Some((segment, _)) = astar.find_path(grid, current, target_cell.pose) else {
                continue;
            };
            // Skip the first pose of every segment after the first: it's the
            // same cell the previous segment already ended on.
            let skip = if path.len() > 1 { 1 } else { 0 };
            for (i, pose) in segment.iter().enumerate().skip(skip) {
                let is_last = i == segment.len() - 1;
                if is_last {
                    path.push(Cell::with_snap(pose.x, pose.y, pose.h, obstacle.id, 0.0));
                } else {
                    path.push(Cell::new(pose.x, pose.y, pose.h));
                }
            }
            current = target_cell.pose;
        }
        path
    }
}

/// All `k`-combinations of `items`, as owned `Vec`s, in the order
/// `itertools.combinations` would produce them (lexicographic by index).
fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![vec![]];
    }
    if k > items.len() {
        return vec![];
    }
    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + items.len() - k {
                break;
            }
            if i == 0 {
                return out;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading::Heading;

    fn cfg() -> PlannerConfig {
        PlannerConfig::default()
    }

    #[test]
    fn combinations_enumerates_all_k_subsets() {
        let items = vec![1, 2, 3];
        let combos = combinations(&items, 2);
        assert_eq!(combos, vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn combinations_k_zero_is_one_empty_set() {
        assert_eq!(combinations(&[1, 2], 0), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn empty_targets_plan_trivially() {
        let c = cfg();
        let grid = Grid::new(&c, vec![]);
        let mut astar = AStar::new(&c);
        let sched = Scheduler::new(&c);
        let start = Pose::new(2, 2, Heading::North);
        let result = sched.plan(&grid, &mut astar, start, &[], false);
        assert!(result.order.is_empty());
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn reachable_targets_are_all_scheduled() {
        let c = cfg();
        let targets = vec![
            Obstacle::new(5, 5, Heading::North, 1),
            Obstacle::new(10, 5, Heading::North, 2),
        ];
        let grid = Grid::new(&c, targets.clone());
        let mut astar = AStar::new(&c);
        let sched = Scheduler::new(&c);
        let start = Pose::new(2, 2, Heading::North);
        let result = sched.plan(&grid, &mut astar, start, &targets, false);
        assert_eq!(result.order.len(), 2);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn boxed_in_obstacle_is_skipped_not_fatal() {
        let c = cfg();
        // obstacle 2 sits right on the arena wall corner with a face pointed
        // straight into it, so its only viewing candidates fall out of
        // bounds and it can never be reached.
        let targets = vec![
            Obstacle::new(5, 5, Heading::North, 1),
            Obstacle::new(1, 1, Heading::South, 2),
        ];
        let grid = Grid::new(&c, targets.clone());
        let mut astar = AStar::new(&c);
        let sched = Scheduler::new(&c);
        let start = Pose::new(2, 2, Heading::North);
        let result = sched.plan(&grid, &mut astar, start, &targets, false);
        assert_eq!(result.skipped, vec![2]);
        assert_eq!(result.order, vec![1]);
    }

    #[test]
    fn full_path_stitches_segments_without_duplicate_waypoints() {
        let c = cfg();
        let targets = vec![Obstacle::new(5, 5, Heading::North, 1)];
        let grid = Grid::new(&c, targets.clone());
        let mut astar = AStar::new(&c);
        let sched = Scheduler::new(&c);
        let start = Pose::new(2, 2, Heading::North);
        let result = sched.plan(&grid, &mut astar, start, &targets, false);
        let path = sched.full_path(&grid, &mut astar, start, &targets, &result.order, false);
        assert_eq!(path.first().unwrap().pose, start);
        assert!(path.iter().any(|c| c.snap == 1), "final waypoint tags obstacle 1");
    }
}
