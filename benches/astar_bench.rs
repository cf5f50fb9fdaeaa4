//! Worst-case corridor benchmark for the kinematic A* search: a thin
//! obstacle-lined corridor forces the planner through repeated arc turns
//! rather than letting it coast in a straight line.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arena_planner::astar::AStar;
use arena_planner::config::PlannerConfig;
use arena_planner::grid::Grid;
use arena_planner::heading::Heading;
use arena_planner::obstacle::Obstacle;
use arena_planner::types::Pose;

fn corridor_obstacles() -> Vec<Obstacle> {
    // A staggered wall of obstacles down both sides of the arena, leaving a
    // single-cell-wide corridor that forces the search to weave.
    let mut obstacles = Vec::new();
    let mut id = 1;
    for y in (2..=16).step_by(4) {
        obstacles.push(Obstacle::new(6, y, Heading::East, id));
        id += 1;
        obstacles.push(Obstacle::new(13, y + 2, Heading::West, id));
        id += 1;
    }
    obstacles
}

fn bench_astar_corridor(c: &mut Criterion) {
    let cfg = PlannerConfig::default();
    let grid = Grid::new(&cfg, corridor_obstacles());
    let start = Pose::new(2, 2, Heading::North);
    let goal = Pose::new(17, 17, Heading::North);

    c.bench_function("astar_corridor_worst_case", |b| {
        b.iter(|| {
            let mut astar = AStar::new(&cfg);
            black_box(astar.find_path(&grid, start, goal))
        })
    });
}

criterion_group!(benches, bench_astar_corridor);
criterion_main!(benches);
