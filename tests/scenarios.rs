//! Black-box scenario tests against the public `plan()`/`recover()` API.

use arena_planner::commands;
use arena_planner::heading::Heading;
use arena_planner::types::Pose;
use arena_planner::{Obstacle, Planner};

fn planner() -> Planner {
    Planner::with_default_config()
}

#[test]
fn s1_trivial_empty_obstacle_list() {
    let plan = planner().plan(vec![], 1, 1, 0, false).unwrap();
    assert!(plan.path.is_empty());
    assert_eq!(plan.commands, vec!["FIN".to_string()]);
    assert_eq!(plan.distance, 0.0);
}

#[test]
fn s2_single_north_face_is_photographed() {
    let obstacles = vec![Obstacle::new(10, 10, Heading::North, 1)];
    let plan = planner().plan(obstacles, 1, 1, 0, false).unwrap();

    assert!(
        plan.path.iter().any(|c| c.x() == 10 && c.y() == 13 && c.heading() == Heading::South),
        "expected a viewing pose at (10, 13, S), got {:?}",
        plan.path
    );
    let sp_index = plan.commands.iter().position(|c| c == "SP1");
    assert!(sp_index.is_some(), "command tape should contain SP1: {:?}", plan.commands);
    assert_eq!(plan.commands.last().map(String::as_str), Some("FIN"));
    assert!(sp_index.unwrap() < plan.commands.len() - 1);
}

#[test]
fn s3_trapped_obstacle_is_skipped_others_unaffected() {
    let obstacles = vec![
        // Face pointed into the arena's corner wall: every viewing candidate
        // for it falls out of bounds, so it can never be reached.
        Obstacle::new(1, 1, Heading::South, 1),
        Obstacle::new(10, 10, Heading::North, 2),
    ];
    let plan = planner().plan(obstacles, 2, 2, 0, false).unwrap();
    assert_eq!(plan.skipped, vec![1]);
    assert!(plan.path.iter().any(|c| c.snap == 2));
}

#[test]
fn s4_ninety_degree_turn_is_required() {
    let obstacles = vec![Obstacle::new(5, 1, Heading::West, 1)];
    let plan = planner().plan(obstacles, 1, 1, 0, false).unwrap();
    assert!(
        plan.commands.iter().any(|c| c == "FR90" || c == "FL90"),
        "expected a turn token, got {:?}",
        plan.commands
    );
}

#[test]
fn s5_long_straight_run_compresses_into_two_chunks() {
    let path: Vec<Pose> = (0..=12).map(|i| Pose::new(1, 1 + i, Heading::North)).collect();
    let cmds = commands::generate_commands(&path, &[], 10);
    assert_eq!(cmds, vec!["FW90".to_string(), "FW30".to_string(), "FIN".to_string()]);
}

#[test]
fn s6_bullseye_recovery_reoptimises_remaining_obstacles() {
    let obstacles = vec![
        Obstacle::new(10, 10, Heading::North, 2),
        Obstacle::new(5, 5, Heading::East, 3),
    ];
    let live = (2, 2, 0);
    let result = planner()
        .recover(2, Heading::West.value(), live.0, live.1, live.2, obstacles)
        .unwrap();

    assert_eq!(
        result.phase1_path.last().map(|c| c.snap),
        Some(2),
        "phase 1 should end by photographing obstacle 2"
    );
    assert!(result.full_commands.contains(&"SP2".to_string()));
    assert!(
        result.phase2_path.iter().any(|c| c.snap == 3),
        "phase 2 should still visit the remaining obstacle 3"
    );
    assert_eq!(
        (result.full_path[0].x(), result.full_path[0].y()),
        (live.0, live.1),
        "stitched path must start at the caller's live pose"
    );
}
