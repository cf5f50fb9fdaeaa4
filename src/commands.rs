//! Translate a pose path into the robot's command tape.
//!
//! Two passes: [`encode`] classifies each consecutive pose pair into a
//! primitive token (`FWn`/`BWn`/`FL90`/`FR90`), then [`compress`] merges
//! consecutive straight-line runs of the same type and re-splits anything
//! over 90 cm back into 90 cm chunks, since that's the longest single move
//! the robot's firmware accepts in one command.

use crate::heading::Heading;
use crate::types::Pose;

const MAX_CHUNK_CM: u32 = 90;

/// One command-tape primitive before run-length compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Forward(u32),
    Backward(u32),
    TurnLeft,
    TurnRight,
    Snapshot(i32),
}

/// Classify the pose transitions in `path` into a raw (uncompressed) token
/// stream, then compress it into the final command strings.
///
/// `snaps` lists, in path order, the `(index, obstacle_id)` pairs at which a
/// `SPk` (snapshot) command must be emitted immediately after the move that
/// arrives at that waypoint.
pub fn generate_commands(path: &[Pose], snaps: &[(usize, i32)], cell_size_cm: u32) -> Vec<String> {
    let mut tokens = Vec::new();
    // token_count_after[w] = how many tokens exist once waypoint w+1 has
    // been reached, so a snapshot at waypoint idx can be spliced in right
    // after the move(s) that arrive there, even when one pose transition
    // expands to more than one token (a 180-degree turn).
    let mut token_count_after = vec![0usize; path.len()];

    for (w, window) in path.windows(2).enumerate() {
        let (a, b) = (window[0], window[1]);
        if a != b {
            tokens.extend(classify(a, b, cell_size_cm));
        }
        token_count_after[w + 1] = tokens.len();
    }

    let mut snaps_sorted = snaps.to_vec();
    snaps_sorted.sort_by(|a, b| b.0.cmp(&a.0));
    for (idx, id) in snaps_sorted {
        if idx == 0 {
            continue;
        }
        let insert_at = token_count_after[idx.min(path.len() - 1)];
        tokens.insert(insert_at, Token::Snapshot(id));
    }

    let mut commands = compress(&tokens);
    commands.push("FIN".to_string());
    commands
}

fn classify(from: Pose, to: Pose, cell_size_cm: u32) -> Vec<Token> {
    if from.h == to.h {
        let dx = (to.x - from.x).unsigned_abs();
        let dy = (to.y - from.y).unsigned_abs();
        let cells = dx.max(dy);
        let distance_cm = cells * cell_size_cm;
        let (fx, fy) = from.h.unit_step();
        let forward = (to.x - from.x) == fx * cells as i32 && (to.y - from.y) == fy * cells as i32;
        if forward {
            vec![Token::Forward(distance_cm)]
        } else {
            vec![Token::Backward(distance_cm)]
        }
    } else {
        match from.h.turn_delta(to.h) {
            2 => vec![Token::TurnRight],
            6 => vec![Token::TurnLeft],
            // A 180-degree reorientation has no single-command primitive;
            // the robot always executes it as two successive right turns.
            _ => vec![Token::TurnRight, Token::TurnRight],
        }
    }
}

fn compress(tokens: &[Token]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            Token::Forward(_) | Token::Backward(_) => {
                let is_forward = matches!(tokens[i], Token::Forward(_));
                let mut total = 0u32;
                while i < tokens.len() {
                    match tokens[i] {
                        Token::Forward(v) if is_forward => {
                            total += v;
                            i += 1;
                        }
                        Token::Backward(v) if !is_forward => {
                            total += v;
                            i += 1;
                        }
                        _ => break,
                    }
                }
                out.extend(split_chunks(total, is_forward));
            }
            Token::TurnLeft => {
                out.push("FL90".to_string());
                i += 1;
            }
            Token::TurnRight => {
                out.push("FR90".to_string());
                i += 1;
            }
            Token::Snapshot(id) => {
                out.push(format!("SP{id}"));
                i += 1;
            }
        }
    }
    out
}

fn split_chunks(total_cm: u32, is_forward: bool) -> Vec<String> {
    let prefix = if is_forward { "FW" } else { "BW" };
    let mut remaining = total_cm;
    let mut out = Vec::new();
    while remaining > MAX_CHUNK_CM {
        out.push(format!("{prefix}{:02}", MAX_CHUNK_CM));
        remaining -= MAX_CHUNK_CM;
    }
    if remaining > 0 {
        out.push(format!("{prefix}{:02}", remaining));
    }
    out
}

/// Build a command tape straight from a waypoint list where `snap != -1`
/// marks the obstacle to photograph at that cell — the shape the scheduler
/// and bullseye handler actually produce.
pub fn generate_commands_from_cells(path: &[crate::types::Cell], cell_size_cm: u32) -> Vec<String> {
    let poses: Vec<Pose> = path.iter().map(|c| c.pose).collect();
    let snaps: Vec<(usize, i32)> = path
        .iter()
        .enumerate()
        .filter(|(_, c)| c.snap != -1)
        .map(|(i, c)| (i, c.snap))
        .collect();
    generate_commands(&poses, &snaps, cell_size_cm)
}

pub fn snap_failed(obstacle_id: i32) -> String {
    format!("SNAP_FAILED{obstacle_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_run_merges_into_one_command() {
        let path = vec![
            Pose::new(1, 1, Heading::North),
            Pose::new(1, 2, Heading::North),
            Pose::new(1, 3, Heading::North),
            Pose::new(1, 4, Heading::North),
        ];
        let cmds = generate_commands(&path, &[], 10);
        assert_eq!(cmds, vec!["FW30".to_string(), "FIN".to_string()]);
    }

    #[test]
    fn runs_over_ninety_cm_split_into_chunks() {
        let path: Vec<Pose> = (0..=10).map(|i| Pose::new(1, 1 + i, Heading::North)).collect();
        let cmds = generate_commands(&path, &[], 10);
        assert_eq!(cmds, vec!["FW90".to_string(), "FW10".to_string(), "FIN".to_string()]);
    }

    #[test]
    fn turns_are_not_merged_with_straights() {
        let path = vec![
            Pose::new(1, 1, Heading::North),
            Pose::new(1, 2, Heading::North),
            Pose::new(2, 3, Heading::East),
            Pose::new(3, 4, Heading::East),
        ];
        let cmds = generate_commands(&path, &[], 10);
        assert_eq!(cmds, vec!["FW10", "FR90", "FW10", "FIN"]);
    }

    #[test]
    fn zero_length_segment_is_skipped_not_emitted() {
        let path = vec![
            Pose::new(1, 1, Heading::North),
            Pose::new(1, 1, Heading::North),
            Pose::new(1, 2, Heading::North),
        ];
        let cmds = generate_commands(&path, &[], 10);
        assert_eq!(cmds, vec!["FW10", "FIN"]);
    }

    #[test]
    fn snapshot_is_inserted_after_its_waypoint() {
        let path = vec![
            Pose::new(1, 1, Heading::North),
            Pose::new(1, 2, Heading::North),
        ];
        let cmds = generate_commands(&path, &[(1, 7)], 10);
        assert_eq!(cmds, vec!["FW10", "SP7", "FIN"]);
    }
}
