//! Path scoring heuristics
//!
//! These are ranking proxies, not physical measurements. Both scores live in
//! [0, 1].

use glam::DVec2;

use super::state::{BallId, SimulationStep};
use crate::consts::{REQUIRED_BALL_HITS, REQUIRED_CUSHION_HITS};
use crate::vector;

/// Cushion count at which the cushion half of the difficulty saturates
const DIFFICULTY_CUSHION_SCALE: f64 = 5.0;
/// Cue travel at which the distance half of the difficulty saturates
const DIFFICULTY_DISTANCE_SCALE: f64 = 1000.0;

const BASE_SUCCESS: f64 = 0.8;
const DIFFICULTY_PENALTY: f64 = 0.6;
const EXTRA_CUSHION_BONUS: f64 = 0.05;
const MAX_CUSHION_BONUS: f64 = 0.1;
const MIN_SUCCESS: f64 = 0.1;
const MAX_SUCCESS: f64 = 0.95;

/// Whether hit counts satisfy the three-cushion heuristic
#[inline]
pub fn is_valid(cushion_hits: u32, ball_hits: u32) -> bool {
    cushion_hits >= REQUIRED_CUSHION_HITS && ball_hits >= REQUIRED_BALL_HITS
}

/// Total distance travelled by the cue ball from `start` through the recorded steps
pub fn cue_path_length(start: DVec2, steps: &[SimulationStep]) -> f64 {
    let cue_positions = steps.iter().filter_map(|step| {
        step.balls
            .iter()
            .find(|b| b.id == BallId::Cue)
            .map(|b| b.position)
    });

    let mut length = 0.0;
    let mut previous = start;
    for pos in cue_positions {
        length += vector::distance(previous, pos);
        previous = pos;
    }
    length
}

/// Difficulty from cushion count and cue travel
pub fn difficulty(cushion_hits: u32, path_length: f64) -> f64 {
    if cushion_hits < REQUIRED_CUSHION_HITS {
        return 0.0;
    }

    let cushion_factor = (cushion_hits as f64 / DIFFICULTY_CUSHION_SCALE).min(1.0);
    let distance_factor = (path_length / DIFFICULTY_DISTANCE_SCALE).min(1.0);
    (cushion_factor + distance_factor) / 2.0
}

/// Predicted success rate; zero for paths that fail the heuristic
pub fn success_rate(cushion_hits: u32, ball_hits: u32, difficulty: f64) -> f64 {
    if !is_valid(cushion_hits, ball_hits) {
        return 0.0;
    }

    let extra_cushions = (cushion_hits - REQUIRED_CUSHION_HITS) as f64;
    let bonus = (extra_cushions * EXTRA_CUSHION_BONUS).min(MAX_CUSHION_BONUS);
    (BASE_SUCCESS - difficulty * DIFFICULTY_PENALTY + bonus).clamp(MIN_SUCCESS, MAX_SUCCESS)
}
