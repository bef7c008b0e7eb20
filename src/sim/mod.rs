//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Stable iteration order (cue, object1, object2)
//! - No I/O

pub mod collision;
pub mod resolution;
pub mod scoring;
pub mod simulator;
pub mod state;

pub use collision::{
    CushionEta, detect_ball_collision, detect_cushion_collision, time_to_collision, time_to_cushion,
};
pub use resolution::{
    resolve_ball_collision, resolve_cushion_collision, separate_balls, separate_from_cushion,
};
pub use simulator::{
    generate_candidate_angles, simulate_single_path, simulate_three_cushion_paths,
    simulate_three_cushion_paths_with,
};
pub use state::{
    Ball, BallId, Collision, CollisionKind, CushionSide, PathOutcome, SimulationStep, Table,
    ThreeCushionPath,
};
