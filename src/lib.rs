//! Three Cushion - shot search engine for carom billiards
//!
//! Core modules:
//! - `vector`: 2D vector helpers shared by every other module
//! - `sim`: Deterministic simulation (state, collisions, stepping, scoring)
//! - `ranking`: Bounded top-N list of scored paths
//! - `settings`: Tunable engine constants and search presets
//! - `request`: JSON request/response boundary

pub mod ranking;
pub mod request;
pub mod settings;
pub mod sim;
pub mod vector;

pub use ranking::PathRanking;
pub use request::{PathRequest, PathResponse, RequestError, calculate_paths, calculate_paths_json};
pub use settings::{SearchPreset, SimulationSettings};
pub use sim::{
    Ball, BallId, Collision, CollisionKind, CushionSide, PathOutcome, SimulationStep, Table,
    ThreeCushionPath, simulate_single_path, simulate_three_cushion_paths,
    simulate_three_cushion_paths_with,
};

/// Engine configuration constants
pub mod consts {
    /// Per-step velocity multiplier (cloth/roll resistance)
    pub const FRICTION: f64 = 0.985;
    /// Speed below which a ball is considered at rest
    pub const MIN_VELOCITY: f64 = 0.01;
    /// Hard ceiling on simulated time per path (seconds)
    pub const MAX_SIMULATION_TIME: f64 = 10.0;
    /// Fixed simulation timestep (~60 Hz)
    pub const TIME_STEP: f64 = 0.016;

    /// Cue ball launch speed (table units per second)
    pub const LAUNCH_SPEED: f64 = 8.0;
    /// Ball-ball coefficient of restitution
    pub const BALL_RESTITUTION: f64 = 0.95;
    /// Default cushion restitution when a table does not specify one
    pub const DEFAULT_CUSHION_RESTITUTION: f64 = 0.8;
    /// Default ball mass
    pub const DEFAULT_BALL_MASS: f64 = 1.0;

    /// Candidate launch angles generated when the caller supplies none
    pub const CANDIDATE_COUNT: usize = 16;
    /// Half-width of the candidate fan around the cue -> object1 bearing (radians, 45°)
    pub const FAN_HALF_ANGLE: f64 = std::f64::consts::FRAC_PI_4;
    /// Maximum number of paths returned
    pub const MAX_PATHS: usize = 5;

    /// Cushion contacts required for a valid path
    pub const REQUIRED_CUSHION_HITS: u32 = 3;
    /// Ball contacts required for a valid path
    pub const REQUIRED_BALL_HITS: u32 = 2;

    /// Loop iteration ceiling per path (guards against zero-length event storms)
    pub const MAX_ITERATIONS: usize = 20_000;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
