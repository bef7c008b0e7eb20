//! Engine settings and search presets
//!
//! Every field defaults to the matching constant in `crate::consts`, so a
//! partial JSON object only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How many candidate angles to sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchPreset {
    Quick,
    #[default]
    Standard,
    Exhaustive,
}

impl SearchPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchPreset::Quick => "Quick",
            SearchPreset::Standard => "Standard",
            SearchPreset::Exhaustive => "Exhaustive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quick" | "fast" => Some(SearchPreset::Quick),
            "standard" | "std" => Some(SearchPreset::Standard),
            "exhaustive" | "full" => Some(SearchPreset::Exhaustive),
            _ => None,
        }
    }

    /// Candidate angles sampled across the fan
    pub fn candidate_count(&self) -> usize {
        match self {
            SearchPreset::Quick => 8,
            SearchPreset::Standard => CANDIDATE_COUNT,
            SearchPreset::Exhaustive => 32,
        }
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationSettings {
    // === Integration ===
    /// Per-step velocity multiplier
    pub friction: f64,
    /// Speed below which a ball is stopped
    pub min_velocity: f64,
    /// Simulated time ceiling per path (seconds)
    pub max_simulation_time: f64,
    /// Fixed timestep (seconds)
    pub time_step: f64,
    /// Loop iteration ceiling per path
    pub max_iterations: usize,

    // === Shot ===
    /// Cue launch speed (table units per second)
    pub launch_speed: f64,
    /// Ball-ball restitution
    pub ball_restitution: f64,

    // === Search ===
    /// Candidate angles generated when none are supplied
    pub candidate_count: usize,
    /// Half-width of the candidate fan (radians)
    pub fan_half_angle: f64,
    /// Paths returned at most
    pub max_paths: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            min_velocity: MIN_VELOCITY,
            max_simulation_time: MAX_SIMULATION_TIME,
            time_step: TIME_STEP,
            max_iterations: MAX_ITERATIONS,

            launch_speed: LAUNCH_SPEED,
            ball_restitution: BALL_RESTITUTION,

            candidate_count: CANDIDATE_COUNT,
            fan_half_angle: FAN_HALF_ANGLE,
            max_paths: MAX_PATHS,
        }
    }
}

impl SimulationSettings {
    /// Default settings with the preset's candidate count
    pub fn from_preset(preset: SearchPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: SearchPreset) {
        self.candidate_count = preset.candidate_count();
    }

    pub fn with_launch_speed(mut self, launch_speed: f64) -> Self {
        self.launch_speed = launch_speed;
        self
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
