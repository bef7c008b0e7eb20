//! Request/response boundary
//!
//! The engine is exposed to callers (HTTP handlers, the CLI) as one pure call:
//! three balls plus a table in, a ranked list of paths out. This module owns
//! the JSON shapes for that call and rejects inputs the physics can't handle.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_BALL_MASS;
use crate::settings::{SearchPreset, SimulationSettings};
use crate::sim::{
    Ball, BallId, CushionSide, Table, ThreeCushionPath, detect_ball_collision,
    detect_cushion_collision, simulate_three_cushion_paths_with,
};

/// Error type for request handling.
#[derive(Debug)]
pub enum RequestError {
    Json(serde_json::Error),
    Io(std::io::Error),
    InvalidBall { id: BallId, reason: &'static str },
    InvalidTable(&'static str),
    InvalidAngle(usize),
    InvalidSettings(&'static str),
    Overlap(BallId, BallId),
    OutOfBounds(BallId, CushionSide),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Json(e) => write!(f, "JSON error: {}", e),
            RequestError::Io(e) => write!(f, "IO error: {}", e),
            RequestError::InvalidBall { id, reason } => {
                write!(f, "Invalid {} ball: {}", id.as_str(), reason)
            }
            RequestError::InvalidTable(reason) => write!(f, "Invalid table: {}", reason),
            RequestError::InvalidAngle(index) => {
                write!(f, "Angle at index {} is not a finite number", index)
            }
            RequestError::InvalidSettings(reason) => write!(f, "Invalid settings: {}", reason),
            RequestError::Overlap(a, b) => {
                write!(f, "Balls {} and {} overlap", a.as_str(), b.as_str())
            }
            RequestError::OutOfBounds(id, side) => {
                write!(f, "{} ball past the {} cushion", id.as_str(), side.as_str())
            }
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Json(e) => Some(e),
            RequestError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::Json(err)
    }
}

impl From<std::io::Error> for RequestError {
    fn from(err: std::io::Error) -> Self {
        RequestError::Io(err)
    }
}

/// Ball as supplied by a caller: position and size, always at rest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallInput {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "r")]
    pub radius: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
}

fn default_mass() -> f64 {
    DEFAULT_BALL_MASS
}

impl BallInput {
    pub fn to_ball(&self, id: BallId) -> Ball {
        Ball::new(id, DVec2::new(self.x, self.y), self.radius).with_mass(self.mass)
    }
}

/// A "calculate paths" request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRequest {
    pub cue: BallInput,
    pub object1: BallInput,
    pub object2: BallInput,
    pub table: Table,
    /// Explicit launch angles (radians); generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angles: Option<Vec<f64>>,
    /// Setting overrides; missing fields keep their defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SimulationSettings>,
    /// Candidate-count preset, applied on top of `settings`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<SearchPreset>,
}

/// Ranked paths for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    /// Number of launch angles simulated
    pub candidates: usize,
    pub paths: Vec<ThreeCushionPath>,
}

impl PathRequest {
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The three balls in engine order (cue, object1, object2)
    pub fn balls(&self) -> [Ball; 3] {
        [
            self.cue.to_ball(BallId::Cue),
            self.object1.to_ball(BallId::Object1),
            self.object2.to_ball(BallId::Object2),
        ]
    }

    /// Settings after applying the preset, if any
    pub fn effective_settings(&self) -> SimulationSettings {
        let mut settings = self.settings.clone().unwrap_or_default();
        if let Some(preset) = self.preset {
            settings.apply_preset(preset);
        }
        settings
    }

    /// Reject inputs the engine can't simulate meaningfully
    pub fn validate(&self) -> Result<(), RequestError> {
        let table = &self.table;
        if !(table.width.is_finite() && table.width > 0.0) {
            return Err(RequestError::InvalidTable("width must be positive"));
        }
        if !(table.height.is_finite() && table.height > 0.0) {
            return Err(RequestError::InvalidTable("height must be positive"));
        }
        if !(table.cushion_restitution > 0.0 && table.cushion_restitution <= 1.0) {
            return Err(RequestError::InvalidTable(
                "cushion restitution must be in (0, 1]",
            ));
        }

        let balls = self.balls();
        for ball in &balls {
            validate_ball(ball)?;
            if let Some(side) = detect_cushion_collision(ball, table).and_then(|c| c.cushion_side) {
                return Err(RequestError::OutOfBounds(ball.id, side));
            }
        }

        for a in 0..balls.len() {
            for b in (a + 1)..balls.len() {
                if detect_ball_collision(&balls[a], &balls[b]).is_some() {
                    return Err(RequestError::Overlap(balls[a].id, balls[b].id));
                }
            }
        }

        if let Some(index) = self.angles.iter().flatten().position(|a| !a.is_finite()) {
            return Err(RequestError::InvalidAngle(index));
        }

        validate_settings(&self.effective_settings())
    }
}

fn validate_ball(ball: &Ball) -> Result<(), RequestError> {
    let invalid = |reason| RequestError::InvalidBall {
        id: ball.id,
        reason,
    };
    if !ball.position.is_finite() {
        return Err(invalid("position must be finite"));
    }
    if !(ball.radius.is_finite() && ball.radius > 0.0) {
        return Err(invalid("radius must be positive"));
    }
    if !(ball.mass.is_finite() && ball.mass > 0.0) {
        return Err(invalid("mass must be positive"));
    }
    Ok(())
}

fn validate_settings(settings: &SimulationSettings) -> Result<(), RequestError> {
    if !(settings.time_step.is_finite() && settings.time_step > 0.0) {
        return Err(RequestError::InvalidSettings("timeStep must be positive"));
    }
    if !(settings.max_simulation_time.is_finite() && settings.max_simulation_time >= 0.0) {
        return Err(RequestError::InvalidSettings(
            "maxSimulationTime must be finite",
        ));
    }
    if !(0.0..=1.0).contains(&settings.friction) {
        return Err(RequestError::InvalidSettings("friction must be in [0, 1]"));
    }
    if !(0.0..=1.0).contains(&settings.ball_restitution) {
        return Err(RequestError::InvalidSettings(
            "ballRestitution must be in [0, 1]",
        ));
    }
    if !(settings.launch_speed.is_finite() && settings.launch_speed >= 0.0) {
        return Err(RequestError::InvalidSettings("launchSpeed must be finite"));
    }
    if !(settings.min_velocity.is_finite() && settings.fan_half_angle.is_finite()) {
        return Err(RequestError::InvalidSettings("values must be finite"));
    }
    Ok(())
}

/// Validate a request and run the path search
pub fn calculate_paths(request: &PathRequest) -> Result<PathResponse, RequestError> {
    request.validate()?;

    let settings = request.effective_settings();
    let [cue, object1, object2] = request.balls();
    let candidates = match &request.angles {
        Some(angles) => angles.len(),
        None => settings.candidate_count,
    };

    let paths = simulate_three_cushion_paths_with(
        &cue,
        &object1,
        &object2,
        &request.table,
        request.angles.as_deref(),
        &settings,
    );

    Ok(PathResponse { candidates, paths })
}

/// JSON in, JSON out
pub fn calculate_paths_json(json: &str) -> Result<String, RequestError> {
    let request = PathRequest::from_json(json)?;
    let response = calculate_paths(&request)?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_CUSHION_RESTITUTION;

    const SCENARIO: &str = r#"{
        "cue": {"x": 50, "y": 50, "r": 5},
        "object1": {"x": 200, "y": 50, "r": 5},
        "object2": {"x": 350, "y": 50, "r": 5},
        "table": {"width": 400, "height": 200, "cushionRestitution": 0.8}
    }"#;

    fn scenario() -> PathRequest {
        PathRequest::from_json(SCENARIO).unwrap()
    }

    #[test]
    fn test_parse_with_defaults() {
        let request = PathRequest::from_json(
            r#"{
                "cue": {"x": 50, "y": 50, "radius": 5},
                "object1": {"x": 200, "y": 50, "radius": 5, "mass": 2},
                "object2": {"x": 350, "y": 50, "radius": 5},
                "table": {"width": 400, "height": 200}
            }"#,
        )
        .unwrap();
        assert_eq!(request.cue.mass, 1.0);
        assert_eq!(request.object1.mass, 2.0);
        assert_eq!(
            request.table.cushion_restitution,
            DEFAULT_CUSHION_RESTITUTION
        );
        assert!(request.angles.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_scenario_response() {
        let response = calculate_paths(&scenario()).unwrap();
        assert_eq!(response.candidates, 16);
        assert!(response.paths.len() <= 5);
        for path in &response.paths {
            assert!(path.cushion_hits >= 3);
            assert!(path.success_rate > 0.1 && path.success_rate < 0.95);
        }
    }

    #[test]
    fn test_json_round_trip_shape() {
        let mut request = scenario();
        request.angles = Some(vec![0.0, 0.5]);
        request.settings = Some(SimulationSettings::default().with_launch_speed(600.0));
        let json = serde_json::to_string(&request).unwrap();

        let output = calculate_paths_json(&json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["candidates"], 2);
        assert!(value["paths"].is_array());
    }

    #[test]
    fn test_preset_overrides_candidate_count() {
        let mut request = scenario();
        request.preset = Some(SearchPreset::Quick);
        assert_eq!(request.effective_settings().candidate_count, 8);
        assert_eq!(calculate_paths(&request).unwrap().candidates, 8);
    }

    #[test]
    fn test_rejects_overlapping_balls() {
        let mut request = scenario();
        request.object1.x = 55.0;
        assert!(matches!(
            request.validate(),
            Err(RequestError::Overlap(BallId::Cue, BallId::Object1))
        ));
    }

    #[test]
    fn test_rejects_ball_outside_table() {
        let mut request = scenario();
        request.object2.x = 398.0;
        match calculate_paths(&request) {
            Err(RequestError::OutOfBounds(id, side)) => {
                assert_eq!(id, BallId::Object2);
                assert_eq!(side, CushionSide::Right);
            }
            other => panic!("expected an out-of-bounds error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut request = scenario();
        request.cue.radius = 0.0;
        assert!(matches!(
            request.validate(),
            Err(RequestError::InvalidBall {
                id: BallId::Cue,
                ..
            })
        ));

        let mut request = scenario();
        request.table.cushion_restitution = 1.5;
        assert!(matches!(
            request.validate(),
            Err(RequestError::InvalidTable(_))
        ));

        let mut request = scenario();
        request.angles = Some(vec![0.0, f64::NAN]);
        assert!(matches!(
            request.validate(),
            Err(RequestError::InvalidAngle(1))
        ));

        let mut request = scenario();
        request.settings = Some(SimulationSettings {
            time_step: 0.0,
            ..SimulationSettings::default()
        });
        assert!(matches!(
            request.validate(),
            Err(RequestError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = calculate_paths_json("{not json").unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
