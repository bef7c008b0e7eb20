//! Simulation state and output types
//!
//! Coordinates are table-local: origin at the top-left corner of the playing
//! surface, x grows right, y grows down.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which of the three balls on the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallId {
    Cue,
    Object1,
    Object2,
}

impl BallId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallId::Cue => "cue",
            BallId::Object1 => "object1",
            BallId::Object2 => "object2",
        }
    }
}

/// A ball on the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub mass: f64,
}

impl Ball {
    /// Ball at rest with the default mass
    pub fn new(id: BallId, position: DVec2, radius: f64) -> Self {
        Self {
            id,
            position,
            velocity: DVec2::ZERO,
            radius,
            mass: DEFAULT_BALL_MASS,
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.velocity != DVec2::ZERO
    }

    /// Move along the current velocity for `dt` seconds
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Apply one step of friction decay; balls slower than `min_velocity` stop dead
    pub fn apply_friction(&mut self, friction: f64, min_velocity: f64) {
        self.velocity *= friction;
        if self.speed() < min_velocity {
            self.velocity = DVec2::ZERO;
        }
    }
}

/// Rectangular playing surface bounded by four cushions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_cushion_restitution")]
    pub cushion_restitution: f64,
}

fn default_cushion_restitution() -> f64 {
    DEFAULT_CUSHION_RESTITUTION
}

impl Table {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            cushion_restitution: DEFAULT_CUSHION_RESTITUTION,
        }
    }

    pub fn with_restitution(mut self, cushion_restitution: f64) -> Self {
        self.cushion_restitution = cushion_restitution;
        self
    }
}

/// One of the four table cushions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CushionSide {
    /// y = 0
    Top,
    /// y = height
    Bottom,
    /// x = 0
    Left,
    /// x = width
    Right,
}

impl CushionSide {
    pub const ALL: [CushionSide; 4] = [
        CushionSide::Top,
        CushionSide::Bottom,
        CushionSide::Left,
        CushionSide::Right,
    ];

    /// Unit normal pointing from the cushion into the table
    pub fn normal(&self) -> DVec2 {
        match self {
            CushionSide::Top => DVec2::new(0.0, 1.0),
            CushionSide::Bottom => DVec2::new(0.0, -1.0),
            CushionSide::Left => DVec2::new(1.0, 0.0),
            CushionSide::Right => DVec2::new(-1.0, 0.0),
        }
    }

    /// How far a ball of `radius` at `position` has pushed past this cushion
    /// (positive when breached)
    pub fn penetration(&self, position: DVec2, radius: f64, table: &Table) -> f64 {
        match self {
            CushionSide::Top => radius - position.y,
            CushionSide::Bottom => position.y + radius - table.height,
            CushionSide::Left => radius - position.x,
            CushionSide::Right => position.x + radius - table.width,
        }
    }

    /// Point on the cushion line touched by a ball at `position`
    pub fn contact_point(&self, position: DVec2, table: &Table) -> DVec2 {
        match self {
            CushionSide::Top => DVec2::new(position.x, 0.0),
            CushionSide::Bottom => DVec2::new(position.x, table.height),
            CushionSide::Left => DVec2::new(0.0, position.y),
            CushionSide::Right => DVec2::new(table.width, position.y),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CushionSide::Top => "top",
            CushionSide::Bottom => "bottom",
            CushionSide::Left => "left",
            CushionSide::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionKind {
    Ball,
    Cushion,
}

/// An upcoming or just-resolved contact event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collision {
    /// Contact point
    pub point: DVec2,
    /// Unit contact normal (ball A -> ball B, or cushion -> table interior)
    pub normal: DVec2,
    /// Simulation time of the contact
    pub time: f64,
    pub kind: CollisionKind,
    /// The ball that made contact (ball A for ball-ball contacts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_id: Option<BallId>,
    /// The ball that was struck (ball-ball contacts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_ball_id: Option<BallId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cushion_side: Option<CushionSide>,
}

impl Collision {
    pub fn ball(a: &Ball, b: &Ball, point: DVec2, normal: DVec2, time: f64) -> Self {
        Self {
            point,
            normal,
            time,
            kind: CollisionKind::Ball,
            ball_id: Some(a.id),
            other_ball_id: Some(b.id),
            cushion_side: None,
        }
    }

    pub fn cushion(ball: &Ball, side: CushionSide, table: &Table, time: f64) -> Self {
        Self {
            point: side.contact_point(ball.position, table),
            normal: side.normal(),
            time,
            kind: CollisionKind::Cushion,
            ball_id: Some(ball.id),
            other_ball_id: None,
            cushion_side: Some(side),
        }
    }
}

/// One recorded frame of a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub time: f64,
    pub balls: [Ball; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision: Option<Collision>,
}

/// How a path's simulation loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathOutcome {
    /// Every ball came to rest
    AllStopped,
    /// Hit the simulated time ceiling
    TimedOut,
    /// Hit the loop iteration ceiling
    StepLimit,
}

/// Scored result of one candidate launch angle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeCushionPath {
    pub launch_angle: f64,
    pub steps: Vec<SimulationStep>,
    pub cushion_hits: u32,
    pub ball_hits: u32,
    pub is_valid: bool,
    pub end_time: f64,
    pub difficulty: f64,
    pub success_rate: f64,
    pub outcome: PathOutcome,
}

impl ThreeCushionPath {
    /// Ball positions at the end of the path
    pub fn final_balls(&self) -> Option<&[Ball; 3]> {
        self.steps.last().map(|s| &s.balls)
    }

    /// All recorded collisions in order
    pub fn collisions(&self) -> impl Iterator<Item = &Collision> {
        self.steps.iter().filter_map(|s| s.collision.as_ref())
    }
}
