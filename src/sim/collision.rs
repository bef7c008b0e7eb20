//! Collision detection
//!
//! Two families of checks live here. The snapshot checks (`detect_*`) look at
//! the balls where they are right now and report overlap. The predictive
//! checks (`time_to_*`) look along the current velocities and report when the
//! next contact will happen; the simulator's main loop only uses these.

use glam::DVec2;

use super::state::{Ball, Collision, CushionSide, Table};
use crate::vector;

/// Predicted cushion contact for a single ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CushionEta {
    /// Seconds until the leading edge reaches the cushion (`INFINITY` if never)
    pub time: f64,
    /// Cushion that will be hit (`None` if never)
    pub side: Option<CushionSide>,
}

impl CushionEta {
    pub const NEVER: Self = Self {
        time: f64::INFINITY,
        side: None,
    };
}

/// Snapshot overlap check between two balls
///
/// Returns a collision at the point on `a`'s surface facing `b`, with the
/// normal pointing from `a` to `b`. Velocities are ignored.
pub fn detect_ball_collision(a: &Ball, b: &Ball) -> Option<Collision> {
    let dist = vector::distance(a.position, b.position);
    if dist >= a.radius + b.radius {
        return None;
    }

    let normal = vector::normalize(vector::subtract(b.position, a.position));
    let point = vector::add(a.position, vector::scale(normal, a.radius));
    Some(Collision::ball(a, b, point, normal, 0.0))
}

/// Snapshot check of a ball against all four cushions
///
/// When more than one cushion is breached, the one with the smallest
/// penetration is reported.
pub fn detect_cushion_collision(ball: &Ball, table: &Table) -> Option<Collision> {
    CushionSide::ALL
        .iter()
        .map(|&side| (side, side.penetration(ball.position, ball.radius, table)))
        .filter(|&(_, penetration)| penetration > 0.0)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(side, _)| Collision::cushion(ball, side, table, 0.0))
}

/// Earliest future time at which two balls touch
///
/// Solves |Δp + Δv·t| = rA + rB for t. Returns `INFINITY` when the balls are
/// not approaching or their paths never meet. Balls that already touch or
/// overlap while still approaching report 0.
pub fn time_to_collision(a: &Ball, b: &Ball) -> f64 {
    let dp = vector::subtract(b.position, a.position);
    let dv = vector::subtract(b.velocity, a.velocity);
    let reach = a.radius + b.radius;

    let qa = vector::dot(dv, dv);
    if qa == 0.0 {
        return f64::INFINITY;
    }

    let qb = 2.0 * vector::dot(dp, dv);
    if qb >= 0.0 {
        // Separating or sliding past tangentially
        return f64::INFINITY;
    }

    let qc = vector::dot(dp, dp) - reach * reach;
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return f64::INFINITY;
    }

    let root = discriminant.sqrt();
    let t1 = (-qb - root) / (2.0 * qa);
    let t2 = (-qb + root) / (2.0 * qa);

    if t1 > 0.0 {
        t1
    } else if t2 > 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}

/// Time until the ball's leading edge reaches a cushion
///
/// Only the cushion the ball is moving toward is considered on each axis. A
/// ball already past that cushion reports 0.
pub fn time_to_cushion(ball: &Ball, table: &Table) -> CushionEta {
    let mut eta = CushionEta::NEVER;
    let DVec2 { x, y } = ball.position;
    let DVec2 { x: vx, y: vy } = ball.velocity;
    let r = ball.radius;

    let mut consider = |time: f64, side: CushionSide| {
        let time = time.max(0.0);
        if time < eta.time {
            eta = CushionEta {
                time,
                side: Some(side),
            };
        }
    };

    if vx > 0.0 {
        consider((table.width - r - x) / vx, CushionSide::Right);
    } else if vx < 0.0 {
        consider((r - x) / vx, CushionSide::Left);
    }

    if vy > 0.0 {
        consider((table.height - r - y) / vy, CushionSide::Bottom);
    } else if vy < 0.0 {
        consider((r - y) / vy, CushionSide::Top);
    }

    eta
}
