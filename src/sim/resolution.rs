//! Collision response
//!
//! Impulse exchange between balls, reflection off cushions, and the positional
//! correction that keeps a resolved contact from re-triggering next frame.

use glam::DVec2;

use super::state::{Ball, Collision, CushionSide, Table};
use crate::vector;

/// Exchange momentum between two touching balls
///
/// The normal is taken from `collision` (pointing from `a` to `b`). Balls that
/// are already separating along it keep their velocities. Positional
/// separation runs for every pair, separating ones included.
pub fn resolve_ball_collision(a: &mut Ball, b: &mut Ball, collision: &Collision, restitution: f64) {
    let normal = collision.normal;
    let relative = vector::subtract(b.velocity, a.velocity);
    let approach = vector::dot(relative, normal);

    if approach <= 0.0 {
        let j = -(1.0 + restitution) * approach / (1.0 / a.mass + 1.0 / b.mass);
        let impulse = vector::scale(normal, j);
        a.velocity = vector::subtract(a.velocity, vector::scale(impulse, 1.0 / a.mass));
        b.velocity = vector::add(b.velocity, vector::scale(impulse, 1.0 / b.mass));
    }

    separate_balls(a, b);
}

/// Push two overlapping balls apart along their line of centers, half each
pub fn separate_balls(a: &mut Ball, b: &mut Ball) {
    let offset = vector::subtract(b.position, a.position);
    let dist = vector::magnitude(offset);
    let overlap = a.radius + b.radius - dist;
    if overlap <= 0.0 {
        return;
    }

    // Coincident centers have no line between them; split along x
    let normal = if dist == 0.0 {
        DVec2::X
    } else {
        vector::normalize(offset)
    };
    let push = vector::scale(normal, overlap / 2.0);
    a.position = vector::subtract(a.position, push);
    b.position = vector::add(b.position, push);
}

/// Bounce a ball off the cushion named in `collision`
pub fn resolve_cushion_collision(ball: &mut Ball, collision: &Collision, table: &Table) {
    let reflected = vector::reflect(ball.velocity, collision.normal);
    ball.velocity = vector::scale(reflected, table.cushion_restitution);

    if let Some(side) = collision.cushion_side {
        separate_from_cushion(ball, side, table);
    }
}

/// Place the ball exactly on the boundary for `side`
pub fn separate_from_cushion(ball: &mut Ball, side: CushionSide, table: &Table) {
    match side {
        CushionSide::Left => ball.position.x = ball.radius,
        CushionSide::Right => ball.position.x = table.width - ball.radius,
        CushionSide::Top => ball.position.y = ball.radius,
        CushionSide::Bottom => ball.position.y = table.height - ball.radius,
    }
}
