//! Shot search and the fixed-timestep simulation loop
//!
//! Each candidate angle gets its own copy of the three balls. The loop finds
//! the earliest predicted contact; if it falls inside the current timestep the
//! balls are advanced exactly to it and the contact is resolved, otherwise the
//! balls coast a full timestep. Friction is applied once per iteration either
//! way.

use super::collision::{time_to_collision, time_to_cushion};
use super::resolution::{resolve_ball_collision, resolve_cushion_collision};
use super::scoring;
use super::state::{
    Ball, Collision, CollisionKind, CushionSide, PathOutcome, SimulationStep, Table,
    ThreeCushionPath,
};
use crate::normalize_angle;
use crate::ranking::PathRanking;
use crate::settings::SimulationSettings;
use crate::vector;

/// Next contact predicted from the current velocities
#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    Cushion { ball: usize, side: CushionSide },
    Ball { a: usize, b: usize },
}

/// Candidate launch angles fanned around the bearing from the cue to object ball 1
///
/// Angles are spread evenly with both fan edges included.
pub fn generate_candidate_angles(
    cue: &Ball,
    object1: &Ball,
    settings: &SimulationSettings,
) -> Vec<f64> {
    let bearing = vector::angle(vector::subtract(object1.position, cue.position));
    let count = settings.candidate_count;
    let half = settings.fan_half_angle;

    match count {
        0 => Vec::new(),
        1 => vec![normalize_angle(bearing)],
        _ => {
            let spacing = 2.0 * half / (count - 1) as f64;
            (0..count)
                .map(|i| normalize_angle(bearing - half + i as f64 * spacing))
                .collect()
        }
    }
}

/// Search for three-cushion paths with default settings
///
/// Returns at most five valid paths, best success rate first. An empty list is
/// a normal outcome: no sampled angle satisfied the heuristic.
pub fn simulate_three_cushion_paths(
    cue: &Ball,
    object1: &Ball,
    object2: &Ball,
    table: &Table,
    angles: Option<&[f64]>,
) -> Vec<ThreeCushionPath> {
    simulate_three_cushion_paths_with(
        cue,
        object1,
        object2,
        table,
        angles,
        &SimulationSettings::default(),
    )
}

/// Search for three-cushion paths with explicit settings
pub fn simulate_three_cushion_paths_with(
    cue: &Ball,
    object1: &Ball,
    object2: &Ball,
    table: &Table,
    angles: Option<&[f64]>,
    settings: &SimulationSettings,
) -> Vec<ThreeCushionPath> {
    let angles = match angles {
        Some(angles) => angles.to_vec(),
        None => generate_candidate_angles(cue, object1, settings),
    };

    let mut ranking = PathRanking::new(settings.max_paths);
    let mut valid = 0usize;
    for &angle in &angles {
        let path = simulate_single_path(cue, object1, object2, table, angle, settings);
        if path.is_valid {
            valid += 1;
        }
        ranking.insert(path);
    }

    log::info!(
        "Searched {} angles: {} valid, returning {} (best success {:?})",
        angles.len(),
        valid,
        ranking.len(),
        ranking.top_success_rate()
    );

    ranking.into_paths()
}

/// Simulate one launch angle to completion and score the result
pub fn simulate_single_path(
    cue: &Ball,
    object1: &Ball,
    object2: &Ball,
    table: &Table,
    angle: f64,
    settings: &SimulationSettings,
) -> ThreeCushionPath {
    let launch = vector::from_angle(angle, settings.launch_speed);
    let mut balls = [cue.with_velocity(launch), *object1, *object2];
    let start = balls[0].position;

    let mut steps = Vec::new();
    let mut time = 0.0;
    let mut cushion_hits = 0u32;
    let mut ball_hits = 0u32;
    let mut is_valid = false;
    let mut iterations = 0usize;

    let outcome = loop {
        if balls.iter().all(|b| !b.is_moving()) {
            break PathOutcome::AllStopped;
        }
        if time >= settings.max_simulation_time {
            break PathOutcome::TimedOut;
        }
        if iterations >= settings.max_iterations {
            log::warn!(
                "Path at angle {:.4} hit the iteration ceiling at t={:.3}",
                angle,
                time
            );
            break PathOutcome::StepLimit;
        }
        iterations += 1;

        let collision = match next_event(&balls, table) {
            Some((dt, event)) if dt <= settings.time_step => {
                advance_all(&mut balls, dt);
                time += dt;

                let collision = resolve_event(&mut balls, event, table, time, settings);
                match collision.kind {
                    CollisionKind::Cushion => cushion_hits += 1,
                    CollisionKind::Ball => ball_hits += 1,
                }
                is_valid = scoring::is_valid(cushion_hits, ball_hits);

                log::trace!(
                    "t={:.4} {:?} contact ({:?}, {:?}, {:?})",
                    time,
                    collision.kind,
                    collision.ball_id,
                    collision.other_ball_id,
                    collision.cushion_side
                );
                Some(collision)
            }
            _ => {
                advance_all(&mut balls, settings.time_step);
                time += settings.time_step;
                None
            }
        };

        for ball in &mut balls {
            ball.apply_friction(settings.friction, settings.min_velocity);
        }

        steps.push(SimulationStep {
            time,
            balls,
            collision,
        });
    };

    let path_length = scoring::cue_path_length(start, &steps);
    let difficulty = scoring::difficulty(cushion_hits, path_length);
    let success_rate = scoring::success_rate(cushion_hits, ball_hits, difficulty);

    log::debug!(
        "angle={:.4} cushions={} balls={} valid={} difficulty={:.3} success={:.3} ({:?} at t={:.3})",
        angle,
        cushion_hits,
        ball_hits,
        is_valid,
        difficulty,
        success_rate,
        outcome,
        time
    );

    ThreeCushionPath {
        launch_angle: angle,
        steps,
        cushion_hits,
        ball_hits,
        is_valid,
        end_time: time,
        difficulty,
        success_rate,
        outcome,
    }
}

/// Earliest predicted contact across every ball and every pair
///
/// Ties go to the first candidate checked: cushions before pairs, lower ball
/// index first.
fn next_event(balls: &[Ball; 3], table: &Table) -> Option<(f64, Event)> {
    let mut earliest: Option<(f64, Event)> = None;
    let mut consider = |time: f64, event: Event| {
        if time.is_finite() && earliest.is_none_or(|(best, _)| time < best) {
            earliest = Some((time, event));
        }
    };

    for (i, ball) in balls.iter().enumerate() {
        let eta = time_to_cushion(ball, table);
        if let Some(side) = eta.side {
            consider(eta.time, Event::Cushion { ball: i, side });
        }
    }

    for a in 0..balls.len() {
        for b in (a + 1)..balls.len() {
            consider(
                time_to_collision(&balls[a], &balls[b]),
                Event::Ball { a, b },
            );
        }
    }

    earliest
}

fn advance_all(balls: &mut [Ball; 3], dt: f64) {
    for ball in balls.iter_mut() {
        ball.advance(dt);
    }
}

/// Resolve a contact in place and return its record
fn resolve_event(
    balls: &mut [Ball; 3],
    event: Event,
    table: &Table,
    time: f64,
    settings: &SimulationSettings,
) -> Collision {
    match event {
        Event::Cushion { ball, side } => {
            let collision = Collision::cushion(&balls[ball], side, table, time);
            resolve_cushion_collision(&mut balls[ball], &collision, table);
            collision
        }
        Event::Ball { a, b } => {
            // a < b, so b lands in the right half
            let (left, right) = balls.split_at_mut(b);
            let first = &mut left[a];
            let second = &mut right[0];

            let normal = vector::normalize(vector::subtract(second.position, first.position));
            let point = vector::add(first.position, vector::scale(normal, first.radius));
            let collision = Collision::ball(first, second, point, normal, time);
            resolve_ball_collision(first, second, &collision, settings.ball_restitution);
            collision
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BallId;
    use glam::DVec2;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_4, PI};

    fn scenario() -> (Ball, Ball, Ball, Table) {
        (
            Ball::new(BallId::Cue, DVec2::new(50.0, 50.0), 5.0),
            Ball::new(BallId::Object1, DVec2::new(200.0, 50.0), 5.0),
            Ball::new(BallId::Object2, DVec2::new(350.0, 50.0), 5.0),
            Table::new(400.0, 200.0).with_restitution(0.8),
        )
    }

    fn assert_path_consistent(path: &ThreeCushionPath, settings: &SimulationSettings) {
        assert!((0.0..=1.0).contains(&path.difficulty));
        assert!((0.0..=1.0).contains(&path.success_rate));
        assert_eq!(
            path.is_valid,
            path.cushion_hits >= 3 && path.ball_hits >= 2,
            "validity must follow the hit counters"
        );
        let cushions = path
            .collisions()
            .filter(|c| c.kind == CollisionKind::Cushion)
            .count();
        let pairs = path
            .collisions()
            .filter(|c| c.kind == CollisionKind::Ball)
            .count();
        assert_eq!(cushions as u32, path.cushion_hits);
        assert_eq!(pairs as u32, path.ball_hits);
        assert!(path.end_time < settings.max_simulation_time + settings.time_step + 1e-9);
    }

    #[test]
    fn test_candidate_angles_fan() {
        let (cue, obj1, _, _) = scenario();
        let settings = SimulationSettings::default();
        let angles = generate_candidate_angles(&cue, &obj1, &settings);

        assert_eq!(angles.len(), 16);
        assert!((angles[0] + FRAC_PI_4).abs() < 1e-12);
        assert!((angles[15] - FRAC_PI_4).abs() < 1e-12);
        let spacing = angles[1] - angles[0];
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - spacing).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scenario_returns_valid_ranked_paths() {
        let (cue, obj1, obj2, table) = scenario();
        let paths = simulate_three_cushion_paths(&cue, &obj1, &obj2, &table, None);

        assert!(paths.len() <= 5);
        for path in &paths {
            assert!(path.is_valid);
            assert!(path.cushion_hits >= 3);
            assert!(path.success_rate > 0.1 && path.success_rate < 0.95);
        }
        for pair in paths.windows(2) {
            assert!(pair[0].success_rate >= pair[1].success_rate);
        }
    }

    #[test]
    fn test_fast_search_paths_are_consistent() {
        let (cue, obj1, obj2, table) = scenario();
        let settings = SimulationSettings::default().with_launch_speed(600.0);
        let angles = generate_candidate_angles(&cue, &obj1, &settings);

        for &angle in &angles {
            let path = simulate_single_path(&cue, &obj1, &obj2, &table, angle, &settings);
            assert_path_consistent(&path, &settings);
        }

        let ranked = simulate_three_cushion_paths_with(&cue, &obj1, &obj2, &table, None, &settings);
        assert!(!ranked.is_empty());
        assert!(ranked.len() <= settings.max_paths);
        assert!(ranked[0].cushion_hits >= 3);
        for path in &ranked {
            assert!(path.is_valid);
            assert!(path.ball_hits >= 2);
            assert!(path.success_rate > 0.1 && path.success_rate < 0.95);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].success_rate >= pair[1].success_rate);
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let (cue, obj1, obj2, table) = scenario();
        let settings = SimulationSettings::default().with_launch_speed(600.0);

        let first = simulate_three_cushion_paths_with(&cue, &obj1, &obj2, &table, None, &settings);
        let second = simulate_three_cushion_paths_with(&cue, &obj1, &obj2, &table, None, &settings);
        assert!(!first.is_empty());
        assert_eq!(first, second);

        let a = simulate_single_path(&cue, &obj1, &obj2, &table, 0.3, &settings);
        let b = simulate_single_path(&cue, &obj1, &obj2, &table, 0.3, &settings);
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn single_path_is_reproducible(angle in -PI..PI, speed in 50.0..800.0f64) {
            let (cue, obj1, obj2, table) = scenario();
            let settings = SimulationSettings::default().with_launch_speed(speed);
            let a = simulate_single_path(&cue, &obj1, &obj2, &table, angle, &settings);
            let b = simulate_single_path(&cue, &obj1, &obj2, &table, angle, &settings);
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn test_explicit_empty_angle_list() {
        let (cue, obj1, obj2, table) = scenario();
        let paths = simulate_three_cushion_paths(&cue, &obj1, &obj2, &table, Some(&[]));
        assert!(paths.is_empty());
    }

    #[test]
    fn test_default_shot_comes_to_rest() {
        let (cue, obj1, obj2, table) = scenario();
        let settings = SimulationSettings::default();
        let path = simulate_single_path(&cue, &obj1, &obj2, &table, PI / 2.0, &settings);

        assert_eq!(path.outcome, PathOutcome::AllStopped);
        assert!(path.end_time < settings.max_simulation_time);
        let last = path.final_balls().unwrap();
        assert!(last.iter().all(|b| !b.is_moving()));
    }

    #[test]
    fn test_frictionless_shot_times_out() {
        let (cue, obj1, obj2, _) = scenario();
        let table = Table::new(400.0, 200.0).with_restitution(1.0);
        let settings = SimulationSettings {
            friction: 1.0,
            ball_restitution: 1.0,
            ..SimulationSettings::default()
        }
        .with_launch_speed(100.0);

        let path = simulate_single_path(&cue, &obj1, &obj2, &table, PI / 2.0, &settings);
        assert_eq!(path.outcome, PathOutcome::TimedOut);
        assert!(path.end_time >= settings.max_simulation_time);
        assert_path_consistent(&path, &settings);
    }

    #[test]
    fn test_corner_shot_counts_each_wall_once() {
        let cue = Ball::new(BallId::Cue, DVec2::new(10.0, 10.0), 5.0);
        let obj1 = Ball::new(BallId::Object1, DVec2::new(300.0, 150.0), 5.0);
        let obj2 = Ball::new(BallId::Object2, DVec2::new(350.0, 150.0), 5.0);
        let table = Table::new(400.0, 200.0).with_restitution(0.8);
        let settings = SimulationSettings::default().with_launch_speed(60.0);

        let path = simulate_single_path(&cue, &obj1, &obj2, &table, -3.0 * FRAC_PI_4, &settings);

        let sides: Vec<CushionSide> = path.collisions().filter_map(|c| c.cushion_side).collect();
        assert_eq!(path.cushion_hits, 2);
        assert_eq!(sides.len(), 2);
        assert!(sides.contains(&CushionSide::Left));
        assert!(sides.contains(&CushionSide::Top));
        assert_eq!(path.ball_hits, 0);

        for step in &path.steps {
            let cue = &step.balls[0];
            assert!(cue.position.x >= cue.radius - 1e-6);
            assert!(cue.position.y >= cue.radius - 1e-6);
        }
    }

    #[test]
    fn test_straight_shot_hits_object_ball() {
        let cue = Ball::new(BallId::Cue, DVec2::new(50.0, 100.0), 5.0);
        let obj1 = Ball::new(BallId::Object1, DVec2::new(100.0, 100.0), 5.0);
        let obj2 = Ball::new(BallId::Object2, DVec2::new(300.0, 40.0), 5.0);
        let table = Table::new(400.0, 200.0).with_restitution(0.8);
        let settings = SimulationSettings::default().with_launch_speed(100.0);

        let path = simulate_single_path(&cue, &obj1, &obj2, &table, 0.0, &settings);

        let first = path.collisions().next().unwrap();
        assert_eq!(first.kind, CollisionKind::Ball);
        assert_eq!(first.ball_id, Some(BallId::Cue));
        assert_eq!(first.other_ball_id, Some(BallId::Object1));
        assert!((first.normal - DVec2::X).length() < 1e-9);

        for step in &path.steps {
            let [a, b, c] = &step.balls;
            for (x, y) in [(a, b), (a, c), (b, c)] {
                let dist = vector::distance(x.position, y.position);
                assert!(dist >= x.radius + y.radius - 1e-6);
            }
        }
        assert_path_consistent(&path, &settings);
    }
}
