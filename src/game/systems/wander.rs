//! Free ball wandering
//!
//! While nobody carries it, the ball walks at a fixed speed towards a random
//! waypoint in a narrow vertical band around the centre line and draws a
//! new waypoint whenever it gets close to the current one.

use rand::Rng;

use crate::game::constants::{field, range, wander};
use crate::game::state::{BallState, Mode};
use crate::game::systems::kinematics;
use crate::util::vec2::Vec2;

/// Random waypoint with x in [-0.2, 0.2] and y over the full field height
pub fn random_target<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen_range(-wander::TARGET_HALF_WIDTH..=wander::TARGET_HALF_WIDTH),
        rng.gen_range(field::MIN..=field::MAX),
    )
}

/// Replace the target while the ball is within reach of it
///
/// Returns true when a new target was drawn.
pub fn refresh_target<R: Rng + ?Sized>(ball: &mut BallState, aspect_ratio: f64, rng: &mut R) -> bool {
    let mut attempts = 0;
    while attempts < wander::MAX_TARGET_ATTEMPTS
        && kinematics::distance(ball.pose.position, ball.target, aspect_ratio) <= range::TARGET_REACHED
    {
        ball.target = random_target(rng);
        attempts += 1;
    }
    attempts > 0
}

/// Move the free ball one step towards its target; a held ball is left alone
pub fn update<R: Rng + ?Sized>(ball: &mut BallState, dt: f64, speed: f64, aspect_ratio: f64, rng: &mut R) {
    if ball.behavior.holding {
        return;
    }

    refresh_target(ball, aspect_ratio, rng);

    if let Some(angle) = kinematics::heading(ball.pose.position, ball.target, aspect_ratio) {
        let velocity = kinematics::velocity(angle, speed);
        ball.pose.position = kinematics::integrate(ball.pose.position, velocity, dt, aspect_ratio);
        ball.pose.angle = angle;
    }
    ball.behavior.mode = Mode::Walking;
}
