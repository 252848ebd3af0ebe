//! Ball possession: charge hits, pickups and goals

use crate::game::behavior;
use crate::game::constants::{cooldown, field, range};
use crate::game::state::{FieldState, Mode, PlayerSide};
use crate::game::systems::kinematics;

/// A charging player knocks the ball out of the opponent's hands
///
/// Fires when `attacker` is charging, the opponent holds the ball, and the
/// two are within [`range::CHARGE_HIT`] (inclusive). The ball lands in front
/// of the victim, facing where the victim faces, and cannot be picked up
/// until the repossession guard runs out.
pub fn try_dispossess(field: &mut FieldState, attacker: PlayerSide, aspect_ratio: f64) -> bool {
    let victim = attacker.opponent();
    let attacker_state = field.player(attacker);
    let victim_state = field.player(victim);

    if attacker_state.behavior.mode != Mode::Charging || !victim_state.behavior.holding {
        return false;
    }
    let gap = kinematics::distance(
        attacker_state.pose.position,
        victim_state.pose.position,
        aspect_ratio,
    );
    if gap > range::CHARGE_HIT {
        return false;
    }

    let victim_pose = victim_state.pose;
    behavior::stun(field.player_mut(victim));

    let offset = kinematics::velocity(victim_pose.angle, range::BALL_DROP_OFFSET).scale_y(aspect_ratio);
    field.ball.pose.position =
        (victim_pose.position + offset).clamp_components(field::MIN, field::MAX);
    field.ball.pose.angle = victim_pose.angle;
    field.ball.behavior.holding = false;
    field.repossession_guard = cooldown::BALL_REPOSSESSION;
    true
}

/// A player close enough to the free ball takes it
///
/// Requires the ball to be free, the distance strictly below
/// [`range::PICKUP`], and the repossession guard expired.
pub fn try_pickup(field: &mut FieldState, side: PlayerSide, aspect_ratio: f64) -> bool {
    if field.ball.behavior.holding || field.repossession_guard > 0.0 {
        return false;
    }
    let gap = kinematics::distance(
        field.player(side).pose.position,
        field.ball.pose.position,
        aspect_ratio,
    );
    if gap >= range::PICKUP {
        return false;
    }

    let player = field.player_mut(side);
    player.behavior.mode = Mode::Walking;
    player.behavior.holding = true;
    field.ball.behavior.holding = true;
    true
}

/// The holder stands inside the opponent's goal band
pub fn in_goal(field: &FieldState, side: PlayerSide) -> bool {
    let player = field.player(side);
    player.behavior.holding && side.in_scoring_band(player.pose.position.x)
}
