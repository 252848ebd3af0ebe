//! Per-player behaviour transitions
//!
//! Each tick a player first may start a charge, then settles on one mode:
//!
//! 1. Stunned timer running: `Stunned` for the head of the window, then
//!    `Stopped` for the rest.
//! 2. No movement input: `Stopped`.
//! 3. Otherwise `Walking`, refined to `Charging` during the head of the
//!    charge cooldown unless the player holds the ball (holders walk slower
//!    and cannot charge).
//!
//! The charging and stunned windows are the head of each action's single
//! cooldown timer.

use crate::config::SpeedConfig;
use crate::game::constants::cooldown;
use crate::game::input::{MoveVector, PlayerControls};
use crate::game::state::{Mode, PlayerState};

/// Mode chosen for this tick and, when moving, the speed multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub mode: Mode,
    pub speed: Option<f64>,
}

impl Transition {
    const fn still(mode: Mode) -> Self {
        Self { mode, speed: None }
    }

    const fn moving(mode: Mode, speed: f64) -> Self {
        Self {
            mode,
            speed: Some(speed),
        }
    }
}

/// Action held, walking without the ball, and the charge is off cooldown
///
/// Uses the mode from the previous tick.
pub fn charge_ready(controls: &PlayerControls, player: &PlayerState) -> bool {
    controls.action && player.behavior.is_free_walking() && player.charge_cooldown <= 0.0
}

/// Restart the charge cooldown; its head is the charging window
pub fn start_charge(player: &mut PlayerState) {
    player.charge_cooldown = cooldown::CHARGE;
}

/// Whether the charge was triggered within the visual window
#[inline]
pub fn in_charge_window(player: &PlayerState) -> bool {
    player.charge_cooldown > cooldown::CHARGE - cooldown::VISUAL_WINDOW
}

/// Pick this tick's mode for a player
pub fn transition(player: &PlayerState, movement: &MoveVector, speeds: &SpeedConfig) -> Transition {
    if player.stun_cooldown > 0.0 {
        return if player.stun_cooldown < cooldown::STUN - cooldown::VISUAL_WINDOW {
            Transition::still(Mode::Stopped)
        } else {
            Transition::still(Mode::Stunned)
        };
    }

    if movement.is_idle() {
        return Transition::still(Mode::Stopped);
    }

    if player.behavior.holding {
        Transition::moving(Mode::Walking, speeds.hold)
    } else if in_charge_window(player) {
        Transition::moving(Mode::Charging, speeds.charge)
    } else {
        Transition::moving(Mode::Walking, speeds.walk)
    }
}

/// Knock the ball out of a player's hands and start the stun
pub fn stun(player: &mut PlayerState) {
    player.behavior.holding = false;
    player.behavior.mode = Mode::Stunned;
    player.stun_cooldown = cooldown::STUN;
}
