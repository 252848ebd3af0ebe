//! Shared per-player input state
//!
//! Written at arbitrary times by whatever samples the keyboard, read once
//! per tick by the simulation. Each player's record sits behind its own
//! short-lived lock, so a reader only ever waits for a field copy.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::game::state::PlayerSide;

/// Requested movement: a direction and a magnitude in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveVector {
    /// Radians, counter-clockwise from the horizontal axis; `None` when idle
    pub direction: Option<f64>,
    pub magnitude: f64,
}

impl MoveVector {
    pub const IDLE: MoveVector = MoveVector {
        direction: None,
        magnitude: 0.0,
    };

    pub fn toward(angle: f64) -> Self {
        Self {
            direction: Some(angle),
            magnitude: 1.0,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.magnitude == 0.0 || self.direction.is_none()
    }
}

/// State of the four direction keys of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    /// Translate key state into a movement vector
    ///
    /// Opposing keys cancel. Any non-zero result has magnitude 1.0, so
    /// diagonals are no faster than straight moves (8 directions).
    pub fn to_move_vector(self) -> MoveVector {
        let x = i32::from(self.right) - i32::from(self.left);
        let y = i32::from(self.up) - i32::from(self.down);
        if x == 0 && y == 0 {
            return MoveVector::IDLE;
        }

        let (x, y) = (f64::from(x), f64::from(y));
        let h = (x * x + y * y).sqrt();
        let angle = (x / h).acos();
        MoveVector::toward(if y < 0.0 { -angle } else { angle })
    }
}

/// Everything the simulation reads from one player's controls
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerControls {
    pub movement: MoveVector,
    /// Action (charge) key; cleared by the simulation when a charge fires
    pub action: bool,
}

/// Process-wide input state for both players
#[derive(Debug, Default)]
pub struct InputState {
    players: [Mutex<PlayerControls>; 2],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest controls of a player (zeroed until a collector writes any)
    pub fn read(&self, side: PlayerSide) -> PlayerControls {
        *self.players[side.index()].lock()
    }

    /// Store the latest movement; magnitude is clamped to `[0, 1]`
    pub fn set_movement(&self, side: PlayerSide, movement: MoveVector) {
        let magnitude = if movement.magnitude.is_nan() {
            0.0
        } else {
            movement.magnitude.clamp(0.0, 1.0)
        };
        self.players[side.index()].lock().movement = MoveVector {
            magnitude,
            ..movement
        };
    }

    pub fn set_keys(&self, side: PlayerSide, keys: DirectionKeys) {
        self.set_movement(side, keys.to_move_vector());
    }

    /// Level-triggered: true while the action key is held
    pub fn set_action(&self, side: PlayerSide, pressed: bool) {
        self.players[side.index()].lock().action = pressed;
    }

    /// Consume the action so a held key does not re-trigger
    pub fn clear_action(&self, side: PlayerSide) {
        self.players[side.index()].lock().action = false;
    }

    /// Forget all input, e.g. between matches
    pub fn reset(&self) {
        for slot in &self.players {
            *slot.lock() = PlayerControls::default();
        }
    }
}
