/// Field geometry - coordinates are normalized half-field units in [-1, 1]
pub mod field {
    /// Lower bound of both axes
    pub const MIN: f64 = -1.0;
    /// Upper bound of both axes
    pub const MAX: f64 = 1.0;
    /// Reference window width in pixels
    pub const WINDOW_WIDTH: u32 = 1280;
    /// Reference window height in pixels
    pub const WINDOW_HEIGHT: u32 = 720;
    /// Width/height ratio applied to the vertical axis
    pub const ASPECT_RATIO: f64 = WINDOW_WIDTH as f64 / WINDOW_HEIGHT as f64;
    /// Inner edge of each goal band; the bands span |x| in [GOAL_LINE, MAX]
    pub const GOAL_LINE: f64 = 0.9;
}

/// Simulation loop timing
pub mod timing {
    /// Idle wait between two ticks in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 10;
}

/// Cooldown durations in seconds
pub mod cooldown {
    /// Charge reuse cooldown
    pub const CHARGE: f64 = 2.0;
    /// Stun duration after losing the ball
    pub const STUN: f64 = 1.0;
    /// Guard preventing the ball from being picked up right after release
    pub const BALL_REPOSSESSION: f64 = 1.0;
    /// Head of the charge and stun windows shown as charging / flinching
    pub const VISUAL_WINDOW: f64 = 0.5;
}

/// Speed multipliers (field units per second at full input magnitude)
pub mod speed {
    /// Plain walking
    pub const WALK: f64 = 0.3;
    /// Charging
    pub const CHARGE: f64 = 0.5;
    /// Walking while holding the ball
    pub const HOLD: f64 = 0.25;
    /// Ball wandering on its own
    pub const BALL: f64 = 0.2;
}

/// Interaction ranges (aspect-corrected distance)
pub mod range {
    /// A charging player dispossesses a holder at or within this distance
    pub const CHARGE_HIT: f64 = 0.2;
    /// A player picks up the free ball strictly within this distance
    pub const PICKUP: f64 = 0.2;
    /// The ball picks a new wander target at or within this distance
    pub const TARGET_REACHED: f64 = 0.1;
    /// Distance in front of a dispossessed player where the ball lands
    pub const BALL_DROP_OFFSET: f64 = 0.25;
}

/// Ball wander target band
pub mod wander {
    /// Targets are drawn with |x| <= this
    pub const TARGET_HALF_WIDTH: f64 = 0.2;
    /// Maximum draws when a new target lands next to the ball again
    pub const MAX_TARGET_ATTEMPTS: u32 = 32;
}

/// Game/match constants
pub mod game {
    /// Match duration in seconds
    pub const MATCH_DURATION: f64 = 180.0;
    /// Countdown time before the match starts moving
    pub const COUNTDOWN: f64 = 3.0;
    /// Pause after a goal, and again before play resumes
    pub const GOAL_PAUSE: f64 = 1.0;
    /// First player to this score wins
    pub const WINNING_SCORE: u32 = 3;
}

/// Initial poses `(x, y, angle)` for player one, player two and the ball
pub mod spawn {
    use std::f64::consts::{FRAC_PI_2, PI};

    pub const PLAYER_ONE: (f64, f64, f64) = (-2.0 / 3.0, 0.0, 0.0);
    pub const PLAYER_TWO: (f64, f64, f64) = (2.0 / 3.0, 0.0, PI);
    pub const BALL: (f64, f64, f64) = (0.0, 0.0, FRAC_PI_2);
}
