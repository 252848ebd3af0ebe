use std::str::FromStr;
use std::time::Duration;

use crate::game::constants::{field, game, speed, timing};

/// Configuration errors reported by [`GameConfig::validate`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("aspect ratio must be positive, got {0}")]
    InvalidAspectRatio(f64),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("winning score must be at least 1")]
    ZeroWinningScore,
    #[error("speeds must satisfy charge > walk > hold > 0 (charge={charge}, walk={walk}, hold={hold})")]
    SpeedOrdering { charge: f64, walk: f64, hold: f64 },
}

/// Movement speed multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedConfig {
    pub walk: f64,
    pub charge: f64,
    pub hold: f64,
    pub ball: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            walk: speed::WALK,
            charge: speed::CHARGE,
            hold: speed::HOLD,
            ball: speed::BALL,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Window width/height ratio applied to the vertical axis
    pub aspect_ratio: f64,
    /// Idle wait between two simulation ticks
    pub tick_interval: Duration,
    /// Match length in seconds
    pub match_duration: f64,
    /// First player to this score wins
    pub winning_score: u32,
    /// Frozen countdown before a match starts moving
    pub countdown: Duration,
    /// Frozen pause after a goal (and again before play resumes)
    pub goal_pause: Duration,
    /// Movement speeds
    pub speeds: SpeedConfig,
    /// Seed for player ordering and ball wandering (entropy when unset)
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: field::ASPECT_RATIO,
            tick_interval: Duration::from_millis(timing::TICK_INTERVAL_MS),
            match_duration: game::MATCH_DURATION,
            winning_score: game::WINNING_SCORE,
            countdown: Duration::from_secs_f64(game::COUNTDOWN),
            goal_pause: Duration::from_secs_f64(game::GOAL_PAUSE),
            speeds: SpeedConfig::default(),
            rng_seed: None,
        }
    }
}

/// Read and parse an environment variable, warning on garbage
fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", name, raw);
            None
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        let width = env_parse::<u32>("WINDOW_WIDTH");
        let height = env_parse::<u32>("WINDOW_HEIGHT");
        if width.is_some() || height.is_some() {
            let width = width.unwrap_or(field::WINDOW_WIDTH);
            let height = height.unwrap_or(field::WINDOW_HEIGHT);
            if width > 0 && height > 0 {
                config.aspect_ratio = f64::from(width) / f64::from(height);
            } else {
                tracing::warn!("WINDOW_WIDTH/WINDOW_HEIGHT must be > 0, using default");
            }
        }

        if let Some(ms) = env_parse::<u64>("TICK_INTERVAL_MS") {
            if (1..=1000).contains(&ms) {
                config.tick_interval = Duration::from_millis(ms);
            } else {
                tracing::warn!("TICK_INTERVAL_MS must be 1-1000, using default");
            }
        }

        if let Some(secs) = env_parse::<f64>("MATCH_DURATION_SECS") {
            if secs.is_finite() && secs > 0.0 {
                config.match_duration = secs;
            } else {
                tracing::warn!("MATCH_DURATION_SECS must be > 0, using default");
            }
        }

        if let Some(score) = env_parse::<u32>("WINNING_SCORE") {
            if score > 0 {
                config.winning_score = score;
            } else {
                tracing::warn!("WINNING_SCORE must be > 0, using default");
            }
        }

        if let Some(secs) = env_parse::<f64>("COUNTDOWN_SECS") {
            if secs.is_finite() && secs >= 0.0 {
                config.countdown = Duration::from_secs_f64(secs);
            } else {
                tracing::warn!("COUNTDOWN_SECS must be >= 0, using default");
            }
        }

        if let Some(secs) = env_parse::<f64>("GOAL_PAUSE_SECS") {
            if secs.is_finite() && secs >= 0.0 {
                config.goal_pause = Duration::from_secs_f64(secs);
            } else {
                tracing::warn!("GOAL_PAUSE_SECS must be >= 0, using default");
            }
        }

        if let Some(walk) = env_parse("WALK_SPEED") {
            config.speeds.walk = walk;
        }
        if let Some(charge) = env_parse("CHARGE_SPEED") {
            config.speeds.charge = charge;
        }
        if let Some(hold) = env_parse("HOLD_SPEED") {
            config.speeds.hold = hold;
        }

        config.rng_seed = env_parse("RNG_SEED");

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("tick interval"));
        }
        if !(self.match_duration > 0.0) {
            return Err(ConfigError::ZeroDuration("match duration"));
        }
        if self.winning_score == 0 {
            return Err(ConfigError::ZeroWinningScore);
        }
        let SpeedConfig {
            walk, charge, hold, ..
        } = self.speeds;
        if !(charge > walk && walk > hold && hold > 0.0) {
            return Err(ConfigError::SpeedOrdering { charge, walk, hold });
        }
        Ok(())
    }
}
