//! Game state definitions and structures
//!
//! Three fixed slots (two players and the ball), their behavioural state,
//! the match score/clock, and the read-only snapshot published to the
//! presentation layer.

use serde::{Deserialize, Serialize};

use crate::game::constants::{field, spawn};
use crate::util::vec2::Vec2;

/// One of the two competing players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSide {
    One,
    Two,
}

impl PlayerSide {
    pub const BOTH: [PlayerSide; 2] = [PlayerSide::One, PlayerSide::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSide::One => 0,
            PlayerSide::Two => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> PlayerSide {
        match self {
            PlayerSide::One => PlayerSide::Two,
            PlayerSide::Two => PlayerSide::One,
        }
    }

    /// Horizontal band `[min, max]` this player scores in (the opponent's goal)
    pub fn goal_band(self) -> (f64, f64) {
        match self {
            PlayerSide::One => (field::GOAL_LINE, field::MAX),
            PlayerSide::Two => (field::MIN, -field::GOAL_LINE),
        }
    }

    /// Whether `x` lies inside this player's scoring band (inclusive)
    pub fn in_scoring_band(self, x: f64) -> bool {
        let (min, max) = self.goal_band();
        (min..=max).contains(&x)
    }
}

/// Primary behaviour, mutually exclusive
///
/// `Charging` and `Stunned` never apply to the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Stopped,
    Walking,
    Charging,
    Stunned,
}

/// Mode plus the orthogonal possession bit
///
/// For a player `holding` means "carries the ball"; for the ball it means
/// "is being carried".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Behavior {
    pub mode: Mode,
    pub holding: bool,
}

impl Behavior {
    pub const STOPPED: Behavior = Behavior {
        mode: Mode::Stopped,
        holding: false,
    };

    /// Walking without the ball, the only state a charge can start from
    #[inline]
    pub fn is_free_walking(&self) -> bool {
        self.mode == Mode::Walking && !self.holding
    }
}

/// Position and facing of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    /// Facing in radians, counter-clockwise from the horizontal axis
    pub angle: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            angle,
        }
    }

    const fn from_tuple(t: (f64, f64, f64)) -> Self {
        Self::new(t.0, t.1, t.2)
    }
}

/// Player slot
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub pose: Pose,
    pub behavior: Behavior,
    /// Seconds until the charge can be used again (goes negative when idle)
    pub charge_cooldown: f64,
    /// Seconds left of the stun after losing the ball
    pub stun_cooldown: f64,
}

impl PlayerState {
    fn at(pose: Pose) -> Self {
        Self {
            pose,
            behavior: Behavior::STOPPED,
            charge_cooldown: 0.0,
            stun_cooldown: 0.0,
        }
    }
}

/// Ball slot
#[derive(Debug, Clone, PartialEq)]
pub struct BallState {
    pub pose: Pose,
    pub behavior: Behavior,
    /// Current wander waypoint
    pub target: Vec2,
}

/// Everything that is re-seeded at kick-off and after every goal
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub players: [PlayerState; 2],
    pub ball: BallState,
    /// Seconds until the free ball may be picked up again
    pub repossession_guard: f64,
}

impl FieldState {
    /// Kick-off layout: players at ±2/3 facing each other, ball centred facing up
    pub fn kickoff() -> Self {
        Self {
            players: [
                PlayerState::at(Pose::from_tuple(spawn::PLAYER_ONE)),
                PlayerState::at(Pose::from_tuple(spawn::PLAYER_TWO)),
            ],
            ball: BallState {
                pose: Pose::from_tuple(spawn::BALL),
                behavior: Behavior::STOPPED,
                target: Vec2::ZERO,
            },
            repossession_guard: 0.0,
        }
    }

    #[inline]
    pub fn player(&self, side: PlayerSide) -> &PlayerState {
        &self.players[side.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, side: PlayerSide) -> &mut PlayerState {
        &mut self.players[side.index()]
    }

    /// The player currently carrying the ball
    pub fn holder(&self) -> Option<PlayerSide> {
        PlayerSide::BOTH
            .into_iter()
            .find(|side| self.player(*side).behavior.holding)
    }

    /// At most one holder, and the ball's bit mirrors whether there is one
    pub fn possession_consistent(&self) -> bool {
        let p1 = self.players[0].behavior.holding;
        let p2 = self.players[1].behavior.holding;
        !(p1 && p2) && self.ball.behavior.holding == (p1 || p2)
    }
}

impl Default for FieldState {
    fn default() -> Self {
        Self::kickoff()
    }
}

/// Score and clock of the match in progress
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub score: [u32; 2],
    /// Seconds left; only counts down while playing
    pub remaining_time: f64,
    /// Ticks processed since the match started
    pub tick: u64,
}

impl MatchState {
    pub fn new(duration: f64) -> Self {
        Self {
            score: [0, 0],
            remaining_time: duration,
            tick: 0,
        }
    }
}

/// Match lifecycle as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    NotPlaying,
    Playing,
    Paused,
}

/// Read-only view of one tick, published for the presentation layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub tick: u64,
    /// Player one, player two, ball
    pub poses: [Pose; 3],
    /// Player one, player two, ball
    pub behaviors: [Behavior; 3],
    pub score: (u32, u32),
    pub remaining_time: f64,
    pub lifecycle: Lifecycle,
    pub ball_holder: Option<PlayerSide>,
}

impl GameSnapshot {
    pub fn capture(field: &FieldState, match_state: &MatchState, lifecycle: Lifecycle) -> Self {
        Self {
            tick: match_state.tick,
            poses: [field.players[0].pose, field.players[1].pose, field.ball.pose],
            behaviors: [
                field.players[0].behavior,
                field.players[1].behavior,
                field.ball.behavior,
            ],
            score: (match_state.score[0], match_state.score[1]),
            remaining_time: match_state.remaining_time,
            lifecycle,
            ball_holder: field.holder(),
        }
    }
}
