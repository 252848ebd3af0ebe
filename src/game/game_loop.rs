//! Authoritative per-tick match update
//!
//! `GameLoop` owns the field and match state. It never sleeps or reads a
//! clock itself: the driver in [`crate::game::controller`] measures elapsed
//! time, calls [`GameLoop::tick`], publishes the snapshot and performs the
//! frozen pauses the events ask for.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::game::behavior;
use crate::game::input::InputState;
use crate::game::match_result::{check_match_end, determine_result, MatchEndReason, MatchResult};
use crate::game::state::{FieldState, GameSnapshot, Lifecycle, MatchState, PlayerSide};
use crate::game::systems::{kinematics, possession, wander};

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameLoopEvent {
    ChargeStarted { side: PlayerSide },
    Dispossessed { attacker: PlayerSide, victim: PlayerSide },
    BallPickedUp { side: PlayerSide },
    GoalScored { scorer: PlayerSide, score: (u32, u32) },
    MatchEnded { result: MatchResult },
}

/// Events of one tick; rarely more than a couple
pub type TickEvents = SmallVec<[GameLoopEvent; 4]>;

pub struct GameLoop {
    config: GameConfig,
    field: FieldState,
    match_state: MatchState,
    rng: StdRng,
    /// A goal froze the field until the next kick-off
    goal_pending: bool,
    /// The end of the match has been reported
    finished: bool,
}

impl GameLoop {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Deterministic player ordering and ball wandering
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let match_state = MatchState::new(config.match_duration);
        Self {
            config,
            field: FieldState::kickoff(),
            match_state,
            rng,
            goal_pending: false,
            finished: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn field(&self) -> &FieldState {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn match_state_mut(&mut self) -> &mut MatchState {
        &mut self.match_state
    }

    /// Whether the end of the match has already been reported
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the field is frozen waiting for [`GameLoop::kickoff`]
    pub fn goal_pending(&self) -> bool {
        self.goal_pending
    }

    /// Fresh match: zero score, full clock, kick-off layout
    pub fn start_match(&mut self) {
        self.match_state = MatchState::new(self.config.match_duration);
        self.field = FieldState::kickoff();
        self.goal_pending = false;
        self.finished = false;
    }

    /// Re-seed positions, states and cooldowns; score and clock are kept
    pub fn kickoff(&mut self) {
        self.field = FieldState::kickoff();
        self.goal_pending = false;
    }

    pub fn snapshot(&self, lifecycle: Lifecycle) -> GameSnapshot {
        GameSnapshot::capture(&self.field, &self.match_state, lifecycle)
    }

    /// Advance the match by `dt` seconds
    ///
    /// Does nothing once the match is finished or while a goal waits for
    /// its kick-off. The two players are processed in a fresh uniformly
    /// random order every tick, so neither side wins contested actions by
    /// construction.
    ///
    /// The tick stops where the match ends: once the clock runs out no
    /// player is processed.
    pub fn tick(&mut self, dt: f64, input: &InputState) -> TickEvents {
        let mut events = TickEvents::new();
        if self.finished || self.goal_pending {
            return events;
        }

        self.match_state.tick += 1;
        self.field.repossession_guard -= dt;
        self.match_state.remaining_time -= dt;

        if let Some(reason) = check_match_end(&self.match_state, self.config.winning_score) {
            self.finish(reason, &mut events);
            return events;
        }

        let mut order = PlayerSide::BOTH;
        order.shuffle(&mut self.rng);

        for side in order {
            if self.update_player(side, dt, input, &mut events) {
                self.score_goal(side, &mut events);
                return events;
            }
        }

        wander::update(
            &mut self.field.ball,
            dt,
            self.config.speeds.ball,
            self.config.aspect_ratio,
            &mut self.rng,
        );

        debug_assert!(self.field.possession_consistent());
        events
    }

    /// Cooldowns, charge, mode, movement and interactions of one player
    ///
    /// Returns true when the player scored.
    fn update_player(
        &mut self,
        side: PlayerSide,
        dt: f64,
        input: &InputState,
        events: &mut TickEvents,
    ) -> bool {
        let aspect_ratio = self.config.aspect_ratio;
        let controls = input.read(side);
        let player = self.field.player_mut(side);

        player.charge_cooldown -= dt;
        player.stun_cooldown -= dt;

        if behavior::charge_ready(&controls, player) {
            input.clear_action(side);
            behavior::start_charge(player);
            debug!(?side, "charge started");
            events.push(GameLoopEvent::ChargeStarted { side });
        }

        let transition = behavior::transition(player, &controls.movement, &self.config.speeds);
        player.behavior.mode = transition.mode;

        // Only a player that moves this tick can hit, pick up or score
        let (Some(speed), Some(direction)) = (transition.speed, controls.movement.direction) else {
            return false;
        };
        let velocity = kinematics::velocity(direction, controls.movement.magnitude * speed);
        player.pose.position = kinematics::integrate(player.pose.position, velocity, dt, aspect_ratio);
        player.pose.angle = direction;

        if possession::try_dispossess(&mut self.field, side, aspect_ratio) {
            debug!(attacker = ?side, "ball knocked loose");
            events.push(GameLoopEvent::Dispossessed {
                attacker: side,
                victim: side.opponent(),
            });
        }

        if !self.field.ball.behavior.holding {
            if possession::try_pickup(&mut self.field, side, aspect_ratio) {
                debug!(?side, "ball picked up");
                events.push(GameLoopEvent::BallPickedUp { side });
            }
            false
        } else {
            possession::in_goal(&self.field, side)
        }
    }

    fn score_goal(&mut self, scorer: PlayerSide, events: &mut TickEvents) {
        self.match_state.score[scorer.index()] += 1;
        self.goal_pending = true;

        let [one, two] = self.match_state.score;
        info!(?scorer, score = ?(one, two), "goal");
        events.push(GameLoopEvent::GoalScored {
            scorer,
            score: (one, two),
        });

        if check_match_end(&self.match_state, self.config.winning_score)
            == Some(MatchEndReason::ScoreLimit)
        {
            self.finish(MatchEndReason::ScoreLimit, events);
        }
    }

    fn finish(&mut self, reason: MatchEndReason, events: &mut TickEvents) {
        self.finished = true;
        let result = determine_result(&self.match_state, reason);
        info!(?reason, score = ?result.score, winner = ?result.winner, "match ended");
        events.push(GameLoopEvent::MatchEnded { result });
    }
}
