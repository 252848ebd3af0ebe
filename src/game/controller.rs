//! Match lifecycle and the simulation task
//!
//! The [`MatchController`] is the handle the input collector and the
//! presentation layer share. Everything crossing task boundaries goes
//! through it:
//!
//! - input: [`InputState`], written by the collector, read every tick
//! - snapshot: a `watch` channel, one [`GameSnapshot`] published per tick
//! - lifecycle: a `watch` channel; requests are applied atomically when
//!   legal from the current state and ignored otherwise
//! - events: a `broadcast` channel of [`MatchEvent`]s (goals, match end)
//! - shutdown: a `watch` flag interrupting every wait of the simulation task
//!
//! The simulation task ([`SimulationDriver`]) idles until a match is
//! requested, freezes for the countdown, then ticks at a fixed interval.
//! Pausing parks the task without touching the match state; resuming
//! measures the next delta from the resume instant.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::game::game_loop::{GameLoop, GameLoopEvent, TickEvents};
use crate::game::input::InputState;
use crate::game::match_result::MatchResult;
use crate::game::state::{GameSnapshot, Lifecycle, PlayerSide};
use crate::metrics::Metrics;

/// Capacity of the event channel; slow subscribers lose the oldest events
const EVENT_CAPACITY: usize = 64;

/// Discrete notifications for the presentation/menu layer
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    /// A new match was seeded and the countdown began
    MatchStarted,
    LifecycleChanged { from: Lifecycle, to: Lifecycle },
    GoalScored { scorer: PlayerSide, score: (u32, u32) },
    /// Fired exactly once per finished match; show the game-over screen
    MatchEnded { result: MatchResult },
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("simulation task is already running")]
    AlreadyRunning,
    #[error("simulation task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

struct Shared {
    input: InputState,
    lifecycle: watch::Sender<Lifecycle>,
    /// Bumped on every accepted start so a stale match notices it was replaced
    generation: AtomicU64,
    snapshot: watch::Sender<GameSnapshot>,
    events: broadcast::Sender<MatchEvent>,
    shutdown: watch::Sender<bool>,
    driver_spawned: AtomicBool,
    metrics: Arc<Metrics>,
}

/// Shared handle on the match
#[derive(Clone)]
pub struct MatchController {
    shared: Arc<Shared>,
}

impl MatchController {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        let (lifecycle, _) = watch::channel(Lifecycle::NotPlaying);
        let (snapshot, _) = watch::channel(GameSnapshot::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (shutdown, _) = watch::channel(false);

        Self {
            shared: Arc::new(Shared {
                input: InputState::new(),
                lifecycle,
                generation: AtomicU64::new(0),
                snapshot,
                events,
                shutdown,
                driver_spawned: AtomicBool::new(false),
                metrics,
            }),
        }
    }

    /// Input state the collector writes to
    pub fn input(&self) -> &InputState {
        &self.shared.input
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.shared.metrics
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.shared.lifecycle.borrow()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<GameSnapshot> {
        self.shared.snapshot.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<MatchEvent> {
        self.shared.events.subscribe()
    }

    /// NotPlaying -> Playing
    pub fn request_start(&self) -> bool {
        let shared = &self.shared;
        self.transition(|current| {
            (current == Lifecycle::NotPlaying).then(|| {
                shared.generation.fetch_add(1, Ordering::AcqRel);
                Lifecycle::Playing
            })
        })
    }

    /// Playing -> Paused
    pub fn request_pause(&self) -> bool {
        self.transition(|current| (current == Lifecycle::Playing).then_some(Lifecycle::Paused))
    }

    /// Paused -> Playing
    pub fn request_resume(&self) -> bool {
        self.transition(|current| (current == Lifecycle::Paused).then_some(Lifecycle::Playing))
    }

    /// Playing <-> Paused, the pause key
    pub fn toggle_pause(&self) -> bool {
        self.transition(|current| match current {
            Lifecycle::Playing => Some(Lifecycle::Paused),
            Lifecycle::Paused => Some(Lifecycle::Playing),
            Lifecycle::NotPlaying => None,
        })
    }

    /// Playing/Paused -> NotPlaying without a game-over, back to the menu
    pub fn request_abandon(&self) -> bool {
        self.transition(|current| (current != Lifecycle::NotPlaying).then_some(Lifecycle::NotPlaying))
    }

    /// Stop the simulation task at its next wait or tick boundary
    pub fn request_quit(&self) {
        if !self.shared.shutdown.send_replace(true) {
            info!("Shutdown requested");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shared.shutdown.borrow()
    }

    /// Apply a lifecycle transition atomically; illegal requests are ignored
    fn transition(&self, next: impl FnOnce(Lifecycle) -> Option<Lifecycle>) -> bool {
        let mut change = None;
        self.shared.lifecycle.send_if_modified(|current| match next(*current) {
            Some(to) => {
                change = Some((*current, to));
                *current = to;
                true
            }
            None => false,
        });

        let Some((from, to)) = change else {
            debug!("Ignored lifecycle request");
            return false;
        };

        info!(?from, ?to, "Lifecycle changed");
        // Latest value, in case another request landed in between
        self.shared
            .snapshot
            .send_modify(|snapshot| snapshot.lifecycle = *self.shared.lifecycle.borrow());
        let _ = self.shared.events.send(MatchEvent::LifecycleChanged { from, to });
        true
    }

    /// Spawn the simulation task on the current tokio runtime
    pub fn spawn_simulation(&self, config: GameConfig) -> Result<JoinHandle<()>, ControllerError> {
        if self.shared.driver_spawned.swap(true, Ordering::AcqRel) {
            return Err(ControllerError::AlreadyRunning);
        }
        let driver = SimulationDriver::new(self.shared.clone(), config);
        Ok(tokio::spawn(driver.run()))
    }

    /// Request shutdown and wait for the simulation task to exit
    pub async fn shutdown(&self, handle: JoinHandle<()>) -> Result<(), ControllerError> {
        self.request_quit();
        handle.await?;
        Ok(())
    }
}

/// Resolves once shutdown was requested (or the flag's sender is gone)
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// How a match left the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchExit {
    Finished,
    Abandoned,
    Shutdown,
}

/// The simulation task: sole owner of the match state
pub struct SimulationDriver {
    shared: Arc<Shared>,
    game: GameLoop,
    lifecycle_rx: watch::Receiver<Lifecycle>,
    shutdown_rx: watch::Receiver<bool>,
    generation: u64,
    /// Applied to the first match after it is seeded
    #[cfg(test)]
    on_match_start: Option<fn(&mut GameLoop)>,
}

impl SimulationDriver {
    fn new(shared: Arc<Shared>, config: GameConfig) -> Self {
        let lifecycle_rx = shared.lifecycle.subscribe();
        let shutdown_rx = shared.shutdown.subscribe();
        Self {
            game: GameLoop::new(config),
            shared,
            lifecycle_rx,
            shutdown_rx,
            generation: 0,
            #[cfg(test)]
            on_match_start: None,
        }
    }

    pub async fn run(mut self) {
        info!(
            "Simulation task started ({} ms tick interval)",
            self.game.config().tick_interval.as_millis()
        );

        while self.wait_for_lifecycle(|lc| lc == Lifecycle::Playing).await {
            match self.play_match().await {
                MatchExit::Shutdown => break,
                exit => debug!(?exit, "Match over, waiting for the next one"),
            }
        }

        info!("Simulation task stopped");
    }

    fn lifecycle(&self) -> Lifecycle {
        *self.shared.lifecycle.borrow()
    }

    /// Lifecycle is read under the snapshot lock so a concurrent request
    /// cannot be overwritten with a stale value
    fn publish(&self) {
        self.shared.snapshot.send_modify(|snapshot| {
            *snapshot = self.game.snapshot(*self.shared.lifecycle.borrow());
        });
    }

    fn emit(&self, event: MatchEvent) {
        // No subscriber is fine, nobody blocks the simulation
        let _ = self.shared.events.send(event);
    }

    /// Wait until `accept` holds; false on shutdown
    async fn wait_for_lifecycle(&mut self, accept: impl Fn(Lifecycle) -> bool) -> bool {
        loop {
            let current = *self.lifecycle_rx.borrow_and_update();
            if accept(current) {
                return !*self.shutdown_rx.borrow();
            }
            tokio::select! {
                changed = self.lifecycle_rx.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                }
                _ = shutdown_requested(&mut self.shutdown_rx) => return false,
            }
        }
    }

    /// Frozen wait; false on shutdown
    async fn hold(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = shutdown_requested(&mut self.shutdown_rx) => false,
        }
    }

    /// The match was abandoned, or abandoned and restarted behind our back
    fn replaced(&self) -> bool {
        self.shared.generation.load(Ordering::Acquire) != self.generation
    }

    async fn play_match(&mut self) -> MatchExit {
        self.generation = self.shared.generation.load(Ordering::Acquire);
        self.game.start_match();
        #[cfg(test)]
        if let Some(setup) = self.on_match_start.take() {
            setup(&mut self.game);
        }
        self.shared.metrics.matches_started.fetch_add(1, Ordering::Relaxed);
        self.publish();
        self.emit(MatchEvent::MatchStarted);
        info!("Match started");

        let countdown = self.game.config().countdown;
        if !self.hold(countdown).await {
            return MatchExit::Shutdown;
        }

        let tick_interval = self.game.config().tick_interval;
        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_tick = Instant::now();

        loop {
            if *self.shutdown_rx.borrow() {
                return MatchExit::Shutdown;
            }
            if self.replaced() {
                info!("Match abandoned");
                return MatchExit::Abandoned;
            }

            match self.lifecycle() {
                Lifecycle::NotPlaying => {
                    info!("Match abandoned");
                    return MatchExit::Abandoned;
                }
                Lifecycle::Paused => {
                    if !self.wait_for_lifecycle(|lc| lc != Lifecycle::Paused).await {
                        return MatchExit::Shutdown;
                    }
                    // No catch-up of the paused time
                    last_tick = Instant::now();
                    ticker.reset();
                    continue;
                }
                Lifecycle::Playing => {}
            }

            let started = Instant::now();
            let dt = started.duration_since(last_tick).as_secs_f64();
            let events = self.game.tick(dt, &self.shared.input);

            let metrics = &self.shared.metrics;
            metrics.record_tick_time(started.elapsed());
            metrics.record_events(&events);
            metrics.record_remaining_time(self.game.match_state().remaining_time);
            self.publish();

            if let Some(exit) = self.handle_events(events).await {
                return exit;
            }

            last_tick = Instant::now();
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown_requested(&mut self.shutdown_rx) => return MatchExit::Shutdown,
            }
        }
    }

    /// Goal pauses and match end; `Some` when the match is over
    async fn handle_events(&mut self, events: TickEvents) -> Option<MatchExit> {
        let mut goal = false;
        let mut result = None;
        for event in events {
            match event {
                GameLoopEvent::GoalScored { scorer, score } => {
                    goal = true;
                    self.emit(MatchEvent::GoalScored { scorer, score });
                }
                GameLoopEvent::MatchEnded { result: r } => result = Some(r),
                _ => {}
            }
        }

        let goal_pause = self.game.config().goal_pause;
        if goal {
            // Celebrate on the frozen field, then re-seed it
            if !self.hold(goal_pause).await {
                return Some(MatchExit::Shutdown);
            }
            if self.replaced() || self.lifecycle() == Lifecycle::NotPlaying {
                info!("Match abandoned");
                return Some(MatchExit::Abandoned);
            }
            self.game.kickoff();
            self.publish();
        }

        if let Some(result) = result {
            return Some(self.end_match(result));
        }

        if goal && !self.hold(goal_pause).await {
            return Some(MatchExit::Shutdown);
        }
        None
    }

    /// Report the end of the match unless it was abandoned or replaced
    fn end_match(&mut self, result: MatchResult) -> MatchExit {
        let shared = &self.shared;
        let generation = self.generation;
        let mut from = None;
        shared.lifecycle.send_if_modified(|current| {
            if *current == Lifecycle::NotPlaying
                || shared.generation.load(Ordering::Acquire) != generation
            {
                return false;
            }
            from = Some(*current);
            *current = Lifecycle::NotPlaying;
            true
        });

        let Some(from) = from else {
            info!("Match abandoned before it ended");
            return MatchExit::Abandoned;
        };

        self.emit(MatchEvent::LifecycleChanged {
            from,
            to: Lifecycle::NotPlaying,
        });
        info!(score = ?result.score, winner = ?result.winner, "Game over");
        self.publish();
        self.emit(MatchEvent::MatchEnded { result });
        MatchExit::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::MoveVector;
    use crate::game::match_result::MatchEndReason;
    use crate::game::state::{Behavior, FieldState, Mode, Pose};
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::time::{sleep, timeout};

    fn controller() -> MatchController {
        MatchController::new(Arc::new(Metrics::new()))
    }

    fn fast_config() -> GameConfig {
        GameConfig {
            rng_seed: Some(17),
            ..GameConfig::default()
        }
    }

    async fn next_match_end(events: &mut broadcast::Receiver<MatchEvent>) -> MatchResult {
        loop {
            match events.recv().await {
                Ok(MatchEvent::MatchEnded { result }) => return result,
                Ok(_) => {}
                Err(e) => panic!("event channel failed: {e}"),
            }
        }
    }

    /// Player one carries the ball inside the scoring band
    fn holder_in_goal_band(game: &mut GameLoop) {
        let field = game.field_mut();
        field.players[0].pose = Pose::new(0.95, 0.0, 0.0);
        field.players[0].behavior = Behavior {
            mode: Mode::Walking,
            holding: true,
        };
        field.ball.behavior.holding = true;
    }

    fn goal_config(winning_score: u32) -> GameConfig {
        GameConfig {
            countdown: Duration::ZERO,
            goal_pause: Duration::from_secs(1),
            winning_score,
            ..fast_config()
        }
    }

    /// Driver whose first match opens with player one about to score
    fn spawn_scoring(controller: &MatchController, config: GameConfig) -> JoinHandle<()> {
        let mut driver = SimulationDriver::new(controller.shared.clone(), config);
        driver.on_match_start = Some(holder_in_goal_band);
        controller.input().set_movement(PlayerSide::One, MoveVector::toward(0.0));
        tokio::spawn(driver.run())
    }

    fn kickoff_poses() -> [Pose; 3] {
        let field = FieldState::kickoff();
        [field.players[0].pose, field.players[1].pose, field.ball.pose]
    }

    #[test]
    fn test_legal_transitions() {
        let controller = controller();
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);

        assert!(!controller.request_pause());
        assert!(!controller.request_resume());
        assert!(!controller.request_abandon());
        assert!(!controller.toggle_pause());
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);

        assert!(controller.request_start());
        assert!(!controller.request_start());
        assert_eq!(controller.lifecycle(), Lifecycle::Playing);

        assert!(controller.request_pause());
        assert!(!controller.request_pause());
        assert_eq!(controller.snapshot().lifecycle, Lifecycle::Paused);

        assert!(controller.request_resume());
        assert!(controller.toggle_pause());
        assert_eq!(controller.lifecycle(), Lifecycle::Paused);
        assert!(controller.toggle_pause());
        assert_eq!(controller.lifecycle(), Lifecycle::Playing);

        assert!(controller.request_abandon());
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);
    }

    #[test]
    fn test_transition_events() {
        let controller = controller();
        let mut events = controller.subscribe_events();

        controller.request_start();
        controller.request_resume(); // ignored

        assert_eq!(
            events.try_recv().unwrap(),
            MatchEvent::LifecycleChanged {
                from: Lifecycle::NotPlaying,
                to: Lifecycle::Playing,
            }
        );
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_twice_fails() {
        let controller = controller();
        let handle = controller.spawn_simulation(fast_config()).unwrap();
        assert!(matches!(
            controller.spawn_simulation(fast_config()),
            Err(ControllerError::AlreadyRunning)
        ));
        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_freezes_then_ticks() {
        let controller = controller();
        let handle = controller.spawn_simulation(fast_config()).unwrap();

        controller.request_start();
        sleep(Duration::from_millis(2900)).await;
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.lifecycle, Lifecycle::Playing);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.remaining_time, 180.0);

        sleep(Duration::from_millis(300)).await;
        let snapshot = controller.snapshot();
        assert!(snapshot.tick > 0);
        assert!(snapshot.remaining_time < 180.0);
        assert!(snapshot.remaining_time > 179.0);

        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_without_catch_up() {
        let controller = controller();
        let handle = controller.spawn_simulation(fast_config()).unwrap();

        controller.request_start();
        sleep(Duration::from_secs(4)).await;
        assert!(controller.request_pause());
        sleep(Duration::from_millis(50)).await;

        let frozen = controller.snapshot();
        sleep(Duration::from_secs(10)).await;
        let still = controller.snapshot();
        assert_eq!(still.tick, frozen.tick);
        assert_eq!(still.remaining_time, frozen.remaining_time);
        assert_eq!(still.lifecycle, Lifecycle::Paused);

        assert!(controller.request_resume());
        sleep(Duration::from_millis(500)).await;
        let resumed = controller.snapshot();
        assert!(resumed.tick > frozen.tick);
        let elapsed = frozen.remaining_time - resumed.remaining_time;
        assert!(elapsed < 1.0, "paused time leaked into the clock: {elapsed}");

        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_expiry_ends_match_once() {
        let controller = controller();
        let config = GameConfig {
            match_duration: 0.5,
            countdown: Duration::ZERO,
            ..fast_config()
        };
        let handle = controller.spawn_simulation(config).unwrap();
        let mut events = controller.subscribe_events();

        controller.request_start();
        let result = next_match_end(&mut events).await;
        assert_eq!(result.reason, MatchEndReason::TimeExpired);
        assert_eq!(result.remaining_time, 0.0);
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);
        assert_eq!(controller.snapshot().lifecycle, Lifecycle::NotPlaying);

        sleep(Duration::from_secs(2)).await;
        loop {
            match events.try_recv() {
                Ok(MatchEvent::MatchEnded { .. }) => panic!("match ended twice"),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        assert_eq!(
            controller
                .metrics()
                .matches_completed
                .load(Ordering::Relaxed),
            1
        );

        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandon_then_restart() {
        let controller = controller();
        let handle = controller.spawn_simulation(fast_config()).unwrap();
        let mut events = controller.subscribe_events();

        controller.request_start();
        sleep(Duration::from_secs(4)).await;
        assert!(controller.request_abandon());
        sleep(Duration::from_millis(100)).await;
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);

        let mut started = 0;
        while let Ok(event) = events.try_recv() {
            match event {
                MatchEvent::MatchStarted => started += 1,
                MatchEvent::MatchEnded { .. } => panic!("abandoning is not a game over"),
                _ => {}
            }
        }
        assert_eq!(started, 1);

        assert!(controller.request_start());
        sleep(Duration::from_millis(100)).await;
        loop {
            match events.recv().await.unwrap() {
                MatchEvent::MatchStarted => break,
                MatchEvent::LifecycleChanged { .. } => {}
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(controller.snapshot().score, (0, 0));
        assert_eq!(controller.snapshot().remaining_time, 180.0);

        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_countdown() {
        let controller = controller();
        let config = GameConfig {
            countdown: Duration::from_secs(3600),
            ..fast_config()
        };
        let handle = controller.spawn_simulation(config).unwrap();

        controller.request_start();
        sleep(Duration::from_millis(10)).await;
        controller.request_quit();

        timeout(Duration::from_secs(1), handle)
            .await
            .expect("countdown was not interrupted")
            .unwrap();
        assert!(controller.is_shutting_down());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_while_idle() {
        let controller = controller();
        let handle = controller.spawn_simulation(fast_config()).unwrap();
        sleep(Duration::from_millis(10)).await;

        timeout(Duration::from_secs(1), controller.shutdown(handle))
            .await
            .expect("idle wait was not interrupted")
            .unwrap();
    }

    #[test]
    fn test_publish_uses_latest_lifecycle() {
        let controller = controller();
        let driver = SimulationDriver::new(controller.shared.clone(), fast_config());

        controller.request_start();
        driver.publish();
        assert_eq!(controller.snapshot().lifecycle, Lifecycle::Playing);

        controller.request_pause();
        driver.publish();
        assert_eq!(controller.snapshot().lifecycle, Lifecycle::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_goal_pause_then_kickoff_then_resume() {
        let controller = controller();
        let handle = spawn_scoring(&controller, goal_config(3));
        let mut events = controller.subscribe_events();

        controller.request_start();
        sleep(Duration::from_millis(500)).await;
        let celebrating = controller.snapshot();
        assert_eq!(celebrating.score, (1, 0));
        assert_eq!(celebrating.tick, 1);
        assert_eq!(celebrating.ball_holder, Some(PlayerSide::One));
        assert_eq!(celebrating.poses[0].position.x, 0.95);

        sleep(Duration::from_secs(1)).await;
        let reseeded = controller.snapshot();
        assert_eq!(reseeded.score, (1, 0));
        assert_eq!(reseeded.tick, 1);
        assert_eq!(reseeded.poses, kickoff_poses());
        assert_eq!(reseeded.ball_holder, None);
        assert_eq!(reseeded.lifecycle, Lifecycle::Playing);

        sleep(Duration::from_secs(1)).await;
        let resumed = controller.snapshot();
        assert!(resumed.tick > 1);
        assert_eq!(resumed.score, (1, 0));

        let mut goals = 0;
        while let Ok(event) = events.try_recv() {
            match event {
                MatchEvent::GoalScored { scorer, score } => {
                    assert_eq!(scorer, PlayerSide::One);
                    assert_eq!(score, (1, 0));
                    goals += 1;
                }
                MatchEvent::MatchEnded { .. } => panic!("one goal of three ended the match"),
                _ => {}
            }
        }
        assert_eq!(goals, 1);

        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_winning_goal_ends_match_once() {
        let controller = controller();
        let handle = spawn_scoring(&controller, goal_config(1));
        let mut events = controller.subscribe_events();

        controller.request_start();
        let result = next_match_end(&mut events).await;
        assert_eq!(result.score, (1, 0));
        assert_eq!(result.winner, Some(PlayerSide::One));
        assert_eq!(result.reason, MatchEndReason::ScoreLimit);
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.lifecycle, Lifecycle::NotPlaying);
        assert_eq!(snapshot.poses, kickoff_poses());

        sleep(Duration::from_secs(3)).await;
        while let Ok(event) = events.try_recv() {
            assert!(
                !matches!(event, MatchEvent::MatchEnded { .. }),
                "match ended twice"
            );
        }
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);

        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_final_goal_pause() {
        let controller = controller();
        let handle = spawn_scoring(&controller, goal_config(1));
        let mut events = controller.subscribe_events();

        controller.request_start();
        sleep(Duration::from_millis(500)).await;
        controller.input().reset();
        assert!(controller.request_abandon());
        assert!(controller.request_start());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(controller.lifecycle(), Lifecycle::Playing);

        let mut started = 0;
        while let Ok(event) = events.try_recv() {
            match event {
                MatchEvent::MatchStarted => started += 1,
                MatchEvent::MatchEnded { .. } => panic!("abandoned match reported an end"),
                _ => {}
            }
        }
        assert_eq!(started, 2);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.lifecycle, Lifecycle::Playing);
        assert_eq!(snapshot.score, (0, 0));
        assert!(snapshot.tick > 0);

        controller.shutdown(handle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_during_final_goal_pause() {
        let controller = controller();
        let handle = spawn_scoring(&controller, goal_config(1));
        let mut events = controller.subscribe_events();

        controller.request_start();
        sleep(Duration::from_millis(500)).await;
        assert!(controller.request_pause());

        let mut seen = Vec::new();
        loop {
            let event = events.recv().await.unwrap();
            let done = matches!(event, MatchEvent::MatchEnded { .. });
            seen.push(event);
            if done {
                break;
            }
        }
        assert!(seen.contains(&MatchEvent::LifecycleChanged {
            from: Lifecycle::Paused,
            to: Lifecycle::NotPlaying,
        }));
        assert_eq!(controller.lifecycle(), Lifecycle::NotPlaying);

        controller.shutdown(handle).await.unwrap();
    }
}
