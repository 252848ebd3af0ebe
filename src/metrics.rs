//! Simulation counters
//!
//! Lock-free counters updated by the simulation task and readable from any
//! thread, rendered in Prometheus text format for whoever wants to expose
//! them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::game::game_loop::GameLoopEvent;

/// Rolling window used for the tick time percentile
const TICK_HISTORY: usize = 1000;

/// Metrics registry for the simulation
#[derive(Debug)]
pub struct Metrics {
    // Tick timing (microseconds)
    pub tick_count: AtomicU64,
    pub tick_time_us: AtomicU64,
    pub tick_time_p95_us: AtomicU64,
    pub tick_time_max_us: AtomicU64,

    // Match events
    pub charges: AtomicU64,
    pub dispossessions: AtomicU64,
    pub pickups: AtomicU64,
    pub goals: AtomicU64,
    pub matches_started: AtomicU64,
    pub matches_completed: AtomicU64,

    // Match clock, whole seconds left
    pub remaining_time_seconds: AtomicU64,

    start_time: Instant,
    tick_history: RwLock<VecDeque<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            tick_time_us: AtomicU64::new(0),
            tick_time_p95_us: AtomicU64::new(0),
            tick_time_max_us: AtomicU64::new(0),
            charges: AtomicU64::new(0),
            dispossessions: AtomicU64::new(0),
            pickups: AtomicU64::new(0),
            goals: AtomicU64::new(0),
            matches_started: AtomicU64::new(0),
            matches_completed: AtomicU64::new(0),
            remaining_time_seconds: AtomicU64::new(0),
            start_time: Instant::now(),
            tick_history: RwLock::new(VecDeque::with_capacity(TICK_HISTORY)),
        }
    }

    /// Record how long one simulation tick took
    pub fn record_tick_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us.store(us, Ordering::Relaxed);
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.tick_time_max_us.fetch_max(us, Ordering::Relaxed);

        let mut history = self.tick_history.write();
        history.push_back(us);
        while history.len() > TICK_HISTORY {
            history.pop_front();
        }

        if history.len() >= 10 {
            let mut sorted: Vec<u64> = history.iter().copied().collect();
            sorted.sort_unstable();
            let p95_idx = (sorted.len() as f32 * 0.95) as usize;
            self.tick_time_p95_us
                .store(sorted[p95_idx.min(sorted.len() - 1)], Ordering::Relaxed);
        }
    }

    /// Count the events of one tick
    pub fn record_events(&self, events: &[GameLoopEvent]) {
        for event in events {
            let counter = match event {
                GameLoopEvent::ChargeStarted { .. } => &self.charges,
                GameLoopEvent::Dispossessed { .. } => &self.dispossessions,
                GameLoopEvent::BallPickedUp { .. } => &self.pickups,
                GameLoopEvent::GoalScored { .. } => &self.goals,
                GameLoopEvent::MatchEnded { .. } => &self.matches_completed,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_remaining_time(&self, seconds: f64) {
        self.remaining_time_seconds
            .store(seconds.max(0.0).ceil() as u64, Ordering::Relaxed);
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let mut output = String::with_capacity(2048);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!("raptor_rush_tick_count", "Total ticks processed", "counter",
            self.tick_count.load(Ordering::Relaxed));
        metric!("raptor_rush_tick_time_microseconds", "Last tick time in microseconds", "gauge",
            self.tick_time_us.load(Ordering::Relaxed));
        metric!("raptor_rush_tick_time_p95_microseconds", "95th percentile tick time", "gauge",
            self.tick_time_p95_us.load(Ordering::Relaxed));
        metric!("raptor_rush_tick_time_max_microseconds", "Maximum tick time", "gauge",
            self.tick_time_max_us.load(Ordering::Relaxed));

        metric!("raptor_rush_charges_total", "Charges started", "counter",
            self.charges.load(Ordering::Relaxed));
        metric!("raptor_rush_dispossessions_total", "Balls knocked loose by a charge", "counter",
            self.dispossessions.load(Ordering::Relaxed));
        metric!("raptor_rush_pickups_total", "Balls picked up", "counter",
            self.pickups.load(Ordering::Relaxed));
        metric!("raptor_rush_goals_total", "Goals scored", "counter",
            self.goals.load(Ordering::Relaxed));
        metric!("raptor_rush_matches_started_total", "Matches started", "counter",
            self.matches_started.load(Ordering::Relaxed));
        metric!("raptor_rush_matches_completed_total", "Matches played to the end", "counter",
            self.matches_completed.load(Ordering::Relaxed));

        metric!("raptor_rush_remaining_time_seconds", "Seconds left in the current match", "gauge",
            self.remaining_time_seconds.load(Ordering::Relaxed));
        metric!("raptor_rush_uptime_seconds", "Uptime in seconds", "counter",
            self.uptime_seconds());

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
