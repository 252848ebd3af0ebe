use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use raptor_rush::config::GameConfig;
use raptor_rush::game::controller::{MatchController, MatchEvent};
use raptor_rush::metrics::Metrics;

/// How often the headless runner reports the match
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Raptor Rush v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = GameConfig::load_or_default();
    config.validate()?;
    info!(
        "Configuration loaded: ratio={:.3}, tick={}ms, duration={}s, winning_score={}",
        config.aspect_ratio,
        config.tick_interval.as_millis(),
        config.match_duration,
        config.winning_score
    );

    let metrics = Arc::new(Metrics::new());
    let controller = MatchController::new(metrics.clone());
    let simulation = controller.spawn_simulation(config)?;

    let mut events = controller.subscribe_events();
    let mut snapshots = controller.subscribe_snapshots();
    let mut report = tokio::time::interval(REPORT_INTERVAL);

    controller.request_start();

    // Shutdown signal handler
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
            event = events.recv() => match event {
                Ok(MatchEvent::GoalScored { scorer, score }) => {
                    info!("Goal for {:?}, score {}-{}", scorer, score.0, score.1);
                }
                Ok(MatchEvent::MatchEnded { result }) => {
                    info!(
                        "Game over: {}-{} ({:?}), winner {:?}",
                        result.score.0, result.score.1, result.reason, result.winner
                    );
                    break;
                }
                Ok(event) => debug!(?event, "Match event"),
                Err(RecvError::Lagged(missed)) => warn!("Missed {} match events", missed),
                Err(RecvError::Closed) => break,
            },
            _ = report.tick() => {
                let snapshot = snapshots.borrow_and_update().clone();
                info!(
                    "tick={} score={}-{} remaining={:.1}s holder={:?}",
                    snapshot.tick,
                    snapshot.score.0,
                    snapshot.score.1,
                    snapshot.remaining_time.max(0.0),
                    snapshot.ball_holder
                );
                match serde_json::to_string(&snapshot) {
                    Ok(json) => debug!("snapshot {}", json),
                    Err(e) => warn!("Failed to encode snapshot: {}", e),
                }
            }
        }
    }

    info!("Shutting down...");
    controller.shutdown(simulation).await?;
    debug!("Final metrics:\n{}", metrics.to_prometheus());
    info!("Simulation stopped");

    Ok(())
}
