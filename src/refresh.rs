//! Periodic index refresh.
//!
//! One background loop reindexes on a fixed interval, independent of
//! query traffic, and stops cleanly on the shutdown signal. On-demand
//! triggers go straight through [`Engine::reindex`]; the engine's gate
//! keeps the two from ever rebuilding concurrently.

use crate::engine::{Engine, RebuildOutcome};
use crate::log;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

/// Run the refresh loop until `shutdown` fires.
///
/// The configured interval is read from `[refresh] interval_minutes`;
/// zero or less disables the loop entirely. A rebuild in flight when
/// shutdown arrives is discarded before its publish step, never
/// half-published.
pub async fn run_scheduler(engine: Arc<Engine>, mut shutdown: watch::Receiver<bool>) {
    let minutes = engine.config().refresh.interval_minutes;
    if minutes <= 0 {
        log!("refresh"; "auto refresh disabled");
        return;
    }

    let mut ticker = time::interval(Duration::from_secs(minutes as u64 * 60));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; the caller already ran the
    // initial rebuild.
    ticker.tick().await;

    log!("refresh"; "refreshing every {minutes} minutes");

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                log!("refresh"; "stopping");
                return;
            }
            _ = ticker.tick() => {
                match engine.reindex().await {
                    Ok(RebuildOutcome::Completed { posts }) => {
                        log!("refresh"; "reindexed, {posts} posts published");
                    }
                    Ok(RebuildOutcome::AlreadyRunning) => {
                        log!("refresh"; "rebuild already in flight, tick coalesced");
                    }
                    // Keep serving the previous snapshot and retry on
                    // the next tick.
                    Err(err) => log!("error"; "refresh failed: {err}"),
                }
            }
        }
    }
}
