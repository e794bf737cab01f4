//! Background poll loop: fetch status, apply to the dashboard, broadcast changes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use pagedash_core::dashboard::Cycle;
use pagedash_core::model::StatusSnapshot;
use pagedash_core::source::{FetchError, SnapshotSource};

use crate::state::{Changes, SharedState};

// ============================================================
// Poll loop
// ============================================================

/// Runs until the task is dropped.
///
/// The next tick is awaited only after the previous fetch resolved and was
/// applied, so one fetch is in flight at a time and snapshots are applied in
/// the order they were fetched.
pub(crate) async fn poll_loop<S>(
    state: SharedState,
    tx: broadcast::Sender<Changes>,
    source: S,
    interval: Duration,
) where
    S: SnapshotSource + Clone + Send + 'static,
{
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut snapshot_count: u64 = 0;

    loop {
        tick.tick().await;

        // Blocking HTTP fetch off the async runtime, without holding the lock.
        let mut fetcher = source.clone();
        let t0 = Instant::now();
        let result = match tokio::task::spawn_blocking(move || fetcher.fetch()).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "fetch panicked in spawn_blocking");
                Err(FetchError::Transport(e.to_string()))
            }
        };
        let elapsed = t0.elapsed();

        let (cycle, changes) = apply(&state, result);

        match cycle {
            Cycle::Applied { snapshot_id } => {
                snapshot_count += 1;
                if snapshot_count == 1 {
                    info!(
                        duration_ms = elapsed.as_millis() as u64,
                        snapshot_id,
                        "first snapshot received"
                    );
                } else {
                    debug!(
                        duration_ms = elapsed.as_millis() as u64,
                        snapshot_id,
                        snapshot_count,
                        changed = changes.len(),
                        "poll completed"
                    );
                }
            }
            Cycle::Offline => {
                debug!(duration_ms = elapsed.as_millis() as u64, "poll failed");
            }
        }

        if elapsed > interval / 2 {
            warn!(
                duration_ms = elapsed.as_millis() as u64,
                interval_ms = interval.as_millis() as u64,
                "poll exceeded 50% of interval"
            );
        }

        if !changes.is_empty() {
            // No receivers is fine: nobody has the page open.
            let _ = tx.send(changes);
        }
    }
}

/// Apply one fetch result under the state lock and collect the changed regions.
pub(crate) fn apply(
    state: &SharedState,
    result: Result<StatusSnapshot, FetchError>,
) -> (Cycle, Changes) {
    let mut inner = state.lock().unwrap();
    let cycle = inner.dashboard.apply(result);
    if matches!(cycle, Cycle::Applied { .. }) {
        inner.last_success = Some(Utc::now());
    }
    let changes = Arc::new(inner.dashboard.take_changes());
    (cycle, changes)
}
