//! External clock driver for the Pomodoro engine.
//!
//! The engine never advances on its own; a background task invokes
//! [`PomodoroCycle::tick`] once per second and broadcasts the resulting
//! snapshot to any watchers (the SSE endpoint, see
//! [`crate::handlers::timer`]). The task stops when its cancellation
//! token fires.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::cycle::{PomodoroCycle, TimerSnapshot};
use crate::observability::metrics;

/// Interval between ticks.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Spawns the 1 Hz tick task driving the shared engine.
///
/// Each tick advances the engine by one second while it is running and
/// unpaused, then broadcasts the snapshot so watchers see the countdown
/// move. Phase changes are logged and recorded as metrics. Send errors
/// are ignored: no subscribers simply means nobody is watching.
pub fn spawn_tick_driver(
    engine: Arc<Mutex<PomodoroCycle>>,
    snapshots: broadcast::Sender<TimerSnapshot>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_PERIOD);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("tick driver cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Some(snapshot) = advance(&engine) {
                        let _ = snapshots.send(snapshot);
                    }
                }
            }
        }
    })
}

/// Ticks the engine once and returns the snapshot when it is running.
///
/// The lock is held only for the synchronous mutation, never across an
/// await point.
///
/// # Panics
///
/// Panics if the engine mutex is poisoned.
fn advance(engine: &Arc<Mutex<PomodoroCycle>>) -> Option<TimerSnapshot> {
    let mut cycle = engine.lock().expect("engine lock poisoned");
    if !cycle.is_running() {
        return None;
    }

    let before = cycle.phase();
    cycle.tick(1);
    let snapshot = cycle.snapshot();
    drop(cycle);

    if snapshot.phase != before {
        info!(
            from = %before,
            to = %snapshot.phase,
            cycle_count = snapshot.cycle_count,
            "phase transition"
        );
        metrics::record_phase_transition(before, snapshot.phase);
        metrics::set_current_phase(snapshot.phase, Some(before));
    }

    Some(snapshot)
}
