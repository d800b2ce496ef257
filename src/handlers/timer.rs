//! Timer command endpoints.
//!
//! Each command locks the shared engine, applies one engine operation,
//! and responds with the full snapshot. Mutating commands also push the
//! snapshot to watchers so SSE clients see command effects immediately
//! rather than on the next driver tick.

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::info;

use crate::config::validation::validate_patch;
use crate::observability::metrics;
use crate::server::AppState;
use crate::timer::{ConfigPatch, TimerSnapshot};

use super::ApiError;

/// `POST /timer/start`
///
/// Accepts an optional partial configuration; provided fields override
/// the engine's current configuration, then the engine is reset and
/// started. Zero values are rejected before they reach the engine.
pub async fn start(
    State(state): State<AppState>,
    payload: Option<Json<ConfigPatch>>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let patch = payload.map_or_else(ConfigPatch::default, |Json(patch)| patch);
    let issues = validate_patch(&patch);
    if !issues.is_empty() {
        return Err(ApiError::Validation(issues));
    }

    let snapshot = {
        let mut engine = state.engine();
        let config = patch.apply(engine.config());
        engine.reset(Some(config));
        engine.start();
        engine.snapshot()
    };

    info!(
        focus_minutes = snapshot.config.focus_minutes,
        cycles_before_long_break = snapshot.config.cycles_before_long_break,
        "timer started"
    );
    metrics::record_timer_command("start");
    state.publish(&snapshot);
    Ok(Json(snapshot))
}

/// `POST /timer/pause`
pub async fn pause(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let snapshot = {
        let mut engine = state.engine();
        engine.pause();
        engine.snapshot()
    };
    metrics::record_timer_command("pause");
    state.publish(&snapshot);
    Json(snapshot)
}

/// `POST /timer/resume`
pub async fn resume(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let snapshot = {
        let mut engine = state.engine();
        engine.resume();
        engine.snapshot()
    };
    metrics::record_timer_command("resume");
    state.publish(&snapshot);
    Json(snapshot)
}

/// `POST /timer/reset`
pub async fn reset(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let snapshot = {
        let mut engine = state.engine();
        engine.reset(None);
        engine.snapshot()
    };
    metrics::record_timer_command("reset");
    state.publish(&snapshot);
    Json(snapshot)
}

/// `POST /timer/next`
pub async fn next(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let (before, snapshot) = {
        let mut engine = state.engine();
        let before = engine.phase();
        engine.next_phase();
        (before, engine.snapshot())
    };
    metrics::record_timer_command("next");
    metrics::record_phase_transition(before, snapshot.phase);
    metrics::set_current_phase(snapshot.phase, Some(before));
    state.publish(&snapshot);
    Json(snapshot)
}

/// `GET /timer/state`
pub async fn timer_state(State(state): State<AppState>) -> Json<TimerSnapshot> {
    metrics::record_request("/timer/state");
    Json(state.engine().snapshot())
}

/// `GET /timer/watch`
///
/// Server-sent event stream of snapshots: one event per driver tick
/// while the timer runs, plus one per command.
pub async fn watch(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    metrics::record_request("/timer/watch");
    let stream = BroadcastStream::new(state.subscribe()).filter_map(|received| {
        received
            .ok()
            .and_then(|snapshot| {
                SseEvent::default()
                    .event("snapshot")
                    .json_data(&snapshot)
                    .ok()
            })
            .map(Ok::<_, Infallible>)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
