//! Server runtime: shared state, router assembly, and serving.
//!
//! The engine is one explicitly owned instance injected into the
//! handlers through [`AppState`], never a process-wide global. The state
//! holds it behind a `std::sync::Mutex`: every engine operation is
//! synchronous and O(1), and the lock is never held across an await
//! point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{PomodError, ServerError};
use crate::handlers::{self, tasks, timer};
use crate::tasks::{MemoryStore, TaskStore};
use crate::timer::{PomodoroConfig, PomodoroCycle, TimerSnapshot, spawn_tick_driver};

/// Capacity of the snapshot broadcast channel. Slow SSE subscribers lag
/// and skip snapshots rather than applying backpressure to the driver.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The single Pomodoro engine instance.
    pub engine: Arc<Mutex<PomodoroCycle>>,
    /// Task storage.
    pub store: Arc<dyn TaskStore>,
    snapshots: broadcast::Sender<TimerSnapshot>,
}

impl AppState {
    /// Creates fresh state with an idle engine and an empty store.
    #[must_use]
    pub fn new(timer: PomodoroConfig) -> Self {
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(PomodoroCycle::new(timer))),
            store: Arc::new(MemoryStore::new()),
            snapshots,
        }
    }

    /// Locks the engine for a synchronous operation.
    ///
    /// # Panics
    ///
    /// Panics if the engine mutex is poisoned.
    #[must_use]
    pub fn engine(&self) -> MutexGuard<'_, PomodoroCycle> {
        self.engine.lock().expect("engine lock poisoned")
    }

    /// Publishes a snapshot to watchers. Lossy when nobody subscribes.
    pub fn publish(&self, snapshot: &TimerSnapshot) {
        let _ = self.snapshots.send(snapshot.clone());
    }

    /// Subscribes to the snapshot stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TimerSnapshot> {
        self.snapshots.subscribe()
    }

    /// Clones the snapshot sender for the tick driver.
    #[must_use]
    pub fn snapshot_sender(&self) -> broadcast::Sender<TimerSnapshot> {
        self.snapshots.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("watchers", &self.snapshots.receiver_count())
            .finish_non_exhaustive()
    }
}

/// Builds the application router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/timer/start", post(timer::start))
        .route("/timer/pause", post(timer::pause))
        .route("/timer/resume", post(timer::resume))
        .route("/timer/reset", post(timer::reset))
        .route("/timer/next", post(timer::next))
        .route("/timer/state", get(timer::timer_state))
        .route("/timer/watch", get(timer::watch))
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/extract", post(tasks::extract))
        .route(
            "/tasks/{id}",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
        .with_state(state)
}

/// Options for [`serve`].
#[derive(Debug)]
pub struct ServeOptions {
    /// Loaded service configuration.
    pub config: Arc<AppConfig>,
    /// CLI override for the bind address.
    pub bind_override: Option<String>,
    /// Token for cooperative shutdown.
    pub cancel: CancellationToken,
}

/// Runs the HTTP server until the cancellation token fires.
///
/// Binds the listener, spawns the tick driver, and serves the router
/// with graceful shutdown. The driver is stopped when serving ends.
///
/// # Errors
///
/// Returns a [`ServerError`] if the bind address is invalid or cannot
/// be bound, and [`PomodError::Io`] if serving fails.
pub async fn serve(opts: ServeOptions) -> Result<(), PomodError> {
    let bind = opts
        .bind_override
        .unwrap_or_else(|| opts.config.server.bind.clone());
    let addr: SocketAddr = bind.parse().map_err(|e: std::net::AddrParseError| {
        ServerError::InvalidBindAddr {
            addr: bind.clone(),
            message: e.to_string(),
        }
    })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindFailed {
            addr: bind.clone(),
            message: e.to_string(),
        })?;
    let bound_addr = listener.local_addr().map_err(PomodError::Io)?;

    let state = AppState::new(opts.config.timer);
    let driver = spawn_tick_driver(
        Arc::clone(&state.engine),
        state.snapshot_sender(),
        opts.cancel.clone(),
    );

    let router = build_router(state);
    info!(%bound_addr, "HTTP server listening");

    let shutdown = opts.cancel.clone();
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    // Serving ended (signal or listener error): stop the driver too.
    opts.cancel.cancel();
    let _ = driver.await;
    debug!("HTTP server shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Phase;

    #[test]
    fn fresh_state_has_idle_engine() {
        let state = AppState::new(PomodoroConfig::default());
        assert_eq!(state.engine().phase(), Phase::Idle);
    }

    #[test]
    fn publish_reaches_subscribers() {
        let state = AppState::new(PomodoroConfig::default());
        let mut rx = state.subscribe();
        let snapshot = state.engine().snapshot();
        state.publish(&snapshot);
        assert_eq!(rx.try_recv().unwrap(), snapshot);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let state = AppState::new(PomodoroConfig::default());
        let snapshot = state.engine().snapshot();
        state.publish(&snapshot);
    }

    #[tokio::test]
    async fn serve_rejects_invalid_bind_addr() {
        let result = serve(ServeOptions {
            config: Arc::new(AppConfig::default()),
            bind_override: Some("not-an-address".to_string()),
            cancel: CancellationToken::new(),
        })
        .await;
        assert!(matches!(
            result,
            Err(PomodError::Server(ServerError::InvalidBindAddr { .. }))
        ));
    }

    #[tokio::test]
    async fn serve_stops_on_cancellation() {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(serve(ServeOptions {
            config: Arc::new(AppConfig::default()),
            bind_override: Some("127.0.0.1:0".to_string()),
            cancel: cancel.clone(),
        }));

        // Give the server a moment to bind, then cancel.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        cancel.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server should shut down after cancellation")
            .unwrap();
        assert!(result.is_ok());
    }
}
