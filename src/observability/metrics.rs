//! Metrics collection.
//!
//! Prometheus-compatible metrics with typed convenience functions for
//! recording measurements. All label values come from closed enums or
//! fixed route names, so no cardinality protection is needed.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::PomodError;
use crate::timer::Phase;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without
/// an HTTP endpoint.
///
/// # Errors
///
/// Returns `PomodError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), PomodError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| PomodError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "pomod_timer_commands_total",
        "Timer commands handled, by command"
    );
    describe_counter!(
        "pomod_phase_transitions_total",
        "Pomodoro phase transitions, by from/to phase"
    );
    describe_gauge!("pomod_current_phase", "Currently active phase (1 = active)");
    describe_counter!("pomod_task_ops_total", "Task store operations, by op");
    describe_counter!("pomod_requests_total", "HTTP requests handled, by route");
}

/// Records a handled timer command (`start`, `pause`, …).
pub fn record_timer_command(command: &'static str) {
    counter!("pomod_timer_commands_total", "command" => command).increment(1);
}

/// Records a phase transition.
pub fn record_phase_transition(from: Phase, to: Phase) {
    counter!(
        "pomod_phase_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str(),
    )
    .increment(1);
}

/// Sets the currently active phase gauge.
///
/// Zeros out the previous phase label (if any) before setting the new
/// one, preventing stale labels from showing `1.0` in Prometheus.
pub fn set_current_phase(phase: Phase, previous: Option<Phase>) {
    if let Some(prev) = previous {
        gauge!("pomod_current_phase", "phase" => prev.as_str()).set(0.0);
    }
    gauge!("pomod_current_phase", "phase" => phase.as_str()).set(1.0);
}

/// Records a task store operation (`create`, `list`, …).
pub fn record_task_op(op: &'static str) {
    counter!("pomod_task_ops_total", "op" => op).increment(1);
}

/// Records a handled HTTP request by route name.
pub fn record_request(route: &'static str) {
    counter!("pomod_requests_total", "route" => route).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        // metrics macros silently no-op when no global recorder is installed
        record_timer_command("start");
        record_phase_transition(Phase::Focus, Phase::ShortBreak);
        set_current_phase(Phase::ShortBreak, Some(Phase::Focus));
        record_task_op("create");
        record_request("/timer/state");
    }
}
