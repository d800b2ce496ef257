//! Configuration validation.
//!
//! The timer engine is deliberately permissive about degenerate values
//! (zero-length phases, zero cycle count); this is where such values are
//! stopped before they reach it.

use crate::error::{Severity, ValidationIssue};
use crate::timer::{ConfigPatch, PomodoroConfig};

use super::schema::AppConfig;

/// Validates a full service configuration.
///
/// Returns every issue found; the caller decides whether warnings are
/// fatal.
#[must_use]
pub fn validate(config: &AppConfig) -> Vec<ValidationIssue> {
    let mut issues = validate_timer(&config.timer);
    if config.server.bind.parse::<std::net::SocketAddr>().is_err() {
        issues.push(ValidationIssue {
            path: "server.bind".to_string(),
            message: format!("'{}' is not a valid socket address", config.server.bind),
            severity: Severity::Error,
        });
    }
    issues
}

/// Validates a timer configuration: every field must be at least 1.
#[must_use]
pub fn validate_timer(timer: &PomodoroConfig) -> Vec<ValidationIssue> {
    let fields = [
        ("timer.focus_minutes", timer.focus_minutes),
        ("timer.short_break_minutes", timer.short_break_minutes),
        ("timer.long_break_minutes", timer.long_break_minutes),
        (
            "timer.cycles_before_long_break",
            timer.cycles_before_long_break,
        ),
    ];
    fields
        .into_iter()
        .filter(|&(_, value)| value == 0)
        .map(|(path, _)| ValidationIssue {
            path: path.to_string(),
            message: "must be at least 1".to_string(),
            severity: Severity::Error,
        })
        .collect()
}

/// Validates a partial timer override: every provided field must be at
/// least 1.
#[must_use]
pub fn validate_patch(patch: &ConfigPatch) -> Vec<ValidationIssue> {
    let fields = [
        ("focus_minutes", patch.focus_minutes),
        ("short_break_minutes", patch.short_break_minutes),
        ("long_break_minutes", patch.long_break_minutes),
        ("cycles_before_long_break", patch.cycles_before_long_break),
    ];
    fields
        .into_iter()
        .filter(|&(_, value)| value == Some(0))
        .map(|(path, _)| ValidationIssue {
            path: path.to_string(),
            message: "must be at least 1".to_string(),
            severity: Severity::Error,
        })
        .collect()
}
