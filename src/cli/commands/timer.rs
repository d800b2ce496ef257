//! `timer` commands: local and remote timer drivers.
//!
//! `timer run` owns an in-process engine and ticks it once per second;
//! `timer watch` polls a running server's `/timer/state` endpoint. Both
//! render the same one-line snapshot view.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cli::args::{TimerRunArgs, TimerWatchArgs};
use crate::error::PomodError;
use crate::timer::{Phase, PomodoroConfig, PomodoroCycle, TimerSnapshot};

/// Renders a snapshot as a single status line.
#[must_use]
pub fn format_snapshot(snapshot: &TimerSnapshot) -> String {
    let emoji = match snapshot.phase {
        Phase::Focus => "\u{1f534}",      // red circle
        Phase::ShortBreak => "\u{1f7e2}", // green circle
        Phase::LongBreak => "\u{1f4a4}",  // zzz
        Phase::Idle => "\u{26aa}",        // white circle
    };
    let mins = snapshot.remaining / 60;
    let secs = snapshot.remaining % 60;
    format!(
        "{emoji} {} {mins:02}:{secs:02} (cycle {})",
        snapshot.phase, snapshot.cycle_count
    )
}

/// Run a local timer, printing one status line per second.
///
/// Stops on cancellation (Ctrl+C). Never fails: the flags are already
/// range-checked by clap.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the command signature
/// uniform with the other handlers.
pub async fn run(args: &TimerRunArgs, cancel: CancellationToken) -> Result<(), PomodError> {
    let config = PomodoroConfig {
        focus_minutes: args.focus,
        short_break_minutes: args.short,
        long_break_minutes: args.long,
        cycles_before_long_break: args.cycles,
    };

    let mut cycle = PomodoroCycle::new(config);
    cycle.start();
    println!("{}", format_snapshot(&cycle.snapshot()));

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.tick().await; // the first tick completes immediately

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                cycle.tick(1);
                println!("{}", format_snapshot(&cycle.snapshot()));
            }
        }
    }

    println!(
        "stopped after {} completed focus {}",
        cycle.cycle_count(),
        if cycle.cycle_count() == 1 { "phase" } else { "phases" }
    );
    Ok(())
}

/// Poll a running server and render its timer state.
///
/// The first request must succeed so misconfigured URLs fail fast;
/// later errors are logged and polling continues.
///
/// # Errors
///
/// Returns the underlying request error if the server cannot be
/// reached on the first poll.
pub async fn watch(args: &TimerWatchArgs, cancel: CancellationToken) -> Result<(), PomodError> {
    let client = reqwest::Client::new();
    let url = format!("{}/timer/state", args.url.trim_end_matches('/'));

    let snapshot = fetch_state(&client, &url).await?;
    println!("{}", format_snapshot(&snapshot));

    let mut interval = tokio::time::interval(args.interval);
    interval.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match fetch_state(&client, &url).await {
                    Ok(snapshot) => println!("{}", format_snapshot(&snapshot)),
                    Err(e) => warn!(error = %e, "failed to fetch timer state"),
                }
            }
        }
    }
    Ok(())
}

async fn fetch_state(client: &reqwest::Client, url: &str) -> Result<TimerSnapshot, PomodError> {
    let snapshot = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<TimerSnapshot>()
        .await?;
    Ok(snapshot)
}
