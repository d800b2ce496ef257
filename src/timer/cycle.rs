//! Pomodoro cycle state machine.
//!
//! [`PomodoroCycle`] owns the full observable timer state: configuration,
//! current phase, remaining countdown, completed-focus counter, and
//! running/paused flags. It is pure in-process mutable state with no
//! locking of its own; the hosting layer serializes access (see
//! [`crate::server::AppState`]).

use serde::{Deserialize, Serialize};

/// One of the four mutually exclusive states of the focus/break cycle.
///
/// Serializes to the lowercase wire tags `idle`, `focus`, `short_break`,
/// `long_break`. `Idle` is only ever entered by an explicit reset, never
/// by automatic transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Not started, or explicitly reset.
    #[default]
    Idle,
    /// The work interval; completing one increments the cycle counter.
    Focus,
    /// The regular rest interval between focus phases.
    ShortBreak,
    /// The longer rest interval after every Nth completed focus phase.
    LongBreak,
}

impl Phase {
    /// Returns the lowercase wire tag for this phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Focus => "focus",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable timer configuration, in minutes.
///
/// The engine itself does not validate these values; zero durations
/// produce instant phases and `cycles_before_long_break == 0` means the
/// long break is never reached. Hosting layers reject zeros before the
/// values get here (see [`crate::config::validation`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PomodoroConfig {
    /// Length of a focus phase.
    pub focus_minutes: u64,
    /// Length of a short break.
    pub short_break_minutes: u64,
    /// Length of a long break.
    pub long_break_minutes: u64,
    /// Number of completed focus phases between long breaks.
    pub cycles_before_long_break: u64,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 20,
            cycles_before_long_break: 4,
        }
    }
}

impl PomodoroConfig {
    /// Focus phase length in seconds.
    #[must_use]
    pub const fn focus_seconds(&self) -> u64 {
        self.focus_minutes * 60
    }

    /// Short break length in seconds.
    #[must_use]
    pub const fn short_break_seconds(&self) -> u64 {
        self.short_break_minutes * 60
    }

    /// Long break length in seconds.
    #[must_use]
    pub const fn long_break_seconds(&self) -> u64 {
        self.long_break_minutes * 60
    }
}

/// Partial configuration override.
///
/// Every field is optional; [`ConfigPatch::apply`] overlays the provided
/// fields on an existing configuration, so an omitted field keeps the
/// engine's current value rather than falling back to crate defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigPatch {
    /// Override for [`PomodoroConfig::focus_minutes`].
    pub focus_minutes: Option<u64>,
    /// Override for [`PomodoroConfig::short_break_minutes`].
    pub short_break_minutes: Option<u64>,
    /// Override for [`PomodoroConfig::long_break_minutes`].
    pub long_break_minutes: Option<u64>,
    /// Override for [`PomodoroConfig::cycles_before_long_break`].
    pub cycles_before_long_break: Option<u64>,
}

impl ConfigPatch {
    /// Overlays this patch on `base`, keeping `base` values for omitted
    /// fields.
    #[must_use]
    pub fn apply(&self, base: PomodoroConfig) -> PomodoroConfig {
        PomodoroConfig {
            focus_minutes: self.focus_minutes.unwrap_or(base.focus_minutes),
            short_break_minutes: self.short_break_minutes.unwrap_or(base.short_break_minutes),
            long_break_minutes: self.long_break_minutes.unwrap_or(base.long_break_minutes),
            cycles_before_long_break: self
                .cycles_before_long_break
                .unwrap_or(base.cycles_before_long_break),
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.focus_minutes.is_none()
            && self.short_break_minutes.is_none()
            && self.long_break_minutes.is_none()
            && self.cycles_before_long_break.is_none()
    }
}

/// Immutable point-in-time read of the engine's full observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Seconds left in the current phase.
    pub remaining: u64,
    /// Number of focus phases completed since the last reset.
    pub cycle_count: u64,
    /// Whether the timer has been started and not reset.
    pub running: bool,
    /// Whether ticking is suspended. Only meaningful while running.
    pub paused: bool,
    /// The configuration in effect.
    pub config: PomodoroConfig,
}

/// The Pomodoro cycle state machine.
///
/// Driven by explicit commands (`start`, `pause`, `resume`, `reset`,
/// `next_phase`) and by time advancement (`tick`), which an external
/// clock driver invokes periodically (see [`crate::timer::driver`]).
/// Every operation is total: no command ever fails, whatever the state.
#[derive(Debug)]
pub struct PomodoroCycle {
    config: PomodoroConfig,
    phase: Phase,
    remaining: u64,
    cycle_count: u64,
    running: bool,
    paused: bool,
}

impl Default for PomodoroCycle {
    fn default() -> Self {
        Self::new(PomodoroConfig::default())
    }
}

impl PomodoroCycle {
    /// Creates an idle engine with the given configuration.
    #[must_use]
    pub const fn new(config: PomodoroConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            remaining: 0,
            cycle_count: 0,
            running: false,
            paused: false,
        }
    }

    /// Discards all progress and returns to the idle state, optionally
    /// installing a new configuration first.
    pub const fn reset(&mut self, config: Option<PomodoroConfig>) {
        if let Some(config) = config {
            self.config = config;
        }
        self.phase = Phase::Idle;
        self.remaining = 0;
        self.cycle_count = 0;
        self.running = false;
        self.paused = false;
    }

    /// Starts the timer.
    ///
    /// From idle this enters the focus phase with a full countdown. From
    /// any other phase it resumes counting from the current remaining
    /// value without resetting it. Always clears the paused flag.
    pub const fn start(&mut self) {
        if matches!(self.phase, Phase::Idle) {
            self.phase = Phase::Focus;
            self.remaining = self.config.focus_seconds();
        }
        self.running = true;
        self.paused = false;
    }

    /// Suspends ticking. No-op unless running.
    pub const fn pause(&mut self) {
        if self.running {
            self.paused = true;
        }
    }

    /// Resumes ticking. No-op unless running and paused.
    pub const fn resume(&mut self) {
        if self.running && self.paused {
            self.paused = false;
        }
    }

    /// Forces a transition to the next phase, ignoring the remaining
    /// countdown.
    ///
    /// Completing a focus phase increments the cycle counter; every
    /// `cycles_before_long_break`th completion leads into a long break,
    /// any other into a short break. Breaks (and idle) lead into focus.
    /// Running/paused flags are left untouched, and entering focus from
    /// idle does not count as a completion.
    pub const fn next_phase(&mut self) {
        match self.phase {
            Phase::Focus => {
                self.cycle_count += 1;
                if self.long_break_due() {
                    self.phase = Phase::LongBreak;
                    self.remaining = self.config.long_break_seconds();
                } else {
                    self.phase = Phase::ShortBreak;
                    self.remaining = self.config.short_break_seconds();
                }
            }
            Phase::ShortBreak | Phase::LongBreak | Phase::Idle => {
                self.phase = Phase::Focus;
                self.remaining = self.config.focus_seconds();
            }
        }
    }

    /// Advances the countdown by `elapsed` seconds.
    ///
    /// No-op unless running and not paused. When the countdown reaches
    /// zero the engine advances exactly once, as if [`Self::next_phase`]
    /// had been called; overshoot beyond the current phase is discarded
    /// rather than cascading into further transitions.
    pub const fn tick(&mut self, elapsed: u64) {
        if !self.running || self.paused {
            return;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining == 0 {
            self.next_phase();
        }
    }

    /// Returns an immutable snapshot of the observable state.
    #[must_use]
    pub const fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining: self.remaining,
            cycle_count: self.cycle_count,
            running: self.running,
            paused: self.paused,
            config: self.config,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current phase.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Completed focus phases since the last reset.
    #[must_use]
    pub const fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Whether the timer has been started and not reset.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether ticking is currently suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> PomodoroConfig {
        self.config
    }

    /// Whether the just-incremented cycle count lands on a long break.
    ///
    /// A zero divisor means the long break is never due; the modulo is
    /// guarded so a degenerate configuration cannot abort the process.
    const fn long_break_due(&self) -> bool {
        let n = self.config.cycles_before_long_break;
        n != 0 && self.cycle_count % n == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minute_config(cycles: u64) -> PomodoroConfig {
        PomodoroConfig {
            focus_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            cycles_before_long_break: cycles,
        }
    }

    #[test]
    fn new_engine_is_idle() {
        let cycle = PomodoroCycle::default();
        let snap = cycle.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining, 0);
        assert_eq!(snap.cycle_count, 0);
        assert!(!snap.running);
        assert!(!snap.paused);
    }

    #[test]
    fn default_config_values() {
        let config = PomodoroConfig::default();
        assert_eq!(config.focus_minutes, 25);
        assert_eq!(config.short_break_minutes, 5);
        assert_eq!(config.long_break_minutes, 20);
        assert_eq!(config.cycles_before_long_break, 4);
        assert_eq!(config.focus_seconds(), 1500);
        assert_eq!(config.short_break_seconds(), 300);
        assert_eq!(config.long_break_seconds(), 1200);
    }

    #[test]
    fn start_from_idle_enters_focus() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        assert_eq!(cycle.phase(), Phase::Focus);
        assert_eq!(cycle.remaining(), 1500);
        assert!(cycle.is_running());
        assert!(!cycle.is_paused());
    }

    #[test]
    fn start_again_keeps_remaining() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        cycle.tick(100);
        assert_eq!(cycle.remaining(), 1400);

        cycle.start();
        assert_eq!(cycle.phase(), Phase::Focus);
        assert_eq!(cycle.remaining(), 1400);
    }

    #[test]
    fn start_clears_pause() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        cycle.pause();
        assert!(cycle.is_paused());

        cycle.start();
        assert!(!cycle.is_paused());
        assert_eq!(cycle.remaining(), 1500);
    }

    #[test]
    fn pause_blocks_tick() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        cycle.pause();
        cycle.tick(999);
        assert_eq!(cycle.remaining(), 1500);
        assert_eq!(cycle.phase(), Phase::Focus);
    }

    #[test]
    fn pause_is_noop_when_not_running() {
        let mut cycle = PomodoroCycle::default();
        cycle.pause();
        assert!(!cycle.is_paused());
    }

    #[test]
    fn resume_reenables_tick() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        cycle.pause();
        cycle.resume();
        cycle.tick(30);
        assert_eq!(cycle.remaining(), 1470);
    }

    #[test]
    fn resume_is_noop_unless_paused() {
        let mut cycle = PomodoroCycle::default();
        cycle.resume();
        assert!(!cycle.is_paused());
        assert!(!cycle.is_running());

        cycle.start();
        cycle.resume();
        assert!(cycle.is_running());
        assert!(!cycle.is_paused());
    }

    #[test]
    fn tick_is_noop_when_not_running() {
        let mut cycle = PomodoroCycle::default();
        cycle.tick(60);
        assert_eq!(cycle.phase(), Phase::Idle);
        assert_eq!(cycle.remaining(), 0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        cycle.tick(60);
        cycle.next_phase();
        cycle.reset(None);

        let snap = cycle.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining, 0);
        assert_eq!(snap.cycle_count, 0);
        assert!(!snap.running);
        assert!(!snap.paused);
    }

    #[test]
    fn reset_installs_new_config() {
        let mut cycle = PomodoroCycle::default();
        cycle.reset(Some(minute_config(2)));
        cycle.start();
        assert_eq!(cycle.remaining(), 60);
        assert_eq!(cycle.config().cycles_before_long_break, 2);
    }

    #[test]
    fn next_phase_from_idle_enters_focus_without_counting() {
        let mut cycle = PomodoroCycle::default();
        cycle.next_phase();
        assert_eq!(cycle.phase(), Phase::Focus);
        assert_eq!(cycle.remaining(), 1500);
        assert_eq!(cycle.cycle_count(), 0);
        assert!(!cycle.is_running());
    }

    #[test]
    fn next_phase_preserves_flags() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        cycle.pause();
        cycle.next_phase();
        assert!(cycle.is_running());
        assert!(cycle.is_paused());
    }

    #[test]
    fn long_break_every_fourth_focus() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();

        let mut breaks = Vec::new();
        for _ in 0..4 {
            cycle.next_phase(); // leave focus
            breaks.push(cycle.phase());
            cycle.next_phase(); // back to focus
        }

        assert_eq!(
            breaks,
            [
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::LongBreak
            ]
        );
        assert_eq!(cycle.cycle_count(), 4);
    }

    #[test]
    fn eighth_focus_is_long_break_again() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        for completed in 1..=8 {
            cycle.next_phase();
            let expected = if completed % 4 == 0 {
                Phase::LongBreak
            } else {
                Phase::ShortBreak
            };
            assert_eq!(cycle.phase(), expected, "after {completed} completions");
            cycle.next_phase();
        }
    }

    #[test]
    fn tick_past_zero_advances_exactly_once() {
        let mut cycle = PomodoroCycle::new(minute_config(4));
        cycle.start();

        // Overshoot by far more than one whole phase: still a single
        // transition, remaining reloaded from the new phase's duration.
        cycle.tick(10_000);
        assert_eq!(cycle.phase(), Phase::ShortBreak);
        assert_eq!(cycle.remaining(), 60);
        assert_eq!(cycle.cycle_count(), 1);
    }

    #[test]
    fn tick_to_exactly_zero_advances() {
        let mut cycle = PomodoroCycle::new(minute_config(4));
        cycle.start();
        cycle.tick(60);
        assert_eq!(cycle.phase(), Phase::ShortBreak);
        assert_eq!(cycle.remaining(), 60);
    }

    #[test]
    fn tick_zero_on_fresh_phase_is_harmless() {
        let mut cycle = PomodoroCycle::new(minute_config(4));
        cycle.start();
        cycle.tick(0);
        assert_eq!(cycle.phase(), Phase::Focus);
        assert_eq!(cycle.remaining(), 60);
    }

    #[test]
    fn zero_cycles_before_long_break_never_goes_long() {
        let mut cycle = PomodoroCycle::new(minute_config(0));
        cycle.start();
        for _ in 0..6 {
            cycle.next_phase();
            assert_eq!(cycle.phase(), Phase::ShortBreak);
            cycle.next_phase();
        }
        assert_eq!(cycle.cycle_count(), 6);
    }

    #[test]
    fn snapshot_is_pure() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        cycle.tick(7);
        assert_eq!(cycle.snapshot(), cycle.snapshot());
    }

    #[test]
    fn end_to_end_two_cycle_scenario() {
        let mut cycle = PomodoroCycle::new(minute_config(2));
        cycle.start();

        cycle.tick(60);
        let snap = cycle.snapshot();
        assert_eq!(snap.phase, Phase::ShortBreak);
        assert_eq!(snap.remaining, 60);
        assert_eq!(snap.cycle_count, 1);

        cycle.tick(60);
        let snap = cycle.snapshot();
        assert_eq!(snap.phase, Phase::Focus);
        assert_eq!(snap.remaining, 60);
        assert_eq!(snap.cycle_count, 1);

        cycle.next_phase();
        let snap = cycle.snapshot();
        assert_eq!(snap.phase, Phase::LongBreak);
        assert_eq!(snap.remaining, 60);
        assert_eq!(snap.cycle_count, 2);
    }

    #[test]
    fn phase_serializes_to_lowercase_tags() {
        assert_eq!(
            serde_json::to_string(&Phase::ShortBreak).unwrap(),
            "\"short_break\""
        );
        assert_eq!(serde_json::to_string(&Phase::Idle).unwrap(), "\"idle\"");
        assert_eq!(
            serde_json::from_str::<Phase>("\"long_break\"").unwrap(),
            Phase::LongBreak
        );
    }

    #[test]
    fn phase_display_matches_tag() {
        assert_eq!(Phase::Focus.to_string(), "focus");
        assert_eq!(Phase::LongBreak.to_string(), "long_break");
    }

    #[test]
    fn patch_overlays_only_present_fields() {
        let base = PomodoroConfig::default();
        let patch = ConfigPatch {
            focus_minutes: Some(50),
            cycles_before_long_break: Some(2),
            ..ConfigPatch::default()
        };
        let merged = patch.apply(base);
        assert_eq!(merged.focus_minutes, 50);
        assert_eq!(merged.short_break_minutes, 5);
        assert_eq!(merged.long_break_minutes, 20);
        assert_eq!(merged.cycles_before_long_break, 2);
    }

    #[test]
    fn empty_patch_is_identity() {
        let base = minute_config(3);
        let patch = ConfigPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(base), base);
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let result = serde_json::from_str::<ConfigPatch>("{\"focus\": 25}");
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut cycle = PomodoroCycle::default();
        cycle.start();
        let snap = cycle.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: TimerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    mod properties {
        use crate::timer::cycle::{Phase, PomodoroConfig, PomodoroCycle};
        use proptest::prelude::*;

        fn config_strategy() -> impl Strategy<Value = PomodoroConfig> {
            (1u64..=120, 1u64..=60, 1u64..=90, 1u64..=12).prop_map(
                |(focus, short, long, cycles)| PomodoroConfig {
                    focus_minutes: focus,
                    short_break_minutes: short,
                    long_break_minutes: long,
                    cycles_before_long_break: cycles,
                },
            )
        }

        proptest! {
            #[test]
            fn remaining_never_exceeds_longest_phase(
                config in config_strategy(),
                ticks in proptest::collection::vec(0u64..=10_000, 1..64),
            ) {
                let max_phase = config
                    .focus_seconds()
                    .max(config.short_break_seconds())
                    .max(config.long_break_seconds());
                let mut cycle = PomodoroCycle::new(config);
                cycle.start();
                for elapsed in ticks {
                    cycle.tick(elapsed);
                    prop_assert!(cycle.remaining() <= max_phase);
                    prop_assert_ne!(cycle.phase(), Phase::Idle);
                }
            }

            #[test]
            fn cycle_count_is_monotone_without_reset(
                config in config_strategy(),
                ticks in proptest::collection::vec(1u64..=5_000, 1..64),
            ) {
                let mut cycle = PomodoroCycle::new(config);
                cycle.start();
                let mut last = cycle.cycle_count();
                for elapsed in ticks {
                    cycle.tick(elapsed);
                    prop_assert!(cycle.cycle_count() >= last);
                    last = cycle.cycle_count();
                }
            }

            #[test]
            fn long_breaks_land_on_multiples(
                config in config_strategy(),
                completions in 1usize..=40,
            ) {
                let mut cycle = PomodoroCycle::new(config);
                cycle.start();
                for _ in 0..completions {
                    cycle.next_phase();
                    let expected_long =
                        cycle.cycle_count() % config.cycles_before_long_break == 0;
                    if expected_long {
                        prop_assert_eq!(cycle.phase(), Phase::LongBreak);
                    } else {
                        prop_assert_eq!(cycle.phase(), Phase::ShortBreak);
                    }
                    cycle.next_phase();
                }
            }
        }
    }
}
