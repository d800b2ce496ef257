//! Pomodoro timer: the cycle state machine and its clock driver.

pub mod cycle;
pub mod driver;

pub use cycle::{ConfigPatch, Phase, PomodoroConfig, PomodoroCycle, TimerSnapshot};
pub use driver::spawn_tick_driver;
