//! # Cadence Core Library
//!
//! This library provides the scheduling core for the Cadence productivity
//! console tool. It is CLI-first: all operations are available through the
//! standalone `cadence-cli` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Schedules**: one-time and recurring reminder schedules. Due-detection
//!   is separated from firing so a whole list can be judged before any
//!   schedule is mutated
//! - **Habit Streak Engine**: a three-outcome state machine evaluating a
//!   completion attempt against a deadline plus grace window
//! - **Scheduler**: a synchronous `tick()` that the caller can drive
//!   directly, plus an optional tokio background loop over the same tick
//! - **Storage**: flat-file records for habits and reminders, and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`Schedule`]: one-time / recurring temporal contract
//! - [`Habit`] and [`HabitList`]: streak tracking
//! - [`Reminder`] and [`ReminderList`]: named reminders
//! - [`Scheduler`]: periodic due-reminder collection
//! - [`Clock`]: substitutable source of "now" for deterministic tests

pub mod clock;
pub mod datetime;
pub mod error;
pub mod habit;
pub mod reminder;
pub mod schedule;
pub mod scheduler;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use datetime::DateTimeArg;
pub use error::{Error, Result, StoreError};
pub use habit::{Habit, HabitList, StreakOutcome};
pub use reminder::{Reminder, ReminderList};
pub use schedule::Schedule;
pub use scheduler::{NotificationSink, Scheduler};
pub use storage::{Config, Store};

/// Hard cap on entries per list container.
pub const LIST_CAPACITY: usize = 10_000;
