//! Habit streaks with a deadline grace window.
//!
//! A habit tracks how many consecutive cycles it has been completed on time.
//! A completion attempt is judged against the current deadline plus a grace
//! window of a quarter interval and one minute; the three possible outcomes
//! are the whole state machine.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::LIST_CAPACITY;

/// Outcome of a streak attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakOutcome {
    /// The attempt came before the deadline's minute; nothing changed.
    TooEarly,
    /// The attempt landed in the deadline-to-grace-end window; the streak
    /// grew and the deadline advanced.
    OnTime,
    /// The attempt came after the grace window; the streak reset to 1 and
    /// the deadline advanced.
    TooLate,
}

/// A recurring commitment with a deadline and a streak counter.
pub struct Habit {
    name: String,
    deadline: NaiveDateTime,
    every_min: u64,
    streak: u32,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Habit")
            .field("name", &self.name)
            .field("deadline", &self.deadline)
            .field("every_min", &self.every_min)
            .field("streak", &self.streak)
            .finish()
    }
}

impl Habit {
    /// A fresh habit: first deadline one interval from now, streak 1.
    pub(crate) fn new(name: String, every_min: u64, clock: Arc<dyn Clock>) -> Result<Self> {
        if every_min == 0 {
            return Err(Error::InvalidInterval);
        }
        let deadline = clock.now() + Duration::minutes(every_min as i64);
        Ok(Self {
            name,
            deadline,
            every_min,
            streak: 1,
            clock,
        })
    }

    /// Reconstructs a habit from stored fields.
    pub(crate) fn restore(
        name: String,
        deadline: NaiveDateTime,
        every_min: u64,
        streak: u32,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if every_min == 0 {
            return Err(Error::InvalidInterval);
        }
        Ok(Self {
            name,
            deadline,
            every_min,
            streak: streak.max(1),
            clock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deadline(&self) -> NaiveDateTime {
        self.deadline
    }

    pub fn every_min(&self) -> u64 {
        self.every_min
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    fn every(&self) -> Duration {
        Duration::minutes(self.every_min as i64)
    }

    /// End of the grace window: a quarter interval plus one minute past the
    /// deadline.
    fn grace_end(&self) -> NaiveDateTime {
        self.deadline + self.every() / 4 + Duration::minutes(1)
    }

    /// Judges a completion attempt at the clock's current instant.
    ///
    /// An attempt in the same clock minute as the deadline counts as on
    /// time; an attempt exactly at the grace end still counts as on time.
    /// On both on-time and too-late attempts the next deadline is anchored
    /// at now, not at the old deadline.
    pub fn inc_streak(&mut self) -> StreakOutcome {
        let now = self.clock.now();

        let deadline_minute = self
            .deadline
            .with_second(0)
            .and_then(|d| d.with_nanosecond(0))
            .unwrap_or(self.deadline);
        if now < deadline_minute {
            return StreakOutcome::TooEarly;
        }

        if now > self.grace_end() {
            self.streak = 1;
            self.deadline = now + self.every();
            return StreakOutcome::TooLate;
        }

        self.streak += 1;
        self.deadline = now + self.every();
        StreakOutcome::OnTime
    }
}

/// Ordered, bounded collection of habits. Habits are constructed only
/// through the list.
pub struct HabitList {
    habits: Vec<Habit>,
    clock: Arc<dyn Clock>,
}

impl HabitList {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            habits: Vec::new(),
            clock,
        }
    }

    /// Creates a fresh habit and appends it.
    pub fn add(&mut self, name: impl Into<String>, every_min: u64) -> Result<()> {
        self.check_capacity()?;
        let habit = Habit::new(name.into(), every_min, Arc::clone(&self.clock))?;
        self.habits.push(habit);
        Ok(())
    }

    /// Reconstructs a stored habit and appends it.
    pub(crate) fn restore(
        &mut self,
        name: impl Into<String>,
        deadline: NaiveDateTime,
        every_min: u64,
        streak: u32,
    ) -> Result<()> {
        self.check_capacity()?;
        let habit = Habit::restore(
            name.into(),
            deadline,
            every_min,
            streak,
            Arc::clone(&self.clock),
        )?;
        self.habits.push(habit);
        Ok(())
    }

    /// Runs the streak state machine for the habit at `index` and returns
    /// its outcome unchanged.
    pub fn inc_streak(&mut self, index: usize) -> Result<StreakOutcome> {
        self.check_index(index)?;
        Ok(self.habits[index].inc_streak())
    }

    pub fn delete(&mut self, index: usize) -> Result<Habit> {
        self.check_index(index)?;
        Ok(self.habits.remove(index))
    }

    /// Removes several entries at once. All indices are validated before the
    /// first removal; removal then proceeds from the highest index down so
    /// earlier removals cannot shift later ones.
    pub fn delete_many(&mut self, indices: &[usize]) -> Result<Vec<Habit>> {
        for &index in indices {
            self.check_index(index)?;
        }
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_unstable();
        order.dedup();

        let mut removed = Vec::with_capacity(order.len());
        for &index in order.iter().rev() {
            removed.push(self.habits.remove(index));
        }
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> Option<&Habit> {
        self.habits.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    fn check_capacity(&self) -> Result<()> {
        if self.habits.len() >= LIST_CAPACITY {
            return Err(Error::CapacityExceeded {
                list: "habit list",
                max: LIST_CAPACITY,
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.habits.len() {
            return Err(Error::InvalidIndex {
                list: "habit list",
                index,
                len: self.habits.len(),
            });
        }
        Ok(())
    }
}
