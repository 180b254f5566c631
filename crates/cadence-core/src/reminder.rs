//! Named reminders over one-time and recurring schedules.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::datetime::DateTimeArg;
use crate::error::{Error, Result};
use crate::schedule::Schedule;
use crate::LIST_CAPACITY;

/// An immutable name coupled to exactly one owned [`Schedule`].
///
/// Every temporal decision is delegated to the schedule; the reminder itself
/// holds no state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    name: String,
    schedule: Schedule,
}

impl Reminder {
    pub(crate) fn new(name: String, schedule: Schedule) -> Self {
        Self { name, schedule }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.schedule.is_due(now)
    }

    pub fn is_active(&self) -> bool {
        self.schedule.is_active()
    }

    pub fn is_recurring(&self) -> bool {
        self.schedule.is_recurring()
    }

    pub fn fire(&mut self, now: NaiveDateTime) {
        self.schedule.fire(now);
    }

    pub fn snooze(&mut self, by: Duration) -> Result<()> {
        self.schedule.snooze(by)
    }

    pub fn set_active(&mut self, active: bool) {
        self.schedule.set_active(active);
    }

    /// Replaces the schedule wholesale. The replacement starts un-fired, so
    /// this re-arms a fired one-time reminder.
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
    }
}

/// Ordered, bounded collection of reminders. Reminders are constructed only
/// through the list.
#[derive(Debug, Default)]
pub struct ReminderList {
    reminders: Vec<Reminder>,
}

impl ReminderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a one-time reminder and appends it.
    pub fn add_one_time(&mut self, name: impl Into<String>, when: DateTimeArg) -> Result<()> {
        self.check_capacity()?;
        let reminder = Reminder::new(name.into(), Schedule::one_time(when)?);
        self.reminders.push(reminder);
        Ok(())
    }

    /// Creates a recurring reminder and appends it.
    pub fn add_recurring(
        &mut self,
        name: impl Into<String>,
        when: DateTimeArg,
        every_min: u64,
    ) -> Result<()> {
        self.check_capacity()?;
        let reminder = Reminder::new(name.into(), Schedule::recurring(when, every_min)?);
        self.reminders.push(reminder);
        Ok(())
    }

    /// Appends an already-reconstructed reminder (storage reload path).
    pub(crate) fn push(&mut self, reminder: Reminder) -> Result<()> {
        self.check_capacity()?;
        self.reminders.push(reminder);
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<Reminder> {
        self.check_index(index)?;
        Ok(self.reminders.remove(index))
    }

    /// Removes several entries at once. All indices are validated before the
    /// first removal; removal then proceeds from the highest index down so
    /// earlier removals cannot shift later ones.
    pub fn delete_many(&mut self, indices: &[usize]) -> Result<Vec<Reminder>> {
        for &index in indices {
            self.check_index(index)?;
        }
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_unstable();
        order.dedup();

        let mut removed = Vec::with_capacity(order.len());
        for &index in order.iter().rev() {
            removed.push(self.reminders.remove(index));
        }
        Ok(removed)
    }

    pub fn snooze(&mut self, index: usize, by: Duration) -> Result<()> {
        self.check_index(index)?;
        self.reminders[index].snooze(by)
    }

    pub fn set_active(&mut self, index: usize, active: bool) -> Result<()> {
        self.check_index(index)?;
        self.reminders[index].set_active(active);
        Ok(())
    }

    pub fn set_schedule(&mut self, index: usize, schedule: Schedule) -> Result<()> {
        self.check_index(index)?;
        self.reminders[index].set_schedule(schedule);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Reminder> {
        self.reminders.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Reminder> {
        self.reminders.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter()
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    fn check_capacity(&self) -> Result<()> {
        if self.reminders.len() >= LIST_CAPACITY {
            return Err(Error::CapacityExceeded {
                list: "reminder list",
                max: LIST_CAPACITY,
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.reminders.len() {
            return Err(Error::InvalidIndex {
                list: "reminder list",
                index,
                len: self.reminders.len(),
            });
        }
        Ok(())
    }
}
