//! Flat-file store for habit and reminder lists.
//!
//! Each list lives in its own text file, one record per line in the codec's
//! format. A missing file loads as an empty list; an unreadable line fails
//! the whole load with its line number.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::codec::{self, HabitRecord, ReminderRecord};
use super::data_dir;
use crate::clock::Clock;
use crate::datetime::DateTimeArg;
use crate::error::{Result, StoreError};
use crate::habit::HabitList;
use crate::reminder::{Reminder, ReminderList};
use crate::schedule::Schedule;

pub struct Store {
    habits_path: PathBuf,
    reminders_path: PathBuf,
}

impl Store {
    /// A store over the default data directory.
    pub fn open() -> Result<Self> {
        let dir = data_dir()?;
        Ok(Self::with_paths(
            dir.join("habits.txt"),
            dir.join("reminders.txt"),
        ))
    }

    pub fn with_paths(habits_path: PathBuf, reminders_path: PathBuf) -> Self {
        Self {
            habits_path,
            reminders_path,
        }
    }

    pub fn load_habits(&self, clock: Arc<dyn Clock>) -> Result<HabitList> {
        let mut list = HabitList::new(clock);
        for (line_no, line) in read_records(&self.habits_path)? {
            let record: HabitRecord =
                codec::parse_habit(&line).ok_or_else(|| StoreError::ParseFailed {
                    path: self.habits_path.clone(),
                    line: line_no,
                    record: line.clone(),
                })?;
            list.restore(record.name, record.deadline, record.every_min, record.streak)?;
        }
        debug!(count = list.len(), path = %self.habits_path.display(), "habits loaded");
        Ok(list)
    }

    pub fn save_habits(&self, list: &HabitList) -> Result<()> {
        let lines: Vec<String> = list
            .iter()
            .map(|habit| codec::encode_habit(&HabitRecord::from(habit)))
            .collect();
        write_records(&self.habits_path, &lines)?;
        debug!(count = lines.len(), path = %self.habits_path.display(), "habits saved");
        Ok(())
    }

    pub fn load_reminders(&self) -> Result<ReminderList> {
        let mut list = ReminderList::new();
        for (line_no, line) in read_records(&self.reminders_path)? {
            let record: ReminderRecord =
                codec::parse_reminder(&line).ok_or_else(|| StoreError::ParseFailed {
                    path: self.reminders_path.clone(),
                    line: line_no,
                    record: line.clone(),
                })?;
            let when = DateTimeArg::from(record.trigger);
            let schedule = match record.every_min {
                Some(every_min) => Schedule::recurring(when, every_min)?,
                None => Schedule::one_time(when)?,
            };
            let mut reminder = Reminder::new(record.name, schedule);
            reminder.set_active(record.active);
            list.push(reminder)?;
        }
        debug!(count = list.len(), path = %self.reminders_path.display(), "reminders loaded");
        Ok(list)
    }

    pub fn save_reminders(&self, list: &ReminderList) -> Result<()> {
        let lines: Vec<String> = list
            .iter()
            .map(|reminder| codec::encode_reminder(&ReminderRecord::from(reminder)))
            .collect();
        write_records(&self.reminders_path, &lines)?;
        debug!(count = lines.len(), path = %self.reminders_path.display(), "reminders saved");
        Ok(())
    }
}

fn read_records(path: &Path) -> Result<Vec<(usize, String)>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::LoadFailed {
                path: path.to_path_buf(),
                source,
            }
            .into())
        }
    };
    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect())
}

fn write_records(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::SaveFailed {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|source| {
        StoreError::SaveFailed {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}
