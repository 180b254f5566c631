//! Line-oriented record format for habits and reminders.
//!
//! One record per line, fields joined by `" | "`. The free-form name is
//! always the last field, so a name may itself contain the delimiter.
//! Date-times use the canonical [`DateTimeArg`] string form.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::datetime::DateTimeArg;
use crate::habit::Habit;
use crate::reminder::Reminder;

const DELIM: &str = " | ";

/// Serialized fields of a habit, independent of the line layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub name: String,
    pub deadline: NaiveDateTime,
    pub every_min: u64,
    pub streak: u32,
}

impl From<&Habit> for HabitRecord {
    fn from(habit: &Habit) -> Self {
        Self {
            name: habit.name().to_string(),
            deadline: habit.deadline(),
            every_min: habit.every_min(),
            streak: habit.streak(),
        }
    }
}

/// Serialized fields of a reminder. `every_min` is present only for the
/// recurring kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub name: String,
    pub active: bool,
    pub trigger: NaiveDateTime,
    pub every_min: Option<u64>,
}

impl From<&Reminder> for ReminderRecord {
    fn from(reminder: &Reminder) -> Self {
        Self {
            name: reminder.name().to_string(),
            active: reminder.is_active(),
            trigger: reminder.schedule().trigger(),
            every_min: reminder.schedule().every_min(),
        }
    }
}

fn encode_when(value: NaiveDateTime) -> String {
    DateTimeArg::from(value).to_string()
}

fn parse_when(segment: &str) -> Option<NaiveDateTime> {
    segment.parse::<DateTimeArg>().ok()?.resolve()
}

fn encode_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn parse_flag(segment: &str) -> Option<bool> {
    match segment {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

pub fn encode_habit(record: &HabitRecord) -> String {
    format!(
        "H{DELIM}{}{DELIM}{}{DELIM}{}{DELIM}{}",
        encode_when(record.deadline),
        record.every_min,
        record.streak,
        record.name,
    )
}

pub fn parse_habit(line: &str) -> Option<HabitRecord> {
    let mut fields = line.splitn(5, DELIM);
    if fields.next()? != "H" {
        return None;
    }
    let deadline = parse_when(fields.next()?)?;
    let every_min = fields.next()?.parse().ok()?;
    let streak = fields.next()?.parse().ok()?;
    let name = fields.next()?.to_string();
    Some(HabitRecord {
        name,
        deadline,
        every_min,
        streak,
    })
}

pub fn encode_reminder(record: &ReminderRecord) -> String {
    match record.every_min {
        Some(every_min) => format!(
            "R{DELIM}{}{DELIM}{}{DELIM}{every_min}{DELIM}{}",
            encode_flag(record.active),
            encode_when(record.trigger),
            record.name,
        ),
        None => format!(
            "O{DELIM}{}{DELIM}{}{DELIM}{}",
            encode_flag(record.active),
            encode_when(record.trigger),
            record.name,
        ),
    }
}

pub fn parse_reminder(line: &str) -> Option<ReminderRecord> {
    let kind = line.split(DELIM).next()?;
    match kind {
        "O" => {
            let mut fields = line.splitn(4, DELIM);
            fields.next();
            let active = parse_flag(fields.next()?)?;
            let trigger = parse_when(fields.next()?)?;
            let name = fields.next()?.to_string();
            Some(ReminderRecord {
                name,
                active,
                trigger,
                every_min: None,
            })
        }
        "R" => {
            let mut fields = line.splitn(5, DELIM);
            fields.next();
            let active = parse_flag(fields.next()?)?;
            let trigger = parse_when(fields.next()?)?;
            let every_min = fields.next()?.parse().ok()?;
            let name = fields.next()?.to_string();
            Some(ReminderRecord {
                name,
                active,
                trigger,
                every_min: Some(every_min),
            })
        }
        _ => None,
    }
}
