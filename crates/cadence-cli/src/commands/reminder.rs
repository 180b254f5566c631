use chrono::Duration;
use clap::Subcommand;
use serde::Serialize;

use cadence_core::{Config, Reminder};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Add a one-time reminder
    Add {
        name: String,
        /// Trigger instant, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        at: String,
    },
    /// Add a recurring reminder
    Rec {
        name: String,
        /// First trigger instant, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        at: String,
        /// Repeat interval in minutes
        #[arg(long)]
        every: u64,
    },
    /// Push a one-time reminder forward by minutes (1-based index)
    Snooze {
        index: usize,
        #[arg(long)]
        by: u64,
    },
    /// Enable the reminder at INDEX (1-based)
    On { index: usize },
    /// Disable the reminder at INDEX (1-based)
    Off { index: usize },
    /// Delete reminders by 1-based index
    Delete { indices: Vec<usize> },
    /// List reminders
    List,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ReminderEvent {
    ReminderAdded {
        name: String,
        at: String,
        recurring: bool,
    },
    ReminderSnoozed {
        name: String,
        at: String,
    },
    ReminderToggled {
        name: String,
        active: bool,
    },
    RemindersDeleted {
        names: Vec<String>,
    },
}

#[derive(Serialize)]
struct ReminderRow<'a> {
    index: usize,
    name: &'a str,
    at: String,
    recurring: bool,
    active: bool,
    every_min: Option<u64>,
}

fn trigger_string(reminder: &Reminder) -> String {
    reminder
        .schedule()
        .trigger()
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn toggle(reminders: &mut cadence_core::ReminderList, position: usize, active: bool) -> CliResult {
    let index = common::to_index(position)?;
    reminders.set_active(index, active)?;
    let reminder = reminders.get(index).ok_or("reminder vanished during update")?;
    common::print_json(&ReminderEvent::ReminderToggled {
        name: reminder.name().to_string(),
        active,
    })
}

pub fn run(action: ReminderAction) -> CliResult {
    let config = Config::load()?;
    let store = common::open_store(&config)?;
    let mut reminders = store.load_reminders()?;

    match action {
        ReminderAction::Add { name, at } => {
            let when = common::parse_when(&at)?;
            reminders.add_one_time(name.clone(), when)?;
            common::print_json(&ReminderEvent::ReminderAdded {
                name,
                at,
                recurring: false,
            })?;
        }
        ReminderAction::Rec { name, at, every } => {
            let when = common::parse_when(&at)?;
            reminders.add_recurring(name.clone(), when, every)?;
            common::print_json(&ReminderEvent::ReminderAdded {
                name,
                at,
                recurring: true,
            })?;
        }
        ReminderAction::Snooze { index, by } => {
            let index = common::to_index(index)?;
            reminders.snooze(index, Duration::minutes(by as i64))?;
            let reminder = reminders.get(index).ok_or("reminder vanished during update")?;
            common::print_json(&ReminderEvent::ReminderSnoozed {
                name: reminder.name().to_string(),
                at: trigger_string(reminder),
            })?;
        }
        ReminderAction::On { index } => toggle(&mut reminders, index, true)?,
        ReminderAction::Off { index } => toggle(&mut reminders, index, false)?,
        ReminderAction::Delete { indices } => {
            let indices = common::to_indices(&indices)?;
            let removed = reminders.delete_many(&indices)?;
            common::print_json(&ReminderEvent::RemindersDeleted {
                names: removed.iter().map(|r| r.name().to_string()).collect(),
            })?;
        }
        ReminderAction::List => {
            let rows: Vec<ReminderRow> = reminders
                .iter()
                .enumerate()
                .map(|(i, reminder)| ReminderRow {
                    index: i + 1,
                    name: reminder.name(),
                    at: trigger_string(reminder),
                    recurring: reminder.is_recurring(),
                    active: reminder.is_active(),
                    every_min: reminder.schedule().every_min(),
                })
                .collect();
            common::print_json(&rows)?;
        }
    }

    store.save_reminders(&reminders)?;
    Ok(())
}
