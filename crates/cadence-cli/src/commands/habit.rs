use clap::Subcommand;
use serde::Serialize;

use cadence_core::{Config, Habit, StreakOutcome};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit with a repeat interval in minutes
    Add {
        name: String,
        /// Repeat interval in minutes (e.g. 1440 for daily)
        #[arg(long)]
        every: u64,
    },
    /// Record a completion attempt for the habit at INDEX (1-based)
    Done { index: usize },
    /// Delete habits by 1-based index
    Delete { indices: Vec<usize> },
    /// List habits
    List,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HabitEvent {
    HabitAdded {
        name: String,
        deadline: String,
        every_min: u64,
    },
    StreakAttempt {
        name: String,
        outcome: StreakOutcome,
        streak: u32,
        next_deadline: String,
    },
    HabitsDeleted {
        names: Vec<String>,
    },
}

#[derive(Serialize)]
struct HabitRow<'a> {
    index: usize,
    name: &'a str,
    streak: u32,
    deadline: String,
    every_min: u64,
}

fn deadline_string(habit: &Habit) -> String {
    habit.deadline().format("%Y-%m-%d %H:%M").to_string()
}

pub fn run(action: HabitAction) -> CliResult {
    let config = Config::load()?;
    let store = common::open_store(&config)?;
    let mut habits = store.load_habits(common::system_clock())?;

    match action {
        HabitAction::Add { name, every } => {
            habits.add(name.clone(), every)?;
            let added = habits.iter().last().ok_or("habit list is empty after add")?;
            common::print_json(&HabitEvent::HabitAdded {
                name,
                deadline: deadline_string(added),
                every_min: every,
            })?;
        }
        HabitAction::Done { index } => {
            let index = common::to_index(index)?;
            let outcome = habits.inc_streak(index)?;
            let habit = habits.get(index).ok_or("habit vanished during update")?;
            common::print_json(&HabitEvent::StreakAttempt {
                name: habit.name().to_string(),
                outcome,
                streak: habit.streak(),
                next_deadline: deadline_string(habit),
            })?;
        }
        HabitAction::Delete { indices } => {
            let indices = common::to_indices(&indices)?;
            let removed = habits.delete_many(&indices)?;
            common::print_json(&HabitEvent::HabitsDeleted {
                names: removed.iter().map(|h| h.name().to_string()).collect(),
            })?;
        }
        HabitAction::List => {
            let rows: Vec<HabitRow> = habits
                .iter()
                .enumerate()
                .map(|(i, habit)| HabitRow {
                    index: i + 1,
                    name: habit.name(),
                    streak: habit.streak(),
                    deadline: deadline_string(habit),
                    every_min: habit.every_min(),
                })
                .collect();
            common::print_json(&rows)?;
        }
    }

    store.save_habits(&habits)?;
    Ok(())
}
