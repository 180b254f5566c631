use std::error::Error;
use std::sync::Arc;

use cadence_core::storage::data_dir;
use cadence_core::{Clock, Config, DateTimeArg, Store, SystemClock};

pub type CliResult = Result<(), Box<dyn Error>>;

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

/// Resolves the store paths from config, falling back to the data directory.
pub fn open_store(config: &Config) -> Result<Store, Box<dyn Error>> {
    let dir = data_dir()?;
    let habits = config
        .storage
        .habits_file
        .clone()
        .unwrap_or_else(|| dir.join("habits.txt"));
    let reminders = config
        .storage
        .reminders_file
        .clone()
        .unwrap_or_else(|| dir.join("reminders.txt"));
    Ok(Store::with_paths(habits, reminders))
}

/// Parses a `"YYYY-MM-DD HH:MM"` argument. Completeness is enforced by the
/// schedule constructors, which reject a blank segment.
pub fn parse_when(input: &str) -> Result<DateTimeArg, Box<dyn Error>> {
    let when: DateTimeArg = input.parse()?;
    Ok(when)
}

/// Converts a user-facing 1-based index into a list index.
pub fn to_index(position: usize) -> Result<usize, Box<dyn Error>> {
    position
        .checked_sub(1)
        .ok_or_else(|| "indices start at 1".into())
}

pub fn to_indices(positions: &[usize]) -> Result<Vec<usize>, Box<dyn Error>> {
    positions.iter().map(|&p| to_index(p)).collect()
}

pub fn print_json(value: &impl serde::Serialize) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
