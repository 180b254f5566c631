use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use parking_lot::Mutex;
use serde::Serialize;

use cadence_core::{Config, NotificationSink, Reminder, Scheduler};

use crate::common::{self, CliResult};

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between ticks (defaults to the configured value)
    #[arg(long)]
    interval_secs: Option<u64>,
}

#[derive(Serialize)]
struct DueNotice<'a> {
    r#type: &'static str,
    name: &'a str,
    at: String,
    recurring: bool,
}

/// Prints one JSON line per fired reminder. For a recurring reminder `at`
/// is the next occurrence, since firing has already re-armed it.
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn due_batch(&self, batch: &[Reminder]) {
        for reminder in batch {
            let notice = DueNotice {
                r#type: "reminder_due",
                name: reminder.name(),
                at: reminder.schedule().when().to_string(),
                recurring: reminder.is_recurring(),
            };
            match serde_json::to_string(&notice) {
                Ok(line) => println!("{line}"),
                Err(_) => println!("reminder due: {}", reminder.name()),
            }
        }
    }
}

pub fn run(args: WatchArgs) -> CliResult {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let store = common::open_store(&config)?;
    let reminders = Arc::new(Mutex::new(store.load_reminders()?));

    let interval_secs = args
        .interval_secs
        .unwrap_or(config.scheduler.tick_interval_secs)
        .max(1);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let mut scheduler = Scheduler::new(
            Arc::clone(&reminders),
            common::system_clock(),
            Duration::from_secs(interval_secs),
        );
        scheduler.start(Arc::new(ConsoleSink));
        let result = tokio::signal::ctrl_c().await;
        scheduler.shutdown();
        result
    })?;

    // Persist fired/re-armed state accumulated while watching.
    store.save_reminders(&reminders.lock())?;
    Ok(())
}
