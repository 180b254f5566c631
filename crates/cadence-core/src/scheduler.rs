//! Background ticker that collects and fires due reminders.
//!
//! The scheduler's `tick()` is synchronous and caller-drivable, in the same
//! way the rest of the core is. The background loop is a thin tokio shell
//! that runs the same tick on a fixed interval and forwards non-empty
//! batches to a notification sink.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::clock::Clock;
use crate::reminder::{Reminder, ReminderList};

/// Receives each non-empty batch of fired reminders.
pub trait NotificationSink: Send + Sync {
    fn due_batch(&self, batch: &[Reminder]);
}

/// Periodic ticker over a shared reminder list.
///
/// All list mutation (interactive adds and deletes, the tick's fire pass)
/// is serialized through the one mutex; a tick therefore observes a
/// consistent snapshot, and reminders added between ticks surface on the
/// next one.
pub struct Scheduler {
    reminders: Arc<Mutex<ReminderList>>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(
        reminders: Arc<Mutex<ReminderList>>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            reminders,
            clock,
            // tokio's interval panics on a zero period.
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// One synchronous pass: every reminder that is active and due is fired
    /// and cloned into the returned batch, in list order.
    pub fn tick(&self) -> Vec<Reminder> {
        run_tick(&self.reminders, self.clock.now())
    }

    /// Spawns the background loop; a no-op if it is already running. The
    /// first tick runs immediately, then once per interval. Must be called
    /// from within a tokio runtime.
    pub fn start(&mut self, sink: Arc<dyn NotificationSink>) {
        if self.is_running() {
            return;
        }
        let reminders = Arc::clone(&self.reminders);
        let clock = Arc::clone(&self.clock);
        let tick_interval = self.tick_interval;
        debug!(interval_ms = tick_interval.as_millis() as u64, "scheduler started");

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let batch = run_tick(&reminders, clock.now());
                if !batch.is_empty() {
                    debug!(fired = batch.len(), "tick fired reminders");
                    sink.due_batch(&batch);
                }
            }
        }));
    }

    /// Stops the background loop; a no-op if it is not running. The loop's
    /// only await point is the interval, so an in-flight tick always
    /// completes and no new tick starts after this returns.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("scheduler stopped");
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_tick(reminders: &Mutex<ReminderList>, now: NaiveDateTime) -> Vec<Reminder> {
    let mut list = reminders.lock();
    // Judge the whole list before firing anything: firing one reminder must
    // not change whether another is considered due in this pass.
    let due: Vec<usize> = list
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_active() && r.is_due(now))
        .map(|(index, _)| index)
        .collect();

    let mut batch = Vec::with_capacity(due.len());
    for index in due {
        if let Some(reminder) = list.get_mut(index) {
            reminder.fire(now);
            batch.push(reminder.clone());
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::datetime::DateTimeArg;
    use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn arg(dt: NaiveDateTime) -> DateTimeArg {
        DateTimeArg::from(dt)
    }

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingSink {
        fn batches(&self) -> Vec<Vec<String>> {
            self.batches.lock().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn due_batch(&self, batch: &[Reminder]) {
            self.batches
                .lock()
                .push(batch.iter().map(|r| r.name().to_string()).collect());
        }
    }

    fn scheduler_at(now: NaiveDateTime) -> (Arc<Mutex<ReminderList>>, Arc<FixedClock>, Scheduler) {
        let reminders = Arc::new(Mutex::new(ReminderList::new()));
        let clock = Arc::new(FixedClock::new(now));
        let scheduler = Scheduler::new(
            Arc::clone(&reminders),
            clock.clone(),
            Duration::from_secs(1),
        );
        (reminders, clock, scheduler)
    }

    #[test]
    fn tick_fires_once_and_batch_follows_list_order() {
        let now = at(12, 0);
        let (reminders, _clock, scheduler) = scheduler_at(now);
        {
            let mut list = reminders.lock();
            // Insertion order deliberately disagrees with due-time order.
            list.add_one_time("later", arg(now - ChronoDuration::minutes(1)))
                .unwrap();
            list.add_one_time("earlier", arg(now - ChronoDuration::minutes(5)))
                .unwrap();
            list.add_one_time("future", arg(now + ChronoDuration::hours(1)))
                .unwrap();
        }

        let batch = scheduler.tick();
        let names: Vec<&str> = batch.iter().map(Reminder::name).collect();
        assert_eq!(names, ["later", "earlier"]);

        // One-time reminders stay in the list but are spent.
        assert_eq!(reminders.lock().len(), 3);
        assert!(scheduler.tick().is_empty());
    }

    #[test]
    fn recurring_reminder_survives_firing_and_rearms() {
        let now = at(12, 0);
        let (reminders, clock, scheduler) = scheduler_at(now);
        reminders
            .lock()
            .add_recurring("water plants", arg(now - ChronoDuration::days(2)), 24 * 60)
            .unwrap();

        let batch = scheduler.tick();
        assert_eq!(batch.len(), 1);
        assert!(scheduler.tick().is_empty());

        clock.advance(ChronoDuration::days(1));
        assert_eq!(scheduler.tick().len(), 1);
    }

    #[test]
    fn disabled_recurring_reminder_is_skipped() {
        let now = at(12, 0);
        let (reminders, _clock, scheduler) = scheduler_at(now);
        {
            let mut list = reminders.lock();
            list.add_recurring("muted", arg(now - ChronoDuration::hours(1)), 60)
                .unwrap();
            list.set_active(0, false).unwrap();
        }

        assert!(scheduler.tick().is_empty());

        reminders.lock().set_active(0, true).unwrap();
        assert_eq!(scheduler.tick().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent_and_shutdown_is_safe_in_any_order() {
        let (_reminders, _clock, mut scheduler) = scheduler_at(at(12, 0));
        let sink = Arc::new(RecordingSink::default());

        // Shutdown before any start is a no-op.
        scheduler.shutdown();
        assert!(!scheduler.is_running());

        scheduler.start(sink.clone());
        assert!(scheduler.is_running());
        scheduler.start(sink.clone());
        assert!(scheduler.is_running());

        scheduler.shutdown();
        assert!(!scheduler.is_running());
        scheduler.shutdown();
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn background_loop_forwards_batches_and_sees_new_reminders() {
        let now = at(12, 0);
        let (reminders, _clock, mut scheduler) = scheduler_at(now);
        reminders
            .lock()
            .add_one_time("overdue", arg(now - ChronoDuration::minutes(5)))
            .unwrap();

        let sink = Arc::new(RecordingSink::default());
        scheduler.start(sink.clone());

        // The first tick runs immediately on start.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sink.batches(), vec![vec!["overdue".to_string()]]);

        // Added after start, picked up by the next tick, delivered once.
        reminders
            .lock()
            .add_one_time("fresh", arg(now - ChronoDuration::minutes(1)))
            .unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            sink.batches(),
            vec![vec!["overdue".to_string()], vec!["fresh".to_string()]]
        );

        // Nothing left to fire: empty ticks are not forwarded.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(sink.batches().len(), 2);

        scheduler.shutdown();
    }
}
