//! One-time and recurring reminder schedules.
//!
//! A `Schedule` decides its own due-ness and advances itself after firing.
//! Due-detection is separated from firing so the scheduler can judge an
//! entire reminder list before mutating any schedule in it.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::datetime::DateTimeArg;
use crate::error::{Error, Result};

/// Temporal contract behind a reminder.
///
/// A one-time schedule fires once and then stays quiet until re-armed; a
/// recurring schedule re-arms itself on every fire by stepping its trigger
/// forward by whole intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    OneTime {
        trigger: NaiveDateTime,
        fired: bool,
    },
    Recurring {
        trigger: NaiveDateTime,
        /// Repeat interval in whole minutes.
        every_min: u64,
        on: bool,
    },
}

impl Schedule {
    /// A one-time schedule, not yet fired.
    pub fn one_time(when: DateTimeArg) -> Result<Self> {
        Ok(Schedule::OneTime {
            trigger: resolve(when)?,
            fired: false,
        })
    }

    /// A recurring schedule, initially on. The interval must be at least one
    /// minute: a zero interval would make the catch-up loop in [`fire`]
    /// non-terminating.
    ///
    /// [`fire`]: Schedule::fire
    pub fn recurring(when: DateTimeArg, every_min: u64) -> Result<Self> {
        if every_min == 0 {
            return Err(Error::InvalidInterval);
        }
        Ok(Schedule::Recurring {
            trigger: resolve(when)?,
            every_min,
            on: true,
        })
    }

    /// True iff `now` is not before the trigger instant and, for a one-time
    /// schedule, it has not already fired.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        match self {
            Schedule::OneTime { trigger, fired } => !fired && now >= *trigger,
            Schedule::Recurring { trigger, .. } => now >= *trigger,
        }
    }

    /// Marks the schedule as triggered and advances it.
    ///
    /// One-time: sets the fired flag; the trigger is untouched. Recurring:
    /// steps the trigger forward by whole intervals until it is strictly
    /// after `now`, so arbitrarily many missed intervals collapse into a
    /// single forward jump and a repeated tick at the same instant never
    /// fires twice.
    pub fn fire(&mut self, now: NaiveDateTime) {
        match self {
            Schedule::OneTime { fired, .. } => *fired = true,
            Schedule::Recurring {
                trigger, every_min, ..
            } => {
                let every = Duration::minutes(*every_min as i64);
                while *trigger <= now {
                    *trigger = *trigger + every;
                }
            }
        }
    }

    /// Pushes a one-time trigger forward by `by` and clears the fired flag.
    /// Rejected for recurring schedules.
    pub fn snooze(&mut self, by: Duration) -> Result<()> {
        match self {
            Schedule::OneTime { trigger, fired } => {
                *trigger = *trigger + by;
                *fired = false;
                Ok(())
            }
            Schedule::Recurring { .. } => Err(Error::SnoozeUnsupported),
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Schedule::Recurring { .. })
    }

    /// Whether the schedule is live: a one-time schedule is active until it
    /// fires, a recurring schedule has an explicit on/off switch.
    pub fn is_active(&self) -> bool {
        match self {
            Schedule::OneTime { fired, .. } => !fired,
            Schedule::Recurring { on, .. } => *on,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        match self {
            Schedule::OneTime { fired, .. } => *fired = !active,
            Schedule::Recurring { on, .. } => *on = active,
        }
    }

    /// The trigger instant (a copy; schedules own their trigger).
    pub fn trigger(&self) -> NaiveDateTime {
        match self {
            Schedule::OneTime { trigger, .. } | Schedule::Recurring { trigger, .. } => *trigger,
        }
    }

    /// The trigger instant in boundary encoding, for display and records.
    pub fn when(&self) -> DateTimeArg {
        DateTimeArg::from(self.trigger())
    }

    /// The repeat interval in minutes, for recurring schedules.
    pub fn every_min(&self) -> Option<u64> {
        match self {
            Schedule::OneTime { .. } => None,
            Schedule::Recurring { every_min, .. } => Some(*every_min),
        }
    }
}

fn resolve(when: DateTimeArg) -> Result<NaiveDateTime> {
    when.resolve().ok_or_else(|| Error::IncompleteDateTime {
        value: when.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn arg(dt: NaiveDateTime) -> DateTimeArg {
        DateTimeArg::from(dt)
    }

    #[test]
    fn one_time_due_then_fire_idempotent() {
        let trigger = at(10, 0);
        let mut s = Schedule::one_time(arg(trigger)).unwrap();

        assert!(!s.is_due(at(9, 59)));
        assert!(s.is_due(trigger));
        assert!(s.is_due(at(10, 5)));

        s.fire(at(10, 5));
        assert!(!s.is_due(at(10, 5)));
        assert!(!s.is_due(at(23, 59)));
        assert!(!s.is_active());
        // Trigger is untouched by a one-time fire.
        assert_eq!(s.trigger(), trigger);
    }

    #[test]
    fn snooze_rearms_a_fired_one_time() {
        let mut s = Schedule::one_time(arg(at(10, 0))).unwrap();
        s.fire(at(10, 0));
        s.snooze(Duration::minutes(15)).unwrap();

        assert_eq!(s.trigger(), at(10, 15));
        assert!(!s.is_due(at(10, 10)));
        assert!(s.is_due(at(10, 15)));
    }

    #[test]
    fn recurring_catch_up_collapses_missed_intervals() {
        let now = at(12, 0);
        let two_days_ago = now - Duration::days(2);
        let mut s = Schedule::recurring(arg(two_days_ago), 24 * 60).unwrap();

        assert!(s.is_due(now));
        s.fire(now);
        // Two missed days collapse into one jump to the next day's slot.
        assert_eq!(s.trigger(), now + Duration::days(1));
        assert!(!s.is_due(now));
    }

    #[test]
    fn recurring_fire_steps_past_an_exact_hit() {
        let now = at(12, 0);
        let mut s = Schedule::recurring(arg(now), 60).unwrap();

        assert!(s.is_due(now));
        s.fire(now);
        assert_eq!(s.trigger(), at(13, 0));
        assert!(!s.is_due(now));
    }

    #[test]
    fn recurring_snooze_is_rejected() {
        let mut s = Schedule::recurring(arg(at(8, 0)), 30).unwrap();
        let err = s.snooze(Duration::minutes(5)).unwrap_err();
        assert!(matches!(err, Error::SnoozeUnsupported));
        // The trigger is untouched by the rejected snooze.
        assert_eq!(s.trigger(), at(8, 0));
    }

    #[test]
    fn active_flag_maps_per_variant() {
        let mut one = Schedule::one_time(arg(at(10, 0))).unwrap();
        assert!(one.is_active());
        one.set_active(false);
        assert!(matches!(one, Schedule::OneTime { fired: true, .. }));
        one.set_active(true);
        assert!(one.is_due(at(10, 0)));

        let mut rec = Schedule::recurring(arg(at(10, 0)), 60).unwrap();
        assert!(rec.is_active());
        rec.set_active(false);
        assert!(!rec.is_active());
        // Due-ness is judged independently of the on/off switch.
        assert!(rec.is_due(at(10, 0)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Schedule::recurring(arg(at(10, 0)), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidInterval));
    }

    #[test]
    fn partial_date_time_is_rejected() {
        let date_only: DateTimeArg = "2024-03-10".parse().unwrap();
        let err = Schedule::one_time(date_only).unwrap_err();
        assert!(matches!(err, Error::IncompleteDateTime { .. }));
    }

    #[test]
    fn serialized_form_is_plain_tagged_fields() {
        let mut s = Schedule::recurring(arg(at(9, 30)), 1440).unwrap();
        s.set_active(false);

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["kind"], "recurring");
        assert_eq!(json["every_min"], 1440);
        assert_eq!(json["on"], false);

        let back: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn recurring_fire_lands_in_the_first_slot_after_now(
                behind_min in 0i64..50_000,
                every_min in 1u64..5_000,
            ) {
                let now = at(12, 0);
                let start = now - Duration::minutes(behind_min);
                let mut s = Schedule::recurring(arg(start), every_min).unwrap();
                s.fire(now);

                let every = Duration::minutes(every_min as i64);
                prop_assert!(s.trigger() > now);
                prop_assert!(s.trigger() - every <= now);
            }
        }
    }
}
