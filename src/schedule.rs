//! Slot scheduling against an injected clock.
//!
//! The bot core never reads wall-clock time directly; it receives a `Clock`
//! so tests can pin "now". Slot times are exchange-local, derived from a
//! configured fixed UTC offset.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use common::{Error, Result};
use tokio::time::sleep;
use tracing::warn;

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One scheduled run: wait until the start time (exchange-local), then run
/// one cycle tagged with `label`. The wait is capped so a late start cannot
/// stall forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub hour: u32,
    pub minute: u32,
    pub label: &'static str,
    pub max_wait_minutes: i64,
}

const MORNING_SLOTS: &[Slot] = &[Slot {
    hour: 8,
    minute: 10,
    label: "8:30 Trade",
    max_wait_minutes: 180,
}];

const MIDDAY_SLOTS: &[Slot] = &[
    Slot {
        hour: 11,
        minute: 15,
        label: "11:30 Trade",
        max_wait_minutes: 180,
    },
    Slot {
        hour: 11,
        minute: 30,
        label: "12:00 Trade",
        max_wait_minutes: 90,
    },
];

/// Slots still due at `now_local`, in firing order: before the 09:30 open,
/// the morning slot; before 13:00, the two midday slots; afterwards, none.
pub fn due_slots(now_local: DateTime<FixedOffset>) -> &'static [Slot] {
    if is_before(now_local, 9, 30) {
        MORNING_SLOTS
    } else if is_before(now_local, 13, 0) {
        MIDDAY_SLOTS
    } else {
        &[]
    }
}

fn is_before(now: DateTime<FixedOffset>, hour: u32, minute: u32) -> bool {
    now.hour() < hour || (now.hour() == hour && now.minute() < minute)
}

pub struct Scheduler<C: Clock> {
    clock: C,
    offset: FixedOffset,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C, utc_offset_hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .ok_or_else(|| Error::Config(format!("invalid UTC offset: {}", utc_offset_hours)))?;
        Ok(Self { clock, offset })
    }

    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.clock.now_utc().with_timezone(&self.offset)
    }

    /// Sleep until the slot's start time, checking every 10 s.
    ///
    /// Returns immediately if the start has already passed; gives up after
    /// the slot's max-wait budget.
    pub async fn wait_until(&self, slot: &Slot) {
        let deadline = self.local_now() + chrono::Duration::minutes(slot.max_wait_minutes);
        loop {
            let now = self.local_now();
            if !is_before(now, slot.hour, slot.minute) {
                return;
            }
            if now >= deadline {
                warn!(
                    "Wait timeout reached for slot '{}' (now={})",
                    slot.label,
                    now.format("%H:%M")
                );
                return;
            }
            sleep(Duration::from_secs(10)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn local(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 7, 14, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_morning_window_selects_premarket_slot() {
        let slots = due_slots(local(7, 0));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].label, "8:30 Trade");

        // Up to (but not including) 09:30 is still the morning window.
        assert_eq!(due_slots(local(9, 29)).len(), 1);
    }

    #[test]
    fn test_midday_window_selects_both_slots() {
        let slots = due_slots(local(9, 30));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].label, "11:30 Trade");
        assert_eq!(slots[1].label, "12:00 Trade");

        assert_eq!(due_slots(local(12, 59)).len(), 2);
    }

    #[test]
    fn test_afternoon_has_no_slots() {
        assert!(due_slots(local(13, 0)).is_empty());
        assert!(due_slots(local(18, 45)).is_empty());
    }

    #[test]
    fn test_scheduler_converts_to_local_time() {
        // 13:00 UTC at UTC-5 is 08:00 exchange-local.
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 7, 14, 13, 0, 0).unwrap());
        let scheduler = Scheduler::new(clock, -5).unwrap();
        let now = scheduler.local_now();
        assert_eq!(now.hour(), 8);
        assert_eq!(due_slots(now).len(), 1);
    }

    #[test]
    fn test_invalid_offset_is_config_error() {
        assert!(Scheduler::new(SystemClock, 99).is_err());
    }
}
