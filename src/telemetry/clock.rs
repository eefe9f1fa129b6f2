//! Wall-clock access for the run loop.

use chrono::{Local, NaiveDateTime};

/// Source of the current local date and time
///
/// Log files rotate on the local calendar date, so the clock yields naive
/// local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::ScriptedClock;
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_scripted_clock_replays_then_holds() {
        let clock = ScriptedClock::new(vec![at(15, 23, 59), at(16, 0, 0)]);
        assert_eq!(clock.now(), at(15, 23, 59));
        assert_eq!(clock.now(), at(16, 0, 0));
        assert_eq!(clock.now(), at(16, 0, 0));
    }

    #[test]
    fn test_system_clock_is_local() {
        let before = Local::now().naive_local();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
