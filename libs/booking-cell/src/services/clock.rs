use chrono::{Local, NaiveDate, Timelike};

/// Wall-clock seam. Controllers never read the system clock directly, so
/// "today" and "now" are deterministic under test.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current calendar date in the clinic's local timezone.
    fn today(&self) -> NaiveDate;

    /// Minutes since local midnight.
    fn now_minutes(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_minutes(&self) -> u32 {
        let now = Local::now();
        now.hour() * 60 + now.minute()
    }
}

/// A clock pinned to a known instant, for integration tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub minutes: u32,
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_minutes(&self) -> u32 {
        self.minutes
    }
}
