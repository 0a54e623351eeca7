use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of "now" for environment resolution.
///
/// Injected so resolution stays a pure function of its inputs.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a fixed instant. Settable, for driving time forward in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: NaiveDateTime,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    /// Midnight-relative clock on the given calendar day. Out-of-range
    /// components clamp to the nearest valid value.
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month.clamp(1, 12), day.clamp(1, 28))
            .unwrap_or_default();
        let at = date
            .and_hms_opt(hour.min(23), 0, 0)
            .unwrap_or_else(|| date.and_time(Default::default()));
        Self { at }
    }

    pub fn set(&mut self, at: NaiveDateTime) {
        self.at = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.at
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
