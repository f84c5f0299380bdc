use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Source of "now" for timestamps and the calendar's today marker.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in the user's local time zone.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Starts at a fixed instant and moves forward by `step` on every `now()`
/// call, so consecutive mutations get strictly increasing timestamps.
#[derive(Debug)]
pub struct StepClock {
    current: std::cell::Cell<DateTime<Utc>>,
    step: Duration,
}

impl StepClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: std::cell::Cell::new(start),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }

    fn today(&self) -> NaiveDate {
        self.current.get().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn step_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let clock = StepClock::new(start, Duration::seconds(1));
        let a = clock.now();
        let b = clock.now();
        assert_eq!(a, start);
        assert_eq!(b - a, Duration::seconds(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
    }
}
