use crate::application::interface::ClockTrait;
use chrono::{DateTime, Duration, Local, TimeZone};

#[cfg(test)]
use chrono::FixedOffset;

pub struct SystemClock;

impl ClockTrait for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
pub struct FixedClock<Tz: TimeZone> {
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    pub fn sync_clock(&mut self, now: DateTime<Tz>) {
        self.now = now;
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now = self.now.clone() + duration;
    }
}

impl<Tz: TimeZone> ClockTrait for FixedClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.now.clone()
    }
}

#[test]
fn test_fixed_clock_advanceで時刻が進むこと() {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let mut clock = FixedClock::new(tz.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap());

    clock.advance(Duration::hours(2));

    assert_eq!(clock.now(), tz.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap());
}

#[test]
fn test_fixed_clock_sync_clockで時刻を置き換えること() {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let mut clock = FixedClock::new(tz.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap());
    let later = tz.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

    clock.sync_clock(later);

    assert_eq!(clock.now(), later);
}
