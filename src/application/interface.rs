use crate::error::BookingError;
use chrono::{DateTime, TimeZone};

pub trait ClockTrait {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

// 確定したタイムスタンプを次の画面へ渡す
pub trait BookingHandoffTrait {
    fn hand_off(&mut self, timestamp: i64) -> Result<(), BookingError>;
}
