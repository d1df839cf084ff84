use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Wall-clock source for expiry checks.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Local wall-clock time, the frame the booking calendar works in.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
