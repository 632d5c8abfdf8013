use chrono::{DateTime, NaiveTime, Utc};

/// Current time as epoch milliseconds, the unit of competition windows.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Midnight UTC of the day containing `now`.
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
