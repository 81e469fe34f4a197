//! Time window computation

use chrono::{DateTime, Days, NaiveTime, TimeDelta, TimeZone, Utc};

/// Which commits a scan should look at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Since local midnight today
    pub today: bool,
    /// Last N hours (0 = unset)
    pub hours: u32,
    /// Last N calendar days (0 = unset)
    pub days: u32,
    pub unpushed_only: bool,
    pub pushed_only: bool,
}

/// Lower time bound for a scan.
///
/// First match wins: `today`, then `hours`, then `days`, else the last 24 hours.
/// Windows reaching past the earliest representable instant saturate there.
pub fn compute_since<Tz: TimeZone>(options: &ScanOptions, now: &DateTime<Tz>) -> DateTime<Tz> {
    if options.today {
        return start_of_day(now);
    }

    if options.hours > 0 {
        return go_back(now, TimeDelta::hours(i64::from(options.hours)));
    }

    if options.days > 0 {
        return now
            .clone()
            .checked_sub_days(Days::new(u64::from(options.days)))
            .unwrap_or_else(|| earliest(now));
    }

    go_back(now, TimeDelta::hours(24))
}

fn go_back<Tz: TimeZone>(now: &DateTime<Tz>, delta: TimeDelta) -> DateTime<Tz> {
    now.clone()
        .checked_sub_signed(delta)
        .unwrap_or_else(|| earliest(now))
}

fn earliest<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    DateTime::<Utc>::MIN_UTC.with_timezone(&now.timezone())
}

/// Midnight of `now`'s calendar date in its own time zone
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let date = now.date_naive();
    let tz = now.timezone();

    // Zones that jump over midnight for DST start the day at the first valid instant
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(date.and_time(NaiveTime::MIN) + TimeDelta::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| now.clone())
}
