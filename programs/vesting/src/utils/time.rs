//! UTC calendar arithmetic used to lay out Monthly unlock schedules.
//! - times are unix seconds; no timezone concept
//! - adding months keeps the time of day and clamps the day to the target month
//! - boundaries are always computed from the anchor, never chained, so they do not drift

use crate::constants::SECONDS_PER_DAY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: i32,  // e.g. 2026
    pub month: u32, // 1-12
    pub day: u32,   // 1-31
    pub sod: u32,   // seconds of day [0, 86399]
}

/// `ts` shifted by `months` calendar months, day-of-month clamped.
pub fn add_months(ts: i64, months: i64) -> i64 {
    let dt = datetime_from_unix(ts);
    let (y, m) = add_months_ym(dt.year, dt.month, months);
    let d = dt.day.min(days_in_month(y, m));
    unix_from_datetime(DateTimeUtc {
        year: y,
        month: m,
        day: d,
        sod: dt.sod,
    })
}

fn add_months_ym(year: i32, month: u32, add: i64) -> (i32, u32) {
    let base = (year as i64) * 12 + (month as i64 - 1);
    let next = base + add;
    let y = next.div_euclid(12) as i32;
    let m0 = next.rem_euclid(12) as u32;
    (y, m0 + 1)
}

pub fn datetime_from_unix(ts: i64) -> DateTimeUtc {
    let days = ts.div_euclid(SECONDS_PER_DAY);
    let sod = ts.rem_euclid(SECONDS_PER_DAY) as u32;
    let (year, month, day) = civil_from_days(days);
    DateTimeUtc {
        year,
        month,
        day,
        sod,
    }
}

pub fn unix_from_datetime(dt: DateTimeUtc) -> i64 {
    days_from_civil(dt.year, dt.month, dt.day) * SECONDS_PER_DAY + dt.sod as i64
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Proleptic Gregorian conversion: days since 1970-01-01 from civil date.
/// Algorithm by Howard Hinnant (public domain).
fn days_from_civil(y: i32, m: u32, d: u32) -> i64 {
    let y = y as i64 - if m <= 2 { 1 } else { 0 };
    let era = y.div_euclid(400);
    let yoe = y - era * 400; // [0, 399]
    let mp = m as i64 + if m > 2 { -3 } else { 9 }; // [0, 11]
    let doy = (153 * mp + 2) / 5 + d as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146_097 + doe - 719_468
}

/// Proleptic Gregorian conversion: civil date from days since epoch.
/// Algorithm by Howard Hinnant (public domain).
fn civil_from_days(z: i64) -> (i32, u32, u32) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32; // [1, 31]
    let m = (mp + if mp < 10 { 3 } else { -9 }) as u32; // [1, 12]
    let y = (yoe + era * 400) as i32 + if m <= 2 { 1 } else { 0 };
    (y, m, d)
}
