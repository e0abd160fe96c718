//! Human-readable photo dates, as shown under each gallery item.

use std::fmt;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Utc};

/// How long ago a photo was taken, bucketed the way the gallery shows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelativeAge {
    JustNow,
    Minutes(i64),
    Hours(i64),
    /// Taken the previous day, at the given local time.
    Yesterday(NaiveTime),
    Days(i64),
    Weeks(i64),
    Months(i64),
    /// A year or more ago.
    Date(NaiveDate),
}

impl fmt::Display for RelativeAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeAge::JustNow => write!(f, "Vừa xong"),
            RelativeAge::Minutes(n) => write!(f, "{} phút trước", n),
            RelativeAge::Hours(n) => write!(f, "{} giờ trước", n),
            RelativeAge::Yesterday(at) => write!(f, "Hôm qua, {}", at.format("%H:%M")),
            RelativeAge::Days(n) => write!(f, "{} ngày trước", n),
            RelativeAge::Weeks(n) => write!(f, "{} tuần trước", n),
            RelativeAge::Months(n) => write!(f, "{} tháng trước", n),
            RelativeAge::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
        }
    }
}

/// Bucket the age of `timestamp` relative to `now`, with times of day
/// rendered in `offset`. Timestamps in the future count as just now.
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>, offset: FixedOffset) -> RelativeAge {
    let elapsed = now.signed_duration_since(timestamp);
    if elapsed.num_seconds() < 0 {
        return RelativeAge::JustNow;
    }

    let days = elapsed.num_days();
    let local = timestamp.with_timezone(&offset);

    match days {
        0 => match (elapsed.num_hours(), elapsed.num_minutes()) {
            (0, 0) => RelativeAge::JustNow,
            (0, m) => RelativeAge::Minutes(m),
            (h, _) => RelativeAge::Hours(h),
        },
        1 => RelativeAge::Yesterday(local.time()),
        2..=6 => RelativeAge::Days(days),
        7..=29 => RelativeAge::Weeks(days / 7),
        30..=364 => RelativeAge::Months(days / 30),
        _ => RelativeAge::Date(local.date_naive()),
    }
}

/// The gallery caption date, or an empty string when dates are hidden.
pub fn format_relative(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    offset: FixedOffset,
    show_date: bool,
) -> String {
    if !show_date {
        return String::new();
    }
    relative_age(timestamp, now, offset).to_string()
}

/// `dd/mm/yyyy` in `offset`.
pub fn format_short_date(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp.with_timezone(&offset).format("%d/%m/%Y").to_string()
}

/// `HH:MM` in `offset`.
pub fn format_time(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp.with_timezone(&offset).format("%H:%M").to_string()
}

pub fn format_date_time(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "{} {}",
        format_short_date(timestamp, offset),
        format_time(timestamp, offset)
    )
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Chủ Nhật", "Thứ Hai", "Thứ Ba", "Thứ Tư", "Thứ Năm", "Thứ Sáu", "Thứ Bảy",
];

/// Weekday and date in `offset`, e.g. "Thứ Hai, 06/10/2025".
pub fn format_full_date(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = timestamp.with_timezone(&offset);
    let weekday = WEEKDAY_NAMES[local.weekday().num_days_from_sunday() as usize];
    format!("{}, {}", weekday, local.format("%d/%m/%Y"))
}

/// Vietnamese name of a 1-based month, `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<String> {
    (1..=12).contains(&month).then(|| format!("Tháng {}", month))
}

/// Month heading for grouped views, e.g. "Tháng 10, 2025".
pub fn format_month_year(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = timestamp.with_timezone(&offset);
    format!(
        "{}, {}",
        month_name(local.month()).unwrap_or_default(),
        local.year()
    )
}

/// Whether `timestamp` falls on the same calendar day as `now` in `offset`.
pub fn is_today(timestamp: DateTime<Utc>, now: DateTime<Utc>, offset: FixedOffset) -> bool {
    timestamp.with_timezone(&offset).date_naive() == now.with_timezone(&offset).date_naive()
}

/// Whether `timestamp` falls on the calendar day before `now` in `offset`.
pub fn is_yesterday(timestamp: DateTime<Utc>, now: DateTime<Utc>, offset: FixedOffset) -> bool {
    now.with_timezone(&offset)
        .date_naive()
        .checked_sub_days(Days::new(1))
        .is_some_and(|day| timestamp.with_timezone(&offset).date_naive() == day)
}

const TIME_AGO_UNITS: [(&str, i64); 7] = [
    ("năm", 31_536_000),
    ("tháng", 2_592_000),
    ("tuần", 604_800),
    ("ngày", 86_400),
    ("giờ", 3_600),
    ("phút", 60),
    ("giây", 1),
];

/// Elapsed time in the largest whole unit, e.g. "3 tuần trước".
///
/// Unlike [`relative_age`] this never switches to a calendar date, and it
/// counts seconds. Timestamps at or after `now` read "Vừa xong".
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(timestamp).num_seconds();
    TIME_AGO_UNITS
        .iter()
        .find_map(|(unit, size)| {
            let count = seconds / size;
            (count >= 1).then(|| format!("{} {} trước", count, unit))
        })
        .unwrap_or_else(|| "Vừa xong".to_string())
}
