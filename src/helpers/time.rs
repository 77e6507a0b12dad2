use chrono::NaiveDate;
use chrono_tz::Europe::Moscow;

/// Earliest date the upstream dynamics endpoint has data for.
pub const UPSTREAM_EPOCH: (i32, u32, u32) = (1992, 7, 1);

/// "Today" anchored to the upstream's time zone, regardless of where the
/// caller or this process runs.
pub fn today_moscow() -> NaiveDate {
    chrono::Utc::now().with_timezone(&Moscow).date_naive()
}

pub fn upstream_epoch() -> NaiveDate {
    let (y, m, d) = UPSTREAM_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Boundary format (ISO) -> upstream query format.
pub fn to_upstream_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Upstream's embedded dates come back as `dd.mm.yyyy`.
pub fn from_upstream_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d.%m.%Y").ok()
}

/// Boundary dates are ISO `YYYY-MM-DD`; a trailing RFC3339 time part is allowed
/// and ignored, matching the original API contract.
pub fn parse_boundary_date(text: &str) -> Option<NaiveDate> {
    let day = text.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
