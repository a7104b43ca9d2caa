use time::OffsetDateTime;

/// Calendar year in UTC; the default release year offered when registering a series.
pub fn current_year() -> i64 {
    i64::from(OffsetDateTime::now_utc().year())
}
