use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a Unix epoch in seconds, e.g. `1700000000`
///
/// Returns `None` for anything that is not a plain integer in chrono's range.
pub fn parse_epoch_seconds(value: &str) -> Option<DateTime<Utc>> {
    let secs = value.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Parse the timestamp field of a serialized history record
///
/// Accepts, with or without surrounding quotes:
/// - RFC 3339 (`2023-11-14T22:13:20Z`, `2023-11-14T23:13:20.1234567+01:00`)
/// - an offset-less ISO 8601 datetime, taken as UTC
/// - the .NET JSON date form `/Date(1700000000000)/` (milliseconds)
/// - bare epoch seconds
pub fn parse_record_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .trim();

    if value.is_empty() {
        return None;
    }

    if let Some(inner) = value.strip_prefix("/Date(").or_else(|| value.strip_prefix("\\/Date(")) {
        return parse_dotnet_millis(inner);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    parse_epoch_seconds(value)
}

/// Milliseconds from the body of `/Date(<ms>[+-offset])/`; the offset is ignored
/// because the millisecond count is already UTC.
fn parse_dotnet_millis(inner: &str) -> Option<DateTime<Utc>> {
    let end = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(inner.len(), |(i, _)| i);
    let millis = inner[..end].parse::<i64>().ok()?;
    DateTime::from_timestamp_millis(millis)
}
