use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

// Zone abbreviations seen in Spanish feeds that RFC 2822 parsing rejects.
const ZONE_OFFSETS: [(&str, &str); 4] = [
    ("CET", "+0100"),
    ("CEST", "+0200"),
    ("WET", "+0000"),
    ("WEST", "+0100"),
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Pick the publication time of an entry: the primary date when valid,
/// otherwise the fallback, otherwise nothing.
pub fn resolve(
    primary: Option<DateTime<Utc>>,
    fallback: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    primary.filter(is_valid).or(fallback.filter(is_valid))
}

/// Feeds emit `1970-01-01` and zero dates as placeholders.
fn is_valid(value: &DateTime<Utc>) -> bool {
    *value >= DateTime::UNIX_EPOCH
}

/// Lenient timestamp parser handed to the feed parser.
///
/// Accepts RFC 3339, RFC 2822 (including a few European zone names) and
/// offset-less variants, which are read as UTC. Anything else is `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(rewritten) = replace_zone_name(&text)
        && let Ok(dt) = DateTime::parse_from_rfc2822(&rewritten)
    {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn replace_zone_name(text: &str) -> Option<String> {
    let (head, zone) = text.rsplit_once(' ')?;
    ZONE_OFFSETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        .map(|(_, offset)| format!("{head} {offset}"))
}
