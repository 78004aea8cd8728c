use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Date-time layouts tried in order after RFC 3339.
const DATETIME_FMTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; these resolve to midnight.
const DATE_FMTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse free-text meter timestamps into a naive (wall-clock) date-time.
///
/// Offsets in RFC 3339 input are dropped rather than converted, so
/// `2024-01-01T23:30:00+05:00` stays on 1 January.  Month-first is assumed
/// for slash-separated dates whose year comes last.
///
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Replace trailing 'Z' with '+00:00'.
    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FMTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    DATE_FMTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

// ── Calendar buckets ──────────────────────────────────────────────────────────

/// Calendar date of `ts`, dropping the time of day.
pub fn calendar_date(ts: &NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// ISO-8601 week number (1–53) of `ts`.
///
/// Week 1 is the week holding the year's first Thursday, so the first days
/// of January can belong to week 52/53 and the last days of December to
/// week 1.  The ISO year is deliberately not part of the result.
pub fn iso_week_number(ts: &NaiveDateTime) -> u32 {
    ts.date().iso_week().week()
}
