use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::{
    document::Document,
    error::{Error, Result},
};

/// Date-time layouts carrying a UTC offset. The offset is dropped after
/// parsing; only the wall-clock part is kept.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Keep the documents modified at or before `cutoff`, in their input order.
pub fn filter_by_cutoff(
    documents: &[Document],
    cutoff: NaiveDateTime,
) -> Vec<Document> {
    documents
        .iter()
        .filter(|doc| doc.modified_at <= cutoff)
        .cloned()
        .collect()
}

/// The last second of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap_or_default()
}

/// Cutoff used when the caller gives none: the end of today, local time.
pub fn default_cutoff() -> NaiveDateTime {
    end_of_day(Local::now().date_naive())
}

/// Parse an ISO-8601 cutoff.
///
/// Accepts `Z` or numeric offsets (discarded, not converted), naive
/// date-times with `T` or a space, optional fractional seconds, minute
/// precision, and bare dates (taken as midnight).
pub fn parse_cutoff(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    let normalized = match input.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => input.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Ok(dt.naive_local());
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }

    Err(Error::InvalidCutoff(input.to_string()))
}

/// Resolve an optional cutoff string, falling back to [`default_cutoff`]
/// when it is absent or empty. Whitespace alone does not count as empty.
pub fn resolve_cutoff(input: Option<&str>) -> Result<NaiveDateTime> {
    match input {
        Some(raw) if !raw.is_empty() => parse_cutoff(raw),
        _ => Ok(default_cutoff()),
    }
}
