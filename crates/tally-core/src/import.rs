//! Ingestion of raw `[issue, comment, time]` rows into keyed log entries.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::ImportError;
use crate::log::{ImportLog, LogDetail};
use crate::types::{LogKey, ValidationError};

/// Bare number of minutes: "90", "1.5".
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)$").unwrap());

/// Clock form: "1:30".
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+):([0-5]\d)$").unwrap());

/// Unit form: "1h 30m", "2h", "45min", "1.5 hours".
static UNITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(\d+(?:\.\d+)?)\s*h(?:ours?|rs?)?)?\s*(?:(\d+(?:\.\d+)?)\s*m(?:in(?:ute)?s?)?)?$",
    )
    .unwrap()
});

/// ~1000 years in minutes.
const MAX_MINUTES: f64 = 1000.0 * 365.0 * 24.0 * 60.0;

/// Parses a duration string into whole minutes.
///
/// Supports:
/// - Bare minutes: "90", "1.5" (rounded to the nearest minute)
/// - Clock: "1:30"
/// - Units: "1h 30m", "2h", "45m", "1.5h"
pub fn parse_duration(s: &str) -> Result<u64, ValidationError> {
    let invalid = || ValidationError::InvalidDuration {
        value: s.to_string(),
    };
    let input = s.trim().to_ascii_lowercase();
    if input.is_empty() {
        return Err(invalid());
    }

    let minutes = if let Some(caps) = MINUTES_RE.captures(&input) {
        parse_number(&caps[1]).ok_or_else(invalid)?
    } else if let Some(caps) = CLOCK_RE.captures(&input) {
        let hours = parse_number(&caps[1]).ok_or_else(invalid)?;
        let mins = parse_number(&caps[2]).ok_or_else(invalid)?;
        hours.mul_add(60.0, mins)
    } else if let Some(caps) = UNITS_RE.captures(&input) {
        let hours = caps.get(1).map(|m| m.as_str());
        let mins = caps.get(2).map(|m| m.as_str());
        if hours.is_none() && mins.is_none() {
            return Err(invalid());
        }
        let hours = hours.map_or(Some(0.0), parse_number).ok_or_else(invalid)?;
        let mins = mins.map_or(Some(0.0), parse_number).ok_or_else(invalid)?;
        hours.mul_add(60.0, mins)
    } else {
        return Err(invalid());
    };

    if !minutes.is_finite() || !(0.0..=MAX_MINUTES).contains(&minutes) {
        return Err(invalid());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(minutes.round() as u64)
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses a batch of rows, assigning every entry a fresh random key.
///
/// Fails on the first invalid row, reporting its 1-based position.
pub fn import_rows(rows: Vec<ImportLog>) -> Result<Vec<LogDetail>, ImportError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let detail = LogKey::new(Uuid::new_v4().to_string())
                .and_then(|key| row.into_detail(key))
                .map_err(|source| ImportError::Row {
                    row: idx + 1,
                    source,
                })?;
            tracing::trace!(key = %detail.key, issue = %detail.issue, time = detail.time, "imported row");
            Ok(detail)
        })
        .collect()
}
