// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Value formatting for the dashboard

use chrono::{DateTime, FixedOffset, Utc};

use crate::snapshot::MetricStatus;

/// Whole steps, truncated
#[must_use]
pub fn format_steps(steps: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let whole = steps.trunc() as i64;
    whole.to_string()
}

/// One decimal, e.g. `72.3 bpm`
#[must_use]
pub fn format_heart_rate(bpm: f64) -> String {
    format!("{bpm:.1} bpm")
}

/// No decimals, e.g. `456 kcal`
#[must_use]
pub fn format_energy(kcal: f64) -> String {
    format!("{kcal:.0} kcal")
}

/// Short date and time in `offset`, e.g. `6/23/24, 3:45 PM`
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%-m/%-d/%y, %-I:%M %p")
        .to_string()
}

/// Suffix appended to a value that is not fresh
#[must_use]
pub fn status_note(status: &MetricStatus) -> Option<String> {
    match status {
        MetricStatus::Idle | MetricStatus::Ready => None,
        MetricStatus::Loading => Some("loading...".to_string()),
        MetricStatus::NoData => Some("no data".to_string()),
        MetricStatus::Failed(reason) => Some(format!("unavailable: {reason}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_steps() {
        assert_eq!(format_steps(1234.0), "1234");
        assert_eq!(format_steps(1234.9), "1234");
        assert_eq!(format_steps(0.0), "0");
    }

    #[test]
    fn test_format_heart_rate() {
        assert_eq!(format_heart_rate(72.34), "72.3 bpm");
        assert_eq!(format_heart_rate(60.0), "60.0 bpm");
    }

    #[test]
    fn test_format_energy() {
        assert_eq!(format_energy(455.6), "456 kcal");
        assert_eq!(format_energy(0.0), "0 kcal");
    }

    #[test]
    fn test_format_timestamp_in_offset() {
        let at = DateTime::parse_from_rfc3339("2021-06-23T22:45:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_timestamp(at, utc), "6/23/21, 10:45 PM");

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_timestamp(at, tokyo), "6/24/21, 7:45 AM");
    }

    #[test]
    fn test_status_note() {
        assert_eq!(status_note(&MetricStatus::Ready), None);
        assert_eq!(status_note(&MetricStatus::Idle), None);
        assert_eq!(
            status_note(&MetricStatus::Loading).as_deref(),
            Some("loading...")
        );
        assert_eq!(
            status_note(&MetricStatus::Failed("offline".to_string())).as_deref(),
            Some("unavailable: offline")
        );
    }
}
