//! Date input validation for provider requests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{CloudError, CloudResult};

/// Inclusive window of dates the provider account can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The window of the provider's trial account: 2024-08-06 through 2026-08-07.
    pub fn supported() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 8, 6).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Message shown to the user when the input is rejected.
    pub fn rejection_message(&self) -> String {
        format!(
            "Please enter a valid date: The valid time period for this account type starts at {}T00:00:00Z and ends at {}T00:00:00Z.",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    /// Validate user input and produce the request timestamp.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` and `YYYY-MM-DDTHH:MM:SS`
    /// (optionally suffixed with `Z`). The result is `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn validate(&self, input: &str) -> CloudResult<String> {
        let input = input.trim();
        let parsed = parse_input(input)
            .filter(|dt| self.contains(dt))
            .ok_or_else(|| CloudError::InvalidDate(self.rejection_message()))?;
        Ok(parsed.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }

    /// Whether the timestamp falls inside the window (end day at midnight only).
    pub fn contains(&self, dt: &NaiveDateTime) -> bool {
        match (self.start.and_hms_opt(0, 0, 0), self.end.and_hms_opt(0, 0, 0)) {
            (Some(start), Some(end)) => *dt >= start && *dt <= end,
            _ => false,
        }
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::supported()
    }
}

fn parse_input(input: &str) -> Option<NaiveDateTime> {
    if input.is_empty() {
        return None;
    }
    let input = input.trim_end_matches('Z');

    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
