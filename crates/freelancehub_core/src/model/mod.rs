//! Domain model for freelance projects and their payments.
//!
//! # Responsibility
//! - Define canonical data structures consumed by analytics and storage.
//! - Describe records that could not be decoded (`MalformedRecord`).
//!
//! # Invariants
//! - Every project and payment is identified by a stable UUID.
//! - Payment amounts are whole, non-negative currency units.

pub mod payment;
pub mod project;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::{Display, Formatter};

/// Parses calendar-date text as written by the entry forms and the store.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps. For timestamps the date part is kept as written, the offset
/// is not applied.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// Formats a calendar date the way the store persists it.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Which kind of record a `MalformedRecord` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Project,
    Payment,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Payment => "payment",
        }
    }
}

/// Why a record was excluded from analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    InvalidId(String),
    InvalidProjectId(String),
    MissingDate,
    UnparseableDate(String),
    MissingAmount,
    InvalidAmount(String),
    UnknownStatus(String),
    /// The column holds a blob or text that is not valid UTF-8.
    InvalidText {
        column: &'static str,
        value: String,
    },
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => write!(f, "invalid id `{value}`"),
            Self::InvalidProjectId(value) => write!(f, "invalid project id `{value}`"),
            Self::MissingDate => write!(f, "missing date"),
            Self::UnparseableDate(value) => write!(f, "unparseable date `{value}`"),
            Self::MissingAmount => write!(f, "missing amount"),
            Self::InvalidAmount(value) => write!(f, "invalid amount `{value}`"),
            Self::UnknownStatus(value) => write!(f, "unknown status `{value}`"),
            Self::InvalidText { column, value } => {
                write!(f, "column `{column}` is not text: `{value}`")
            }
        }
    }
}

/// `MalformedRecord::record_id` used when the id column itself is not text.
pub const UNREADABLE_ID: &str = "<unreadable>";

/// A stored record that was skipped instead of aborting a whole batch.
///
/// `record_id` is kept as text because the id itself may be the malformed
/// part of the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub kind: RecordKind,
    pub record_id: String,
    pub reason: MalformedReason,
}

impl MalformedRecord {
    pub fn new(kind: RecordKind, record_id: impl Into<String>, reason: MalformedReason) -> Self {
        Self {
            kind,
            record_id: record_id.into(),
            reason,
        }
    }
}

impl Display for MalformedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed {} `{}`: {}",
            self.kind.as_str(),
            self.record_id,
            self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_calendar_date, parse_calendar_date, MalformedReason, MalformedRecord, RecordKind,
    };
    use chrono::NaiveDate;

    #[test]
    fn parse_calendar_date_accepts_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(parse_calendar_date("2024-06-01"), Some(expected));
        assert_eq!(parse_calendar_date(" 2024-06-01 "), Some(expected));
        assert_eq!(
            parse_calendar_date("2024-06-01T00:00:00.000Z"),
            Some(expected)
        );
        assert_eq!(parse_calendar_date("2024-06-01T23:15:00"), Some(expected));
    }

    #[test]
    fn parse_calendar_date_rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2024-13-01"), None);
    }

    #[test]
    fn invalid_text_reason_names_the_column() {
        let record = MalformedRecord::new(
            RecordKind::Payment,
            "p-1",
            MalformedReason::InvalidText {
                column: "date",
                value: "<blob 2 bytes>".to_string(),
            },
        );
        assert_eq!(
            record.to_string(),
            "malformed payment `p-1`: column `date` is not text: `<blob 2 bytes>`"
        );
    }

    #[test]
    fn format_calendar_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 9).unwrap();
        assert_eq!(format_calendar_date(date), "2023-01-09");
    }
}
