//! Monthly attendance CSV rendering.
//!
//! The output is a pure function of the rows passed in: UTF-8, a leading
//! byte-order mark so spreadsheet tools pick the right encoding, a header
//! row and one line per record.

use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Timestamp, WorkDate};

/// Byte-order mark prefixed to every export.
pub const BOM: char = '\u{FEFF}';

/// Content type sent with CSV downloads.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const HEADERS_JA: [&str; 7] = [
    "日付",
    "出社時刻",
    "退社時刻",
    "勤務時間",
    "ステータス",
    "出社場所",
    "退社場所",
];

const HEADERS_EN: [&str; 7] = [
    "date",
    "clock-in time",
    "clock-out time",
    "work duration",
    "status",
    "clock-in location",
    "clock-out location",
];

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Language and formatting conventions of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportLocale {
    /// Japanese headers, `2024/2/5`, `9:05:03`, `8時間30分`.
    #[default]
    Ja,
    /// English headers, `2024-02-05`, `09:05:03`, `8h 30m`.
    En,
}

impl ExportLocale {
    pub fn headers(self) -> [&'static str; 7] {
        match self {
            Self::Ja => HEADERS_JA,
            Self::En => HEADERS_EN,
        }
    }

    pub fn format_date(self, date: WorkDate) -> String {
        match self {
            Self::Ja => date.format("%Y/%-m/%-d").to_string(),
            Self::En => date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn format_time(self, at: Timestamp, tz: Tz) -> String {
        let local = at.with_timezone(&tz);
        match self {
            Self::Ja => local.format("%-H:%M:%S").to_string(),
            Self::En => local.format("%H:%M:%S").to_string(),
        }
    }

    pub fn format_duration(self, minutes: i32) -> String {
        let (hours, minutes) = (minutes / 60, minutes % 60);
        match self {
            Self::Ja => format!("{hours}時間{minutes}分"),
            Self::En => format!("{hours}h {minutes}m"),
        }
    }
}

impl fmt::Display for ExportLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ja => f.write_str("ja"),
            Self::En => f.write_str("en"),
        }
    }
}

impl FromStr for ExportLocale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ja" => Ok(Self::Ja),
            "en" => Ok(Self::En),
            other => Err(CoreError::Validation(format!(
                "Unknown export locale '{other}'. Must be one of: ja, en"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One attendance record as seen by the exporter.
#[derive(Debug, Clone)]
pub struct ExportEntry<'a> {
    pub work_date: WorkDate,
    pub clock_in_time: Option<Timestamp>,
    pub clock_out_time: Option<Timestamp>,
    pub work_minutes: Option<i32>,
    pub status: &'a str,
    pub clock_in_location: Option<&'a str>,
    pub clock_out_location: Option<&'a str>,
}

/// Render `entries` as a BOM-prefixed CSV document.
///
/// Rows keep the order given. Lines are joined with `\n` and the document
/// has no trailing newline.
pub fn render_attendance_csv(
    entries: &[ExportEntry<'_>],
    locale: ExportLocale,
    tz: Tz,
) -> Result<String, CoreError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(locale.headers())
        .map_err(|e| CoreError::Internal(format!("Failed to write CSV headers: {e}")))?;

    for entry in entries {
        let record = [
            locale.format_date(entry.work_date),
            entry
                .clock_in_time
                .map(|t| locale.format_time(t, tz))
                .unwrap_or_default(),
            entry
                .clock_out_time
                .map(|t| locale.format_time(t, tz))
                .unwrap_or_default(),
            entry
                .work_minutes
                .map(|m| locale.format_duration(m))
                .unwrap_or_default(),
            entry.status.to_string(),
            entry.clock_in_location.unwrap_or_default().to_string(),
            entry.clock_out_location.unwrap_or_default().to_string(),
        ];
        writer
            .write_record(&record)
            .map_err(|e| CoreError::Internal(format!("Failed to write CSV row: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Internal(format!("Failed to flush CSV writer: {e}")))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| CoreError::Internal(format!("CSV output is not UTF-8: {e}")))?;

    let mut document = String::with_capacity(body.len() + BOM.len_utf8());
    document.push(BOM);
    document.push_str(body.trim_end_matches('\n'));
    Ok(document)
}

/// Download file name for a monthly export.
pub fn export_file_name(year: i32, month: u32) -> String {
    format!("attendance-{year}-{month}.csv")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
