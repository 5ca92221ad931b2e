use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One calendar month. `month` is 0-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct ReportingPeriod {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for ReportingPeriod {
    type Error = GenbaError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month)
    }
}

impl ReportingPeriod {
    pub fn new(year: i32, month_index: u32) -> Result<Self, GenbaError> {
        if month_index > 11 || NaiveDate::from_ymd_opt(year, month_index + 1, 1).is_none() {
            return Err(GenbaError::InvalidPeriod {
                year,
                month: month_index,
            });
        }

        Ok(Self {
            year,
            month: month_index,
        })
    }

    /// Build from a human month number (1 = January).
    pub fn from_month_number(year: i32, month_number: u32) -> Result<Self, GenbaError> {
        match month_number.checked_sub(1) {
            Some(index) => Self::new(year, index),
            None => Err(GenbaError::InvalidPeriod { year, month: 0 }),
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_index(&self) -> u32 {
        self.month
    }

    pub fn month_number(&self) -> u32 {
        self.month + 1
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 11 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 2)
        };

        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(0)
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, day)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month()).filter_map(move |day| self.day(day))
    }

    /// Field comparison only; no instant arithmetic is involved.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize], self.year)
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

/// Parse the calendar date a user sees. Offset timestamps keep the date as
/// written; they are never shifted into UTC first.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, GenbaError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GenbaError::InvalidDate(raw.to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }

    Err(GenbaError::InvalidDate(raw.to_string()))
}

pub(crate) fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

/// Photo evidence attached to an activity. Opaque to scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAttachment {
    pub file_name: String,
    pub storage_key: String,
}

/// A dated attestation that a work area was attended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub reporter_id: String,
    #[serde(default)]
    pub reporter_name: String,
    #[serde(default)]
    pub nik: String,
    pub area_id: String,
    #[serde(default)]
    pub area_name: String,
    pub department_name: String,
    #[serde(default, alias = "keterangan")]
    pub description: String,
    #[serde(default)]
    pub photos: Vec<PhotoAttachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Area,
    Employee,
    Department,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::Employee => "Employee",
            Self::Department => "Department",
        }
    }
}

/// The subject a compliance score is computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingEntity {
    pub id: String,
    pub kind: EntityKind,
    pub name: String,
    pub department_name: String,
    #[serde(alias = "is_daily_reporting")]
    pub is_default: bool,
}

impl ReportingEntity {
    pub fn area(
        id: impl Into<String>,
        name: impl Into<String>,
        department_name: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Area,
            name: name.into(),
            department_name: department_name.into(),
            is_default,
        }
    }

    pub fn employee(
        id: impl Into<String>,
        name: impl Into<String>,
        department_name: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Employee,
            name: name.into(),
            department_name: department_name.into(),
            is_default,
        }
    }

    pub fn department(name: impl Into<String>, is_default: bool) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            kind: EntityKind::Department,
            department_name: name.clone(),
            name,
            is_default,
        }
    }

    /// Whether `record` belongs to this entity.
    pub fn owns(&self, record: &ActivityRecord) -> bool {
        match self.kind {
            EntityKind::Area => record.area_id == self.id,
            EntityKind::Employee => record.reporter_id == self.id,
            EntityKind::Department => record.department_name == self.department_name,
        }
    }

    pub fn records_for<'a>(&self, records: &'a [ActivityRecord]) -> Vec<&'a ActivityRecord> {
        records.iter().filter(|record| self.owns(record)).collect()
    }
}

/// Per-day status used to color calendar cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStatus {
    HasReport,
    TodayEmpty,
    PastEmpty,
    Empty,
}

impl DayStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HasReport => "Reported",
            Self::TodayEmpty => "Pending today",
            Self::PastEmpty => "Overdue",
            Self::Empty => "No report expected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenbaError {
    #[error("invalid reporting period {year}/{month} (month index must be 0-11)")]
    InvalidPeriod { year: i32, month: u32 },
    #[error("could not read '{0}' as a calendar date")]
    InvalidDate(String),
}
