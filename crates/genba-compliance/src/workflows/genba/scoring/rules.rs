use super::super::domain::{ActivityRecord, ReportingPeriod};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Which days of the week an entity is expected to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingDayRule {
    /// Production lines run every day of the week.
    EveryDay,
    Weekdays,
}

impl WorkingDayRule {
    pub fn for_production(is_production: bool) -> Self {
        if is_production {
            Self::EveryDay
        } else {
            Self::Weekdays
        }
    }

    pub fn is_working_day(self, date: NaiveDate) -> bool {
        match self {
            Self::EveryDay => true,
            Self::Weekdays => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }

    pub fn target_days(self, period: ReportingPeriod) -> u32 {
        period
            .dates()
            .filter(|date| self.is_working_day(*date))
            .count() as u32
    }
}

/// Distinct calendar days with at least one report inside `period`.
pub(crate) fn reported_days<'a, I>(
    records: I,
    period: ReportingPeriod,
    rule: Option<WorkingDayRule>,
) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    records
        .into_iter()
        .map(|record| record.date)
        .filter(|date| period.contains(*date))
        .filter(|date| rule.map_or(true, |rule| rule.is_working_day(*date)))
        .collect()
}

/// Distinct `(reporter, day)` pairs on working days inside `period`.
pub(crate) fn reporter_days<'a, I>(
    records: I,
    period: ReportingPeriod,
    rule: WorkingDayRule,
) -> BTreeSet<(&'a str, NaiveDate)>
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    records
        .into_iter()
        .filter(|record| period.contains(record.date) && rule.is_working_day(record.date))
        .map(|record| (record.reporter_id.as_str(), record.date))
        .collect()
}

pub(crate) fn coverage_percentage(covered: usize, target: u64) -> f64 {
    if target == 0 {
        return 0.0;
    }

    (covered as f64 / target as f64 * 100.0).min(100.0)
}
