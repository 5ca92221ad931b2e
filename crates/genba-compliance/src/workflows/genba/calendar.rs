use super::domain::{ActivityRecord, DayStatus, ReportingEntity, ReportingPeriod};
use super::scoring::{ScoringPolicy, WorkingDayRule};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// One cell of the monthly calendar widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// Presentation flag only; non-working days are still classified.
    pub working_day: bool,
    pub report_count: usize,
    pub status: DayStatus,
    pub status_label: &'static str,
}

/// Classify a single date for `entity`.
///
/// `records_for_month` must already be scoped to the entity; records on other
/// dates are ignored.
pub fn classify_day<'a, I>(
    date: NaiveDate,
    entity: &ReportingEntity,
    records_for_month: I,
    today: NaiveDate,
    rule: WorkingDayRule,
) -> DayStatus
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    let reported = records_for_month
        .into_iter()
        .any(|record| record.date == date);

    status_for(date, entity, reported, today, rule)
}

fn status_for(
    date: NaiveDate,
    entity: &ReportingEntity,
    reported: bool,
    today: NaiveDate,
    rule: WorkingDayRule,
) -> DayStatus {
    if reported {
        return DayStatus::HasReport;
    }

    if !entity.is_default || !rule.is_working_day(date) {
        return DayStatus::Empty;
    }

    if date == today {
        DayStatus::TodayEmpty
    } else if date < today {
        DayStatus::PastEmpty
    } else {
        DayStatus::Empty
    }
}

/// Build every cell of `period` for `entity`, one entry per day 1..=N.
pub fn month_calendar<'a, I>(
    entity: &ReportingEntity,
    records: I,
    period: ReportingPeriod,
    today: NaiveDate,
    policy: &ScoringPolicy,
) -> Vec<CalendarDay>
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    let rule = WorkingDayRule::for_production(policy.is_production(&entity.department_name));
    let mut counts = vec![0usize; period.days_in_month() as usize];
    for record in records {
        if period.contains(record.date) {
            counts[record.date.day0() as usize] += 1;
        }
    }

    period
        .dates()
        .map(|date| {
            let report_count = counts[date.day0() as usize];
            let status = status_for(date, entity, report_count > 0, today, rule);
            CalendarDay {
                day: date.day(),
                date,
                weekday: date.weekday(),
                working_day: rule.is_working_day(date),
                report_count,
                status,
                status_label: status.label(),
            }
        })
        .collect()
}

/// Count of overdue (`past-empty`) cells, used for follow-up lists.
pub fn missed_days(calendar: &[CalendarDay]) -> usize {
    calendar
        .iter()
        .filter(|day| day.status == DayStatus::PastEmpty)
        .count()
}
