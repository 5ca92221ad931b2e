use chrono::{Datelike, NaiveDate, Weekday};
use genba_compliance::workflows::genba::{
    classify_day, missed_days, month_calendar, ActivityRecord, DayStatus, ReportingEntity,
    ReportingPeriod, ScoringPolicy, WorkingDayRule,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, day).expect("valid july date")
}

fn report(area_id: &str, department: &str, day: u32) -> ActivityRecord {
    ActivityRecord {
        id: format!("{area_id}-{day}"),
        date: date(day),
        reporter_id: "u1".to_string(),
        reporter_name: "Budi".to_string(),
        nik: "7001".to_string(),
        area_id: area_id.to_string(),
        area_name: area_id.to_string(),
        department_name: department.to_string(),
        description: "Set in order".to_string(),
        photos: Vec::new(),
    }
}

fn july() -> ReportingPeriod {
    ReportingPeriod::new(2025, 6).expect("july")
}

#[test]
fn every_day_gets_exactly_one_cell() {
    let area = ReportingEntity::area("wh-1", "Main Warehouse", "Logistics", true);
    let records = vec![report("wh-1", "Logistics", 3)];
    let policy = ScoringPolicy::default();

    let calendar = month_calendar(&area, &records, july(), date(15), &policy);

    assert_eq!(calendar.len(), 31);
    for (index, cell) in calendar.iter().enumerate() {
        assert_eq!(cell.day as usize, index + 1);
        assert_eq!(cell.date.month(), 7);
    }
}

#[test]
fn daily_area_shows_all_four_states() {
    let area = ReportingEntity::area("wh-1", "Main Warehouse", "Logistics", true);
    let records = vec![report("wh-1", "Logistics", 3), report("wh-1", "Logistics", 3)];
    let calendar = month_calendar(&area, &records, july(), date(15), &ScoringPolicy::default());

    assert_eq!(calendar[2].status, DayStatus::HasReport);
    assert_eq!(calendar[2].report_count, 2);
    assert_eq!(calendar[1].status, DayStatus::PastEmpty);
    assert_eq!(calendar[14].status, DayStatus::TodayEmpty);
    assert_eq!(calendar[15].status, DayStatus::Empty);

    // Saturday 5 July is not a working day for logistics.
    assert_eq!(calendar[4].weekday, Weekday::Sat);
    assert!(!calendar[4].working_day);
    assert_eq!(calendar[4].status, DayStatus::Empty);

    // Weekdays 1..14 except the 3rd: 1,2,4,7,8,9,10,11,14.
    assert_eq!(missed_days(&calendar), 9);
}

#[test]
fn production_weekends_can_be_overdue() {
    let area = ReportingEntity::area("press", "Press Line", "Production", true);
    let none: Vec<ActivityRecord> = Vec::new();
    let calendar = month_calendar(&area, &none, july(), date(15), &ScoringPolicy::default());

    assert!(calendar[4].working_day);
    assert_eq!(calendar[4].status, DayStatus::PastEmpty);
    assert_eq!(missed_days(&calendar), 14);
}

#[test]
fn non_daily_entities_never_show_pending_states() {
    let area = ReportingEntity::area("meet", "Meeting Room", "General Affairs", false);
    let records = vec![report("meet", "General Affairs", 6)];
    let policy = ScoringPolicy::default();

    for today in [date(1), date(15), date(31)] {
        let calendar = month_calendar(&area, &records, july(), today, &policy);
        for cell in &calendar {
            assert!(
                matches!(cell.status, DayStatus::HasReport | DayStatus::Empty),
                "{} was {:?}",
                cell.date,
                cell.status
            );
        }
        assert_eq!(calendar[5].status, DayStatus::HasReport);
    }
}

#[test]
fn classify_day_matches_the_month_view() {
    let area = ReportingEntity::area("wh-1", "Main Warehouse", "Logistics", true);
    let records = vec![report("wh-1", "Logistics", 10)];
    let policy = ScoringPolicy::default();
    let calendar = month_calendar(&area, &records, july(), date(20), &policy);

    for cell in calendar {
        let status = classify_day(cell.date, &area, &records, date(20), WorkingDayRule::Weekdays);
        assert_eq!(status, cell.status, "{}", cell.date);
    }
}

#[test]
fn a_month_entirely_in_the_future_is_empty() {
    let area = ReportingEntity::area("press", "Press Line", "Production", true);
    let none: Vec<ActivityRecord> = Vec::new();
    let calendar = month_calendar(
        &area,
        &none,
        july(),
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        &ScoringPolicy::default(),
    );
    assert!(calendar.iter().all(|cell| cell.status == DayStatus::Empty));
}
