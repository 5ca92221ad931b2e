use crate::infra::{parse_date, CsvSources, InMemoryGenbaStore};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::Args;
use genba_compliance::config::AppConfig;
use genba_compliance::error::AppError;
use genba_compliance::workflows::genba::activities::{ActivitySubmission, GenbaActivityService};
use genba_compliance::workflows::genba::report::views::ComplianceReportSummary;
use genba_compliance::workflows::genba::{
    load_dashboard, missed_days, month_calendar, ActivityFilter, ActivityRecord, CalendarDay,
    ComplianceReport, ComplianceScorer, DayStatus, GenbaArea, ReportingEntity, ReportingPeriod,
    SearchDebouncer, UserProfile,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Genba area CSV export (id, name, department_name, pic_id, is_default)
    #[arg(long)]
    pub(crate) areas: PathBuf,
    /// Activity CSV export (id, date, reporter_id, reporter_name, nik, area_id, ...)
    #[arg(long)]
    pub(crate) activities: PathBuf,
    /// Optional user CSV export used for employee and department scores
    #[arg(long)]
    pub(crate) users: Option<PathBuf>,
    /// Year to score
    #[arg(long)]
    pub(crate) year: i32,
    /// Month to score (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub(crate) month: u32,
    /// Reporting date for calendar states (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the month calendar for this area id
    #[arg(long)]
    pub(crate) calendar: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date for the calendar (YYYY-MM-DD, defaults to 2025-07-15)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the activity intake portion of the demo.
    #[arg(long)]
    pub(crate) skip_intake: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        areas,
        activities,
        users,
        year,
        month,
        today,
        calendar,
    } = args;

    let config = AppConfig::load()?;
    let period = ReportingPeriod::from_month_number(year, month)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let store = InMemoryGenbaStore::from_csv(&CsvSources {
        areas: Some(areas),
        users,
        activities: Some(activities),
    })?;

    let snapshot = load_dashboard(&store, period).await?;
    let scorer = ComplianceScorer::new(config.compliance.policy());
    let report = ComplianceReport::build(&snapshot, today, &scorer);
    render_report(&report.summary());

    if let Some(area_id) = calendar {
        match snapshot.areas.iter().find(|area| area.id == area_id) {
            Some(area) => {
                let entity = area.as_entity();
                let days = month_calendar(
                    &entity,
                    entity.records_for(&snapshot.activities),
                    period,
                    today,
                    scorer.policy(),
                );
                render_calendar(&entity, &days);
            }
            None => println!("\nNo area with id '{area_id}' in the export"),
        }
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, skip_intake } = args;

    let config = AppConfig::load()?;
    let scorer = ComplianceScorer::new(config.compliance.policy());
    let period = ReportingPeriod::new(2025, 6)?;
    let today = today.unwrap_or_else(|| period.first_day() + chrono::Duration::days(14));

    println!(
        "Genba compliance demo ({}, production department '{}', rounding {:?})",
        period.label(),
        scorer.policy().production_department(),
        scorer.policy().rounding()
    );

    let warehouse = ReportingEntity::area("wh-1", "Main Warehouse", "Logistics", true);
    let press = ReportingEntity::area("press", "Press Line", "Production", true);
    let meeting_room = ReportingEntity::area("meet", "Meeting Room", "General Affairs", false);
    let rina = ReportingEntity::employee("u-9", "Rina", "Quality", true);

    let weekdays: Vec<NaiveDate> = period
        .dates()
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .collect();
    let mut records: Vec<ActivityRecord> = weekdays
        .iter()
        .take(10)
        .map(|date| demo_record(&warehouse, "u-2", "Sari", *date))
        .collect();
    records.extend(
        period
            .dates()
            .map(|date| demo_record(&press, "u-1", "Budi", date)),
    );
    if let Some(sunday) = period.dates().find(|date| date.weekday() == Weekday::Sun) {
        records.push(demo_record(&meeting_room, "u-4", "Agus", sunday));
    }

    println!("\nScenario scores");
    for entity in [&warehouse, &press, &meeting_room, &rina] {
        let score = scorer.score(entity, entity.records_for(&records), period);
        println!(
            "- {} [{} | {} | {}]: {} of {} target days reported -> {}%",
            entity.name,
            entity.kind.label(),
            entity.department_name,
            score.cadence.label(),
            score.reported_days,
            score.target_days,
            score.percentage
        );
    }

    let days = month_calendar(
        &warehouse,
        warehouse.records_for(&records),
        period,
        today,
        scorer.policy(),
    );
    render_calendar(&warehouse, &days);

    println!(
        "\nSearch debounce ({} ms)",
        config.compliance.search_debounce.as_millis()
    );
    let debouncer = SearchDebouncer::new(config.compliance.search_debounce);
    let keystroke_gap = debouncer.delay() / 3;
    let (first, second, third) = tokio::join!(
        debouncer.settle("p"),
        async {
            tokio::time::sleep(keystroke_gap).await;
            debouncer.settle("pr").await
        },
        async {
            tokio::time::sleep(keystroke_gap * 2).await;
            debouncer.settle("press").await
        }
    );
    let settled: Vec<&str> = [first, second, third].into_iter().flatten().collect();
    println!("- typed 'p', 'pr', 'press' -> searched {:?}", settled);
    for text in settled {
        let matches = ActivityFilter::default()
            .with_search(text)
            .with_period(period)
            .apply(&records);
        println!(
            "- '{}' matches {} activities in {}",
            text,
            matches.len(),
            period.label()
        );
    }

    if skip_intake {
        return Ok(());
    }

    println!("\nActivity intake demo");
    let store = InMemoryGenbaStore::seeded(
        vec![GenbaArea {
            id: warehouse.id.clone(),
            name: warehouse.name.clone(),
            department_name: warehouse.department_name.clone(),
            pic_id: Some("u-2".to_string()),
            is_default: true,
        }],
        vec![UserProfile {
            id: "u-2".to_string(),
            name: "Sari".to_string(),
            nik: "7002".to_string(),
            department_name: "Logistics".to_string(),
            is_default: true,
        }],
        Vec::new(),
    );
    let service = GenbaActivityService::new(Arc::new(store.clone()), Arc::new(store));

    let submissions = [
        ActivitySubmission {
            area_id: warehouse.id.clone(),
            reporter_id: "u-2".to_string(),
            date: today.to_string(),
            description: "Re-labelled racking in aisle 3".to_string(),
            photos: Vec::new(),
        },
        ActivitySubmission {
            area_id: warehouse.id.clone(),
            reporter_id: "u-2".to_string(),
            date: today.to_string(),
            description: String::new(),
            photos: Vec::new(),
        },
    ];
    for submission in submissions {
        match service.submit(submission) {
            Ok(record) => println!(
                "- Recorded {} for {} on {} by {}",
                record.id, record.area_name, record.date, record.reporter_name
            ),
            Err(err) => println!("- Submission rejected: {}", err),
        }
    }

    Ok(())
}

fn demo_record(
    area: &ReportingEntity,
    reporter_id: &str,
    reporter: &str,
    date: NaiveDate,
) -> ActivityRecord {
    ActivityRecord {
        id: format!("{}-{}", area.id, date),
        date,
        reporter_id: reporter_id.to_string(),
        reporter_name: reporter.to_string(),
        nik: String::new(),
        area_id: area.id.clone(),
        area_name: area.name.clone(),
        department_name: area.department_name.clone(),
        description: "5S walk".to_string(),
        photos: Vec::new(),
    }
}

pub(crate) fn render_report(summary: &ComplianceReportSummary) {
    println!(
        "Genba compliance for {} (as of {})",
        summary.period_label, summary.today
    );

    let sections = [
        ("Areas", &summary.areas),
        ("Employees", &summary.employees),
        ("Departments", &summary.departments),
    ];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        println!("\n{title}");
        for entry in entries {
            println!(
                "- {} ({}, {}): {}/{} days -> {}%",
                entry.name,
                entry.department_name,
                entry.cadence_label,
                entry.reported_days,
                entry.target_days,
                entry.percentage
            );
        }
    }

    if summary.follow_ups.is_empty() {
        println!("\nFollow-ups: none");
    } else {
        println!("\nFollow-ups");
        for entry in &summary.follow_ups {
            let pending = if entry.pending_today {
                ", today's report pending"
            } else {
                ""
            };
            println!(
                "- {} ({}): {} missed working days{}",
                entry.area_name, entry.department_name, entry.missed_days, pending
            );
        }
    }
}

/// `#` reported, `!` due today, `x` missed, `-` non-working day.
pub(crate) fn render_calendar(entity: &ReportingEntity, days: &[CalendarDay]) {
    println!(
        "\nCalendar for {} ({} missed)",
        entity.name,
        missed_days(days)
    );
    println!(" Mon Tue Wed Thu Fri Sat Sun");

    let mut line = String::new();
    if let Some(first) = days.first() {
        for _ in 0..first.weekday.num_days_from_monday() {
            line.push_str("    ");
        }
    }
    for day in days {
        line.push_str(&format!("{:>3}{}", day.day, day_marker(day)));
        if day.weekday == Weekday::Sun {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
}

fn day_marker(day: &CalendarDay) -> char {
    match day.status {
        DayStatus::HasReport => '#',
        DayStatus::TodayEmpty => '!',
        DayStatus::PastEmpty => 'x',
        DayStatus::Empty if !day.working_day => '-',
        DayStatus::Empty => ' ',
    }
}
