use chrono::NaiveDate;
use genba_compliance::workflows::genba::{
    ActivityFilter, ActivityRecord, Priority, ReportingPeriod, TaskFilter, TaskRecord,
    TaskStatus, WorkOrder, WorkOrderFilter, WorkOrderStatus,
};

fn activity(
    id: &str,
    reporter: &str,
    area: &str,
    nik: &str,
    y: i32,
    m: u32,
    d: u32,
) -> ActivityRecord {
    ActivityRecord {
        id: id.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
        reporter_id: format!("u-{nik}"),
        reporter_name: reporter.to_string(),
        nik: nik.to_string(),
        area_id: format!("area-{area}"),
        area_name: area.to_string(),
        department_name: "Production".to_string(),
        description: String::new(),
        photos: Vec::new(),
    }
}

fn activities() -> Vec<ActivityRecord> {
    vec![
        activity("a1", "Budi Santoso", "Press Line", "7001", 2025, 7, 1),
        activity("a2", "Sari Wulandari", "Paint Booth", "7002", 2025, 7, 2),
        activity("a3", "Budi Santoso", "Paint Booth", "7001", 2025, 8, 1),
        activity("a4", "Agus", "Press Line", "7013", 2025, 6, 30),
    ]
}

fn work_order(id: &str, status: WorkOrderStatus, priority: Priority, asset: &str) -> WorkOrder {
    WorkOrder {
        id: id.to_string(),
        title: format!("Repair {asset}"),
        description: "Reported during genba walk".to_string(),
        asset_name: asset.to_string(),
        status,
        priority,
        requested_on: NaiveDate::from_ymd_opt(2025, 7, 10).expect("valid"),
    }
}

fn work_orders() -> Vec<WorkOrder> {
    vec![
        work_order("wo-1", WorkOrderStatus::Open, Priority::High, "Hydraulic Press"),
        work_order("wo-2", WorkOrderStatus::Completed, Priority::Low, "Forklift"),
        work_order("wo-3", WorkOrderStatus::InProgress, Priority::High, "Compressor"),
        work_order("wo-4", WorkOrderStatus::Cancelled, Priority::Medium, "Press Guard"),
    ]
}

fn ids<T, F: Fn(&T) -> &str>(items: &[T], id: F) -> Vec<&str> {
    items.iter().map(id).collect()
}

#[test]
fn activity_search_spans_reporter_area_and_nik() {
    let records = activities();
    let july = ReportingPeriod::new(2025, 6).expect("july");

    let by_area = ActivityFilter::default().with_search("press").with_period(july);
    assert_eq!(ids(&by_area.apply(&records), |a| a.id.as_str()), vec!["a1"]);

    let by_nik = ActivityFilter::default().with_search("7001");
    assert_eq!(ids(&by_nik.apply(&records), |a| a.id.as_str()), vec!["a1", "a3"]);

    let by_name = ActivityFilter::default().with_search("WULAN");
    assert_eq!(ids(&by_name.apply(&records), |a| a.id.as_str()), vec!["a2"]);
}

#[test]
fn filtering_twice_changes_nothing() {
    let records = activities();
    let filters = [
        ActivityFilter::default(),
        ActivityFilter::default().with_search("budi"),
        ActivityFilter::default().with_period(ReportingPeriod::new(2025, 6).unwrap()),
        ActivityFilter::default()
            .with_search("paint")
            .with_period(ReportingPeriod::new(2025, 7).unwrap()),
    ];
    for filter in filters {
        let once = filter.apply(&records);
        assert_eq!(filter.apply(&once), once, "{filter:?}");
    }

    let orders = work_orders();
    let filter = WorkOrderFilter::default()
        .with_statuses([WorkOrderStatus::Open, WorkOrderStatus::InProgress])
        .with_search("press");
    let once = filter.apply(&orders);
    assert_eq!(filter.apply(&once), once);
}

#[test]
fn empty_facet_sets_filter_nothing() {
    let orders = work_orders();
    let unfiltered = WorkOrderFilter::default().apply(&orders);
    assert_eq!(unfiltered, orders);

    let high_only = WorkOrderFilter::default().with_priorities([Priority::High]);
    let with_empty_statuses = high_only.clone().with_statuses(Vec::new());
    assert_eq!(high_only.apply(&orders), with_empty_statuses.apply(&orders));
    assert_eq!(
        ids(&high_only.apply(&orders), |o| o.id.as_str()),
        vec!["wo-1", "wo-3"]
    );
}

#[test]
fn facets_and_search_are_anded() {
    let orders = work_orders();
    let filter = WorkOrderFilter::default()
        .with_statuses([WorkOrderStatus::Open, WorkOrderStatus::Cancelled])
        .with_priorities([Priority::High, Priority::Medium])
        .with_search("press");
    assert_eq!(
        ids(&filter.apply(&orders), |o| o.id.as_str()),
        vec!["wo-1", "wo-4"]
    );

    let narrower = filter.with_priorities([Priority::Medium]);
    assert_eq!(ids(&narrower.apply(&orders), |o| o.id.as_str()), vec!["wo-4"]);
}

#[test]
fn task_filter_uses_title_and_description() {
    let tasks = vec![
        TaskRecord {
            id: "t1".to_string(),
            title: "Audit press line".to_string(),
            description: "Monthly sustain check".to_string(),
            status: TaskStatus::Todo,
            priority: Priority::High,
            due_date: None,
        },
        TaskRecord {
            id: "t2".to_string(),
            title: "Label shelves".to_string(),
            description: "Set in order".to_string(),
            status: TaskStatus::Done,
            priority: Priority::Low,
            due_date: None,
        },
    ];

    let filter = TaskFilter::default().with_search("SUSTAIN");
    assert_eq!(ids(&filter.apply(&tasks), |t| t.id.as_str()), vec!["t1"]);
    assert!(TaskFilter::default()
        .with_search("sustain")
        .with_statuses([TaskStatus::Done])
        .apply(&tasks)
        .is_empty());
}
