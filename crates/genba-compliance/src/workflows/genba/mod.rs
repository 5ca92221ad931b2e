//! Genba (5S) reporting: monthly compliance scoring, the per-day calendar
//! status used by the dashboards, and the shared list filter.

pub mod activities;
pub mod calendar;
pub mod debounce;
pub mod domain;
pub mod filter;
pub mod import;
pub mod loader;
pub mod preferences;
pub mod report;
pub mod scoring;
pub mod tasks;

pub use calendar::{classify_day, missed_days, month_calendar, CalendarDay};
pub use debounce::SearchDebouncer;
pub use domain::{
    parse_calendar_date, ActivityRecord, DayStatus, EntityKind, GenbaError, PhotoAttachment,
    ReportingEntity, ReportingPeriod,
};
pub use filter::{
    ActivityFilter, Filterable, ListFilter, NoFacet, TaskFilter, WorkOrderFilter,
};
pub use import::{ActivityCsvImporter, ActivityImportError};
pub use loader::{
    load_dashboard, DashboardSnapshot, DataSourceError, Department, GenbaArea,
    GenbaDataSource, LoadError, SoAssignment, SoTemplate, UserProfile,
};
pub use preferences::{
    MemoryPreferenceStore, PreferenceError, PreferenceStore, TaskBoard, UiPreferences,
};
pub use report::ComplianceReport;
pub use scoring::{
    Cadence, ComplianceScore, ComplianceScorer, ScoreRounding, ScoringPolicy, WorkingDayRule,
};
pub use tasks::{
    Priority, TaskRecord, TaskStatus, TaskView, WorkOrder, WorkOrderStatus, WorkOrderView,
};
