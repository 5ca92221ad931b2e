use super::super::domain::{EntityKind, ReportingPeriod};
use super::super::scoring::Cadence;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreEntry {
    pub entity_id: String,
    pub entity_kind: EntityKind,
    pub name: String,
    pub department_name: String,
    pub cadence: Cadence,
    pub cadence_label: &'static str,
    pub reported_days: u32,
    pub target_days: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowUpEntry {
    pub area_id: String,
    pub area_name: String,
    pub department_name: String,
    pub missed_days: usize,
    pub pending_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReportSummary {
    pub period: ReportingPeriod,
    pub period_label: String,
    pub today: NaiveDate,
    pub areas: Vec<ScoreEntry>,
    pub employees: Vec<ScoreEntry>,
    pub departments: Vec<ScoreEntry>,
    pub follow_ups: Vec<FollowUpEntry>,
}
