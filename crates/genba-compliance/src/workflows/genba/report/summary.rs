use super::super::calendar::{missed_days, month_calendar};
use super::super::domain::{DayStatus, ReportingEntity, ReportingPeriod};
use super::super::loader::DashboardSnapshot;
use super::super::scoring::{ComplianceScore, ComplianceScorer};
use super::views::{ComplianceReportSummary, FollowUpEntry, ScoreEntry};
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct ScoredEntity {
    pub entity: ReportingEntity,
    pub score: ComplianceScore,
}

impl ScoredEntity {
    fn to_entry(&self) -> ScoreEntry {
        ScoreEntry {
            entity_id: self.entity.id.clone(),
            entity_kind: self.entity.kind,
            name: self.entity.name.clone(),
            department_name: self.entity.department_name.clone(),
            cadence: self.score.cadence,
            cadence_label: self.score.cadence.label(),
            reported_days: self.score.reported_days,
            target_days: self.score.target_days,
            percentage: self.score.percentage,
        }
    }
}

/// Monthly compliance figures for every area, employee and department in a
/// dashboard snapshot, all scored with the same policy.
#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub period: ReportingPeriod,
    pub today: NaiveDate,
    pub areas: Vec<ScoredEntity>,
    pub employees: Vec<ScoredEntity>,
    pub departments: Vec<ScoredEntity>,
    pub follow_ups: Vec<FollowUpEntry>,
}

impl ComplianceReport {
    pub fn build(
        snapshot: &DashboardSnapshot,
        today: NaiveDate,
        scorer: &ComplianceScorer,
    ) -> Self {
        let period = snapshot.period;
        let activities = &snapshot.activities;

        let mut areas = Vec::with_capacity(snapshot.areas.len());
        let mut follow_ups = Vec::new();
        for area in &snapshot.areas {
            let entity = area.as_entity();
            let owned = entity.records_for(activities);
            let score = scorer.score(&entity, owned.iter().copied(), period);

            if entity.is_default {
                let calendar =
                    month_calendar(&entity, owned.iter().copied(), period, today, scorer.policy());
                let missed = missed_days(&calendar);
                let pending_today = calendar
                    .iter()
                    .any(|day| day.status == DayStatus::TodayEmpty);
                if missed > 0 || pending_today {
                    follow_ups.push(FollowUpEntry {
                        area_id: entity.id.clone(),
                        area_name: entity.name.clone(),
                        department_name: entity.department_name.clone(),
                        missed_days: missed,
                        pending_today,
                    });
                }
            }

            areas.push(ScoredEntity { entity, score });
        }

        let employees = snapshot
            .users
            .iter()
            .map(|user| {
                let entity = user.as_entity();
                let score = scorer.score(&entity, entity.records_for(activities), period);
                ScoredEntity { entity, score }
            })
            .collect();

        let mut department_entities: Vec<ReportingEntity> = snapshot
            .departments
            .iter()
            .map(|department| department.as_entity())
            .collect();
        // Departments only known through their areas still get a score.
        let listed: BTreeSet<String> = department_entities
            .iter()
            .map(|entity| entity.department_name.clone())
            .collect();
        let unlisted: BTreeSet<&str> = snapshot
            .areas
            .iter()
            .map(|area| area.department_name.as_str())
            .filter(|name| !listed.contains(*name))
            .collect();
        department_entities.extend(
            unlisted
                .into_iter()
                .map(|name| ReportingEntity::department(name, true)),
        );

        let departments = department_entities
            .into_iter()
            .map(|entity| {
                let roster = snapshot
                    .users
                    .iter()
                    .filter(|user| {
                        user.is_default && user.department_name == entity.department_name
                    })
                    .count();
                let score = scorer.score_department(&entity, roster, activities, period);
                ScoredEntity { entity, score }
            })
            .collect();

        follow_ups.sort_by(|a, b| {
            b.missed_days
                .cmp(&a.missed_days)
                .then_with(|| a.area_name.cmp(&b.area_name))
        });

        Self {
            period,
            today,
            areas,
            employees,
            departments,
            follow_ups,
        }
    }

    pub fn summary(&self) -> ComplianceReportSummary {
        ComplianceReportSummary {
            period: self.period,
            period_label: self.period.label(),
            today: self.today,
            areas: sorted_entries(&self.areas),
            employees: sorted_entries(&self.employees),
            departments: sorted_entries(&self.departments),
            follow_ups: self.follow_ups.clone(),
        }
    }
}

fn sorted_entries(scored: &[ScoredEntity]) -> Vec<ScoreEntry> {
    let mut entries: Vec<ScoreEntry> = scored.iter().map(ScoredEntity::to_entry).collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}
