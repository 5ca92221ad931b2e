mod policy;
mod rules;

pub use policy::{ScoreRounding, ScoringPolicy, DEFAULT_PRODUCTION_DEPARTMENT};
pub use rules::WorkingDayRule;

use super::domain::{ActivityRecord, EntityKind, ReportingEntity, ReportingPeriod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How an entity is expected to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Every applicable working day, scored proportionally.
    Daily,
    /// Any report in the month scores 100.
    Presence,
}

impl Cadence {
    pub fn for_entity(entity: &ReportingEntity) -> Self {
        if entity.is_default {
            Self::Daily
        } else {
            Self::Presence
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Presence => "Non-Daily",
        }
    }
}

/// Compliance percentage for one (entity, month) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub entity_id: String,
    pub entity_kind: EntityKind,
    pub entity_name: String,
    pub period: ReportingPeriod,
    pub cadence: Cadence,
    pub target_days: u32,
    pub reported_days: u32,
    pub raw_percentage: f64,
    pub percentage: f64,
}

/// Stateless scorer; one instance carries the single rounding policy used
/// for areas, employees and departments alike.
#[derive(Debug, Clone, Default)]
pub struct ComplianceScorer {
    policy: ScoringPolicy,
}

impl ComplianceScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn working_day_rule(&self, entity: &ReportingEntity) -> WorkingDayRule {
        WorkingDayRule::for_production(self.policy.is_production(&entity.department_name))
    }

    /// Score an area or employee. `records` may span any dates; only those in
    /// `period` are counted, and each calendar day counts once.
    pub fn score<'a, I>(
        &self,
        entity: &ReportingEntity,
        records: I,
        period: ReportingPeriod,
    ) -> ComplianceScore
    where
        I: IntoIterator<Item = &'a ActivityRecord>,
    {
        let rule = self.working_day_rule(entity);
        let target_days = rule.target_days(period);
        let cadence = Cadence::for_entity(entity);

        let (reported_days, raw_percentage) = match cadence {
            Cadence::Presence => {
                // No weekday filter: a Sunday report still proves presence.
                let days = rules::reported_days(records, period, None);
                (days.len(), presence_percentage(!days.is_empty()))
            }
            Cadence::Daily => {
                let days = rules::reported_days(records, period, Some(rule));
                let raw = rules::coverage_percentage(days.len(), target_days as u64);
                (days.len(), raw)
            }
        };

        self.finish(entity, period, cadence, target_days, reported_days as u32, raw_percentage)
    }

    /// Score a department by reporter-day coverage across all of its members.
    ///
    /// The denominator is `target_days * max(expected_reporters, observed)`, so
    /// a reporter missing from the roster never pushes coverage past 100%.
    pub fn score_department<'a, I>(
        &self,
        department: &ReportingEntity,
        expected_reporters: usize,
        records: I,
        period: ReportingPeriod,
    ) -> ComplianceScore
    where
        I: IntoIterator<Item = &'a ActivityRecord>,
    {
        let rule = self.working_day_rule(department);
        let target_days = rule.target_days(period);
        let cadence = Cadence::for_entity(department);
        let scoped: Vec<&ActivityRecord> = records
            .into_iter()
            .filter(|record| record.department_name == department.department_name)
            .collect();

        let (reported_days, raw_percentage) = match cadence {
            Cadence::Presence => {
                let days = rules::reported_days(scoped.iter().copied(), period, None);
                (days.len(), presence_percentage(!days.is_empty()))
            }
            Cadence::Daily => {
                let pairs = rules::reporter_days(scoped.iter().copied(), period, rule);
                let observed: BTreeSet<&str> =
                    pairs.iter().map(|(reporter, _)| *reporter).collect();
                let reporters = expected_reporters.max(observed.len()) as u64;
                let raw = rules::coverage_percentage(pairs.len(), target_days as u64 * reporters);
                let days: BTreeSet<_> = pairs.iter().map(|(_, date)| *date).collect();
                (days.len(), raw)
            }
        };

        self.finish(
            department,
            period,
            cadence,
            target_days,
            reported_days as u32,
            raw_percentage,
        )
    }

    fn finish(
        &self,
        entity: &ReportingEntity,
        period: ReportingPeriod,
        cadence: Cadence,
        target_days: u32,
        reported_days: u32,
        raw_percentage: f64,
    ) -> ComplianceScore {
        let raw_percentage = if raw_percentage.is_finite() {
            raw_percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };

        ComplianceScore {
            entity_id: entity.id.clone(),
            entity_kind: entity.kind,
            entity_name: entity.name.clone(),
            period,
            cadence,
            target_days,
            reported_days,
            raw_percentage,
            percentage: self.policy.rounding().apply(raw_percentage),
        }
    }
}

fn presence_percentage(reported: bool) -> f64 {
    if reported {
        100.0
    } else {
        0.0
    }
}
