use super::domain::{ActivityRecord, ReportingEntity, ReportingPeriod};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Absent daily-reporting flags mean daily reporting, for every source.
fn default_true() -> bool {
    true
}

/// Work area subject to genba reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenbaArea {
    pub id: String,
    pub name: String,
    pub department_name: String,
    #[serde(default)]
    pub pic_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_default: bool,
}

impl GenbaArea {
    pub fn as_entity(&self) -> ReportingEntity {
        ReportingEntity::area(&self.id, &self.name, &self.department_name, self.is_default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nik: String,
    pub department_name: String,
    #[serde(default = "default_true")]
    pub is_default: bool,
}

impl UserProfile {
    pub fn as_entity(&self) -> ReportingEntity {
        ReportingEntity::employee(&self.id, &self.name, &self.department_name, self.is_default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_default: bool,
}

impl Department {
    pub fn as_entity(&self) -> ReportingEntity {
        ReportingEntity::department(&self.name, self.is_default)
    }
}

/// Committee role held by a user in an organisational-structure template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoAssignment {
    pub role: String,
    pub user_id: String,
}

/// Organisational-structure (SO) template used for escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoTemplate {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub assignments: Vec<SoAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    #[error("{resource} request failed: {message}")]
    Request {
        resource: &'static str,
        message: String,
    },
    #[error("{resource} response did not match the expected schema: {message}")]
    Schema {
        resource: &'static str,
        message: String,
    },
}

/// Typed client for the remote genba data API.
#[async_trait]
pub trait GenbaDataSource: Send + Sync {
    async fn areas(&self) -> Result<Vec<GenbaArea>, DataSourceError>;
    async fn users(&self) -> Result<Vec<UserProfile>, DataSourceError>;
    async fn departments(&self) -> Result<Vec<Department>, DataSourceError>;
    async fn activities(
        &self,
        period: ReportingPeriod,
    ) -> Result<Vec<ActivityRecord>, DataSourceError>;
    async fn so_templates(&self) -> Result<Vec<SoTemplate>, DataSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error("activity {activity_id} references unknown area {area_id}")]
    UnknownArea {
        activity_id: String,
        area_id: String,
    },
    #[error("activity {activity_id} dated {date} falls outside {period}")]
    OutsidePeriod {
        activity_id: String,
        date: chrono::NaiveDate,
        period: ReportingPeriod,
    },
}

/// Everything a monthly dashboard view needs, fetched in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub period: ReportingPeriod,
    pub areas: Vec<GenbaArea>,
    pub users: Vec<UserProfile>,
    pub departments: Vec<Department>,
    pub activities: Vec<ActivityRecord>,
    pub so_templates: Vec<SoTemplate>,
}

impl DashboardSnapshot {
    /// Reject the whole snapshot if any activity cannot be attributed.
    pub fn validate(&self) -> Result<(), LoadError> {
        let known_areas: BTreeSet<&str> = self.areas.iter().map(|area| area.id.as_str()).collect();

        for activity in &self.activities {
            if !known_areas.contains(activity.area_id.as_str()) {
                return Err(LoadError::UnknownArea {
                    activity_id: activity.id.clone(),
                    area_id: activity.area_id.clone(),
                });
            }
            if !self.period.contains(activity.date) {
                return Err(LoadError::OutsidePeriod {
                    activity_id: activity.id.clone(),
                    date: activity.date,
                    period: self.period,
                });
            }
        }

        Ok(())
    }

    pub fn active_so_template(&self) -> Option<&SoTemplate> {
        self.so_templates.iter().find(|template| template.is_active)
    }
}

/// Fetch all dashboard resources concurrently. The first failure aborts the
/// load; there is no retry and no partial result.
pub async fn load_dashboard<D>(
    source: &D,
    period: ReportingPeriod,
) -> Result<DashboardSnapshot, LoadError>
where
    D: GenbaDataSource + ?Sized,
{
    let (areas, users, departments, activities, so_templates) = tokio::try_join!(
        source.areas(),
        source.users(),
        source.departments(),
        source.activities(period),
        source.so_templates()
    )
    .map_err(|err| {
        warn!(%period, error = %err, "dashboard load failed");
        err
    })?;

    let snapshot = DashboardSnapshot {
        period,
        areas,
        users,
        departments,
        activities,
        so_templates,
    };
    snapshot.validate()?;

    debug!(
        %period,
        areas = snapshot.areas.len(),
        activities = snapshot.activities.len(),
        "dashboard snapshot loaded"
    );
    Ok(snapshot)
}
