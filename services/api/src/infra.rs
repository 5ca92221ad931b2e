use async_trait::async_trait;
use chrono::NaiveDate;
use genba_compliance::error::AppError;
use genba_compliance::workflows::genba::activities::{
    ActivityRepository, GenbaDirectory, RepositoryError,
};
use genba_compliance::workflows::genba::{
    parse_calendar_date, ActivityCsvImporter, ActivityRecord, ComplianceScorer,
    DataSourceError, Department, GenbaArea, GenbaDataSource, MemoryPreferenceStore,
    ReportingPeriod, SoTemplate, UserProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared handles for the genba endpoints.
#[derive(Clone)]
pub(crate) struct GenbaState {
    pub(crate) store: InMemoryGenbaStore,
    pub(crate) scorer: Arc<ComplianceScorer>,
    pub(crate) preferences: MemoryPreferenceStore,
}

#[derive(Debug, Default)]
struct StoreData {
    areas: Vec<GenbaArea>,
    users: Vec<UserProfile>,
    activities: Vec<ActivityRecord>,
}

/// Process-local stand-in for the remote genba API. It backs activity intake
/// and serves the dashboard loader from the same data.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryGenbaStore {
    data: Arc<Mutex<StoreData>>,
}

impl InMemoryGenbaStore {
    pub(crate) fn seeded(
        areas: Vec<GenbaArea>,
        users: Vec<UserProfile>,
        activities: Vec<ActivityRecord>,
    ) -> Self {
        Self {
            data: Arc::new(Mutex::new(StoreData {
                areas,
                users,
                activities,
            })),
        }
    }

    /// Seed from CSV exports. Areas are required once any file is given.
    pub(crate) fn from_csv(sources: &CsvSources) -> Result<Self, AppError> {
        let areas = match &sources.areas {
            Some(path) => ActivityCsvImporter::areas_from_path(path)?,
            None => Vec::new(),
        };
        let users = match &sources.users {
            Some(path) => ActivityCsvImporter::users_from_path(path)?,
            None => Vec::new(),
        };
        let activities = match &sources.activities {
            Some(path) => ActivityCsvImporter::activities_from_path(path)?,
            None => Vec::new(),
        };
        Ok(Self::seeded(areas, users, activities))
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreData>, RepositoryError> {
        self.data
            .lock()
            .map_err(|_| RepositoryError::Unavailable("genba store mutex poisoned".to_string()))
    }

    fn snapshot<T, F>(&self, resource: &'static str, read: F) -> Result<T, DataSourceError>
    where
        F: FnOnce(&StoreData) -> T,
    {
        let guard = self.lock().map_err(|err| DataSourceError::Request {
            resource,
            message: err.to_string(),
        })?;
        Ok(read(&guard))
    }
}

/// Optional CSV exports used to seed the store.
#[derive(Debug, Default, Clone)]
pub(crate) struct CsvSources {
    pub(crate) areas: Option<PathBuf>,
    pub(crate) users: Option<PathBuf>,
    pub(crate) activities: Option<PathBuf>,
}

impl ActivityRepository for InMemoryGenbaStore {
    fn insert(&self, record: ActivityRecord) -> Result<ActivityRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.activities.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.activities.push(record.clone());
        Ok(record)
    }

    fn list(
        &self,
        period: Option<ReportingPeriod>,
    ) -> Result<Vec<ActivityRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .activities
            .iter()
            .filter(|record| period.map_or(true, |period| period.contains(record.date)))
            .cloned()
            .collect())
    }
}

impl GenbaDirectory for InMemoryGenbaStore {
    fn area(&self, id: &str) -> Result<Option<GenbaArea>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.areas.iter().find(|area| area.id == id).cloned())
    }

    fn user(&self, id: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.users.iter().find(|user| user.id == id).cloned())
    }
}

#[async_trait]
impl GenbaDataSource for InMemoryGenbaStore {
    async fn areas(&self) -> Result<Vec<GenbaArea>, DataSourceError> {
        self.snapshot("areas", |data| data.areas.clone())
    }

    async fn users(&self) -> Result<Vec<UserProfile>, DataSourceError> {
        self.snapshot("users", |data| data.users.clone())
    }

    async fn departments(&self) -> Result<Vec<Department>, DataSourceError> {
        // Departments are derived from areas when building reports.
        Ok(Vec::new())
    }

    async fn activities(
        &self,
        period: ReportingPeriod,
    ) -> Result<Vec<ActivityRecord>, DataSourceError> {
        self.snapshot("activities", |data| {
            data.activities
                .iter()
                .filter(|record| period.contains(record.date))
                .cloned()
                .collect()
        })
    }

    async fn so_templates(&self) -> Result<Vec<SoTemplate>, DataSourceError> {
        Ok(Vec::new())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(raw).map_err(|err| format!("{err} (expected YYYY-MM-DD)"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
