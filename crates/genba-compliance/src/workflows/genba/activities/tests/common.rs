use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::genba::activities::{
    activity_router, ActivityRepository, ActivitySubmission, GenbaActivityService,
    GenbaDirectory, RepositoryError,
};
use crate::workflows::genba::domain::{ActivityRecord, ReportingPeriod};
use crate::workflows::genba::loader::{GenbaArea, UserProfile};

pub(super) fn submission() -> ActivitySubmission {
    ActivitySubmission {
        area_id: "area-1".to_string(),
        reporter_id: "u-1".to_string(),
        date: "2025-07-03".to_string(),
        description: "Sorted the die rack".to_string(),
        photos: Vec::new(),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: Mutex<Vec<ActivityRecord>>,
}

impl ActivityRepository for MemoryRepository {
    fn insert(&self, record: ActivityRecord) -> Result<ActivityRecord, RepositoryError> {
        let mut guard = self.records.lock().unwrap();
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn list(
        &self,
        period: Option<ReportingPeriod>,
    ) -> Result<Vec<ActivityRecord>, RepositoryError> {
        let guard = self.records.lock().unwrap();
        Ok(guard
            .iter()
            .filter(|record| period.map_or(true, |period| period.contains(record.date)))
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl ActivityRepository for ConflictRepository {
    fn insert(&self, _record: ActivityRecord) -> Result<ActivityRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn list(
        &self,
        _period: Option<ReportingPeriod>,
    ) -> Result<Vec<ActivityRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ActivityRepository for UnavailableRepository {
    fn insert(&self, _record: ActivityRecord) -> Result<ActivityRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(
        &self,
        _period: Option<ReportingPeriod>,
    ) -> Result<Vec<ActivityRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct StaticDirectory {
    areas: HashMap<String, GenbaArea>,
    users: HashMap<String, UserProfile>,
}

impl Default for StaticDirectory {
    fn default() -> Self {
        let areas = [
            area("area-1", "Press Line", "Production"),
            area("area-2", "Main Warehouse", "Logistics"),
        ];
        let users = [
            user("u-1", "Budi Santoso", "7001", "Production"),
            user("u-2", "Sari Wulandari", "7002", "Logistics"),
        ];
        Self {
            areas: areas.into_iter().map(|a| (a.id.clone(), a)).collect(),
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }
}

impl GenbaDirectory for StaticDirectory {
    fn area(&self, id: &str) -> Result<Option<GenbaArea>, RepositoryError> {
        Ok(self.areas.get(id).cloned())
    }

    fn user(&self, id: &str) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.users.get(id).cloned())
    }
}

pub(super) fn area(id: &str, name: &str, department: &str) -> GenbaArea {
    GenbaArea {
        id: id.to_string(),
        name: name.to_string(),
        department_name: department.to_string(),
        pic_id: None,
        is_default: true,
    }
}

pub(super) fn user(id: &str, name: &str, nik: &str, department: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: name.to_string(),
        nik: nik.to_string(),
        department_name: department.to_string(),
        is_default: true,
    }
}

pub(super) type TestService = GenbaActivityService<MemoryRepository, StaticDirectory>;

pub(super) fn build_service() -> (Arc<TestService>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(GenbaActivityService::new(
        repository.clone(),
        Arc::new(StaticDirectory::default()),
    ));
    (service, repository)
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    activity_router(service)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn assert_error_status(response: Response, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let body = json_body(response).await;
    body["error"].as_str().expect("error message").to_string()
}
