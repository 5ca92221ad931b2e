use super::domain::{ActivityRecord, ReportingPeriod};
use super::tasks::{Priority, TaskRecord, TaskStatus, WorkOrder, WorkOrderStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Facet type for records that carry no status or priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoFacet {}

/// Records the list views can search and narrow down.
pub trait Filterable {
    type Status: Ord;
    type Priority: Ord;

    fn record_date(&self) -> Option<NaiveDate>;

    /// Fields matched by the free-text search box.
    fn searchable_fields(&self) -> Vec<&str>;

    fn status(&self) -> Option<&Self::Status> {
        None
    }

    fn priority(&self) -> Option<&Self::Priority> {
        None
    }
}

/// Search text plus multi-select facets. Every criterion is ANDed; an empty
/// set means "do not filter on this facet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, P: Serialize",
    deserialize = "S: Deserialize<'de> + Ord, P: Deserialize<'de> + Ord"
))]
pub struct ListFilter<S, P> {
    #[serde(default)]
    pub search_text: String,
    #[serde(default = "BTreeSet::new")]
    pub statuses: BTreeSet<S>,
    #[serde(default = "BTreeSet::new")]
    pub priorities: BTreeSet<P>,
    #[serde(default)]
    pub period: Option<ReportingPeriod>,
}

pub type ActivityFilter = ListFilter<NoFacet, NoFacet>;
pub type TaskFilter = ListFilter<TaskStatus, Priority>;
pub type WorkOrderFilter = ListFilter<WorkOrderStatus, Priority>;

impl<S: Ord, P: Ord> Default for ListFilter<S, P> {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            statuses: BTreeSet::new(),
            priorities: BTreeSet::new(),
            period: None,
        }
    }
}

impl<S: Ord, P: Ord> ListFilter<S, P> {
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_period(mut self, period: ReportingPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = S>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = P>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.statuses.is_empty()
            && self.priorities.is_empty()
            && self.period.is_none()
    }

    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: Filterable<Status = S, Priority = P>,
    {
        if let Some(period) = self.period {
            match item.record_date() {
                Some(date) if period.contains(date) => {}
                _ => return false,
            }
        }

        let needle = self.search_text.trim().to_lowercase();
        if !needle.is_empty()
            && !item
                .searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }

        if !self.statuses.is_empty()
            && !item.status().is_some_and(|status| self.statuses.contains(status))
        {
            return false;
        }

        if !self.priorities.is_empty()
            && !item
                .priority()
                .is_some_and(|priority| self.priorities.contains(priority))
        {
            return false;
        }

        true
    }

    /// Order-preserving selection of the matching records.
    pub fn apply<T>(&self, items: &[T]) -> Vec<T>
    where
        T: Filterable<Status = S, Priority = P> + Clone,
    {
        items
            .iter()
            .filter(|item| self.matches(*item))
            .cloned()
            .collect()
    }
}

impl Filterable for ActivityRecord {
    type Status = NoFacet;
    type Priority = NoFacet;

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.reporter_name.as_str(),
            self.area_name.as_str(),
            self.nik.as_str(),
        ]
    }
}

impl Filterable for TaskRecord {
    type Status = TaskStatus;
    type Priority = Priority;

    fn record_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn status(&self) -> Option<&TaskStatus> {
        Some(&self.status)
    }

    fn priority(&self) -> Option<&Priority> {
        Some(&self.priority)
    }
}

impl Filterable for WorkOrder {
    type Status = WorkOrderStatus;
    type Priority = Priority;

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.requested_on)
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.asset_name.as_str(),
        ]
    }

    fn status(&self) -> Option<&WorkOrderStatus> {
        Some(&self.status)
    }

    fn priority(&self) -> Option<&Priority> {
        Some(&self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, status: TaskStatus, priority: Priority) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{title} follow-up"),
            status,
            priority,
            due_date: NaiveDate::from_ymd_opt(2025, 7, 15),
        }
    }

    fn board() -> Vec<TaskRecord> {
        vec![
            task("t1", "Audit press line", TaskStatus::Todo, Priority::High),
            task("t2", "Label shelves", TaskStatus::Done, Priority::Low),
            task("t3", "Audit paint booth", TaskStatus::InProgress, Priority::Medium),
            TaskRecord {
                due_date: None,
                ..task("t4", "Clean compressor", TaskStatus::Todo, Priority::High)
            },
        ]
    }

    fn ids(tasks: &[TaskRecord]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let tasks = board();
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&tasks)), vec!["t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn search_is_case_insensitive_and_trimmed() {
        let tasks = board();
        let filter = TaskFilter::default().with_search("  AUDIT ");
        assert_eq!(ids(&filter.apply(&tasks)), vec!["t1", "t3"]);

        let by_description = TaskFilter::default().with_search("shelves follow");
        assert_eq!(ids(&by_description.apply(&tasks)), vec!["t2"]);
    }

    #[test]
    fn facets_compose_with_and() {
        let tasks = board();
        let filter = TaskFilter::default()
            .with_statuses([TaskStatus::Todo, TaskStatus::InProgress])
            .with_priorities([Priority::High]);
        assert_eq!(ids(&filter.apply(&tasks)), vec!["t1", "t4"]);

        let with_search = filter.clone().with_search("press");
        assert_eq!(ids(&with_search.apply(&tasks)), vec!["t1"]);
    }

    #[test]
    fn period_excludes_undated_records() {
        let tasks = board();
        let july = ReportingPeriod::new(2025, 6).expect("july");
        let filter = TaskFilter::default().with_period(july);
        assert_eq!(ids(&filter.apply(&tasks)), vec!["t1", "t2", "t3"]);

        let august = ReportingPeriod::new(2025, 7).expect("august");
        assert!(TaskFilter::default().with_period(august).apply(&tasks).is_empty());
    }

    #[test]
    fn filter_deserializes_with_missing_fields() {
        let filter: TaskFilter =
            serde_json::from_str(r#"{"statuses":["done"]}"#).expect("filter parses");
        assert!(filter.search_text.is_empty());
        assert!(filter.priorities.is_empty());
        assert_eq!(ids(&filter.apply(&board())), vec!["t2"]);

        let activity: ActivityFilter =
            serde_json::from_str(r#"{"search_text":"sari"}"#).expect("activity filter parses");
        assert_eq!(activity.search_text, "sari");
    }
}
