use super::tasks::{TaskRecord, TaskStatus};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const SIDEBAR_OPEN_KEY: &str = "sidebarOpen";
pub const TASK_BOARD_KEY: &str = "ganba.todo.v1";

/// Key/value storage for UI preferences. Values are JSON documents.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError>;

    /// Read-modify-write of one key. No other write to the store may land
    /// between reading the current value and storing the replacement.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Result<String, PreferenceError>,
    ) -> Result<(), PreferenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("stored value for '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("task {0} already exists")]
    DuplicateTask(String),
}

fn read_json<T: DeserializeOwned>(
    store: &dyn PreferenceStore,
    key: &str,
) -> Result<Option<T>, PreferenceError> {
    store
        .get(key)?
        .map(|raw| decode(key, &raw))
        .transpose()
}

fn write_json<T: Serialize>(
    store: &dyn PreferenceStore,
    key: &str,
    value: &T,
) -> Result<(), PreferenceError> {
    store.set(key, encode(key, value)?)
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, PreferenceError> {
    serde_json::from_str(raw).map_err(|source| PreferenceError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, PreferenceError> {
    serde_json::to_string(value).map_err(|source| PreferenceError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Decode the stored value, let `change` mutate it and write it back, all
/// under the store's update lock.
fn update_json<T, R, F>(
    store: &dyn PreferenceStore,
    key: &str,
    change: F,
) -> Result<R, PreferenceError>
where
    T: DeserializeOwned + Serialize,
    F: FnOnce(Option<T>) -> Result<(T, R), PreferenceError>,
{
    let mut change = Some(change);
    let mut outcome = None;
    store.update(key, &mut |current| {
        let current = current.map(|raw| decode::<T>(key, raw)).transpose()?;
        let change = change.take().ok_or_else(|| {
            PreferenceError::Unavailable(format!("update of '{key}' applied twice"))
        })?;
        let (next, result) = change(current)?;
        let raw = encode(key, &next)?;
        outcome = Some(result);
        Ok(raw)
    })?;
    outcome.ok_or_else(|| {
        PreferenceError::Unavailable(format!("update of '{key}' never applied"))
    })
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let guard = self
            .values
            .lock()
            .map_err(|_| PreferenceError::Unavailable("preference mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|_| PreferenceError::Unavailable("preference mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Result<String, PreferenceError>,
    ) -> Result<(), PreferenceError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|_| PreferenceError::Unavailable("preference mutex poisoned".to_string()))?;
        let next = apply(guard.get(key).map(String::as_str))?;
        guard.insert(key.to_string(), next);
        Ok(())
    }
}

/// Shell-level UI state, loaded once and handed to the views that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    pub sidebar_open: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self { sidebar_open: true }
    }
}

impl UiPreferences {
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        let sidebar_open = read_json::<bool>(store, SIDEBAR_OPEN_KEY)?
            .unwrap_or(Self::default().sidebar_open);
        Ok(Self { sidebar_open })
    }

    pub fn save(&self, store: &dyn PreferenceStore) -> Result<(), PreferenceError> {
        write_json(store, SIDEBAR_OPEN_KEY, &self.sidebar_open)
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Flip the stored sidebar flag atomically and return the new state.
    pub fn toggle_stored_sidebar(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        update_json(store, SIDEBAR_OPEN_KEY, |current: Option<bool>| {
            let mut prefs = Self {
                sidebar_open: current.unwrap_or(Self::default().sidebar_open),
            };
            prefs.toggle_sidebar();
            Ok((prefs.sidebar_open, prefs))
        })
    }
}

/// Personal task list persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    tasks: Vec<TaskRecord>,
}

impl TaskBoard {
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, PreferenceError> {
        let tasks = read_json::<Vec<TaskRecord>>(store, TASK_BOARD_KEY)?.unwrap_or_default();
        Ok(Self { tasks })
    }

    pub fn save(&self, store: &dyn PreferenceStore) -> Result<(), PreferenceError> {
        write_json(store, TASK_BOARD_KEY, &self.tasks)
    }

    /// Apply `change` to the stored board and persist the result atomically.
    /// When `change` fails nothing is written.
    pub fn update<R, F>(store: &dyn PreferenceStore, change: F) -> Result<R, PreferenceError>
    where
        F: FnOnce(&mut TaskBoard) -> Result<R, PreferenceError>,
    {
        update_json(store, TASK_BOARD_KEY, |current: Option<Vec<TaskRecord>>| {
            let mut board = Self {
                tasks: current.unwrap_or_default(),
            };
            let result = change(&mut board)?;
            Ok((board.tasks, result))
        })
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn add(&mut self, task: TaskRecord) -> Result<(), PreferenceError> {
        if self.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(PreferenceError::DuplicateTask(task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<(), PreferenceError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| PreferenceError::TaskNotFound(id.to_string()))?;
        task.status = status;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<TaskRecord, PreferenceError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| PreferenceError::TaskNotFound(id.to_string()))?;
        Ok(self.tasks.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::genba::tasks::Priority;

    fn task(id: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
        }
    }

    #[test]
    fn sidebar_defaults_open_and_round_trips() {
        let store = MemoryPreferenceStore::default();
        let mut prefs = UiPreferences::load(&store).expect("loads defaults");
        assert!(prefs.sidebar_open);

        prefs.toggle_sidebar();
        prefs.save(&store).expect("saves");
        assert_eq!(
            store.get(SIDEBAR_OPEN_KEY).expect("readable"),
            Some("false".to_string())
        );
        assert!(!UiPreferences::load(&store).expect("reloads").sidebar_open);
    }

    #[test]
    fn corrupt_sidebar_value_is_reported() {
        let store = MemoryPreferenceStore::default();
        store
            .set(SIDEBAR_OPEN_KEY, "maybe".to_string())
            .expect("writes");
        match UiPreferences::load(&store) {
            Err(PreferenceError::Corrupt { key, .. }) => assert_eq!(key, SIDEBAR_OPEN_KEY),
            other => panic!("expected corrupt value error, got {other:?}"),
        }
    }

    #[test]
    fn task_board_persists_changes() {
        let store = MemoryPreferenceStore::default();
        let mut board = TaskBoard::load(&store).expect("empty board");
        board.add(task("t1")).expect("adds");
        board.add(task("t2")).expect("adds");
        assert!(matches!(
            board.add(task("t1")),
            Err(PreferenceError::DuplicateTask(id)) if id == "t1"
        ));

        board.set_status("t2", TaskStatus::Done).expect("updates");
        board.remove("t1").expect("removes");
        board.save(&store).expect("saves");

        let reloaded = TaskBoard::load(&store).expect("reloads");
        assert_eq!(reloaded.tasks().len(), 1);
        assert_eq!(reloaded.tasks()[0].status, TaskStatus::Done);
        assert!(matches!(
            board.set_status("missing", TaskStatus::Done),
            Err(PreferenceError::TaskNotFound(_))
        ));
    }

    #[test]
    fn failed_update_leaves_the_board_untouched() {
        let store = MemoryPreferenceStore::default();
        TaskBoard::update(&store, |board| board.add(task("t1"))).expect("adds");

        let result = TaskBoard::update(&store, |board| {
            board.add(task("t2"))?;
            board.add(task("t1"))
        });
        assert!(matches!(result, Err(PreferenceError::DuplicateTask(_))));

        let reloaded = TaskBoard::load(&store).expect("reloads");
        assert_eq!(reloaded.tasks().len(), 1);
    }

    #[test]
    fn concurrent_updates_keep_every_task() {
        let store = MemoryPreferenceStore::default();
        let handles: Vec<_> = (0..16)
            .map(|worker| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for n in 0..25 {
                        let id = format!("w{worker}-{n}");
                        TaskBoard::update(&store, |board| board.add(task(&id))).expect("adds");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker finished");
        }

        assert_eq!(TaskBoard::load(&store).expect("loads").tasks().len(), 400);
    }

    #[test]
    fn stored_sidebar_toggle_flips_the_persisted_flag() {
        let store = MemoryPreferenceStore::default();
        let first = UiPreferences::toggle_stored_sidebar(&store).expect("toggles");
        assert!(!first.sidebar_open);
        let second = UiPreferences::toggle_stored_sidebar(&store).expect("toggles");
        assert!(second.sidebar_open);
        assert_eq!(
            store.get(SIDEBAR_OPEN_KEY).expect("readable"),
            Some("true".to_string())
        );
    }
}
