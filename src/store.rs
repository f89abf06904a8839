use crate::errors::ValidationError;
use crate::models::{NextAction, Priority, Status, Task, TaskId, next_action};
use crate::storage::{FileStorage, KeyValueStorage, TaskPersistence};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info};

type Listener = Box<dyn FnMut(&[Task]) + Send>;

/// Owns the task collection (newest first) and writes it through to storage
/// after every change.
pub struct TaskStore<S = FileStorage> {
    tasks: Vec<Task>,
    persistence: TaskPersistence<S>,
    listeners: Vec<Listener>,
    revision: u64,
}

impl<S> fmt::Debug for TaskStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks.len())
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Opens the store with whatever the storage slot currently holds.
    pub fn open(persistence: TaskPersistence<S>) -> Self {
        let tasks = persistence.load();
        info!(count = tasks.len(), "loaded tasks");
        Self {
            tasks,
            persistence,
            listeners: Vec::new(),
            revision: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn persistence(&self) -> &TaskPersistence<S> {
        &self.persistence
    }

    /// Registers a callback invoked with the full collection after each change.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Task]) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn create(
        &mut self,
        title: &str,
        note: &str,
        priority: Priority,
    ) -> Result<Task, ValidationError> {
        self.create_at(title, note, priority, Utc::now())
    }

    pub fn create_at(
        &mut self,
        title: &str,
        note: &str,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Result<Task, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let mut id = TaskId::generate();
        while self.get(&id).is_some() {
            id = TaskId::generate();
        }

        let task = Task {
            id,
            title: title.to_string(),
            note: note.trim().to_string(),
            priority,
            status: Status::Queued,
            created_at,
        };
        debug!(id = %task.id, priority = priority.as_str(), "created task");
        self.tasks.insert(0, task.clone());
        self.commit();
        Ok(task)
    }

    /// Moves the task one step forward. Returns the new status, or `None` when
    /// the id is unknown or the task is already complete.
    pub fn advance(&mut self, id: &TaskId) -> Option<Status> {
        let task = self.tasks.iter_mut().find(|task| &task.id == id)?;
        let Some(next) = task.status.next() else {
            debug!(id = %id, "advance ignored on complete task");
            return None;
        };
        task.status = next;
        self.commit();
        Some(next)
    }

    /// Puts the task back to `queued`. Returns `false` for an unknown id.
    pub fn reset_to_queued(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            return false;
        };
        task.status = Status::Queued;
        self.commit();
        true
    }

    /// Runs whichever action the task card currently offers.
    pub fn apply_next_action(&mut self, id: &TaskId) -> Option<Status> {
        let action = next_action(self.get(id)?.status);
        match action {
            NextAction::Advance => self.advance(id),
            NextAction::Reset => self.reset_to_queued(id).then_some(Status::Queued),
        }
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| &task.id == id)?;
        let removed = self.tasks.remove(index);
        debug!(id = %id, "removed task");
        self.commit();
        Some(removed)
    }

    fn commit(&mut self) {
        self.revision += 1;
        self.persistence.save(&self.tasks);
        for listener in &mut self.listeners {
            listener(&self.tasks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, TimeZone};
    use std::sync::{Arc, Mutex};

    fn empty_store() -> TaskStore<MemoryStorage> {
        TaskStore::open(TaskPersistence::new(MemoryStorage::new()))
    }

    #[test]
    fn create_prepends_trimmed_queued_task() {
        let mut store = empty_store();
        let first = store.create("  Write report ", "  draft  ", Priority::Focus).unwrap();
        let second = store.create("Sketch UI", "", Priority::Spark).unwrap();

        assert_eq!(first.title, "Write report");
        assert_eq!(first.note, "draft");
        assert_eq!(first.status, Status::Queued);
        assert_ne!(first.id, second.id);
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Sketch UI", "Write report"]);
    }

    #[test]
    fn create_rejects_blank_title() {
        let mut store = empty_store();
        assert_eq!(
            store.create("   ", "note", Priority::Flow),
            Err(ValidationError::EmptyTitle)
        );
        assert!(store.tasks().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn advance_walks_forward_and_stops_at_complete() {
        let mut store = empty_store();
        let id = store.create("Task", "", Priority::Flow).unwrap().id;

        assert_eq!(store.advance(&id), Some(Status::InProgress));
        assert_eq!(store.advance(&id), Some(Status::Complete));
        let revision = store.revision();
        assert_eq!(store.advance(&id), None);
        assert_eq!(store.get(&id).unwrap().status, Status::Complete);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn reset_always_yields_queued() {
        let mut store = empty_store();
        let id = store.create("Task", "", Priority::Flow).unwrap().id;
        for steps in 0..3 {
            for _ in 0..steps {
                store.advance(&id);
            }
            assert!(store.reset_to_queued(&id));
            assert_eq!(store.get(&id).unwrap().status, Status::Queued);
        }
    }

    #[test]
    fn next_action_cycles_through_reset() {
        let mut store = empty_store();
        let id = store.create("Task", "", Priority::Flow).unwrap().id;
        let seen: Vec<_> = (0..4).filter_map(|_| store.apply_next_action(&id)).collect();
        assert_eq!(
            seen,
            [Status::InProgress, Status::Complete, Status::Queued, Status::InProgress]
        );
    }

    #[test]
    fn operations_on_removed_id_are_noops() {
        let mut store = empty_store();
        let keep = store.create("Keep", "", Priority::Flow).unwrap();
        let gone = store.create("Gone", "", Priority::Flow).unwrap().id;
        assert!(store.remove(&gone).is_some());
        let revision = store.revision();

        assert_eq!(store.advance(&gone), None);
        assert!(!store.reset_to_queued(&gone));
        assert!(store.remove(&gone).is_none());
        assert_eq!(store.apply_next_action(&gone), None);
        assert_eq!(store.tasks(), [keep]);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn every_change_is_saved_and_announced() {
        let mut store = empty_store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |tasks| sink.lock().unwrap().push(tasks.len()));

        let id = store.create("Task", "", Priority::Focus).unwrap().id;
        store.advance(&id);
        store.remove(&id);

        assert_eq!(*seen.lock().unwrap(), [1, 1, 0]);
        assert!(store.persistence().load().is_empty());
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn reopening_restores_saved_collection() {
        let mut store = empty_store();
        let base = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
        store.create_at("Old", "", Priority::Spark, base).unwrap();
        let id = store
            .create_at("New", "n", Priority::Focus, base + Duration::minutes(5))
            .unwrap()
            .id;
        store.advance(&id);

        let storage = store.persistence().storage().clone();
        let reopened = TaskStore::open(TaskPersistence::new(storage));
        assert_eq!(reopened.tasks(), store.tasks());
    }
}
