pub mod entity;
pub mod models;

use chrono::{DateTime, Utc};

pub use entity::Entity;
pub use models::{Project, Sprint, Task, TaskStatus};

/// What a mutation did to the collection; delivered to subscribers after the
/// collection has already changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange<Id> {
    Added { index: usize },
    Updated { index: usize },
    Deleted { id: Id, removed: usize },
    /// Whole collection swapped, e.g. after loading from the remote
    Replaced { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<Id> = Box<dyn Fn(&StoreChange<Id>) + Send + Sync>;

/// Ordered in-memory collection of records with local create/update/delete.
///
/// Memory-only: nothing here persists or talks to the remote service. Id
/// uniqueness is the caller's business; the store neither checks nor
/// relies on it.
pub struct EntityStore<T: Entity> {
    records: Vec<T>,
    listeners: Vec<(SubscriptionId, Listener<T::Id>)>,
    next_subscription: u64,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> std::fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("collection", &T::COLLECTION)
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records,
            ..Self::new()
        }
    }

    // ========================================
    // Mutations
    // ========================================

    /// Append `record` at the end of the collection
    pub fn add(&mut self, record: T) {
        tracing::debug!(collection = T::COLLECTION, id = %record.id(), "add");
        self.records.push(record);
        let index = self.records.len() - 1;
        self.notify(StoreChange::Added { index });
    }

    /// Replace the first record sharing `record`'s id.
    ///
    /// An unknown id is a no-op: nothing is inserted and no error is raised.
    /// Returns whether a record was replaced.
    pub fn update(&mut self, record: T) -> bool {
        match self.records.iter().position(|r| r.id() == record.id()) {
            Some(index) => {
                tracing::debug!(collection = T::COLLECTION, id = %record.id(), index, "update");
                self.records[index] = record;
                self.notify(StoreChange::Updated { index });
                true
            }
            None => {
                tracing::warn!(
                    collection = T::COLLECTION,
                    id = %record.id(),
                    "update ignored: no record with this id"
                );
                false
            }
        }
    }

    /// Remove every record whose id equals `id`, keeping the order of the rest.
    /// Returns how many were removed.
    pub fn delete(&mut self, id: &T::Id) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = before - self.records.len();

        tracing::debug!(collection = T::COLLECTION, %id, removed, "delete");
        if removed > 0 {
            self.notify(StoreChange::Deleted { id: id.clone(), removed });
        }
        removed
    }

    /// Swap in a fresh collection, typically the remote's listing
    pub fn replace_all(&mut self, records: Vec<T>) {
        self.records = records;
        let len = self.records.len();
        self.notify(StoreChange::Replaced { len });
    }

    // ========================================
    // Reads
    // ========================================

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with this id
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Records matching `predicate`, in collection order
    pub fn find_by<P>(&self, predicate: P) -> Vec<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    // ========================================
    // Subscriptions
    // ========================================

    /// Register a listener called synchronously after each effective mutation
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreChange<T::Id>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&self, change: StoreChange<T::Id>) {
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}

impl EntityStore<Task> {
    pub fn tasks_for_project(&self, project_id: u64) -> Vec<&Task> {
        self.find_by(|t| t.project_id == Some(project_id))
    }

    pub fn tasks_for_sprint(&self, sprint_id: u64) -> Vec<&Task> {
        self.find_by(|t| t.sprint_id == Some(sprint_id))
    }

    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.find_by(|t| t.status == status)
    }
}

impl EntityStore<Sprint> {
    pub fn sprints_for_project(&self, project_id: u64) -> Vec<&Sprint> {
        self.find_by(|s| s.project_id == project_id)
    }

    /// Sprints of `project_id` whose window contains `at`
    pub fn active_sprints(&self, project_id: u64, at: DateTime<Utc>) -> Vec<&Sprint> {
        self.find_by(|s| s.project_id == project_id && s.is_active_at(at))
    }
}

pub type TaskStore = EntityStore<Task>;
pub type ProjectStore = EntityStore<Project>;
pub type SprintStore = EntityStore<Sprint>;
