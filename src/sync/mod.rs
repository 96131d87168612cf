//! Local-first mutations: the store changes synchronously, then the remote is told.
//!
//! A remote failure is logged and returned but never rolls the store back;
//! there is no retry or reconciliation.

use crate::api::ResourceApi;
use crate::error::ClientError;
use crate::store::{Entity, EntityStore};

/// Result of a local-first mutation
#[derive(Debug)]
pub struct SyncOutcome<L, R> {
    /// What happened to the local store; always applied
    pub local: L,
    /// What the remote said
    pub remote: Result<R, ClientError>,
}

impl<L, R> SyncOutcome<L, R> {
    pub fn is_synced(&self) -> bool {
        self.remote.is_ok()
    }
}

pub struct EntitySync<'a, A> {
    api: &'a A,
}

impl<'a, A> EntitySync<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Append locally, then `POST` the record
    pub async fn add<T>(&self, store: &mut EntityStore<T>, record: T) -> SyncOutcome<(), T>
    where
        T: Entity,
        A: ResourceApi<T>,
    {
        store.add(record.clone());
        let remote = self.api.create(&record).await;
        log_failure::<T, _>("create", &remote);
        SyncOutcome { local: (), remote }
    }

    /// Replace locally (no-op on unknown id), then `PUT` the record either way
    pub async fn update<T>(&self, store: &mut EntityStore<T>, record: T) -> SyncOutcome<bool, T>
    where
        T: Entity,
        A: ResourceApi<T>,
    {
        let hit = store.update(record.clone());
        let remote = self.api.update(&record).await;
        log_failure::<T, _>("update", &remote);
        SyncOutcome { local: hit, remote }
    }

    /// Remove every local match, then `DELETE` the id
    pub async fn delete<T>(&self, store: &mut EntityStore<T>, id: &T::Id) -> SyncOutcome<usize, ()>
    where
        T: Entity,
        A: ResourceApi<T>,
    {
        let removed = store.delete(id);
        let remote = self.api.delete(id).await;
        log_failure::<T, _>("delete", &remote);
        SyncOutcome { local: removed, remote }
    }

    /// Replace the store with the remote listing; the store is untouched on failure
    pub async fn refresh<T>(&self, store: &mut EntityStore<T>) -> Result<usize, ClientError>
    where
        T: Entity,
        A: ResourceApi<T>,
    {
        let records = self.api.list().await;
        log_failure::<T, _>("list", &records);
        let records = records?;
        let len = records.len();
        store.replace_all(records);
        Ok(len)
    }
}

fn log_failure<T: Entity, R>(operation: &str, result: &Result<R, ClientError>) {
    if let Err(e) = result {
        tracing::warn!(
            collection = T::COLLECTION,
            operation,
            "remote {} failed, local store keeps its change: {}",
            operation,
            e
        );
    }
}
