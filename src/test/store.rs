//! In-memory instances store for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::{
    ids::InstanceUuid,
    instances::{InstancesStore, models::ResourceInstance},
};

#[derive(Debug, Default)]
pub(crate) struct MemoryInstancesStore {
    rows: Mutex<FxHashMap<InstanceUuid, ResourceInstance>>,
}

impl MemoryInstancesStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().expect("store lock poisoned").len()
    }

    pub(crate) fn get_sync(&self, id: InstanceUuid) -> Option<ResourceInstance> {
        self.rows.lock().expect("store lock poisoned").get(&id).cloned()
    }

    /// Seed a row directly, bypassing the lifecycle service.
    pub(crate) fn insert_sync(&self, record: ResourceInstance) {
        self.rows
            .lock()
            .expect("store lock poisoned")
            .insert(record.id, record);
    }
}

#[async_trait]
impl InstancesStore for MemoryInstancesStore {
    async fn insert(&self, record: &ResourceInstance) -> Result<(), sqlx::Error> {
        self.insert_sync(record.clone());
        Ok(())
    }

    async fn get(&self, id: InstanceUuid) -> Result<Option<ResourceInstance>, sqlx::Error> {
        Ok(self.get_sync(id))
    }

    async fn update(&self, record: &ResourceInstance) -> Result<(), sqlx::Error> {
        self.insert_sync(record.clone());
        Ok(())
    }

    async fn delete(&self, id: InstanceUuid) -> Result<(), sqlx::Error> {
        self.rows.lock().expect("store lock poisoned").remove(&id);
        Ok(())
    }
}
