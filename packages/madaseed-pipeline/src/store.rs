//! Seed store interface
//!
//! Downstream object-storage collaborator for persisted Seeds and backlog
//! items. The pipeline itself never calls it; hosts persist the Seed between
//! stage nodes through this surface. The in-memory implementation exists for
//! tests and hosts without a real backend.

use chrono::{DateTime, Utc};
use madaseed_schema::{clock, CruxUid};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("object already exists: {0}")]
    AlreadyExists(CruxUid),
}

/// One stored object with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub uid: CruxUid,
    pub payload: serde_json::Value,
    pub metadata: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Query filter: uid type hint and/or exact metadata entry.
#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub type_hint: Option<String>,
    pub metadata_entry: Option<(String, String)>,
}

impl StoreFilter {
    fn matches(&self, object: &StoredObject) -> bool {
        if let Some(hint) = &self.type_hint {
            if object.uid.type_hint() != Some(hint.as_str()) {
                return false;
            }
        }
        if let Some((key, value)) = &self.metadata_entry {
            if object.metadata.get(key) != Some(value) {
                return false;
            }
        }
        true
    }
}

/// Object-storage surface: create, point lookup, filtered query.
pub trait SeedStore: Send + Sync {
    fn get(&self, uid: &CruxUid) -> Option<StoredObject>;

    fn create(
        &self,
        uid: &CruxUid,
        payload: serde_json::Value,
        metadata: BTreeMap<String, String>,
    ) -> Result<()>;

    fn query(&self, filter: &StoreFilter) -> Vec<StoredObject>;
}

/// In-memory store, interface-first for testing.
#[derive(Default)]
pub struct InMemorySeedStore {
    objects: Mutex<Vec<StoredObject>>,
}

impl InMemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeedStore for InMemorySeedStore {
    fn get(&self, uid: &CruxUid) -> Option<StoredObject> {
        let objects = self.objects.lock();
        objects.iter().find(|o| &o.uid == uid).cloned()
    }

    fn create(
        &self,
        uid: &CruxUid,
        payload: serde_json::Value,
        metadata: BTreeMap<String, String>,
    ) -> Result<()> {
        let mut objects = self.objects.lock();
        if objects.iter().any(|o| &o.uid == uid) {
            return Err(StoreError::AlreadyExists(uid.clone()));
        }
        objects.push(StoredObject {
            uid: uid.clone(),
            payload,
            metadata,
            created_at: clock::now_utc(),
        });
        Ok(())
    }

    fn query(&self, filter: &StoreFilter) -> Vec<StoredObject> {
        let objects = self.objects.lock();
        objects.iter().filter(|o| filter.matches(o)).cloned().collect()
    }
}
