// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Database`] exposes typed operations (see `organizations` and `projects`)
//! over one of three backends: Firestore in production, an in-memory store
//! for development and tests, or an offline handle whose every call fails.

pub mod firestore;
pub mod memory;
mod organizations;
mod projects;

pub use memory::MemoryStore;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const ORGANIZATIONS: &str = "organizations";
    /// One document per slug, so two organizations cannot share one
    pub const ORGANIZATION_SLUGS: &str = "organization_slugs";
    /// Keyed by `{organization_id}_{urlencoded user_id}`
    pub const MEMBERS: &str = "members";
    pub const INVITATIONS: &str = "invitations";
    pub const PROJECTS: &str = "projects";
    /// Organizer and participant legs, keyed by activity ID
    pub const ACTIVITIES: &str = "activities";
}

#[derive(Clone)]
enum Backend {
    Firestore(::firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
    Offline,
}

/// Cloneable database handle.
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

impl Database {
    /// Connect to the backend named in the config.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match config.storage {
            StorageBackend::Firestore => Self::connect_firestore(&config.gcp_project_id).await,
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    /// Connect to Firestore (or the emulator if FIRESTORE_EMULATOR_HOST is set).
    pub async fn connect_firestore(project_id: &str) -> Result<Self, AppError> {
        let client = firestore::connect(project_id).await?;
        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// Create a database handle for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// The in-memory store, if this handle uses one.
    pub fn memory_store(&self) -> Option<&MemoryStore> {
        match &self.backend {
            Backend::Memory(store) => Some(store),
            _ => None,
        }
    }

    fn offline_error() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    // ─── Document Primitives ─────────────────────────────────────

    async fn get<T>(&self, collection: &'static str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => firestore::get(client, collection, id).await,
            Backend::Memory(store) => store.get(collection, id),
            Backend::Offline => Err(Self::offline_error()),
        }
    }

    async fn put<T>(&self, collection: &'static str, id: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => firestore::put(client, collection, id, value).await,
            Backend::Memory(store) => store.put(collection, id, value),
            Backend::Offline => Err(Self::offline_error()),
        }
    }

    async fn put_all<T>(&self, collection: &'static str, items: &[(String, T)]) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => firestore::put_all(client, collection, items).await,
            Backend::Memory(store) => store.put_all(collection, items),
            Backend::Offline => Err(Self::offline_error()),
        }
    }

    async fn create_claimed<C, A, B>(
        &self,
        claim: (&'static str, &str, &C),
        first: (&'static str, &str, &A),
        second: (&'static str, &str, &B),
    ) -> Result<(), AppError>
    where
        C: Serialize + DeserializeOwned + Sync + Send,
        A: Serialize + DeserializeOwned + Sync + Send,
        B: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                firestore::create_claimed(client, claim, first, second).await
            }
            Backend::Memory(store) => store.create_claimed(claim, first, second),
            Backend::Offline => Err(Self::offline_error()),
        }
    }

    async fn query_eq<T>(
        &self,
        collection: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => firestore::query_eq(client, collection, field, value).await,
            Backend::Memory(store) => store.query_eq(collection, field, value),
            Backend::Offline => Err(Self::offline_error()),
        }
    }

    async fn delete(&self, collection: &'static str, id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => firestore::delete(client, collection, id).await,
            Backend::Memory(store) => {
                store.delete(collection, id);
                Ok(())
            }
            Backend::Offline => Err(Self::offline_error()),
        }
    }

    async fn delete_all(&self, collection: &'static str, ids: &[String]) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => firestore::delete_all(client, collection, ids).await,
            Backend::Memory(store) => {
                store.delete_all(collection, ids);
                Ok(())
            }
            Backend::Offline => Err(Self::offline_error()),
        }
    }
}
