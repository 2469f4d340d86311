//! In-process document store used for local development and tests.
//!
//! Documents are kept as JSON values so the memory and Firestore backends go
//! through the same serde representation.

use crate::error::AppError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

type DocKey = (&'static str, String);

#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<DocKey, Value>,
}

fn encode<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Database(format!("encode: {}", e)))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::Database(format!("decode: {}", e)))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        let value = self
            .docs
            .get(&(collection, id.to_string()))
            .map(|doc| doc.value().clone());
        value.map(decode).transpose()
    }

    pub fn put<T: Serialize>(
        &self,
        collection: &'static str,
        id: &str,
        value: &T,
    ) -> Result<(), AppError> {
        self.docs.insert((collection, id.to_string()), encode(value)?);
        Ok(())
    }

    /// Encode everything first so a bad item leaves the store untouched.
    pub fn put_all<T: Serialize>(
        &self,
        collection: &'static str,
        items: &[(String, T)],
    ) -> Result<(), AppError> {
        let encoded = items
            .iter()
            .map(|(id, value)| Ok(((collection, id.clone()), encode(value)?)))
            .collect::<Result<Vec<_>, AppError>>()?;

        for (key, value) in encoded {
            self.docs.insert(key, value);
        }
        Ok(())
    }

    /// Insert `claim` only if it is absent, then write the other documents.
    pub fn create_claimed<C: Serialize, A: Serialize, B: Serialize>(
        &self,
        claim: (&'static str, &str, &C),
        first: (&'static str, &str, &A),
        second: (&'static str, &str, &B),
    ) -> Result<(), AppError> {
        let (claim_collection, claim_id, claim_value) = claim;
        let claim_value = encode(claim_value)?;
        let first_value = encode(first.2)?;
        let second_value = encode(second.2)?;

        match self.docs.entry((claim_collection, claim_id.to_string())) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict(format!(
                    "{}/{} already exists",
                    claim_collection, claim_id
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(claim_value);
            }
        }

        self.docs.insert((first.0, first.1.to_string()), first_value);
        self.docs.insert((second.0, second.1.to_string()), second_value);
        Ok(())
    }

    pub fn query_eq<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, AppError> {
        let matches: Vec<Value> = self
            .docs
            .iter()
            .filter(|doc| doc.key().0 == collection)
            .filter(|doc| doc.value().get(field).and_then(Value::as_str) == Some(value))
            .map(|doc| doc.value().clone())
            .collect();

        matches.into_iter().map(decode).collect()
    }

    pub fn delete(&self, collection: &'static str, id: &str) {
        self.docs.remove(&(collection, id.to_string()));
    }

    pub fn delete_all(&self, collection: &'static str, ids: &[String]) {
        for id in ids {
            self.delete(collection, id);
        }
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.docs
            .iter()
            .filter(|doc| doc.key().0 == collection)
            .count()
    }
}
