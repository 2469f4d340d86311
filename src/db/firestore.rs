// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore connection and document primitives.
//!
//! The typed operations in `db::organizations` and `db::projects` are built
//! on these few calls, so each backend only has to provide get/put/query/delete.

use crate::error::AppError;
use serde::{de::DeserializeOwned, Serialize};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
pub(crate) const BATCH_SIZE: usize = 400;

fn db_error(context: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Database(format!("{}: {}", context, e))
}

/// Connect to Firestore.
///
/// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
pub(crate) async fn connect(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
    // If the emulator environment variable is set, use unauthenticated connection
    // to avoid local credential warnings and leakage.
    if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
        return connect_emulator(project_id).await;
    }

    let client = firestore::FirestoreDb::new(project_id)
        .await
        .map_err(|e| db_error("Failed to connect to Firestore", e))?;

    tracing::info!(project = project_id, "Connected to Firestore");
    Ok(client)
}

/// Connect to the emulator with a dummy unsigned token.
async fn connect_emulator(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
    tracing::info!("Using unauthenticated connection for Firestore Emulator");

    let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
        Ok(gcloud_sdk::Token {
            token_type: "Bearer".to_string(),
            token: gcloud_sdk::SecretValue::new(
                "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                    .to_string()
                    .into(),
            ),
            expiry: chrono::Utc::now() + chrono::Duration::hours(1),
        })
    });

    let options = firestore::FirestoreDbOptions::new(project_id.to_string());

    let client = firestore::FirestoreDb::with_options_token_source(
        options,
        gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
        gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
    )
    .await
    .map_err(|e| db_error("Failed to connect to Firestore Emulator", e))?;

    tracing::info!(
        project = project_id,
        "Connected to Firestore (Emulator/Unauthenticated)"
    );
    Ok(client)
}

pub(crate) async fn get<T>(
    client: &firestore::FirestoreDb,
    collection: &'static str,
    id: &str,
) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned + Send,
{
    client
        .fluent()
        .select()
        .by_id_in(collection)
        .obj()
        .one(id)
        .await
        .map_err(|e| db_error(collection, e))
}

pub(crate) async fn put<T>(
    client: &firestore::FirestoreDb,
    collection: &'static str,
    id: &str,
    value: &T,
) -> Result<(), AppError>
where
    T: Serialize + DeserializeOwned + Sync + Send,
{
    let _: () = client
        .fluent()
        .update()
        .in_col(collection)
        .document_id(id)
        .object(value)
        .execute()
        .await
        .map_err(|e| db_error(collection, e))?;
    Ok(())
}

/// Write several documents of one collection atomically, in chunks of [`BATCH_SIZE`].
pub(crate) async fn put_all<T>(
    client: &firestore::FirestoreDb,
    collection: &'static str,
    items: &[(String, T)],
) -> Result<(), AppError>
where
    T: Serialize + DeserializeOwned + Sync + Send,
{
    for chunk in items.chunks(BATCH_SIZE) {
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        for (id, value) in chunk {
            client
                .fluent()
                .update()
                .in_col(collection)
                .document_id(id)
                .object(value)
                .add_to_transaction(&mut transaction)
                .map_err(|e| db_error("Failed to add write to transaction", e))?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| db_error("Transaction commit failed", e))?;
    }
    Ok(())
}

/// Create a document that must not exist yet, plus two documents that depend
/// on it, in one transaction.
///
/// Returns [`AppError::Conflict`] when the first document is already there.
pub(crate) async fn create_claimed<C, A, B>(
    client: &firestore::FirestoreDb,
    claim: (&'static str, &str, &C),
    first: (&'static str, &str, &A),
    second: (&'static str, &str, &B),
) -> Result<(), AppError>
where
    C: Serialize + DeserializeOwned + Sync + Send,
    A: Serialize + DeserializeOwned + Sync + Send,
    B: Serialize + DeserializeOwned + Sync + Send,
{
    let (claim_collection, claim_id, claim_value) = claim;
    let mut transaction = client
        .begin_transaction()
        .await
        .map_err(|e| db_error("Failed to begin transaction", e))?;

    client
        .fluent()
        .update()
        .in_col(claim_collection)
        .precondition(firestore::FirestoreWritePrecondition::Exists(false))
        .document_id(claim_id)
        .object(claim_value)
        .add_to_transaction(&mut transaction)
        .map_err(|e| db_error("Failed to add write to transaction", e))?;

    let (collection, id, value) = first;
    client
        .fluent()
        .update()
        .in_col(collection)
        .document_id(id)
        .object(value)
        .add_to_transaction(&mut transaction)
        .map_err(|e| db_error("Failed to add write to transaction", e))?;

    let (collection, id, value) = second;
    client
        .fluent()
        .update()
        .in_col(collection)
        .document_id(id)
        .object(value)
        .add_to_transaction(&mut transaction)
        .map_err(|e| db_error("Failed to add write to transaction", e))?;

    match transaction.commit().await {
        Ok(_) => Ok(()),
        Err(firestore::errors::FirestoreError::DataConflictError(_)) => Err(AppError::Conflict(
            format!("{}/{} already exists", claim_collection, claim_id),
        )),
        Err(e) => Err(db_error("Transaction commit failed", e)),
    }
}

/// All documents whose `field` equals `value`.
pub(crate) async fn query_eq<T>(
    client: &firestore::FirestoreDb,
    collection: &'static str,
    field: &'static str,
    value: &str,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned + Send,
{
    let value = value.to_string();
    client
        .fluent()
        .select()
        .from(collection)
        .filter(move |q| q.for_all([q.field(field).eq(value.clone())]))
        .obj()
        .query()
        .await
        .map_err(|e| db_error(collection, e))
}

pub(crate) async fn delete(
    client: &firestore::FirestoreDb,
    collection: &'static str,
    id: &str,
) -> Result<(), AppError> {
    client
        .fluent()
        .delete()
        .from(collection)
        .document_id(id)
        .execute()
        .await
        .map_err(|e| db_error(collection, e))?;
    Ok(())
}

/// Delete documents by ID using transactions, in chunks of [`BATCH_SIZE`].
pub(crate) async fn delete_all(
    client: &firestore::FirestoreDb,
    collection: &'static str,
    ids: &[String],
) -> Result<(), AppError> {
    for chunk in ids.chunks(BATCH_SIZE) {
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        for id in chunk {
            client
                .fluent()
                .delete()
                .from(collection)
                .document_id(id)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add deletion to transaction for {}: {}",
                        collection, e
                    ))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| db_error("Failed to commit batch deletion", e))?;
    }
    Ok(())
}
