//! Collection-agnostic CRUD operations shared by the resume and application
//! handlers. Handles timestamping, key normalization and response shaping.

use bson::{doc, Document};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::record::{from_create_body, from_update_body, stamp_created, stamp_updated, to_public};
use crate::store::{Collection, DocumentStore, RecordKey, OPAQUE_ID_FIELD};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> Document {
        match self.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(user_id) => doc! { "userId": user_id },
            None => Document::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub data: Value,
}

impl RecordResponse {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Human label for messages, e.g. "Resume".
fn label(collection: Collection) -> &'static str {
    match collection {
        Collection::Resumes => "Resume",
        Collection::Applications => "Application",
    }
}

fn not_found(collection: Collection, key: &RecordKey) -> AppError {
    AppError::NotFound(format!("{} {} not found", label(collection), key.raw()))
}

pub async fn list(
    store: &dyn DocumentStore,
    collection: Collection,
    query: &ListQuery,
) -> Result<Vec<Value>, AppError> {
    let docs = store.list(collection, query.filter()).await?;
    Ok(docs.into_iter().map(to_public).collect())
}

pub async fn get(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Value, AppError> {
    let key = RecordKey::parse(id);
    store
        .find(collection, &key)
        .await?
        .map(to_public)
        .ok_or_else(|| not_found(collection, &key))
}

/// Inserts a new record. A client-supplied `id` must not already resolve to
/// a record, by either identifier scheme.
pub async fn create(
    store: &dyn DocumentStore,
    collection: Collection,
    body: Value,
) -> Result<Value, AppError> {
    let mut doc = from_create_body(body)?;
    if let Ok(opaque) = doc.get_str(OPAQUE_ID_FIELD) {
        let key = RecordKey::parse(opaque);
        if store.find(collection, &key).await?.is_some() {
            return Err(AppError::Validation(format!(
                "{} id {} is already in use",
                label(collection),
                key.raw()
            )));
        }
    }
    stamp_created(&mut doc, Utc::now());
    let stored = store.insert(collection, doc).await?;
    tracing::info!("Created {} record", collection.name());
    Ok(to_public(stored))
}

/// Merges the provided top-level fields and advances `updatedAt`.
pub async fn update(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
    body: Value,
) -> Result<Value, AppError> {
    let key = RecordKey::parse(id);
    let mut changes = from_update_body(body)?;
    stamp_updated(&mut changes, Utc::now());

    store
        .update(collection, &key, changes)
        .await?
        .map(to_public)
        .ok_or_else(|| not_found(collection, &key))
}

pub async fn delete(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<DeleteResponse, AppError> {
    let key = RecordKey::parse(id);
    if !store.delete(collection, &key).await? {
        return Err(not_found(collection, &key));
    }
    tracing::info!("Deleted {} {}", collection.name(), key.raw());
    Ok(DeleteResponse {
        success: true,
        message: format!("{} deleted successfully", label(collection)),
    })
}
