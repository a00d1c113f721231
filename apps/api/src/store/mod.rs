//! Document store: the single persistence seam of the service.
//!
//! Handlers hold an `Arc<dyn DocumentStore>` from `AppState`; the MongoDB
//! implementation lives in `mongo`, a test-only in-memory one in `memory`.

use async_trait::async_trait;
use bson::Document;
use thiserror::Error;

pub mod keys;
#[cfg(test)]
pub mod memory;
pub mod mongo;

pub use keys::RecordKey;

/// Field holding the client-supplied opaque string identifier.
pub const OPAQUE_ID_FIELD: &str = "id";
/// Field holding the store-native identifier.
pub const NATIVE_ID_FIELD: &str = "_id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Resumes,
    Applications,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Resumes => "resumes",
            Collection::Applications => "applications",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Connected,
    Disconnected,
}

impl StoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreStatus::Connected => "connected",
            StoreStatus::Disconnected => "disconnected",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database not connected")]
    Unavailable,

    #[error("{0}")]
    Driver(#[from] mongodb::error::Error),
}

/// Storage contract shared by every backend.
///
/// Lookups go through `RecordKey`, whose filters are tried in order; the
/// first filter that matches decides which document is read or mutated.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reports connectivity. May attempt a reconnect.
    async fn status(&self) -> StoreStatus;

    /// All documents matching `filter`, most recently created first.
    async fn list(&self, collection: Collection, filter: Document)
        -> Result<Vec<Document>, StoreError>;

    /// Assigns a native id, inserts, and returns the stored document.
    async fn insert(&self, collection: Collection, doc: Document)
        -> Result<Document, StoreError>;

    async fn find(&self, collection: Collection, key: &RecordKey)
        -> Result<Option<Document>, StoreError>;

    /// Sets `changes` on the matched document and returns it after the update.
    async fn update(
        &self,
        collection: Collection,
        key: &RecordKey,
        changes: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Returns `true` if a document was removed.
    async fn delete(&self, collection: Collection, key: &RecordKey) -> Result<bool, StoreError>;
}
