use std::time::{Duration, Instant};

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Client, Database};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::store::{
    Collection, DocumentStore, RecordKey, StoreError, StoreStatus, CREATED_AT_FIELD,
    NATIVE_ID_FIELD,
};

const CONNECT_ATTEMPTS: u32 = 3;
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Minimum spacing between on-demand reconnect attempts.
const RECONNECT_COOLDOWN: Duration = Duration::from_secs(5);

/// MongoDB-backed document store.
///
/// Connecting is an explicit startup step. If the database is unreachable the
/// store starts disconnected and reconnects on demand, at most once per
/// `RECONNECT_COOLDOWN`. Once a handle is held, the driver's own pool deals
/// with topology changes.
pub struct MongoStore {
    uri: String,
    database_name: String,
    database: RwLock<Option<Database>>,
    last_attempt: Mutex<Option<Instant>>,
}

impl MongoStore {
    /// Connects with exponential backoff (1s, 2s). Never fails: on exhaustion
    /// the store is returned disconnected and requests see `Unavailable`.
    pub async fn connect(uri: &str, database_name: &str) -> Self {
        let store = Self {
            uri: uri.to_string(),
            database_name: database_name.to_string(),
            database: RwLock::new(None),
            last_attempt: Mutex::new(None),
        };

        for attempt in 0..CONNECT_ATTEMPTS {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "MongoDB connect attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match open_database(&store.uri, &store.database_name).await {
                Ok(db) => {
                    info!("Connected to MongoDB database '{}'", store.database_name);
                    *store.database.write().await = Some(db);
                    return store;
                }
                Err(e) => warn!("MongoDB connection error: {e}"),
            }
        }

        *store.last_attempt.lock().await = Some(Instant::now());
        warn!(
            "MongoDB unreachable after {CONNECT_ATTEMPTS} attempts; starting disconnected"
        );
        store
    }

    /// Returns the cached handle, reconnecting if none is held and the
    /// cooldown has elapsed.
    async fn database(&self) -> Result<Database, StoreError> {
        if let Some(db) = self.database.read().await.as_ref() {
            return Ok(db.clone());
        }

        let mut last_attempt = self.last_attempt.lock().await;

        // Another request may have reconnected while we waited on the lock.
        if let Some(db) = self.database.read().await.as_ref() {
            return Ok(db.clone());
        }

        let now = Instant::now();
        if !reconnect_due(*last_attempt, now) {
            return Err(StoreError::Unavailable);
        }
        *last_attempt = Some(now);

        match open_database(&self.uri, &self.database_name).await {
            Ok(db) => {
                info!("Reconnected to MongoDB database '{}'", self.database_name);
                *self.database.write().await = Some(db.clone());
                Ok(db)
            }
            Err(e) => {
                warn!("MongoDB reconnect failed: {e}");
                Err(StoreError::Unavailable)
            }
        }
    }

    async fn collection(
        &self,
        collection: Collection,
    ) -> Result<mongodb::Collection<Document>, StoreError> {
        Ok(self.database().await?.collection::<Document>(collection.name()))
    }
}

/// Whether an on-demand reconnect may run at `now`, given the previous attempt.
fn reconnect_due(last_attempt: Option<Instant>, now: Instant) -> bool {
    match last_attempt {
        Some(at) => now.saturating_duration_since(at) >= RECONNECT_COOLDOWN,
        None => true,
    }
}

async fn open_database(uri: &str, database_name: &str) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    let client = Client::with_options(options)?;
    let db = client.database(database_name);
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(db)
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn status(&self) -> StoreStatus {
        match self.database().await {
            Ok(_) => StoreStatus::Connected,
            Err(_) => StoreStatus::Disconnected,
        }
    }

    async fn list(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        let options = FindOptions::builder()
            .sort(doc! { CREATED_AT_FIELD: -1 })
            .build();

        let cursor = self
            .collection(collection)
            .await?
            .find(filter)
            .with_options(options)
            .await?;

        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn insert(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<Document, StoreError> {
        doc.insert(NATIVE_ID_FIELD, ObjectId::new());
        self.collection(collection).await?.insert_one(&doc).await?;
        Ok(doc)
    }

    async fn find(
        &self,
        collection: Collection,
        key: &RecordKey,
    ) -> Result<Option<Document>, StoreError> {
        let coll = self.collection(collection).await?;
        for filter in key.filters() {
            if let Some(found) = coll.find_one(filter).await? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    async fn update(
        &self,
        collection: Collection,
        key: &RecordKey,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        let coll = self.collection(collection).await?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        for filter in key.filters() {
            let updated = coll
                .find_one_and_update(filter, doc! { "$set": changes.clone() })
                .with_options(options.clone())
                .await?;
            if updated.is_some() {
                return Ok(updated);
            }
        }
        Ok(None)
    }

    async fn delete(&self, collection: Collection, key: &RecordKey) -> Result<bool, StoreError> {
        let coll = self.collection(collection).await?;
        for filter in key.filters() {
            if coll.delete_one(filter).await?.deleted_count > 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reconnect_is_always_due() {
        assert!(reconnect_due(None, Instant::now()));
    }

    #[test]
    fn test_reconnect_refused_inside_cooldown() {
        let at = Instant::now();
        assert!(!reconnect_due(Some(at), at));
        assert!(!reconnect_due(Some(at), at + Duration::from_millis(4_999)));
    }

    #[test]
    fn test_reconnect_due_once_cooldown_elapsed() {
        let at = Instant::now();
        assert!(reconnect_due(Some(at), at + RECONNECT_COOLDOWN));
        assert!(reconnect_due(Some(at), at + Duration::from_secs(60)));
    }

    #[test]
    fn test_clock_behind_last_attempt_is_refused() {
        let now = Instant::now();
        assert!(!reconnect_due(Some(now + Duration::from_secs(1)), now));
    }
}
