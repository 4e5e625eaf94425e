//! Keyed-document persistence.
//!
//! Every entity lives in one of three collections (`users`, `stores`,
//! `products`) as a single JSON document. The [`RecordStore`] trait is the
//! only seam the services see; it is implemented by:
//!
//! - [`MemoryStore`] - insertion-ordered in-memory backend for tests and
//!   local development
//! - [`PgStore`] - `PostgreSQL` backend storing each collection in a
//!   `(id TEXT PRIMARY KEY, doc JSONB)` table
//!
//! Filters and sorts are composed with [`Filter`] and [`Sort`]; partial
//! updates are described by a [`FieldPatch`] of dotted-path/value pairs.

pub mod filter;
pub mod memory;
pub mod patch;
pub mod postgres;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use filter::{Filter, Sort, SortDirection, SortKeyError};
pub use memory::MemoryStore;
pub use patch::FieldPatch;
pub use postgres::PgStore;

/// A document type bound to a named collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the collection (and backing table) holding this type.
    const COLLECTION: &'static str;

    /// The document's primary key.
    fn record_id(&self) -> &str;
}

/// Errors surfaced by record store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document with the same id already exists.
    #[error("duplicate id '{0}'")]
    DuplicateId(String),

    /// A stored document no longer deserializes into its record type.
    #[error("corrupt document in '{collection}': {message}")]
    Corrupt {
        /// Collection holding the offending document.
        collection: &'static str,
        /// Deserialization failure detail.
        message: String,
    },
}

impl StoreError {
    pub(crate) fn corrupt(collection: &'static str, err: &serde_json::Error) -> Self {
        Self::Corrupt {
            collection,
            message: err.to_string(),
        }
    }
}

/// Generic keyed access to the document collections.
///
/// All methods are a single round trip against the backend; none takes a
/// lock across awaits. The store handle itself must be safe to share
/// across concurrently running requests.
pub trait RecordStore: Send + Sync {
    /// Unfiltered scan of a collection. No ordering guarantee.
    fn find_all<R: Record>(&self) -> impl Future<Output = Result<Vec<R>, StoreError>> + Send;

    /// Look up a document by its primary key.
    fn find_by_id<R: Record>(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<R>, StoreError>> + Send;

    /// First document matching `filter`, if any.
    fn find_one<R: Record>(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = Result<Option<R>, StoreError>> + Send;

    /// All documents matching `filter`, optionally sorted.
    fn find_many<R: Record>(
        &self,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> impl Future<Output = Result<Vec<R>, StoreError>> + Send;

    /// Insert a full document. The caller is responsible for assigning an
    /// id beforehand (blank ids are generated at the service layer).
    ///
    /// Fails with [`StoreError::DuplicateId`] when the key is taken.
    fn insert<R: Record>(&self, record: &R)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Apply only the field/value pairs in `patch` to one document.
    ///
    /// Returns the number of matched documents (0 or 1). A match counts
    /// even when every patched field already held its new value.
    fn update_fields<R: Record>(
        &self,
        id: &str,
        patch: &FieldPatch,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Delete a document by id. Absence is not an error.
    fn delete_by_id<R: Record>(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool is created once at process start and shared for the process
/// lifetime; no per-request connection setup happens anywhere else.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
