// Record store - tenant-scoped table access

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::record::ImportableRecord;
use crate::schema::RecordSchema;
use async_trait::async_trait;
use thiserror::Error;

/// A validated record stamped with its tenant scope, ready for insertion.
///
/// The stamp comes from the importing session, never from the source file.
#[derive(Debug, Clone)]
pub struct StampedRecord {
    pub organization_id: String,
    /// Creator, populated only for tables that carry a `user_id` column.
    pub created_by: Option<String>,
    pub record: ImportableRecord,
}

/// One stored row as read back for display: id plus the schema's fields in
/// declaration order, rendered as text (`None` for NULL).
#[derive(Debug)]
pub struct StoredRow {
    pub id: i64,
    pub organization_id: String,
    pub fields: Vec<Option<String>>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("bulk insert failed: {0}")]
    Insert(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Tenant-scoped table read/write.
///
/// `insert` is atomic from the caller's point of view: either the whole
/// batch lands or none of it does. Failures are surfaced once, not retried.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(
        &self,
        schema: &'static RecordSchema,
        records: Vec<StampedRecord>,
    ) -> Result<(), StoreError>;

    /// Equality-filtered read in schema field order. Filter and order
    /// columns must name schema fields (or `organization_id`).
    async fn select(
        &self,
        schema: &'static RecordSchema,
        filters: &[(String, String)],
        order_by: Option<&str>,
    ) -> Result<Vec<StoredRow>, StoreError>;
}
