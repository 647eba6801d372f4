//! SQLite-backed record store
//!
//! A thin concrete store behind the [`RecordStore`] trait. Bulk inserts run
//! inside one transaction so a batch either lands whole or not at all.

use super::{RecordStore, StampedRecord, StoreError, StoredRow};
use crate::record::Value;
use crate::schema::RecordSchema;
use crate::error::CrmError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

/// Get the default database path (~/.caseflow/data.db)
pub fn default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| CrmError::Config("HOME environment variable not set".to_string()))?;
    let caseflow_dir = PathBuf::from(home).join(".caseflow");

    std::fs::create_dir_all(&caseflow_dir).context("Failed to create .caseflow directory")?;

    Ok(caseflow_dir.join("data.db"))
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store, creating tables on first use.
    pub fn open(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => default_db_path()?,
        };
        info!("Opening record store at {:?}", path);
        let conn =
            Connection::open(&path).context(format!("Failed to open database at {:?}", path))?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests and dry runs that still need a store.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;
        conn.execute_batch(include_str!("schema.sql"))
            .context("Failed to apply store schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Query("store connection poisoned".to_string()))
    }
}

/// Columns allowed in filters and ORDER BY: schema fields, the tenant
/// column, and the synthetic id. Anything else is rejected rather than
/// spliced into SQL.
fn check_column(schema: &RecordSchema, name: &str) -> Result<(), StoreError> {
    let known = name == "id"
        || name == "organization_id"
        || schema.partition.as_ref().is_some_and(|p| p.field == name)
        || schema.field(name).is_some();
    if known {
        Ok(())
    } else {
        Err(StoreError::Query(format!(
            "unknown column for {}: {}",
            schema.table, name
        )))
    }
}

/// Column list for one schema: tenant stamp columns first, then the
/// schema's fields in declaration order (the partition field is part of the
/// field values a validated record carries, stored under its own name).
fn insert_columns(schema: &'static RecordSchema) -> Vec<&'static str> {
    let mut cols = vec!["organization_id"];
    if schema.stamps_user {
        cols.push("user_id");
    }
    cols.extend(schema.fields.iter().map(|f| f.name));
    if let Some(p) = &schema.partition {
        cols.push(p.field);
    }
    cols
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    match value {
        Value::Text(s) => Sql::Text(s.clone()),
        Value::Integer(n) => Sql::Integer(*n),
        Value::Date(d) => Sql::Text(d.format("%Y-%m-%d").to_string()),
        Value::Currency(d) => Sql::Text(d.to_string()),
        Value::Absent => Sql::Null,
    }
}

fn to_display(value: rusqlite::types::Value) -> Option<String> {
    use rusqlite::types::Value as Sql;
    match value {
        Sql::Null => None,
        Sql::Integer(n) => Some(n.to_string()),
        Sql::Real(f) => Some(f.to_string()),
        Sql::Text(s) => Some(s),
        Sql::Blob(_) => None,
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert(
        &self,
        schema: &'static RecordSchema,
        records: Vec<StampedRecord>,
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let cols = insert_columns(schema);
        let placeholders = (1..=cols.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            schema.table,
            cols.join(", "),
            placeholders
        );
        debug!(table = schema.table, rows = records.len(), "bulk insert");

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Insert(e.to_string()))?;
        {
            let mut stmt = tx
                .prepare(&sql)
                .map_err(|e| StoreError::Insert(e.to_string()))?;
            for stamped in &records {
                let mut params: Vec<rusqlite::types::Value> =
                    vec![rusqlite::types::Value::Text(stamped.organization_id.clone())];
                if schema.stamps_user {
                    params.push(match &stamped.created_by {
                        Some(user) => rusqlite::types::Value::Text(user.clone()),
                        None => rusqlite::types::Value::Null,
                    });
                }
                for field in schema.fields {
                    params.push(to_sql_value(stamped.record.get(field.name)));
                }
                if let Some(p) = &schema.partition {
                    params.push(to_sql_value(stamped.record.get(p.field)));
                }
                stmt.execute(params_from_iter(params))
                    .map_err(|e| StoreError::Insert(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| StoreError::Insert(e.to_string()))?;
        Ok(())
    }

    async fn select(
        &self,
        schema: &'static RecordSchema,
        filters: &[(String, String)],
        order_by: Option<&str>,
    ) -> Result<Vec<StoredRow>, StoreError> {
        let mut field_cols: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();
        if let Some(p) = &schema.partition {
            field_cols.push(p.field);
        }

        let mut sql = format!(
            "SELECT id, organization_id, {} FROM {}",
            field_cols.join(", "),
            schema.table
        );
        let mut params: Vec<rusqlite::types::Value> = Vec::new();
        for (i, (col, value)) in filters.iter().enumerate() {
            check_column(schema, col)?;
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!("{} = ?{}", col, i + 1));
            params.push(rusqlite::types::Value::Text(value.clone()));
        }
        if let Some(order) = order_by {
            check_column(schema, order)?;
            sql.push_str(&format!(" ORDER BY {order}"));
        }

        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let id: i64 = row.get(0)?;
                let organization_id: String = row.get(1)?;
                let mut fields = Vec::with_capacity(field_cols.len());
                for i in 0..field_cols.len() {
                    let value: rusqlite::types::Value = row.get(2 + i)?;
                    fields.push(to_display(value));
                }
                Ok(StoredRow {
                    id,
                    organization_id,
                    fields,
                })
            })
            .map_err(|e| StoreError::Query(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ImportableRecord;
    use crate::schema::{CLIENT_FILES, NETWORKING_CONTACTS};

    fn contact(org: &str, user: Option<&str>, name: &str) -> StampedRecord {
        let mut record = ImportableRecord::new();
        record.set("name", Value::Text(name.to_string()));
        StampedRecord {
            organization_id: org.to_string(),
            created_by: user.map(str::to_string),
            record,
        }
    }

    #[tokio::test]
    async fn test_insert_and_select_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(
                &NETWORKING_CONTACTS,
                vec![
                    contact("org-1", Some("u-1"), "Ada"),
                    contact("org-1", None, "Grace"),
                    contact("org-2", Some("u-2"), "Edsger"),
                ],
            )
            .await
            .unwrap();

        let rows = store
            .select(
                &NETWORKING_CONTACTS,
                &[("organization_id".to_string(), "org-1".to_string())],
                Some("name"),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields[0].as_deref(), Some("Ada"));
        assert_eq!(rows[1].fields[0].as_deref(), Some("Grace"));
    }

    #[tokio::test]
    async fn test_insert_rejects_null_required_column_atomically() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut blank = ImportableRecord::new();
        blank.set("name", Value::Absent);
        let batch = vec![
            contact("org-1", None, "Ada"),
            StampedRecord {
                organization_id: "org-1".to_string(),
                created_by: None,
                record: blank,
            },
        ];

        let err = store.insert(&NETWORKING_CONTACTS, batch).await.unwrap_err();
        assert!(matches!(err, StoreError::Insert(_)));

        // Nothing from the failed batch is visible
        let rows = store.select(&NETWORKING_CONTACTS, &[], None).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_filter_column_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .select(
                &CLIENT_FILES,
                &[("evil; DROP TABLE".to_string(), "x".to_string())],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn test_partition_column_stored_and_filterable() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut record = ImportableRecord::new();
        record.set("client_name", Value::Text("Jane Doe".to_string()));
        record.set("year", Value::Integer(2023));
        store
            .insert(
                &CLIENT_FILES,
                vec![StampedRecord {
                    organization_id: "org-1".to_string(),
                    created_by: None,
                    record,
                }],
            )
            .await
            .unwrap();

        let rows = store
            .select(
                &CLIENT_FILES,
                &[("year".to_string(), "2023".to_string())],
                None,
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].organization_id, "org-1");
    }
}
