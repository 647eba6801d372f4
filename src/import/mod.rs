//! CSV import pipeline
//!
//! One generic pipeline drives every record type: split the header, resolve
//! columns against the record schema, validate each data row, then commit the
//! batch all-or-nothing. If any row fails validation nothing is inserted and
//! the complete error list is returned so the source file can be fixed in one
//! pass. Accepted batches are bulk-inserted through the record store, each
//! record stamped with the importing session's organization (and creator
//! where the table records one).

pub mod header;
pub mod line;
pub mod normalize;
pub mod row;
pub mod year;

use crate::error::{CrmError, Result};
use crate::record::ImportableRecord;
use crate::schema::RecordType;
use crate::store::{RecordStore, StampedRecord};
use crate::tenant::TenantContext;
use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};

/// One upload to process.
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub record_type: RecordType,
    /// Raw file text; a leading UTF-8 BOM is tolerated.
    pub text: &'a str,
    /// Source filename, consulted for year inference where applicable.
    pub filename: Option<&'a str>,
    /// Request-level reporting-year override; wins over any per-row value.
    pub year_override: Option<i32>,
}

/// Validation result for one file, before any persistence.
#[derive(Debug)]
pub enum ValidationResult {
    /// File-level failure or at least one invalid row; nothing may be
    /// inserted. The error list is complete (display capping is the
    /// caller's concern).
    Blocked { errors: Vec<String> },
    /// The file parsed cleanly but has no data rows. A warning, not an
    /// error.
    Empty,
    Valid { records: Vec<ImportableRecord> },
}

/// Final outcome reported to the caller.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    Accepted { inserted: usize },
    Blocked { errors: Vec<String> },
    Empty,
}

/// Validate a file end-to-end without touching the store.
///
/// This is the whole pipeline minus persistence; `run_import` builds on it
/// and the CLI uses it directly for dry runs.
pub fn validate(request: &ImportRequest<'_>) -> ValidationResult {
    let schema = request.record_type.schema();
    let text = request.text.strip_prefix('\u{feff}').unwrap_or(request.text);

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return ValidationResult::Blocked {
            errors: vec!["CSV is empty".to_string()],
        };
    }

    let header_fields = line::split_line(lines[0]);
    let headers = match header::resolve_headers(&header_fields, schema) {
        Ok(resolved) => resolved,
        Err(errors) => return ValidationResult::Blocked { errors },
    };

    let years = schema
        .partition
        .as_ref()
        .map(|p| year::YearResolver::new(p, request.year_override, request.filename));
    if let Some(resolver) = &years {
        if let Err(message) = resolver.check_override() {
            return ValidationResult::Blocked {
                errors: vec![message],
            };
        }
        if !resolver.has_any_source(headers.partition_col().is_some()) {
            return ValidationResult::Blocked {
                errors: vec![
                    "Provide a Year: add a Year column, set a year override, or include \
                     a 4-digit year in the filename"
                        .to_string(),
                ],
            };
        }
    }

    let data_lines = &lines[1..];
    if data_lines.is_empty() {
        return ValidationResult::Empty;
    }

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for (i, raw_line) in data_lines.iter().enumerate() {
        // First data row is row 2, counting the header line
        let row_num = i + 2;
        let cols = line::split_line(raw_line);
        match row::validate_row(&cols, row_num, &headers, schema, years.as_ref()) {
            Ok(record) => records.push(record),
            Err(mut row_errors) => errors.append(&mut row_errors),
        }
    }

    if !errors.is_empty() {
        warn!(
            table = schema.table,
            count = errors.len(),
            "import blocked by validation errors"
        );
        return ValidationResult::Blocked { errors };
    }
    if records.is_empty() {
        return ValidationResult::Empty;
    }
    ValidationResult::Valid { records }
}

/// Run one import: validate the file and, if every row is clean, bulk-insert
/// the batch scoped to `tenant`. The store call is the only await point; its
/// failure propagates as an error, never as a partial import.
pub async fn run_import<S: RecordStore + ?Sized>(
    store: &S,
    tenant: &TenantContext,
    request: ImportRequest<'_>,
) -> Result<ImportOutcome> {
    let schema = request.record_type.schema();

    let records = match validate(&request) {
        ValidationResult::Blocked { errors } => return Ok(ImportOutcome::Blocked { errors }),
        ValidationResult::Empty => return Ok(ImportOutcome::Empty),
        ValidationResult::Valid { records } => records,
    };

    let stamped: Vec<StampedRecord> = records
        .into_iter()
        .map(|record| StampedRecord {
            organization_id: tenant.organization_id.clone(),
            created_by: if schema.stamps_user {
                tenant.user_id.clone()
            } else {
                None
            },
            record,
        })
        .collect();

    let inserted = stamped.len();
    store
        .insert(schema, stamped)
        .await
        .map_err(|e| CrmError::Store(e.to_string()))
        .context("record store rejected the import batch")?;

    info!(
        table = schema.table,
        rows = inserted,
        org = %tenant.organization_id,
        "import accepted"
    );
    Ok(ImportOutcome::Accepted { inserted })
}
