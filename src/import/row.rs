//! Row validator
//!
//! Applies a record schema to one already-split data line, producing either a
//! fully normalized record or the complete list of that row's errors. Errors
//! are collected, not short-circuited, so one pass over the file reports
//! every problem. A row with any error contributes nothing to the valid set.

use crate::import::header::ResolvedHeaders;
use crate::import::normalize::{parse_currency, parse_date, parse_non_negative_int};
use crate::import::year::YearResolver;
use crate::record::{ImportableRecord, Value};
use crate::schema::{FieldKind, RecordSchema};

fn cell<'a>(cols: &'a [String], col: Option<usize>) -> &'a str {
    col.and_then(|i| cols.get(i))
        .map(|s| s.trim())
        .unwrap_or("")
}

/// Validate one data line.
///
/// `row_num` is 1-based and counts the header line, so the first data row is
/// row 2 — matching the line the user sees in their spreadsheet.
pub fn validate_row(
    cols: &[String],
    row_num: usize,
    headers: &ResolvedHeaders,
    schema: &RecordSchema,
    years: Option<&YearResolver>,
) -> Result<ImportableRecord, Vec<String>> {
    let mut record = ImportableRecord::new();
    let mut errors = Vec::new();

    for (idx, field) in schema.fields.iter().enumerate() {
        let raw = cell(cols, headers.field_col(idx));

        if raw.is_empty() {
            if field.required {
                errors.push(format!("Row {}: {} is required", row_num, field.label()));
            } else {
                record.set(field.name, Value::Absent);
            }
            continue;
        }

        match field.kind {
            FieldKind::Text => record.set(field.name, Value::Text(raw.to_string())),
            FieldKind::Date => match parse_date(raw) {
                Some(d) => record.set(field.name, Value::Date(d)),
                None => errors.push(format!(
                    "Row {}: {} has invalid format",
                    row_num,
                    field.label()
                )),
            },
            FieldKind::Integer => match parse_non_negative_int(raw) {
                Some(n) => record.set(field.name, Value::Integer(n)),
                None => errors.push(format!(
                    "Row {}: {} must be a non-negative integer",
                    row_num,
                    field.label()
                )),
            },
            FieldKind::Currency => match parse_currency(raw) {
                Some(amount) => record.set(field.name, Value::Currency(amount)),
                None => errors.push(format!(
                    "Row {}: {} is not a valid amount",
                    row_num,
                    field.label()
                )),
            },
        }
    }

    if let (Some(partition), Some(resolver)) = (schema.partition.as_ref(), years) {
        let raw = cell(cols, headers.partition_col());
        let row_value = (!raw.is_empty()).then_some(raw);
        match resolver.resolve_row(row_value) {
            Ok(year) => record.set(partition.field, Value::Integer(i64::from(year))),
            Err(msg) => errors.push(format!("Row {}: {}", row_num, msg)),
        }
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(errors)
    }
}
