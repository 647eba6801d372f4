//! Header resolver
//!
//! Maps a schema's canonical fields to column positions in an arbitrary
//! header row. Matching is case-insensitive and trims surrounding whitespace;
//! a field may carry alternate aliases which are tried in order after the
//! primary one. A missing required header fails the whole file before any
//! row is processed.

use crate::schema::RecordSchema;
use tracing::debug;

/// Column positions for one schema against one header row.
#[derive(Debug)]
pub struct ResolvedHeaders {
    field_cols: Vec<Option<usize>>,
    partition_col: Option<usize>,
}

impl ResolvedHeaders {
    /// Column index for the i-th schema field, if its header was present.
    pub fn field_col(&self, field_idx: usize) -> Option<usize> {
        self.field_cols[field_idx]
    }

    /// Column index of the partition-key column (e.g. "Year"), if present.
    pub fn partition_col(&self) -> Option<usize> {
        self.partition_col
    }
}

fn find_alias(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let want = alias.trim();
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(want))
    })
}

/// Resolve every schema field (and the partition column, where the schema
/// has one) against the header row.
///
/// Returns the accumulated file-level errors when any required header is
/// absent; a missing optional header simply resolves to no column.
pub fn resolve_headers(
    headers: &[String],
    schema: &RecordSchema,
) -> Result<ResolvedHeaders, Vec<String>> {
    let mut errors = Vec::new();
    let mut field_cols = Vec::with_capacity(schema.fields.len());

    for field in schema.fields {
        let col = find_alias(headers, field.aliases);
        if col.is_none() && field.required {
            errors.push(format!("Missing required header: {}", field.label()));
        }
        field_cols.push(col);
    }

    let partition_col = schema
        .partition
        .as_ref()
        .and_then(|p| find_alias(headers, p.aliases));

    if !errors.is_empty() {
        return Err(errors);
    }

    debug!(table = schema.table, ?field_cols, ?partition_col, "resolved headers");
    Ok(ResolvedHeaders {
        field_cols,
        partition_col,
    })
}
