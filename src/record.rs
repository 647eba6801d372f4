//! Normalized record values
//!
//! Every field parsed out of a CSV row lands in a small closed set of typed
//! values instead of an untyped string map, so the row validator and the
//! record store share one contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single normalized field value.
///
/// `Absent` is distinct from an empty string: a blank cell in the source file
/// becomes `Absent`, preserving the "field is unset" signal for downstream
/// display (stored as SQL NULL).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Currency(Decimal),
    Absent,
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Render the value the way it is stored (dates as YYYY-MM-DD,
    /// currency as a plain decimal string). `None` for `Absent`.
    pub fn display(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::Currency(d) => Some(d.to_string()),
            Value::Absent => None,
        }
    }
}

/// One validated row, keyed by canonical field name.
///
/// Field names come from the record type's schema, so keys are `'static`.
/// Tenant stamping (organization id, creator) is deliberately NOT part of
/// this type; it is applied by the orchestrator at insert time and can never
/// be supplied by the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportableRecord {
    fields: BTreeMap<&'static str, Value>,
}

impl ImportableRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: Value) {
        self.fields.insert(name, value);
    }

    /// Value for a canonical field; `Absent` if the field was never set.
    pub fn get(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&Value::Absent)
    }

}
