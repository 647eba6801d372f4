//! Caseflow - tenant-scoped CSV import pipeline for a nonprofit CRM
//!
//! This library validates and imports CSV exports for several record types
//! (client files, donor tracker, grant applications, networking contacts,
//! disbursed awards) through one generic pipeline, committing each batch
//! all-or-nothing into a tenant-scoped record store.

pub mod error;
pub mod import;
pub mod record;
pub mod schema;
pub mod store;
pub mod tenant;
