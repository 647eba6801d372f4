//! Tenant context
//!
//! Every import runs on behalf of exactly one organization. The context is an
//! explicit parameter to the orchestrator rather than ambient session state,
//! so the pipeline is testable without a live session and the source file can
//! never influence tenant scope.

/// Identity of the importing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    /// Organization every inserted record is stamped with.
    pub organization_id: String,
    /// Uploading user, recorded as creator where the table carries one.
    pub user_id: Option<String>,
}

impl TenantContext {
    pub fn new(organization_id: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            user_id,
        }
    }
}
