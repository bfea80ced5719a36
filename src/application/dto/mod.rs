/// Data Transfer Objects for application layer
///
/// DTOs carry data between the application layer and adapters,
/// keeping the reconciliation domain isolated.
mod component_report;
mod reconcile_request;
mod reconcile_response;

pub use component_report::{ComponentReport, ReconcileStatus};
pub use reconcile_request::{
    ReconcileRequest, ReconcileRequestBuilder, DEFAULT_CONCURRENCY, MAX_CONCURRENCY,
};
pub use reconcile_response::{
    ReconcileResponse, ReconcileSummary, RunMetadata, TOOL_NAME, TOOL_VERSION,
};
