use super::component_report::{ComponentReport, ReconcileStatus};
use crate::shared::error::ExitCode;
use serde::Serialize;

/// Tool name written into every report
pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");

/// Tool version written into every report
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// RunMetadata - identifies one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub timestamp: String,
    pub tool_name: String,
    pub tool_version: String,
}

impl RunMetadata {
    /// Metadata for a run starting now, with a fresh random id
    pub fn generate() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_name: TOOL_NAME.to_string(),
            tool_version: TOOL_VERSION.to_string(),
        }
    }
}

/// Per-status counts over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub total: usize,
    pub internal: usize,
    pub found_in_repo: usize,
    pub existing: usize,
    pub created: usize,
    pub linked: usize,
    pub conflicting: usize,
    pub failed: usize,
    pub unregistered: usize,
    pub warnings: usize,
}

impl ReconcileSummary {
    pub fn from_reports(reports: &[ComponentReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Self::default()
        };

        for report in reports {
            if report.is_internal {
                summary.internal += 1;
            }
            if report.match_confidence.is_some() {
                summary.found_in_repo += 1;
            }
            summary.warnings += report.warnings.len();
            match report.status {
                ReconcileStatus::Existing => summary.existing += 1,
                ReconcileStatus::Created => summary.created += 1,
                ReconcileStatus::Linked => summary.linked += 1,
                ReconcileStatus::Conflicting => summary.conflicting += 1,
                ReconcileStatus::Failed => summary.failed += 1,
                ReconcileStatus::Unregistered => summary.unregistered += 1,
            }
        }

        summary
    }
}

/// ReconcileResponse - outcome of a full reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResponse {
    pub metadata: RunMetadata,
    pub summary: ReconcileSummary,
    /// Sorted by (name, version)
    pub components: Vec<ComponentReport>,
}

impl ReconcileResponse {
    pub fn new(metadata: RunMetadata, mut components: Vec<ComponentReport>) -> Self {
        components.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));
        let summary = ReconcileSummary::from_reports(&components);
        Self {
            metadata,
            summary,
            components,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    /// Batch exit code: only hard per-component failures flip it
    pub fn exit_code(&self) -> ExitCode {
        if self.has_failures() {
            ExitCode::ReconciliationFailures
        } else {
            ExitCode::Success
        }
    }

    pub fn to_json(&self) -> crate::shared::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
