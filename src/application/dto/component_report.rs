use crate::reconciliation::domain::{ArtifactMatch, Component, MatchConfidence};
use serde::Serialize;

/// Final registry state of one component after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStatus {
    /// A release carrying the component's purl was already registered
    Existing,
    /// A new release was created
    Created,
    /// Release creation hit an existing entity which was then located and linked
    Linked,
    /// The registry holds the name under a different package type or package; left alone
    Conflicting,
    /// A hard failure; the batch exit code reflects it
    Failed,
    /// Not registered (dry run)
    Unregistered,
}

impl ReconcileStatus {
    pub fn is_failure(self) -> bool {
        self == ReconcileStatus::Failed
    }
}

impl std::fmt::Display for ReconcileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReconcileStatus::Existing => "existing",
            ReconcileStatus::Created => "created",
            ReconcileStatus::Linked => "linked",
            ReconcileStatus::Conflicting => "conflicting",
            ReconcileStatus::Failed => "failed",
            ReconcileStatus::Unregistered => "unregistered",
        };
        write!(f, "{}", label)
    }
}

/// ComponentReport - one annotated component in the run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub version: String,
    pub purl: String,
    pub repo_name: String,
    pub repo_path: String,
    pub package_file_name: String,
    pub is_internal: bool,
    pub match_confidence: Option<MatchConfidence>,
    /// Empty when unresolved; flagged for manual follow-up
    pub linked_release_id: String,
    pub status: ReconcileStatus,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentReport {
    /// Starts a report from the component's resolved origin
    pub fn from_component(component: &Component, status: ReconcileStatus) -> Self {
        let artifact = component
            .origin()
            .map(|origin| origin.artifact.clone())
            .unwrap_or_else(ArtifactMatch::not_found);

        Self {
            name: component.name().to_string(),
            group: component.group().map(str::to_string),
            version: component.version().to_string(),
            purl: component.purl().as_str().to_string(),
            repo_name: artifact.repo_name,
            repo_path: artifact.repo_path,
            package_file_name: artifact.package_file_name,
            is_internal: component.is_internal(),
            match_confidence: artifact.confidence,
            linked_release_id: String::new(),
            status,
            warnings: Vec::new(),
            error: None,
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn fail(mut self, error: impl std::fmt::Display) -> Self {
        self.status = ReconcileStatus::Failed;
        self.error = Some(error.to_string());
        self
    }

    pub fn is_linked(&self) -> bool {
        !self.linked_release_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::domain::artifact::REPO_NOT_FOUND;
    use crate::reconciliation::domain::{ArtifactRecord, ComponentOrigin};

    fn component() -> Component {
        Component::new(
            "adduser".to_string(),
            "3.118".to_string(),
            "pkg:deb/debian/adduser@3.118?arch=all",
        )
        .unwrap()
    }

    #[test]
    fn test_report_without_origin() {
        let report = ComponentReport::from_component(&component(), ReconcileStatus::Unregistered);
        assert_eq!(report.repo_name, REPO_NOT_FOUND);
        assert!(!report.is_internal);
        assert!(!report.is_linked());
        assert!(report.match_confidence.is_none());
    }

    #[test]
    fn test_report_copies_origin() {
        let mut c = component();
        let record = ArtifactRecord::new("adduser_3.118_all.deb", "pool/main/a/adduser", "debian-release");
        c.attach_origin(ComponentOrigin {
            is_internal: true,
            artifact: ArtifactMatch::found(&record, MatchConfidence::Heuristic),
        })
        .unwrap();

        let mut report = ComponentReport::from_component(&c, ReconcileStatus::Created);
        report.linked_release_id = "r1".to_string();
        assert_eq!(report.repo_name, "debian-release");
        assert_eq!(report.package_file_name, "adduser_3.118_all.deb");
        assert!(report.is_internal);
        assert_eq!(report.match_confidence, Some(MatchConfidence::Heuristic));
        assert!(report.is_linked());
    }

    #[test]
    fn test_fail_sets_status_and_error() {
        let report = ComponentReport::from_component(&component(), ReconcileStatus::Created)
            .fail("registry rejected create release with status 500");
        assert_eq!(report.status, ReconcileStatus::Failed);
        assert!(report.status.is_failure());
        assert!(report.error.unwrap().contains("500"));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_value(ReconcileStatus::Unregistered).unwrap();
        assert_eq!(json, "unregistered");
    }
}
