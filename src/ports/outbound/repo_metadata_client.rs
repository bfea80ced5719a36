use crate::reconciliation::domain::ArtifactRecord;
use async_trait::async_trait;

/// RepoMetadataClient port for searching the artifact repository
///
/// # Async Support
/// Implementations must be `Send + Sync`; the engine queries it from
/// concurrently running tasks.
#[async_trait]
pub trait RepoMetadataClient: Send + Sync {
    /// Lists every artifact stored in the given repositories
    ///
    /// # Returns
    /// A flat list of artifact records. No match, an empty repo list and
    /// transport failures all yield an empty list; failures are logged by the
    /// implementation rather than returned.
    async fn get_components_by_repo(&self, repo_names: &[String]) -> Vec<ArtifactRecord>;
}
