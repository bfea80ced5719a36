use crate::ports::outbound::RepoMetadataClient;
use crate::reconciliation::domain::{ArtifactMatch, ArtifactRecord, Component, ComponentOrigin};
use crate::reconciliation::services::ArtifactMatcher;
use crate::shared::Result;
use tracing::debug;

/// Result of classifying one component against the internal repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalClassification {
    pub is_internal: bool,
    /// Repository that matched, or the not-found sentinel
    pub matched_repo: String,
}

/// Counts reported after an origin pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OriginStats {
    pub internal: usize,
    pub external: usize,
    pub not_found: usize,
}

/// ResolveOriginUseCase - attaches repository origin to every component
///
/// The repositories are searched once per pass. Each component is first
/// matched against the internal repositories; a hit marks it internal.
/// Otherwise it is matched against every configured repository to find
/// where the third-party artifact was pulled from.
///
/// # Type Parameters
/// * `Q` - RepoMetadataClient implementation
pub struct ResolveOriginUseCase<Q> {
    repo_client: Q,
}

impl<Q: RepoMetadataClient> ResolveOriginUseCase<Q> {
    pub fn new(repo_client: Q) -> Self {
        Self { repo_client }
    }

    /// Decides whether a component is published by the organization
    ///
    /// An empty repository answer means "not internal", never an error.
    pub async fn classify_internal(
        &self,
        component: &Component,
        internal_repos: &[String],
    ) -> InternalClassification {
        if internal_repos.is_empty() {
            return Self::classify(component, &[]);
        }
        let records = self.repo_client.get_components_by_repo(internal_repos).await;
        Self::classify(component, &records)
    }

    /// Classifies a component against records already fetched from the internal repositories
    pub fn classify(component: &Component, internal_records: &[ArtifactRecord]) -> InternalClassification {
        let artifact = ArtifactMatcher::find_match(internal_records, component);
        InternalClassification {
            is_internal: artifact.is_found(),
            matched_repo: artifact.repo_name,
        }
    }

    /// Attaches an origin to every component that has none yet
    ///
    /// # Arguments
    /// * `components` - Components of this pass; each is updated in place
    /// * `internal_repos` - Repositories holding organization packages
    /// * `search_repos` - Every repository searched for third-party origins
    pub async fn execute(
        &self,
        components: &mut [Component],
        internal_repos: &[String],
        search_repos: &[String],
    ) -> Result<OriginStats> {
        let internal_records = if internal_repos.is_empty() {
            Vec::new()
        } else {
            self.repo_client.get_components_by_repo(internal_repos).await
        };

        let external_repos: Vec<String> = search_repos
            .iter()
            .filter(|repo| !internal_repos.contains(repo))
            .cloned()
            .collect();
        let external_records = if external_repos.is_empty() {
            Vec::new()
        } else {
            self.repo_client.get_components_by_repo(&external_repos).await
        };

        debug!(
            internal_records = internal_records.len(),
            external_records = external_records.len(),
            "repository search finished"
        );

        let mut stats = OriginStats::default();
        for component in components.iter_mut() {
            if component.origin().is_some() {
                continue;
            }

            let origin = Self::resolve(component, &internal_records, &external_records);
            match (&origin.artifact, origin.is_internal) {
                (_, true) => stats.internal += 1,
                (artifact, false) if artifact.is_found() => stats.external += 1,
                _ => stats.not_found += 1,
            }

            debug!(
                component = %component.name(),
                version = %component.version(),
                repo = %origin.artifact.repo_name,
                internal = origin.is_internal,
                "origin resolved"
            );
            component.attach_origin(origin)?;
        }

        Ok(stats)
    }

    fn resolve(
        component: &Component,
        internal_records: &[ArtifactRecord],
        external_records: &[ArtifactRecord],
    ) -> ComponentOrigin {
        let internal = ArtifactMatcher::find_match(internal_records, component);
        if internal.is_found() {
            return ComponentOrigin {
                is_internal: true,
                artifact: internal,
            };
        }

        let artifact = if external_records.is_empty() {
            ArtifactMatch::not_found()
        } else {
            ArtifactMatcher::find_match(external_records, component)
        };
        ComponentOrigin {
            is_internal: false,
            artifact,
        }
    }
}
