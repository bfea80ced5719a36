use crate::ports::outbound::RegistryClient;
use crate::reconciliation::domain::purl::strip_source_arch;
use crate::reconciliation::domain::{EntityKind, ExternalIdKey, IdentityMatch, RegistryRef};
use crate::reconciliation::services::{ExternalIdMerger, IdentitySelector};
use crate::shared::error::EngineError;
use tracing::{debug, warn};

type EngineResult<T> = std::result::Result<T, EngineError>;

/// RegistryIdentityResolver - looks up existing registry entities for a component
///
/// Purl searches try both external-id key encodings the registry has used,
/// then retry Debian purls without their `arch=source` qualifier. Candidate
/// selection itself is the pure [`IdentitySelector`] heuristic.
pub struct RegistryIdentityResolver<'a, R: ?Sized> {
    client: &'a R,
}

impl<'a, R: RegistryClient + ?Sized> RegistryIdentityResolver<'a, R> {
    pub fn new(client: &'a R) -> Self {
        Self { client }
    }

    /// Resolves a registry component by purl
    pub async fn resolve_component(&self, name: &str, external_id: &str) -> EngineResult<IdentityMatch> {
        let candidates = self.search(EntityKind::Component, external_id).await?;
        Ok(Self::select(name, candidates))
    }

    /// Resolves a registry release by purl, keeping only candidates of `version`
    pub async fn resolve_release(
        &self,
        name: &str,
        version: &str,
        external_id: &str,
    ) -> EngineResult<IdentityMatch> {
        let candidates: Vec<RegistryRef> = self
            .search(EntityKind::Release, external_id)
            .await?
            .into_iter()
            .filter(|c| c.version.as_deref().is_none_or(|v| v == version))
            .collect();
        Ok(Self::select(name, candidates))
    }

    /// Exact name and version lookup over the release listing
    pub async fn find_release_by_name_version(
        &self,
        name: &str,
        version: &str,
    ) -> EngineResult<Option<RegistryRef>> {
        let releases = self
            .client
            .find_releases_by_name_version(name, version)
            .await
            .map_err(|e| EngineError::transport("release name lookup", e))?;

        Ok(releases.into_iter().find(|r| {
            r.name.eq_ignore_ascii_case(name) && r.version.as_deref().is_none_or(|v| v == version)
        }))
    }

    /// Resolves a component by name after a create conflict
    ///
    /// Candidates recording purls of the component's package type are
    /// preferred, and among those the ones recording this very package. When
    /// every candidate records another type the match is flagged as
    /// conflicting and must not be linked.
    pub async fn resolve_component_by_name(&self, name: &str, purl: &str) -> EngineResult<IdentityMatch> {
        let listed = self
            .client
            .find_components_by_name(name)
            .await
            .map_err(|e| EngineError::transport("component name lookup", e))?;

        let mut compatible = Vec::new();
        let mut conflicting = Vec::new();
        for candidate in listed.into_iter().filter(|c| c.name.eq_ignore_ascii_case(name)) {
            let full = self
                .client
                .fetch(EntityKind::Component, candidate.id())
                .await
                .map_err(|e| EngineError::transport("component fetch", e))?;
            match ExternalIdMerger::detect_type_conflict(&full.external_ids, purl) {
                Some(recorded_type) => conflicting.push((full, recorded_type)),
                None => compatible.push(full),
            }
        }

        if !compatible.is_empty() {
            let (same_package, foreign): (Vec<RegistryRef>, Vec<RegistryRef>) = compatible
                .into_iter()
                .partition(|c| ExternalIdMerger::detect_package_conflict(&c.external_ids, purl).is_none());
            let pool = if same_package.is_empty() { foreign } else { same_package };
            return Ok(Self::select(name, pool));
        }
        if conflicting.is_empty() {
            return Ok(IdentityMatch::none());
        }

        let recorded_types: Vec<String> = conflicting.iter().map(|(_, t)| t.clone()).collect();
        warn!(
            component = %name,
            purl = %purl,
            recorded_types = ?recorded_types,
            "registry component records a different package type"
        );
        let mut identity = Self::select(name, conflicting.into_iter().map(|(c, _)| c).collect());
        identity.conflicting_package_type = true;
        Ok(identity)
    }

    fn select(name: &str, candidates: Vec<RegistryRef>) -> IdentityMatch {
        let count = candidates.len();
        let identity = IdentitySelector::select(name, candidates);
        if identity.ambiguous {
            debug!(
                component = %name,
                candidates = count,
                selected = ?identity.id(),
                "{}",
                EngineError::AmbiguousIdentity {
                    name: name.to_string(),
                    candidates: count,
                }
            );
        }
        identity
    }

    async fn search(&self, kind: EntityKind, external_id: &str) -> EngineResult<Vec<RegistryRef>> {
        let found = self.search_keys(kind, external_id).await?;
        if !found.is_empty() {
            return Ok(found);
        }

        match strip_source_arch(external_id) {
            Some(stripped) => {
                debug!(purl = %external_id, retry = %stripped, "retrying without arch=source");
                self.search_keys(kind, &stripped).await
            }
            None => Ok(found),
        }
    }

    async fn search_keys(&self, kind: EntityKind, external_id: &str) -> EngineResult<Vec<RegistryRef>> {
        for key in ExternalIdKey::SEARCH_ORDER {
            let found = self
                .client
                .find_by_external_id(kind, key, external_id)
                .await
                .map_err(|e| EngineError::transport(format!("{} search", kind), e))?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }
}
