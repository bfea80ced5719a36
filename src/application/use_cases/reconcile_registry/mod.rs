use crate::application::dto::{ComponentReport, ReconcileStatus};
use crate::application::use_cases::RegistryIdentityResolver;
use crate::ports::outbound::{NewComponent, NewRelease, RegistryClient};
use crate::reconciliation::domain::purl::purl_type_of;
use crate::reconciliation::domain::{Component, EntityKind, ExternalIds, PURL_ID_KEY};
use crate::reconciliation::services::{ExternalIdMerger, MergeOutcome, ResultAggregator};
use crate::shared::error::EngineError;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};


type EngineResult<T> = std::result::Result<T, EngineError>;

/// Outcome of making sure a registry component exists for a component
enum ComponentResolution {
    Resolved(String),
    /// The only entity under this name belongs to another package
    Conflicting(EngineError),
}

/// ReconcileRegistryUseCase - registers components and releases, linking existing ones
///
/// Per component the flow is:
/// 1. a release already carrying the purl ends the flow as `Existing`
/// 2. the registry component is resolved by purl, created, or on a create
///    conflict located by name and given the purl
/// 3. the release is created; on a create conflict it is located through
///    name+version, purl, then the component's release list, and the purl is
///    merged into its external ids
///
/// Entities are registered and looked up under the component's registry name,
/// which keeps npm scopes and Maven groups. An entity found by name whose
/// recorded purls name another package is never linked or merged into.
///
/// Each component is owned by exactly one task. Component ids resolved during
/// a run are shared between sibling versions through an in-memory cache that
/// is cleared at the start of every run.
///
/// # Type Parameters
/// * `R` - RegistryClient implementation
pub struct ReconcileRegistryUseCase<R> {
    registry: R,
    component_ids: DashMap<(String, String, String), String>,
}

impl<R: RegistryClient> ReconcileRegistryUseCase<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            component_ids: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Reconciles every component with bounded concurrency
    ///
    /// # Arguments
    /// * `components` - Components with their origin attached
    /// * `dry_run` - Resolve only; no create or update calls are issued
    /// * `concurrency` - Maximum components in flight
    /// * `on_progress` - Called with (done, total, component name) after each component
    ///
    /// # Returns
    /// One report per component, in completion order
    pub async fn execute<F>(
        &self,
        components: &[Component],
        dry_run: bool,
        concurrency: usize,
        on_progress: F,
    ) -> Vec<ComponentReport>
    where
        F: Fn(usize, usize, &str),
    {
        self.component_ids.clear();

        let total = components.len();
        let done = AtomicUsize::new(0);
        let aggregator = ResultAggregator::new();

        stream::iter(components)
            .for_each_concurrent(concurrency.max(1), |component| {
                let aggregator = &aggregator;
                let done = &done;
                let on_progress = &on_progress;
                async move {
                    let report = self.reconcile(component, dry_run).await;
                    aggregator.push(report);
                    let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                    on_progress(current, total, component.name());
                }
            })
            .await;

        aggregator.into_inner()
    }

    /// Reconciles one component, never failing the batch
    pub async fn reconcile(&self, component: &Component, dry_run: bool) -> ComponentReport {
        let mut report = ComponentReport::from_component(component, ReconcileStatus::Unregistered);
        match self.reconcile_inner(component, dry_run, &mut report).await {
            Ok(()) => report,
            Err(error) if error.is_hard_failure() => {
                warn!(
                    component = %component.name(),
                    version = %component.version(),
                    error = %error,
                    "reconciliation failed"
                );
                report.fail(error)
            }
            Err(error) => {
                report.add_warning(error.to_string());
                report
            }
        }
    }

    async fn reconcile_inner(
        &self,
        component: &Component,
        dry_run: bool,
        report: &mut ComponentReport,
    ) -> EngineResult<()> {
        let resolver = RegistryIdentityResolver::new(&self.registry);
        let registry_name = component.registry_name();
        let name: &str = &registry_name;
        let version = component.version();
        let purl = component.purl().as_str();

        let existing = resolver.resolve_release(name, version, purl).await?;
        if existing.exists {
            if let Some(id) = existing.id() {
                debug!(component = %name, version = %version, release = %id, "release already registered");
                report.linked_release_id = id.to_string();
                report.status = ReconcileStatus::Existing;
                return Ok(());
            }
        }

        if dry_run {
            if let Some(release) = resolver.find_release_by_name_version(name, version).await? {
                report.add_warning(format!(
                    "release {} exists without this purl; not linked in dry run",
                    release.id()
                ));
            }
            report.status = ReconcileStatus::Unregistered;
            return Ok(());
        }

        let component_id = match self.ensure_component(component, report).await? {
            ComponentResolution::Resolved(id) => id,
            ComponentResolution::Conflicting(conflict) => {
                Self::mark_conflicting(component, conflict, report);
                return Ok(());
            }
        };

        let release = NewRelease {
            component_id: component_id.clone(),
            name: name.to_string(),
            version: version.to_string(),
            external_ids: Self::purl_ids(purl),
        };
        let outcome = self
            .registry
            .create_release(&release)
            .await
            .map_err(|e| EngineError::transport("create release", e))?;

        if outcome.is_success() {
            let id = outcome
                .entity
                .as_ref()
                .map(|e| e.id().to_string())
                .unwrap_or_default();
            info!(component = %name, version = %version, release = %id, "release created");
            report.linked_release_id = id;
            report.status = ReconcileStatus::Created;
            return Ok(());
        }

        if !outcome.is_conflict() {
            return Err(EngineError::UnexpectedStatus {
                operation: "create release".to_string(),
                status: outcome.status,
            });
        }

        let release_id = self.locate_release(component, &component_id).await?;
        let current = self
            .registry
            .fetch(EntityKind::Release, &release_id)
            .await
            .map_err(|e| EngineError::transport("release fetch", e))?;

        if let Some(recorded) = ExternalIdMerger::detect_package_conflict(&current.external_ids, purl) {
            let conflict = EngineError::ForeignIdentity {
                entity: format!("release {}", release_id),
                name: name.to_string(),
                recorded,
            };
            Self::mark_conflicting(component, conflict, report);
            return Ok(());
        }

        debug!(component = %name, version = %version, release = %release_id, "linked existing release");
        report.linked_release_id = release_id.clone();
        report.status = ReconcileStatus::Linked;

        let merged = ExternalIdMerger::merge_release(&current.external_ids, purl);
        self.apply_merge(EntityKind::Release, &release_id, merged, report)
            .await
    }

    /// Resolves or creates the registry component and returns its id
    async fn ensure_component(
        &self,
        component: &Component,
        report: &mut ComponentReport,
    ) -> EngineResult<ComponentResolution> {
        let key = Self::cache_key(component);
        if let Some(id) = self.component_ids.get(&key) {
            return Ok(ComponentResolution::Resolved(id.clone()));
        }

        let resolver = RegistryIdentityResolver::new(&self.registry);
        let registry_name = component.registry_name();
        let name: &str = &registry_name;
        let purl = component.purl().as_str();

        let by_purl = resolver.resolve_component(name, purl).await?;
        if let Some(id) = by_purl.id().filter(|_| by_purl.exists) {
            self.component_ids.insert(key, id.to_string());
            return Ok(ComponentResolution::Resolved(id.to_string()));
        }

        let outcome = self
            .registry
            .create_component(&NewComponent::oss(name, Self::purl_ids(purl)))
            .await
            .map_err(|e| EngineError::transport("create component", e))?;

        if outcome.is_success() {
            let id = outcome
                .entity
                .as_ref()
                .map(|e| e.id().to_string())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| EngineError::UnexpectedStatus {
                    operation: "create component without entity link".to_string(),
                    status: outcome.status,
                })?;
            info!(component = %name, id = %id, "component created");
            self.component_ids.insert(key, id.clone());
            return Ok(ComponentResolution::Resolved(id));
        }

        if !outcome.is_conflict() {
            return Err(EngineError::UnexpectedStatus {
                operation: "create component".to_string(),
                status: outcome.status,
            });
        }

        let by_name = resolver.resolve_component_by_name(name, purl).await?;
        let Some(reference) = by_name.reference else {
            return Err(EngineError::UnresolvedConflict {
                name: name.to_string(),
                version: component.version().to_string(),
            });
        };

        if by_name.conflicting_package_type {
            let recorded_type = reference
                .external_ids
                .recorded_purls()
                .and_then(|purls| {
                    purls
                        .purls()
                        .iter()
                        .find_map(|p| purl_type_of(p))
                })
                .unwrap_or_default();
            return Ok(ComponentResolution::Conflicting(EngineError::ConflictingIdentity {
                name: name.to_string(),
                purl_type: component.purl().purl_type().to_string(),
                recorded_type,
            }));
        }

        if let Some(recorded) = ExternalIdMerger::detect_package_conflict(&reference.external_ids, purl) {
            return Ok(ComponentResolution::Conflicting(EngineError::ForeignIdentity {
                entity: format!("component {}", reference.id()),
                name: name.to_string(),
                recorded,
            }));
        }

        let id = reference.id().to_string();
        let merged = ExternalIdMerger::merge(&reference.external_ids, purl);
        self.apply_merge(EntityKind::Component, &id, merged, report)
            .await?;
        self.component_ids.insert(key, id.clone());
        Ok(ComponentResolution::Resolved(id))
    }

    /// Locates a release that already exists after a create conflict
    ///
    /// Tried in order: exact name and version listing, purl search, then the
    /// last release of the component with this version.
    async fn locate_release(&self, component: &Component, component_id: &str) -> EngineResult<String> {
        let resolver = RegistryIdentityResolver::new(&self.registry);
        let registry_name = component.registry_name();
        let name: &str = &registry_name;
        let version = component.version();

        if let Some(release) = resolver.find_release_by_name_version(name, version).await? {
            if !release.id().is_empty() {
                return Ok(release.id().to_string());
            }
        }

        let by_purl = resolver
            .resolve_release(name, version, component.purl().as_str())
            .await?;
        if let Some(id) = by_purl.id() {
            return Ok(id.to_string());
        }

        let releases = self
            .registry
            .releases_of_component(component_id)
            .await
            .map_err(|e| EngineError::transport("component release listing", e))?;
        if let Some(release) = releases
            .iter()
            .rev()
            .find(|r| r.version.as_deref() == Some(version) && !r.id().is_empty())
        {
            return Ok(release.id().to_string());
        }

        Err(EngineError::UnresolvedConflict {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    fn mark_conflicting(component: &Component, conflict: EngineError, report: &mut ComponentReport) {
        warn!(component = %component.name(), version = %component.version(), "{}", conflict);
        report.add_warning(conflict.to_string());
        report.status = ReconcileStatus::Conflicting;
    }

    /// Writes merged external ids unless the purl was already recorded
    async fn apply_merge(
        &self,
        kind: EntityKind,
        id: &str,
        merged: MergeOutcome,
        report: &mut ComponentReport,
    ) -> EngineResult<()> {
        if merged.already_present {
            debug!(entity = %kind, id = %id, "purl already recorded");
            return Ok(());
        }

        let outcome = self
            .registry
            .update_external_ids(kind, id, &merged.external_ids)
            .await
            .map_err(|e| EngineError::transport(format!("{} update", kind), e))?;

        if outcome.is_moderation_pending() {
            let pending = EngineError::ModerationPending {
                entity: format!("{} {}", kind, id),
            };
            warn!("{}", pending);
            report.add_warning(pending.to_string());
            return Ok(());
        }

        if !outcome.is_success() {
            return Err(EngineError::UnexpectedStatus {
                operation: format!("{} update", kind),
                status: outcome.status,
            });
        }
        Ok(())
    }

    fn purl_ids(purl: &str) -> ExternalIds {
        [(PURL_ID_KEY, purl)].into_iter().collect()
    }

    /// (type, namespace, registry name); the Debian namespace is the vendor and is left out
    fn cache_key(component: &Component) -> (String, String, String) {
        let purl = component.purl();
        let namespace = purl
            .namespace()
            .filter(|_| !purl.is_debian_family())
            .unwrap_or_default();
        (
            purl.purl_type().to_string(),
            namespace.trim_start_matches('@').to_lowercase(),
            component.registry_name().to_lowercase(),
        )
    }
}
