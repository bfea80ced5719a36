use async_trait::async_trait;
use bom_reconcile::prelude::*;
use bom_reconcile::reconciliation::domain::{ExternalIdKey, ExternalIdValue};
use std::sync::{Arc, Mutex};

const BASE: &str = "https://registry.test/resource/api";

#[derive(Clone)]
struct Entry {
    kind: EntityKind,
    parent: Option<String>,
    entity: RegistryRef,
}

/// In-memory registry with SW360 create/update semantics
///
/// Creates answer 409 when an entity with the same identity exists. Writes
/// are logged so tests can assert that nothing was created or updated.
#[derive(Default, Clone)]
pub struct ScriptedRegistry {
    entries: Arc<Mutex<Vec<Entry>>>,
    writes: Arc<Mutex<Vec<String>>>,
    pub moderate_updates: bool,
    pub unreachable: bool,
}

impl ScriptedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with_component(self, id: &str, name: &str, purls: &[&str]) -> Self {
        let entity = RegistryRef::new(name, format!("{}/components/{}", BASE, id))
            .with_external_ids(Self::purl_ids(purls));
        self.push(EntityKind::Component, None, entity);
        self
    }

    pub fn with_release(self, id: &str, component_id: &str, name: &str, version: &str, purls: &[&str]) -> Self {
        let entity = RegistryRef::new(name, format!("{}/releases/{}", BASE, id))
            .with_version(version)
            .with_external_ids(Self::purl_ids(purls));
        self.push(EntityKind::Release, Some(component_id.to_string()), entity);
        self
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    /// External ids currently stored on an entity
    pub fn external_ids(&self, id: &str) -> Option<ExternalIds> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.entity.id() == id)
            .map(|e| e.entity.external_ids.clone())
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    fn purl_ids(purls: &[&str]) -> ExternalIds {
        let mut ids = ExternalIds::new();
        match purls {
            [] => {}
            [single] => ids.insert("purl_id", *single),
            many => ids.insert("purl_id", serde_json::to_string(many).unwrap()),
        }
        ids
    }

    fn push(&self, kind: EntityKind, parent: Option<String>, entity: RegistryRef) {
        self.entries.lock().unwrap().push(Entry { kind, parent, entity });
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }

    fn select<F>(&self, filter: F) -> Vec<RegistryRef>
    where
        F: Fn(&Entry) -> bool,
    {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| filter(e))
            .map(|e| e.entity.clone())
            .collect()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.entries.lock().unwrap().len() + 1000)
    }
}

#[async_trait]
impl RegistryClient for ScriptedRegistry {
    async fn find_by_external_id(
        &self,
        kind: EntityKind,
        key: ExternalIdKey,
        external_id: &str,
    ) -> Result<Vec<RegistryRef>> {
        self.check_reachable()?;
        Ok(self.select(|e| {
            e.kind == kind
                && e.entity
                    .external_ids
                    .get(key.stored_key())
                    .is_some_and(|v| ExternalIdValue::decode_lenient(v).contains(external_id))
        }))
    }

    async fn find_components_by_name(&self, name: &str) -> Result<Vec<RegistryRef>> {
        self.check_reachable()?;
        Ok(self.select(|e| e.kind == EntityKind::Component && e.entity.name.eq_ignore_ascii_case(name)))
    }

    async fn find_releases_by_name_version(&self, name: &str, version: &str) -> Result<Vec<RegistryRef>> {
        self.check_reachable()?;
        Ok(self.select(|e| {
            e.kind == EntityKind::Release
                && e.entity.name == name
                && e.entity.version.as_deref() == Some(version)
        }))
    }

    async fn releases_of_component(&self, component_id: &str) -> Result<Vec<RegistryRef>> {
        self.check_reachable()?;
        Ok(self.select(|e| e.kind == EntityKind::Release && e.parent.as_deref() == Some(component_id)))
    }

    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<RegistryRef> {
        self.check_reachable()?;
        self.select(|e| e.kind == kind && e.entity.id() == id)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("{} {} not found", kind, id))
    }

    async fn create_component(&self, component: &NewComponent) -> Result<CreateOutcome> {
        self.check_reachable()?;
        self.writes
            .lock()
            .unwrap()
            .push(format!("create component {}", component.name));
        if !self.find_components_by_name(&component.name).await?.is_empty() {
            return Ok(CreateOutcome { status: 409, entity: None });
        }
        let id = self.next_id("c");
        let entity = RegistryRef::new(component.name.clone(), format!("{}/components/{}", BASE, id))
            .with_external_ids(component.external_ids.clone());
        self.push(EntityKind::Component, None, entity.clone());
        Ok(CreateOutcome {
            status: 201,
            entity: Some(entity),
        })
    }

    async fn create_release(&self, release: &NewRelease) -> Result<CreateOutcome> {
        self.check_reachable()?;
        self.writes
            .lock()
            .unwrap()
            .push(format!("create release {} {}", release.name, release.version));
        if !self
            .find_releases_by_name_version(&release.name, &release.version)
            .await?
            .is_empty()
        {
            return Ok(CreateOutcome { status: 409, entity: None });
        }
        let id = self.next_id("r");
        let entity = RegistryRef::new(release.name.clone(), format!("{}/releases/{}", BASE, id))
            .with_version(release.version.clone())
            .with_external_ids(release.external_ids.clone());
        self.push(EntityKind::Release, Some(release.component_id.clone()), entity.clone());
        Ok(CreateOutcome {
            status: 201,
            entity: Some(entity),
        })
    }

    async fn update_external_ids(
        &self,
        kind: EntityKind,
        id: &str,
        external_ids: &ExternalIds,
    ) -> Result<UpdateOutcome> {
        self.check_reachable()?;
        self.writes.lock().unwrap().push(format!("update {} {}", kind, id));
        if self.moderate_updates {
            return Ok(UpdateOutcome {
                status: 202,
                body: "Moderation request is created".to_string(),
            });
        }
        if let Some(entry) = self
            .entries
            .lock()
            .unwrap()
            .iter_mut()
            .find(|e| e.kind == kind && e.entity.id() == id)
        {
            entry.entity.external_ids = external_ids.clone();
        }
        Ok(UpdateOutcome {
            status: 200,
            body: String::new(),
        })
    }
}
