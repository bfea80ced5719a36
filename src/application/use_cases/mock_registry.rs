//! Scripted in-memory registry shared by the use case tests

use crate::ports::outbound::{
    CreateOutcome, NewComponent, NewRelease, RegistryClient, UpdateOutcome,
    MODERATION_REQUEST_MARKER,
};
use crate::reconciliation::domain::{
    EntityKind, ExternalIdKey, ExternalIdValue, ExternalIds, RegistryRef,
};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

const BASE: &str = "https://sw360.test/resource/api";

#[derive(Default)]
pub struct MockRegistry {
    pub components: Mutex<Vec<RegistryRef>>,
    pub releases: Mutex<Vec<RegistryRef>>,
    /// release id -> component id
    pub parents: Mutex<HashMap<String, String>>,
    /// Every call, in order, as a short label
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(EntityKind, String, ExternalIds)>>,
    /// External-id searches return nothing
    pub search_disabled: bool,
    /// Name and version listing returns nothing
    pub listing_disabled: bool,
    /// Updates are turned into moderation requests
    pub moderated: bool,
    /// Forced status for release creation
    pub release_create_status: Option<u16>,
    /// Operation labels that fail with a transport error
    pub failing: Vec<&'static str>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(self, id: &str, name: &str, ids: &[(&str, &str)]) -> Self {
        let entity = RegistryRef::new(name, format!("{}/components/{}", BASE, id))
            .with_external_ids(ids.iter().copied().collect());
        self.components.lock().unwrap().push(entity);
        self
    }

    pub fn with_release(
        self,
        id: &str,
        component_id: &str,
        name: &str,
        version: &str,
        ids: &[(&str, &str)],
    ) -> Self {
        let entity = RegistryRef::new(name, format!("{}/releases/{}", BASE, id))
            .with_version(version)
            .with_external_ids(ids.iter().copied().collect());
        self.releases.lock().unwrap().push(entity);
        self.parents
            .lock()
            .unwrap()
            .insert(id.to_string(), component_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, label: &str) -> Result<()> {
        self.calls.lock().unwrap().push(label.to_string());
        let op = label.split(' ').next().unwrap_or_default();
        if self.failing.contains(&op) {
            anyhow::bail!("connection reset during {}", op);
        }
        Ok(())
    }

    fn store(&self, kind: EntityKind) -> &Mutex<Vec<RegistryRef>> {
        match kind {
            EntityKind::Component => &self.components,
            EntityKind::Release => &self.releases,
        }
    }
}

#[async_trait]
impl RegistryClient for MockRegistry {
    async fn find_by_external_id(
        &self,
        kind: EntityKind,
        key: ExternalIdKey,
        external_id: &str,
    ) -> Result<Vec<RegistryRef>> {
        self.record(&format!("search {} {} {}", kind, key.query_param(), external_id))?;
        if self.search_disabled {
            return Ok(Vec::new());
        }
        Ok(self
            .store(kind)
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                e.external_ids
                    .get(key.stored_key())
                    .is_some_and(|v| ExternalIdValue::decode_lenient(v).contains(external_id))
            })
            .cloned()
            .collect())
    }

    async fn find_components_by_name(&self, name: &str) -> Result<Vec<RegistryRef>> {
        self.record(&format!("components_by_name {}", name))?;
        Ok(self
            .components
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| RegistryRef::new(c.name.clone(), c.self_link.clone()))
            .collect())
    }

    async fn find_releases_by_name_version(&self, name: &str, version: &str) -> Result<Vec<RegistryRef>> {
        self.record(&format!("releases_by_name_version {} {}", name, version))?;
        if self.listing_disabled {
            return Ok(Vec::new());
        }
        Ok(self
            .releases
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name && r.version.as_deref() == Some(version))
            .cloned()
            .collect())
    }

    async fn releases_of_component(&self, component_id: &str) -> Result<Vec<RegistryRef>> {
        self.record(&format!("releases_of_component {}", component_id))?;
        let parents = self.parents.lock().unwrap().clone();
        Ok(self
            .releases
            .lock()
            .unwrap()
            .iter()
            .filter(|r| parents.get(r.id()).is_some_and(|p| p == component_id))
            .cloned()
            .collect())
    }

    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<RegistryRef> {
        self.record(&format!("fetch {} {}", kind, id))?;
        self.store(kind)
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{} {} not found", kind, id))
    }

    async fn create_component(&self, component: &NewComponent) -> Result<CreateOutcome> {
        self.record(&format!("create_component {}", component.name))?;
        let mut components = self.components.lock().unwrap();
        if components.iter().any(|c| c.name.eq_ignore_ascii_case(&component.name)) {
            return Ok(CreateOutcome { status: 409, entity: None });
        }
        let id = format!("c{}", components.len() + 100);
        let entity = RegistryRef::new(component.name.clone(), format!("{}/components/{}", BASE, id))
            .with_external_ids(component.external_ids.clone());
        components.push(entity.clone());
        Ok(CreateOutcome {
            status: 201,
            entity: Some(entity),
        })
    }

    async fn create_release(&self, release: &NewRelease) -> Result<CreateOutcome> {
        self.record(&format!("create_release {} {}", release.name, release.version))?;
        if let Some(status) = self.release_create_status {
            return Ok(CreateOutcome { status, entity: None });
        }
        let mut releases = self.releases.lock().unwrap();
        if releases
            .iter()
            .any(|r| r.name == release.name && r.version.as_deref() == Some(release.version.as_str()))
        {
            return Ok(CreateOutcome { status: 409, entity: None });
        }
        let id = format!("r{}", releases.len() + 100);
        let entity = RegistryRef::new(release.name.clone(), format!("{}/releases/{}", BASE, id))
            .with_version(release.version.clone())
            .with_external_ids(release.external_ids.clone());
        releases.push(entity.clone());
        self.parents
            .lock()
            .unwrap()
            .insert(id, release.component_id.clone());
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
        self.record(&format!("update {} {}", kind, id))?;
        self.updates
            .lock()
            .unwrap()
            .push((kind, id.to_string(), external_ids.clone()));
        if self.moderated {
            return Ok(UpdateOutcome {
                status: 202,
                body: format!("{} for {} {}", MODERATION_REQUEST_MARKER, kind, id),
            });
        }
        if let Some(entity) = self.store(kind).lock().unwrap().iter_mut().find(|e| e.id() == id) {
            entity.external_ids = external_ids.clone();
        }
        Ok(UpdateOutcome {
            status: 200,
            body: "{}".to_string(),
        })
    }
}
