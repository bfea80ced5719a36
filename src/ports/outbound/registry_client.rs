use crate::reconciliation::domain::{EntityKind, ExternalIdKey, ExternalIds, RegistryRef};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Body fragment the registry returns when a write was turned into a
/// moderation request instead of being applied
pub const MODERATION_REQUEST_MARKER: &str = "Moderation request is created";

/// HTTP status the registry answers with when an entity already exists
const STATUS_CONFLICT: u16 = 409;

/// Payload for creating a registry component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComponent {
    pub name: String,
    pub component_type: String,
    pub categories: Vec<String>,
    pub external_ids: ExternalIds,
}

impl NewComponent {
    pub fn oss(name: impl Into<String>, external_ids: ExternalIds) -> Self {
        Self {
            name: name.into(),
            component_type: "OSS".to_string(),
            categories: vec!["Library".to_string()],
            external_ids,
        }
    }
}

/// Payload for creating a registry release under an existing component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRelease {
    pub component_id: String,
    pub name: String,
    pub version: String,
    pub external_ids: ExternalIds,
}

/// Response of a create call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub status: u16,
    pub entity: Option<RegistryRef>,
}

impl CreateOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_conflict(&self) -> bool {
        self.status == STATUS_CONFLICT
    }
}

/// Response of an update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub status: u16,
    pub body: String,
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The registry accepted the change but holds it for human approval
    pub fn is_moderation_pending(&self) -> bool {
        self.body.contains(MODERATION_REQUEST_MARKER)
    }
}

/// RegistryClient port for the component/release registry
///
/// Every method returns `Err` only for transport failures (network errors,
/// timeouts, undecodable responses). HTTP statuses of create and update calls
/// are reported in the outcome so the engine can act on conflicts.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Searches entities whose external ids contain `external_id` under the given key encoding
    async fn find_by_external_id(
        &self,
        kind: EntityKind,
        key: ExternalIdKey,
        external_id: &str,
    ) -> Result<Vec<RegistryRef>>;

    /// Lists components with the given name
    async fn find_components_by_name(&self, name: &str) -> Result<Vec<RegistryRef>>;

    /// Lists releases with exactly this name and version
    async fn find_releases_by_name_version(&self, name: &str, version: &str)
        -> Result<Vec<RegistryRef>>;

    /// Lists releases recorded under a component, in creation order
    async fn releases_of_component(&self, component_id: &str) -> Result<Vec<RegistryRef>>;

    /// Loads one entity, including its external ids
    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<RegistryRef>;

    async fn create_component(&self, component: &NewComponent) -> Result<CreateOutcome>;

    async fn create_release(&self, release: &NewRelease) -> Result<CreateOutcome>;

    /// Replaces the external ids of an entity
    async fn update_external_ids(
        &self,
        kind: EntityKind,
        id: &str,
        external_ids: &ExternalIds,
    ) -> Result<UpdateOutcome>;
}
