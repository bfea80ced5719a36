use super::external_id::ExternalIds;

/// Registry entity kinds handled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Component,
    Release,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Component => write!(f, "component"),
            EntityKind::Release => write!(f, "release"),
        }
    }
}

/// Reference to a component or release stored in the registry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryRef {
    pub name: String,
    pub version: Option<String>,
    pub self_link: String,
    pub external_ids: ExternalIds,
}

impl RegistryRef {
    pub fn new(name: impl Into<String>, self_link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            self_link: self_link.into(),
            external_ids: ExternalIds::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_external_ids(mut self, external_ids: ExternalIds) -> Self {
        self.external_ids = external_ids;
        self
    }

    /// Entity id: the last path segment of the self link
    pub fn id(&self) -> &str {
        self.self_link
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Outcome of resolving a component or release against the registry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityMatch {
    pub exists: bool,
    pub reference: Option<RegistryRef>,
    /// More than one candidate shared the name; the cardinality heuristic chose
    pub ambiguous: bool,
    /// The matched entity records purls of a different package type
    pub conflicting_package_type: bool,
}

impl IdentityMatch {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.reference.as_ref().map(RegistryRef::id).filter(|id| !id.is_empty())
    }
}
