use super::artifact::ArtifactMatch;
use super::ecosystem::Ecosystem;
use super::properties::Properties;
use super::purl::Purl;
use crate::shared::Result;
use std::borrow::Cow;

/// Maximum length for component names (security limit)
const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for component versions (security limit)
const MAX_VERSION_LENGTH: usize = 128;

/// NewType wrapper for a component name with validation
///
/// Names come from many ecosystems (`@scope/pkg`, `org.group:artifact`,
/// `libstdc++6`), so only emptiness, length and control characters are checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        if name.trim().is_empty() {
            anyhow::bail!("Component name cannot be empty");
        }

        if name.len() > MAX_NAME_LENGTH {
            anyhow::bail!(
                "Component name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_NAME_LENGTH
            );
        }

        if name.chars().any(|c| c.is_control() || c.is_whitespace()) {
            anyhow::bail!("Component name '{}' contains whitespace or control characters", name.escape_debug());
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for a component version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        if version.trim().is_empty() {
            anyhow::bail!("Component version cannot be empty");
        }

        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Component version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        if version.chars().any(|c| c.is_control() || c.is_whitespace()) {
            anyhow::bail!("Component version '{}' contains whitespace or control characters", version.escape_debug());
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Version without a Debian epoch (`1:2.3-4` -> `2.3-4`), as used in file names
    pub fn without_epoch(&self) -> &str {
        match self.0.split_once(':') {
            Some((epoch, rest)) if epoch.chars().all(|c| c.is_ascii_digit()) => rest,
            _ => &self.0,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a component physically lives, attached once per reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOrigin {
    pub is_internal: bool,
    pub artifact: ArtifactMatch,
}

/// A normalized component as produced by the manifest parsers
///
/// Name, version and purl are fixed at construction. The origin is the only
/// mutable part and may be attached exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: PackageName,
    group: Option<String>,
    version: Version,
    purl: Purl,
    properties: Properties,
    origin: Option<ComponentOrigin>,
}

impl Component {
    pub fn new(name: String, version: String, purl: &str) -> Result<Self> {
        Ok(Self {
            name: PackageName::new(name)?,
            group: None,
            version: Version::new(version)?,
            purl: Purl::parse(purl)?,
            properties: Properties::new(),
            origin: None,
        })
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group.filter(|g| !g.trim().is_empty());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    pub fn version_without_epoch(&self) -> &str {
        self.version.without_epoch()
    }

    pub fn purl(&self) -> &Purl {
        &self.purl
    }

    pub fn ecosystem(&self) -> Ecosystem {
        Ecosystem::from_purl_type(self.purl.purl_type())
    }

    /// Name the component is registered under
    ///
    /// npm scopes and Maven groups are part of the package identity and are
    /// kept (`@angular/animations`, `org.slf4j:slf4j-api`). The scope or group
    /// comes from the name itself, the group field, then the purl namespace.
    /// Other ecosystems use the bare name.
    pub fn registry_name(&self) -> Cow<'_, str> {
        let name = self.name();
        let group = self.group().or(self.purl.namespace());
        match (self.ecosystem(), group) {
            (Ecosystem::Npm, Some(scope)) if !name.contains('/') => {
                Cow::Owned(format!("@{}/{}", scope.trim_start_matches('@'), name))
            }
            (Ecosystem::Maven, Some(group)) if !name.contains(':') => {
                Cow::Owned(format!("{}:{}", group, name))
            }
            _ => Cow::Borrowed(name),
        }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn origin(&self) -> Option<&ComponentOrigin> {
        self.origin.as_ref()
    }

    pub fn is_internal(&self) -> bool {
        self.origin.as_ref().is_some_and(|o| o.is_internal)
    }

    /// Attaches the repository origin. A second attempt in the same pass is rejected.
    pub fn attach_origin(&mut self, origin: ComponentOrigin) -> Result<()> {
        if self.origin.is_some() {
            anyhow::bail!(
                "Origin of {}@{} is already resolved for this pass",
                self.name,
                self.version
            );
        }
        self.origin = Some(origin);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::domain::artifact::{ArtifactRecord, MatchConfidence};

    fn adduser() -> Component {
        Component::new(
            "adduser".to_string(),
            "3.118".to_string(),
            "pkg:deb/debian/adduser@3.118?arch=all&distro=debian-10",
        )
        .unwrap()
    }

    #[test]
    fn test_component_new_valid() {
        let component = adduser();
        assert_eq!(component.name(), "adduser");
        assert_eq!(component.version(), "3.118");
        assert_eq!(component.ecosystem(), Ecosystem::Debian);
        assert!(component.origin().is_none());
        assert!(!component.is_internal());
    }

    #[test]
    fn test_component_rejects_empty_fields() {
        assert!(Component::new("".to_string(), "1.0".to_string(), "pkg:npm/a@1.0").is_err());
        assert!(Component::new("a".to_string(), " ".to_string(), "pkg:npm/a@1.0").is_err());
        assert!(Component::new("a".to_string(), "1.0".to_string(), "").is_err());
    }

    #[test]
    fn test_package_name_accepts_ecosystem_specific_characters() {
        assert!(PackageName::new("@angular/core".to_string()).is_ok());
        assert!(PackageName::new("libstdc++6".to_string()).is_ok());
        assert!(PackageName::new("org.slf4j:slf4j-api".to_string()).is_ok());
        assert!(PackageName::new("bad name".to_string()).is_err());
    }

    #[test]
    fn test_version_without_epoch() {
        let version = Version::new("1:2.30-1".to_string()).unwrap();
        assert_eq!(version.without_epoch(), "2.30-1");

        let version = Version::new("2.30-1".to_string()).unwrap();
        assert_eq!(version.without_epoch(), "2.30-1");
    }

    #[test]
    fn test_with_group_drops_blank_group() {
        let component = adduser().with_group(Some("  ".to_string()));
        assert_eq!(component.group(), None);
    }

    #[test]
    fn test_registry_name_keeps_npm_scope() {
        let from_purl = Component::new(
            "animations".to_string(),
            "15.2.1".to_string(),
            "pkg:npm/%40angular/animations@15.2.1",
        )
        .unwrap();
        assert_eq!(from_purl.registry_name(), "@angular/animations");

        let from_group = Component::new(
            "animations".to_string(),
            "15.2.1".to_string(),
            "pkg:npm/animations@15.2.1",
        )
        .unwrap()
        .with_group(Some("angular".to_string()));
        assert_eq!(from_group.registry_name(), "@angular/animations");

        let unscoped =
            Component::new("animations".to_string(), "15.2.1".to_string(), "pkg:npm/animations@15.2.1")
                .unwrap();
        assert_eq!(unscoped.registry_name(), "animations");
    }

    #[test]
    fn test_registry_name_keeps_maven_group() {
        let core = Component::new("core".to_string(), "1.0".to_string(), "pkg:maven/org.a/core@1.0").unwrap();
        assert_eq!(core.registry_name(), "org.a:core");

        let qualified =
            Component::new("org.a:core".to_string(), "1.0".to_string(), "pkg:maven/org.a/core@1.0").unwrap();
        assert_eq!(qualified.registry_name(), "org.a:core");
    }

    #[test]
    fn test_registry_name_ignores_debian_vendor() {
        assert_eq!(adduser().registry_name(), "adduser");
    }

    #[test]
    fn test_attach_origin_only_once() {
        let mut component = adduser();
        let record = ArtifactRecord::new("adduser_3.118_all.deb", "", "debian-remote");
        let origin = ComponentOrigin {
            is_internal: false,
            artifact: ArtifactMatch::found(&record, MatchConfidence::Heuristic),
        };

        component.attach_origin(origin.clone()).unwrap();
        assert!(component.attach_origin(origin).is_err());
        assert_eq!(
            component.origin().unwrap().artifact.repo_name,
            "debian-remote"
        );
    }
}
