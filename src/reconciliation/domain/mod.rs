pub mod artifact;
pub mod component;
pub mod ecosystem;
pub mod external_id;
pub mod properties;
pub mod purl;
pub mod registry_ref;

pub use artifact::{ArtifactMatch, ArtifactProperty, ArtifactRecord, MatchConfidence};
pub use component::{Component, ComponentOrigin, PackageName, Version};
pub use ecosystem::Ecosystem;
pub use external_id::{ExternalIdKey, ExternalIdValue, ExternalIds, PACKAGE_URL_KEY, PURL_ID_KEY};
pub use properties::{Properties, Property};
pub use purl::Purl;
pub use registry_ref::{EntityKind, IdentityMatch, RegistryRef};
