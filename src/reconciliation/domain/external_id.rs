use super::purl::decode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// External-id key written by this pipeline
pub const PURL_ID_KEY: &str = "purl_id";

/// External-id key used by older registry entries
pub const PACKAGE_URL_KEY: &str = "package_url";

/// The two encodings the registry search accepts for purl lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalIdKey {
    PackageUrl,
    PurlId,
}

impl ExternalIdKey {
    /// Lookup order used when searching by external id
    pub const SEARCH_ORDER: [ExternalIdKey; 2] = [ExternalIdKey::PackageUrl, ExternalIdKey::PurlId];

    /// Query parameter name for the registry's external-id search
    pub fn query_param(&self) -> &'static str {
        match self {
            ExternalIdKey::PackageUrl => "package-url",
            ExternalIdKey::PurlId => "purl.id",
        }
    }

    /// Key under which the value is stored on the entity
    pub fn stored_key(&self) -> &'static str {
        match self {
            ExternalIdKey::PackageUrl => PACKAGE_URL_KEY,
            ExternalIdKey::PurlId => PURL_ID_KEY,
        }
    }
}

/// Decoded external-id value
///
/// The registry stores either a bare purl or a JSON array of purls under the
/// same key. Both are read; writes always produce the array form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalIdValue {
    Single(String),
    Multiple(Vec<String>),
}

impl ExternalIdValue {
    /// Decodes a stored value.
    ///
    /// # Errors
    /// Fails when the value looks like a JSON array but is not an array of strings.
    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with('[') {
            serde_json::from_str::<Vec<String>>(trimmed).map(ExternalIdValue::Multiple)
        } else {
            Ok(ExternalIdValue::Single(trimmed.to_string()))
        }
    }

    /// Decodes a stored value, treating anything undecodable as one opaque entry.
    pub fn decode_lenient(raw: &str) -> Self {
        Self::decode(raw).unwrap_or_else(|_| ExternalIdValue::Single(raw.to_string()))
    }

    pub fn purls(&self) -> &[String] {
        match self {
            ExternalIdValue::Single(purl) => std::slice::from_ref(purl),
            ExternalIdValue::Multiple(purls) => purls,
        }
    }

    /// Number of recorded purls ("purl cardinality")
    pub fn cardinality(&self) -> usize {
        self.purls().len()
    }

    /// Exact containment, or containment of the percent-decoded form of `purl`.
    pub fn contains(&self, purl: &str) -> bool {
        let decoded = decode(purl);
        self.purls()
            .iter()
            .any(|p| p == purl || *p == decoded)
    }

    /// Containment with both sides percent-decoded.
    pub fn contains_decoded(&self, purl: &str) -> bool {
        let decoded = decode(purl);
        self.purls().iter().any(|p| decode(p) == decoded)
    }

    /// Appends a purl, converting a single value into the array form.
    pub fn push(self, purl: String) -> Self {
        let mut purls = match self {
            ExternalIdValue::Single(existing) => vec![existing],
            ExternalIdValue::Multiple(existing) => existing,
        };
        purls.push(purl);
        ExternalIdValue::Multiple(purls)
    }

    /// Serialized form: bare string for `Single`, JSON array for `Multiple`.
    pub fn encode(&self) -> String {
        match self {
            ExternalIdValue::Single(purl) => purl.clone(),
            // A Vec<String> always serializes.
            ExternalIdValue::Multiple(purls) => {
                serde_json::to_string(purls).unwrap_or_else(|_| String::from("[]"))
            }
        }
    }
}

/// External identifiers of a registry entity, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalIds(BTreeMap<String, String>);

impl ExternalIds {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The recorded purl value: `purl_id` first, `package_url` otherwise.
    /// Blank values count as absent.
    pub fn purl_value(&self) -> Option<&str> {
        [PURL_ID_KEY, PACKAGE_URL_KEY]
            .iter()
            .filter_map(|key| self.get(key))
            .find(|v| !v.trim().is_empty())
    }

    pub fn has_purl(&self) -> bool {
        self.purl_value().is_some()
    }

    /// Decoded purls recorded on the entity, leniently
    pub fn recorded_purls(&self) -> Option<ExternalIdValue> {
        self.purl_value().map(ExternalIdValue::decode_lenient)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExternalIds {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
