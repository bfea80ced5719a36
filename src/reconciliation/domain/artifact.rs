use serde::{Deserialize, Serialize};

/// Repo name reported when no artifact matched a component
pub const REPO_NOT_FOUND: &str = "Not Found in JFrogRepo";

/// Package file name reported when no artifact matched a component
pub const PACKAGE_NAME_NOT_FOUND: &str = "Package name not found in Jfrog";

/// Repo path reported when no artifact matched a component
pub const REPO_PATH_NOT_FOUND: &str = "Jfrog repo path not found";

/// An artifact as returned by the artifact repository search
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    #[serde(default)]
    pub path: String,
    pub repo: String,
    #[serde(default)]
    pub properties: Vec<ArtifactProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactProperty {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl ArtifactRecord {
    pub fn new(name: impl Into<String>, path: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            repo: repo.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(ArtifactProperty {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.iter().any(|p| p.key == key)
    }

    /// All values recorded under `key` (the repository allows repeated keys)
    pub fn property_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// `repo/path/name`, with the repository's `.` root path collapsed
    pub fn repo_path(&self) -> String {
        let path = self.path.trim_matches('/');
        if path.is_empty() || path == "." {
            format!("{}/{}", self.repo, self.name)
        } else {
            format!("{}/{}/{}", self.repo, path, self.name)
        }
    }
}

/// How a match was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    /// Repository properties carry the exact name and version
    Property,
    /// File name or path pattern only; may collide with similarly named packages
    Heuristic,
}

/// Result of matching a component against artifact records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMatch {
    pub repo_name: String,
    pub package_file_name: String,
    pub repo_path: String,
    pub confidence: Option<MatchConfidence>,
}

impl ArtifactMatch {
    pub fn found(record: &ArtifactRecord, confidence: MatchConfidence) -> Self {
        Self {
            repo_name: record.repo.clone(),
            package_file_name: record.name.clone(),
            repo_path: record.repo_path(),
            confidence: Some(confidence),
        }
    }

    pub fn not_found() -> Self {
        Self {
            repo_name: REPO_NOT_FOUND.to_string(),
            package_file_name: PACKAGE_NAME_NOT_FOUND.to_string(),
            repo_path: REPO_PATH_NOT_FOUND.to_string(),
            confidence: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.confidence.is_some()
    }
}
