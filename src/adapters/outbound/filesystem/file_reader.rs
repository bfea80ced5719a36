use crate::ports::outbound::ComponentReader;
use crate::reconciliation::domain::{Component, Properties, Property};
use crate::shared::error::ReconcileError;
use crate::shared::security::{validate_input_file, MAX_INPUT_FILE_SIZE};
use crate::shared::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Document shape of the normalized component list
#[derive(Debug, Deserialize)]
struct ComponentDocument {
    components: Vec<RawComponent>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    name: String,
    #[serde(default)]
    group: Option<String>,
    version: String,
    purl: String,
    #[serde(default)]
    properties: Vec<Property>,
}

/// FileSystemReader adapter reading the component list from a JSON file
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    fn parse(path: &Path, content: &str) -> Result<Vec<Component>> {
        let parse_error = |details: String| ReconcileError::InputParseError {
            path: path.to_path_buf(),
            details,
        };

        let document: ComponentDocument =
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;

        document
            .components
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let properties: Properties =
                    raw.properties.into_iter().map(|p| (p.name, p.value)).collect();
                Component::new(raw.name, raw.version, &raw.purl)
                    .map(|c| c.with_group(raw.group).with_properties(properties))
                    .map_err(|e| {
                        anyhow::Error::from(parse_error(format!("component #{}: {}", index + 1, e)))
                    })
            })
            .collect()
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentReader for FileSystemReader {
    fn read_components(&self, path: &Path) -> Result<Vec<Component>> {
        if !path.exists() {
            return Err(ReconcileError::InputNotFound {
                path: path.to_path_buf(),
                suggestion: "Pass the component list produced by the manifest parsers with --input"
                    .to_string(),
            }
            .into());
        }

        validate_input_file(path, "component list", MAX_INPUT_FILE_SIZE).map_err(|e| {
            ReconcileError::SecurityError {
                path: path.to_path_buf(),
                reason: e.to_string(),
                hint: "Pass a regular file, not a symbolic link or directory".to_string(),
            }
        })?;

        let content = fs::read_to_string(path).map_err(|e| ReconcileError::InputParseError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        Self::parse(path, &content)
    }
}
