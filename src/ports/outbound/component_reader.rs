use crate::reconciliation::domain::Component;
use crate::shared::Result;
use std::path::Path;

/// ComponentReader port for loading the normalized component list
///
/// The manifest parsers run upstream; this port only reads their output.
pub trait ComponentReader {
    /// Reads and validates the component list at `path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The content is not a valid component list
    /// - A component has an empty name, version or an unparsable purl
    fn read_components(&self, path: &Path) -> Result<Vec<Component>>;
}
