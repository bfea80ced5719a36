use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Upper bound for component lists and config files (64 MB)
pub const MAX_INPUT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Checks that `path` is a regular file, not a symlink, and below `max_size`.
///
/// `symlink_metadata()` is used so that the link itself is inspected rather
/// than its target.
///
/// # Errors
/// Returns an error if the metadata cannot be read, the path is a symlink or a
/// directory, or the file is larger than `max_size`.
pub fn validate_input_file(path: &Path, description: &str, max_size: u64) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", description, e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} ({}) is a symbolic link. Symbolic links are not accepted as input.",
            description,
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            max_size
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_input_file_accepts_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("components.json");
        fs::write(&file_path, "{}").unwrap();

        assert!(validate_input_file(&file_path, "component list", MAX_INPUT_FILE_SIZE).is_ok());
    }

    #[test]
    fn test_validate_input_file_rejects_missing_file() {
        let path = PathBuf::from("/nonexistent/components.json");
        assert!(validate_input_file(&path, "component list", MAX_INPUT_FILE_SIZE).is_err());
    }

    #[test]
    fn test_validate_input_file_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_input_file(temp_dir.path(), "component list", MAX_INPUT_FILE_SIZE);
        assert!(result.unwrap_err().to_string().contains("not a regular file"));
    }

    #[test]
    fn test_validate_input_file_rejects_oversized_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("big.json");
        fs::write(&file_path, "0123456789").unwrap();

        let result = validate_input_file(&file_path, "component list", 4);
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_input_file_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.json");
        let link = temp_dir.path().join("link.json");
        fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let result = validate_input_file(&link, "component list", MAX_INPUT_FILE_SIZE);
        assert!(result.unwrap_err().to_string().contains("symbolic link"));
    }
}
