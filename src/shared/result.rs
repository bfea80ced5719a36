/// Result alias used across the crate; plumbing errors are carried as `anyhow::Error`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
