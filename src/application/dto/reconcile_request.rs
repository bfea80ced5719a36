use crate::shared::error::ReconcileError;
use crate::shared::Result;
use std::path::PathBuf;

/// Default number of components reconciled concurrently
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Upper bound on concurrent registry operations
pub const MAX_CONCURRENCY: usize = 64;

/// ReconcileRequest - request DTO for a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    /// Path to the normalized component list
    pub input_path: PathBuf,
    /// Repositories holding packages published by the organization
    pub internal_repos: Vec<String>,
    /// Further repositories searched for a component's origin
    pub search_repos: Vec<String>,
    /// Resolve only; never create or update registry entities
    pub dry_run: bool,
    /// Components reconciled concurrently against the registry
    pub concurrency: usize,
}

impl ReconcileRequest {
    pub fn builder() -> ReconcileRequestBuilder {
        ReconcileRequestBuilder::default()
    }

    /// Internal repositories followed by search repositories, without duplicates
    pub fn all_repos(&self) -> Vec<String> {
        let mut repos: Vec<String> = Vec::new();
        for repo in self.internal_repos.iter().chain(self.search_repos.iter()) {
            if !repos.contains(repo) {
                repos.push(repo.clone());
            }
        }
        repos
    }
}

/// Builder for [`ReconcileRequest`]
#[derive(Debug, Default)]
pub struct ReconcileRequestBuilder {
    input_path: Option<PathBuf>,
    internal_repos: Vec<String>,
    search_repos: Vec<String>,
    dry_run: bool,
    concurrency: Option<usize>,
}

impl ReconcileRequestBuilder {
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    pub fn internal_repos(mut self, repos: Vec<String>) -> Self {
        self.internal_repos = repos;
        self
    }

    pub fn search_repos(mut self, repos: Vec<String>) -> Self {
        self.search_repos = repos;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn build(self) -> Result<ReconcileRequest> {
        let input_path = self.input_path.ok_or_else(|| ReconcileError::Validation {
            message: "input_path is required".to_string(),
        })?;

        let concurrency = self.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(ReconcileError::Validation {
                message: format!(
                    "concurrency must be between 1 and {} (got {})",
                    MAX_CONCURRENCY, concurrency
                ),
            }
            .into());
        }

        let clean = |repos: Vec<String>| -> Vec<String> {
            repos
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect()
        };

        Ok(ReconcileRequest {
            input_path,
            internal_repos: clean(self.internal_repos),
            search_repos: clean(self.search_repos),
            dry_run: self.dry_run,
            concurrency,
        })
    }
}
