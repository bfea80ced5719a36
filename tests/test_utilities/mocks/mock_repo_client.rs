use async_trait::async_trait;
use bom_reconcile::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock RepoMetadataClient serving a fixed set of artifacts
#[derive(Default, Clone)]
pub struct MockRepoClient {
    pub records: Vec<ArtifactRecord>,
    /// Repository lists of every query, in order
    pub queries: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockRepoClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifact(mut self, repo: &str, path: &str, name: &str) -> Self {
        self.records.push(ArtifactRecord::new(name, path, repo));
        self
    }

    pub fn with_record(mut self, record: ArtifactRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl RepoMetadataClient for MockRepoClient {
    async fn get_components_by_repo(&self, repo_names: &[String]) -> Vec<ArtifactRecord> {
        self.queries.lock().unwrap().push(repo_names.to_vec());
        self.records
            .iter()
            .filter(|r| repo_names.contains(&r.repo))
            .cloned()
            .collect()
    }
}
