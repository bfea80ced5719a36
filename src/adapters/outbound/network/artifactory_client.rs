use super::http::{base_url, build_client, with_retry};
use crate::ports::outbound::RepoMetadataClient;
use crate::reconciliation::domain::ArtifactRecord;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AqlResponse {
    #[serde(default)]
    results: Vec<ArtifactRecord>,
}

/// ArtifactoryClient adapter searching repositories through AQL
///
/// Implements the RepoMetadataClient port. Every failure is logged and
/// turned into an empty result; the engine treats that as "no match".
pub struct ArtifactoryClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ArtifactoryClient {
    pub fn new(url: &str, token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url(url),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// AQL query listing every item of the given repositories with its properties
    pub fn build_query(repo_names: &[String]) -> String {
        let repos: Vec<String> = repo_names
            .iter()
            .map(|repo| serde_json::json!({ "repo": repo }).to_string())
            .collect();
        format!(
            r#"items.find({{"$or":[{}]}}).include("name","repo","path","property.*")"#,
            repos.join(",")
        )
    }

    /// Parses an AQL answer into artifact records
    pub fn parse_response(body: &str) -> Result<Vec<ArtifactRecord>> {
        let response: AqlResponse = serde_json::from_str(body)?;
        Ok(response.results)
    }

    async fn search(&self, query: &str) -> Result<Vec<ArtifactRecord>> {
        let url = format!("{}/api/search/aql", self.base_url);
        let url = url.as_str();

        let body = with_retry("artifactory search", || async move {
            let mut request = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(query.to_string());
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("Artifactory AQL search returned status code {}", status);
            }
            Ok(response.text().await?)
        })
        .await?;

        Self::parse_response(&body)
    }
}

#[async_trait]
impl RepoMetadataClient for ArtifactoryClient {
    async fn get_components_by_repo(&self, repo_names: &[String]) -> Vec<ArtifactRecord> {
        if repo_names.is_empty() {
            return Vec::new();
        }

        let query = Self::build_query(repo_names);
        match self.search(&query).await {
            Ok(records) => {
                debug!(repos = ?repo_names, records = records.len(), "artifactory search");
                records
            }
            Err(e) => {
                warn!(repos = ?repo_names, error = %format!("{:#}", e), "artifactory search failed");
                Vec::new()
            }
        }
    }
}
