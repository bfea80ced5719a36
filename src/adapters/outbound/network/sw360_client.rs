use super::http::{base_url, build_client, with_retry};
use crate::ports::outbound::{CreateOutcome, NewComponent, NewRelease, RegistryClient, UpdateOutcome};
use crate::reconciliation::domain::{EntityKind, ExternalIdKey, ExternalIds, RegistryRef};
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct HalHref {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct HalLinks {
    #[serde(rename = "self", default)]
    self_link: Option<HalHref>,
}

#[derive(Debug, Default, Deserialize)]
struct HalEmbedded {
    #[serde(rename = "sw360:components", default)]
    components: Vec<HalEntity>,
    #[serde(rename = "sw360:releases", default)]
    releases: Vec<HalEntity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HalEntity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    external_ids: ExternalIds,
    #[serde(rename = "_links", default)]
    links: HalLinks,
    #[serde(rename = "_embedded", default)]
    embedded: HalEmbedded,
}

impl From<HalEntity> for RegistryRef {
    fn from(entity: HalEntity) -> Self {
        let self_link = entity.links.self_link.map(|l| l.href).unwrap_or_default();
        let mut reference = RegistryRef::new(entity.name, self_link).with_external_ids(entity.external_ids);
        reference.version = entity.version.filter(|v| !v.is_empty());
        reference
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExternalIdsPatch<'a> {
    external_ids: &'a ExternalIds,
}

/// Sw360Client adapter for the component/release registry REST API
///
/// Speaks the registry's HAL+JSON dialect: collections arrive under
/// `_embedded.sw360:components` / `_embedded.sw360:releases` and entity ids
/// are the last segment of `_links.self.href`.
pub struct Sw360Client {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Sw360Client {
    /// # Arguments
    /// * `url` - REST root, e.g. `https://sw360.example/resource/api`
    /// * `token` - Sent as `Authorization: Token <token>`
    pub fn new(url: &str, token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url(url),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn collection(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::Component => "components",
            EntityKind::Release => "releases",
        }
    }

    /// External-id search URL for the given key encoding
    pub fn search_url(&self, kind: EntityKind, key: ExternalIdKey, external_id: &str) -> String {
        format!(
            "{}/{}/searchByExternalIds?{}={}",
            self.base_url,
            Self::collection(kind),
            key.query_param(),
            urlencoding::encode(external_id)
        )
    }

    fn entity_url(&self, kind: EntityKind, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            Self::collection(kind),
            urlencoding::encode(id)
        )
    }

    /// Parses a collection answer into references of `kind`
    pub fn parse_collection(kind: EntityKind, body: &str) -> Result<Vec<RegistryRef>> {
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entity: HalEntity = serde_json::from_str(body)?;
        Ok(Self::embedded(kind, entity.embedded))
    }

    /// Parses a single entity answer
    pub fn parse_entity(body: &str) -> Result<RegistryRef> {
        let entity: HalEntity = serde_json::from_str(body)?;
        Ok(entity.into())
    }

    /// Parses the releases embedded in a component answer
    pub fn parse_component_releases(body: &str) -> Result<Vec<RegistryRef>> {
        let entity: HalEntity = serde_json::from_str(body)?;
        Ok(Self::embedded(EntityKind::Release, entity.embedded))
    }

    fn embedded(kind: EntityKind, embedded: HalEmbedded) -> Vec<RegistryRef> {
        let entities = match kind {
            EntityKind::Component => embedded.components,
            EntityKind::Release => embedded.releases,
        };
        entities.into_iter().map(RegistryRef::from).collect()
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/hal+json");
        match &self.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, format!("Token {}", token)),
            None => request,
        }
    }

    /// GET returning the body, or `None` when the registry has nothing to list
    async fn get_listing(&self, label: &str, url: &str) -> Result<Option<String>> {
        with_retry(label, || async move {
            let response = self.request(Method::GET, url).send().await?;
            let status = response.status();
            if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                anyhow::bail!("{} returned status code {}", label, status);
            }
            Ok(Some(response.text().await?))
        })
        .await
    }

    /// Sends a JSON body and returns the status with the raw answer
    async fn send_json<B: Serialize + Sync>(
        &self,
        label: &str,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<(u16, String)> {
        let payload = serde_json::to_string(body)?;
        let payload = payload.as_str();
        with_retry(label, || {
            let method = method.clone();
            async move {
                let response = self
                    .request(method, url)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(payload.to_string())
                    .send()
                    .await?;
                let status = response.status().as_u16();
                Ok((status, response.text().await?))
            }
        })
        .await
    }

    async fn create(&self, label: &str, kind: EntityKind, body: &(impl Serialize + Sync)) -> Result<CreateOutcome> {
        let url = format!("{}/{}", self.base_url, Self::collection(kind));
        let (status, text) = self.send_json(label, Method::POST, &url, body).await?;
        let entity = if (200..300).contains(&status) {
            Self::parse_entity(&text).ok().filter(|e| !e.self_link.is_empty())
        } else {
            None
        };
        debug!(request = %label, status, "registry create");
        Ok(CreateOutcome { status, entity })
    }
}

#[async_trait]
impl RegistryClient for Sw360Client {
    async fn find_by_external_id(
        &self,
        kind: EntityKind,
        key: ExternalIdKey,
        external_id: &str,
    ) -> Result<Vec<RegistryRef>> {
        let url = self.search_url(kind, key, external_id);
        match self.get_listing("registry external-id search", &url).await? {
            Some(body) => Self::parse_collection(kind, &body),
            None => Ok(Vec::new()),
        }
    }

    async fn find_components_by_name(&self, name: &str) -> Result<Vec<RegistryRef>> {
        let url = format!(
            "{}/components?name={}",
            self.base_url,
            urlencoding::encode(name)
        );
        match self.get_listing("registry component listing", &url).await? {
            Some(body) => Self::parse_collection(EntityKind::Component, &body),
            None => Ok(Vec::new()),
        }
    }

    async fn find_releases_by_name_version(&self, name: &str, version: &str) -> Result<Vec<RegistryRef>> {
        let url = format!(
            "{}/releases?name={}&allDetails=true",
            self.base_url,
            urlencoding::encode(name)
        );
        let releases = match self.get_listing("registry release listing", &url).await? {
            Some(body) => Self::parse_collection(EntityKind::Release, &body)?,
            None => Vec::new(),
        };
        Ok(releases
            .into_iter()
            .filter(|r| r.name == name && r.version.as_deref() == Some(version))
            .collect())
    }

    async fn releases_of_component(&self, component_id: &str) -> Result<Vec<RegistryRef>> {
        let url = self.entity_url(EntityKind::Component, component_id);
        match self.get_listing("registry component fetch", &url).await? {
            Some(body) => Self::parse_component_releases(&body),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<RegistryRef> {
        let url = self.entity_url(kind, id);
        let body = self
            .get_listing("registry entity fetch", &url)
            .await?
            .ok_or_else(|| anyhow::anyhow!("registry {} {} not found", kind, id))?;
        Self::parse_entity(&body)
    }

    async fn create_component(&self, component: &NewComponent) -> Result<CreateOutcome> {
        self.create("registry component create", EntityKind::Component, component)
            .await
    }

    async fn create_release(&self, release: &NewRelease) -> Result<CreateOutcome> {
        self.create("registry release create", EntityKind::Release, release)
            .await
    }

    async fn update_external_ids(
        &self,
        kind: EntityKind,
        id: &str,
        external_ids: &ExternalIds,
    ) -> Result<UpdateOutcome> {
        let url = self.entity_url(kind, id);
        let (status, body) = self
            .send_json(
                "registry external-id update",
                Method::PATCH,
                &url,
                &ExternalIdsPatch { external_ids },
            )
            .await?;
        Ok(UpdateOutcome { status, body })
    }
}
