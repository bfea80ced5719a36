/// Network adapters for the artifact repository and the registry
mod artifactory_client;
mod http;
mod sw360_client;

pub use artifactory_client::ArtifactoryClient;
pub use sw360_client::Sw360Client;
