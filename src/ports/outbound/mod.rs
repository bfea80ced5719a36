/// Outbound ports (Driven ports) - Infrastructure interfaces
pub mod component_reader;
pub mod output_presenter;
pub mod progress_reporter;
pub mod registry_client;
pub mod repo_metadata_client;

pub use component_reader::ComponentReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use registry_client::{
    CreateOutcome, NewComponent, NewRelease, RegistryClient, UpdateOutcome,
    MODERATION_REQUEST_MARKER,
};
pub use repo_metadata_client::RepoMetadataClient;
