/// Mock implementations for testing
mod mock_progress_reporter;
mod mock_registry;
mod mock_repo_client;

pub use mock_progress_reporter::MockProgressReporter;
pub use mock_registry::ScriptedRegistry;
pub use mock_repo_client::MockRepoClient;
