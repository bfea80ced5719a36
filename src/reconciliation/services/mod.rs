mod artifact_matcher;
mod external_id_merger;
mod identity_selector;
mod result_aggregator;

pub use artifact_matcher::ArtifactMatcher;
pub use external_id_merger::{ExternalIdMerger, MergeOutcome};
pub use identity_selector::IdentitySelector;
pub use result_aggregator::ResultAggregator;
