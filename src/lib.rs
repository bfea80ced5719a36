//! bom-reconcile - artifact origin resolution and registry reconciliation
//!
//! This library takes a normalized list of SBOM components, finds where each
//! one came from in an artifact repository, and makes sure a matching
//! component and release exist in a component registry, linking existing
//! entries instead of duplicating them.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`reconciliation`): purl parsing, artifact matching,
//!   identity selection and external-id merging, all free of I/O
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Artifactory, SW360, filesystem and console
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use bom_reconcile::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let use_case = ReconcileBomUseCase::new(
//!     FileSystemReader::new(),
//!     StderrProgressReporter::new(),
//!     ArtifactoryClient::new("https://artifactory.example.com/artifactory", None)?,
//!     Sw360Client::new("https://sw360.example.com/resource/api", None)?,
//! );
//!
//! let request = ReconcileRequest::builder()
//!     .input_path("components.json")
//!     .internal_repos(vec!["debian-internal".to_string()])
//!     .search_repos(vec!["debian-remote".to_string()])
//!     .build()?;
//!
//! let response = use_case.execute(request).await?;
//! println!("{}", response.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod logging;
pub mod ports;
pub mod reconciliation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::network::{ArtifactoryClient, Sw360Client};
    pub use crate::application::dto::{
        ComponentReport, ReconcileRequest, ReconcileResponse, ReconcileStatus, ReconcileSummary,
    };
    pub use crate::application::use_cases::{
        ReconcileBomUseCase, ReconcileRegistryUseCase, RegistryIdentityResolver,
        ResolveOriginUseCase,
    };
    pub use crate::ports::outbound::{
        ComponentReader, CreateOutcome, NewComponent, NewRelease, OutputPresenter,
        ProgressReporter, RegistryClient, RepoMetadataClient, UpdateOutcome,
    };
    pub use crate::reconciliation::domain::{
        ArtifactMatch, ArtifactRecord, Component, EntityKind, ExternalIds, MatchConfidence, Purl,
        RegistryRef,
    };
    pub use crate::reconciliation::policies::RepoPriority;
    pub use crate::reconciliation::services::{
        ArtifactMatcher, ExternalIdMerger, IdentitySelector, ResultAggregator,
    };
    pub use crate::shared::error::{EngineError, ExitCode, ReconcileError};
    pub use crate::shared::Result;
}
