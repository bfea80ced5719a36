use crate::application::dto::{ReconcileRequest, ReconcileResponse, ReconcileStatus, RunMetadata};
use crate::application::use_cases::{ReconcileRegistryUseCase, ResolveOriginUseCase};
use crate::ports::outbound::{ComponentReader, ProgressReporter, RegistryClient, RepoMetadataClient};
use crate::shared::Result;
use tracing::info;

/// ReconcileBomUseCase - full reconciliation run over a component list
///
/// Reads the normalized components, attaches their repository origin, then
/// reconciles each one against the registry.
///
/// # Type Parameters
/// * `CR` - ComponentReader implementation
/// * `PR` - ProgressReporter implementation
/// * `Q` - RepoMetadataClient implementation
/// * `R` - RegistryClient implementation
pub struct ReconcileBomUseCase<CR, PR, Q, R> {
    component_reader: CR,
    progress_reporter: PR,
    origin: ResolveOriginUseCase<Q>,
    registry: ReconcileRegistryUseCase<R>,
}

impl<CR, PR, Q, R> ReconcileBomUseCase<CR, PR, Q, R>
where
    CR: ComponentReader,
    PR: ProgressReporter,
    Q: RepoMetadataClient,
    R: RegistryClient,
{
    pub fn new(component_reader: CR, progress_reporter: PR, repo_client: Q, registry_client: R) -> Self {
        Self {
            component_reader,
            progress_reporter,
            origin: ResolveOriginUseCase::new(repo_client),
            registry: ReconcileRegistryUseCase::new(registry_client),
        }
    }

    /// Executes a reconciliation run
    ///
    /// # Errors
    /// Only input and setup problems are returned as errors. Per-component
    /// failures are recorded in the response and reflected by its exit code.
    pub async fn execute(&self, request: ReconcileRequest) -> Result<ReconcileResponse> {
        let metadata = RunMetadata::generate();
        info!(run_id = %metadata.run_id, dry_run = request.dry_run, "reconciliation started");

        self.progress_reporter.report(&format!(
            "📖 Loading components from: {}",
            request.input_path.display()
        ));
        let mut components = self.component_reader.read_components(&request.input_path)?;
        self.progress_reporter
            .report(&format!("✅ Detected {} component(s)", components.len()));

        if components.is_empty() {
            self.progress_reporter
                .report_completion("Nothing to reconcile: the component list is empty.");
            return Ok(ReconcileResponse::new(metadata, Vec::new()));
        }

        self.progress_reporter
            .report("🔍 Resolving repository origins...");
        let stats = self
            .origin
            .execute(&mut components, &request.internal_repos, &request.all_repos())
            .await?;
        self.progress_reporter.report(&format!(
            "   - Internal: {}, third-party: {}, not found: {}",
            stats.internal, stats.external, stats.not_found
        ));

        if request.dry_run {
            self.progress_reporter
                .report("🧪 Dry run: registry entities are resolved but never created or updated");
        }
        self.progress_reporter
            .report("🗂️  Reconciling with the registry...");

        let reports = self
            .registry
            .execute(
                &components,
                request.dry_run,
                request.concurrency,
                |current, total, name| {
                    self.progress_reporter
                        .report_progress(current, total, Some(name));
                },
            )
            .await;

        for report in &reports {
            for warning in &report.warnings {
                self.progress_reporter
                    .report_warning(&format!("{}@{}: {}", report.name, report.version, warning));
            }
            if report.status == ReconcileStatus::Failed {
                self.progress_reporter.report_error(&format!(
                    "{}@{}: {}",
                    report.name,
                    report.version,
                    report.error.as_deref().unwrap_or("failed")
                ));
            }
        }

        let response = ReconcileResponse::new(metadata, reports);
        let summary = &response.summary;
        self.progress_reporter.report_completion(&format!(
            "Reconciled {} component(s): {} existing, {} created, {} linked, {} conflicting, {} unregistered, {} failed",
            summary.total,
            summary.existing,
            summary.created,
            summary.linked,
            summary.conflicting,
            summary.unregistered,
            summary.failed
        ));
        info!(run_id = %response.metadata.run_id, failed = summary.failed, "reconciliation finished");

        Ok(response)
    }
}
