use bom_reconcile::adapters::outbound::console::StderrProgressReporter;
use bom_reconcile::adapters::outbound::filesystem::FileSystemReader;
use bom_reconcile::adapters::outbound::network::{ArtifactoryClient, Sw360Client};
use bom_reconcile::application::dto::{ReconcileRequest, DEFAULT_CONCURRENCY};
use bom_reconcile::application::factories::{PresenterFactory, PresenterType};
use bom_reconcile::application::use_cases::ReconcileBomUseCase;
use bom_reconcile::cli::Args;
use bom_reconcile::config::{self, ArtifactoryConfig, ConfigFile, RegistryConfig};
use bom_reconcile::logging;
use bom_reconcile::shared::error::{ExitCode, ReconcileError};
use bom_reconcile::shared::Result;
use clap::Parser;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    if let Err(e) = logging::init_tracing(&args.log_level, args.log_format) {
        eprintln!("⚠️  Warning: {}", e);
    }

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let settings = resolve_settings(&args, config, |key| std::env::var(key).ok())?;

    // Create adapters (Dependency Injection)
    let repo_client = ArtifactoryClient::new(&settings.artifactory.url, settings.artifactory.token)?;
    let registry_client = Sw360Client::new(&settings.registry.url, settings.registry.token)?;

    let use_case = ReconcileBomUseCase::new(
        FileSystemReader::new(),
        StderrProgressReporter::new(),
        repo_client,
        registry_client,
    );

    let request = ReconcileRequest::builder()
        .input_path(args.input.clone())
        .internal_repos(settings.artifactory.internal_repos)
        .search_repos(settings.artifactory.remote_repos)
        .dry_run(settings.dry_run)
        .concurrency(settings.concurrency)
        .build()?;

    let response = use_case.execute(request).await?;

    let presenter = PresenterFactory::create(PresenterType::for_output(args.output.clone()));
    presenter.present(&response.to_json()?)?;

    Ok(response.exit_code())
}

/// Explicit `--config`, otherwise a config file next to the input if present
fn load_config(args: &Args) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        let config = config::load_config_from_path(path)?;
        eprintln!("📄 Loaded config from: {}", path.display());
        return Ok(config);
    }

    let dir = match args.input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match config::discover_config(dir)? {
        Some(config) => {
            eprintln!(
                "📄 Auto-discovered config file: {}",
                dir.join(config::CONFIG_FILENAME).display()
            );
            Ok(config)
        }
        None => Ok(ConfigFile::default()),
    }
}

/// Effective run settings after merging CLI flags over the config file
#[derive(Debug)]
struct Settings {
    artifactory: ArtifactoryConfig,
    registry: RegistryConfig,
    concurrency: usize,
    dry_run: bool,
}

fn resolve_settings<F>(args: &Args, mut config: ConfigFile, env: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = &args.artifactory_url {
        config.artifactory.get_or_insert_with(Default::default).url = url.clone();
    }
    if let Some(url) = &args.registry_url {
        config.registry.get_or_insert_with(Default::default).url = url.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = Some(usize::from(concurrency));
    }

    let config = config.with_env_tokens(env);
    config::validate_config(&config)?;

    let mut artifactory = config.artifactory.ok_or_else(|| missing_url("artifactory", "--artifactory-url"))?;
    if !args.internal_repos.is_empty() {
        artifactory.internal_repos = args.internal_repos.clone();
    }
    if !args.search_repos.is_empty() {
        artifactory.remote_repos = args.search_repos.clone();
    }
    let registry = config.registry.ok_or_else(|| missing_url("registry", "--registry-url"))?;

    Ok(Settings {
        artifactory,
        registry,
        concurrency: config.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
        dry_run: args.dry_run || config.dry_run.unwrap_or(false),
    })
}

fn missing_url(section: &str, flag: &str) -> anyhow::Error {
    ReconcileError::InvalidConfig {
        details: format!("{}.url is not set", section),
        hint: format!(
            "Add it to {} or pass {} on the command line.",
            config::CONFIG_FILENAME,
            flag
        ),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["bom-reconcile", "-i", "components.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn file_config() -> ConfigFile {
        ConfigFile {
            artifactory: Some(ArtifactoryConfig {
                url: "https://af.example.com/artifactory".to_string(),
                token: None,
                internal_repos: vec!["debian-internal".to_string()],
                remote_repos: vec!["debian-remote".to_string()],
            }),
            registry: Some(RegistryConfig {
                url: "https://sw360.example.com/resource/api".to_string(),
                token: None,
            }),
            concurrency: Some(4),
            dry_run: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_settings_from_config() {
        let settings = resolve_settings(&args(&[]), file_config(), no_env).unwrap();
        assert_eq!(settings.artifactory.internal_repos, vec!["debian-internal"]);
        assert_eq!(settings.artifactory.remote_repos, vec!["debian-remote"]);
        assert_eq!(settings.concurrency, 4);
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let settings = resolve_settings(
            &args(&[
                "--registry-url",
                "http://localhost:8080/resource/api",
                "--concurrency",
                "2",
                "--search-repo",
                "npm-remote",
                "--dry-run",
            ]),
            file_config(),
            no_env,
        )
        .unwrap();
        assert_eq!(settings.registry.url, "http://localhost:8080/resource/api");
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.artifactory.remote_repos, vec!["npm-remote"]);
        assert_eq!(settings.artifactory.internal_repos, vec!["debian-internal"]);
        assert!(settings.dry_run);
    }

    #[test]
    fn test_urls_from_cli_only() {
        let settings = resolve_settings(
            &args(&["--artifactory-url", "http://af", "--registry-url", "http://reg"]),
            ConfigFile::default(),
            |key| Some(format!("{}-value", key)),
        )
        .unwrap();
        assert_eq!(settings.artifactory.url, "http://af");
        assert_eq!(settings.artifactory.token.as_deref(), Some("ARTIFACTORY_TOKEN-value"));
        assert_eq!(settings.registry.token.as_deref(), Some("SW360_TOKEN-value"));
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_missing_urls_rejected() {
        let err = resolve_settings(&args(&[]), ConfigFile::default(), no_env).unwrap_err();
        assert!(err.to_string().contains("artifactory.url is not set"));

        let err = resolve_settings(&args(&["--artifactory-url", "http://af"]), ConfigFile::default(), no_env)
            .unwrap_err();
        assert!(err.to_string().contains("registry.url is not set"));
    }

    #[test]
    fn test_load_config_discovers_file_next_to_input() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(config::CONFIG_FILENAME), "concurrency: 3\n").unwrap();
        let input = dir.path().join("components.json");

        let args = Args::try_parse_from(["bom-reconcile", "-i", input.to_str().unwrap()]).unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.concurrency, Some(3));
    }

    #[test]
    fn test_load_config_explicit_path_must_exist() {
        let args = args(&["--config", "/nonexistent/bom-reconcile.config.yml"]);
        assert!(load_config(&args).is_err());
    }
}
