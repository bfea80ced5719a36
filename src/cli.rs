use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!(
                "Invalid log format: {}. Please specify 'pretty' or 'json'",
                s
            )),
        }
    }
}

/// Resolve SBOM component origins and reconcile them with a component registry
#[derive(Parser, Debug)]
#[command(name = "bom-reconcile")]
#[command(version)]
#[command(
    about = "Resolve SBOM component origins and reconcile them with a component registry",
    long_about = None
)]
pub struct Args {
    /// Path to the normalized component list (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Config file path (defaults to bom-reconcile.config.yml next to the input)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file path for the report (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Resolve origins and registry state only; never create or update entities
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum components reconciled in parallel (1-64)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub concurrency: Option<u16>,

    /// Artifact repository base URL (overrides the config file)
    #[arg(long)]
    pub artifactory_url: Option<String>,

    /// Registry REST base URL (overrides the config file)
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Repository whose hits mark a component as internal; repeatable
    #[arg(long = "internal-repo", value_name = "REPO")]
    pub internal_repos: Vec<String>,

    /// Additional repository searched for origins; repeatable
    #[arg(long = "search-repo", value_name = "REPO")]
    pub search_repos: Vec<String>,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Log format: pretty or json
    #[arg(long, default_value = "pretty")]
    pub log_format: LogFormat,
}
