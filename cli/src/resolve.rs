#![deny(missing_docs)]

//! # Resolve Command
//!
//! Reads Swagger documents, resolves them in parallel and writes the
//! assembled type graph as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use cdd_client_core::{resolve_documents, DocumentSource, ResolverConfig, TracingSink};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{CliError, CliResult};

/// Arguments for the resolve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// A Swagger document (YAML or JSON). May be repeated.
    #[clap(long = "spec")]
    pub specs: Vec<PathBuf>,

    /// Directory searched recursively for `*.yaml`, `*.yml` and `*.json`.
    #[clap(long)]
    pub spec_dir: Option<PathBuf>,

    /// Resolver configuration file (YAML or JSON).
    #[clap(long, env = "CDD_CLIENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Only resolve these services (file stems). Overrides the config allow-list.
    #[clap(long = "service")]
    pub services: Vec<String>,
}

/// What happened during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Documents assembled.
    pub resolved: usize,
    /// Documents that could not be read or parsed.
    pub failed: usize,
    /// Operations and definitions dropped inside resolved documents.
    pub dropped: usize,
}

/// Executes the resolve command.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &ResolveArgs) -> CliResult<ResolveSummary> {
    let mut config = match &args.config {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::default(),
    };
    if !args.services.is_empty() {
        config.services = Some(args.services.clone());
    }

    let mut paths = args.specs.clone();
    if let Some(dir) = &args.spec_dir {
        paths.extend(find_documents(dir)?);
    }
    if paths.is_empty() {
        return Err(CliError::General(
            "No documents given; use --spec or --spec-dir".to_string(),
        ));
    }

    let sources: Vec<DocumentSource> = paths.into_iter().map(DocumentSource::from_path).collect();
    let outcome = resolve_documents(sources, &config, &TracingSink);

    for failure in &outcome.failures {
        warn!(service = %failure.service_name, error = %failure.error, "Document skipped");
    }

    let json = serde_json::to_string_pretty(&outcome)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            info!(path = %path.display(), "Wrote assembled APIs");
        }
        None => println!("{}", json),
    }

    let summary = ResolveSummary {
        resolved: outcome.apis.len(),
        failed: outcome.failures.len(),
        dropped: outcome.total_errors(),
    };
    eprintln!(
        "Resolved {} document(s), {} failed, {} item(s) dropped",
        summary.resolved, summary.failed, summary.dropped
    );
    Ok(summary)
}

/// Finds Swagger documents under `dir`, sorted by path.
pub fn find_documents(dir: &Path) -> CliResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::General(format!(
            "Spec directory not found: {:?}",
            dir
        )));
    }
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "yaml" | "yml" | "json"))
        })
        .collect();
    found.sort();
    Ok(found)
}
