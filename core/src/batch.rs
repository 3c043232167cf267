#![deny(missing_docs)]

//! # Batch Resolution
//!
//! Resolves many documents in parallel, one worker per document
//! (acquire -> parse -> assemble). Workers share nothing mutable; a failure
//! to acquire or parse one document is recorded and never affects the
//! others.

use crate::config::ResolverConfig;
use crate::diagnostics::{CollectingSink, DiagnosticSink, Severity, TeeSink};
use crate::error::AppResult;
use crate::oas::assembly::assemble_api;
use crate::oas::document::parse_swagger_document;
use crate::oas::models::AssembledApi;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

type Acquire = Box<dyn Fn() -> AppResult<String> + Send + Sync>;

/// A document to resolve, with a deferred way to obtain its text.
pub struct DocumentSource {
    /// Service the document describes.
    pub service_name: String,
    acquire: Acquire,
}

impl DocumentSource {
    /// A source backed by an arbitrary acquisition function.
    pub fn new(
        service_name: impl Into<String>,
        acquire: impl Fn() -> AppResult<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            acquire: Box::new(acquire),
        }
    }

    /// A source holding the document text in memory.
    pub fn from_text(service_name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(service_name, move || Ok(text.clone()))
    }

    /// A source read from disk; the service name is the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let service_name = service_name_for(&path);
        Self::new(service_name, move || Ok(fs::read_to_string(&path)?))
    }

    fn acquire(&self) -> AppResult<String> {
        (self.acquire)()
    }
}

impl fmt::Debug for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSource")
            .field("service_name", &self.service_name)
            .finish_non_exhaustive()
    }
}

/// Service name derived from a file path (its stem).
pub fn service_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A document that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFailure {
    /// Service name.
    pub service_name: String,
    /// Why it failed.
    pub error: String,
}

/// Diagnostic counts for one resolved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticCounts {
    /// Recoverable anomalies.
    pub warnings: usize,
    /// Dropped items.
    pub errors: usize,
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Assembled APIs, sorted by service name.
    pub apis: Vec<AssembledApi>,
    /// Documents that could not be acquired or parsed.
    pub failures: Vec<DocumentFailure>,
    /// Diagnostic counts per resolved service, sorted by service name.
    pub counts: Vec<(String, DiagnosticCounts)>,
}

impl BatchOutcome {
    /// Whether any document failed outright.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Total number of dropped items across all resolved documents.
    pub fn total_errors(&self) -> usize {
        self.counts.iter().map(|(_, c)| c.errors).sum()
    }
}

enum Outcome {
    Resolved(AssembledApi, DiagnosticCounts),
    Failed(DocumentFailure),
}

/// Resolves every admitted source in parallel.
///
/// Sources rejected by [`ResolverConfig::allows`] are skipped before
/// acquisition. Every diagnostic is forwarded to `sink`.
pub fn resolve_documents(
    sources: Vec<DocumentSource>,
    config: &ResolverConfig,
    sink: &dyn DiagnosticSink,
) -> BatchOutcome {
    let admitted: Vec<DocumentSource> = sources
        .into_iter()
        .filter(|s| {
            let allowed = config.allows(&s.service_name);
            if !allowed {
                tracing::debug!(service = %s.service_name, "Skipping service not in allow-list");
            }
            allowed
        })
        .collect();

    let outcomes: Vec<Outcome> = admitted
        .par_iter()
        .map(|source| resolve_one(source, config, sink))
        .collect();

    let mut outcome = BatchOutcome {
        apis: Vec::new(),
        failures: Vec::new(),
        counts: Vec::new(),
    };
    for result in outcomes {
        match result {
            Outcome::Resolved(api, counts) => {
                outcome.counts.push((api.service_name.clone(), counts));
                outcome.apis.push(api);
            }
            Outcome::Failed(failure) => outcome.failures.push(failure),
        }
    }
    outcome.apis.sort_by(|a, b| a.service_name.cmp(&b.service_name));
    outcome.counts.sort_by(|a, b| a.0.cmp(&b.0));
    outcome
        .failures
        .sort_by(|a, b| a.service_name.cmp(&b.service_name));
    outcome
}

fn resolve_one(source: &DocumentSource, config: &ResolverConfig, sink: &dyn DiagnosticSink) -> Outcome {
    let service = source.service_name.as_str();
    let document = source
        .acquire()
        .and_then(|text| parse_swagger_document(&text));
    let document = match document {
        Ok(document) => document,
        Err(e) => {
            tracing::error!(service, error = %e, "Document failed");
            return Outcome::Failed(DocumentFailure {
                service_name: service.to_string(),
                error: e.to_string(),
            });
        }
    };

    let local = CollectingSink::new();
    let api = assemble_api(service, &document, config, &TeeSink::new(&local, sink));
    let counts = DiagnosticCounts {
        warnings: local.count(Severity::Warning),
        errors: local.count(Severity::Error),
    };
    Outcome::Resolved(api, counts)
}
