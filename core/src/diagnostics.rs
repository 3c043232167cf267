//! # Diagnostics
//!
//! The resolver never aborts on a recoverable anomaly. Instead it reports a
//! [`Diagnostic`] to the [`DiagnosticSink`] carried by the resolution context
//! and substitutes a fallback.
//!
//! Sinks must be `Send + Sync` so that one sink can be handed to each worker
//! of a parallel batch.

use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recovered locally, output is still usable.
    Warning,
    /// Something was dropped from the output.
    Error,
}

/// A single message emitted while resolving a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Human readable description.
    pub message: String,
    /// Warning or error.
    pub severity: Severity,
    /// The service (document) the message belongs to, when known.
    pub service: Option<String>,
}

impl Diagnostic {
    /// Creates a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            service: None,
        }
    }

    /// Creates an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            service: None,
        }
    }

    /// Attaches the service name.
    pub fn for_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// The `isError` flag of the diagnostics channel.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.service {
            Some(service) => write!(f, "{level} [{service}]: {}", self.message),
            None => write!(f, "{level}: {}", self.message),
        }
    }
}

/// Receives diagnostics from the resolver.
pub trait DiagnosticSink: Send + Sync {
    /// Records one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let service = diagnostic.service.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(service, "{}", diagnostic.message),
            Severity::Error => tracing::error!(service, "{}", diagnostic.message),
        }
    }
}

/// Stores diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Consumes the sink, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self.entries.into_inner() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Number of diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

/// Sends each diagnostic to two sinks.
pub struct TeeSink<'a> {
    first: &'a dyn DiagnosticSink,
    second: &'a dyn DiagnosticSink,
}

impl<'a> TeeSink<'a> {
    /// Combines two sinks.
    pub fn new(first: &'a dyn DiagnosticSink, second: &'a dyn DiagnosticSink) -> Self {
        Self { first, second }
    }
}

impl DiagnosticSink for TeeSink<'_> {
    fn report(&self, diagnostic: Diagnostic) {
        self.first.report(diagnostic.clone());
        self.second.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_counts() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::warning("format 'int32' on a string"));
        sink.report(Diagnostic::error("operation dropped"));
        sink.report(Diagnostic::warning("unknown format"));

        assert_eq!(sink.count(Severity::Warning), 2);
        assert_eq!(sink.count(Severity::Error), 1);
        assert_eq!(sink.into_diagnostics().len(), 3);
    }

    #[test]
    fn test_tee_sink_reaches_both() {
        let a = CollectingSink::new();
        let b = CollectingSink::new();
        TeeSink::new(&a, &b).report(Diagnostic::error("boom").for_service("users"));

        assert_eq!(a.diagnostics(), b.diagnostics());
        assert!(a.diagnostics()[0].is_error());
    }

    #[test]
    fn test_display_includes_service() {
        let d = Diagnostic::warning("skipped").for_service("billing");
        assert_eq!(d.to_string(), "warning [billing]: skipped");
        assert_eq!(Diagnostic::error("x").to_string(), "error: x");
    }
}
