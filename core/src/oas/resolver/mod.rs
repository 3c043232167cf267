#![deny(missing_docs)]

//! # Resolver Module
//!
//! Walks the schema graph of one Swagger document and derives the normalized
//! type graph.
//!
//! Every resolution step is a pure function of its input schema, the
//! read-only document and the configuration. Inline definitions discovered
//! along the way are returned next to the value in a [`Resolved`] pair and
//! concatenated by the caller; nothing is accumulated in shared state.
//!
//! Handles:
//! - Primitive type and format matrix (`primitives`).
//! - `$ref` parsing (`references`).
//! - Object synthesis and `allOf` composition (`objects`).
//! - Schema dispatch: arrays, dictionaries, enums, free-form (`types`).
//! - Inheritance flattening (`inheritance`).
//! - Parameters, bodies, responses and whole operations.

pub mod body;
pub mod inheritance;
pub mod objects;
pub mod operations;
pub mod params;
pub mod primitives;
pub mod references;
pub mod responses;
pub mod types;

pub use inheritance::resolve_inheritance_tree;
pub use objects::make_object;
pub use operations::{default_function_name, resolve_named_operation, resolve_operation};
pub use primitives::DataFormat;
pub use references::{ModelReference, ReferenceKind};
pub use types::{resolve_schema, TypeLevel};

use crate::config::ResolverConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::oas::document::SwaggerDocument;
use crate::oas::models::ModelDefinition;

/// A resolved value together with the inline definitions it requires.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// The resolved value.
    pub value: T,
    /// Definitions synthesized while resolving `value`.
    pub definitions: Vec<ModelDefinition>,
}

impl<T> Resolved<T> {
    /// Pairs a value with its definitions.
    pub fn new(value: T, definitions: Vec<ModelDefinition>) -> Self {
        Self { value, definitions }
    }

    /// A value that required no definitions.
    pub fn bare(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    /// Maps the value, keeping the definitions.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            definitions: self.definitions,
        }
    }

    /// Moves the definitions into `sink` and returns the value.
    pub fn collect_into(self, sink: &mut Vec<ModelDefinition>) -> T {
        sink.extend(self.definitions);
        self.value
    }
}

/// Read-only state shared by every resolution call for one document.
#[derive(Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// The document being resolved.
    pub document: &'a SwaggerDocument,
    /// Cross-cutting configuration.
    pub config: &'a ResolverConfig,
    /// Name of the service the document describes.
    pub service_name: &'a str,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ResolutionContext<'a> {
    /// Creates a context.
    pub fn new(
        document: &'a SwaggerDocument,
        config: &'a ResolverConfig,
        service_name: &'a str,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            document,
            config,
            service_name,
            sink,
        }
    }

    /// Reports a recoverable anomaly.
    pub fn warn(&self, message: impl Into<String>) {
        self.sink
            .report(Diagnostic::warning(message).for_service(self.service_name));
    }

    /// Reports an item that was dropped from the output.
    pub fn error(&self, message: impl Into<String>) {
        self.sink
            .report(Diagnostic::error(message).for_service(self.service_name));
    }
}

impl std::fmt::Debug for ResolutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("service_name", &self.service_name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
