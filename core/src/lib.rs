#![deny(missing_docs)]

//! # CDD Client Core
//!
//! Type resolution and model synthesis for Swagger 2.0 documents.
//!
//! A document is parsed into shim structures, every schema node is resolved
//! into a [`ResolvedType`] plus the named [`ModelDefinition`]s it needs, and
//! the result is assembled into one [`AssembledApi`] per service.

/// Shared error types.
pub mod error;

/// Diagnostics channel.
pub mod diagnostics;

/// Resolver configuration.
pub mod config;

/// Swagger (OAS 2.0) resolution.
pub mod oas;

/// Parallel resolution of many documents.
pub mod batch;

pub use batch::{resolve_documents, BatchOutcome, DocumentFailure, DocumentSource};
pub use config::ResolverConfig;
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticSink, Severity, TeeSink, TracingSink,
};
pub use error::{AppError, AppResult};
pub use oas::{
    assemble_api, parse_swagger_document, AssembledApi, Field, HttpMethod, ModelDefinition,
    Operation, Parameter, ParameterLocation, ResolvedType, ResponseType, SwaggerDocument,
};
