#![deny(missing_docs)]

//! # Swagger Resolution Module
//!
//! - **document**: Swagger 2.0 input shims and parsing.
//! - **models**: The normalized type graph handed to emission.
//! - **naming**: Deterministic identifiers and the reserved-word table.
//! - **resolver**: Schema, parameter and response resolution.
//! - **assembly**: One document in, one `AssembledApi` out.

pub mod assembly;
pub mod document;
pub mod models;
pub mod naming;
pub mod resolver;

pub use assembly::assemble_api;
pub use document::{parse_swagger_document, SwaggerDocument};
pub use models::{
    AssembledApi, Field, HttpMethod, ModelDefinition, Operation, Parameter, ParameterLocation,
    ResolvedType, ResponseType,
};
pub use naming::normalize_type_name;
pub use resolver::{ModelReference, ReferenceKind, Resolved, ResolutionContext, TypeLevel};
