#![deny(missing_docs)]

//! # Type Graph Models
//!
//! The normalized output of resolution, consumed by the emission layer.
//! Everything here is built once and never updated, except for the
//! inheritance flattening pass over object definitions.

pub mod definitions;
pub mod operation;
pub mod types;

pub use definitions::{
    AliasDefinition, EnumDefinition, Field, ModelDefinition, ObjectDefinition, VariantCase,
    VariantDefinition,
};
pub use operation::{
    is_success_status, HttpMethod, Operation, Parameter, ParameterLocation, QueryValueKind,
    ResponseType,
};
pub use types::{ResolvedType, BINARY_TYPE, OPEN_PROPERTY_BAG, URL_TYPE};

use serde::Serialize;

/// Everything resolved from one specification document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledApi {
    /// Service (document) name.
    pub service_name: String,
    /// Host from the document, if any.
    pub host: Option<String>,
    /// Base path prepended to every service path.
    pub base_path: Option<String>,
    /// Request functions.
    pub operations: Vec<Operation>,
    /// Named types, sorted by name.
    pub definitions: Vec<ModelDefinition>,
}

impl AssembledApi {
    /// Looks up a top-level definition by name.
    pub fn definition(&self, name: &str) -> Option<&ModelDefinition> {
        self.definitions.iter().find(|d| d.name() == name)
    }

    /// Looks up an operation by function name.
    pub fn operation(&self, function_name: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|o| o.function_name == function_name)
    }
}
