#![deny(missing_docs)]

//! # Operation Resolution
//!
//! Resolves one HTTP verb at one path template into a request function.
//! A pure function of the operation, the document and the configuration.

use crate::error::{AppError, AppResult};
use crate::oas::document::{Operation as DocOperation, PathItem};
use crate::oas::models::{HttpMethod, Operation, ParameterLocation};
use crate::oas::naming::{function_name, operation_type_name};
use crate::oas::resolver::body::consumes_mime_type;
use crate::oas::resolver::params::{effective_parameters, resolve_parameters};
use crate::oas::resolver::responses::resolve_responses;
use crate::oas::resolver::{Resolved, ResolutionContext};
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("Invalid regex constant"))
}

/// Names of the `{placeholders}` in a path template, in order.
pub fn path_placeholders(path: &str) -> Vec<&str> {
    placeholder_regex()
        .captures_iter(path)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Resolves one operation.
///
/// Fails with [`AppError::MissingConsumes`] when the operation sends a body
/// or form fields but no request mime type is declared, and with
/// [`AppError::InvalidReference`] on malformed references. The caller drops
/// only this operation in either case.
pub fn resolve_operation(
    path: &str,
    method: HttpMethod,
    path_item: &PathItem,
    operation: &DocOperation,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<Operation>> {
    let name = default_function_name(method, operation, path);
    resolve_named_operation(name, path, method, path_item, operation, ctx)
}

/// Function name an operation gets when nothing else claims it.
pub fn default_function_name(method: HttpMethod, operation: &DocOperation, path: &str) -> String {
    function_name(operation.operation_id.as_deref(), method.as_str(), path)
}

/// Resolves one operation under an already chosen function name.
///
/// Inline types synthesized for the operation (`<Name>Headers`,
/// `<Name>Success`, ...) are named after `name`.
pub fn resolve_named_operation(
    name: String,
    path: &str,
    method: HttpMethod,
    path_item: &PathItem,
    operation: &DocOperation,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<Operation>> {
    let type_name = operation_type_name(&name);

    let raw_parameters = effective_parameters(&path_item.parameters, &operation.parameters, ctx)?;

    let mut definitions = Vec::new();
    let parameters = resolve_parameters(&raw_parameters, &type_name, ctx)?
        .collect_into(&mut definitions);

    for placeholder in path_placeholders(path) {
        let declared = parameters
            .iter()
            .any(|p| p.location == ParameterLocation::Path && p.name == placeholder);
        if !declared {
            ctx.warn(format!(
                "'{}' at '{}' has no path parameter for '{{{}}}'",
                name, path, placeholder
            ));
        }
    }

    let sends_payload = parameters.iter().any(|p| {
        matches!(
            p.location,
            ParameterLocation::Body | ParameterLocation::FormData
        )
    });
    let uploads_file = parameters.iter().any(|p| p.is_file);
    let consumes = consumes_mime_type(operation, ctx.document, uploads_file);
    if sends_payload && consumes.is_none() {
        return Err(AppError::MissingConsumes {
            operation: name,
            path: path.to_string(),
        });
    }

    let responses = resolve_responses(operation, path, &type_name, ctx)
        .collect_into(&mut definitions);

    let produces = operation
        .produces
        .clone()
        .unwrap_or_else(|| ctx.document.produces.clone());

    let resolved = Operation {
        function_name: name,
        http_method: method,
        service_path: path.to_string(),
        parameters,
        response_types: responses.response_types,
        success_type: responses.success_type,
        failure_type: responses.failure_type,
        consumes_mime_type: if sends_payload { consumes } else { None },
        produces,
        is_internal_only: ctx.config.internal_only || operation.is_marked_internal(),
        is_deprecated: operation.deprecated,
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        tags: operation.tags.clone(),
    };
    Ok(Resolved::new(resolved, definitions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::diagnostics::CollectingSink;
    use crate::oas::models::ResolvedType;
    use crate::oas::resolver::test_support::{context, document};

    const DOC: &str = r#"
swagger: '2.0'
info: {title: t, version: '1'}
produces: [application/json]
paths:
  /pets/{petId}:
    parameters:
      - {name: petId, in: path, required: true, type: string}
    get:
      operationId: get_pet
      tags: [pets]
      responses:
        '200': {description: ok, schema: {$ref: '#/definitions/Pet'}}
    put:
      operationId: updatePet
      parameters:
        - {name: body, in: body, required: true, schema: {$ref: '#/definitions/Pet'}}
      responses:
        '204': {description: updated}
    post:
      consumes: [multipart/form-data]
      x-internal: true
      deprecated: true
      parameters:
        - {name: photo, in: formData, type: file, required: true}
      responses:
        '201': {description: created}
  /orphans/{id}:
    get:
      responses:
        '200': {description: ok}
definitions:
  Pet:
    type: object
    properties: {name: {type: string}}
"#;

    fn resolve(path: &str, method: HttpMethod) -> (AppResult<Resolved<Operation>>, usize) {
        let doc = document(DOC);
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let item = doc.paths.items.get(path).unwrap();
        let (_, op) = item
            .operations()
            .into_iter()
            .find(|(m, _)| *m == method)
            .unwrap();
        let result = resolve_operation(path, method, item, op, &ctx);
        (result, sink.diagnostics().len())
    }

    #[test]
    fn test_get_with_path_level_parameter() {
        let (result, warnings) = resolve("/pets/{petId}", HttpMethod::Get);
        let op = result.unwrap().value;
        assert_eq!(op.function_name, "getPet");
        assert_eq!(op.parameters[0].name, "petId");
        assert_eq!(op.success_type, ResolvedType::Object("Pet".into()));
        assert_eq!(op.produces, vec!["application/json"]);
        assert_eq!(op.tags, vec!["pets"]);
        assert!(op.consumes_mime_type.is_none());
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_body_without_consumes_fails() {
        let (result, _) = resolve("/pets/{petId}", HttpMethod::Put);
        match result.unwrap_err() {
            AppError::MissingConsumes { operation, path } => {
                assert_eq!(operation, "updatePet");
                assert_eq!(path, "/pets/{petId}");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_upload_operation() {
        let (result, _) = resolve("/pets/{petId}", HttpMethod::Post);
        let op = result.unwrap().value;
        assert_eq!(op.function_name, "postPetsPetId");
        assert_eq!(op.consumes_mime_type.as_deref(), Some("multipart/form-data"));
        assert!(op.is_internal_only);
        assert!(op.is_deprecated);
        assert!(op.parameter("photo").unwrap().is_file);
    }

    #[test]
    fn test_undeclared_placeholder_warns() {
        let (result, warnings) = resolve("/orphans/{id}", HttpMethod::Get);
        assert!(result.is_ok());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(path_placeholders("/a/{b}/c/{d_e}"), vec!["b", "d_e"]);
        assert!(path_placeholders("/plain").is_empty());
    }
}
