#![deny(missing_docs)]

//! # Request Body Resolution
//!
//! Body parameters, multipart/url-encoded form fields, and the choice of the
//! request mime type.

use crate::error::AppResult;
use crate::oas::document::{Operation as DocOperation, Parameter as DocParameter, SwaggerDocument};
use crate::oas::models::{Parameter, ParameterLocation, ResolvedType, BINARY_TYPE};
use crate::oas::naming::nested_type_name;
use crate::oas::resolver::params::build_parameter;
use crate::oas::resolver::types::{resolve_schema, TypeLevel};
use crate::oas::resolver::{Resolved, ResolutionContext};

/// Mime type preferred for operations that upload files.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Resolves the (single) body parameter, using the operation type name as
/// prefix for an inline schema.
pub fn resolve_body(
    parameter: &DocParameter,
    operation_type_name: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<Parameter>> {
    let resolved = match &parameter.schema {
        Some(schema) => resolve_schema(schema, operation_type_name, TypeLevel::Nested, ctx)?,
        None => {
            ctx.warn(format!(
                "body parameter '{}' of '{}' has no schema; using a free-form object",
                parameter.name, operation_type_name
            ));
            Resolved::bare(ResolvedType::open_property_bag())
        }
    };
    Ok(resolved.map(|ty| {
        build_parameter(
            &parameter.name,
            ParameterLocation::Body,
            ty,
            parameter.required,
            parameter.description.clone(),
        )
    }))
}

/// Resolves one form field.
///
/// Only `string` (optionally an enum) and `file` fields are supported; any
/// other kind is reported and skipped.
pub fn resolve_form_field(
    parameter: &DocParameter,
    operation_type_name: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Option<Resolved<Parameter>>> {
    match parameter.schema_type.as_deref() {
        Some("file") => {
            let mut field = build_parameter(
                &parameter.name,
                ParameterLocation::FormData,
                ResolvedType::Object(BINARY_TYPE.to_string()),
                parameter.required,
                parameter.description.clone(),
            );
            field.is_file = true;
            Ok(Some(Resolved::bare(field)))
        }
        Some("string") => {
            let prefix = nested_type_name(operation_type_name, &parameter.name);
            let resolved = resolve_schema(&parameter.as_schema(), &prefix, TypeLevel::Nested, ctx)?;
            Ok(Some(resolved.map(|ty| {
                build_parameter(
                    &parameter.name,
                    ParameterLocation::FormData,
                    ty,
                    parameter.required,
                    parameter.description.clone(),
                )
            })))
        }
        other => {
            ctx.warn(format!(
                "form field '{}' of '{}' has unsupported type '{}'; skipped",
                parameter.name,
                operation_type_name,
                other.unwrap_or("none")
            ));
            Ok(None)
        }
    }
}

/// The request mime type of an operation: its own `consumes`, else the
/// document's. Uploads prefer `multipart/form-data` when it is listed.
pub fn consumes_mime_type(
    operation: &DocOperation,
    document: &SwaggerDocument,
    uploads_file: bool,
) -> Option<String> {
    let declared = operation.consumes.as_ref().unwrap_or(&document.consumes);
    if uploads_file {
        if let Some(multipart) = declared.iter().find(|m| m.as_str() == MULTIPART_FORM_DATA) {
            return Some(multipart.clone());
        }
    }
    declared.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::diagnostics::CollectingSink;
    use crate::oas::resolver::test_support::{context, document, empty_document};

    fn param(yaml: &str) -> DocParameter {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_inline_body_named_after_operation() {
        let doc = empty_document();
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let p = param(
            "{name: body, in: body, required: true, schema: {properties: {name: {type: string}}}}",
        );
        let resolved = resolve_body(&p, "CreatePet", &ctx).unwrap();
        assert_eq!(resolved.value.resolved_type, ResolvedType::Object("CreatePet".into()));
        assert_eq!(resolved.value.location, ParameterLocation::Body);
        assert!(resolved.value.required);
        assert_eq!(resolved.definitions.len(), 1);
    }

    #[test]
    fn test_form_fields() {
        let doc = empty_document();
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);

        let file = resolve_form_field(&param("{name: upload, in: formData, type: file}"), "Upload", &ctx)
            .unwrap()
            .unwrap();
        assert!(file.value.is_file);
        assert_eq!(file.value.resolved_type, ResolvedType::Object("Data".into()));

        let kind = resolve_form_field(
            &param("{name: kind, in: formData, type: string, enum: [b, a]}"),
            "Upload",
            &ctx,
        )
        .unwrap()
        .unwrap();
        assert!(kind.value.is_enum_backed);
        assert_eq!(kind.definitions[0].name(), "UploadKind");

        for unsupported in ["integer", "number", "boolean", "array"] {
            let yaml = format!("{{name: n, in: formData, type: {unsupported}}}");
            assert!(resolve_form_field(&param(&yaml), "Upload", &ctx).unwrap().is_none());
        }
        assert_eq!(sink.diagnostics().len(), 4);
    }

    #[test]
    fn test_consumes_selection() {
        let doc = document(
            "swagger: '2.0'\ninfo: {title: t, version: '1'}\nconsumes: [application/json]\npaths: {}\n",
        );
        let inherits: DocOperation = serde_yaml::from_str("responses: {}").unwrap();
        assert_eq!(
            consumes_mime_type(&inherits, &doc, false).as_deref(),
            Some("application/json")
        );

        let upload: DocOperation = serde_yaml::from_str(
            "consumes: [application/x-www-form-urlencoded, multipart/form-data]\nresponses: {}",
        )
        .unwrap();
        assert_eq!(
            consumes_mime_type(&upload, &doc, true).as_deref(),
            Some("multipart/form-data")
        );
        assert_eq!(
            consumes_mime_type(&upload, &doc, false).as_deref(),
            Some("application/x-www-form-urlencoded")
        );

        let none: DocOperation = serde_yaml::from_str("consumes: []\nresponses: {}").unwrap();
        assert!(consumes_mime_type(&none, &doc, false).is_none());
    }
}
