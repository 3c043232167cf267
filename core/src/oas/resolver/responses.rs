#![deny(missing_docs)]

//! # Response Resolution
//!
//! Resolves the declared responses of an operation and derives its success
//! and failure types.
//!
//! Per category (2xx success, everything else failure):
//! - no non-`Void` body: the category type is `Void`,
//! - exactly one: that body type is used directly,
//! - several: a `<Operation>Success` / `<Operation>Error` variant type is
//!   synthesized with one case per status code.
//!
//! Response lookups are tolerant: a bad `$ref` or schema drops only that
//! response, with a diagnostic.

use crate::oas::document::{Operation as DocOperation, Response as DocResponse};
use crate::oas::models::{
    is_success_status, ModelDefinition, ResolvedType, ResponseType, VariantCase,
    VariantDefinition,
};
use crate::oas::naming::{nested_type_name, normalize_service_path, status_case_name, status_sort_key};
use crate::oas::resolver::references::{ModelReference, ReferenceKind};
use crate::oas::resolver::types::{resolve_schema, TypeLevel};
use crate::oas::resolver::{Resolved, ResolutionContext};

/// Resolved responses of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResponses {
    /// Every response that resolved, in status code order.
    pub response_types: Vec<ResponseType>,
    /// Type returned on success.
    pub success_type: ResolvedType,
    /// Type returned on failure.
    pub failure_type: ResolvedType,
}

/// Resolves every response of `operation`.
pub fn resolve_responses(
    operation: &DocOperation,
    service_path: &str,
    operation_type_name: &str,
    ctx: &ResolutionContext<'_>,
) -> Resolved<ResolvedResponses> {
    let mut statuses: Vec<(&String, &DocResponse)> = operation.responses.iter().collect();
    statuses.sort_by_key(|(code, _)| status_sort_key(code));

    let mut definitions = Vec::new();
    let mut response_types = Vec::new();
    for (code, response) in statuses {
        let Some(resolved) = resolve_response(code, response, service_path, operation_type_name, ctx)
        else {
            continue;
        };
        response_types.push(ResponseType {
            status_code: code.clone(),
            resolved_type: resolved.collect_into(&mut definitions),
            is_multi_variant: false,
        });
    }

    let success_type = category_type(
        &mut response_types,
        true,
        &nested_type_name(operation_type_name, "Success"),
        &mut definitions,
        ctx,
    );
    let failure_type = category_type(
        &mut response_types,
        false,
        &nested_type_name(operation_type_name, "Error"),
        &mut definitions,
        ctx,
    );

    Resolved::new(
        ResolvedResponses {
            response_types,
            success_type,
            failure_type,
        },
        definitions,
    )
}

fn resolve_response(
    code: &str,
    response: &DocResponse,
    service_path: &str,
    operation_type_name: &str,
    ctx: &ResolutionContext<'_>,
) -> Option<Resolved<ResolvedType>> {
    let (schema, prefix) = match &response.reference {
        Some(reference) => {
            let parsed = match ModelReference::parse_kind(reference, ReferenceKind::Responses) {
                Ok(parsed) => parsed,
                Err(e) => {
                    ctx.warn(format!(
                        "response {} of '{}' skipped: {}",
                        code, operation_type_name, e
                    ));
                    return None;
                }
            };
            let Some(target) = ctx.document.response(&parsed.raw_name) else {
                ctx.warn(format!(
                    "response {} of '{}' skipped: '{}' does not exist",
                    code, operation_type_name, reference
                ));
                return None;
            };
            (target.schema.as_ref(), parsed.raw_name)
        }
        None => (
            response.schema.as_ref(),
            nested_type_name(&normalize_service_path(service_path), code),
        ),
    };

    let Some(schema) = schema else {
        return Some(Resolved::bare(ResolvedType::Void));
    };
    match resolve_schema(schema, &prefix, TypeLevel::Nested, ctx) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            ctx.warn(format!(
                "response {} of '{}' skipped: {}",
                code, operation_type_name, e
            ));
            None
        }
    }
}

fn category_type(
    responses: &mut [ResponseType],
    success: bool,
    variant_name: &str,
    definitions: &mut Vec<ModelDefinition>,
    ctx: &ResolutionContext<'_>,
) -> ResolvedType {
    let in_category = |r: &ResponseType| is_success_status(&r.status_code) == success;
    let mut bodies: Vec<ResolvedType> = responses
        .iter()
        .filter(|r| in_category(r) && !r.resolved_type.is_void())
        .map(|r| r.resolved_type.clone())
        .collect();

    match bodies.len() {
        0 => ResolvedType::Void,
        1 => bodies.remove(0),
        _ => {
            let mut cases = Vec::new();
            for response in responses.iter_mut().filter(|r| in_category(r)) {
                response.is_multi_variant = true;
                cases.push(VariantCase {
                    case_name: status_case_name(&response.status_code),
                    status_code: response.status_code.clone(),
                    resolved_type: response.resolved_type.clone(),
                });
            }
            definitions.push(ModelDefinition::ResultVariant(VariantDefinition {
                name: variant_name.to_string(),
                cases,
                is_internal_only: ctx.config.internal_only,
            }));
            ResolvedType::Object(variant_name.to_string())
        }
    }
}
