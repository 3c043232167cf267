#![deny(missing_docs)]

//! # API Assembly
//!
//! Aggregates one document into an [`AssembledApi`]:
//!
//! 1. every entry of `definitions`, resolved at top level,
//! 2. every entry of `responses` carrying a schema (only its inline
//!    definitions are kept),
//! 3. every operation of every path.
//!
//! Definitions are then deduplicated by name, flattened once by the
//! inheritance pass and sorted. Failures of single definitions or operations
//! drop only that item and are summarized through the diagnostics channel.

use crate::config::ResolverConfig;
use crate::diagnostics::DiagnosticSink;
use crate::oas::document::SwaggerDocument;
use crate::oas::models::{AssembledApi, ModelDefinition, Operation};
use crate::oas::resolver::operations::{default_function_name, resolve_named_operation};
use crate::oas::resolver::{resolve_inheritance_tree, resolve_schema, ResolutionContext, TypeLevel};
use std::collections::{HashMap, HashSet};

/// Resolves a whole document.
pub fn assemble_api(
    service_name: &str,
    document: &SwaggerDocument,
    config: &ResolverConfig,
    sink: &dyn DiagnosticSink,
) -> AssembledApi {
    let ctx = ResolutionContext::new(document, config, service_name, sink);
    let mut definitions = Vec::new();
    let mut dropped_definitions = 0usize;

    let mut keys: Vec<&String> = document.definitions.keys().collect();
    keys.sort();
    for key in keys {
        let Some(schema) = document.definitions.get(key) else {
            continue;
        };
        match resolve_schema(schema, key, TypeLevel::TopLevel, &ctx) {
            Ok(resolved) => definitions.extend(resolved.definitions),
            Err(e) => {
                dropped_definitions += 1;
                ctx.error(format!("definition '{}' dropped: {}", key, e));
            }
        }
    }

    let mut keys: Vec<&String> = document.responses.keys().collect();
    keys.sort();
    for key in keys {
        let Some(schema) = document.responses.get(key).and_then(|r| r.schema.as_ref()) else {
            continue;
        };
        match resolve_schema(schema, key, TypeLevel::Nested, &ctx) {
            Ok(resolved) => definitions.extend(resolved.definitions),
            Err(e) => ctx.warn(format!("response '{}' skipped: {}", key, e)),
        }
    }

    let (operations, total_operations) = assemble_operations(document, &ctx, &mut definitions);

    let definitions = dedupe_definitions(definitions, &ctx);
    let mut definitions = resolve_inheritance_tree(definitions, &ctx);
    definitions.sort_by(|a, b| a.name().cmp(b.name()));

    let skipped = total_operations - operations.len();
    if skipped > 0 || dropped_definitions > 0 {
        ctx.warn(format!(
            "{} of {} operation(s) and {} definition(s) were dropped",
            skipped, total_operations, dropped_definitions
        ));
    }
    tracing::info!(
        service = service_name,
        operations = operations.len(),
        definitions = definitions.len(),
        skipped,
        "Assembled API"
    );

    AssembledApi {
        service_name: service_name.to_string(),
        host: document.host.clone(),
        base_path: document.base_path.clone(),
        operations,
        definitions,
    }
}

fn assemble_operations(
    document: &SwaggerDocument,
    ctx: &ResolutionContext<'_>,
    definitions: &mut Vec<ModelDefinition>,
) -> (Vec<Operation>, usize) {
    let mut paths: Vec<&String> = document.paths.items.keys().collect();
    paths.sort();

    let mut operations: Vec<Operation> = Vec::new();
    let mut total = 0usize;
    let mut used_names: HashSet<String> = HashSet::new();

    for path in paths {
        let Some(item) = document.paths.items.get(path) else {
            continue;
        };
        for (method, operation) in item.operations() {
            total += 1;
            let mut name = default_function_name(method, operation, path);
            if used_names.contains(&name) {
                let renamed = unique_name(&name, &used_names);
                ctx.warn(format!(
                    "{} {} reuses function name '{}'; renamed to '{}'",
                    method, path, name, renamed
                ));
                name = renamed;
            }
            used_names.insert(name.clone());
            match resolve_named_operation(name, path, method, item, operation, ctx) {
                Ok(resolved) => operations.push(resolved.collect_into(definitions)),
                Err(e) => ctx.error(format!("{} {} dropped: {}", method, path, e)),
            }
        }
    }
    (operations, total)
}

fn unique_name(base: &str, used: &HashSet<String>) -> String {
    let mut suffix = 2;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if !used.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Keeps the first definition of every name.
///
/// A later definition with the same name but a different shape is reported.
fn dedupe_definitions(
    definitions: Vec<ModelDefinition>,
    ctx: &ResolutionContext<'_>,
) -> Vec<ModelDefinition> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<ModelDefinition> = Vec::new();
    for definition in definitions {
        match index.get(definition.name()) {
            Some(&at) => {
                if unique[at] != definition {
                    ctx.warn(format!(
                        "'{}' is synthesized with conflicting shapes; keeping the first",
                        definition.name()
                    ));
                }
            }
            None => {
                index.insert(definition.name().to_string(), unique.len());
                unique.push(definition);
            }
        }
    }
    unique
}
