//! End-to-end resolution of Swagger documents through the public API.

use cdd_client_core::oas::models::VariantCase;
use cdd_client_core::oas::naming::normalize_type_name;
use cdd_client_core::oas::resolver::{resolve_schema, ModelReference, ResolutionContext, TypeLevel};
use cdd_client_core::oas::document::Schema;
use cdd_client_core::{
    assemble_api, parse_swagger_document, AppError, CollectingSink, ModelDefinition,
    ResolvedType, ResolverConfig, Severity,
};
use pretty_assertions::assert_eq;

const STORE: &str = r#"
swagger: '2.0'
info:
  title: Store
  version: 1.0
host: store.example.com
basePath: /api
consumes: [application/json]
produces: [application/json]
paths:
  /widgets:
    get:
      operationId: list_widgets
      parameters:
        - {name: sort, in: query, type: string, enum: [name, created, id]}
        - {name: since, in: query, type: string, format: date-time}
        - {name: X-Trace-Id, in: header, type: string}
        - {name: Authorization, in: header, type: string, required: true}
      responses:
        '200':
          description: ok
          schema:
            type: array
            items: {$ref: '#/definitions/Widget'}
    post:
      operationId: createWidget
      parameters:
        - name: body
          in: body
          required: true
          schema: {$ref: '#/definitions/Widget'}
      responses:
        '200': {description: existing, schema: {$ref: '#/definitions/Widget'}}
        '201':
          description: created
          schema:
            type: object
            properties:
              id: {type: string, format: uuid}
        '422': {$ref: '#/responses/ValidationFailed'}
  /widgets/{widgetId}/tags:
    get:
      parameters:
        - {name: widgetId, in: path, required: true, type: integer, format: int64}
      responses:
        '200':
          description: ok
          schema:
            type: object
            additionalProperties: {$ref: '#/definitions/Tag'}
definitions:
  Entity:
    type: object
    required: [id]
    properties:
      id: {type: string}
      created_at: {type: string, format: date-time}
  Widget:
    description: A sellable widget.
    allOf:
      - $ref: '#/definitions/Entity'
      - type: object
        required: [name]
        properties:
          name: {type: string}
          color: {type: string, enum: [red, blue, green, blue]}
          default: {type: boolean, default: false}
          size: {type: number, format: float, default: 1.5}
  Tag:
    type: string
    enum: [b, a, c]
  Weight:
    type: number
    format: float64
responses:
  ValidationFailed:
    description: invalid input
    schema:
      type: object
      properties:
        errors:
          type: array
          items: {type: string}
"#;

fn assemble(config: &ResolverConfig) -> (cdd_client_core::AssembledApi, CollectingSink) {
    let doc = parse_swagger_document(STORE).unwrap();
    let sink = CollectingSink::new();
    let api = assemble_api("store", &doc, config, &sink);
    (api, sink)
}

#[test]
fn definitions_are_resolved_sorted_and_flattened() {
    let (api, _) = assemble(&ResolverConfig::default());

    let names: Vec<&str> = api.definitions.iter().map(|d| d.name()).collect();
    assert_eq!(
        names,
        vec![
            "CreateWidgetSuccess",
            "Entity",
            "ListWidgetsHeaders",
            "ListWidgetsSort",
            "Tag",
            "ValidationFailed",
            "Weight",
            "Widget",
            "Widgets201",
        ]
    );

    let widget = api.definition("Widget").unwrap().as_object().unwrap();
    assert_eq!(widget.description.as_deref(), Some("A sellable widget."));
    assert!(widget.inherits_from.is_empty());
    let props: Vec<&str> = widget
        .fields
        .iter()
        .map(|f| f.safe_property_name.as_str())
        .collect();
    assert_eq!(props, vec!["color", "createdAt", "`default`", "id", "name", "size"]);
    assert!(widget.field("id").unwrap().required);
    assert!(widget.field("name").unwrap().required);
    assert!(!widget.field("color").unwrap().required);
    assert_eq!(widget.field("created_at").unwrap().resolved_type, ResolvedType::Date);
    assert_eq!(widget.field("default").unwrap().safe_parameter_name, "default_");
    assert_eq!(widget.field("default").unwrap().default_value.as_deref(), Some("false"));
    assert_eq!(widget.field("size").unwrap().default_value.as_deref(), Some("1.5"));

    let color = widget.embedded_definitions[0].as_enumeration().unwrap();
    assert_eq!(color.name, "WidgetColor");
    assert_eq!(color.values, vec!["blue", "green", "red"]);

    let tag = api.definition("Tag").unwrap().as_enumeration().unwrap();
    assert_eq!(tag.values, vec!["a", "b", "c"]);

    let weight = api.definition("Weight").unwrap().as_alias().unwrap();
    assert_eq!(weight.underlying, ResolvedType::Double(None));
}

#[test]
fn operations_carry_typed_signatures() {
    let config = ResolverConfig {
        global_headers: vec!["authorization".to_string()],
        ..ResolverConfig::default()
    };
    let (api, _) = assemble(&config);
    assert_eq!(api.base_path.as_deref(), Some("/api"));

    let names: Vec<&str> = api
        .operations
        .iter()
        .map(|o| o.function_name.as_str())
        .collect();
    assert_eq!(names, vec!["listWidgets", "createWidget", "getWidgetsWidgetIdTags"]);

    let list = api.operation("listWidgets").unwrap();
    let params: Vec<&str> = list.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["sort", "since", "headers"]);
    assert!(list.parameter("sort").unwrap().is_enum_backed);
    assert_eq!(
        list.success_type,
        ResolvedType::Array(Box::new(ResolvedType::Object("Widget".into())))
    );
    let headers = api
        .definition("ListWidgetsHeaders")
        .unwrap()
        .as_object()
        .unwrap();
    assert_eq!(headers.field_labels(), vec!["X-Trace-Id"]);
    assert_eq!(headers.fields[0].safe_property_name, "traceId");

    let create = api.operation("createWidget").unwrap();
    assert_eq!(create.consumes_mime_type.as_deref(), Some("application/json"));
    assert_eq!(
        create.success_type,
        ResolvedType::Object("CreateWidgetSuccess".into())
    );
    assert_eq!(
        create.failure_type,
        ResolvedType::Object("ValidationFailed".into())
    );

    let variant = api
        .definition("CreateWidgetSuccess")
        .unwrap()
        .as_variant()
        .unwrap();
    assert_eq!(
        variant.cases,
        vec![
            VariantCase {
                case_name: "ok".into(),
                status_code: "200".into(),
                resolved_type: ResolvedType::Object("Widget".into()),
            },
            VariantCase {
                case_name: "created".into(),
                status_code: "201".into(),
                resolved_type: ResolvedType::Object("Widgets201".into()),
            },
        ]
    );

    let tags = api.operation("getWidgetsWidgetIdTags").unwrap();
    assert_eq!(tags.parameters[0].resolved_type, ResolvedType::Int64(None));
    assert_eq!(
        tags.success_type,
        ResolvedType::Dictionary(Box::new(ResolvedType::Enumeration("Tag".into())))
    );
}

#[test]
fn resolution_is_deterministic() {
    let config = ResolverConfig::default();
    let (first, first_sink) = assemble(&config);
    let (second, second_sink) = assemble(&config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first_sink.diagnostics(), second_sink.diagnostics());
}

#[test]
fn only_format_violations_are_reported() {
    let (_, sink) = assemble(&ResolverConfig::default());
    let diagnostics = sink.diagnostics();
    assert_eq!(sink.count(Severity::Error), 0);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert!(diagnostics[0].message.contains("float64"));
    assert_eq!(diagnostics[0].service.as_deref(), Some("store"));
}

#[test]
fn visibility_and_codable_are_threaded_through() {
    let config = ResolverConfig {
        internal_only: true,
        codable: false,
        ..ResolverConfig::default()
    };
    let (api, _) = assemble(&config);
    for definition in &api.definitions {
        match definition {
            ModelDefinition::Object(o) => assert!(o.is_internal_only && !o.is_codable),
            ModelDefinition::Enumeration(e) => assert!(e.is_internal_only && !e.is_codable),
            ModelDefinition::TypeAlias(a) => assert!(a.is_internal_only),
            ModelDefinition::ResultVariant(v) => assert!(v.is_internal_only),
        }
    }
    assert!(api.operations.iter().all(|o| o.is_internal_only));
}

#[test]
fn name_normalization_is_idempotent() {
    for raw in [
        "user",
        "User_Profile",
        "user-profile-v2",
        "HTTP_STATUS",
        "already.Normalized",
        "x--y__z",
        "9lives",
        "self",
        "mixedCASE_name",
    ] {
        let once = normalize_type_name(raw);
        assert_eq!(normalize_type_name(&once), once, "input {raw}");
    }
}

#[test]
fn malformed_reference_is_a_typed_error() {
    match ModelReference::parse("notAValidRef") {
        Err(AppError::InvalidReference { reference, .. }) => {
            assert_eq!(reference, "notAValidRef")
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn dictionary_of_reference_adds_no_definitions() {
    let doc = parse_swagger_document(STORE).unwrap();
    let config = ResolverConfig::default();
    let sink = CollectingSink::new();
    let ctx = ResolutionContext::new(&doc, &config, "store", &sink);
    let schema: Schema = serde_yaml::from_str(
        "type: object\nadditionalProperties: {$ref: '#/definitions/Widget'}",
    )
    .unwrap();
    let resolved = resolve_schema(&schema, "Inventory", TypeLevel::Nested, &ctx).unwrap();
    assert_eq!(
        resolved.value,
        ResolvedType::Dictionary(Box::new(ResolvedType::Object("Widget".into())))
    );
    assert!(resolved.definitions.is_empty());
}

#[test]
fn broken_operation_is_dropped_alone() {
    let broken = STORE.replace(
        "          schema: {$ref: '#/definitions/Widget'}\n      responses:",
        "          schema: {$ref: 'Widget'}\n      responses:",
    );
    let doc = parse_swagger_document(&broken).unwrap();
    let sink = CollectingSink::new();
    let api = assemble_api("store", &doc, &ResolverConfig::default(), &sink);
    assert!(api.operation("createWidget").is_none());
    assert_eq!(api.operations.len(), 2);
    assert_eq!(sink.count(Severity::Error), 1);
}
