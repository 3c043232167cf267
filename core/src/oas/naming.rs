#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Deterministic, collision-free identifiers derived from names found in a
//! Swagger document. Every type name, property name and function name goes
//! through this module so the same input always yields the same identifier.
//!
//! All reserved words live in one place: [`RESERVED_WORDS`] for member and
//! parameter identifiers, [`RESERVED_TYPE_NAMES`] for type names that would
//! shadow a built-in metatype.

use heck::ToLowerCamelCase;
use regex::Regex;
use std::sync::OnceLock;

/// Identifiers that cannot be used verbatim as properties or parameters.
pub const RESERVED_WORDS: &[&str] = &[
    "as",
    "associatedtype",
    "break",
    "case",
    "catch",
    "class",
    "continue",
    "default",
    "defer",
    "deinit",
    "do",
    "else",
    "enum",
    "extension",
    "fallthrough",
    "false",
    "fileprivate",
    "for",
    "func",
    "guard",
    "if",
    "import",
    "in",
    "init",
    "inout",
    "internal",
    "is",
    "let",
    "nil",
    "operator",
    "private",
    "protocol",
    "public",
    "repeat",
    "rethrows",
    "return",
    "self",
    "static",
    "struct",
    "subscript",
    "super",
    "switch",
    "throw",
    "throws",
    "true",
    "try",
    "typealias",
    "var",
    "where",
    "while",
];

/// Type names that collide with the generated type's own metatype.
pub const RESERVED_TYPE_NAMES: &[&str] = &["Type", "Self", "Protocol"];

/// Prefix applied to a name found in [`RESERVED_TYPE_NAMES`].
const TYPE_COLLISION_PREFIX: &str = "Type";

fn separator_regex() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("Invalid regex constant"))
}

/// Splits a raw name on anything that is not a letter or digit
/// (`_`, `-`, `.`, `/`, `{`, spaces, ...).
pub fn segments(raw: &str) -> Vec<&str> {
    separator_regex()
        .split(raw)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Upper-cases the first character, folding all-caps words (`ID`, `USER`)
/// to title case first.
fn capitalize_segment(segment: &str) -> String {
    let letters = segment.chars().filter(|c| c.is_alphabetic()).count();
    let all_caps = letters > 1
        && segment
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase);
    let folded = if all_caps {
        segment.to_lowercase()
    } else {
        segment.to_string()
    };

    let mut chars = folded.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_segments(raw: &str) -> String {
    segments(raw).into_iter().map(capitalize_segment).collect()
}

fn avoid_type_collision(name: String) -> String {
    if RESERVED_TYPE_NAMES.contains(&name.as_str()) {
        format!("{}{}", TYPE_COLLISION_PREFIX, name)
    } else {
        name
    }
}

/// Normalizes a raw name into a type name.
///
/// - splits on underscores, dashes and other separators,
/// - folds all-caps segments (`USER_ID` -> `UserId`),
/// - capitalizes every segment,
/// - prefixes names that start with a digit or shadow a metatype with `Type`.
///
/// The function is idempotent: `normalize_type_name(normalize_type_name(x))`
/// equals `normalize_type_name(x)`.
pub fn normalize_type_name(raw: &str) -> String {
    // Joining single letters can yield an all-caps word (`x-y-z` -> `XYZ`),
    // which must be folded too or a second pass would change it.
    let joined = capitalize_segment(&join_segments(raw));
    if joined.is_empty() {
        return "Unnamed".to_string();
    }
    if joined.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("{}{}", TYPE_COLLISION_PREFIX, joined);
    }
    avoid_type_collision(joined)
}

/// Name of an inline type nested under `prefix`, e.g. the enum of property
/// `status` inside `Order` becomes `OrderStatus`.
///
/// A component that would shadow a metatype (a property literally named
/// `type`) is prefixed, so `Pet` + `type` becomes `PetTypeType`.
pub fn nested_type_name(prefix: &str, component: &str) -> String {
    let component = avoid_type_collision(join_segments(component));
    normalize_type_name(&format!("{}{}", normalize_type_name(prefix), component))
}

fn lower_camel(raw: &str) -> String {
    let camel = raw.to_lower_camel_case();
    if camel.is_empty() {
        "value".to_string()
    } else if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", camel)
    } else {
        camel
    }
}

/// Whether `ident` is in [`RESERVED_WORDS`].
pub fn is_reserved_word(ident: &str) -> bool {
    RESERVED_WORDS.contains(&ident)
}

/// Property identifier for a source name; reserved words are backtick-escaped.
pub fn safe_property_name(raw: &str) -> String {
    let ident = lower_camel(raw);
    if is_reserved_word(&ident) {
        format!("`{}`", ident)
    } else {
        ident
    }
}

/// Parameter identifier for a source name; reserved words get a trailing `_`
/// so that the result is usable as a plain local binding.
pub fn safe_parameter_name(raw: &str) -> String {
    let ident = lower_camel(raw);
    if is_reserved_word(&ident) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Field name of a header: strips the `X-`/`x-` prefix, then camel-cases.
///
/// `X-Request-Id` -> `requestId`.
pub fn header_field_name(header: &str) -> String {
    let stripped = header
        .strip_prefix("X-")
        .or_else(|| header.strip_prefix("x-"))
        .unwrap_or(header);
    lower_camel(stripped)
}

/// Whether two header names map to the same field (case-insensitive).
pub fn same_header(a: &str, b: &str) -> bool {
    header_field_name(a).eq_ignore_ascii_case(&header_field_name(b))
}

/// Derives a function name from `operationId`, or from the verb and path
/// when the document has none.
///
/// e.g. `GET /users/{id}` -> `getUsersId`
pub fn function_name(operation_id: Option<&str>, method: &str, path: &str) -> String {
    let base = match operation_id {
        Some(id) if !segments(id).is_empty() => lower_camel(id),
        _ => lower_camel(&format!("{} {}", method.to_lowercase(), path)),
    };
    if is_reserved_word(&base) {
        format!("{}_", base)
    } else {
        base
    }
}

/// Type name prefix of an operation (`getUser` -> `GetUser`).
pub fn operation_type_name(function_name: &str) -> String {
    normalize_type_name(function_name)
}

/// Type name fragment of a path template (`/users/{id}` -> `UsersId`).
pub fn normalize_service_path(path: &str) -> String {
    if segments(path).is_empty() {
        "Root".to_string()
    } else {
        normalize_type_name(path)
    }
}

/// Case identifier for a response status code (`200` -> `ok`).
pub fn status_case_name(status_code: &str) -> String {
    let known = match status_code {
        "200" => "ok",
        "201" => "created",
        "202" => "accepted",
        "203" => "nonAuthoritativeInformation",
        "204" => "noContent",
        "205" => "resetContent",
        "206" => "partialContent",
        "300" => "multipleChoices",
        "301" => "movedPermanently",
        "302" => "found",
        "304" => "notModified",
        "400" => "badRequest",
        "401" => "unauthorized",
        "402" => "paymentRequired",
        "403" => "forbidden",
        "404" => "notFound",
        "405" => "methodNotAllowed",
        "406" => "notAcceptable",
        "408" => "requestTimeout",
        "409" => "conflict",
        "410" => "gone",
        "412" => "preconditionFailed",
        "413" => "payloadTooLarge",
        "415" => "unsupportedMediaType",
        "422" => "unprocessableEntity",
        "423" => "locked",
        "428" => "preconditionRequired",
        "429" => "tooManyRequests",
        "500" => "internalServerError",
        "501" => "notImplemented",
        "502" => "badGateway",
        "503" => "serviceUnavailable",
        "504" => "gatewayTimeout",
        "default" => "unexpected",
        _ => "",
    };
    if known.is_empty() {
        format!("status{}", join_segments(status_code))
    } else {
        known.to_string()
    }
}

/// Sort key for status codes: numeric codes ascending, ranges after their
/// codes, `default` last.
pub fn status_sort_key(status_code: &str) -> (u16, String) {
    match status_code.parse::<u16>() {
        Ok(code) => (code, String::new()),
        Err(_) if status_code == "default" => (u16::MAX, String::new()),
        Err(_) => {
            let hundreds = status_code
                .chars()
                .next()
                .and_then(|c| c.to_digit(10))
                .map(|d| d as u16 * 100 + 99)
                .unwrap_or(u16::MAX - 1);
            (hundreds, status_code.to_ascii_uppercase())
        }
    }
}
