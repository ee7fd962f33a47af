//! SDL printer for client schemas

use super::{
    is_builtin_type, ClientSchema, DirectiveDef, EnumValue, Field, FullType, InputValue, TypeKind,
    BUILTIN_DIRECTIVES, DEFAULT_DEPRECATION_REASON,
};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Print a client schema as SDL.
///
/// Builtin scalars, introspection types and builtin directives are left out.
/// A `schema` block is printed only when the root types do not use the
/// conventional names.
pub fn print_schema(client: &ClientSchema) -> String {
    let schema = client.schema();
    let mut blocks = Vec::new();

    if let Some(block) = print_schema_definition(client) {
        blocks.push(block);
    }

    blocks.extend(
        schema
            .directives
            .iter()
            .filter(|d| !BUILTIN_DIRECTIVES.contains(&d.name.as_str()))
            .map(print_directive),
    );

    blocks.extend(
        schema
            .types
            .iter()
            .filter(|t| !is_builtin_type(&t.name))
            .map(print_type),
    );

    let mut sdl = blocks.join("\n\n");
    sdl.push('\n');
    sdl
}

fn print_schema_definition(client: &ClientSchema) -> Option<String> {
    let schema = client.schema();
    let query = schema.query_type.as_ref().map(|t| t.name.as_str());
    let mutation = schema.mutation_type.as_ref().map(|t| t.name.as_str());
    let subscription = schema.subscription_type.as_ref().map(|t| t.name.as_str());

    let conventional = query.map_or(true, |n| n == "Query")
        && mutation.map_or(true, |n| n == "Mutation")
        && subscription.map_or(true, |n| n == "Subscription");
    if conventional && schema.description.is_none() {
        return None;
    }

    let mut out = description(schema.description.as_deref(), "");
    out.push_str("schema {\n");
    for (operation, name) in [("query", query), ("mutation", mutation), ("subscription", subscription)] {
        if let Some(name) = name {
            let _ = writeln!(out, "{}{}: {}", INDENT, operation, name);
        }
    }
    out.push('}');
    Some(out)
}

fn print_directive(directive: &DirectiveDef) -> String {
    let mut out = description(directive.description.as_deref(), "");
    let _ = write!(out, "directive @{}{}", directive.name, print_args(&directive.args, ""));
    if directive.is_repeatable {
        out.push_str(" repeatable");
    }
    let _ = write!(out, " on {}", directive.locations.join(" | "));
    out
}

fn print_type(ty: &FullType) -> String {
    let mut out = description(ty.description.as_deref(), "");
    match ty.kind {
        TypeKind::Scalar => {
            let _ = write!(out, "scalar {}", ty.name);
            if let Some(url) = &ty.specified_by_url {
                let _ = write!(out, " @specifiedBy(url: {})", quote(url));
            }
        }
        TypeKind::Object | TypeKind::Interface => {
            let keyword = if ty.kind == TypeKind::Object { "type" } else { "interface" };
            let _ = write!(out, "{} {}", keyword, ty.name);
            let interfaces: Vec<String> = ty
                .interfaces
                .iter()
                .flatten()
                .filter_map(|i| i.named().map(str::to_string))
                .collect();
            if !interfaces.is_empty() {
                let _ = write!(out, " implements {}", interfaces.join(" & "));
            }
            let fields: Vec<String> = ty.fields.iter().flatten().map(print_field).collect();
            out.push_str(&print_block(&fields));
        }
        TypeKind::Union => {
            let _ = write!(out, "union {}", ty.name);
            let members: Vec<&str> = ty
                .possible_types
                .iter()
                .flatten()
                .filter_map(|t| t.named())
                .collect();
            if !members.is_empty() {
                let _ = write!(out, " = {}", members.join(" | "));
            }
        }
        TypeKind::Enum => {
            let _ = write!(out, "enum {}", ty.name);
            let values: Vec<String> = ty.enum_values.iter().flatten().map(print_enum_value).collect();
            out.push_str(&print_block(&values));
        }
        TypeKind::InputObject => {
            let _ = write!(out, "input {}", ty.name);
            let fields: Vec<String> = ty
                .input_fields
                .iter()
                .flatten()
                .map(|f| {
                    format!(
                        "{}{}{}",
                        description(f.description.as_deref(), INDENT),
                        INDENT,
                        print_input_value(f)
                    )
                })
                .collect();
            out.push_str(&print_block(&fields));
        }
        // rejected when the client schema is built
        TypeKind::List | TypeKind::NonNull => {}
    }
    out
}

fn print_block(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from(" {\n");
    // items carry their own indent
    for item in items {
        out.push_str(item);
        out.push('\n');
    }
    out.push('}');
    out
}

fn print_field(field: &Field) -> String {
    let mut out = description(field.description.as_deref(), INDENT);
    let _ = write!(
        out,
        "{}{}{}: {}",
        INDENT,
        field.name,
        print_args(&field.args, INDENT),
        field.ty.to_sdl().unwrap_or_default()
    );
    out.push_str(&deprecated(field.is_deprecated, field.deprecation_reason.as_deref()));
    out
}

fn print_enum_value(value: &EnumValue) -> String {
    let mut out = description(value.description.as_deref(), INDENT);
    let _ = write!(out, "{}{}", INDENT, value.name);
    out.push_str(&deprecated(value.is_deprecated, value.deprecation_reason.as_deref()));
    out
}

fn print_args(args: &[InputValue], indent: &str) -> String {
    if args.is_empty() {
        return String::new();
    }
    if args.iter().all(|a| a.description.is_none()) {
        let inline: Vec<String> = args.iter().map(print_input_value).collect();
        return format!("({})", inline.join(", "));
    }

    let inner = format!("{}{}", indent, INDENT);
    let mut out = String::from("(\n");
    for arg in args {
        out.push_str(&description(arg.description.as_deref(), &inner));
        let _ = writeln!(out, "{}{}", inner, print_input_value(arg));
    }
    let _ = write!(out, "{})", indent);
    out
}

fn print_input_value(value: &InputValue) -> String {
    let mut out = format!("{}: {}", value.name, value.ty.to_sdl().unwrap_or_default());
    if let Some(default) = &value.default_value {
        let _ = write!(out, " = {}", default);
    }
    out.push_str(&deprecated(value.is_deprecated, value.deprecation_reason.as_deref()));
    out
}

fn deprecated(is_deprecated: bool, reason: Option<&str>) -> String {
    if !is_deprecated {
        return String::new();
    }
    match reason {
        Some(reason) if reason != DEFAULT_DEPRECATION_REASON => {
            format!(" @deprecated(reason: {})", quote(reason))
        }
        _ => " @deprecated".to_string(),
    }
}

/// Block string description followed by a newline, or nothing.
///
/// Leading blank lines and a trailing newline do not survive a reparse,
/// since block strings strip them.
fn description(text: Option<&str>, indent: &str) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return String::new();
    };
    let escaped = text.replace("\"\"\"", "\\\"\"\"");

    let single_line = !escaped.contains('\n')
        && escaped.len() <= 70
        && !escaped.ends_with('"')
        && !escaped.ends_with('\\');
    if single_line {
        return format!("{}\"\"\"{}\"\"\"\n", indent, escaped);
    }

    let mut out = format!("{}\"\"\"\n", indent);
    for line in escaped.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{}{}", indent, line);
        }
    }
    let _ = writeln!(out, "{}\"\"\"", indent);
    out
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::super::{from_value, ClientSchema};
    use crate::document::{AstDocument, Kind};
    use serde_json::{json, Value};
    use std::path::Path;

    fn scalar(name: &str) -> Value {
        json!({ "kind": "SCALAR", "name": name, "ofType": null })
    }

    fn build(schema: Value) -> ClientSchema {
        let path = Path::new("schema.json");
        ClientSchema::build(from_value(json!({ "__schema": schema }), path).unwrap(), path).unwrap()
    }

    fn rich() -> Value {
        json!({
            "queryType": { "name": "Root" },
            "mutationType": null,
            "subscriptionType": null,
            "types": [
                {
                    "kind": "OBJECT",
                    "name": "Root",
                    "description": "Entry point",
                    "fields": [
                        {
                            "name": "posts",
                            "description": "All posts\nnewest first",
                            "args": [{ "name": "first", "type": scalar("Int"), "defaultValue": "10" }],
                            "type": { "kind": "LIST", "name": null, "ofType": { "kind": "OBJECT", "name": "Post", "ofType": null } },
                            "isDeprecated": false
                        },
                        {
                            "name": "legacy",
                            "args": [],
                            "type": scalar("String"),
                            "isDeprecated": true,
                            "deprecationReason": "Use posts"
                        },
                        {
                            "name": "old",
                            "args": [],
                            "type": scalar("String"),
                            "isDeprecated": true,
                            "deprecationReason": "No longer supported"
                        }
                    ],
                    "interfaces": []
                },
                {
                    "kind": "OBJECT",
                    "name": "Post",
                    "fields": [
                        { "name": "id", "args": [], "type": scalar("ID"), "isDeprecated": false },
                        { "name": "at", "args": [], "type": scalar("DateTime"), "isDeprecated": false },
                        { "name": "state", "args": [], "type": { "kind": "ENUM", "name": "State", "ofType": null }, "isDeprecated": false }
                    ],
                    "interfaces": [{ "kind": "INTERFACE", "name": "Node", "ofType": null }]
                },
                {
                    "kind": "INTERFACE",
                    "name": "Node",
                    "fields": [{ "name": "id", "args": [], "type": scalar("ID"), "isDeprecated": false }],
                    "possibleTypes": [{ "kind": "OBJECT", "name": "Post", "ofType": null }]
                },
                { "kind": "SCALAR", "name": "DateTime", "specifiedByURL": "https://tools.ietf.org/html/rfc3339" },
                {
                    "kind": "ENUM",
                    "name": "State",
                    "enumValues": [
                        { "name": "DRAFT", "isDeprecated": false },
                        { "name": "LIVE", "isDeprecated": false }
                    ]
                },
                {
                    "kind": "UNION",
                    "name": "Anything",
                    "possibleTypes": [{ "kind": "OBJECT", "name": "Post", "ofType": null }]
                },
                {
                    "kind": "INPUT_OBJECT",
                    "name": "PostFilter",
                    "inputFields": [{ "name": "state", "description": "Only this state", "type": { "kind": "ENUM", "name": "State", "ofType": null }, "defaultValue": "LIVE" }]
                },
                { "kind": "SCALAR", "name": "ID" },
                { "kind": "SCALAR", "name": "Int" },
                { "kind": "SCALAR", "name": "String" }
            ],
            "directives": [
                { "name": "include", "locations": ["FIELD"], "args": [{ "name": "if", "type": { "kind": "NON_NULL", "name": null, "ofType": scalar("Boolean") } }] },
                { "name": "cached", "description": "Cache hint", "locations": ["FIELD_DEFINITION", "OBJECT"], "args": [{ "name": "ttl", "type": scalar("Int"), "defaultValue": "60" }], "isRepeatable": true }
            ]
        })
    }

    #[test]
    fn test_print_rich_schema() {
        let sdl = build(rich()).to_sdl();

        assert!(sdl.starts_with("schema {\n  query: Root\n}"));
        assert!(sdl.contains("\"\"\"Cache hint\"\"\"\ndirective @cached(ttl: Int = 60) repeatable on FIELD_DEFINITION | OBJECT"));
        assert!(!sdl.contains("directive @include"));
        assert!(sdl.contains("scalar DateTime @specifiedBy(url: \"https://tools.ietf.org/html/rfc3339\")"));
        assert!(sdl.contains("type Post implements Node {"));
        assert!(sdl.contains("  legacy: String @deprecated(reason: \"Use posts\")"));
        assert!(sdl.contains("  old: String @deprecated\n"));
        assert!(sdl.contains("  posts(first: Int = 10): [Post]"));
        assert!(sdl.contains("union Anything = Post"));
        assert!(sdl.contains("  state: State = LIVE"));
        assert!(!sdl.contains("scalar ID"));
    }

    #[test]
    fn test_printed_sdl_reparses() {
        let client = build(rich());
        let document = client.to_document("schema.json").unwrap();
        assert_eq!(document.type_names(), client.type_names());

        let kinds: Vec<Kind> = document.kinds().collect();
        assert_eq!(kinds[0], Kind::SchemaDefinition);
        assert_eq!(kinds[1], Kind::DirectiveDefinition);
        assert!(AstDocument::parse(&document.to_sdl(), "again").is_ok());
    }

    #[test]
    fn test_description_edge_lines() {
        let schema = json!({
            "queryType": { "name": "Query" },
            "types": [
                {
                    "kind": "OBJECT",
                    "name": "Query",
                    "description": "\nLeading blank\nand trailing newline\n",
                    "fields": [{ "name": "ok", "args": [], "type": scalar("Boolean"), "isDeprecated": false }],
                    "interfaces": []
                }
            ]
        });
        let client = build(schema);
        let sdl = client.to_sdl();
        assert!(sdl.starts_with("\"\"\"\n\nLeading blank\nand trailing newline\n\"\"\"\ntype Query {"));

        let document = client.to_document("schema.json").unwrap();
        let reprinted = document.to_sdl();
        assert!(reprinted.contains("Leading blank"));
        assert!(!reprinted.contains("\"\"\"\n\n"));
    }

    #[test]
    fn test_conventional_roots_have_no_schema_block() {
        let schema = json!({
            "queryType": { "name": "Query" },
            "types": [
                { "kind": "OBJECT", "name": "Query", "fields": [{ "name": "ok", "args": [], "type": scalar("Boolean"), "isDeprecated": false }], "interfaces": [] }
            ]
        });
        let sdl = build(schema).to_sdl();
        assert_eq!(sdl, "type Query {\n  ok: Boolean\n}\n");
    }
}
