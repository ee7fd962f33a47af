//! Introspection results: parsing, validation and conversion to SDL
//!
//! An introspection result is the JSON a GraphQL server returns for the
//! standard introspection query. Files may hold it bare (`{"__schema": ...}`)
//! or wrapped in a response envelope (`{"data": {"__schema": ...}}`).
//!
//! Copyright (c) 2025 Gqlpoint Team
//! Licensed under the Apache-2.0 license

mod printer;

use crate::document::AstDocument;
use crate::error::{LoaderError, LoaderResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

pub use printer::print_schema;

/// Scalars every GraphQL schema provides
pub const BUILTIN_SCALARS: &[&str] = &["String", "Int", "Float", "Boolean", "ID"];

/// Directives every GraphQL schema provides
pub const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// Default reason carried by `@deprecated`
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// The standard introspection query, as sent to remote endpoints
pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// The `__schema` object of an introspection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub description: Option<String>,
    pub query_type: Option<NamedTypeRef>,
    #[serde(default)]
    pub mutation_type: Option<NamedTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<NamedTypeRef>,
    pub types: Vec<FullType>,
    #[serde(default)]
    pub directives: Vec<DirectiveDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTypeRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "specifiedByURL", alias = "specifiedByUrl")]
    pub specified_by_url: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
    #[serde(default)]
    pub input_fields: Option<Vec<InputValue>>,
    #[serde(default)]
    pub interfaces: Option<Vec<TypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<EnumValue>>,
    #[serde(default)]
    pub possible_types: Option<Vec<TypeRef>>,
}

/// A possibly wrapped reference to a named type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Name of the innermost named type, if the chain is complete
    pub fn named(&self) -> Option<&str> {
        match self.kind {
            TypeKind::List | TypeKind::NonNull => self.of_type.as_ref()?.named(),
            _ => self.name.as_deref(),
        }
    }

    /// Render as an SDL type reference (`[User!]!`)
    pub fn to_sdl(&self) -> Option<String> {
        match self.kind {
            TypeKind::NonNull => Some(format!("{}!", self.of_type.as_ref()?.to_sdl()?)),
            TypeKind::List => Some(format!("[{}]", self.of_type.as_ref()?.to_sdl()?)),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Default value as a GraphQL literal
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(default)]
    pub is_repeatable: bool,
}

/// Drop a leading byte order mark
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Parse introspection JSON text, unwrapping a `data` envelope when present
pub fn parse_introspection(content: &str, path: &Path) -> LoaderResult<IntrospectionSchema> {
    let content = strip_bom(content);
    if content.trim().is_empty() {
        return Err(LoaderError::empty_content(path));
    }

    let value: Value =
        serde_json::from_str(content).map_err(|e| LoaderError::json_parse_error(path, e))?;
    from_value(value, path)
}

/// Extract the `__schema` object from an already parsed JSON value
pub fn from_value(mut value: Value, path: &Path) -> LoaderResult<IntrospectionSchema> {
    if value.get("data").is_some_and(|data| !data.is_null()) {
        value = value["data"].take();
    }

    let schema = match value.get_mut("__schema") {
        Some(schema) if !schema.is_null() => schema.take(),
        _ => return Err(LoaderError::invalid_schema(path)),
    };

    serde_json::from_value(schema)
        .map_err(|e| LoaderError::incomplete_introspection(path, e.to_string()))
}

/// An introspection schema whose type references are known to resolve
#[derive(Debug, Clone)]
pub struct ClientSchema {
    schema: IntrospectionSchema,
}

impl ClientSchema {
    /// Validate an introspection schema so that it can be printed.
    pub fn build(schema: IntrospectionSchema, path: &Path) -> LoaderResult<Self> {
        let kinds: HashMap<&str, TypeKind> = schema
            .types
            .iter()
            .map(|t| (t.name.as_str(), t.kind))
            .collect();
        let fail = |reason: String| LoaderError::incomplete_introspection(path, reason);

        let query = schema
            .query_type
            .as_ref()
            .ok_or_else(|| fail("missing queryType".to_string()))?;
        let roots = [
            ("query", Some(query)),
            ("mutation", schema.mutation_type.as_ref()),
            ("subscription", schema.subscription_type.as_ref()),
        ];
        for (operation, root) in roots {
            let Some(root) = root else { continue };
            match kinds.get(root.name.as_str()) {
                Some(TypeKind::Object) => {}
                Some(other) => {
                    return Err(fail(format!(
                        "{} root type '{}' must be an OBJECT, found {:?}",
                        operation, root.name, other
                    )))
                }
                None => {
                    return Err(fail(format!(
                        "{} root type '{}' is not in the types list",
                        operation, root.name
                    )))
                }
            }
        }

        let check = |owner: &str, type_ref: &TypeRef| -> LoaderResult<()> {
            let name = type_ref
                .named()
                .ok_or_else(|| fail(format!("incomplete type reference in '{}'", owner)))?;
            if kinds.contains_key(name) || is_builtin_type(name) {
                Ok(())
            } else {
                Err(fail(format!("'{}' refers to unknown type '{}'", owner, name)))
            }
        };

        for ty in &schema.types {
            let missing = |member: &str| fail(format!("{:?} '{}' is missing {}", ty.kind, ty.name, member));
            match ty.kind {
                TypeKind::Object | TypeKind::Interface if ty.fields.is_none() => {
                    return Err(missing("fields"))
                }
                TypeKind::Union if ty.possible_types.is_none() => {
                    return Err(missing("possibleTypes"))
                }
                TypeKind::Enum if ty.enum_values.is_none() => return Err(missing("enumValues")),
                TypeKind::InputObject if ty.input_fields.is_none() => {
                    return Err(missing("inputFields"))
                }
                TypeKind::List | TypeKind::NonNull => {
                    return Err(fail(format!("wrapper kind {:?} used as a named type '{}'", ty.kind, ty.name)))
                }
                _ => {}
            }

            for field in ty.fields.iter().flatten() {
                let owner = format!("{}.{}", ty.name, field.name);
                check(&owner, &field.ty)?;
                for arg in &field.args {
                    check(&format!("{}({})", owner, arg.name), &arg.ty)?;
                }
            }
            for input in ty.input_fields.iter().flatten() {
                check(&format!("{}.{}", ty.name, input.name), &input.ty)?;
            }
            for member in ty.interfaces.iter().chain(ty.possible_types.iter()).flatten() {
                check(&ty.name, member)?;
            }
        }

        for directive in &schema.directives {
            for arg in &directive.args {
                check(&format!("@{}({})", directive.name, arg.name), &arg.ty)?;
            }
        }

        debug!(
            path = %path.display(),
            types = schema.types.len(),
            directives = schema.directives.len(),
            "Built client schema from introspection"
        );
        Ok(Self { schema })
    }

    pub fn schema(&self) -> &IntrospectionSchema {
        &self.schema
    }

    /// Names of every type that is neither a builtin scalar nor introspection machinery
    pub fn type_names(&self) -> BTreeSet<String> {
        self.schema
            .types
            .iter()
            .filter(|t| !is_builtin_type(&t.name))
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn to_sdl(&self) -> String {
        print_schema(self)
    }

    /// Print to SDL and parse the result back into a document
    pub fn to_document(&self, source_name: &str) -> LoaderResult<AstDocument> {
        AstDocument::parse(&self.to_sdl(), source_name)
    }
}

/// Builtin scalars and `__`-prefixed introspection types
pub fn is_builtin_type(name: &str) -> bool {
    name.starts_with("__") || BUILTIN_SCALARS.contains(&name)
}
