//! Parsed GraphQL documents, definition kinds and filter policies
//!
//! [`AstDocument`] wraps the definitions produced by the `apollo-compiler`
//! parser. It is the unit that loaders return, the aggregator concatenates and
//! the filter policy trims.

use crate::error::{LoaderError, LoaderResult};
use apollo_compiler::ast;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Category of a top-level definition, named after the GraphQL AST node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    OperationDefinition,
    FragmentDefinition,
    SchemaDefinition,
    ScalarTypeDefinition,
    ObjectTypeDefinition,
    InterfaceTypeDefinition,
    UnionTypeDefinition,
    EnumTypeDefinition,
    InputObjectTypeDefinition,
    DirectiveDefinition,
    SchemaExtension,
    ScalarTypeExtension,
    ObjectTypeExtension,
    InterfaceTypeExtension,
    UnionTypeExtension,
    EnumTypeExtension,
    InputObjectTypeExtension,
}

/// Executable definition kinds
pub const OPERATION_KINDS: &[Kind] = &[Kind::OperationDefinition, Kind::FragmentDefinition];

/// Every definition kind that is not executable
pub const NON_OPERATION_KINDS: &[Kind] = &[
    Kind::SchemaDefinition,
    Kind::ScalarTypeDefinition,
    Kind::ObjectTypeDefinition,
    Kind::InterfaceTypeDefinition,
    Kind::UnionTypeDefinition,
    Kind::EnumTypeDefinition,
    Kind::InputObjectTypeDefinition,
    Kind::DirectiveDefinition,
    Kind::SchemaExtension,
    Kind::ScalarTypeExtension,
    Kind::ObjectTypeExtension,
    Kind::InterfaceTypeExtension,
    Kind::UnionTypeExtension,
    Kind::EnumTypeExtension,
    Kind::InputObjectTypeExtension,
];

impl Kind {
    /// All kinds, executable ones first
    pub fn all() -> impl Iterator<Item = Kind> {
        OPERATION_KINDS
            .iter()
            .chain(NON_OPERATION_KINDS.iter())
            .copied()
    }

    /// Kind of a parsed definition
    pub fn of(definition: &ast::Definition) -> Self {
        use ast::Definition as D;
        match definition {
            D::OperationDefinition(_) => Kind::OperationDefinition,
            D::FragmentDefinition(_) => Kind::FragmentDefinition,
            D::DirectiveDefinition(_) => Kind::DirectiveDefinition,
            D::SchemaDefinition(_) => Kind::SchemaDefinition,
            D::ScalarTypeDefinition(_) => Kind::ScalarTypeDefinition,
            D::ObjectTypeDefinition(_) => Kind::ObjectTypeDefinition,
            D::InterfaceTypeDefinition(_) => Kind::InterfaceTypeDefinition,
            D::UnionTypeDefinition(_) => Kind::UnionTypeDefinition,
            D::EnumTypeDefinition(_) => Kind::EnumTypeDefinition,
            D::InputObjectTypeDefinition(_) => Kind::InputObjectTypeDefinition,
            D::SchemaExtension(_) => Kind::SchemaExtension,
            D::ScalarTypeExtension(_) => Kind::ScalarTypeExtension,
            D::ObjectTypeExtension(_) => Kind::ObjectTypeExtension,
            D::InterfaceTypeExtension(_) => Kind::InterfaceTypeExtension,
            D::UnionTypeExtension(_) => Kind::UnionTypeExtension,
            D::EnumTypeExtension(_) => Kind::EnumTypeExtension,
            D::InputObjectTypeExtension(_) => Kind::InputObjectTypeExtension,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::OperationDefinition => "OperationDefinition",
            Kind::FragmentDefinition => "FragmentDefinition",
            Kind::SchemaDefinition => "SchemaDefinition",
            Kind::ScalarTypeDefinition => "ScalarTypeDefinition",
            Kind::ObjectTypeDefinition => "ObjectTypeDefinition",
            Kind::InterfaceTypeDefinition => "InterfaceTypeDefinition",
            Kind::UnionTypeDefinition => "UnionTypeDefinition",
            Kind::EnumTypeDefinition => "EnumTypeDefinition",
            Kind::InputObjectTypeDefinition => "InputObjectTypeDefinition",
            Kind::DirectiveDefinition => "DirectiveDefinition",
            Kind::SchemaExtension => "SchemaExtension",
            Kind::ScalarTypeExtension => "ScalarTypeExtension",
            Kind::ObjectTypeExtension => "ObjectTypeExtension",
            Kind::InterfaceTypeExtension => "InterfaceTypeExtension",
            Kind::UnionTypeExtension => "UnionTypeExtension",
            Kind::EnumTypeExtension => "EnumTypeExtension",
            Kind::InputObjectTypeExtension => "InputObjectTypeExtension",
        }
    }

    /// Operations and fragments
    pub fn is_executable(&self) -> bool {
        OPERATION_KINDS.contains(self)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::all()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LoaderError::UnknownKind {
                name: s.to_string(),
            })
    }
}

/// Set of kinds whose definitions are removed from loaded documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    excluded: BTreeSet<Kind>,
}

impl FilterPolicy {
    /// Policy that keeps everything
    pub fn none() -> Self {
        Self::default()
    }

    pub fn excluding(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            excluded: kinds.into_iter().collect(),
        }
    }

    /// Drop operations and fragments, keeping the type system
    pub fn operations() -> Self {
        Self::excluding(OPERATION_KINDS.iter().copied())
    }

    /// Drop the type system, keeping operations and fragments
    pub fn non_operations() -> Self {
        Self::excluding(NON_OPERATION_KINDS.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn excludes(&self, kind: Kind) -> bool {
        self.excluded.contains(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.excluded.iter().copied()
    }
}

impl FromIterator<Kind> for FilterPolicy {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        Self::excluding(iter)
    }
}

impl fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.excluded.iter().map(Kind::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

/// Ordered sequence of top-level GraphQL definitions
#[derive(Debug, Clone, Default)]
pub struct AstDocument {
    definitions: Vec<ast::Definition>,
}

impl AstDocument {
    /// Parse GraphQL source text.
    ///
    /// Fails on any syntax error, and on input that contains no definitions
    /// at all: a loaded document always holds at least one definition.
    pub fn parse(source: &str, source_name: &str) -> LoaderResult<Self> {
        let document = ast::Document::parse(source, source_name).map_err(|invalid| {
            LoaderError::syntax_error(source_name, invalid.errors.to_string())
        })?;

        if document.definitions.is_empty() {
            return Err(LoaderError::empty_document(source_name));
        }

        Ok(Self {
            definitions: document.definitions,
        })
    }

    pub fn from_definitions(definitions: Vec<ast::Definition>) -> Self {
        Self { definitions }
    }

    /// Concatenate documents, preserving source order
    pub fn concat<'a>(documents: impl IntoIterator<Item = &'a AstDocument>) -> Self {
        let definitions = documents
            .into_iter()
            .flat_map(|document| document.definitions.iter().cloned())
            .collect();
        Self { definitions }
    }

    pub fn definitions(&self) -> &[ast::Definition] {
        &self.definitions
    }

    pub fn into_definitions(self) -> Vec<ast::Definition> {
        self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Kind of every definition, in order
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.definitions.iter().map(Kind::of)
    }

    /// New document without the definitions the policy excludes
    pub fn without_kinds(&self, policy: &FilterPolicy) -> Self {
        let definitions = self
            .definitions
            .iter()
            .filter(|definition| !policy.excludes(Kind::of(definition)))
            .cloned()
            .collect();
        Self { definitions }
    }

    /// Names of named definitions, in order
    pub fn defined_names(&self) -> Vec<&str> {
        self.definitions.iter().filter_map(definition_name).collect()
    }

    /// Names of the type definitions (not extensions) in this document
    pub fn type_names(&self) -> BTreeSet<String> {
        self.definitions
            .iter()
            .filter(|definition| {
                matches!(
                    Kind::of(definition),
                    Kind::ScalarTypeDefinition
                        | Kind::ObjectTypeDefinition
                        | Kind::InterfaceTypeDefinition
                        | Kind::UnionTypeDefinition
                        | Kind::EnumTypeDefinition
                        | Kind::InputObjectTypeDefinition
                )
            })
            .filter_map(definition_name)
            .map(str::to_string)
            .collect()
    }

    /// Print the document back to SDL text
    pub fn to_sdl(&self) -> String {
        let mut document = ast::Document::new();
        document.definitions = self.definitions.clone();
        document.to_string()
    }
}

impl fmt::Display for AstDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sdl())
    }
}

fn definition_name(definition: &ast::Definition) -> Option<&str> {
    use ast::Definition as D;
    match definition {
        D::OperationDefinition(def) => def.name.as_ref().map(|name| name.as_str()),
        D::FragmentDefinition(def) => Some(def.name.as_str()),
        D::DirectiveDefinition(def) => Some(def.name.as_str()),
        D::SchemaDefinition(_) | D::SchemaExtension(_) => None,
        D::ScalarTypeDefinition(def) => Some(def.name.as_str()),
        D::ObjectTypeDefinition(def) => Some(def.name.as_str()),
        D::InterfaceTypeDefinition(def) => Some(def.name.as_str()),
        D::UnionTypeDefinition(def) => Some(def.name.as_str()),
        D::EnumTypeDefinition(def) => Some(def.name.as_str()),
        D::InputObjectTypeDefinition(def) => Some(def.name.as_str()),
        D::ScalarTypeExtension(def) => Some(def.name.as_str()),
        D::ObjectTypeExtension(def) => Some(def.name.as_str()),
        D::InterfaceTypeExtension(def) => Some(def.name.as_str()),
        D::UnionTypeExtension(def) => Some(def.name.as_str()),
        D::EnumTypeExtension(def) => Some(def.name.as_str()),
        D::InputObjectTypeExtension(def) => Some(def.name.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = r#"
        scalar Date
        type User { id: ID! name: String }
        query GetUser { user { id } }
        fragment UserParts on User { name }
    "#;

    #[test]
    fn test_parse_kinds_in_order() {
        let document = AstDocument::parse(MIXED, "mixed.graphql").unwrap();
        let kinds: Vec<Kind> = document.kinds().collect();
        assert_eq!(
            kinds,
            vec![
                Kind::ScalarTypeDefinition,
                Kind::ObjectTypeDefinition,
                Kind::OperationDefinition,
                Kind::FragmentDefinition,
            ]
        );
        assert_eq!(document.defined_names(), vec!["Date", "User", "GetUser", "UserParts"]);
    }

    #[test]
    fn test_parse_rejects_empty_and_invalid() {
        assert!(AstDocument::parse("   # only a comment\n", "empty.graphql").is_err());
        assert!(matches!(
            AstDocument::parse("type User {", "broken.graphql"),
            Err(LoaderError::SyntaxError { .. })
        ));
    }

    #[test]
    fn test_without_kinds_preserves_order_and_source() {
        let document = AstDocument::parse(MIXED, "mixed.graphql").unwrap();

        let schema_only = document.without_kinds(&FilterPolicy::operations());
        assert_eq!(schema_only.defined_names(), vec!["Date", "User"]);

        let operations_only = document.without_kinds(&FilterPolicy::non_operations());
        assert_eq!(operations_only.defined_names(), vec!["GetUser", "UserParts"]);

        // source document untouched
        assert_eq!(document.len(), 4);
    }

    #[test]
    fn test_concat() {
        let a = AstDocument::parse("type A { id: ID }", "a.graphql").unwrap();
        let b = AstDocument::parse("type B { id: ID } scalar C", "b.graphql").unwrap();
        let merged = AstDocument::concat([&a, &b]);
        assert_eq!(merged.defined_names(), vec!["A", "B", "C"]);
        assert!(AstDocument::concat(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_sdl_reparses_to_same_names() {
        let document = AstDocument::parse(MIXED, "mixed.graphql").unwrap();
        let reparsed = AstDocument::parse(&document.to_sdl(), "printed.graphql").unwrap();
        assert_eq!(reparsed.defined_names(), document.defined_names());
        assert_eq!(
            reparsed.type_names(),
            ["Date", "User"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "OperationDefinition".parse::<Kind>().unwrap(),
            Kind::OperationDefinition
        );
        assert_eq!(
            "objecttypedefinition".parse::<Kind>().unwrap(),
            Kind::ObjectTypeDefinition
        );
        assert!("Field".parse::<Kind>().is_err());
        assert_eq!(Kind::all().count(), 17);
    }

    #[test]
    fn test_filter_policy_display() {
        let policy = FilterPolicy::operations();
        assert_eq!(policy.to_string(), "OperationDefinition, FragmentDefinition");
        assert!(FilterPolicy::none().is_empty());
        assert!(policy.excludes(Kind::FragmentDefinition));
        assert!(!policy.excludes(Kind::ScalarTypeDefinition));
    }
}
