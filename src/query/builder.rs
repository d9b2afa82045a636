//! GraphQL document assembly

use super::fields::FieldSet;
use std::fmt::Write as _;

/// Scalar types used for filter variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphQLType {
    /// `Int`
    Int,
    /// `String`
    String,
    /// `Boolean`
    Boolean,
}

impl GraphQLType {
    /// GraphQL spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::String => "String",
            Self::Boolean => "Boolean",
        }
    }
}

/// Shape of a collection-valued query
///
/// ```text
/// query <operation>($limit: Int, $offset: Int, $<filter>: <Type>) {
///   <root>(limit: $limit, offset: $offset, <filter>: $<filter>) {
///     <total>
///     <records> { <fields> }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Operation name
    pub operation: &'static str,
    /// Root query field
    pub root_field: &'static str,
    /// Field holding the record list under the root
    pub records_field: &'static str,
    /// Field holding the total count under the root
    pub total_field: Option<&'static str>,
}

/// Assembles list queries with their variable declarations
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    shape: ListQuery,
    variables: Vec<(String, GraphQLType)>,
}

impl QueryBuilder {
    /// Start a builder for `shape`; `limit` and `offset` are always declared
    pub fn new(shape: ListQuery) -> Self {
        Self {
            shape,
            variables: vec![
                ("limit".to_string(), GraphQLType::Int),
                ("offset".to_string(), GraphQLType::Int),
            ],
        }
    }

    /// Declare a filter variable passed straight through to the root field
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, ty: GraphQLType) -> Self {
        let name = name.into();
        if !self.variables.iter().any(|(n, _)| *n == name) {
            self.variables.push((name, ty));
        }
        self
    }

    /// Render the document selecting `fields`
    pub fn build(&self, fields: &FieldSet) -> String {
        let declarations = self
            .variables
            .iter()
            .map(|(name, ty)| format!("${name}: {}", ty.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let arguments = self
            .variables
            .iter()
            .map(|(name, _)| format!("{name}: ${name}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut doc = String::new();
        let _ = writeln!(doc, "query {}({declarations}) {{", self.shape.operation);
        let _ = writeln!(doc, "  {}({arguments}) {{", self.shape.root_field);
        if let Some(total) = self.shape.total_field {
            let _ = writeln!(doc, "    {total}");
        }
        let _ = writeln!(doc, "    {} {{", self.shape.records_field);
        let _ = writeln!(doc, "{}", fields.projection(6));
        doc.push_str("    }\n  }\n}");
        doc
    }
}
