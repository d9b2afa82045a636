//! GraphQL query assembly
//!
//! Field projections are built from user-selected field tokens, which may
//! contain UI sentinel markers. Markers are parsed into [`FieldToken`]
//! variants and dropped before a document is assembled.

mod builder;
mod fields;

pub use builder::{GraphQLType, ListQuery, QueryBuilder};
pub use fields::{FieldSet, FieldToken};
