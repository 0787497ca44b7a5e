//! # Definition Errors
//!
//! Errors raised while *constructing* a descriptor. These indicate a
//! programming mistake in the schema declaration, not bad input data, so
//! they surface at definition time and never during validation.

use thiserror::Error;

/// A malformed descriptor declaration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// `Schema::union` was called with no members.
    #[error("a union must declare at least one member")]
    EmptyUnion,

    /// `Schema::intersect` was called with no members.
    #[error("an intersection must declare at least one member")]
    EmptyIntersection,

    /// The same field name was declared twice on one struct or object type.
    #[error("field '{field}' is declared more than once on {owner}")]
    DuplicateField {
        /// The repeated field name.
        field: String,
        /// The struct or object type being declared.
        owner: String,
    },

    /// A field was declared with an empty name.
    #[error("{owner} declares a field with an empty name")]
    EmptyFieldName {
        /// The struct or object type being declared.
        owner: String,
    },

    /// A named object type was declared with an empty name.
    #[error("object types must have a non-empty name")]
    EmptyTypeName,

    /// A float literal was NaN or infinite.
    #[error("literal {0} is not a finite number")]
    NonFiniteLiteral(f64),
}
