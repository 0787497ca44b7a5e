//! # shape-validate — Validation Engine
//!
//! Walks untyped values (`serde_json::Value`) against `shape-core`
//! descriptors. The result is either the canonical projection of the input
//! (undeclared keys dropped, primitives coerced when the policy allows) or
//! a non-empty list of path-annotated errors.
//!
//! ## Policies
//!
//! There is one structural traversal. How primitive and literal leaves
//! accept values is decided by a [`LeafPolicy`]:
//!
//! - [`StrictPolicy`] accepts values of exactly the declared kind.
//! - [`NonStrictPolicy`] additionally parses numeric strings and the
//!   `"true"`/`"false"` tokens, and truncates numbers for `Int`.
//!
//! Callers may implement [`LeafPolicy`] themselves and pass it to
//! [`create_validator`].
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use shape_core::Schema;
//! use shape_validate::{create_non_strict_validator, create_strict_validator};
//!
//! let schema = Schema::structure()
//!     .field("a", Schema::Number)
//!     .field("b", Schema::Int)
//!     .build()
//!     .unwrap();
//!
//! let input = json!({ "a": "1", "b": "1.1", "c": true });
//! assert_eq!(
//!     create_non_strict_validator(&schema).validate(&input).unwrap(),
//!     json!({ "a": 1, "b": 1 })
//! );
//!
//! let errors = create_strict_validator(&schema).validate(&input).unwrap_err();
//! assert_eq!(errors.first().to_string(), "/a: expected number, found string");
//! ```
//!
//! ## Crate Policy
//!
//! - Validation never panics and never modifies its input.
//! - No subscriber is installed; rejections are logged at `debug` through
//!   `tracing` for the host to collect.

mod coerce;
mod engine;
pub mod error;
pub mod options;
pub mod policy;
pub mod validator;

pub use error::{
    value_kind, ErrorKind, Path, PathSegment, TypedValidationError, ValidationError,
    ValidationErrors,
};
pub use options::{ErrorMode, OptionsError, PolicyKind, ValidatorOptions, DEFAULT_MAX_DEPTH};
pub use policy::{LeafPolicy, LeafResult, NonStrictPolicy, StrictPolicy};
pub use validator::{
    create_non_strict_validator, create_strict_validator, create_validator, ValidationResult,
    Validator,
};
