//! # Validation Errors
//!
//! Every rejection is a value: a [`ValidationError`] carrying the path from
//! the root of the input to the offending node and an [`ErrorKind`] whose
//! `Display` is the human-readable message. A validation call returns a
//! non-empty [`ValidationErrors`] collection in document order.
//!
//! Errors hold no reference into the descriptor graph; they own their data
//! and can outlive the validator that produced them.

use std::fmt;

use serde_json::Value;
use shape_core::Literal;
use thiserror::Error;

/// One step from a container to a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field name or record key.
    Key(String),
    /// A list index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value inside the validated input.
///
/// Renders as a JSON Pointer (`/struct0/b`, `/d/2`), or `(root)` for the
/// input itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// The segments from the root, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path as a JSON Pointer, usable with [`Value::pointer`].
    /// The root is the empty string.
    pub fn to_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|segment| format!("/{segment}"))
            .collect()
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.to_pointer())
        }
    }
}

/// Why a value was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The value's kind does not match a primitive descriptor.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// What the descriptor requires.
        expected: &'static str,
        /// What the value is.
        found: &'static str,
    },

    /// The value is not the container a struct, record or list requires.
    #[error("expected {expected}, found {found}")]
    ShapeMismatch {
        /// `"object"` or `"list"`.
        expected: &'static str,
        /// What the value is.
        found: &'static str,
    },

    /// A required field is absent.
    #[error("missing required field '{field}'")]
    MissingField {
        /// The absent field.
        field: String,
    },

    /// No union member accepted the value.
    #[error("value matches no member of {expected}")]
    NoUnionMemberMatched {
        /// The union, rendered as a type expression.
        expected: String,
        /// The first error of each member, in declared order.
        attempts: Vec<ValidationError>,
    },

    /// An intersection member rejected the value.
    #[error("intersection member #{member} rejected the value: {}", .causes.first())]
    IntersectMemberFailed {
        /// Zero-based index of the failing member.
        member: usize,
        /// The member's own errors.
        causes: ValidationErrors,
    },

    /// The value differs from the required literal.
    #[error("expected literal {expected}, found {found}")]
    LiteralMismatch {
        /// The required constant.
        expected: Literal,
        /// A short rendering of the value.
        found: String,
    },

    /// Non-strict coercion could not parse a string.
    #[error("cannot coerce {input:?} to {target}")]
    CoercionFailed {
        /// The primitive the string was coerced towards.
        target: &'static str,
        /// The rejected text.
        input: String,
    },

    /// Two intersection members produced different values for one location.
    #[error("intersection member #{member} disagrees with an earlier member")]
    IntersectConflict {
        /// Zero-based index of the disagreeing member.
        member: usize,
    },

    /// The input nests deeper than the configured limit.
    #[error("value nests deeper than {limit} levels")]
    DepthExceeded {
        /// The configured `max_depth`.
        limit: usize,
    },

    /// A deferred reference could not be resolved.
    #[error("deferred reference does not resolve to a descriptor")]
    UnresolvedReference,

    /// Deferred references led back to themselves without consuming input.
    #[error("deferred references cycle without descending into the value")]
    CyclicReference,
}

impl ErrorKind {
    /// Build a `TypeMismatch` for `value`.
    pub fn type_mismatch(expected: &'static str, value: &Value) -> Self {
        ErrorKind::TypeMismatch {
            expected,
            found: value_kind(value),
        }
    }

    /// Build a `ShapeMismatch` for `value`.
    pub fn shape_mismatch(expected: &'static str, value: &Value) -> Self {
        ErrorKind::ShapeMismatch {
            expected,
            found: value_kind(value),
        }
    }
}

/// A single rejection with its location.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {kind}")]
pub struct ValidationError {
    path: Path,
    kind: ErrorKind,
}

impl ValidationError {
    /// Create an error at `path`.
    pub fn new(path: Path, kind: ErrorKind) -> Self {
        Self { path, kind }
    }

    /// Where the rejected value sits in the input.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why it was rejected.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The human-readable message, without the path.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// The errors of one validation call, in document order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    first: Box<ValidationError>,
    rest: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Wrap a single error.
    pub fn new(error: ValidationError) -> Self {
        Self {
            first: Box::new(error),
            rest: Vec::new(),
        }
    }

    /// The first error in document order.
    pub fn first(&self) -> &ValidationError {
        &self.first
    }

    /// Number of errors (at least one).
    pub fn count(&self) -> usize {
        1 + self.rest.len()
    }

    /// Iterate all errors in document order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        std::iter::once(self.first.as_ref()).chain(self.rest.iter())
    }

    /// Append another batch, keeping order.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.rest.push(*other.first);
        self.rest.extend(other.rest);
    }

    /// Consumes self and returns the errors as a Vec.
    pub fn into_vec(self) -> Vec<ValidationError> {
        let mut errors = Vec::with_capacity(self.count());
        errors.push(*self.first);
        errors.extend(self.rest);
        errors
    }

    /// Message of the first error.
    pub fn message(&self) -> String {
        self.first.message()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::new(error)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure of [`Validator::validate_into`](crate::Validator::validate_into).
#[derive(Error, Debug)]
pub enum TypedValidationError {
    /// The value does not conform to the descriptor.
    #[error("value rejected:\n{0}")]
    Rejected(#[from] ValidationErrors),

    /// The pruned value does not deserialize into the requested Rust type.
    #[error("validated value does not fit the target type: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// The kind of a JSON value, as used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Short rendering of a value: scalars as JSON text, containers by kind.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => value_kind(value).to_string(),
        scalar => scalar.to_string(),
    }
}
