//! # Type Descriptors
//!
//! [`Schema`] is the closed set of descriptor variants. Composite variants
//! hold their children behind `Arc`, so cloning a descriptor is cheap and a
//! descriptor can be shared read-only across threads.
//!
//! Combinators are pure: they build a new descriptor and perform no
//! validation. Malformed combinator arguments are reported immediately as a
//! [`DefinitionError`].

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::deferred::Deferred;
use crate::error::DefinitionError;
use crate::fields::{Fields, FieldsBuilder, ObjectType};
use crate::literal::Literal;

/// Upper bound on deferred references followed without reaching a concrete
/// descriptor.
pub const MAX_DEFERRED_HOPS: usize = 32;

/// A type descriptor.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Any finite number.
    Number,
    /// A number with zero fractional part.
    Int,
    /// Alias of `Number` for validation purposes.
    Float,
    /// Any string.
    String,
    /// `true` or `false`.
    Boolean,
    /// A non-empty string.
    Id,
    /// Exactly the given constant.
    Literal(Literal),
    /// A sequence whose elements all conform to the element descriptor.
    List(Arc<Schema>),
    /// The inner descriptor, or null/absent.
    Nullable(Arc<Schema>),
    /// An anonymous fixed set of named fields.
    Struct(Arc<Fields>),
    /// A named composite type.
    Object(Arc<ObjectType>),
    /// The first member, in declared order, that accepts the value.
    Union(Arc<[Schema]>),
    /// Every member; the pruned outputs are merged.
    Intersect(Arc<[Schema]>),
    /// A string-keyed map whose values all conform to the value descriptor.
    Record(Arc<Schema>),
    /// Any value of the JSON data model.
    Json,
    /// Any value, returned unmodified.
    Any,
    /// A descriptor resolved on first use.
    Deferred(Deferred),
}

impl Schema {
    /// `Literal(value)`.
    pub fn literal(value: impl Into<Literal>) -> Self {
        Schema::Literal(value.into())
    }

    /// `List(element)`.
    pub fn list(element: Schema) -> Self {
        Schema::List(Arc::new(element))
    }

    /// `Nullable(inner)`.
    pub fn nullable(inner: Schema) -> Self {
        Schema::Nullable(Arc::new(inner))
    }

    /// `Record(value)`.
    pub fn record(value: Schema) -> Self {
        Schema::Record(Arc::new(value))
    }

    /// `Union(members)`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyUnion`] if `members` is empty.
    pub fn union(members: impl IntoIterator<Item = Schema>) -> Result<Self, DefinitionError> {
        let members: Vec<Schema> = members.into_iter().collect();
        if members.is_empty() {
            return Err(DefinitionError::EmptyUnion);
        }
        Ok(Schema::Union(members.into()))
    }

    /// `Intersect(members)`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyIntersection`] if `members` is empty.
    pub fn intersect(members: impl IntoIterator<Item = Schema>) -> Result<Self, DefinitionError> {
        let members: Vec<Schema> = members.into_iter().collect();
        if members.is_empty() {
            return Err(DefinitionError::EmptyIntersection);
        }
        Ok(Schema::Intersect(members.into()))
    }

    /// Start an anonymous struct declaration.
    pub fn structure() -> FieldsBuilder {
        FieldsBuilder::anonymous()
    }

    /// Start a named object type declaration.
    pub fn object(name: impl Into<String>) -> FieldsBuilder {
        FieldsBuilder::named(name.into())
    }

    /// A reference resolved by calling `resolve` the first time the
    /// descriptor is visited.
    ///
    /// ```
    /// use once_cell::sync::Lazy;
    /// use shape_core::Schema;
    ///
    /// static NODE: Lazy<Schema> = Lazy::new(|| {
    ///     Schema::object("Node")
    ///         .field("value", Schema::Number)
    ///         .field("next", Schema::nullable(Schema::deferred(|| NODE.clone())))
    ///         .build()
    ///         .expect("Node is well-formed")
    /// });
    ///
    /// assert_eq!(NODE.to_string(), "Node");
    /// ```
    pub fn deferred<F>(resolve: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Schema::Deferred(Deferred::from_fn(resolve))
    }

    /// Build a self-referential descriptor.
    ///
    /// `define` receives a reference to the descriptor it is building. The
    /// reference is held weakly inside the definition, so the returned
    /// handle owns the whole graph and dropping it frees it.
    ///
    /// # Errors
    ///
    /// Propagates any [`DefinitionError`] returned by `define`.
    pub fn recursive<F>(define: F) -> Result<Self, DefinitionError>
    where
        F: FnOnce(Schema) -> Result<Schema, DefinitionError>,
    {
        let cell = Arc::new(OnceCell::new());
        let this = Schema::Deferred(Deferred::back(&cell));
        let definition = define(this)?;
        // The cell is private to this call and still empty.
        let _ = cell.set(definition);
        Ok(Schema::Deferred(Deferred::owned(cell)))
    }

    /// Follow deferred references to the first concrete descriptor.
    ///
    /// Returns `None` for a dangling reference or a chain longer than
    /// [`MAX_DEFERRED_HOPS`].
    pub fn resolve(&self) -> Option<Schema> {
        let mut current = self.clone();
        for _ in 0..MAX_DEFERRED_HOPS {
            match current {
                Schema::Deferred(deferred) => current = deferred.get()?,
                concrete => return Some(concrete),
            }
        }
        None
    }

    /// Whether a struct field with this descriptor may be absent.
    ///
    /// True for `Nullable` and `Any`, for a union with such a member, for an
    /// intersection of such members, and for references resolving to one.
    pub fn accepts_absent(&self) -> bool {
        self.accepts_absent_within(&mut Vec::new())
    }

    /// `entered` holds the references being followed; meeting one of them
    /// again is a cycle, and a cycle never accepts absence.
    fn accepts_absent_within(&self, entered: &mut Vec<Deferred>) -> bool {
        match self {
            Schema::Nullable(_) | Schema::Any => true,
            Schema::Union(members) => members
                .iter()
                .any(|member| member.accepts_absent_within(entered)),
            Schema::Intersect(members) => members
                .iter()
                .all(|member| member.accepts_absent_within(entered)),
            Schema::Deferred(deferred) => {
                if entered.len() >= MAX_DEFERRED_HOPS
                    || entered.iter().any(|seen| seen.same_target(deferred))
                {
                    return false;
                }
                let Some(target) = deferred.get() else {
                    return false;
                };
                entered.push(deferred.clone());
                let accepts = target.accepts_absent_within(entered);
                entered.pop();
                accepts
            }
            _ => false,
        }
    }

    /// Short lowercase name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Number => "number",
            Schema::Int => "int",
            Schema::Float => "float",
            Schema::String => "string",
            Schema::Boolean => "boolean",
            Schema::Id => "id",
            Schema::Literal(_) => "literal",
            Schema::List(_) => "list",
            Schema::Nullable(_) => "nullable",
            Schema::Struct(_) => "struct",
            Schema::Object(_) => "object",
            Schema::Union(_) => "union",
            Schema::Intersect(_) => "intersection",
            Schema::Record(_) => "record",
            Schema::Json => "json",
            Schema::Any => "any",
            Schema::Deferred(_) => "deferred",
        }
    }
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &[Schema], separator: &str) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        match member {
            Schema::Union(_) | Schema::Intersect(_) => write!(f, "({member})")?,
            _ => write!(f, "{member}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Number => f.write_str("Number"),
            Schema::Int => f.write_str("Int"),
            Schema::Float => f.write_str("Float"),
            Schema::String => f.write_str("String"),
            Schema::Boolean => f.write_str("Boolean"),
            Schema::Id => f.write_str("ID"),
            Schema::Literal(literal) => write!(f, "{literal}"),
            Schema::List(element) => write!(f, "List<{element}>"),
            Schema::Nullable(inner) => write!(f, "Nullable<{inner}>"),
            Schema::Struct(fields) => {
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (name, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {}", field.schema())?;
                }
                f.write_str(" }")
            }
            Schema::Object(object) => f.write_str(object.name()),
            Schema::Union(members) => write_members(f, members, " | "),
            Schema::Intersect(members) => write_members(f, members, " & "),
            Schema::Record(value) => write!(f, "Record<{value}>"),
            Schema::Json => f.write_str("Json"),
            Schema::Any => f.write_str("Any"),
            Schema::Deferred(deferred) => write!(f, "{deferred}"),
        }
    }
}
