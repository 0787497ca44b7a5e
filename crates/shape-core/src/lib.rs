//! # shape-core — Schema Algebra
//!
//! Defines the type descriptors that the validation engine walks values
//! against. A descriptor is built once, typically at program start, and is
//! then shared read-only by any number of concurrent validations.
//!
//! ## Descriptor Variants
//!
//! - Primitives: `Number`, `Int`, `Float`, `String`, `Boolean`, `Id`.
//! - `Literal`: exact equality to a fixed number, string or boolean.
//! - Combinators: `List`, `Nullable`, `Record`, `Union`, `Intersect`.
//! - Composites: `Struct` (anonymous) and `Object` (named), declared through
//!   [`FieldsBuilder`].
//! - `Json` and `Any`.
//! - `Deferred`: a lazily resolved reference, the only way a descriptor
//!   graph may become cyclic.
//!
//! ## Recursive Types
//!
//! ```
//! use shape_core::Schema;
//!
//! let nest = Schema::recursive(|nest| {
//!     Schema::object("Nest")
//!         .field("value", Schema::Number)
//!         .field("nest", Schema::nullable(nest))
//!         .build()
//! })
//! .expect("Nest is well-formed");
//!
//! assert_eq!(nest.to_string(), "Nest");
//! ```
//!
//! ## Crate Policy
//!
//! - Depends on no other workspace crate.
//! - No `unsafe` code.
//! - Declaration mistakes fail at definition time with a [`DefinitionError`];
//!   nothing in this crate panics on well-typed calls.

pub mod deferred;
pub mod error;
pub mod fields;
pub mod literal;
pub mod schema;

pub use deferred::Deferred;
pub use error::DefinitionError;
pub use fields::{Field, Fields, FieldsBuilder, ObjectType};
pub use literal::Literal;
pub use schema::{Schema, MAX_DEFERRED_HOPS};
