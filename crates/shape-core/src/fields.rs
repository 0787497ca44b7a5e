//! # Struct and Object Fields
//!
//! Field declarations for `Schema::Struct` (anonymous) and `Schema::Object`
//! (named composite type). Fields are enumerated explicitly through
//! [`FieldsBuilder`]; declaration order is kept and is the order in which
//! fields are validated, reported and emitted.
//!
//! A field may be declared with a bare descriptor or with an explicit
//! [`Field`] wrapper carrying metadata. Both normalize to the same record.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::DefinitionError;
use crate::schema::Schema;

/// A declared field: its descriptor plus documentation metadata.
#[derive(Debug, Clone)]
pub struct Field {
    schema: Schema,
    description: Option<String>,
    deprecated: bool,
}

impl Field {
    /// Wrap a descriptor as a field with no metadata.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            description: None,
            deprecated: false,
        }
    }

    /// Attach a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the field as deprecated. Deprecation does not change validation.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// The field's descriptor.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The field's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the field is marked deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

impl From<Schema> for Field {
    fn from(schema: Schema) -> Self {
        Field::new(schema)
    }
}

/// An ordered, duplicate-free set of named fields.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    entries: IndexMap<String, Field>,
}

impl Fields {
    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.entries.get(name)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.entries.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named composite type.
#[derive(Debug)]
pub struct ObjectType {
    name: String,
    fields: Fields,
}

impl ObjectType {
    /// The type's name, used when rendering descriptors and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// Builder for struct and object descriptors.
///
/// Declaration mistakes are recorded as they happen and reported by
/// [`FieldsBuilder::build`]; the first mistake wins.
#[derive(Debug)]
#[must_use = "call .build() to obtain the descriptor"]
pub struct FieldsBuilder {
    name: Option<String>,
    entries: IndexMap<String, Field>,
    error: Option<DefinitionError>,
}

impl FieldsBuilder {
    pub(crate) fn anonymous() -> Self {
        Self {
            name: None,
            entries: IndexMap::new(),
            error: None,
        }
    }

    pub(crate) fn named(name: String) -> Self {
        Self {
            name: Some(name),
            ..Self::anonymous()
        }
    }

    /// Declare a field. Accepts a bare [`Schema`] or a [`Field`].
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let name = name.into();
        if name.is_empty() {
            self.error = Some(DefinitionError::EmptyFieldName {
                owner: self.owner(),
            });
        } else if self.entries.contains_key(&name) {
            self.error = Some(DefinitionError::DuplicateField {
                field: name,
                owner: self.owner(),
            });
        } else {
            self.entries.insert(name, field.into());
        }
        self
    }

    /// Declare several fields at once, in iteration order.
    pub fn fields<N, F>(self, fields: impl IntoIterator<Item = (N, F)>) -> Self
    where
        N: Into<String>,
        F: Into<Field>,
    {
        fields
            .into_iter()
            .fold(self, |builder, (name, field)| builder.field(name, field))
    }

    /// Finish the declaration.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] recorded while declaring
    /// fields, or [`DefinitionError::EmptyTypeName`] for an object type
    /// declared with an empty name.
    pub fn build(self) -> Result<Schema, DefinitionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let fields = Fields {
            entries: self.entries,
        };
        match self.name {
            None => Ok(Schema::Struct(Arc::new(fields))),
            Some(name) if name.is_empty() => Err(DefinitionError::EmptyTypeName),
            Some(name) => Ok(Schema::Object(Arc::new(ObjectType { name, fields }))),
        }
    }

    fn owner(&self) -> String {
        match &self.name {
            Some(name) => format!("object type '{name}'"),
            None => "struct".to_string(),
        }
    }
}
