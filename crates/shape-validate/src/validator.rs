//! # Validator
//!
//! Binds a descriptor to a leaf policy. A validator is immutable and can be
//! shared across threads; every [`Validator::validate`] call owns its own
//! traversal state.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shape_core::Schema;

use crate::engine::Traversal;
use crate::error::{TypedValidationError, ValidationErrors};
use crate::options::{ErrorMode, ValidatorOptions, DEFAULT_MAX_DEPTH};
use crate::policy::{LeafPolicy, NonStrictPolicy, StrictPolicy};

/// Result of a validation call: the pruned, possibly coerced value.
pub type ValidationResult<T = Value> = Result<T, ValidationErrors>;

/// A descriptor paired with a leaf policy.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Schema,
    policy: Arc<dyn LeafPolicy>,
    error_mode: ErrorMode,
    max_depth: usize,
}

impl Validator {
    /// Validator with a custom leaf policy, fail-fast, default depth.
    pub fn new(schema: Schema, policy: impl LeafPolicy + 'static) -> Self {
        Self {
            schema,
            policy: Arc::new(policy),
            error_mode: ErrorMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Validator with the [`StrictPolicy`].
    pub fn strict(schema: Schema) -> Self {
        Self::new(schema, StrictPolicy)
    }

    /// Validator with the [`NonStrictPolicy`].
    pub fn non_strict(schema: Schema) -> Self {
        Self::new(schema, NonStrictPolicy)
    }

    /// Validator configured from [`ValidatorOptions`].
    pub fn from_options(schema: Schema, options: &ValidatorOptions) -> Self {
        Self {
            schema,
            policy: options.policy.policy(),
            error_mode: options.error_mode,
            max_depth: options.max_depth,
        }
    }

    /// Replace the error mode.
    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    /// Replace the depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate `value`, returning the pruned and coerced output.
    ///
    /// The input is never modified. Struct and object outputs contain the
    /// declared fields only, in declaration order.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        let outcome = Traversal::new(self.policy.as_ref(), self.error_mode, self.max_depth)
            .run(&self.schema, value);
        if let Err(errors) = &outcome {
            tracing::debug!(
                schema = %self.schema,
                policy = self.policy.name(),
                count = errors.count(),
                first = %errors.first(),
                "value rejected"
            );
        }
        outcome
    }

    /// Validate `value`, then deserialize the output into `T`.
    ///
    /// # Errors
    ///
    /// [`TypedValidationError::Rejected`] if validation fails,
    /// [`TypedValidationError::Deserialize`] if the output does not fit `T`.
    pub fn validate_into<T: DeserializeOwned>(
        &self,
        value: &Value,
    ) -> Result<T, TypedValidationError> {
        let output = self.validate(value)?;
        Ok(serde_json::from_value(output)?)
    }

    /// The bound descriptor.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Name of the leaf policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// The configured error mode.
    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    /// The configured depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Strict validator for `schema`.
pub fn create_strict_validator(schema: &Schema) -> Validator {
    Validator::strict(schema.clone())
}

/// Non-strict validator for `schema`.
pub fn create_non_strict_validator(schema: &Schema) -> Validator {
    Validator::non_strict(schema.clone())
}

/// Validator for `schema` using a caller-supplied leaf policy.
pub fn create_validator(schema: &Schema, policy: impl LeafPolicy + 'static) -> Validator {
    Validator::new(schema.clone(), policy)
}
