//! # Router Pipeline
//!
//! A [`Pipeline`] over JSON values guarded by two descriptors. The input is
//! validated before any handler runs and handlers receive the pruned value;
//! whatever the handlers return is validated against the output descriptor
//! before it reaches the caller.
//!
//! Routers compose: [`RouterPipeline::into_middleware`] turns a router into
//! a middleware for a parent pipeline that claims only inputs matching its
//! input descriptor and passes everything else on.

use serde_json::Value;
use shape_core::Schema;
use shape_validate::{Validator, ValidatorOptions};

use crate::context::Context;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{Next, Pipeline};

/// Descriptors and validation settings for a [`RouterPipeline`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Descriptor for values entering the router.
    pub input: Schema,
    /// Descriptor for values leaving the router.
    pub output: Schema,
    /// How the input is validated (default: strict).
    pub input_options: ValidatorOptions,
    /// How the output is validated (default: strict).
    pub output_options: ValidatorOptions,
}

impl RouterOptions {
    /// Both sides strict.
    pub fn new(input: Schema, output: Schema) -> Self {
        Self {
            input,
            output,
            input_options: ValidatorOptions::default(),
            output_options: ValidatorOptions::default(),
        }
    }

    /// Replace the input validation settings.
    pub fn with_input_options(mut self, options: ValidatorOptions) -> Self {
        self.input_options = options;
        self
    }

    /// Replace the output validation settings.
    pub fn with_output_options(mut self, options: ValidatorOptions) -> Self {
        self.output_options = options;
        self
    }
}

/// A pipeline whose input and output are checked against descriptors.
#[derive(Debug, Clone)]
pub struct RouterPipeline {
    input: Validator,
    output: Validator,
    pipeline: Pipeline<Value, Value>,
}

impl RouterPipeline {
    /// A router with no handlers.
    pub fn new(options: RouterOptions) -> Self {
        Self {
            input: Validator::from_options(options.input, &options.input_options),
            output: Validator::from_options(options.output, &options.output_options),
            pipeline: Pipeline::new(),
        }
    }

    /// Append a handler. Handlers see the validated input.
    pub fn add<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(Value, Next<'_, Value, Value>) -> PipelineResult<Value> + Send + Sync + 'static,
    {
        self.pipeline.add(middleware);
        self
    }

    /// The input descriptor.
    pub fn input_schema(&self) -> &Schema {
        self.input.schema()
    }

    /// The output descriptor.
    pub fn output_schema(&self) -> &Schema {
        self.output.schema()
    }

    /// Validate `input`, run the handlers, validate their output.
    pub fn run(&self, input: &Value) -> PipelineResult<Value> {
        self.run_with_context(input, &Context::new())
    }

    /// [`RouterPipeline::run`] with a caller-provided context.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InputRejected`] before any handler runs,
    /// [`PipelineError::OutputRejected`] after they ran, or whatever the
    /// handlers return.
    pub fn run_with_context(&self, input: &Value, context: &Context) -> PipelineResult<Value> {
        let accepted = self.input.validate(input).map_err(|errors| {
            tracing::debug!(
                input = %self.input.schema(),
                first = %errors.first(),
                "router input rejected"
            );
            PipelineError::InputRejected(errors)
        })?;
        self.dispatch(accepted, context)
    }

    /// Convert into a middleware for a parent `Pipeline<Value, Value>`.
    ///
    /// Inputs the router's input descriptor rejects are passed to the
    /// parent's next middleware unchanged; matching inputs are handled by
    /// this router and never reach the rest of the parent chain.
    pub fn into_middleware(
        self,
    ) -> impl Fn(Value, Next<'_, Value, Value>) -> PipelineResult<Value> + Send + Sync + 'static
    {
        move |input: Value, next: Next<'_, Value, Value>| match self.input.validate(&input) {
            Ok(accepted) => self.dispatch(accepted, next.context()),
            Err(errors) => {
                tracing::debug!(
                    input = %self.input.schema(),
                    first = %errors.first(),
                    "router declined input"
                );
                next.run(input)
            }
        }
    }

    fn dispatch(&self, accepted: Value, context: &Context) -> PipelineResult<Value> {
        let produced = self.pipeline.run_with_context(accepted, context)?;
        self.output.validate(&produced).map_err(|errors| {
            tracing::error!(
                output = %self.output.schema(),
                first = %errors.first(),
                "router handler produced invalid output"
            );
            PipelineError::OutputRejected(errors)
        })
    }
}
