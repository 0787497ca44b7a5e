//! # Middleware Pipeline
//!
//! An ordered chain of middleware over an input type `I` and an output type
//! `O`. Each middleware receives the input and a [`Next`] handle; it either
//! produces the output itself or hands a (possibly transformed) input to the
//! rest of the chain.
//!
//! ```
//! use shape_pipeline::{Pipeline, PipelineError};
//!
//! let mut pipeline: Pipeline<i64, String> = Pipeline::new();
//! pipeline
//!     .add(|n, next| if n < 0 { next.run(-n) } else { next.run(n) })
//!     .add(|n, _next| Ok(format!("#{n}")));
//!
//! assert_eq!(pipeline.run(-3).unwrap(), "#3");
//! assert!(matches!(Pipeline::<i64, String>::new().run(1), Err(PipelineError::Unhandled)));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{PipelineError, PipelineResult};

/// A middleware function.
pub type Middleware<I, O> = Arc<dyn Fn(I, Next<'_, I, O>) -> PipelineResult<O> + Send + Sync>;

/// Ordered middleware chain.
pub struct Pipeline<I, O> {
    middleware: Vec<Middleware<I, O>>,
}

impl<I, O> Pipeline<I, O> {
    /// An empty pipeline. Running it yields [`PipelineError::Unhandled`].
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
        }
    }

    /// Append a middleware to the end of the chain.
    pub fn add<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(I, Next<'_, I, O>) -> PipelineResult<O> + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Number of middleware in the chain.
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Run the chain with an empty [`Context`].
    pub fn run(&self, input: I) -> PipelineResult<O> {
        self.run_with_context(input, &Context::new())
    }

    /// Run the chain; every middleware sees `context`.
    pub fn run_with_context(&self, input: I, context: &Context) -> PipelineResult<O> {
        tracing::trace!(middleware = self.middleware.len(), "pipeline run");
        Next {
            chain: &self.middleware,
            context,
        }
        .run(input)
    }
}

impl<I, O> Default for Pipeline<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> Clone for Pipeline<I, O> {
    fn clone(&self) -> Self {
        Self {
            middleware: self.middleware.clone(),
        }
    }
}

impl<I, O> fmt::Debug for Pipeline<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// The remainder of the chain, as seen by one middleware.
pub struct Next<'a, I, O> {
    chain: &'a [Middleware<I, O>],
    context: &'a Context,
}

impl<'a, I, O> Next<'a, I, O> {
    /// Hand `input` to the next middleware.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unhandled`] when called from the last middleware.
    pub fn run(self, input: I) -> PipelineResult<O> {
        match self.chain.split_first() {
            Some((middleware, rest)) => middleware(
                input,
                Next {
                    chain: rest,
                    context: self.context,
                },
            ),
            None => Err(PipelineError::Unhandled),
        }
    }

    /// The context of the current run.
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Number of middleware left after this one.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }
}
