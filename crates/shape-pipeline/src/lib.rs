//! # shape-pipeline — Middleware and Router Pipelines
//!
//! The consumer side of the validation engine. A [`Pipeline`] chains
//! synchronous middleware over an input/output pair; a [`RouterPipeline`]
//! is a pipeline over JSON values whose input and output are guarded by
//! `shape-core` descriptors.
//!
//! ```
//! use serde_json::json;
//! use shape_core::Schema;
//! use shape_pipeline::{RouterOptions, RouterPipeline};
//!
//! let greeting = Schema::structure()
//!     .field("name", Schema::String)
//!     .build()
//!     .unwrap();
//!
//! let mut router = RouterPipeline::new(RouterOptions::new(greeting, Schema::String));
//! router.add(|input, _next| {
//!     let name = input["name"].as_str().unwrap_or_default();
//!     Ok(json!(format!("hello, {name}")))
//! });
//!
//! assert_eq!(router.run(&json!({ "name": "ada" })).unwrap(), json!("hello, ada"));
//! assert!(router.run(&json!({ "name": 1 })).is_err());
//! ```
//!
//! ## Crate Policy
//!
//! - Runs are synchronous; a run completes before `run` returns.
//! - Validation failures are values ([`PipelineError`]), never panics.

pub mod context;
pub mod error;
pub mod pipeline;
pub mod router;

pub use context::Context;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Middleware, Next, Pipeline};
pub use router::{RouterOptions, RouterPipeline};
