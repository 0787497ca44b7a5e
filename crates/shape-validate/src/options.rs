//! # Validator Options
//!
//! Configuration for building a [`Validator`](crate::Validator). The struct
//! deserializes with defaults for every missing key, so it can be embedded
//! in a host application's configuration file:
//!
//! ```
//! use shape_validate::{ErrorMode, PolicyKind, ValidatorOptions};
//!
//! let options: ValidatorOptions =
//!     serde_json::from_str(r#"{ "policy": "non-strict" }"#).unwrap();
//! assert_eq!(options.policy, PolicyKind::NonStrict);
//! assert_eq!(options.error_mode, ErrorMode::FailFast);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::{LeafPolicy, NonStrictPolicy, StrictPolicy};

/// Default nesting limit. Matches serde_json's parser recursion limit, so
/// any document it parses fits.
///
/// Values built in code are not bound by the parser and can nest deeper; a
/// deeply recursive instance (a long linked `Nest`, say) needs a larger
/// [`ValidatorOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Unrecognized option value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// Not `strict` or `non-strict`.
    #[error("unknown validation policy: {0:?}")]
    UnknownPolicy(String),

    /// Not `fail-fast` or `collect-all`.
    #[error("unknown error mode: {0:?}")]
    UnknownErrorMode(String),
}

/// Which built-in leaf policy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// No coercion.
    #[default]
    Strict,
    /// Bounded coercion of primitives.
    NonStrict,
}

impl PolicyKind {
    /// Returns the kebab-case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::NonStrict => "non-strict",
        }
    }

    /// Instantiate the policy.
    pub fn policy(&self) -> Arc<dyn LeafPolicy> {
        match self {
            Self::Strict => Arc::new(StrictPolicy),
            Self::NonStrict => Arc::new(NonStrictPolicy),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "non-strict" => Ok(Self::NonStrict),
            other => Err(OptionsError::UnknownPolicy(other.to_string())),
        }
    }
}

/// How many failures a validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMode {
    /// Stop at the first failure in document order.
    #[default]
    FailFast,
    /// Report every failing field, key and element.
    CollectAll,
}

impl ErrorMode {
    /// Returns the kebab-case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailFast => "fail-fast",
            Self::CollectAll => "collect-all",
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorMode {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail-fast" => Ok(Self::FailFast),
            "collect-all" => Ok(Self::CollectAll),
            other => Err(OptionsError::UnknownErrorMode(other.to_string())),
        }
    }
}

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Leaf policy (default: strict).
    pub policy: PolicyKind,
    /// Error accumulation (default: fail-fast).
    pub error_mode: ErrorMode,
    /// Maximum container nesting (default: [`DEFAULT_MAX_DEPTH`]).
    ///
    /// Recursive descriptors accept arbitrarily deep finite values up to
    /// this limit. Raise it for values constructed in code that nest deeper
    /// than any parsed document can.
    pub max_depth: usize,
}

impl ValidatorOptions {
    /// Strict, fail-fast, default depth.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Non-strict, fail-fast, default depth.
    pub fn non_strict() -> Self {
        Self::default().with_policy(PolicyKind::NonStrict)
    }

    /// Replace the policy.
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
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
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Strict,
            error_mode: ErrorMode::FailFast,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_kind_roundtrip() {
        for kind in [PolicyKind::Strict, PolicyKind::NonStrict] {
            assert_eq!(kind.as_str().parse::<PolicyKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.as_str());
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_policy_kind_from_str_invalid() {
        assert!("Strict".parse::<PolicyKind>().is_err()); // case-sensitive
        assert!("nonstrict".parse::<PolicyKind>().is_err());
        assert_eq!(
            "".parse::<PolicyKind>().unwrap_err(),
            OptionsError::UnknownPolicy(String::new())
        );
    }

    #[test]
    fn test_policy_kind_instantiates_matching_policy() {
        assert_eq!(PolicyKind::Strict.policy().name(), "strict");
        assert_eq!(PolicyKind::NonStrict.policy().name(), "non-strict");
    }

    #[test]
    fn test_error_mode_roundtrip() {
        for mode in [ErrorMode::FailFast, ErrorMode::CollectAll] {
            assert_eq!(mode.as_str().parse::<ErrorMode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
        assert!("all".parse::<ErrorMode>().is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ValidatorOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ValidatorOptions::default());

        let options: ValidatorOptions =
            serde_json::from_str(r#"{"error_mode": "collect-all", "max_depth": 8}"#).unwrap();
        assert_eq!(options.policy, PolicyKind::Strict);
        assert_eq!(options.error_mode, ErrorMode::CollectAll);
        assert_eq!(options.max_depth, 8);
    }

    #[test]
    fn test_options_reject_unknown_policy() {
        let result: Result<ValidatorOptions, _> =
            serde_json::from_str(r#"{"policy": "lenient"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builders() {
        let options = ValidatorOptions::non_strict()
            .with_error_mode(ErrorMode::CollectAll)
            .with_max_depth(4);
        assert_eq!(options.policy, PolicyKind::NonStrict);
        assert_eq!(options.error_mode, ErrorMode::CollectAll);
        assert_eq!(options.max_depth, 4);
    }
}
