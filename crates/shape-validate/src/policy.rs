//! # Leaf Policies
//!
//! A [`LeafPolicy`] decides how primitive and literal leaves accept values.
//! The traversal never branches on strict versus non-strict; it hands every
//! leaf to the active policy and uses whatever value the policy returns.
//!
//! | Leaf | [`StrictPolicy`] | [`NonStrictPolicy`] |
//! |------|------------------|---------------------|
//! | Number, Float | numbers | numbers; numeric strings parsed |
//! | Int | integral numbers | numbers truncated; numeric strings parsed then truncated |
//! | String | strings | strings |
//! | Boolean | booleans | booleans; `"true"` / `"false"` |
//! | ID | non-empty strings | non-empty strings |
//! | Literal | equal value of the same kind | same as strict |

use std::fmt;

use serde_json::Value;
use shape_core::Literal;

use crate::coerce::{is_integral, parse_number, truncate};
use crate::error::{describe, ErrorKind};

/// Outcome of a leaf check: the accepted (possibly coerced) value or the
/// reason for rejection.
pub type LeafResult = Result<Value, ErrorKind>;

/// Strategy for primitive and literal checks. One method per leaf kind.
pub trait LeafPolicy: Send + Sync + fmt::Debug {
    /// Name used in logs, e.g. `"strict"`.
    fn name(&self) -> &'static str;

    /// Check a `Number` leaf.
    fn number(&self, value: &Value) -> LeafResult;

    /// Check an `Int` leaf.
    fn int(&self, value: &Value) -> LeafResult;

    /// Check a `Float` leaf. Same as `Number` unless overridden.
    fn float(&self, value: &Value) -> LeafResult {
        self.number(value)
    }

    /// Check a `String` leaf.
    fn string(&self, value: &Value) -> LeafResult;

    /// Check a `Boolean` leaf.
    fn boolean(&self, value: &Value) -> LeafResult;

    /// Check an `ID` leaf: a non-empty string, never coerced.
    fn id(&self, value: &Value) -> LeafResult {
        match value {
            Value::String(text) if !text.is_empty() => Ok(value.clone()),
            Value::String(_) => Err(ErrorKind::TypeMismatch {
                expected: "non-empty string",
                found: "empty string",
            }),
            other => Err(ErrorKind::type_mismatch("non-empty string", other)),
        }
    }

    /// Check a `Literal` leaf: exact equality, never coerced.
    fn literal(&self, literal: &Literal, value: &Value) -> LeafResult {
        if literal.matches(value) {
            Ok(value.clone())
        } else {
            Err(ErrorKind::LiteralMismatch {
                expected: literal.clone(),
                found: describe(value),
            })
        }
    }
}

/// Exact primitive typing, no coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictPolicy;

impl LeafPolicy for StrictPolicy {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn number(&self, value: &Value) -> LeafResult {
        match value {
            Value::Number(_) => Ok(value.clone()),
            other => Err(ErrorKind::type_mismatch("number", other)),
        }
    }

    fn int(&self, value: &Value) -> LeafResult {
        match value {
            Value::Number(number) if is_integral(number) => Ok(value.clone()),
            Value::Number(_) => Err(ErrorKind::TypeMismatch {
                expected: "int",
                found: "fractional number",
            }),
            other => Err(ErrorKind::type_mismatch("int", other)),
        }
    }

    fn string(&self, value: &Value) -> LeafResult {
        match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(ErrorKind::type_mismatch("string", other)),
        }
    }

    fn boolean(&self, value: &Value) -> LeafResult {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(ErrorKind::type_mismatch("boolean", other)),
        }
    }
}

/// Bounded coercion for loosely typed input such as query strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonStrictPolicy;

impl LeafPolicy for NonStrictPolicy {
    fn name(&self) -> &'static str {
        "non-strict"
    }

    fn number(&self, value: &Value) -> LeafResult {
        match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(text) => parse_number(text).map(Value::Number).ok_or_else(|| {
                ErrorKind::CoercionFailed {
                    target: "number",
                    input: text.clone(),
                }
            }),
            other => Err(ErrorKind::type_mismatch("number", other)),
        }
    }

    fn int(&self, value: &Value) -> LeafResult {
        match value {
            Value::Number(number) => Ok(Value::Number(truncate(number))),
            Value::String(text) => parse_number(text)
                .map(|number| Value::Number(truncate(&number)))
                .ok_or_else(|| ErrorKind::CoercionFailed {
                    target: "int",
                    input: text.clone(),
                }),
            other => Err(ErrorKind::type_mismatch("int", other)),
        }
    }

    fn string(&self, value: &Value) -> LeafResult {
        StrictPolicy.string(value)
    }

    fn boolean(&self, value: &Value) -> LeafResult {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(text) => match text.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(ErrorKind::CoercionFailed {
                    target: "boolean",
                    input: text.clone(),
                }),
            },
            other => Err(ErrorKind::type_mismatch("boolean", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn samples() -> Vec<Value> {
        vec![
            json!(null),
            json!(true),
            json!(false),
            json!(0),
            json!(1),
            json!(-3),
            json!(1.5),
            json!(""),
            json!("1"),
            json!("abc"),
            json!("true"),
            json!([]),
            json!({}),
        ]
    }

    #[test]
    fn test_strict_number_accepts_only_numbers() {
        for value in samples() {
            assert_eq!(StrictPolicy.number(&value).is_ok(), value.is_number(), "{value}");
            assert_eq!(StrictPolicy.float(&value).is_ok(), value.is_number(), "{value}");
        }
    }

    #[test]
    fn test_strict_int_rejects_fractions() {
        assert_eq!(StrictPolicy.int(&json!(1)), Ok(json!(1)));
        assert_eq!(StrictPolicy.int(&json!(-3)), Ok(json!(-3)));
        assert_eq!(
            StrictPolicy.int(&json!(1.1)),
            Err(ErrorKind::TypeMismatch {
                expected: "int",
                found: "fractional number",
            })
        );
        assert!(StrictPolicy.int(&json!("1")).is_err());
    }

    #[test]
    fn test_strict_string_and_boolean_never_coerce() {
        for value in samples() {
            assert_eq!(StrictPolicy.string(&value).is_ok(), value.is_string(), "{value}");
            assert_eq!(StrictPolicy.boolean(&value).is_ok(), value.is_boolean(), "{value}");
        }
    }

    #[test]
    fn test_id_requires_non_empty_string() {
        for policy in [&StrictPolicy as &dyn LeafPolicy, &NonStrictPolicy] {
            assert_eq!(policy.id(&json!("123")), Ok(json!("123")));
            assert!(policy.id(&json!("")).is_err());
            assert!(policy.id(&json!(123)).is_err());
        }
    }

    #[test]
    fn test_literal_is_exact_under_both_policies() {
        let one = Literal::from(1);
        for policy in [&StrictPolicy as &dyn LeafPolicy, &NonStrictPolicy] {
            assert_eq!(policy.literal(&one, &json!(1)), Ok(json!(1)));
            assert!(policy.literal(&one, &json!(2)).is_err());
            assert_eq!(
                policy.literal(&one, &json!("1")),
                Err(ErrorKind::LiteralMismatch {
                    expected: Literal::from(1),
                    found: "\"1\"".into(),
                })
            );
        }
    }

    #[test]
    fn test_non_strict_number_parses_strings() {
        assert_eq!(NonStrictPolicy.number(&json!("1")), Ok(json!(1)));
        assert_eq!(NonStrictPolicy.number(&json!("1.1")), Ok(json!(1.1)));
        assert_eq!(NonStrictPolicy.number(&json!(2.5)), Ok(json!(2.5)));
        assert_eq!(
            NonStrictPolicy.number(&json!("abc")),
            Err(ErrorKind::CoercionFailed {
                target: "number",
                input: "abc".into(),
            })
        );
        assert!(NonStrictPolicy.number(&json!(true)).is_err());
    }

    #[test]
    fn test_non_strict_int_truncates() {
        assert_eq!(NonStrictPolicy.int(&json!(1.1)), Ok(json!(1)));
        assert_eq!(NonStrictPolicy.int(&json!(-2.7)), Ok(json!(-2)));
        assert_eq!(NonStrictPolicy.int(&json!("1")), Ok(json!(1)));
        assert_eq!(NonStrictPolicy.int(&json!("1.1")), Ok(json!(1)));
        assert!(matches!(
            NonStrictPolicy.int(&json!("x1")),
            Err(ErrorKind::CoercionFailed { target: "int", .. })
        ));
        assert!(NonStrictPolicy.int(&json!(null)).is_err());
    }

    #[test]
    fn test_non_strict_boolean_tokens_are_case_sensitive() {
        assert_eq!(NonStrictPolicy.boolean(&json!("true")), Ok(json!(true)));
        assert_eq!(NonStrictPolicy.boolean(&json!("false")), Ok(json!(false)));
        assert_eq!(NonStrictPolicy.boolean(&json!(false)), Ok(json!(false)));
        assert!(NonStrictPolicy.boolean(&json!("True")).is_err());
        assert!(NonStrictPolicy.boolean(&json!("1")).is_err());
        assert!(matches!(
            NonStrictPolicy.boolean(&json!(1)),
            Err(ErrorKind::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_strict_string_does_not_coerce() {
        assert!(NonStrictPolicy.string(&json!(1)).is_err());
        assert!(NonStrictPolicy.string(&json!(true)).is_err());
        assert_eq!(NonStrictPolicy.string(&json!("1")), Ok(json!("1")));
    }
}
