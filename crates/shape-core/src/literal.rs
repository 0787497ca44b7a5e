//! # Literal Constants
//!
//! The fixed value a `Schema::Literal` descriptor requires. Literals are
//! numbers, strings or booleans; equality is exact in kind and value, with
//! numbers compared numerically so `1` and `1.0` are the same literal.

use std::fmt;

use serde_json::{Number, Value};

use crate::error::DefinitionError;

/// A fixed number, string or boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A numeric constant.
    Number(Number),
    /// A textual constant.
    String(String),
    /// A boolean constant.
    Bool(bool),
}

impl Literal {
    /// Build a numeric literal from a float.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::NonFiniteLiteral`] for NaN or infinities,
    /// which have no JSON representation.
    pub fn float(value: f64) -> Result<Self, DefinitionError> {
        Number::from_f64(value)
            .map(Literal::Number)
            .ok_or(DefinitionError::NonFiniteLiteral(value))
    }

    /// Returns true if `value` equals this literal.
    ///
    /// A value of another kind never matches: the string `"1"` is not the
    /// literal `1`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Number(expected), Value::Number(actual)) => numbers_equal(expected, actual),
            (Literal::String(expected), Value::String(actual)) => expected == actual,
            (Literal::Bool(expected), Value::Bool(actual)) => expected == actual,
            _ => false,
        }
    }

    /// The literal as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Number(n) => Value::Number(n.clone()),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Number(Number::from(value))
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Number(Number::from(value))
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Literal::Number(Number::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_literal_matches_numerically() {
        let one = Literal::from(1);
        assert!(one.matches(&json!(1)));
        assert!(one.matches(&json!(1.0)));
        assert!(!one.matches(&json!(2)));
        assert!(!one.matches(&json!("1")));
    }

    #[test]
    fn test_string_literal_is_case_sensitive() {
        let aaa = Literal::from("AAA");
        assert!(aaa.matches(&json!("AAA")));
        assert!(!aaa.matches(&json!("aaa")));
    }

    #[test]
    fn test_bool_literal() {
        let yes = Literal::from(true);
        assert!(yes.matches(&json!(true)));
        assert!(!yes.matches(&json!(false)));
        assert!(!yes.matches(&json!("true")));
    }

    #[test]
    fn test_float_literal_rejects_nan() {
        assert!(matches!(
            Literal::float(f64::NAN),
            Err(DefinitionError::NonFiniteLiteral(_))
        ));
        let half = Literal::float(0.5).unwrap();
        assert!(half.matches(&json!(0.5)));
    }

    #[test]
    fn test_negative_and_unsigned_numbers_compare() {
        assert!(Literal::from(-3).matches(&json!(-3)));
        assert!(!Literal::from(-3).matches(&json!(3)));
        assert!(Literal::from(u64::MAX).matches(&json!(u64::MAX)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::from(1).to_string(), "1");
        assert_eq!(Literal::from("AAA").to_string(), "\"AAA\"");
        assert_eq!(Literal::from(false).to_string(), "false");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn literal_matches_its_own_value(n in any::<i64>(), s in ".{0,16}", b in any::<bool>()) {
            for literal in [Literal::from(n), Literal::from(s.as_str()), Literal::from(b)] {
                prop_assert!(literal.matches(&literal.to_value()));
            }
        }

        #[test]
        fn number_literal_never_matches_text(n in any::<i64>()) {
            prop_assert!(!Literal::from(n).matches(&Value::String(n.to_string())));
        }

        #[test]
        fn integral_float_matches_integer_literal(n in -1_000_000i64..1_000_000) {
            let float = Value::Number(Number::from_f64(n as f64).unwrap());
            prop_assert!(Literal::from(n).matches(&float));
        }
    }
}
