//! String-to-number parsing and integer truncation for the non-strict policy.

use serde_json::Number;

/// Parse trimmed text as a finite number. Integral text yields an integer
/// number so `"1"` coerces to the same value as `1`.
pub(crate) fn parse_number(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(uint) = trimmed.parse::<u64>() {
        return Some(Number::from(uint));
    }
    // `f64::from_str` accepts "inf" and "NaN"; `from_f64` rejects them.
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Drop the fractional part, rounding toward zero.
pub(crate) fn truncate(number: &Number) -> Number {
    if number.is_i64() || number.is_u64() {
        return number.clone();
    }
    let Some(float) = number.as_f64() else {
        return number.clone();
    };
    let truncated = float.trunc();
    if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Number::from(truncated as i64)
    } else {
        Number::from_f64(truncated).unwrap_or_else(|| number.clone())
    }
}

/// True if the number has no fractional part.
pub(crate) fn is_integral(number: &Number) -> bool {
    number.is_i64() || number.is_u64() || number.as_f64().is_some_and(|f| f.fract() == 0.0)
}
