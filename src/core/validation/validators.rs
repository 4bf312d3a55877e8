//! Reusable form field validators
//!
//! Each validator receives the raw form value (`None` when the field was not
//! submitted) and either returns the coerced value or a human-readable message.

use std::str::FromStr;

/// Validator: field must be present and non-empty
pub fn non_empty(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<String, String> + Send + Sync + Clone {
    move |value: Option<&str>| match value {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(message.to_string()),
    }
}

/// Coerce a form value to a number
///
/// Surrounding whitespace is ignored and an empty or missing value coerces to
/// zero. Returns `None` for text that is not a finite number.
pub fn coerce_number(value: Option<&str>) -> Option<f64> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Validator: value coerces to at least one whole cent
///
/// The amount is rounded to minor units before the positivity check, so an
/// input such as `0.001` is rejected instead of being stored as zero. Amounts
/// whose cents do not fit in an `i64` get `too_large`.
pub fn positive_cents(
    not_a_number: &'static str,
    not_positive: &'static str,
    too_large: &'static str,
) -> impl Fn(Option<&str>) -> Result<i64, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        let Some(amount) = coerce_number(value) else {
            return Err(not_a_number.to_string());
        };
        let cents = (amount * 100.0).round();
        if cents < 1.0 {
            Err(not_positive.to_string())
        } else if cents >= i64::MAX as f64 {
            // i64::MAX as f64 is 2^63, the first value that does not fit
            Err(too_large.to_string())
        } else {
            Ok(cents as i64)
        }
    }
}

/// Validator: value parses exactly into one of the variants of `T`
pub fn one_of<T: FromStr>(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<T, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        value
            .and_then(|s| s.parse::<T>().ok())
            .ok_or_else(|| message.to_string())
    }
}
