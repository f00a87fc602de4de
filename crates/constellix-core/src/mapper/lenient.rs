//! Lenient serde deserializers for wire records
//!
//! Scalars coming back from the API are coerced instead of rejected: a
//! missing or `null` field becomes the zero value, numbers are accepted where
//! strings are expected and vice versa. Collections stay strict about their
//! structure; a sub-record list that is not a JSON array still fails.
//!
//! Use with `#[serde(default, deserialize_with = "lenient::...")]` so a
//! missing field also lands on the zero value.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Deserialize any scalar into its display string
///
/// `null` → `""`, booleans → `"true"`/`"false"`, integral numbers without a
/// fractional part, other JSON values in their compact JSON form.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

/// Deserialize an integer, accepting numeric strings and floats
///
/// Floats are rounded half away from zero. Anything that is not a number
/// (or a string holding one) becomes `0`.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_int(&value))
}

/// Deserialize a boolean, accepting `"true"`/`"1"` style strings and numbers
pub fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Bool(b) => *b,
        Value::String(s) => super::parse_bool_str(s).unwrap_or(false),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}

/// Deserialize a sub-record list; `null` becomes an empty list
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        other => other.to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        // 2^53: beyond this floats no longer hold every integer
        Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

pub(crate) fn value_to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(round_to_i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(round_to_i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn round_to_i64(f: f64) -> Option<i64> {
    let rounded = f.round();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}
