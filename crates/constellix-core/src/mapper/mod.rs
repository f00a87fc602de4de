//! Record mapper helpers
//!
//! Shared building blocks for converting between resource configuration and
//! the API's JSON payloads:
//!
//! - [`PayloadMode`]: which configured fields a write forwards
//! - [`format_id`]: numeric wire identifiers → state identifiers
//! - [`decode_object`] / [`decode_object_tolerant`]: response body decoding
//! - [`parse_flag`] / [`display_flag`] / [`parse_int_field`]: coercions
//!   between loosely typed configuration strings and wire types
//! - [`lenient`]: serde deserializers for wire records
//!
//! The per-kind `to_wire`/`from_wire` pairs live with each record kind and are
//! composed from these.

pub mod lenient;

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Which configured fields a write payload carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Only fields explicitly set to a non-zero value are sent; the API's
    /// own defaults apply to everything else
    Create,
    /// Every field holding a value is sent, zero values included
    Update,
}

impl PayloadMode {
    /// Decide whether a configured value goes on the wire
    ///
    /// `None` is never sent. In [`PayloadMode::Create`] the type's zero value
    /// (`""`, `0`, `false`) is treated as unset.
    pub fn forward<T>(self, value: Option<&T>) -> Option<T>
    where
        T: Clone + Default + PartialEq,
    {
        let value = value?;
        match self {
            PayloadMode::Create if *value == T::default() => None,
            _ => Some(value.clone()),
        }
    }

    /// Decide whether a sub-record collection goes on the wire
    ///
    /// Create skips an empty collection; Update always sends the full
    /// current collection.
    pub fn forward_collection<T>(self, items: Vec<T>) -> Option<Vec<T>> {
        match self {
            PayloadMode::Create if items.is_empty() => None,
            _ => Some(items),
        }
    }
}

/// Format a wire identifier as a state identifier
///
/// - JSON integers → decimal string
/// - JSON floats → rounded half away from zero, no fractional digits
/// - strings of ASCII digits → unchanged
///
/// Everything else (missing, null, negative, non-finite, booleans,
/// non-numeric strings, containers) is an [`Error::UnexpectedShape`].
pub fn format_id(value: Option<&Value>) -> Result<String> {
    match value {
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                return Ok(u.to_string());
            }
            if n.is_i64() {
                return Err(Error::unexpected_shape(format!(
                    "identifier must not be negative: {}",
                    n
                )));
            }
            match n.as_f64() {
                Some(f) => format_float_id(f),
                None => Err(Error::unexpected_shape(format!(
                    "identifier is not a number: {}",
                    n
                ))),
            }
        }
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(s.clone())
        }
        Some(other) => Err(Error::unexpected_shape(format!(
            "identifier has unexpected type: {}",
            other
        ))),
        None => Err(Error::unexpected_shape("response has no identifier")),
    }
}

/// Format a floating point identifier with zero fractional digits
pub fn format_float_id(f: f64) -> Result<String> {
    if !f.is_finite() {
        return Err(Error::unexpected_shape(format!(
            "identifier is not finite: {}",
            f
        )));
    }
    if f.is_sign_negative() {
        return Err(Error::unexpected_shape(format!(
            "identifier must not be negative: {}",
            f
        )));
    }
    Ok(format!("{:.0}", f.round()))
}

/// Decode a response body that must be a single JSON object
pub fn decode_object(body: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::unexpected_shape(format!("response is not valid JSON: {}", e)))?;
    into_object(value)
}

/// Decode a write response that may be wrapped in an extra character pair
///
/// 1. Decode the body directly.
/// 2. If it decodes to an array, take its first element.
/// 3. If it does not decode at all, trim one leading and one trailing
///    character and try again.
pub fn decode_object_tolerant(body: &str) -> Result<Map<String, Value>> {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => unwrap_single(value),
        Err(direct_err) => {
            let mut chars = trimmed.chars();
            chars.next();
            chars.next_back();
            let inner = chars.as_str();
            match serde_json::from_str::<Value>(inner) {
                Ok(value) => {
                    tracing::debug!("Decoded write response after trimming wrapper characters");
                    unwrap_single(value)
                }
                Err(_) => Err(Error::unexpected_shape(format!(
                    "write response is not valid JSON: {}",
                    direct_err
                ))),
            }
        }
    }
}

fn unwrap_single(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => into_object(first),
            None => Err(Error::unexpected_shape("write response is an empty array")),
        },
        other => into_object(other),
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::unexpected_shape(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse the boolean spellings the configuration accepts
///
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Convert a string-typed configuration flag into its wire boolean
///
/// An empty string means "unset" and maps to `false`.
pub fn parse_flag(field: &str, raw: &str) -> Result<bool> {
    if raw.is_empty() {
        return Ok(false);
    }
    parse_bool_str(raw).ok_or_else(|| {
        Error::invalid_input(format!("{} must be true or false, got '{}'", field, raw))
    })
}

/// Render a wire boolean the way string-typed flags are stored
pub fn display_flag(flag: bool) -> String {
    flag.to_string()
}

/// Convert a string-typed numeric configuration field into its wire integer
///
/// An empty string means "unset" and maps to `0`.
pub fn parse_int_field(field: &str, raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>().map_err(|_| {
        Error::invalid_input(format!("{} must be an integer, got '{}'", field, raw))
    })
}
