//! Field-level decoders for persisted history. Stored data may have been
//! written by older builds or edited by hand, so a damaged field degrades to
//! a value the sanitizer can recognise instead of failing the whole entry.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::fix::Fix;
use super::marker::MarkerType;
use super::mode::MovementMode;
use super::route::Segment;

/// Anything that is not a JSON number becomes NaN.
pub(crate) fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(f64::NAN))
}

pub(crate) fn accuracy<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|a| a.is_finite()))
}

/// Non-finite or non-numeric amounts read as zero.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0))
}

/// Whole counts, also accepting floats such as `143.0` (floored).
pub(crate) fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().unwrap_or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n > 0.0)
            .map_or(0, |n| n.floor() as u64)
    }))
}

pub(crate) fn millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(millis_from(&value).unwrap_or(0))
}

pub(crate) fn optional_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(millis_from(&value))
}

fn millis_from(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| n.floor() as i64)
    })
}

/// Strings pass through, numbers are stringified, anything else is empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Unknown modes fall back to walking.
pub(crate) fn mode<'de, D>(deserializer: D) -> Result<MovementMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(MovementMode::from_str)
        .unwrap_or_default())
}

pub(crate) fn marker_type<'de, D>(deserializer: D) -> Result<MarkerType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(MarkerType::from_str)
        .unwrap_or_default())
}

/// A point that does not decode (`null`, a bare number) is kept as a fix
/// with NaN coordinates so the sanitizer drops and counts it.
pub(crate) fn points<'de, D>(deserializer: D) -> Result<Vec<Fix>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(list(value, || Fix::new(f64::NAN, f64::NAN, 0, None)))
}

/// A segment that does not decode is kept without points so the sanitizer
/// drops and counts it.
pub(crate) fn segments<'de, D>(deserializer: D) -> Result<Vec<Segment>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(list(value, || {
        Segment::new(String::new(), MovementMode::default(), 0)
    }))
}

/// A missing or non-array list is empty.
fn list<T: DeserializeOwned>(value: Value, placeholder: impl Fn() -> T) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_else(|_| placeholder()))
            .collect(),
        _ => Vec::new(),
    }
}
