//! Key-whitelist filtering of raw provider JSON.

use serde_json::{Map, Value};

use crate::model::DaySummary;

/// Fields copied out of a raw conditions object, in render order.
pub const FORECAST_KEYS: [&str; 7] =
    ["datetime", "conditions", "feelslike", "temp", "humidity", "precip", "windspeed"];

/// Copy `keys` out of `raw`, skipping keys that are not present. Values are
/// copied as-is; a missing key is simply absent from the result.
pub fn whitelist(raw: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for &key in keys {
        if let Some(value) = raw.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    out
}

/// Reduce one raw conditions object to its typed summary.
///
/// Fails only when a whitelisted field is present with an unusable type,
/// e.g. a non-numeric `temp`.
pub fn day_summary(raw: &Map<String, Value>) -> Result<DaySummary, serde_json::Error> {
    serde_json::from_value(Value::Object(whitelist(raw, &FORECAST_KEYS)))
}
