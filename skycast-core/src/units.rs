use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display unit for rendered temperatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// The unit the provider reports values in.
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Celsius => "celsius",
        }
    }

    /// Suffix used in display strings, e.g. the `F` in `"72.5° F"`.
    pub fn suffix(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Celsius => "C",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse_unit(value).ok_or_else(|| {
            anyhow::anyhow!("Unknown temperature unit '{value}'. Supported units: f, c.")
        })
    }
}

fn parse_unit(value: &str) -> Option<TemperatureUnit> {
    match value.to_lowercase().as_str() {
        "f" | "fahrenheit" => Some(TemperatureUnit::Fahrenheit),
        "c" | "celsius" => Some(TemperatureUnit::Celsius),
        _ => None,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("temperature display '{0}' has no ° separator")]
    MissingSeparator(String),
    #[error("temperature display '{0}' does not start with a number")]
    BadNumber(String),
    #[error("temperature display '{0}' has an unknown unit suffix")]
    UnknownSuffix(String),
}

/// Format a numeric temperature as a display string, e.g. `72.5° F`.
pub fn display(value: f64, unit: TemperatureUnit) -> String {
    format!("{}° {}", format_value(value), unit.suffix())
}

/// Convert a temperature display string to the target unit.
///
/// Parses the number before the `°` separator and the unit after it,
/// applies the usual linear formula, and re-renders with one-decimal
/// rounding. A string already in the target unit passes through unchanged,
/// so toggling back and forth cannot accumulate rounding drift.
pub fn convert(display: &str, target: TemperatureUnit) -> Result<String, UnitError> {
    let (number, suffix) = display
        .split_once('°')
        .ok_or_else(|| UnitError::MissingSeparator(display.to_string()))?;

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| UnitError::BadNumber(display.to_string()))?;

    let unit =
        parse_unit(suffix.trim()).ok_or_else(|| UnitError::UnknownSuffix(display.to_string()))?;

    if unit == target {
        return Ok(display.to_string());
    }

    let converted = match target {
        TemperatureUnit::Fahrenheit => round10(value * 9.0 / 5.0 + 32.0),
        TemperatureUnit::Celsius => round10((value - 32.0) * 5.0 / 9.0),
    };

    Ok(self::display(converted, target))
}

/// Round to one decimal place. Uses `f64::round` on the scaled value
/// (half-away-from-zero); not bit-exact against other rounding modes.
fn round10(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn format_value(value: f64) -> String {
    // Normalizes -0.0 so it renders as "0".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}
