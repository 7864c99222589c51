use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct ForecastQuery {
    pub location: String,
}

/// Location header fields of a timeline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub resolved_address: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// The whitelisted slice of one conditions object. A field the provider did
/// not send stays `None`; nothing is defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub datetime: Option<String>,
    pub conditions: Option<String>,
    pub feelslike: Option<f64>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub precip: Option<f64>,
    pub windspeed: Option<f64>,
}

impl DaySummary {
    /// Daily entries carry `datetime` as `YYYY-MM-DD`; current conditions
    /// carry a time of day instead, for which this returns `None`.
    pub fn date(&self) -> Option<NaiveDate> {
        self.datetime
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }
}

/// Current conditions plus up to five upcoming daily entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: LocationInfo,
    pub current: DaySummary,
    pub days: Vec<DaySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_date_parses_daily_datetime() {
        let day = DaySummary { datetime: Some("2026-08-07".to_string()), ..Default::default() };
        let date = day.date().expect("daily datetime should parse");
        assert_eq!(date.to_string(), "2026-08-07");
    }

    #[test]
    fn day_date_is_none_for_time_of_day() {
        let current = DaySummary { datetime: Some("07:30:00".to_string()), ..Default::default() };
        assert!(current.date().is_none());

        assert!(DaySummary::default().date().is_none());
    }
}
