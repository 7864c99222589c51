use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::FetchError,
    extract,
    model::{Forecast, ForecastQuery, LocationInfo},
};

use super::WeatherProvider;

const SERVICE: &str = "visualcrossing";
const BASE_URL: &str = "https://weather.visualcrossing.com";

#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Point the provider at a different host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url, http: Client::new() }
    }

    async fn fetch_timeline(&self, query: &ForecastQuery) -> Result<Forecast, FetchError> {
        let url = format!(
            "{}/VisualCrossingWebServices/rest/services/timeline/{}",
            self.base_url,
            urlencoding::encode(&query.location)
        );

        tracing::debug!(location = %query.location, "requesting timeline forecast");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::transport(SERVICE, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::transport(SERVICE, e))?;

        if !status.is_success() {
            return Err(FetchError::status(SERVICE, status, &body));
        }

        let parsed: VcTimelineResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::shape(SERVICE, e.to_string()))?;

        forecast_from_timeline(parsed)
    }
}

fn forecast_from_timeline(parsed: VcTimelineResponse) -> Result<Forecast, FetchError> {
    let current = extract::day_summary(&parsed.current_conditions)
        .map_err(|e| FetchError::shape(SERVICE, format!("currentConditions: {e}")))?;

    // days[0] is today; the next five entries become forecast cards.
    // A shorter array truncates instead of erroring.
    let days = parsed
        .days
        .iter()
        .skip(1)
        .take(5)
        .map(extract::day_summary)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FetchError::shape(SERVICE, format!("days: {e}")))?;

    Ok(Forecast {
        location: LocationInfo {
            resolved_address: parsed.resolved_address,
            description: parsed.description,
            latitude: parsed.latitude,
            longitude: parsed.longitude,
        },
        current,
        days,
    })
}

#[derive(Debug, Deserialize)]
struct VcTimelineResponse {
    #[serde(rename = "resolvedAddress")]
    resolved_address: String,
    description: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(rename = "currentConditions")]
    current_conditions: Map<String, Value>,
    days: Vec<Map<String, Value>>,
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<Forecast, FetchError> {
        self.fetch_timeline(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const TIMELINE_PATH: &str = "/VisualCrossingWebServices/rest/services/timeline";

    fn sample_body(day_count: usize) -> String {
        let days: Vec<Value> = (0..day_count)
            .map(|i| {
                json!({
                    "datetime": format!("2026-08-{:02}", 6 + i),
                    "conditions": "Partially cloudy",
                    "temp": 72.5 + i as f64,
                    "humidity": 62.0,
                    "precip": 0.0,
                    "windspeed": 8.1,
                    "uvindex": 7,
                })
            })
            .collect();

        json!({
            "resolvedAddress": "Seattle, WA, United States",
            "description": "Similar temperatures continuing.",
            "latitude": 47.6062,
            "longitude": -122.3321,
            "currentConditions": {
                "datetime": "07:30:00",
                "conditions": "Overcast",
                "temp": 68.2,
                "feelslike": 67.0,
                "humidity": 71.0,
                "precip": 0.0,
                "windspeed": 5.4,
            },
            "days": days,
        })
        .to_string()
    }

    fn provider(server: &mockito::Server) -> VisualCrossingProvider {
        VisualCrossingProvider::with_base_url("TESTKEY".to_string(), server.url())
    }

    #[tokio::test]
    async fn fetch_maps_timeline_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", format!("{TIMELINE_PATH}/Seattle").as_str())
            .match_query(Matcher::UrlEncoded("key".into(), "TESTKEY".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(sample_body(6))
            .create_async()
            .await;

        let query = ForecastQuery { location: "Seattle".to_string() };
        let forecast = provider(&server).fetch_forecast(&query).await.unwrap();

        assert_eq!(forecast.location.resolved_address, "Seattle, WA, United States");
        assert_eq!(forecast.location.latitude, 47.6062);
        assert_eq!(forecast.current.temp, Some(68.2));
        assert_eq!(forecast.current.conditions.as_deref(), Some("Overcast"));

        assert_eq!(forecast.days.len(), 5);
        // days[0] (today) is skipped.
        assert_eq!(forecast.days[0].datetime.as_deref(), Some("2026-08-07"));
        // Daily entries in the sample carry no feelslike; it must stay absent.
        assert_eq!(forecast.days[0].feelslike, None);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn short_days_array_truncates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", format!("{TIMELINE_PATH}/Nowhere").as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(sample_body(3))
            .create_async()
            .await;

        let query = ForecastQuery { location: "Nowhere".to_string() };
        let forecast = provider(&server).fetch_forecast(&query).await.unwrap();

        assert_eq!(forecast.days.len(), 2);
    }

    #[tokio::test]
    async fn location_is_url_encoded_into_the_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", format!("{TIMELINE_PATH}/New%20York").as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(sample_body(6))
            .create_async()
            .await;

        let query = ForecastQuery { location: "New York".to_string() };
        provider(&server).fetch_forecast(&query).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", format!("{TIMELINE_PATH}/Seattle").as_str())
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("Invalid location")
            .create_async()
            .await;

        let query = ForecastQuery { location: "Seattle".to_string() };
        let err = provider(&server).fetch_forecast(&query).await.unwrap_err();

        match err {
            FetchError::Status { status, ref body, .. } => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("Invalid location"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_a_shape_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", format!("{TIMELINE_PATH}/Seattle").as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>definitely not json</html>")
            .create_async()
            .await;

        let query = ForecastQuery { location: "Seattle".to_string() };
        let err = provider(&server).fetch_forecast(&query).await.unwrap_err();

        assert!(matches!(err, FetchError::Shape { .. }));
    }
}
