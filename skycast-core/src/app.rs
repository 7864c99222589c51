//! Application state and rendering.
//!
//! The display is an explicit [`ViewState`] behind a lock, and [`render`]
//! turns a snapshot of it into text without touching anything else.
//! Searches are numbered: a result is applied only while its generation is
//! still current, so a slow superseded request can never overwrite a newer
//! one.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use crate::{
    Config,
    error::FetchError,
    model::{Forecast, ForecastQuery, LocationInfo},
    provider::{self, ImageProvider, WeatherProvider},
    units::{self, TemperatureUnit},
};

/// What the display currently shows.
#[derive(Debug, Clone, Default)]
pub enum View {
    #[default]
    Empty,
    Error(String),
    Forecast(ForecastView),
}

/// Display model for one successful search. Temperatures are kept as
/// display strings (`"68.2° F"`) so the unit toggle operates on exactly
/// what the user sees.
#[derive(Debug, Clone)]
pub struct ForecastView {
    pub location: LocationInfo,
    pub current: CurrentView,
    pub cards: Vec<DayCard>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CurrentView {
    pub datetime: Option<String>,
    pub conditions: Option<String>,
    pub temp: Option<String>,
    pub feelslike: Option<String>,
    pub humidity: Option<f64>,
    pub precip: Option<f64>,
    pub windspeed: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct DayCard {
    pub label: String,
    pub conditions: Option<String>,
    pub temp: Option<String>,
}

#[derive(Debug)]
pub struct ViewState {
    pub unit: TemperatureUnit,
    pub view: View,
    generation: u64,
}

impl ViewState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { unit, view: View::Empty, generation: 0 }
    }

    fn set_unit(&mut self, unit: TemperatureUnit) {
        if self.unit == unit {
            return;
        }
        self.unit = unit;
        if let View::Forecast(view) = &mut self.view {
            view.convert_to(unit);
        }
    }
}

impl ForecastView {
    fn new(forecast: &Forecast) -> Self {
        // Timeline values arrive in the provider's US unit group.
        let unit = TemperatureUnit::Fahrenheit;

        let current = CurrentView {
            datetime: forecast.current.datetime.clone(),
            conditions: forecast.current.conditions.clone(),
            temp: forecast.current.temp.map(|t| units::display(t, unit)),
            feelslike: forecast.current.feelslike.map(|t| units::display(t, unit)),
            humidity: forecast.current.humidity,
            precip: forecast.current.precip,
            windspeed: forecast.current.windspeed,
        };

        let cards = forecast
            .days
            .iter()
            .map(|day| DayCard {
                label: day
                    .date()
                    .map(|d| d.format("%a %Y-%m-%d").to_string())
                    .or_else(|| day.datetime.clone())
                    .unwrap_or_else(|| "upcoming".to_string()),
                conditions: day.conditions.clone(),
                temp: day.temp.map(|t| units::display(t, unit)),
            })
            .collect();

        Self { location: forecast.location.clone(), current, cards, image_url: None }
    }

    fn convert_to(&mut self, unit: TemperatureUnit) {
        convert_slot(&mut self.current.temp, unit);
        convert_slot(&mut self.current.feelslike, unit);
        for card in &mut self.cards {
            convert_slot(&mut card.temp, unit);
        }
    }
}

fn convert_slot(slot: &mut Option<String>, unit: TemperatureUnit) {
    if let Some(display) = slot {
        match units::convert(display, unit) {
            Ok(converted) => *slot = Some(converted),
            Err(err) => tracing::warn!(error = %err, "leaving unconvertible temperature as-is"),
        }
    }
}

/// One search-and-display session over the two backing services.
#[derive(Debug)]
pub struct App {
    weather: Box<dyn WeatherProvider>,
    image: Arc<dyn ImageProvider>,
    state: Arc<Mutex<ViewState>>,
}

impl App {
    pub fn new(
        weather: Box<dyn WeatherProvider>,
        image: Box<dyn ImageProvider>,
        unit: TemperatureUnit,
    ) -> Self {
        Self {
            weather,
            image: Arc::from(image),
            state: Arc::new(Mutex::new(ViewState::new(unit))),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let weather = provider::weather_from_config(config)?;
        let image = provider::image_from_config(config)?;
        Ok(Self::new(weather, image, config.default_unit()))
    }

    /// Run one search: fetch the forecast, apply it (or the error) to the
    /// view, and kick off the illustration lookup in the background.
    ///
    /// The returned handle is the in-flight image task. A caller that
    /// prints once and exits can await it so the illustration settles;
    /// an interactive caller just drops it and picks the URL up on the
    /// next render. `None` means no image request was issued: the weather
    /// lookup failed or the search was superseded.
    pub async fn search(&self, location: &str) -> Option<JoinHandle<()>> {
        let generation = {
            let mut st = lock(&self.state);
            st.generation += 1;
            st.generation
        };

        let query = ForecastQuery { location: location.to_string() };
        let outcome = self.weather.fetch_forecast(&query).await;
        let subject = apply_weather(&self.state, generation, outcome)?;

        let state = Arc::clone(&self.state);
        let image = Arc::clone(&self.image);
        Some(tokio::spawn(async move {
            match image.find_image(&subject).await {
                Ok(url) => apply_image(&state, generation, url),
                Err(err) => {
                    tracing::warn!(error = %err, "image lookup failed; keeping the previous illustration");
                }
            }
        }))
    }

    pub fn unit(&self) -> TemperatureUnit {
        lock(&self.state).unit
    }

    pub fn set_unit(&self, unit: TemperatureUnit) {
        lock(&self.state).set_unit(unit);
    }

    pub fn toggle_unit(&self) {
        let mut st = lock(&self.state);
        let target = st.unit.toggled();
        st.set_unit(target);
    }

    pub fn render(&self) -> String {
        render(&lock(&self.state))
    }
}

fn lock(state: &Mutex<ViewState>) -> std::sync::MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Apply a weather outcome for the given search generation. Returns the
/// subject to illustrate when the forecast was applied, `None` when the
/// result was an error or arrived too late.
fn apply_weather(
    state: &Mutex<ViewState>,
    generation: u64,
    outcome: Result<Forecast, FetchError>,
) -> Option<String> {
    let mut st = lock(state);
    if st.generation != generation {
        tracing::debug!(generation, "dropping superseded weather result");
        return None;
    }

    match outcome {
        Ok(forecast) => {
            let subject =
                forecast.current.conditions.clone().unwrap_or_else(|| "weather".to_string());
            let mut view = ForecastView::new(&forecast);
            if st.unit != TemperatureUnit::Fahrenheit {
                view.convert_to(st.unit);
            }
            st.view = View::Forecast(view);
            Some(subject)
        }
        Err(err) => {
            tracing::warn!(error = %err, "weather lookup failed");
            st.view = View::Error(err.to_string());
            None
        }
    }
}

fn apply_image(state: &Mutex<ViewState>, generation: u64, url: String) {
    let mut st = lock(state);
    if st.generation != generation {
        tracing::debug!(generation, "dropping superseded illustration");
        return;
    }
    if let View::Forecast(view) = &mut st.view {
        view.image_url = Some(url);
    }
}

/// Produce the text to display for a state snapshot.
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();
    match &state.view {
        View::Empty => {
            out.push_str("No forecast loaded yet. Search for a location to begin.\n");
        }
        View::Error(message) => {
            let _ = writeln!(out, "error: weather lookup failed: {message}");
        }
        View::Forecast(view) => {
            let loc = &view.location;
            let _ =
                writeln!(out, "{} ({}, {})", loc.resolved_address, loc.latitude, loc.longitude);
            if let Some(description) = &loc.description {
                let _ = writeln!(out, "{description}");
            }
            let _ = writeln!(out);

            let current = &view.current;
            match (&current.datetime, &current.conditions) {
                (Some(time), Some(conditions)) => {
                    let _ = writeln!(out, "Now ({time}): {conditions}");
                }
                (Some(time), None) => {
                    let _ = writeln!(out, "Now ({time})");
                }
                (None, Some(conditions)) => {
                    let _ = writeln!(out, "Now: {conditions}");
                }
                (None, None) => {
                    let _ = writeln!(out, "Now");
                }
            }
            if let Some(temp) = &current.temp {
                let _ = writeln!(out, "  temperature  {temp}");
            }
            if let Some(feels) = &current.feelslike {
                let _ = writeln!(out, "  feels like   {feels}");
            }
            if let Some(humidity) = current.humidity {
                let _ = writeln!(out, "  humidity     {humidity}%");
            }
            if let Some(precip) = current.precip {
                let _ = writeln!(out, "  precip       {precip} in");
            }
            if let Some(wind) = current.windspeed {
                let _ = writeln!(out, "  wind         {wind} mph");
            }

            if !view.cards.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "Next days:");
                for card in &view.cards {
                    let _ = writeln!(
                        out,
                        "  {:<15} {:>9}  {}",
                        card.label,
                        card.temp.as_deref().unwrap_or(""),
                        card.conditions.as_deref().unwrap_or(""),
                    );
                }
            }

            if let Some(url) = &view.image_url {
                let _ = writeln!(out);
                let _ = writeln!(out, "Illustration: {url}");
            }
        }
    }
    out
}
