use crate::{
    Config,
    error::FetchError,
    model::{Forecast, ForecastQuery},
    provider::{giphy::GiphyProvider, visualcrossing::VisualCrossingProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod giphy;
pub mod visualcrossing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    VisualCrossing,
    Giphy,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::VisualCrossing => "visualcrossing",
            ServiceId::Giphy => "giphy",
        }
    }

    /// Environment variable consulted before the config file.
    pub fn env_var(&self) -> &'static str {
        match self {
            ServiceId::VisualCrossing => "VISUAL_CROSSING_KEY",
            ServiceId::Giphy => "GIPHY_KEY",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::VisualCrossing, ServiceId::Giphy]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "visualcrossing" => Ok(ServiceId::VisualCrossing),
            "giphy" => Ok(ServiceId::Giphy),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: visualcrossing, giphy."
            )),
        }
    }
}

/// Source of current conditions and the upcoming daily forecast.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<Forecast, FetchError>;
}

/// Source of an animated-image URL matching a free-text subject.
#[async_trait]
pub trait ImageProvider: Send + Sync + Debug {
    async fn find_image(&self, subject: &str) -> Result<String, FetchError>;
}

/// Construct the weather provider from config.
pub fn weather_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = resolve_key(config, ServiceId::VisualCrossing)?;
    Ok(Box::new(VisualCrossingProvider::new(api_key)))
}

/// Construct the image provider from config.
pub fn image_from_config(config: &Config) -> anyhow::Result<Box<dyn ImageProvider>> {
    let api_key = resolve_key(config, ServiceId::Giphy)?;
    Ok(Box::new(GiphyProvider::new(api_key)))
}

fn resolve_key(config: &Config, id: ServiceId) -> anyhow::Result<String> {
    config.resolve_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for service '{id}'.\n\
             Hint: run `skycast configure {id}` and enter your API key, or set {}.",
            id.env_var()
        )
    })
}
