use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::FetchError;

use super::ImageProvider;

const SERVICE: &str = "giphy";
const BASE_URL: &str = "https://api.giphy.com";

#[derive(Debug, Clone)]
pub struct GiphyProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GiphyProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Point the provider at a different host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url, http: Client::new() }
    }

    async fn translate(&self, subject: &str) -> Result<String, FetchError> {
        let url = format!("{}/v1/gifs/translate", self.base_url);

        tracing::debug!(%subject, "requesting illustration");

        let res = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("s", subject)])
            .send()
            .await
            .map_err(|e| FetchError::transport(SERVICE, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::transport(SERVICE, e))?;

        if !status.is_success() {
            return Err(FetchError::status(SERVICE, status, &body));
        }

        let parsed: GiphyTranslateResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::shape(SERVICE, e.to_string()))?;

        Ok(parsed.data.images.fixed_width.url)
    }
}

#[derive(Debug, Deserialize)]
struct GiphyRendition {
    url: String,
}

#[derive(Debug, Deserialize)]
struct GiphyImages {
    fixed_width: GiphyRendition,
}

#[derive(Debug, Deserialize)]
struct GiphyGif {
    images: GiphyImages,
}

#[derive(Debug, Deserialize)]
struct GiphyTranslateResponse {
    data: GiphyGif,
}

#[async_trait]
impl ImageProvider for GiphyProvider {
    async fn find_image(&self, subject: &str) -> Result<String, FetchError> {
        self.translate(subject).await
    }
}
