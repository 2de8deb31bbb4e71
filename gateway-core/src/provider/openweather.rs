use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, error, info, warn};

use crate::{RawWeather, UpstreamFetchError};

use super::{ProviderId, WeatherProvider, parse_base_url, truncate_body};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: Url,
    api_key: Option<String>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: &str, api_key: Option<String>, http: Client) -> Result<Self> {
        if api_key.is_none() {
            warn!("No OpenWeather API key configured; weather requests will fail");
        }

        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key,
            http,
        })
    }

    async fn fetch_current(&self, city: &str) -> Result<RawWeather> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No API key configured for OpenWeather"))?;

        let url = self
            .base_url
            .join("weather")
            .context("Failed to build OpenWeather URL")?;

        let res = self
            .http
            .get(url)
            .query(&[("q", city), ("appid", api_key)])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: RawWeather =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        Ok(parsed)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, city: &str) -> Result<RawWeather, UpstreamFetchError> {
        info!(city, "Fetching current weather");

        match self.fetch_current(city).await {
            Ok(weather) => {
                debug!(conditions = weather.weather.len(), "Weather data fetched");
                Ok(weather)
            }
            Err(err) => {
                error!(
                    provider = ProviderId::OpenWeather.as_str(),
                    "Upstream fetch failed: {err:#}"
                );
                Err(UpstreamFetchError::new(ProviderId::OpenWeather, err))
            }
        }
    }
}
