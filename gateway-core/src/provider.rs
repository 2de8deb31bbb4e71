use crate::{
    Config, RawRepository, RawWeather, RepoQuery, UpstreamFetchError,
    provider::{github::GitHubProvider, openweather::OpenWeatherProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc};

pub mod github;
pub mod openweather;

const USER_AGENT: &str = concat!("summary-gateway/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    GitHub,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::GitHub => "github",
            ProviderId::OpenWeather => "openweather",
        }
    }

    /// Name used in client-facing error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::GitHub => "GitHub",
            ProviderId::OpenWeather => "Weather",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Source of a user's repository listing.
#[async_trait]
pub trait RepositoryProvider: Send + Sync + Debug {
    async fn fetch_user_repos(
        &self,
        query: &RepoQuery,
    ) -> Result<Vec<RawRepository>, UpstreamFetchError>;
}

/// Source of current weather conditions for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<RawWeather, UpstreamFetchError>;
}

/// Both upstream clients, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct Providers {
    pub repos: Arc<dyn RepositoryProvider>,
    pub weather: Arc<dyn WeatherProvider>,
}

/// Construct the real upstream clients from config.
pub fn providers_from_config(config: &Config) -> anyhow::Result<Providers> {
    let http = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let repos = GitHubProvider::new(&config.github_api_url, http.clone())?;
    let weather =
        OpenWeatherProvider::new(&config.openweather_api_url, config.api_key.clone(), http)?;

    Ok(Providers {
        repos: Arc::new(repos),
        weather: Arc::new(weather),
    })
}

/// Parse a configured base URL, making sure joined paths append to it.
fn parse_base_url(raw: &str) -> anyhow::Result<reqwest::Url> {
    let trimmed = raw.trim_end_matches('/');
    reqwest::Url::parse(&format!("{trimmed}/"))
        .with_context(|| format!("Invalid upstream base URL '{raw}'"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
