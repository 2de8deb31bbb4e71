//! Orchestration over the two upstream providers.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    CombinedSummary, GatewayError, RawRepository, RawWeather, RepoQuery, RepositorySummary,
    SummaryQuery, WeatherSummary,
    provider::{Providers, RepositoryProvider, WeatherProvider},
};

pub const GITHUB_FETCH_FAILED: &str = "Failed to fetch GitHub data";
pub const WEATHER_FETCH_FAILED: &str = "Failed to fetch weather data";

#[derive(Debug, Clone)]
pub struct GatewayService {
    repos: Arc<dyn RepositoryProvider>,
    weather: Arc<dyn WeatherProvider>,
}

impl GatewayService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { repos, weather }
    }

    pub fn hello(&self) -> &'static str {
        "Hello World!"
    }

    /// Repositories exactly as GitHub returned them.
    pub async fn get_user_repos(
        &self,
        query: &RepoQuery,
    ) -> Result<Vec<RawRepository>, GatewayError> {
        self.repos.fetch_user_repos(query).await.map_err(|err| {
            warn!(provider = %err.provider, "Rejecting request after upstream failure");
            GatewayError::BadRequest(GITHUB_FETCH_FAILED.to_string())
        })
    }

    /// Current weather exactly as OpenWeather returned it.
    pub async fn get_current_weather(&self, city: &str) -> Result<RawWeather, GatewayError> {
        self.weather.fetch_weather(city).await.map_err(|err| {
            warn!(provider = %err.provider, "Rejecting request after upstream failure");
            GatewayError::BadRequest(WEATHER_FETCH_FAILED.to_string())
        })
    }

    /// Repositories then weather, reduced to the summary shape.
    ///
    /// The weather call only starts once the repositories are in; either
    /// failure fails the whole summary.
    pub async fn get_summary_data(
        &self,
        query: &SummaryQuery,
    ) -> Result<CombinedSummary, GatewayError> {
        let summary = async {
            let repos = self.get_user_repos(&query.repos).await?;
            let user_repo: Vec<RepositorySummary> =
                repos.into_iter().map(RepositorySummary::from).collect();

            let weather = self.get_current_weather(&query.city).await?;

            Ok::<_, GatewayError>(CombinedSummary {
                user_repo,
                weather_data: WeatherSummary::from(weather),
            })
        }
        .await;

        match summary {
            Ok(summary) => {
                info!(repos = summary.user_repo.len(), "Summary assembled");
                Ok(summary)
            }
            Err(err) => Err(GatewayError::SummaryAggregation(err.to_string())),
        }
    }
}

impl From<Providers> for GatewayService {
    fn from(providers: Providers) -> Self {
        Self::new(providers.repos, providers.weather)
    }
}
