//! Core library for the repository/weather summary gateway.
//!
//! This crate defines:
//! - Configuration loading (file + environment)
//! - Upstream clients for GitHub and OpenWeather
//! - The orchestration service that combines them
//! - Upload acceptance rules
//!
//! It is used by `gateway-server`, but has no dependency on any HTTP server framework.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod upload;

pub use config::Config;
pub use error::{GatewayError, UpstreamFetchError};
pub use model::{
    CombinedSummary, ConditionEntry, RawRepository, RawWeather, RepoQuery, RepositorySummary,
    SummaryQuery, UploadMetadata, WeatherQuery, WeatherSummary,
};
pub use provider::{
    ProviderId, Providers, RepositoryProvider, WeatherProvider, providers_from_config,
};
pub use service::GatewayService;
