//! Drives the real HTTP clients against a local fake upstream.

use std::{collections::HashMap, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use gateway_core::{
    Config, GatewayError, GatewayService, ProviderId, RepoQuery, SummaryQuery,
    providers_from_config,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn user_repos(
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    match username.as_str() {
        "stalled" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!([])).into_response()
        }
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbled" => (StatusCode::OK, "not json").into_response(),
        _ => Json(json!([
            {
                "id": 1,
                "name": "Repo 1",
                "full_name": "repo1",
                "owner": { "login": username },
                "page": params.get("page"),
                "per_page": params.get("per_page")
            }
        ]))
        .into_response(),
    }
}

async fn weather(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("appid").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "cod": 401, "message": "Invalid API key" })),
        )
            .into_response();
    }

    let city = params.get("q").cloned().unwrap_or_default();
    if city == "Nowhere" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "cod": "404", "message": "city not found" })),
        )
            .into_response();
    }

    Json(json!({
        "coord": { "lon": 72.8479, "lat": 19.0144 },
        "weather": [ { "id": 711, "main": "Smoke", "description": "smoke", "icon": "50d" } ],
        "base": "stations",
        "main": { "temp": 302.14, "humidity": 39 },
        "name": city,
        "cod": 200
    }))
    .into_response()
}

/// Serve the fake upstream on an ephemeral port and return its base URL.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/github/users/:username/repos", get(user_repos))
        .route("/owm/weather", get(weather));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind to ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake upstream");
    });

    format!("http://{addr}")
}

fn config_for(base: &str, api_key: Option<&str>) -> Config {
    Config {
        github_api_url: format!("{base}/github"),
        openweather_api_url: format!("{base}/owm/"),
        api_key: api_key.map(str::to_string),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

fn repo_query(username: &str) -> RepoQuery {
    RepoQuery {
        username: username.to_string(),
        page: "2".to_string(),
        per_page: "5".to_string(),
    }
}

#[tokio::test]
async fn github_client_forwards_pagination() {
    let base = spawn_upstream().await;
    let providers = providers_from_config(&config_for(&base, None)).unwrap();

    let repos = providers.repos.fetch_user_repos(&repo_query("octocat")).await.unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].id, 1);
    assert_eq!(repos[0].extra["owner"], json!({ "login": "octocat" }));
    assert_eq!(repos[0].extra["page"], json!("2"));
    assert_eq!(repos[0].extra["per_page"], json!("5"));
}

#[tokio::test]
async fn stalled_upstream_times_out_as_fetch_error() {
    let base = spawn_upstream().await;
    let config = Config {
        request_timeout_secs: 1,
        ..config_for(&base, None)
    };
    let providers = providers_from_config(&config).unwrap();

    let started = std::time::Instant::now();
    let err = providers
        .repos
        .fetch_user_repos(&repo_query("stalled"))
        .await
        .unwrap_err();

    assert_eq!(err.provider, ProviderId::GitHub);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn github_client_maps_status_errors() {
    let base = spawn_upstream().await;
    let providers = providers_from_config(&config_for(&base, None)).unwrap();

    let err = providers.repos.fetch_user_repos(&repo_query("broken")).await.unwrap_err();

    assert_eq!(err.provider, ProviderId::GitHub);
    assert!(format!("{:#}", err.source).contains("500"));
}

#[tokio::test]
async fn github_client_maps_decode_errors() {
    let base = spawn_upstream().await;
    let providers = providers_from_config(&config_for(&base, None)).unwrap();

    let err = providers.repos.fetch_user_repos(&repo_query("garbled")).await.unwrap_err();

    assert_eq!(err.provider, ProviderId::GitHub);
    assert!(err.source.to_string().contains("Failed to parse"));
}

#[tokio::test]
async fn weather_client_encodes_city() {
    let base = spawn_upstream().await;
    let providers = providers_from_config(&config_for(&base, Some("test-key"))).unwrap();

    let weather = providers.weather.fetch_weather("São Paulo & Co").await.unwrap();

    assert_eq!(weather.base, "stations");
    assert_eq!(weather.weather[0].id, 711);
    assert_eq!(weather.extra["name"], json!("São Paulo & Co"));
    assert_eq!(weather.extra["main"], json!({ "temp": 302.14, "humidity": 39 }));
}

#[tokio::test]
async fn weather_client_rejects_bad_key() {
    let base = spawn_upstream().await;
    let providers = providers_from_config(&config_for(&base, Some("wrong"))).unwrap();

    let err = providers.weather.fetch_weather("Mumbai").await.unwrap_err();

    assert_eq!(err.provider, ProviderId::OpenWeather);
    assert_eq!(err.to_string(), "failed to fetch Weather data");
}

#[tokio::test]
async fn unreachable_upstream_is_a_fetch_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let providers = providers_from_config(&config_for(&format!("http://{addr}"), None)).unwrap();
    let err = providers.repos.fetch_user_repos(&repo_query("octocat")).await.unwrap_err();

    assert_eq!(err.provider, ProviderId::GitHub);
}

#[tokio::test]
async fn service_builds_summary_over_http() {
    let base = spawn_upstream().await;
    let service = GatewayService::from(
        providers_from_config(&config_for(&base, Some("test-key"))).unwrap(),
    );

    let query = SummaryQuery {
        repos: repo_query("username"),
        city: "city".to_string(),
    };
    let summary = service.get_summary_data(&query).await.unwrap();

    let value: Value = serde_json::to_value(&summary).unwrap();
    assert_eq!(
        value,
        json!({
            "userRepo": [ { "id": 1, "name": "Repo 1", "full_name": "repo1" } ],
            "weatherData": {
                "base": "stations",
                "weather": [ { "id": 711, "main": "Smoke", "description": "smoke", "icon": "50d" } ]
            }
        })
    );
}

#[tokio::test]
async fn service_summary_fails_on_unknown_city() {
    let base = spawn_upstream().await;
    let service = GatewayService::from(
        providers_from_config(&config_for(&base, Some("test-key"))).unwrap(),
    );

    let query = SummaryQuery {
        repos: repo_query("username"),
        city: "Nowhere".to_string(),
    };
    let err = service.get_summary_data(&query).await.unwrap_err();

    assert_eq!(
        err,
        GatewayError::SummaryAggregation("Failed to fetch weather data".to_string())
    );
}
