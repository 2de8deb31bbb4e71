use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Parameters of a repository listing request.
///
/// `page` and `per_page` are forwarded upstream as given; only presence is checked.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepoQuery {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub page: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub per_page: String,
}

/// Parameters of the combined summary request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    #[serde(flatten)]
    #[validate(nested)]
    pub repos: RepoQuery,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,
}

/// Path parameters of the weather request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeatherQuery {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,
}

/// Repository record as returned by GitHub.
///
/// Fields other than the three we project on are carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
    pub full_name: String,
}

impl From<RawRepository> for RepositorySummary {
    fn from(repo: RawRepository) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
        }
    }
}

/// One entry of the upstream `weather` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEntry {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Current-weather payload as returned by OpenWeather.
///
/// Only `base` and `weather` are typed; coordinates, temperatures, wind and
/// the rest stay in `extra` and are serialized back as received.
///
/// `base` and `weather` are required: OpenWeather always sends both on a
/// successful response. A payload missing either fails to decode, which the
/// provider reports as an upstream fetch failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeather {
    pub base: String,
    pub weather: Vec<ConditionEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub base: String,
    pub weather: Vec<ConditionEntry>,
}

impl From<RawWeather> for WeatherSummary {
    fn from(raw: RawWeather) -> Self {
        Self {
            base: raw.base,
            weather: raw.weather,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedSummary {
    #[serde(rename = "userRepo")]
    pub user_repo: Vec<RepositorySummary>,
    #[serde(rename = "weatherData")]
    pub weather_data: WeatherSummary,
}

/// What the gateway reports back about an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub filename: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repository_summary_drops_unknown_fields() {
        let raw: RawRepository = serde_json::from_value(json!({
            "id": 42,
            "node_id": "R_kgDO",
            "name": "hello",
            "full_name": "octo/hello",
            "private": false,
            "forks_url": "https://api.github.com/repos/octo/hello/forks"
        }))
        .unwrap();

        let summary = RepositorySummary::from(raw);
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(
            value,
            json!({ "id": 42, "name": "hello", "full_name": "octo/hello" })
        );
    }

    #[test]
    fn raw_repository_preserves_unknown_fields() {
        let input = json!({
            "id": 7,
            "name": "r",
            "full_name": "u/r",
            "stargazers_count": 3,
            "owner": { "login": "u" }
        });

        let raw: RawRepository = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&raw).unwrap(), input);
    }

    #[test]
    fn raw_repository_requires_id() {
        let res: Result<RawRepository, _> =
            serde_json::from_value(json!({ "name": "r", "full_name": "u/r" }));
        assert!(res.is_err());
    }

    #[test]
    fn raw_weather_requires_base_and_conditions() {
        let missing_base = serde_json::from_value::<RawWeather>(json!({
            "weather": [],
            "name": "Mumbai"
        }));
        assert!(missing_base.is_err());

        let missing_weather = serde_json::from_value::<RawWeather>(json!({
            "base": "stations",
            "name": "Mumbai"
        }));
        assert!(missing_weather.is_err());
    }

    #[test]
    fn combined_summary_uses_camel_case_keys() {
        let summary = CombinedSummary {
            user_repo: vec![],
            weather_data: WeatherSummary {
                base: "stations".into(),
                weather: vec![],
            },
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("userRepo").is_some());
        assert!(value.get("weatherData").is_some());
    }

    #[test]
    fn summary_query_reads_camel_case_params() {
        let q: SummaryQuery = serde_json::from_value(json!({
            "username": "octo",
            "page": "2",
            "perPage": "5",
            "city": "Oslo"
        }))
        .unwrap();

        assert_eq!(q.repos.per_page, "5");
        assert_eq!(q.city, "Oslo");
        assert!(q.validate().is_ok());
    }

    #[test]
    fn empty_params_fail_validation() {
        let q = RepoQuery {
            username: String::new(),
            page: "1".into(),
            per_page: "10".into(),
        };

        assert!(q.validate().is_err());
    }
}
