use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url, header::ACCEPT};
use tracing::{debug, error, info};

use crate::{RawRepository, RepoQuery, UpstreamFetchError};

use super::{ProviderId, RepositoryProvider, parse_base_url, truncate_body};

#[derive(Debug, Clone)]
pub struct GitHubProvider {
    base_url: Url,
    http: Client,
}

impl GitHubProvider {
    pub fn new(base_url: &str, http: Client) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            http,
        })
    }

    /// `{base}/users/{username}/repos`, with `username` as one encoded path segment.
    fn repos_url(&self, username: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("GitHub base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        Ok(url)
    }

    async fn fetch(&self, query: &RepoQuery) -> Result<Vec<RawRepository>> {
        let url = self.repos_url(&query.username)?;

        let res = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .query(&[
                ("page", query.page.as_str()),
                ("per_page", query.per_page.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to GitHub (user repos)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read GitHub user repos response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "GitHub user repos request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let repos: Vec<RawRepository> =
            serde_json::from_str(&body).context("Failed to parse GitHub user repos JSON")?;

        Ok(repos)
    }
}

#[async_trait]
impl RepositoryProvider for GitHubProvider {
    async fn fetch_user_repos(
        &self,
        query: &RepoQuery,
    ) -> Result<Vec<RawRepository>, UpstreamFetchError> {
        info!(
            username = %query.username,
            page = %query.page,
            per_page = %query.per_page,
            "Fetching GitHub repositories"
        );

        match self.fetch(query).await {
            Ok(repos) => {
                debug!(count = repos.len(), "GitHub repositories fetched");
                Ok(repos)
            }
            Err(err) => {
                error!(provider = ProviderId::GitHub.as_str(), "Upstream fetch failed: {err:#}");
                Err(UpstreamFetchError::new(ProviderId::GitHub, err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> GitHubProvider {
        GitHubProvider::new(base, Client::new()).unwrap()
    }

    #[test]
    fn repos_url_appends_user_path() {
        let url = provider("https://api.github.com").repos_url("octocat").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/octocat/repos");
    }

    #[test]
    fn repos_url_keeps_base_path_prefix() {
        let url = provider("http://localhost:8080/github/").repos_url("octocat").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/github/users/octocat/repos");
    }

    #[test]
    fn repos_url_encodes_username() {
        let url = provider("https://api.github.com").repos_url("a/b c").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb%20c/repos");
    }
}
