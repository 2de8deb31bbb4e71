use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DOTENV_FILE: &str = ".env";

/// Process-wide configuration, built once at startup and handed to the
/// providers. Nothing below reads the environment on its own.
///
/// Example TOML:
/// ```toml
/// port = 3000
/// api_key = "..."
/// github_api_url = "https://api.github.com"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,

    /// OpenWeather API key. Weather endpoints fail without it.
    pub api_key: Option<String>,

    pub github_api_url: String,
    pub openweather_api_url: String,

    /// Per-request timeout for upstream calls.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            openweather_api_url: DEFAULT_OPENWEATHER_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (platform default or `path`), then apply
    /// overrides from `./.env` and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_dotenv(path, Path::new(DOTENV_FILE))
    }

    /// Like [`Config::load`], reading dotenv entries from `dotenv`.
    /// Real environment variables win over dotenv entries.
    pub fn load_with_dotenv(path: Option<&Path>, dotenv: &Path) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        let dotenv_vars = read_dotenv(dotenv)?;
        let mut cfg = Self::from_file(&path)?;
        cfg.apply_env(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| dotenv_vars.get(key).cloned())
        })?;
        Ok(cfg)
    }

    /// Read a TOML config file, or return defaults if it doesn't exist yet.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(cfg)
    }

    /// Override fields from environment-style lookups
    /// (`PORT`, `API_KEY`, `GITHUB_API_URL`, `OPENWEATHER_API_URL`, `UPSTREAM_TIMEOUT_SECS`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value '{port}'"))?;
        }

        if let Some(key) = lookup("API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }

        if let Some(url) = lookup("GITHUB_API_URL") {
            self.github_api_url = url;
        }

        if let Some(url) = lookup("OPENWEATHER_API_URL") {
            self.openweather_api_url = url;
        }

        if let Some(secs) = lookup("UPSTREAM_TIMEOUT_SECS") {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid UPSTREAM_TIMEOUT_SECS value '{secs}'"))?;
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "summary-gateway", "gateway")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Copy suitable for printing: the API key is masked.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

/// Entries of a dotenv file; a missing file has none.
fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read dotenv file: {}", path.display()))?
        .collect::<Result<HashMap<_, _>, _>>()
        .with_context(|| format!("Failed to parse dotenv file: {}", path.display()))
}
