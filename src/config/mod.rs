use anyhow::{Context, Result};
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Captions provider settings
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the YouTube front end
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Value of the Accept-Language header
    pub accept_language: String,

    /// Request timeout in seconds (no timeout if unset)
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US".to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the usual locations, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        let Some(path) = path else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Self::default());
        };

        tracing::debug!("Loading config from {}", path.display());
        Self::from_file(&path)
    }

    /// Parse and validate a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// First existing config file: current directory, then the user config directory
    fn discover() -> Option<PathBuf> {
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("youtube-transcript-tool").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.provider.base_url)
            .with_context(|| format!("Invalid provider base_url: {}", self.provider.base_url))?;

        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("Provider base_url must use HTTP or HTTPS protocol");
        }

        if HeaderValue::from_str(&self.provider.accept_language).is_err() {
            anyhow::bail!(
                "Provider accept_language is not a valid header value: {:?}",
                self.provider.accept_language
            );
        }

        if self.provider.timeout_secs == Some(0) {
            anyhow::bail!("Provider timeout_secs must be greater than zero");
        }

        Ok(())
    }
}
