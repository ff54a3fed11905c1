//! Runtime settings for drterp.
//!
//! Settings come from three layers, later layers winning:
//! - defaults embedded at compile time from `config/default.toml`
//! - an optional user file (`<config dir>/drterp/config.toml` or an explicit path)
//! - the `DRTERP_API_BASE` environment variable, for the API base address only

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::catalog::CatalogSource;

/// Defaults embedded in the binary at compile time.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable that overrides `api_base`.
pub const API_BASE_ENV: &str = "DRTERP_API_BASE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Base address of the professor/grades API, without a trailing slash.
    pub api_base: String,
    /// Base address of the public professor pages (`<base>/<slug>`).
    pub profile_page_base: String,
    /// Catalog document location: an `http(s)://` URL or a local path.
    pub catalog: String,
    pub requests_per_second: f64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Partial settings as read from a user file. Missing keys keep the defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_base: Option<String>,
    profile_page_base: Option<String>,
    catalog: Option<String>,
    requests_per_second: Option<f64>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl Config {
    /// Load defaults, then the user config file if one exists, then the
    /// environment override.
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => load_config(&path)?,
            _ => default_config(),
        };
        config = config.with_api_base_override(std::env::var(API_BASE_ENV).ok().as_deref());
        config.validate()?;
        Ok(config)
    }

    /// Replace `api_base` when an override value is present and non-empty.
    pub fn with_api_base_override(mut self, value: Option<&str>) -> Self {
        if let Some(base) = value.map(str::trim).filter(|v| !v.is_empty()) {
            info!("Using API base override: {}", base);
            self.api_base = base.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("api_base", &self.api_base),
            ("profile_page_base", &self.profile_page_base),
        ] {
            let url = Url::parse(value).with_context(|| format!("Invalid {}: '{}'", key, value))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                bail!("{} must use http or https, got '{}'", key, url.scheme());
            }
        }
        if !(self.requests_per_second > 0.0) {
            bail!(
                "requests_per_second must be positive, got {}",
                self.requests_per_second
            );
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        if self.catalog.trim().is_empty() {
            bail!("catalog location cannot be empty");
        }
        Ok(())
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(v) = file.api_base {
            self.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = file.profile_page_base {
            self.profile_page_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = file.catalog {
            self.catalog = v;
        }
        if let Some(v) = file.requests_per_second {
            self.requests_per_second = v;
        }
        if let Some(v) = file.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = file.user_agent {
            self.user_agent = v;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        default_config()
    }
}

/// Get the defaults embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a compile-time bug).
pub fn default_config() -> Config {
    toml::from_str(DEFAULT_CONFIG).expect("embedded config/default.toml must be valid TOML")
}

/// Load a user config file, layering its keys over the embedded defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    let config = default_config().merge(file);
    if let Err(e) = config.validate() {
        warn!("Rejected config file {:?}: {}", path, e);
        return Err(e);
    }
    info!("Loaded config from {:?}", path);
    Ok(config)
}

/// `<platform config dir>/drterp/config.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("drterp").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = default_config();
        assert_eq!(config.api_base, "https://planetterp.com/api/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_user_file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base = \"http://localhost:8080/api/\"").unwrap();
        writeln!(file, "timeout_secs = 3").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/api");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.user_agent, default_config().user_agent);
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base = \"ftp://example.com\"").unwrap();
        assert!(load_config(file.path()).is_err());

        let mut config = default_config();
        config.api_base = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        let mut config = default_config();
        config.requests_per_second = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_base_override() {
        let config = default_config().with_api_base_override(Some("http://127.0.0.1:9000/v1/"));
        assert_eq!(config.api_base, "http://127.0.0.1:9000/v1");

        let unchanged = default_config().with_api_base_override(Some("   "));
        assert_eq!(unchanged.api_base, default_config().api_base);

        let unchanged = default_config().with_api_base_override(None);
        assert_eq!(unchanged, default_config());
    }
}
