// src/config.rs

use color_eyre::eyre::{Result, WrapErr, bail};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::core::probe_client::with_trailing_slash;
use crate::logging::{PROJECT_NAME, project_directory};

lazy_static! {
    pub static ref BASE_URL_ENV: String = format!("{}_BASE_URL", PROJECT_NAME.clone());
    pub static ref PROBE_TIMEOUT_ENV: String = format!("{}_PROBE_TIMEOUT_SECS", PROJECT_NAME.clone());
    pub static ref MAX_CONCURRENCY_ENV: String = format!("{}_MAX_CONCURRENCY", PROJECT_NAME.clone());
    pub static ref USER_AGENT_ENV: String = format!("{}_USER_AGENT", PROJECT_NAME.clone());
}

pub const CONFIG_FILE: &str = "config.json";

/// Settings for reaching the remote scanning service and running probes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScannerConfig {
    /// Root of the scanning service; endpoints live at `<base_url><category>/<scan-id>`.
    pub base_url: Url,
    /// Per-probe deadline in seconds. `0` disables it.
    pub probe_timeout_secs: u64,
    /// TCP connect timeout in seconds for the service client. Must be at least 1.
    pub connect_timeout_secs: u64,
    /// How many probes of one category may be in flight at once.
    pub max_concurrency: usize,
    pub user_agent: String,
    /// Dork strings sent with the `google-dork` recon probe.
    pub google_dorks: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:3001/").expect("default base url is valid"),
            probe_timeout_secs: 60,
            connect_timeout_secs: 10,
            max_concurrency: 4,
            user_agent: "VanguardRS/0.1".to_string(),
            google_dorks: Vec::new(),
        }
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

impl ScannerConfig {
    /// Defaults, then `config.json` from the config directory, then the environment.
    pub fn load() -> Result<Self> {
        let path = get_config_dir().join(CONFIG_FILE);
        let mut config = if path.exists() { Self::from_file(&path)? } else { Self::default() };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        info!(base_url = %config.base_url, "Scanner configuration loaded.");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading scanner configuration file.");
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .wrap_err_with(|| format!("failed to parse config file {}", path.display()))
    }

    /// Overrides fields from environment variables, looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(BASE_URL_ENV.as_str()) {
            self.set_base_url(&raw)?;
        }
        if let Some(raw) = lookup(PROBE_TIMEOUT_ENV.as_str()) {
            self.probe_timeout_secs = raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("{} must be a number of seconds", *PROBE_TIMEOUT_ENV))?;
        }
        if let Some(raw) = lookup(MAX_CONCURRENCY_ENV.as_str()) {
            self.max_concurrency = raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("{} must be a positive integer", *MAX_CONCURRENCY_ENV))?;
        }
        if let Some(raw) = lookup(USER_AGENT_ENV.as_str()) {
            self.user_agent = raw;
        }
        Ok(())
    }

    /// Parses `raw` as the service root, keeping any path prefix for later joins.
    pub fn set_base_url(&mut self, raw: &str) -> Result<()> {
        let url = Url::parse(raw).wrap_err_with(|| format!("invalid base url {raw:?}"))?;
        self.base_url = with_trailing_slash(url);
        Ok(())
    }

    /// Checks invariants and normalizes the base url so relative joins keep its path.
    pub fn validate(&mut self) -> Result<()> {
        if self.max_concurrency == 0 {
            bail!("max_concurrency must be at least 1");
        }
        if self.connect_timeout_secs == 0 {
            bail!("connect_timeout_secs must be at least 1");
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            bail!("base url must be http or https, got {}", self.base_url);
        }
        self.base_url = with_trailing_slash(self.base_url.clone());
        Ok(())
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        (self.probe_timeout_secs > 0).then(|| Duration::from_secs(self.probe_timeout_secs))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_service() {
        let config = ScannerConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:3001/");
        assert_eq!(config.probe_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.max_concurrency, 4);
    }

    #[test]
    fn environment_overrides_fields() {
        let mut config = ScannerConfig::default();
        config
            .apply_env(env(&[
                ("VANGUARD_ORCHESTRATOR_BASE_URL", "https://scanner.internal:8443/api"),
                ("VANGUARD_ORCHESTRATOR_PROBE_TIMEOUT_SECS", "0"),
                ("VANGUARD_ORCHESTRATOR_MAX_CONCURRENCY", " 8 "),
            ]))
            .unwrap();
        config.validate().unwrap();

        assert_eq!(config.base_url.as_str(), "https://scanner.internal:8443/api/");
        assert_eq!(config.probe_timeout(), None);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.base_url.join("recon/whois").unwrap().path(), "/api/recon/whois");
    }

    #[test]
    fn bad_environment_values_are_rejected() {
        let mut config = ScannerConfig::default();
        assert!(config.apply_env(env(&[("VANGUARD_ORCHESTRATOR_MAX_CONCURRENCY", "many")])).is_err());
        assert!(config.apply_env(env(&[("VANGUARD_ORCHESTRATOR_BASE_URL", "not a url")])).is_err());
    }

    #[test]
    fn zero_concurrency_fails_validation() {
        let mut config = ScannerConfig { max_concurrency: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_connect_timeout_fails_validation() {
        let mut config = ScannerConfig { connect_timeout_secs: 0, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "connect_timeout_secs must be at least 1");
    }

    #[test]
    fn base_url_keeps_its_path_prefix_without_validation() {
        let mut config = ScannerConfig::default();
        config.set_base_url("http://scanner.internal/api").unwrap();

        assert_eq!(config.base_url.as_str(), "http://scanner.internal/api/");
        assert_eq!(config.base_url.join("network/nmap-scan").unwrap().path(), "/api/network/nmap-scan");
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = std::env::temp_dir().join(format!("vanguard-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, r#"{"google_dorks": ["site:example.com ext:sql"], "max_concurrency": 2}"#).unwrap();

        let config = ScannerConfig::from_file(&path).unwrap();

        assert_eq!(config.google_dorks, vec!["site:example.com ext:sql".to_string()]);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.user_agent, "VanguardRS/0.1");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
