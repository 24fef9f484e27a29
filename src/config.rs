//! Startup configuration.
//!
//! Values come from the process environment, optionally layered over a TOML
//! settings file. The Mealie base URL and API key are required; there is no
//! fallback for either, so a misconfigured server refuses to start instead of
//! talking to the wrong instance.
//!
//! ```toml
//! [mealie]
//! base_url = "https://mealie.example.com"
//! api_key = "..."
//! timeout_secs = 30
//!
//! [server]
//! transport = "stdio"
//! bind = "127.0.0.1:3001"
//! ```

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::client::auth::ApiKey;
use crate::error::{MealieError, Result};

pub const BASE_URL_VAR: &str = "MEALIE_BASE_URL";
pub const API_KEY_VAR: &str = "MEALIE_API_KEY";
pub const TIMEOUT_VAR: &str = "MEALIE_TIMEOUT_SECS";
pub const SETTINGS_PATH_VAR: &str = "MEALIE_MCP_CONFIG";
pub const TRANSPORT_VAR: &str = "MCP_TRANSPORT";
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";

pub const DEFAULT_SETTINGS_FILE: &str = "mealie-mcp.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
    Sse,
}

impl FromStr for Transport {
    type Err = MealieError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "sse" => Ok(Self::Sse),
            other => Err(MealieError::config(format!(
                "{TRANSPORT_VAR} must be 'stdio' or 'sse', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => f.write_str("stdio"),
            Self::Sse => f.write_str("sse"),
        }
    }
}

/// On-disk settings. Every field is optional; the environment fills gaps and
/// overrides whatever is set here.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub mealie: MealieSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MealieSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerSection {
    pub transport: Option<String>,
    pub bind: Option<String>,
}

impl SettingsFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MealieError::config(format!("Invalid settings file: {e}")))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MealieError::config(format!(
                "Failed to read settings file {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&content)
    }

    /// Finds the settings file: an explicit `MEALIE_MCP_CONFIG` path, which
    /// must exist, or `./mealie-mcp.toml` when present.
    pub fn discover(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        if let Some(path) = non_blank(lookup(SETTINGS_PATH_VAR)) {
            tracing::debug!("Loading settings from {}", path);
            return Self::from_path(Path::new(&path)).map(Some);
        }

        let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
        if default_path.is_file() {
            tracing::debug!("Loading settings from {}", default_path.display());
            return Self::from_path(&default_path).map(Some);
        }

        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct MealieConfig {
    pub base_url: Url,
    pub api_key: ApiKey,
    pub timeout: Duration,
    pub transport: Transport,
    pub bind_addr: SocketAddr,
}

impl MealieConfig {
    /// Loads configuration from the process environment and the discovered
    /// settings file.
    pub fn load() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let settings = SettingsFile::discover(lookup)?;
        Self::from_sources(lookup, settings.unwrap_or_default())
    }

    /// Resolves configuration from an environment lookup layered over a
    /// settings file.
    pub fn from_sources(
        lookup: impl Fn(&str) -> Option<String>,
        settings: SettingsFile,
    ) -> Result<Self> {
        let SettingsFile { mealie, server } = settings;

        let base_url = non_blank(lookup(BASE_URL_VAR))
            .or_else(|| non_blank(mealie.base_url))
            .ok_or_else(|| MealieError::config(format!("{BASE_URL_VAR} must be set")))?;
        let api_key = non_blank(lookup(API_KEY_VAR))
            .or_else(|| non_blank(mealie.api_key))
            .ok_or_else(|| MealieError::config(format!("{API_KEY_VAR} must be set")))?;

        let timeout_secs = match non_blank(lookup(TIMEOUT_VAR)) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                MealieError::config(format!(
                    "{TIMEOUT_VAR} must be a positive integer, got '{raw}'"
                ))
            })?,
            None => mealie.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(MealieError::config(format!(
                "{TIMEOUT_VAR} must be a positive integer"
            )));
        }

        let transport = match non_blank(lookup(TRANSPORT_VAR)).or(server.transport) {
            Some(raw) => raw.parse()?,
            None => Transport::default(),
        };

        let bind = non_blank(lookup(BIND_ADDR_VAR))
            .or(server.bind)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.trim().parse::<SocketAddr>().map_err(|e| {
            MealieError::config(format!(
                "{BIND_ADDR_VAR} is not a valid socket address '{bind}': {e}"
            ))
        })?;

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            api_key: ApiKey::new(api_key),
            timeout: Duration::from_secs(timeout_secs),
            transport,
            bind_addr,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| {
            MealieError::config(format!("{BASE_URL_VAR} is not a valid URL '{raw}': {e}"))
        })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(MealieError::config(format!(
            "{BASE_URL_VAR} must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(MealieError::config(format!("{BASE_URL_VAR} has no host: '{raw}'")));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_required_values_with_defaults() {
        let config = MealieConfig::from_sources(
            env(&[
                (BASE_URL_VAR, "https://mealie.example.com"),
                (API_KEY_VAR, "secret"),
            ]),
            SettingsFile::default(),
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://mealie.example.com/");
        assert_eq!(config.api_key.expose(), "secret");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.transport, Transport::Stdio);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3001");
    }

    #[test]
    fn missing_base_url_is_an_error() {
        let err = MealieConfig::from_sources(
            env(&[(API_KEY_VAR, "secret")]),
            SettingsFile::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MealieError::Config { .. }));
        assert!(err.to_string().contains(BASE_URL_VAR));
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let err = MealieConfig::from_sources(
            env(&[(BASE_URL_VAR, "http://localhost:9000"), (API_KEY_VAR, "   ")]),
            SettingsFile::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn rejects_malformed_and_non_http_urls() {
        for bad in ["not a url", "ftp://mealie.example.com", "mealie.example.com"] {
            let result = MealieConfig::from_sources(
                env(&[(BASE_URL_VAR, bad), (API_KEY_VAR, "secret")]),
                SettingsFile::default(),
            );
            assert!(
                matches!(result, Err(MealieError::Config { .. })),
                "expected config error for {bad}"
            );
        }
    }

    #[test]
    fn environment_overrides_settings_file() {
        let settings = SettingsFile::parse(
            r#"
            [mealie]
            base_url = "http://file.local:9000"
            api_key = "from-file"
            timeout_secs = 5

            [server]
            transport = "sse"
            bind = "0.0.0.0:4000"
            "#,
        )
        .unwrap();

        let config = MealieConfig::from_sources(
            env(&[(API_KEY_VAR, "from-env"), (TIMEOUT_VAR, "12")]),
            settings,
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://file.local:9000/");
        assert_eq!(config.api_key.expose(), "from-env");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.transport, Transport::Sse);
        assert_eq!(config.bind_addr.port(), 4000);
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        for bad in ["0", "soon"] {
            let result = MealieConfig::from_sources(
                env(&[
                    (BASE_URL_VAR, "http://localhost:9000"),
                    (API_KEY_VAR, "secret"),
                    (TIMEOUT_VAR, bad),
                ]),
                SettingsFile::default(),
            );
            assert!(result.is_err(), "timeout '{bad}' should be rejected");
        }
    }

    #[test]
    fn rejects_unknown_transport() {
        let result = MealieConfig::from_sources(
            env(&[
                (BASE_URL_VAR, "http://localhost:9000"),
                (API_KEY_VAR, "secret"),
                (TRANSPORT_VAR, "websocket"),
            ]),
            SettingsFile::default(),
        );
        assert!(matches!(result, Err(MealieError::Config { .. })));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = SettingsFile::parse("[mealie\nbase_url = ").unwrap_err();
        assert!(matches!(err, MealieError::Config { .. }));
    }
}
