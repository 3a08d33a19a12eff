use serde::Deserialize;

use crate::engine::EngineAuth;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub overview: OverviewConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    4000
}

/// Engine API endpoint and credentials. At most one auth mode is used, see [`EngineConfig::auth`].
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub base_url: String,
    /// Preshared, already base64-encoded `user:password` token.
    pub basic_auth: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bearer_token: Option<String>,
    /// Accept self-signed / invalid TLS certificates.
    #[serde(default)]
    pub allow_insecure: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            basic_auth: None,
            username: None,
            password: None,
            bearer_token: None,
            allow_insecure: false,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl EngineConfig {
    /// Resolve the auth mode: preshared token, then username + password, then bearer token.
    pub fn auth(&self) -> Option<EngineAuth> {
        if let Some(token) = non_empty(&self.basic_auth) {
            return Some(EngineAuth::Preshared(token.to_string()));
        }
        if let (Some(username), Some(password)) =
            (non_empty(&self.username), non_empty(&self.password))
        {
            return Some(EngineAuth::Credentials {
                username: username.to_string(),
                password: password.to_string(),
            });
        }
        non_empty(&self.bearer_token).map(|token| EngineAuth::Bearer(token.to_string()))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverviewConfig {
    /// Disk capacity in GB reported as `hostStats.diskTotal` instead of the usage-based estimate.
    pub disk_total_gb: Option<f64>,
}

impl AppConfig {
    /// Load from `CONFIG_FILE` (default `config.toml`, optional), then apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let mut config: AppConfig = match std::fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path, "no config file, using defaults");
                AppConfig::default()
            }
            Err(e) => return Err(anyhow::anyhow!("reading {}: {}", path, e)),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment-style variables. `lookup` returns the value for a key.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DOCKER_API_BASE") {
            self.engine.base_url = v;
        }
        if let Some(v) = lookup("DOCKER_API_BASIC_AUTH") {
            self.engine.basic_auth = Some(v);
        }
        if let Some(v) = lookup("DOCKER_API_USERNAME") {
            self.engine.username = Some(v);
        }
        if let Some(v) = lookup("DOCKER_API_PASSWORD") {
            self.engine.password = Some(v);
        }
        if let Some(v) = lookup("DOCKER_API_BEARER_TOKEN") {
            self.engine.bearer_token = Some(v);
        }
        if let Some(v) = lookup("DOCKER_API_ALLOW_INSECURE") {
            self.engine.allow_insecure = matches!(v.trim(), "1" | "true" | "TRUE" | "yes");
        }
        if let Some(v) = lookup("HOST_DISK_TOTAL_GB") {
            let gb: f64 = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("HOST_DISK_TOTAL_GB must be a number: {}", e))?;
            self.overview.disk_total_gb = Some(gb);
        }
        if let Some(v) = lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a port number: {}", e))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.engine.base_url.is_empty(),
            "engine.base_url must be set (or DOCKER_API_BASE)"
        );
        anyhow::ensure!(
            self.engine.base_url.starts_with("http://")
                || self.engine.base_url.starts_with("https://"),
            "engine.base_url must start with http:// or https://, got {}",
            self.engine.base_url
        );
        anyhow::ensure!(
            self.engine.request_timeout_secs > 0,
            "engine.request_timeout_secs must be > 0, got {}",
            self.engine.request_timeout_secs
        );
        let engine = &self.engine;
        anyhow::ensure!(
            non_empty(&engine.username).is_some() == non_empty(&engine.password).is_some()
                || non_empty(&engine.basic_auth).is_some()
                || non_empty(&engine.bearer_token).is_some(),
            "engine.username and engine.password must be set together"
        );
        if let Some(gb) = self.overview.disk_total_gb {
            anyhow::ensure!(
                gb.is_finite() && gb > 0.0,
                "overview.disk_total_gb must be > 0, got {}",
                gb
            );
        }
        Ok(())
    }
}
