//! Process configuration read from the environment. `main` loads `.env` first.
//!
//! | Variable                | Default                        |
//! |-------------------------|--------------------------------|
//! | `SECRET_KEY`            | random per process             |
//! | `NLPCLOUD_API_KEY`      | unset                          |
//! | `NLPCLOUD_MODEL`        | `finetuned-llama-3-70b`        |
//! | `NLPCLOUD_GPU`          | `true`                         |
//! | `NLPCLOUD_LANG`         | unset                          |
//! | `NLPCLOUD_BASE_URL`     | `https://api.nlpcloud.io/v1`   |
//! | `NLPDESK_HTTP_ADDR`     | `127.0.0.1:5000`               |
//! | `SESSION_TTL_SECS`      | `86400` (`0` = never expires)  |
//! | `SESSION_COOKIE_SECURE` | `false`                        |

use std::net::SocketAddr;
use std::time::Duration;

use crate::nlp::NlpCloudConfig;

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub http_addr: SocketAddr,
    /// `None` means a random key is generated at startup.
    pub secret_key: Option<String>,
    pub session_ttl: Option<Duration>,
    pub cookie_secure: bool,
    pub nlp: NlpCloudConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("http_addr", &self.http_addr)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<set>"))
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("nlp", &self.nlp)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            secret_key: None,
            session_ttl: Some(Duration::from_secs(DEFAULT_SESSION_TTL_SECS)),
            cookie_secure: false,
            nlp: NlpCloudConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable source; empty strings count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        let mut cfg = Config::default();

        if let Some(v) = get("NLPDESK_HTTP_ADDR") {
            cfg.http_addr = v.trim().parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "NLPDESK_HTTP_ADDR", value: v.clone(), reason: e.to_string(),
            })?;
        }
        cfg.secret_key = get("SECRET_KEY");
        if let Some(v) = get("SESSION_TTL_SECS") {
            let secs: u64 = v.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "SESSION_TTL_SECS", value: v.clone(), reason: e.to_string(),
            })?;
            cfg.session_ttl = if secs == 0 { None } else { Some(Duration::from_secs(secs)) };
        }
        if let Some(v) = get("SESSION_COOKIE_SECURE") {
            cfg.cookie_secure = parse_bool("SESSION_COOKIE_SECURE", &v)?;
        }

        cfg.nlp.api_key = get("NLPCLOUD_API_KEY");
        if let Some(v) = get("NLPCLOUD_MODEL") { cfg.nlp.model = v.trim().to_string(); }
        if let Some(v) = get("NLPCLOUD_GPU") { cfg.nlp.gpu = parse_bool("NLPCLOUD_GPU", &v)?; }
        cfg.nlp.lang = get("NLPCLOUD_LANG").map(|v| v.trim().to_string());
        if let Some(v) = get("NLPCLOUD_BASE_URL") { cfg.nlp.base_url = v.trim().trim_end_matches('/').to_string(); }

        Ok(cfg)
    }
}

fn parse_bool(var: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value: v.to_string(), reason: "expected a boolean".into() }),
    }
}
