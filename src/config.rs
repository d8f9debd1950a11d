//! Process-wide configuration, read once at startup

use serde::Serialize;
use std::time::Duration;
use log::debug;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: usize = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Immutable proxy configuration
#[derive(Debug, Clone, Serialize)]
pub struct ProxyConfig
{   /// Upstream API key; requests fail while this is absent
    #[serde(skip_serializing)]
    pub api_key: Option<String>
  , /// Upstream API base URL
    pub api_base: String
  , /// Per-attempt deadline in milliseconds
    pub timeout_ms: u64
  , /// Extra attempts after the first one
    pub max_retries: usize
  , /// Linear backoff unit in milliseconds
    pub retry_base_delay_ms: u64
  , /// Listen address for the HTTP server
    pub bind_addr: String
}

impl Default for ProxyConfig
{   fn default() -> Self
    {   ProxyConfig
        {   api_key: None
          , api_base: DEFAULT_API_BASE.to_string()
          , timeout_ms: DEFAULT_TIMEOUT_MS
          , max_retries: DEFAULT_MAX_RETRIES
          , retry_base_delay_ms: DEFAULT_RETRY_DELAY_MS
          , bind_addr: DEFAULT_BIND_ADDR.to_string()
        }
    }
}

impl ProxyConfig
{   /// Load from the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_env_with<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   let defaults = ProxyConfig::default();

        let api_key = lookup("OPENAI_API_KEY")
          .map(|k| k.trim().to_string())
          .filter(|k| !k.is_empty());

        let config = ProxyConfig
        {   api_key
          , api_base: lookup("OPENAI_API_BASE")
              .filter(|v| !v.trim().is_empty())
              .map(|v| v.trim().trim_end_matches('/').to_string())
              .unwrap_or(defaults.api_base)
          , timeout_ms: parse_var(
              &lookup, "OPENAI_TIMEOUT", defaults.timeout_ms
            )?
          , max_retries: parse_var(
              &lookup, "OPENAI_MAX_RETRIES", defaults.max_retries
            )?
          , retry_base_delay_ms: parse_var(
              &lookup,
              "OPENAI_RETRY_DELAY_MS",
              defaults.retry_base_delay_ms
            )?
          , bind_addr: lookup("BIND_ADDR")
              .filter(|v| !v.trim().is_empty())
              .unwrap_or(defaults.bind_addr)
        };

        debug!(
          "Loaded config: base={} timeout={}ms retries={} key={}",
          config.api_base,
          config.timeout_ms,
          config.max_retries,
          if config.api_key.is_some() { "set" } else { "missing" }
        );
        Ok(config)
    }

    pub fn timeout(&self) -> Duration
    {   Duration::from_millis(self.timeout_ms)
    }

    pub fn has_api_key(&self) -> bool
    {   self.api_key.is_some()
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T)
  -> Result<T, crate::error::Error>
where F: Fn(&str) -> Option<String>
    , T: std::str::FromStr
{   match lookup(name)
    {   None => Ok(default)
      , Some(raw) if raw.trim().is_empty() => Ok(default)
      , Some(raw) => raw.trim().parse().map_err(|_| {
          crate::error::Error::InvalidConfiguration(
            format!("{} is not a valid number: {:?}", name, raw)
          )
        })
    }
}
