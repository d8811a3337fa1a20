//! Server configuration loaded from the environment (and `.env`).

use crate::errors::ConfigError;
use crate::services::node_manager::LndConnection;
use crate::services::resume::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub jwt_secret: String,
    /// Registry key of the configured node, matched against token claims
    pub node_id: String,
    pub lnd: LndConnection,
    pub invoice_page_size: u64,
    pub rate_limit_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            node_id: lookup("LND_NODE_ID").unwrap_or_else(|| "default".to_string()),
            lnd: LndConnection {
                address: required("LND_ADDRESS")?,
                cert: expand_path(&required("LND_CERT_PATH")?),
                macaroon: expand_path(&required("LND_MACAROON_PATH")?),
            },
            invoice_page_size: parse_or(
                "INVOICE_PAGE_SIZE",
                lookup("INVOICE_PAGE_SIZE"),
                DEFAULT_PAGE_SIZE,
            )?,
            rate_limit_per_minute: parse_or(
                "RATE_LIMIT_PER_MINUTE",
                lookup("RATE_LIMIT_PER_MINUTE"),
                60,
            )?,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = value else {
        return Ok(default);
    };
    let parsed = raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })?;
    if parsed == T::default() {
        return Err(ConfigError::Invalid {
            key,
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}

fn expand_path(path: &str) -> PathBuf {
    expanduser::expanduser(path).unwrap_or_else(|_| PathBuf::from(path))
}
