use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use calm_core::session::{DEFAULT_BREATH_TICKS, SessionSettings};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name} value: {raw}")]
    Invalid { name: &'static str, raw: String },
}

/// Runtime settings read from the environment. Command-line flags override
/// them in `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    /// Base URL of a running server; when unset the terminal client calls
    /// the model directly.
    pub endpoint: Option<String>,
    pub breath_ticks: u32,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when `CALM_BIND` or `CALM_BREATH_TICKS` do not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = parse_bind(&lookup("CALM_BIND").unwrap_or_else(|| DEFAULT_BIND.into()))?;
        let endpoint = lookup("CALM_ENDPOINT").filter(|value| !value.trim().is_empty());
        let breath_ticks = match lookup("CALM_BREATH_TICKS") {
            Some(raw) => parse_ticks(&raw)?,
            None => DEFAULT_BREATH_TICKS,
        };
        Ok(Self {
            bind,
            endpoint,
            breath_ticks,
        })
    }

    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::with_breath_ticks(self.breath_ticks)
    }
}

/// # Errors
///
/// Returns `ConfigError::Invalid` for anything but `host:port`.
pub fn parse_bind(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name: "bind address",
        raw: raw.to_string(),
    })
}

/// # Errors
///
/// Returns `ConfigError::Invalid` unless `raw` is a positive integer.
pub fn parse_ticks(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(ticks) if ticks > 0 => Ok(ticks),
        _ => Err(ConfigError::Invalid {
            name: "breath ticks",
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_variables() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.endpoint, None);
        assert_eq!(config.breath_ticks, DEFAULT_BREATH_TICKS);
    }

    #[test]
    fn variables_override_defaults() {
        let config = AppConfig::from_lookup(|name| match name {
            "CALM_BIND" => Some("0.0.0.0:8080".into()),
            "CALM_ENDPOINT" => Some("http://localhost:8080".into()),
            "CALM_BREATH_TICKS" => Some("2".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.session_settings().breath_ticks(), 2);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(parse_ticks("0").is_err());
        assert!(parse_ticks("four").is_err());
        assert!(parse_bind("localhost").is_err());
        let err = AppConfig::from_lookup(|name| (name == "CALM_BREATH_TICKS").then(|| "-1".into()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "breath ticks",
                raw: "-1".into()
            }
        );
    }
}
