//! Process configuration, read once at startup and passed by reference.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use svcamount_registry::{DEFAULT_SERVICES, SERVICES_ENV};
use svcamount_resolver::HiveDatabaseFormat;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Base URL of the remote amount service. Required.
pub const BASE_URL_ENV: &str = "HADOOP_AMOUNT_BASEURL";
/// Layout of the `Hive_Database` credential (`plain` or `composite`).
pub const HIVE_FORMAT_ENV: &str = "SVCAMOUNT_HIVE_FORMAT";
/// Timeout, in seconds, for calls to the amount service.
pub const TIMEOUT_ENV: &str = "SVCAMOUNT_TIMEOUT_SECS";
/// Address the HTTP server listens on.
pub const BIND_ENV: &str = "SVCAMOUNT_BIND";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Hostnames that may keep a plain `http` scheme for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be specified")]
    MissingVar { name: &'static str },

    #[error("invalid amount service base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue { name: &'static str, value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AmountConfig {
    /// Normalized base URL, without a trailing slash
    pub base_url: String,
    pub hive_format: HiveDatabaseFormat,
    /// Raw service list, see `svcamount_registry::ServiceRegistry::parse`
    pub services: String,
    pub request_timeout: Duration,
    pub bind_address: SocketAddr,
}

impl AmountConfig {
    /// Build a configuration for `base_url` with every other setting at its default.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            hive_format: HiveDatabaseFormat::default(),
            services: DEFAULT_SERVICES.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            bind_address: parse_bind(DEFAULT_BIND)?,
        })
    }

    /// Read the configuration from the process environment.
    ///
    /// Fails when [`BASE_URL_ENV`] is missing or blank, or when any optional
    /// variable holds an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = non_blank(BASE_URL_ENV).ok_or(ConfigError::MissingVar { name: BASE_URL_ENV })?;
        let mut config = Self::new(&base_url)?;

        if let Some(raw) = non_blank(HIVE_FORMAT_ENV) {
            config.hive_format = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                name: HIVE_FORMAT_ENV,
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(raw) = non_blank(SERVICES_ENV) {
            config.services = raw;
        }
        if let Some(raw) = non_blank(TIMEOUT_ENV) {
            let seconds: u64 = raw.trim().parse().map_err(|error: std::num::ParseIntError| ConfigError::InvalidValue {
                name: TIMEOUT_ENV,
                value: raw.clone(),
                reason: error.to_string(),
            })?;
            if seconds == 0 {
                return Err(ConfigError::InvalidValue {
                    name: TIMEOUT_ENV,
                    value: raw,
                    reason: "timeout must be at least one second".into(),
                });
            }
            config.request_timeout = Duration::from_secs(seconds);
        }
        if let Some(raw) = non_blank(BIND_ENV) {
            config.bind_address = parse_bind(&raw)?;
        }

        debug!(
            base_url = %config.base_url,
            hive_format = config.hive_format.as_str(),
            timeout_secs = config.request_timeout.as_secs(),
            bind = %config.bind_address,
            "amount configuration loaded"
        );
        Ok(config)
    }
}

fn non_blank(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_bind(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim().parse().map_err(|error: std::net::AddrParseError| ConfigError::InvalidValue {
        name: BIND_ENV,
        value: raw.to_string(),
        reason: error.to_string(),
    })
}

/// Force a secure scheme onto an address.
///
/// `http://` is rewritten to `https://` and a missing scheme gets `https://`,
/// except for loopback hosts, which keep whatever scheme they were given.
pub fn https_addr(addr: &str) -> String {
    let addr = addr.trim();
    let (scheme, rest) = match addr.split_once("://") {
        Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
        None => ("https".to_string(), addr),
    };
    let rest = rest.trim_end_matches('/');
    let scheme = match scheme.as_str() {
        "http" if is_local(rest) => "http",
        "http" | "https" => "https",
        other => other,
    };
    format!("{scheme}://{rest}")
}

fn is_local(authority: &str) -> bool {
    let host = authority.split('/').next().unwrap_or_default();
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    LOCALHOST_DOMAINS.iter().any(|&allowed| host.eq_ignore_ascii_case(allowed))
}

/// Normalize with [`https_addr`] and check that the result is a usable base URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let normalized = https_addr(raw);
    let parsed = Url::parse(&normalized).map_err(|error| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: error.to_string(),
    })?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "a host is required".into(),
        });
    }
    if !matches!(parsed.scheme(), "https" | "http") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "query strings and fragments are not allowed".into(),
        });
    }
    Ok(normalized)
}
