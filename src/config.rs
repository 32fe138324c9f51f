// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! typed configuration values built from them. Configuration is loaded from
//! the environment exactly once at startup and then passed by value into the
//! gates; nothing reads the environment mid-request.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GATEKEEPER_ENCRYPTION_KEY` | 32 raw bytes, AES-256-GCM key for the session cookie | Required |
//! | `INTERNAL_API_KEY` | Shared secret expected in `Authorization` on internal routes | Required |
//! | `AUTH_COOKIE_NAME` | Name of the session cookie | `kc-access` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;

use thiserror::Error;

/// Environment variable holding the raw 32-byte session encryption key.
pub const ENCRYPTION_KEY_ENV: &str = "GATEKEEPER_ENCRYPTION_KEY";

/// Environment variable holding the internal service shared key.
pub const INTERNAL_API_KEY_ENV: &str = "INTERNAL_API_KEY";

/// Environment variable overriding the session cookie name.
pub const COOKIE_NAME_ENV: &str = "AUTH_COOKIE_NAME";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Session cookie set by the upstream identity proxy.
pub const DEFAULT_COOKIE_NAME: &str = "kc-access";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// AES-256 key length in bytes.
pub const ENCRYPTION_KEY_LEN: usize = 32;

/// Configuration errors detected at startup.
///
/// Any of these prevents the server from starting, so a misconfigured
/// process can never authorize a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{var} must be exactly 32 bytes, got {len}")]
    InvalidKeyLength { var: &'static str, len: usize },

    #[error("cookie name {0:?} is not a valid cookie token")]
    InvalidCookieName(String),

    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("LOG_FORMAT must be 'json' or 'pretty', got {0:?}")]
    InvalidLogFormat(String),
}

/// Raw AES-256 key material for the session envelope.
///
/// Used directly as the cipher key: no key derivation step.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; ENCRYPTION_KEY_LEN]);

impl EncryptionKey {
    pub fn new(bytes: &[u8]) -> Result<Self, ConfigError> {
        let key: [u8; ENCRYPTION_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| ConfigError::InvalidKeyLength {
                    var: ENCRYPTION_KEY_ENV,
                    len: bytes.len(),
                })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Shared secret for service-to-service calls.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceSharedKey(String);

impl ServiceSharedKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::Empty(INTERNAL_API_KEY_ENV));
        }
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ServiceSharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceSharedKey(<redacted>)")
    }
}

/// Authentication configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub encryption_key: EncryptionKey,
    pub service_key: ServiceSharedKey,
    pub cookie_name: String,
}

impl AuthConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_key = lookup(ENCRYPTION_KEY_ENV).ok_or(ConfigError::Missing(ENCRYPTION_KEY_ENV))?;
        if raw_key.is_empty() {
            return Err(ConfigError::Empty(ENCRYPTION_KEY_ENV));
        }
        let encryption_key = EncryptionKey::new(raw_key.as_bytes())?;

        let service_key = ServiceSharedKey::new(
            lookup(INTERNAL_API_KEY_ENV).ok_or(ConfigError::Missing(INTERNAL_API_KEY_ENV))?,
        )?;

        let cookie_name =
            lookup(COOKIE_NAME_ENV).unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());
        if !is_cookie_token(&cookie_name) {
            return Err(ConfigError::InvalidCookieName(cookie_name));
        }

        Ok(Self {
            encryption_key,
            service_key,
            cookie_name,
        })
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Listener and logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };

        Ok(Self {
            host,
            port,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// RFC 6265 cookie-name token: visible ASCII without separators.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                        | b'{'
                        | b'}'
                )
        })
}
