//! Process-wide settings read from the environment.

use crate::codec::{Codec, parse_codec, set_default_codec};
use crate::http_handler::http_client::{DEFAULT_TIMEOUT, set_default_timeout, verify_cert};
use crate::info;
use std::env;
use std::time::Duration;
use strum_macros::Display;

pub const VERIFY_CERT_VAR: &str = "RESTCALL_VERIFY_CERT";
pub const TIMEOUT_VAR: &str = "RESTCALL_TIMEOUT_SECS";
pub const DEFAULT_CODEC_VAR: &str = "RESTCALL_DEFAULT_CODEC";

/// Certificate verification, request timeout and default codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    verify_cert: bool,
    timeout: Duration,
    default_codec: Codec,
}

impl Default for ClientConfig {
    fn default() -> Self { ClientConfig { verify_cert: false, timeout: DEFAULT_TIMEOUT, default_codec: Codec::Json } }
}

impl ClientConfig {
    /// Reads `RESTCALL_VERIFY_CERT`, `RESTCALL_TIMEOUT_SECS` and
    /// `RESTCALL_DEFAULT_CODEC`. Unset variables keep their defaults.
    ///
    /// # Errors
    /// A [`ConfigError`] naming the first variable with an unusable value.
    pub fn from_env() -> Result<ClientConfig, ConfigError> { Self::from_lookup(|var| env::var(var).ok()) }

    /// Like [`ClientConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::default();
        if let Some(value) = lookup(VERIFY_CERT_VAR) {
            config.verify_cert = parse_bool(&value).ok_or(ConfigError::InvalidVerifyCert(value))?;
        }
        if let Some(value) = lookup(TIMEOUT_VAR) {
            let secs = value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidTimeout(value.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(value) = lookup(DEFAULT_CODEC_VAR) {
            config.default_codec = parse_codec(&value).ok_or(ConfigError::InvalidCodec(value))?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_verify_cert(mut self, verify: bool) -> Self {
        self.verify_cert = verify;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_default_codec(mut self, codec: Codec) -> Self {
        self.default_codec = codec;
        self
    }

    pub fn verify_cert(&self) -> bool { self.verify_cert }
    pub fn timeout(&self) -> Duration { self.timeout }
    pub fn default_codec(&self) -> Codec { self.default_codec }

    /// Installs these values as the process-wide settings.
    pub fn apply(&self) {
        verify_cert(self.verify_cert);
        set_default_timeout(self.timeout);
        set_default_codec(self.default_codec);
        info!(
            "Configured cert verification {}, timeout {}s, default codec {}",
            self.verify_cert,
            self.timeout.as_secs(),
            self.default_codec
        );
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Display)]
pub enum ConfigError {
    #[strum(to_string = "RESTCALL_VERIFY_CERT is not a boolean")]
    InvalidVerifyCert(String),
    #[strum(to_string = "RESTCALL_TIMEOUT_SECS is not a whole number of seconds")]
    InvalidTimeout(String),
    #[strum(to_string = "RESTCALL_DEFAULT_CODEC is not one of json, xml, form")]
    InvalidCodec(String),
}

impl std::error::Error for ConfigError {}
