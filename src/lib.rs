//! Convenience layer over `reqwest`.
//!
//! * [`RestServer`] and [`RestClient`] build URLs from host, port and SSL
//!   settings. Default ports are left out.
//! * Request bodies are marshalled by a [`Codec`] (JSON, XML or form), or by
//!   any custom [`BodyProcess`].
//! * Replies are decoded by sniffing their content type. Gzip and deflate
//!   bodies are unpacked on first read (see [`Body`]).
//! * [`api_pool!`] declares structs of [`ApiCaller`]s from host/URI/flag tags.
//!
//! Process-wide settings (certificate verification, timeout, default codec)
//! can be loaded from the environment with [`ClientConfig::from_env`].
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]

pub mod codec;
pub mod config;
pub mod http_handler;
pub mod logger;
pub mod pool;
pub mod server;

#[doc(hidden)]
pub use chrono;

/// Serializes unit tests that touch the process-wide settings.
#[cfg(test)]
pub(crate) static GLOBAL_SETTINGS: std::sync::Mutex<()> = std::sync::Mutex::new(());

pub use codec::{BodyProcess, Codec, FormBody, JsonBody, XmlBody, default_codec, set_default_codec};
pub use config::{ClientConfig, ConfigError};
pub use http_handler::common::{HTTPError, HTTPMethod};
pub use http_handler::http_client::{HTTPClient, cert_verification, default_timeout, set_default_timeout, verify_cert};
pub use http_handler::http_request::dispatch::RequestHook;
pub use http_handler::http_request::request_common::{EncodedBody, RequestError};
pub use http_handler::http_request::rest_client::{self, RestClient};
pub use http_handler::http_request::typed_request::RestRequest;
pub use http_handler::http_response::body::{Body, BodyStream, ContentEncoding};
pub use http_handler::http_response::response::Response;
pub use http_handler::http_response::response_common::{ErrorReturn, ResponseError};
pub use pool::api_caller::ApiCaller;
pub use pool::tag::TagInfo;
pub use pool::{ApiPool, PoolError};
pub use server::RestServer;
