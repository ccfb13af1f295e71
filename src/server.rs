use crate::codec::{Codec, default_codec};
use crate::http_handler::common::HTTPMethod;
use crate::http_handler::http_request::request_common::{base_url, join_uri};
use crate::pool::api_caller::ApiCaller;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// A remote endpoint described by host, port and scheme.
///
/// Port `0` selects the scheme default. [`RestServer::base_url`] leaves
/// default ports out of the URL.
#[derive(Debug)]
pub struct RestServer {
    host: String,
    port: u16,
    ssl: bool,
    timeout: Option<Duration>,
    decompress: bool,
    url: OnceLock<String>,
}

impl RestServer {
    /// Plain HTTP server, port 80 unless given.
    pub fn new(host: impl Into<String>, port: Option<u16>) -> RestServer {
        Self::with_scheme(host.into(), port.unwrap_or(80), false)
    }

    /// HTTPS server, port 443 unless given.
    pub fn new_ssl(host: impl Into<String>, port: Option<u16>) -> RestServer {
        Self::with_scheme(host.into(), port.unwrap_or(443), true)
    }

    fn with_scheme(host: String, port: u16, ssl: bool) -> RestServer {
        RestServer { host, port, ssl, timeout: None, decompress: true, url: OnceLock::new() }
    }

    /// Overrides the process-wide default timeout for requests to this server.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> RestServer {
        self.timeout = Some(timeout);
        self
    }

    /// Controls whether requests advertise `Accept-Encoding: gzip, deflate`
    /// and whether compressed responses are decoded.
    #[must_use]
    pub fn with_decompress(mut self, decompress: bool) -> RestServer {
        self.decompress = decompress;
        self
    }

    pub fn host(&self) -> &str { &self.host }
    pub fn port(&self) -> u16 { self.port }
    pub fn is_ssl(&self) -> bool { self.ssl }
    pub fn timeout(&self) -> Option<Duration> { self.timeout }
    pub fn decompress(&self) -> bool { self.decompress }

    /// `scheme://host[:port]`, computed on first use.
    pub fn base_url(&self) -> &str { self.url.get_or_init(|| base_url(&self.host, self.port, self.ssl)) }

    /// Absolute URL of `uri` on this server.
    pub fn url_for(&self, uri: &str) -> String { join_uri(self.base_url(), uri) }

    /// A JSON caller for `uri` on this server.
    ///
    /// `body` states whether the caller sends a request body.
    pub fn json_api(self: &Arc<Self>, method: HTTPMethod, uri: impl Into<String>, body: bool) -> ApiCaller {
        self.api(method, uri, body, Codec::Json)
    }

    /// A caller for `uri` on this server marshalling bodies with `codec`.
    pub fn api(self: &Arc<Self>, method: HTTPMethod, uri: impl Into<String>, body: bool, codec: Codec) -> ApiCaller {
        ApiCaller::new(Arc::clone(self), method, uri, body).with_codec(codec)
    }

    /// A caller for `uri` using the process-wide default codec.
    pub fn default_api(self: &Arc<Self>, method: HTTPMethod, uri: impl Into<String>, body: bool) -> ApiCaller {
        self.api(method, uri, body, default_codec())
    }
}
