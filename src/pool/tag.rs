use super::PoolError;
use crate::http_handler::common::HTTPMethod;
use crate::http_handler::http_request::request_common::base_url;
use crate::warn;
use std::str::FromStr;

/// A parsed caller declaration.
///
/// `flags` is a comma separated list, matched case-insensitively:
///
/// * `SSL` – use https
/// * `BODY` – the first run argument is the request body
/// * `GET`, `POST`, `PUT`, `PATCH`, `DELETE`, `OPTIONS`, `HEAD`, `TRACE` – the verb
/// * a decimal number – the port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    host: String,
    port: u16,
    ssl: bool,
    method: HTTPMethod,
    uri: String,
    body: bool,
}

impl TagInfo {
    /// # Errors
    /// [`PoolError::MissingHost`], [`PoolError::MissingUri`] and
    /// [`PoolError::MissingMethod`] for absent values, and
    /// [`PoolError::InvalidPort`] for a numeric flag outside the port range.
    pub fn parse(raw_host: &str, raw_uri: &str, flags: &str) -> Result<TagInfo, PoolError> {
        let host = raw_host.trim();
        if host.is_empty() {
            return Err(PoolError::MissingHost);
        }
        let uri = raw_uri.trim();
        if uri.is_empty() {
            return Err(PoolError::MissingUri);
        }

        let mut port = 0;
        let mut ssl = false;
        let mut body = false;
        let mut method = None;
        for flag in flags.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            if flag.eq_ignore_ascii_case("ssl") {
                ssl = true;
            } else if flag.eq_ignore_ascii_case("body") {
                body = true;
            } else if let Ok(verb) = HTTPMethod::from_str(flag) {
                method = Some(verb);
            } else if flag.bytes().all(|b| b.is_ascii_digit()) {
                port = flag.parse().map_err(|_| PoolError::InvalidPort(flag.to_string()))?;
            } else {
                warn!("Ignoring unknown caller flag {flag:?} for {host}{uri}");
            }
        }
        let method = method.ok_or(PoolError::MissingMethod)?;

        Ok(TagInfo { host: host.to_string(), port, ssl, method, uri: uri.to_string(), body })
    }

    pub fn host(&self) -> &str { &self.host }
    pub fn port(&self) -> u16 { self.port }
    pub fn is_ssl(&self) -> bool { self.ssl }
    pub fn method(&self) -> HTTPMethod { self.method }
    pub fn uri(&self) -> &str { &self.uri }
    pub fn takes_body(&self) -> bool { self.body }

    /// The base URL the tag resolves to. Servers are shared per base URL.
    pub fn base_url(&self) -> String { base_url(&self.host, self.port, self.ssl) }
}
