use super::dispatch::{Outgoing, dispatch};
use super::request_common::{EncodedBody, RequestError, base_url, join_uri};
use crate::codec::{BodyProcess, Codec, default_codec};
use crate::http_handler::common::{HTTPError, HTTPMethod};
use crate::http_handler::http_response::response::Response;
use crate::http_handler::http_response::response_common::{read_payload, unwrap_return_code};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A single request described field by field.
///
/// ```no_run
/// # async fn demo() -> Result<(), restcall::HTTPError> {
/// let user: serde_json::Value = restcall::RestClient::new("api.example.org", 0, "/users/7")
///     .ssl(true)
///     .query("fields", "name,mail")
///     .get()
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    method: HTTPMethod,
    host: String,
    port: u16,
    uri: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<EncodedBody>,
    ssl: bool,
    codec: Codec,
    timeout: Option<Duration>,
    decompress: bool,
}

impl RestClient {
    /// A `GET` request over plain HTTP using the process-wide default codec.
    /// Port `0` selects the scheme default.
    pub fn new(host: impl Into<String>, port: u16, uri: impl Into<String>) -> RestClient {
        RestClient {
            method: HTTPMethod::Get,
            host: host.into(),
            port,
            uri: uri.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            ssl: false,
            codec: default_codec(),
            timeout: None,
            decompress: true,
        }
    }

    #[must_use]
    pub fn ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    #[must_use]
    pub fn method(mut self, method: HTTPMethod) -> Self {
        self.method = method;
        self
    }

    /// Appends a query parameter. Parameters keep their insertion order and
    /// values are percent-encoded on send.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Codec used for request bodies set afterwards and as the fallback for
    /// decoding replies with an unknown content type.
    #[must_use]
    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Controls `Accept-Encoding` negotiation and response decompression.
    #[must_use]
    pub fn decompress(mut self, decompress: bool) -> Self {
        self.decompress = decompress;
        self
    }

    /// Marshals `body` with the current codec.
    ///
    /// # Errors
    /// [`RequestError::Encode`] if the codec rejects `body`.
    pub fn body<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, RequestError> {
        let codec = self.codec;
        self.body_with(&codec, body)
    }

    /// Marshals `body` with a custom processor.
    ///
    /// # Errors
    /// Propagates the processor's encode error.
    pub fn body_with<P, B>(mut self, process: &P, body: &B) -> Result<Self, RequestError>
    where
        P: BodyProcess + ?Sized,
        B: Serialize + ?Sized,
    {
        self.body = Some(EncodedBody::encode(process, body)?);
        Ok(self)
    }

    /// Sends `text` verbatim, labelled with the current codec's content type.
    #[must_use]
    pub fn raw_body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(EncodedBody::raw(text, self.codec.content_type()));
        self
    }

    /// The request URL without the query string.
    pub fn url(&self) -> String { join_uri(&base_url(&self.host, self.port, self.ssl), &self.uri) }

    pub fn request_method(&self) -> HTTPMethod { self.method }
    pub fn encoded_body(&self) -> Option<&EncodedBody> { self.body.as_ref() }

    /// Sends the request and returns the reply whatever its status.
    ///
    /// # Errors
    /// Transport and URL errors.
    pub async fn call(&self) -> Result<Response, HTTPError> {
        dispatch(Outgoing {
            method: self.method,
            url: self.url(),
            query: &self.query,
            headers: Some(&self.headers),
            body: self.body.as_ref(),
            timeout: self.timeout,
            decompress: self.decompress,
            hook: None,
        })
        .await
    }

    /// Sends the request and fails on a non-2xx status. The body is dropped.
    ///
    /// # Errors
    /// See [`RestClient::call`], plus the status errors of
    /// [`ResponseError`](crate::ResponseError).
    pub async fn execute(&self) -> Result<(), HTTPError> {
        unwrap_return_code(self.call().await?).await?;
        Ok(())
    }

    /// Sends the request and decodes a successful reply into `T`.
    ///
    /// # Errors
    /// See [`RestClient::execute`], plus decoding errors.
    pub async fn send<T: DeserializeOwned>(&self) -> Result<T, HTTPError> {
        let response = self.call().await?;
        Ok(read_payload(response, self.codec).await?)
    }

    /// Sends as `GET` and decodes the reply.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn get<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Get).await }

    /// Sends as `POST` and decodes the reply.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn post<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Post).await }

    /// Sends as `PUT` and decodes the reply.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn put<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Put).await }

    /// Sends as `DELETE` and decodes the reply.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn delete<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Delete).await }

    /// Sends as `OPTIONS` and decodes the reply.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn options<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Options).await }

    /// Sends as `HEAD`. Decode into `()` since the reply has no body.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn head<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Head).await }

    /// Sends as `PATCH` and decodes the reply.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn patch<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Patch).await }

    /// Sends as `TRACE` and decodes the reply.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn trace<T: DeserializeOwned>(&mut self) -> Result<T, HTTPError> { self.send_as(HTTPMethod::Trace).await }

    async fn send_as<T: DeserializeOwned>(&mut self, method: HTTPMethod) -> Result<T, HTTPError> {
        self.method = method;
        self.send().await
    }
}

fn one_shot<B: Serialize + ?Sized>(method: HTTPMethod, host: &str, port: u16, uri: &str, body: &B) -> Result<RestClient, RequestError> {
    RestClient::new(host, port, uri).method(method).body(body)
}

/// One-shot `GET` over plain HTTP.
///
/// # Errors
/// See [`RestClient::send`].
pub async fn get<T: DeserializeOwned>(host: &str, port: u16, uri: &str) -> Result<T, HTTPError> {
    RestClient::new(host, port, uri).send().await
}

/// One-shot `POST` over plain HTTP with a body in the default codec.
///
/// # Errors
/// See [`RestClient::body`] and [`RestClient::send`].
pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(host: &str, port: u16, uri: &str, body: &B) -> Result<T, HTTPError> {
    one_shot(HTTPMethod::Post, host, port, uri, body)?.send().await
}

/// One-shot `PUT` over plain HTTP with a body in the default codec.
///
/// # Errors
/// See [`RestClient::body`] and [`RestClient::send`].
pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(host: &str, port: u16, uri: &str, body: &B) -> Result<T, HTTPError> {
    one_shot(HTTPMethod::Put, host, port, uri, body)?.send().await
}

/// One-shot `DELETE` over plain HTTP with a body in the default codec.
///
/// # Errors
/// See [`RestClient::body`] and [`RestClient::send`].
pub async fn delete<B: Serialize + ?Sized, T: DeserializeOwned>(host: &str, port: u16, uri: &str, body: &B) -> Result<T, HTTPError> {
    one_shot(HTTPMethod::Delete, host, port, uri, body)?.send().await
}

/// One-shot `OPTIONS` over plain HTTP with a body in the default codec.
///
/// # Errors
/// See [`RestClient::body`] and [`RestClient::send`].
pub async fn options<B: Serialize + ?Sized, T: DeserializeOwned>(host: &str, port: u16, uri: &str, body: &B) -> Result<T, HTTPError> {
    one_shot(HTTPMethod::Options, host, port, uri, body)?.send().await
}

/// One-shot `HEAD` over plain HTTP with a body in the default codec.
///
/// # Errors
/// See [`RestClient::body`] and [`RestClient::send`].
pub async fn head<B: Serialize + ?Sized, T: DeserializeOwned>(host: &str, port: u16, uri: &str, body: &B) -> Result<T, HTTPError> {
    one_shot(HTTPMethod::Head, host, port, uri, body)?.send().await
}

/// One-shot `PATCH` over plain HTTP with a body in the default codec.
///
/// # Errors
/// See [`RestClient::body`] and [`RestClient::send`].
pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(host: &str, port: u16, uri: &str, body: &B) -> Result<T, HTTPError> {
    one_shot(HTTPMethod::Patch, host, port, uri, body)?.send().await
}

/// One-shot `TRACE` over plain HTTP with a body in the default codec.
///
/// # Errors
/// See [`RestClient::body`] and [`RestClient::send`].
pub async fn trace<B: Serialize + ?Sized, T: DeserializeOwned>(host: &str, port: u16, uri: &str, body: &B) -> Result<T, HTTPError> {
    one_shot(HTTPMethod::Trace, host, port, uri, body)?.send().await
}
