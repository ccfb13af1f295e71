use crate::codec::{Codec, default_codec};
use crate::http_handler::common::{HTTPError, HTTPMethod};
use crate::http_handler::http_request::dispatch::{Outgoing, RequestHook, dispatch};
use crate::http_handler::http_request::request_common::{EncodedBody, RequestError, expand_template};
use crate::http_handler::http_response::response::Response;
use crate::server::RestServer;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

/// A prepared call to one endpoint of a [`RestServer`].
///
/// The URI may contain positional `{}` placeholders filled from the run
/// arguments, e.g. `/users/{}/posts/{}`.
#[derive(Clone)]
pub struct ApiCaller {
    server: Arc<RestServer>,
    method: HTTPMethod,
    uri: String,
    body: bool,
    codec: Codec,
    hook: Option<RequestHook>,
}

impl std::fmt::Debug for ApiCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCaller")
            .field("server", &self.server.base_url())
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("body", &self.body)
            .field("codec", &self.codec)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl ApiCaller {
    pub fn new(server: Arc<RestServer>, method: HTTPMethod, uri: impl Into<String>, body: bool) -> ApiCaller {
        ApiCaller { server, method, uri: uri.into(), body, codec: default_codec(), hook: None }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> ApiCaller {
        self.codec = codec;
        self
    }

    /// Installs a callback that sees every request before it is sent, e.g.
    /// to add authentication headers.
    #[must_use]
    pub fn with_hook<F>(mut self, hook: F) -> ApiCaller
    where
        F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn server(&self) -> &Arc<RestServer> { &self.server }
    pub fn method(&self) -> HTTPMethod { self.method }
    pub fn uri(&self) -> &str { &self.uri }
    pub fn takes_body(&self) -> bool { self.body }
    pub fn codec(&self) -> Codec { self.codec }

    /// Absolute URL for the given template arguments.
    ///
    /// # Errors
    /// See [`expand_template`].
    pub fn url(&self, args: &[&dyn Display]) -> Result<String, RequestError> {
        Ok(self.server.url_for(&expand_template(&self.uri, args)?))
    }

    /// Sends the request without a body.
    pub fn run(&self, args: &[&dyn Display]) -> impl Future<Output = Result<Response, HTTPError>> + Send {
        let url = self.url(args);
        async move { self.send(url?, None).await }
    }

    /// Sends the request with `body` marshalled by the caller's codec.
    /// Only valid for callers declared with the `BODY` flag.
    pub fn run_with_body<B: Serialize + ?Sized>(
        &self,
        body: &B,
        args: &[&dyn Display],
    ) -> impl Future<Output = Result<Response, HTTPError>> + Send {
        let prepared = self.prepare_body(body).and_then(|encoded| Ok((self.url(args)?, encoded)));
        async move {
            let (url, encoded) = prepared?;
            self.send(url, Some(&encoded)).await
        }
    }

    fn prepare_body<B: Serialize + ?Sized>(&self, body: &B) -> Result<EncodedBody, RequestError> {
        if !self.body {
            return Err(RequestError::UnexpectedBody);
        }
        EncodedBody::encode(&self.codec, body)
    }

    async fn send(&self, url: String, body: Option<&EncodedBody>) -> Result<Response, HTTPError> {
        dispatch(Outgoing {
            method: self.method,
            url,
            query: &[],
            headers: None,
            body,
            timeout: self.server.timeout(),
            decompress: self.server.decompress(),
            hook: self.hook.as_ref(),
        })
        .await
    }
}
