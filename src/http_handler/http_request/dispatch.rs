use super::request_common::{EncodedBody, RequestError};
use crate::{error, event};
use crate::http_handler::common::{HTTPError, HTTPMethod};
use crate::http_handler::http_client::{HTTPClient, default_timeout};
use crate::http_handler::http_response::response::Response;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

/// Callback that may adjust every request a caller sends.
pub type RequestHook = Arc<dyn Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync>;

/// Everything needed to put one request on the wire.
pub(crate) struct Outgoing<'a> {
    pub method: HTTPMethod,
    pub url: String,
    pub query: &'a [(String, String)],
    pub headers: Option<&'a HeaderMap>,
    pub body: Option<&'a EncodedBody>,
    pub timeout: Option<Duration>,
    pub decompress: bool,
    pub hook: Option<&'a RequestHook>,
}

/// Sends `out` through the shared transport and wraps the reply.
pub(crate) async fn dispatch(out: Outgoing<'_>) -> Result<Response, HTTPError> {
    let client = HTTPClient::shared()?;
    let mut builder = client
        .client()
        .request(out.method.into(), out.url.as_str())
        .timeout(out.timeout.unwrap_or_else(default_timeout));
    if !out.query.is_empty() {
        builder = builder.query(out.query);
    }
    builder = builder.headers(request_headers(&out)?);
    if let Some(body) = out.body {
        builder = builder.body(body.bytes().to_vec());
    }
    if let Some(hook) = out.hook {
        builder = hook(builder);
    }
    event!("{} {}", out.method, out.url);
    let response = builder.send().await.inspect_err(|err| error!("{} {} failed: {err}", out.method, out.url))?;
    event!("{} {} -> {}", out.method, out.url, response.status());
    Ok(Response::from_reqwest(response, out.decompress))
}

/// Crate defaults first, then the caller's headers, which replace any
/// default of the same name.
fn request_headers(out: &Outgoing<'_>) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();
    if out.decompress {
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    }
    if let Some(body) = out.body {
        let content_type = HeaderValue::from_str(body.content_type())
            .map_err(|_| RequestError::InvalidHeader(body.content_type().to_string()))?;
        headers.insert(CONTENT_TYPE, content_type);
    }
    if let Some(extra) = out.headers {
        headers.extend(extra.clone());
    }
    Ok(headers)
}
