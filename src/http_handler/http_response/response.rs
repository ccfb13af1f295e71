use super::body::Body;
use reqwest::header::HeaderMap;

/// Status line, headers and lazily read body of a completed request.
#[derive(Debug)]
pub struct Response {
    status: reqwest::StatusCode,
    headers: HeaderMap,
    url: reqwest::Url,
    body: Body,
}

impl Response {
    pub(crate) fn from_reqwest(response: reqwest::Response, decompress: bool) -> Response {
        Response {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            body: Body::from_response(response, decompress),
        }
    }

    /// Numeric status code, e.g. `404`.
    pub fn status_code(&self) -> u16 { self.status.as_u16() }

    /// Status line text, e.g. `"404 Not Found"`.
    pub fn status(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {reason}", self.status.as_u16()),
            None => self.status.as_u16().to_string(),
        }
    }

    pub fn is_success(&self) -> bool { self.status.is_success() }
    pub fn header(&self) -> &HeaderMap { &self.headers }
    pub fn content_type(&self) -> Option<&str> { self.body.content_type() }
    /// Final URL of the request, after redirects.
    pub fn url(&self) -> &reqwest::Url { &self.url }
    pub fn body(&self) -> &Body { &self.body }
    pub fn body_mut(&mut self) -> &mut Body { &mut self.body }
    pub fn into_body(self) -> Body { self.body }
}
