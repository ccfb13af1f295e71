use super::http_request::request_common::RequestError;
use super::http_response::response_common::ResponseError;
use strum_macros::{Display, EnumString};

/// HTTP verbs understood by the clients and the tag parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum HTTPMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Trace,
}

impl From<HTTPMethod> for reqwest::Method {
    fn from(value: HTTPMethod) -> Self {
        match value {
            HTTPMethod::Get => reqwest::Method::GET,
            HTTPMethod::Post => reqwest::Method::POST,
            HTTPMethod::Put => reqwest::Method::PUT,
            HTTPMethod::Patch => reqwest::Method::PATCH,
            HTTPMethod::Delete => reqwest::Method::DELETE,
            HTTPMethod::Options => reqwest::Method::OPTIONS,
            HTTPMethod::Head => reqwest::Method::HEAD,
            HTTPMethod::Trace => reqwest::Method::TRACE,
        }
    }
}

/// Any failure while building, sending or reading a request.
#[derive(Debug, Display)]
pub enum HTTPError {
    HTTPRequestError(RequestError),
    HTTPResponseError(ResponseError),
}

impl std::error::Error for HTTPError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HTTPError::HTTPRequestError(err) => Some(err),
            HTTPError::HTTPResponseError(err) => Some(err),
        }
    }
}

impl From<RequestError> for HTTPError {
    fn from(value: RequestError) -> Self { HTTPError::HTTPRequestError(value) }
}

impl From<ResponseError> for HTTPError {
    fn from(value: ResponseError) -> Self { HTTPError::HTTPResponseError(value) }
}

impl From<reqwest::Error> for HTTPError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_builder() {
            HTTPError::HTTPRequestError(RequestError::from(value))
        } else {
            HTTPError::HTTPResponseError(ResponseError::from(value))
        }
    }
}
