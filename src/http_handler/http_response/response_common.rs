use super::response::Response;
use crate::codec::{BodyProcess, Codec};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::de::value::UnitDeserializer;
use strum_macros::Display;

/// Maps a non-2xx response onto a [`ResponseError`], reading the error body
/// so it can be reported.
///
/// # Errors
/// [`ResponseError::InternalServer`] for 5xx, [`ResponseError::BadRequest`]
/// for 4xx and [`ResponseError::Unknown`] for anything else that is not a
/// success.
pub(crate) async fn unwrap_return_code(mut response: Response) -> Result<Response, ResponseError> {
    let status = response.status_code();
    if (200..300).contains(&status) {
        return Ok(response);
    }
    let detail = response.body_mut().text().await.unwrap_or_default();
    if (500..600).contains(&status) {
        Err(ResponseError::InternalServer(ErrorReturn { status, detail }))
    } else if (400..500).contains(&status) {
        Err(ResponseError::BadRequest(ErrorReturn { status, detail }))
    } else {
        Err(ResponseError::Unknown(format!("unexpected status {status}")))
    }
}

/// Checks the status of `response` and decodes its body into `T`.
///
/// The codec is chosen from the response content type, falling back to
/// `fallback`. An empty body decodes as unit, so `()` and `Option<_>` work
/// for `HEAD` requests and `204 No Content` replies.
///
/// # Errors
/// See [`unwrap_return_code`] and [`Body::bytes`](super::body::Body::bytes),
/// plus [`ResponseError::Decode`] if the body does not fit `T`.
pub(crate) async fn read_payload<T: DeserializeOwned>(response: Response, fallback: Codec) -> Result<T, ResponseError> {
    let mut body = unwrap_return_code(response).await?.into_body();
    let codec = body.sniff_codec().unwrap_or(fallback);
    let data = body.bytes().await?;
    if data.is_empty() {
        let unit: UnitDeserializer<serde::de::value::Error> = ().into_deserializer();
        return T::deserialize(unit).map_err(|e| ResponseError::Decode(e.to_string()));
    }
    codec.unmarshal(&data)
}

/// Status code and body of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReturn {
    status: u16,
    detail: String,
}

impl ErrorReturn {
    pub fn status(&self) -> u16 { self.status }
    pub fn detail(&self) -> &str { &self.detail }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ResponseError {
    #[strum(to_string = "server error")]
    InternalServer(ErrorReturn),
    #[strum(to_string = "client error")]
    BadRequest(ErrorReturn),
    #[strum(to_string = "no connection")]
    NoConnection,
    #[strum(to_string = "timed out")]
    Timeout,
    #[strum(to_string = "response body decoding failed")]
    Decode(String),
    #[strum(to_string = "response body decompression failed")]
    Decompress(String),
    #[strum(to_string = "unknown response error")]
    Unknown(String),
}

impl std::error::Error for ResponseError {}

impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ResponseError::Timeout
        } else if value.is_connect() {
            ResponseError::NoConnection
        } else if value.is_decode() || value.is_body() {
            ResponseError::Decode(value.to_string())
        } else {
            ResponseError::Unknown(value.to_string())
        }
    }
}

impl From<std::io::Error> for ResponseError {
    fn from(value: std::io::Error) -> Self { ResponseError::Decompress(value.to_string()) }
}
