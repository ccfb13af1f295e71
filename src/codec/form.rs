use super::BodyProcess;
use crate::http_handler::http_request::request_common::RequestError;
use crate::http_handler::http_response::response_common::ResponseError;
use serde::{Serialize, de::DeserializeOwned};

/// `application/x-www-form-urlencoded` bodies via `serde_urlencoded`.
///
/// Maps, flat structs and slices of `(key, value)` pairs are accepted.
/// Repeated keys need the pair form: `&[("tag", "a"), ("tag", "b")]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody;

impl BodyProcess for FormBody {
    fn content_type(&self) -> &'static str { "application/x-www-form-urlencoded" }

    fn marshal<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>, RequestError> {
        serde_urlencoded::to_string(body)
            .map(String::into_bytes)
            .map_err(|e| RequestError::Encode(e.to_string()))
    }

    fn unmarshal<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, ResponseError> {
        serde_urlencoded::from_bytes(body).map_err(|e| ResponseError::Decode(e.to_string()))
    }
}
