use super::BodyProcess;
use crate::http_handler::http_request::request_common::RequestError;
use crate::http_handler::http_response::response_common::ResponseError;
use serde::{Serialize, de::DeserializeOwned};

/// `application/json` bodies via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody;

impl BodyProcess for JsonBody {
    fn content_type(&self) -> &'static str { "application/json;charset=utf-8" }

    fn marshal<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>, RequestError> {
        serde_json::to_vec(body).map_err(|e| RequestError::Encode(e.to_string()))
    }

    fn unmarshal<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, ResponseError> {
        serde_json::from_slice(body).map_err(|e| ResponseError::Decode(e.to_string()))
    }
}
