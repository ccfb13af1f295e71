use super::BodyProcess;
use crate::http_handler::http_request::request_common::RequestError;
use crate::http_handler::http_response::response_common::ResponseError;
use serde::{Serialize, de::DeserializeOwned};

/// `application/xml` bodies via the `quick-xml` serde integration.
///
/// The root element is named after the serialized struct.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlBody;

impl BodyProcess for XmlBody {
    fn content_type(&self) -> &'static str { "application/xml;charset=utf-8" }

    fn marshal<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>, RequestError> {
        quick_xml::se::to_string(body)
            .map(String::into_bytes)
            .map_err(|e| RequestError::Encode(e.to_string()))
    }

    fn unmarshal<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, ResponseError> {
        let text = std::str::from_utf8(body).map_err(|e| ResponseError::Decode(e.to_string()))?;
        quick_xml::de::from_str(text).map_err(|e| ResponseError::Decode(e.to_string()))
    }
}
