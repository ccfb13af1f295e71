//! Request/response body marshalers.
//!
//! Every codec implements [`BodyProcess`]. [`Codec`] bundles the three
//! built-in processors and is what the rest of the crate passes around.
//! A custom marshaler can be plugged into
//! [`RestClient::body_with`](crate::RestClient::body_with) and
//! [`Body::decode_with`](crate::Body::decode_with).

mod form;
mod json;
mod xml;


pub use form::FormBody;
pub use json::JsonBody;
pub use xml::XmlBody;

use crate::http_handler::http_request::request_common::RequestError;
use crate::http_handler::http_response::response_common::ResponseError;
use serde::{Serialize, de::DeserializeOwned};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use strum_macros::{Display, EnumString};

/// Marshals request bodies and unmarshals response bodies for one wire format.
pub trait BodyProcess {
    /// Value sent in the `Content-Type` request header.
    fn content_type(&self) -> &'static str;

    /// Encodes `body` into the bytes that go on the wire.
    ///
    /// # Errors
    /// Returns [`RequestError::Encode`] if `body` cannot be represented in
    /// this format.
    fn marshal<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>, RequestError>;

    /// Decodes a fully buffered response body.
    ///
    /// # Errors
    /// Returns [`ResponseError::Decode`] if `body` is not valid for `T`.
    fn unmarshal<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, ResponseError>;
}

/// The built-in body formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Codec {
    #[default]
    Json,
    Xml,
    Form,
}

impl Codec {
    /// Picks a codec from a `Content-Type` header value.
    ///
    /// Media type parameters are ignored. Structured syntax suffixes like
    /// `application/problem+json` map onto their base format.
    pub fn from_content_type(content_type: &str) -> Option<Codec> {
        let media_type = content_type.split(';').next()?.trim().to_ascii_lowercase();
        let subtype = media_type.rsplit('/').next()?;
        let suffix = subtype.rsplit('+').next().unwrap_or(subtype);
        match suffix {
            "json" => Some(Codec::Json),
            "xml" => Some(Codec::Xml),
            "x-www-form-urlencoded" => Some(Codec::Form),
            _ => None,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            Codec::Json => 0,
            Codec::Xml => 1,
            Codec::Form => 2,
        }
    }

    fn from_bits(bits: u8) -> Codec {
        match bits {
            1 => Codec::Xml,
            2 => Codec::Form,
            _ => Codec::Json,
        }
    }
}

impl BodyProcess for Codec {
    fn content_type(&self) -> &'static str {
        match self {
            Codec::Json => JsonBody.content_type(),
            Codec::Xml => XmlBody.content_type(),
            Codec::Form => FormBody.content_type(),
        }
    }

    fn marshal<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>, RequestError> {
        match self {
            Codec::Json => JsonBody.marshal(body),
            Codec::Xml => XmlBody.marshal(body),
            Codec::Form => FormBody.marshal(body),
        }
    }

    fn unmarshal<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, ResponseError> {
        match self {
            Codec::Json => JsonBody.unmarshal(body),
            Codec::Xml => XmlBody.unmarshal(body),
            Codec::Form => FormBody.unmarshal(body),
        }
    }
}

static DEFAULT_CODEC: AtomicU8 = AtomicU8::new(0);

/// Replaces the process-wide default codec used by clients and callers that
/// were not given one explicitly.
pub fn set_default_codec(codec: Codec) { DEFAULT_CODEC.store(codec.to_bits(), Ordering::Relaxed); }

/// Returns the process-wide default codec.
pub fn default_codec() -> Codec { Codec::from_bits(DEFAULT_CODEC.load(Ordering::Relaxed)) }

/// Parses a codec name as accepted by `RESTCALL_DEFAULT_CODEC`.
pub(crate) fn parse_codec(name: &str) -> Option<Codec> { Codec::from_str(name.trim()).ok() }
