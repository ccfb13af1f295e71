use super::response_common::ResponseError;
use crate::codec::{BodyProcess, Codec, FormBody, JsonBody, XmlBody, default_codec};
use crate::{event, warn};
use bytes::Bytes;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::pin::Pin;

/// Chunked view of a response body.
pub type BodyStream = Pin<Box<dyn futures_core::Stream<Item = Result<Bytes, ResponseError>> + Send>>;

/// Compression applied to a response body, as announced by `Content-Encoding`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    /// Anything else. Bodies are passed through untouched.
    Other(String),
}

impl ContentEncoding {
    pub fn from_header(header: &str) -> ContentEncoding {
        let value = header.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("identity") {
            ContentEncoding::Identity
        } else if value.eq_ignore_ascii_case("gzip") || value.eq_ignore_ascii_case("x-gzip") {
            ContentEncoding::Gzip
        } else if value.eq_ignore_ascii_case("deflate") {
            ContentEncoding::Deflate
        } else {
            ContentEncoding::Other(value.to_string())
        }
    }
}

enum BodyState {
    /// Chunks read so far stay in `received`, so an interrupted read resumes.
    Pending { response: reqwest::Response, received: Vec<u8> },
    Raw(Bytes),
    Buffered(Bytes),
    Failed(ResponseError),
}

/// A lazily read response body.
///
/// Nothing is read from the connection until one of the accessors is
/// called. The first read decompresses the payload and keeps it, so every
/// later accessor works on the cached bytes.
pub struct Body {
    state: BodyState,
    length: Option<u64>,
    content_type: Option<String>,
    encoding: ContentEncoding,
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            BodyState::Pending { .. } => "pending",
            BodyState::Raw(_) => "raw",
            BodyState::Buffered(_) => "buffered",
            BodyState::Failed(_) => "failed",
        };
        f.debug_struct("Body")
            .field("state", &state)
            .field("length", &self.length)
            .field("content_type", &self.content_type)
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl Body {
    /// Wraps an unread `reqwest` response. `Content-Encoding` is only honoured
    /// when `decompress` is set.
    pub(crate) fn from_response(response: reqwest::Response, decompress: bool) -> Body {
        let content_type = header_str(response.headers(), reqwest::header::CONTENT_TYPE);
        let encoding = match header_str(response.headers(), reqwest::header::CONTENT_ENCODING) {
            Some(value) if decompress => ContentEncoding::from_header(&value),
            _ => ContentEncoding::Identity,
        };
        Body {
            length: response.content_length(),
            state: BodyState::Pending { response, received: Vec::new() },
            content_type,
            encoding,
        }
    }

    /// Builds a body from bytes that are already in memory, still encoded as
    /// `encoding` describes.
    pub fn from_bytes(data: impl Into<Bytes>, content_type: Option<&str>, encoding: ContentEncoding) -> Body {
        let raw: Bytes = data.into();
        Body {
            length: u64::try_from(raw.len()).ok(),
            state: BodyState::Raw(raw),
            content_type: content_type.map(str::to_string),
            encoding,
        }
    }

    /// Declared length of the body on the wire, if the server sent one.
    pub fn length(&self) -> Option<u64> { self.length }
    pub fn content_type(&self) -> Option<&str> { self.content_type.as_deref() }
    pub fn encoding(&self) -> &ContentEncoding { &self.encoding }
    /// Whether the body has already been read into memory.
    pub fn is_buffered(&self) -> bool { matches!(self.state, BodyState::Buffered(_)) }

    /// Reads, decompresses and caches the body.
    ///
    /// # Errors
    /// Transport failures while reading, or [`ResponseError::Decompress`] if
    /// the payload does not match its `Content-Encoding`. A failed read is
    /// remembered and reported again on later calls.
    pub async fn bytes(&mut self) -> Result<Bytes, ResponseError> {
        let result = match &mut self.state {
            BodyState::Buffered(data) => return Ok(data.clone()),
            BodyState::Failed(err) => return Err(err.clone()),
            BodyState::Raw(raw) => decompress(&self.encoding, raw.clone()),
            BodyState::Pending { response, received } => match read_remaining(response, received).await {
                Ok(()) => decompress(&self.encoding, Bytes::from(std::mem::take(received))),
                Err(err) => Err(err),
            },
        };
        self.state = match &result {
            Ok(data) => BodyState::Buffered(data.clone()),
            Err(err) => BodyState::Failed(err.clone()),
        };
        result
    }

    /// The body as UTF-8 text.
    ///
    /// # Errors
    /// See [`Body::bytes`], plus [`ResponseError::Decode`] for invalid UTF-8.
    pub async fn text(&mut self) -> Result<String, ResponseError> {
        let data = self.bytes().await?;
        String::from_utf8(data.to_vec()).map_err(|e| ResponseError::Decode(e.to_string()))
    }

    /// Decodes the body as JSON regardless of its content type.
    ///
    /// # Errors
    /// See [`Body::decode_with`].
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T, ResponseError> { self.decode_with(&JsonBody).await }

    /// Decodes the body as XML regardless of its content type.
    ///
    /// # Errors
    /// See [`Body::decode_with`].
    pub async fn xml<T: DeserializeOwned>(&mut self) -> Result<T, ResponseError> { self.decode_with(&XmlBody).await }

    /// Decodes the body as a urlencoded form regardless of its content type.
    ///
    /// # Errors
    /// See [`Body::decode_with`].
    pub async fn form<T: DeserializeOwned>(&mut self) -> Result<T, ResponseError> { self.decode_with(&FormBody).await }

    /// Decodes the body with the codec matching its content type, falling
    /// back to the process-wide default codec.
    ///
    /// # Errors
    /// See [`Body::decode_with`].
    pub async fn decode<T: DeserializeOwned>(&mut self) -> Result<T, ResponseError> {
        let codec = self.sniff_codec().unwrap_or_else(default_codec);
        self.decode_with(&codec).await
    }

    /// Decodes the body with an explicit processor.
    ///
    /// # Errors
    /// Read failures from [`Body::bytes`] and decoding failures from
    /// `process`.
    pub async fn decode_with<T, P>(&mut self, process: &P) -> Result<T, ResponseError>
    where
        T: DeserializeOwned,
        P: BodyProcess + ?Sized,
    {
        let data = self.bytes().await?;
        process.unmarshal(&data)
    }

    /// The codec announced by the body's content type, if it is one the
    /// crate knows.
    pub fn sniff_codec(&self) -> Option<Codec> { self.content_type.as_deref().and_then(Codec::from_content_type) }

    /// Consumes the body as a stream of chunks.
    ///
    /// Uncompressed bodies that have not been read yet are streamed straight
    /// from the connection. Everything else is buffered, decoded and yielded
    /// as a single chunk.
    pub fn stream(mut self) -> BodyStream {
        match self.state {
            BodyState::Pending { response, received }
                if self.encoding == ContentEncoding::Identity && received.is_empty() =>
            {
                Box::pin(response.bytes_stream().map(|chunk| chunk.map_err(ResponseError::from)))
            }
            state => {
                self.state = state;
                Box::pin(futures::stream::once(async move { self.bytes().await }))
            }
        }
    }
}

async fn read_remaining(response: &mut reqwest::Response, received: &mut Vec<u8>) -> Result<(), ResponseError> {
    while let Some(chunk) = response.chunk().await? {
        received.extend_from_slice(&chunk);
    }
    Ok(())
}

fn header_str(headers: &reqwest::header::HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_string)
}

/// Undoes `encoding` on `raw`.
///
/// A gzip body whose header cannot be parsed is returned untouched, while
/// corruption after a valid header is an error. Deflate bodies are accepted
/// both with and without the zlib wrapper.
pub(crate) fn decompress(encoding: &ContentEncoding, raw: Bytes) -> Result<Bytes, ResponseError> {
    match encoding {
        ContentEncoding::Identity => Ok(raw),
        ContentEncoding::Other(name) => {
            event!("Passing through body with unsupported encoding {name}");
            Ok(raw)
        }
        ContentEncoding::Gzip => {
            let mut out = Vec::new();
            let (read, has_header) = {
                let mut decoder = GzDecoder::new(&raw[..]);
                let read = decoder.read_to_end(&mut out);
                (read, decoder.header().is_some())
            };
            match read {
                Ok(_) => Ok(Bytes::from(out)),
                Err(err) if !has_header => {
                    warn!("Body announced as gzip has no valid gzip header ({err}), using it as is");
                    Ok(raw)
                }
                Err(err) => Err(err.into()),
            }
        }
        ContentEncoding::Deflate => {
            let mut out = Vec::new();
            if ZlibDecoder::new(&raw[..]).read_to_end(&mut out).is_ok() {
                return Ok(Bytes::from(out));
            }
            out.clear();
            DeflateDecoder::new(&raw[..]).read_to_end(&mut out)?;
            Ok(Bytes::from(out))
        }
    }
}
