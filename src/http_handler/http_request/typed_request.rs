use super::dispatch::{Outgoing, dispatch};
use super::request_common::EncodedBody;
use crate::codec::{Codec, default_codec};
use crate::http_handler::common::{HTTPError, HTTPMethod};
use crate::http_handler::http_response::response_common::read_payload;
use crate::server::RestServer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// A typed endpoint description.
///
/// Implementors name the endpoint, verb and payload types. Sending goes
/// through the same transport and decoding rules as
/// [`RestClient`](crate::RestClient).
#[allow(async_fn_in_trait)]
pub trait RestRequest {
    type Response: DeserializeOwned;
    /// Use `()` for requests without a body.
    type Body: Serialize + ?Sized;

    fn endpoint(&self) -> Cow<'_, str>;
    fn request_method(&self) -> HTTPMethod;
    fn body(&self) -> Option<&Self::Body> { None }
    fn codec(&self) -> Codec { default_codec() }
    fn query(&self) -> Vec<(String, String)> { Vec::new() }
    fn header_params(&self) -> reqwest::header::HeaderMap { reqwest::header::HeaderMap::new() }

    /// Sends the request to `server` and decodes a successful reply.
    ///
    /// # Errors
    /// Body encoding, transport, status and decoding errors.
    async fn send_request(&self, server: &RestServer) -> Result<Self::Response, HTTPError> {
        let codec = self.codec();
        let body = self.body().map(|body| EncodedBody::encode(&codec, body)).transpose()?;
        let headers = self.header_params();
        let query = self.query();
        let response = dispatch(Outgoing {
            method: self.request_method(),
            url: server.url_for(&self.endpoint()),
            query: &query,
            headers: Some(&headers),
            body: body.as_ref(),
            timeout: server.timeout(),
            decompress: server.decompress(),
            hook: None,
        })
        .await?;
        Ok(read_payload(response, codec).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ObservationRequest;

    #[derive(serde::Deserialize)]
    struct ObservationResponse {}

    impl RestRequest for ObservationRequest {
        type Response = ObservationResponse;
        type Body = ();
        fn endpoint(&self) -> Cow<'_, str> { Cow::Borrowed("observation") }
        fn request_method(&self) -> HTTPMethod { HTTPMethod::Get }
    }

    #[test]
    fn test_defaults() {
        let req = ObservationRequest;
        assert!(req.body().is_none());
        assert!(req.query().is_empty());
        assert!(req.header_params().is_empty());
        let server = RestServer::new("localhost", Some(33000));
        assert_eq!(server.url_for(&req.endpoint()), "http://localhost:33000/observation");
    }
}
