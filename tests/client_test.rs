//! End-to-end tests against a wiremock server: URL building, body codecs,
//! content-type driven decoding, decompression and status handling.

use flate2::Compression;
use flate2::write::{GzEncoder, ZlibEncoder};
use futures::{FutureExt, StreamExt};
use restcall::{
    ApiPool, Codec, ContentEncoding, HTTPError, HTTPMethod, ResponseError, RestClient, RestRequest, RestServer,
};
use restcall::http_handler::reqwest::header::{ACCEPT_ENCODING, CONTENT_TYPE, HeaderValue};
use serde_json::json;
use std::borrow::Cow;
use std::io::Write;
use wiremock::matchers::{body_json, body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
struct Objective {
    id: u32,
    name: String,
}

fn objective() -> Objective { Objective { id: 3, name: "zone".to_string() } }

/// Helper: host and port of a mock server.
fn endpoint(server: &MockServer) -> (String, u16) {
    let addr = server.address();
    (addr.ip().to_string(), addr.port())
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// RestClient
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_get_with_query_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objectives/3"))
        .and(query_param("fields", "id name"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3, "name": "zone" })))
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let found: Objective = RestClient::new(host, port, "objectives/3")
        .query("fields", "id name")
        .query("page", 1)
        .get()
        .await
        .unwrap();
    assert_eq!(found, objective());
}

#[tokio::test]
async fn test_post_form_body_and_sniff_xml_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/objectives"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("id=3&name=zone"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_raw("<Objective><id>3</id><name>zone</name></Objective>", "application/xml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let created: Objective = RestClient::new(host, port, "/objectives")
        .codec(Codec::Form)
        .body(&objective())
        .unwrap()
        .post()
        .await
        .unwrap();
    assert_eq!(created, objective());
}

#[tokio::test]
async fn test_unknown_content_type_falls_back_to_client_codec() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"id":3,"name":"zone"}"#, "text/plain"))
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let found: Objective = RestClient::new(host, port, "/legacy").codec(Codec::Json).send().await.unwrap();
    assert_eq!(found, objective());
}

#[tokio::test]
async fn test_raw_body_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/raw"))
        .and(header("content-type", "application/json;charset=utf-8"))
        .and(body_string("{\"already\":\"encoded\"}"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    RestClient::new(host, port, "/raw")
        .codec(Codec::Json)
        .raw_body("{\"already\":\"encoded\"}")
        .put::<()>()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_free_functions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objectives/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3, "name": "zone" })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/objectives/3"))
        .and(body_json(json!({ "reason": "done" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let found: Objective = restcall::rest_client::get(&host, port, "/objectives/3").await.unwrap();
    assert_eq!(found, objective());
    let deleted: bool = restcall::rest_client::delete(&host, port, "/objectives/3", &json!({ "reason": "done" }))
        .await
        .unwrap();
    assert!(deleted);
}

#[tokio::test]
async fn test_head_decodes_into_unit() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let mut client = RestClient::new(host, port, "/health");
    client.head::<()>().await.unwrap();
}

#[tokio::test]
async fn test_caller_headers_replace_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    RestClient::new(host, port, "/documents")
        .method(HTTPMethod::Post)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/vnd.api+json"))
        .header(ACCEPT_ENCODING, HeaderValue::from_static("identity"))
        .raw_body("{}")
        .execute()
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let headers = &received[0].headers;
    let content_types: Vec<_> = headers.get_all("content-type").iter().collect();
    assert_eq!(content_types, vec!["application/vnd.api+json"]);
    let encodings: Vec<_> = headers.get_all("accept-encoding").iter().collect();
    assert_eq!(encodings, vec!["identity"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Status handling
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_client_and_server_errors() {
    let server = MockServer::start().await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such objective"))
        .mount(&server)
        .await;
    Mock::given(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let missing = RestClient::new(host.clone(), port, "/missing").send::<Objective>().await;
    match missing {
        Err(HTTPError::HTTPResponseError(ResponseError::BadRequest(ret))) => {
            assert_eq!(ret.status(), 404);
            assert_eq!(ret.detail(), "no such objective");
        }
        other => panic!("expected a client error, got {other:?}"),
    }

    let broken = RestClient::new(host.clone(), port, "/broken").execute().await;
    assert!(matches!(
        broken,
        Err(HTTPError::HTTPResponseError(ResponseError::InternalServer(ref ret))) if ret.status() == 503
    ));

    let raw = RestClient::new(host, port, "/broken").call().await.unwrap();
    assert_eq!(raw.status_code(), 503);
    assert_eq!(raw.status(), "503 Service Unavailable");
    assert!(!raw.is_success());
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let res = RestClient::new("127.0.0.1", port, "/gone").call().await;
    assert!(matches!(res, Err(HTTPError::HTTPResponseError(ResponseError::NoConnection))));
}

// ═══════════════════════════════════════════════════════════════════════════
// Compressed bodies
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_gzip_reply_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/packed"))
        .and(header_exists("accept-encoding"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(gzip(br#"{"id":3,"name":"zone"}"#), "application/json")
                .insert_header("content-encoding", "gzip"),
        )
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let mut reply = RestClient::new(host, port, "/packed").call().await.unwrap();
    assert_eq!(reply.body().encoding(), &ContentEncoding::Gzip);
    assert_eq!(reply.header()["content-encoding"], "gzip");
    let found: Objective = reply.body_mut().decode().await.unwrap();
    assert_eq!(found, objective());
    assert_eq!(reply.body_mut().text().await.unwrap(), r#"{"id":3,"name":"zone"}"#);
}

#[tokio::test]
async fn test_deflate_reply_is_decoded_unless_disabled() {
    let server = MockServer::start().await;
    let packed = zlib(b"plain text payload");
    Mock::given(method("GET"))
        .and(path("/deflated"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(packed.clone(), "text/plain")
                .insert_header("content-encoding", "deflate"),
        )
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let mut reply = RestClient::new(host.clone(), port, "/deflated").call().await.unwrap();
    assert_eq!(reply.body_mut().text().await.unwrap(), "plain text payload");

    let mut untouched = RestClient::new(host, port, "/deflated").decompress(false).call().await.unwrap();
    assert_eq!(untouched.body().encoding(), &ContentEncoding::Identity);
    assert_eq!(&untouched.body_mut().bytes().await.unwrap()[..], &packed[..]);
}

#[tokio::test]
async fn test_identity_body_streams() {
    let server = MockServer::start().await;
    let payload = vec![7_u8; 64 * 1024];
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(payload.clone(), "image/png"))
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let reply = RestClient::new(host, port, "/image").call().await.unwrap();
    let body = reply.into_body();
    assert_eq!(body.length(), Some(64 * 1024));
    let mut stream = body.stream();
    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, payload);
}

#[tokio::test]
async fn test_interrupted_read_resumes() {
    let server = MockServer::start().await;
    let payload = vec![3_u8; 512 * 1024];
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(payload.clone(), "application/octet-stream"))
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let mut reply = RestClient::new(host, port, "/archive").call().await.unwrap();
    // polled once and dropped, possibly halfway through the body
    if let Some(first) = reply.body_mut().bytes().now_or_never() {
        assert_eq!(&first.unwrap()[..], &payload[..]);
    }
    assert_eq!(&reply.body_mut().bytes().await.unwrap()[..], &payload[..]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Callers and typed requests
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_tagged_caller_with_body_and_hook() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/objectives/3"))
        .and(header("x-api-key", "secret"))
        .and(header("content-type", "application/json;charset=utf-8"))
        .and(body_json(json!({ "id": 3, "name": "zone" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3, "name": "zone" })))
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let pool = ApiPool::new();
    let caller = pool
        .caller_from_tag(&host, "/objectives/{}", &format!("PUT,BODY,{port}"))
        .unwrap()
        .with_codec(Codec::Json)
        .with_hook(|req| req.header("x-api-key", "secret"));
    let mut reply = caller.run_with_body(&objective(), &[&3]).await.unwrap();
    assert_eq!(reply.status_code(), 200);
    let echoed: Objective = reply.body_mut().json().await.unwrap();
    assert_eq!(echoed, objective());
}

#[tokio::test]
async fn test_server_json_api_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/observation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "name": "melvin" })))
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let rest = std::sync::Arc::new(RestServer::new(host, Some(port)));
    let caller = rest.json_api(HTTPMethod::Get, "observation", false);
    let mut reply = caller.run(&[]).await.unwrap();
    let found: Objective = reply.body_mut().decode().await.unwrap();
    assert_eq!(found.name, "melvin");
}

struct ObjectiveRequest {
    id: u32,
    update: Objective,
}

impl RestRequest for ObjectiveRequest {
    type Response = Objective;
    type Body = Objective;

    fn endpoint(&self) -> Cow<'_, str> { Cow::Owned(format!("/objectives/{}", self.id)) }
    fn request_method(&self) -> HTTPMethod { HTTPMethod::Patch }
    fn body(&self) -> Option<&Objective> { Some(&self.update) }
    fn codec(&self) -> Codec { Codec::Json }
    fn query(&self) -> Vec<(String, String)> { vec![("dry_run".to_string(), "false".to_string())] }
}

#[tokio::test]
async fn test_typed_request() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/objectives/3"))
        .and(query_param("dry_run", "false"))
        .and(body_json(json!({ "id": 3, "name": "zone" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3, "name": "zone" })))
        .expect(1)
        .mount(&server)
        .await;

    let (host, port) = endpoint(&server);
    let rest = RestServer::new(host, Some(port));
    let updated = ObjectiveRequest { id: 3, update: objective() }.send_request(&rest).await.unwrap();
    assert_eq!(updated, objective());
}
