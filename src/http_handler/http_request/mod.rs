pub mod dispatch;
pub mod request_common;
pub mod rest_client;
pub mod typed_request;
