pub mod body;
pub mod response;
pub mod response_common;
