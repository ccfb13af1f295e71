//! Declarative API callers.
//!
//! A caller is declared by three tag strings (host, URI and flags, see
//! [`TagInfo`]) and materialised into an [`ApiCaller`] by an [`ApiPool`].
//! The [`api_pool!`](crate::api_pool) macro builds a struct whose fields are
//! all populated that way:
//!
//! ```no_run
//! restcall::api_pool! {
//!     pub struct Users {
//!         pub get => (host = "api.example.org", uri = "/users/{}", flags = "GET,SSL"),
//!         pub create => (host = "api.example.org", uri = "/users", flags = "POST,SSL,BODY"),
//!     }
//! }
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let users = Users::parse()?;
//! let mut reply = users.get.run(&[&42]).await?;
//! let name: String = reply.body_mut().json().await?;
//! # Ok(()) }
//! ```

pub mod api_caller;
pub mod tag;


use crate::event;
use crate::server::RestServer;
use api_caller::ApiCaller;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use strum_macros::Display;
use tag::TagInfo;

static GLOBAL_POOL: OnceLock<ApiPool> = OnceLock::new();

/// Registry of [`RestServer`]s shared by the callers built from it.
///
/// Tags resolving to the same base URL share a single server.
#[derive(Debug, Default)]
pub struct ApiPool {
    servers: Mutex<HashMap<String, Arc<RestServer>>>,
}

impl ApiPool {
    pub fn new() -> ApiPool { ApiPool::default() }

    /// The process-wide pool used by generated `parse()` constructors.
    pub fn global() -> &'static ApiPool { GLOBAL_POOL.get_or_init(ApiPool::new) }

    /// The server for `tag`, created on first use.
    pub fn server(&self, tag: &TagInfo) -> Arc<RestServer> {
        let url = tag.base_url();
        let mut servers = self.servers.lock().unwrap_or_else(PoisonError::into_inner);
        let server = servers.entry(url).or_insert_with_key(|url| {
            event!("Registering server {url}");
            let port = Some(tag.port()).filter(|p| *p != 0);
            Arc::new(if tag.is_ssl() {
                RestServer::new_ssl(tag.host(), port)
            } else {
                RestServer::new(tag.host(), port)
            })
        });
        Arc::clone(server)
    }

    /// Builds a caller for `tag` using the process-wide default codec.
    pub fn caller(&self, tag: &TagInfo) -> ApiCaller {
        ApiCaller::new(self.server(tag), tag.method(), tag.uri(), tag.takes_body())
    }

    /// Parses a tag and builds its caller in one step.
    ///
    /// # Errors
    /// See [`TagInfo::parse`].
    pub fn caller_from_tag(&self, host: &str, uri: &str, flags: &str) -> Result<ApiCaller, PoolError> {
        Ok(self.caller(&TagInfo::parse(host, uri, flags)?))
    }

    /// Number of distinct servers registered so far.
    pub fn len(&self) -> usize { self.servers.lock().unwrap_or_else(PoisonError::into_inner).len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[derive(Debug, Display)]
pub enum PoolError {
    #[strum(to_string = "tag is missing the host")]
    MissingHost,
    #[strum(to_string = "tag is missing the uri")]
    MissingUri,
    #[strum(to_string = "tag flags name no http method")]
    MissingMethod,
    #[strum(to_string = "tag port is out of range")]
    InvalidPort(String),
}

impl std::error::Error for PoolError {}

/// Declares a struct of [`ApiCaller`] fields populated from tag strings.
///
/// The generated `parse()` uses [`ApiPool::global`], `parse_with(&pool)`
/// takes an explicit pool. Both fail on the first invalid tag.
#[macro_export]
macro_rules! api_pool {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident => (host = $host:expr, uri = $uri:expr, flags = $flags:expr $(,)?)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $crate::ApiCaller,
            )*
        }

        impl $name {
            /// Populates every caller from the process-wide pool.
            pub fn parse() -> ::std::result::Result<Self, $crate::PoolError> {
                Self::parse_with($crate::ApiPool::global())
            }

            /// Populates every caller from `pool`.
            pub fn parse_with(pool: &$crate::ApiPool) -> ::std::result::Result<Self, $crate::PoolError> {
                ::std::result::Result::Ok(Self {
                    $( $field: pool.caller_from_tag($host, $uri, $flags)?, )*
                })
            }
        }
    };
}
