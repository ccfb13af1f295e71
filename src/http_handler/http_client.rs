use super::http_request::request_common::RequestError;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Default timeout applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

static CERT_VERIFY: AtomicBool = AtomicBool::new(false);
static DEFAULT_TIMEOUT_MS: AtomicU64 = AtomicU64::new(5_000);

static VERIFYING_CLIENT: OnceLock<HTTPClient> = OnceLock::new();
static TRUSTING_CLIENT: OnceLock<HTTPClient> = OnceLock::new();

/// Switches TLS certificate verification on or off for every request sent
/// after this call. Verification is off until enabled.
pub fn verify_cert(verify: bool) { CERT_VERIFY.store(verify, Ordering::Relaxed); }

/// Returns whether TLS certificates are currently verified.
pub fn cert_verification() -> bool { CERT_VERIFY.load(Ordering::Relaxed) }

/// Replaces the timeout used by requests that carry no timeout of their own.
pub fn set_default_timeout(timeout: Duration) {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    DEFAULT_TIMEOUT_MS.store(millis, Ordering::Relaxed);
}

/// Returns the timeout used by requests that carry no timeout of their own.
pub fn default_timeout() -> Duration { Duration::from_millis(DEFAULT_TIMEOUT_MS.load(Ordering::Relaxed)) }

/// A thin wrapper around `reqwest::Client` with the crate's transport
/// defaults applied.
///
/// Response decompression is switched off on the transport: bodies are
/// decoded by [`Body`](crate::Body) so that the `Content-Encoding` header
/// stays visible to callers.
#[derive(Debug, Clone)]
pub struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Whether TLS certificates are checked by `client`.
    verify: bool,
}

impl HTTPClient {
    /// Constructs a new `HTTPClient`.
    ///
    /// # Arguments
    /// * `verify` – Whether TLS certificates are checked.
    ///
    /// # Errors
    /// Returns [`RequestError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(verify: bool) -> Result<HTTPClient, RequestError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify)
            .timeout(DEFAULT_TIMEOUT)
            .no_gzip()
            .no_deflate()
            .no_brotli()
            .build()?;
        Ok(HTTPClient { client, verify })
    }

    /// Returns the process-wide client matching the current verification
    /// setting, creating it on first use.
    ///
    /// # Errors
    /// See [`HTTPClient::new`].
    pub fn shared() -> Result<&'static HTTPClient, RequestError> {
        let verify = cert_verification();
        let slot = if verify { &VERIFYING_CLIENT } else { &TRUSTING_CLIENT };
        if let Some(client) = slot.get() {
            return Ok(client);
        }
        let client = HTTPClient::new(verify)?;
        Ok(slot.get_or_init(|| client))
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns whether this client checks TLS certificates.
    pub fn verifies_certs(&self) -> bool { self.verify }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_client_follows_verification_flag() {
        let _guard = crate::GLOBAL_SETTINGS.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        verify_cert(true);
        let verifying = HTTPClient::shared().unwrap();
        assert!(verifying.verifies_certs());
        verify_cert(false);
        let trusting = HTTPClient::shared().unwrap();
        assert!(!trusting.verifies_certs());
        assert!(!cert_verification());
    }
}
