//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Create an HTTP client for provider calls.
///
/// Config: 30s connect timeout, caller-supplied request timeout, rustls TLS,
/// `mixo/{version}` user-agent, redirect limit 10.
#[must_use]
pub fn default_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .user_agent(concat!("mixo/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("HTTP client construction failed, using reqwest defaults: {e}");
            reqwest::Client::new()
        })
}
