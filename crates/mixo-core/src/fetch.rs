//! Best-effort retrieval of the recipe page for inline providers.

use std::time::Duration;

use url::Url;

use crate::config::FetchConfig;
use crate::prompt::SourceContent;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("scheme not allowed: {0}")]
    Scheme(String),

    #[error("private/local host blocked: {0}")]
    Blocked(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("response too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    #[error("response is not valid UTF-8")]
    NotUtf8,
}

#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
    block_private_hosts: bool,
}

impl SourceFetcher {
    #[must_use]
    pub fn new(config: &FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("page fetch client construction failed, using reqwest defaults: {e}");
                reqwest::Client::new()
            });

        Self {
            client,
            max_body_bytes: config.max_body_bytes,
            block_private_hosts: config.block_private_hosts,
        }
    }

    /// Retrieve the page text, degrading to [`SourceContent::UrlOnly`] on any failure.
    pub async fn fetch(&self, url: &str) -> SourceContent {
        match self.fetch_page(url).await {
            Ok(text) => {
                tracing::debug!(url, chars = text.chars().count(), "source page fetched");
                SourceContent::Page(text)
            }
            Err(e) => {
                tracing::warn!(url, "source page unavailable, using URL only: {e}");
                SourceContent::UrlOnly
            }
        }
    }

    /// Retrieve the page text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on a rejected URL, transport failure, non-2xx status,
    /// oversize body or non-UTF-8 body.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.validate_url(url)?;

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        if let Some(len) = resp.content_length()
            && usize::try_from(len).unwrap_or(usize::MAX) > self.max_body_bytes
        {
            return Err(FetchError::TooLarge {
                size: usize::try_from(len).unwrap_or(usize::MAX),
                max: self.max_body_bytes,
            });
        }

        let bytes = resp.bytes().await?;
        if bytes.len() > self.max_body_bytes {
            return Err(FetchError::TooLarge {
                size: bytes.len(),
                max: self.max_body_bytes,
            });
        }

        String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::NotUtf8)
    }

    fn validate_url(&self, raw: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(raw).map_err(|_| FetchError::InvalidUrl(raw.to_owned()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::Scheme(parsed.scheme().to_owned()));
        }

        if self.block_private_hosts
            && let Some(host) = parsed.host()
            && is_private_host(&host)
        {
            return Err(FetchError::Blocked(
                parsed.host_str().unwrap_or_default().to_owned(),
            ));
        }

        Ok(())
    }
}

fn is_private_v4(v4: std::net::Ipv4Addr) -> bool {
    v4.is_loopback()
        || v4.is_private()
        || v4.is_link_local()
        || v4.is_unspecified()
        || v4.is_broadcast()
}

fn is_private_host(host: &url::Host<&str>) -> bool {
    match host {
        url::Host::Domain(d) => d.eq_ignore_ascii_case("localhost"),
        url::Host::Ipv4(v4) => is_private_v4(*v4),
        url::Host::Ipv6(v6) => {
            if v6.is_loopback() || v6.is_unspecified() {
                return true;
            }
            let seg = v6.segments();
            // fe80::/10 link-local
            if seg[0] & 0xffc0 == 0xfe80 {
                return true;
            }
            // fc00::/7 unique local
            if seg[0] & 0xfe00 == 0xfc00 {
                return true;
            }
            v6.to_ipv4_mapped().is_some_and(is_private_v4)
        }
    }
}
