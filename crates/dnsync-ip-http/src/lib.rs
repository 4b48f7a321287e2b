// # HTTP IP Resolver
//
// Fetches the host's current public IPv4 address from a "get my IP"
// HTTP endpoint.
//
// ## Contract
//
// - One GET per resolve() call, no retries (a failed lookup fails the
//   whole run; the scheduler owns the next attempt)
// - The response must be a 200 with a plain-text IPv4 literal
// - Trailing newlines and a leading `b` byte-string marker, which some
//   lookup services emit, are stripped before the literal is parsed

use async_trait::async_trait;
use dnsync_core::{Error, IpResolver, Result};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default lookup endpoint
pub const DEFAULT_LOOKUP_URL: &str = "http://members.3322.org/dyndns/getip";

/// HTTP timeout for the lookup request
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public-IP resolver
pub struct HttpIpResolver {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against the default lookup endpoint
    pub fn new() -> Self {
        Self::with_url(DEFAULT_LOOKUP_URL)
    }

    /// Create a resolver against a specific lookup endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip incidental framing from a lookup response body
///
/// Lookup services answer with the bare IP followed by a newline, and
/// some front-ends leak a leading `b` byte-string marker into the body.
fn clean_body(body: &str) -> &str {
    body.trim_end_matches(['\r', '\n']).trim_start_matches('b')
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_lookup(format!("request failed: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::ip_lookup(format!(
                "lookup service returned status {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_lookup(format!("failed to read response: {}", e)))?;

        let ip = clean_body(&body);

        // Anything that is not an IPv4 literal would poison the string
        // comparison downstream, so reject it here.
        ip.parse::<Ipv4Addr>()
            .map_err(|_| Error::ip_lookup(format!("response is not an IPv4 address: {:?}", ip)))?;

        tracing::debug!(ip, "resolved public IP");
        Ok(ip.to_string())
    }
}
