// # Aliyun DNS Provider
//
// This crate implements the `DnsProvider` trait against the Aliyun DNS
// (alidns) RPC API.
//
// ## Operations
//
// - DescribeDomainRecords: keyword query by host label and type, with
//   exact (RR, DomainName) re-filtering applied client-side
// - AddDomainRecord: create a new A record
// - UpdateDomainRecord: rewrite an existing record by its id
//
// Each operation is one signed GET request. There is NO retry, backoff,
// or caching here; a failed call fails the whole reconciliation run.
//
// ## API Reference
//
// - RPC endpoint: https://alidns.aliyuncs.com (region cn-hangzhou)
// - Signature: RPC signature v1.0, HMAC-SHA1 over the canonicalized
//   query string, key `<secret>&`, base64-encoded
// - Envelope fields consumed: `RecordId`, `DomainName`, `RR`, `Type`,
//   `Value`, `DomainRecords.Record[]`, and `Code` on logical failure
//
// ## Security
//
// The access key secret never appears in logs or `Debug` output.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use dnsync_core::{DnsProvider, DnsRecord, Error, Result};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use sha1::Sha1;
use std::time::Duration;

type HmacSha1 = Hmac<Sha1>;

/// alidns RPC endpoint
const ALIDNS_ENDPOINT: &str = "https://alidns.aliyuncs.com";

/// Fixed service region for all calls
const REGION: &str = "cn-hangzhou";

/// alidns API version
const API_VERSION: &str = "2015-01-09";

/// Page size for DescribeDomainRecords queries
const DESCRIBE_PAGE_SIZE: &str = "500";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// RFC 3986 unreserved characters pass through, everything else is
/// percent-encoded. This matches Aliyun's percentEncode rules
/// (space → %20, `*` → %2A, `~` kept literal).
const ALIYUN_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Aliyun DNS provider
///
/// Constructed once per reconciliation run and reused for the describe
/// call and the optional mutation, so every call signs with the same
/// credential pair.
pub struct AlidnsProvider {
    /// API access key id
    access_key_id: String,

    /// API access key secret
    /// Never log this value
    access_key_secret: String,

    /// RPC endpoint; overridable for tests
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Debug implementation that hides the access key secret
impl std::fmt::Debug for AlidnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlidnsProvider")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AlidnsProvider {
    /// Create a provider against the production alidns endpoint
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self::with_endpoint(access_key_id, access_key_secret, ALIDNS_ENDPOINT)
    }

    /// Create a provider against a specific endpoint (for tests)
    pub fn with_endpoint(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Issue one signed RPC call and return the parsed JSON envelope
    async fn call(&self, action: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let query = self.signed_query(action, params);
        let url = format!("{}/?{}", self.endpoint, query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::provider("alidns", format!("{} request failed: {}", action, e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::provider("alidns", format!("{} failed to read response: {}", action, e))
        })?;

        if !status.is_success() {
            // API-level failures come back as a JSON envelope with
            // Code/Message on a 4xx/5xx status.
            let detail = serde_json::from_str::<ApiFailure>(&body)
                .map(|f| format!("{}: {}", f.code, f.message))
                .unwrap_or(body);
            return Err(Error::provider(
                "alidns",
                format!("{} returned status {}: {}", action, status, detail),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::provider("alidns", format!("{} returned malformed JSON: {}", action, e))
        })
    }

    /// Build the full signed query string for one call
    ///
    /// Common parameters, the action-specific parameters, and the
    /// signature itself, all percent-encoded the way the signature
    /// was computed so the server reproduces the same string-to-sign.
    fn signed_query(&self, action: &str, params: &[(&str, &str)]) -> String {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_string();

        let mut pairs: Vec<(&str, &str)> = vec![
            ("Action", action),
            ("Format", "JSON"),
            ("Version", API_VERSION),
            ("AccessKeyId", &self.access_key_id),
            ("SignatureMethod", "HMAC-SHA1"),
            ("SignatureVersion", "1.0"),
            ("SignatureNonce", &nonce),
            ("Timestamp", &timestamp),
            ("RegionId", REGION),
        ];
        pairs.extend_from_slice(params);

        let canonical = canonicalize(&mut pairs);
        let signature = sign(&self.access_key_secret, &canonical);

        format!("{}&Signature={}", canonical, percent_encode(&signature))
    }
}

/// Percent-encode one component per Aliyun's rules
fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, ALIYUN_ENCODE_SET).to_string()
}

/// Sort and encode parameters into the canonicalized query string
fn canonicalize(pairs: &mut [(&str, &str)]) -> String {
    pairs.sort_unstable();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the RPC v1.0 signature over a canonicalized query
///
/// string-to-sign is `GET&%2F&percentEncode(query)`, keyed with the
/// secret plus a trailing `&`.
fn sign(secret: &str, canonical_query: &str) -> String {
    let string_to_sign = format!("GET&%2F&{}", percent_encode(canonical_query));
    let mut mac = HmacSha1::new_from_slice(format!("{}&", secret).as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// One record in a DescribeDomainRecords response
#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(rename = "RecordId")]
    record_id: String,
    #[serde(rename = "DomainName")]
    domain_name: String,
    #[serde(rename = "RR")]
    rr: String,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "Value")]
    value: String,
}

/// DescribeDomainRecords envelope
#[derive(Debug, Deserialize)]
struct DescribeResponse {
    #[serde(rename = "DomainRecords")]
    domain_records: WireRecordList,
}

#[derive(Debug, Deserialize)]
struct WireRecordList {
    #[serde(rename = "Record")]
    record: Vec<WireRecord>,
}

/// Add/UpdateDomainRecord envelope
#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(rename = "RecordId")]
    record_id: String,
    #[serde(rename = "Code", default)]
    code: Option<String>,
}

/// Error envelope carried on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiFailure {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

/// Apply exact (RR, DomainName) matching over a keyword query result
///
/// The server-side RRKeyWord filter is a substring match, so records
/// for other labels can come back. Iteration deliberately walks the
/// whole list and keeps the LAST exact match rather than the first.
fn select_record(records: Vec<WireRecord>, domain: &str, rr: &str) -> DnsRecord {
    let mut selected = DnsRecord::default();
    for record in records {
        if record.rr == rr && record.domain_name == domain {
            selected = DnsRecord {
                domain_name: record.domain_name,
                record_id: record.record_id,
                rr: record.rr,
                record_type: record.record_type,
                value: record.value,
            };
        }
    }
    selected
}

/// Check a mutation envelope for logical success
///
/// The call can return 200 with a parseable body that still reports
/// failure: an empty `RecordId`. That is a rejection, not a transport
/// error.
fn check_mutation(action: &str, envelope: serde_json::Value) -> Result<()> {
    let response: MutationResponse = serde_json::from_value(envelope).map_err(|e| {
        Error::provider(
            "alidns",
            format!("{} returned malformed envelope: {}", action, e),
        )
    })?;

    if response.record_id.is_empty() {
        return Err(Error::rejected(
            "alidns",
            response.code.unwrap_or_else(|| "unknown".to_string()),
        ));
    }
    Ok(())
}

#[async_trait]
impl DnsProvider for AlidnsProvider {
    async fn describe_record(&self, domain: &str, rr: &str) -> Result<DnsRecord> {
        tracing::debug!(domain, rr, "querying existing records");

        let envelope = self
            .call(
                "DescribeDomainRecords",
                &[
                    ("DomainName", domain),
                    ("PageSize", DESCRIBE_PAGE_SIZE),
                    ("RRKeyWord", rr),
                    ("TypeKeyWord", "A"),
                ],
            )
            .await?;

        let response: DescribeResponse = serde_json::from_value(envelope).map_err(|e| {
            Error::provider(
                "alidns",
                format!("DescribeDomainRecords returned malformed envelope: {}", e),
            )
        })?;

        let record = select_record(response.domain_records.record, domain, rr);
        if record.exists() {
            tracing::debug!(record_id = %record.record_id, value = %record.value, "found existing record");
        } else {
            tracing::debug!(domain, rr, "no existing record");
        }
        Ok(record)
    }

    async fn add_record(&self, domain: &str, rr: &str, ip: &str) -> Result<()> {
        tracing::debug!(domain, rr, ip, "adding record");

        let envelope = self
            .call(
                "AddDomainRecord",
                &[
                    ("DomainName", domain),
                    ("RR", rr),
                    ("Type", "A"),
                    ("Value", ip),
                ],
            )
            .await?;

        check_mutation("AddDomainRecord", envelope)
    }

    async fn update_record(&self, record_id: &str, rr: &str, ip: &str) -> Result<()> {
        tracing::debug!(record_id, rr, ip, "updating record");

        let envelope = self
            .call(
                "UpdateDomainRecord",
                &[
                    ("RecordId", record_id),
                    ("RR", rr),
                    ("Type", "A"),
                    ("Value", ip),
                ],
            )
            .await?;

        check_mutation("UpdateDomainRecord", envelope)
    }

    fn provider_name(&self) -> &'static str {
        "alidns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(record_id: &str, domain: &str, rr: &str, value: &str) -> WireRecord {
        WireRecord {
            record_id: record_id.to_string(),
            domain_name: domain.to_string(),
            rr: rr.to_string(),
            record_type: "A".to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn percent_encoding_follows_aliyun_rules() {
        assert_eq!(percent_encode("abc-_.~123"), "abc-_.~123");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a*b"), "a%2Ab");
        assert_eq!(percent_encode("a/b=c&d"), "a%2Fb%3Dc%26d");
    }

    #[test]
    fn canonicalization_sorts_by_key() {
        let mut pairs = vec![("Timestamp", "t"), ("Action", "A"), ("RR", "www")];
        assert_eq!(canonicalize(&mut pairs), "Action=A&RR=www&Timestamp=t");
    }

    #[test]
    fn signature_is_deterministic() {
        let a = sign("secret", "Action=DescribeDomainRecords&Format=JSON");
        let b = sign("secret", "Action=DescribeDomainRecords&Format=JSON");
        assert_eq!(a, b);
        assert_ne!(a, sign("other", "Action=DescribeDomainRecords&Format=JSON"));
    }

    #[test]
    fn select_record_requires_exact_match() {
        let records = vec![
            wire("r1", "example.com", "www", "1.1.1.1"),
            wire("r2", "other.com", "home", "2.2.2.2"),
        ];
        let selected = select_record(records, "example.com", "home");
        assert!(!selected.exists());
    }

    #[test]
    fn select_record_keeps_last_match() {
        let records = vec![
            wire("r1", "example.com", "home", "1.1.1.1"),
            wire("r2", "example.com", "www", "2.2.2.2"),
            wire("r3", "example.com", "home", "3.3.3.3"),
        ];
        let selected = select_record(records, "example.com", "home");
        assert_eq!(selected.record_id, "r3");
        assert_eq!(selected.value, "3.3.3.3");
    }

    #[test]
    fn mutation_with_record_id_succeeds() {
        let envelope = json!({ "RequestId": "x", "RecordId": "r1" });
        assert!(check_mutation("AddDomainRecord", envelope).is_ok());
    }

    #[test]
    fn mutation_with_empty_record_id_is_rejected() {
        let envelope = json!({ "RecordId": "", "Code": "DomainRecordDuplicate" });
        let err = check_mutation("AddDomainRecord", envelope).unwrap_err();
        match err {
            Error::Rejected { code, .. } => assert_eq!(code, "DomainRecordDuplicate"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn mutation_without_record_id_key_is_malformed() {
        let envelope = json!({ "RequestId": "x" });
        let err = check_mutation("AddDomainRecord", envelope).unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }

    #[test]
    fn debug_redacts_the_secret() {
        let provider = AlidnsProvider::new("key-id", "super-secret-value");
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<REDACTED>"));
    }
}
