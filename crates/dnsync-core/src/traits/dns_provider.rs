// # DNS Provider Trait
//
// Defines the interface for the three remote record operations the
// reconciler depends on: describe, add, update.
//
// ## Implementations
//
// - Aliyun DNS (alidns): `dnsync-provider-alidns` crate
//
// ## Contract
//
// Providers are isolated, stateless, single-shot collaborators:
// - One HTTP request per operation, no retry or backoff (the run
//   either fully reconciles or fully fails)
// - No caching between calls
// - No decision-making: whether to add or update is owned by the
//   `Reconciler`

use async_trait::async_trait;

/// Snapshot of a provider-side A record
///
/// Constructed empty, populated by a successful describe query, and
/// discarded at the end of the run. A fresh instance is produced per
/// reconciliation; the provider's stored record is the only durable
/// state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecord {
    /// Apex domain the record belongs to
    pub domain_name: String,
    /// Provider-assigned identifier; empty iff no matching record exists
    pub record_id: String,
    /// Host label (the RR portion)
    pub rr: String,
    /// Record type, expected to be "A"
    pub record_type: String,
    /// IPv4 literal currently stored at the provider
    pub value: String,
}

impl DnsRecord {
    /// Whether a matching record exists at the provider
    pub fn exists(&self) -> bool {
        !self.record_id.is_empty()
    }
}

/// Trait for DNS provider implementations
///
/// All three operations authenticate independently with the same
/// credential pair; the provider value is constructed once per run and
/// reused so the "exactly one mutation call" invariant is easy to
/// verify through a mock.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Query the existing A record for (domain, rr)
    ///
    /// The provider's own filter is a keyword match, so implementations
    /// must re-apply exact matching on both the host label and the
    /// domain name client-side. If several records qualify, the last
    /// one in response order wins. If none match, an empty `DnsRecord`
    /// is returned (`record_id` empty).
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The matching record, or an empty one
    /// - `Err(Error)`: Transport or API-level failure
    async fn describe_record(&self, domain: &str, rr: &str) -> Result<DnsRecord, crate::Error>;

    /// Create a new A record with the given value
    ///
    /// Succeeds iff the response carries a non-empty record id. A
    /// response that parses but carries an empty id is a logical
    /// rejection (`Error::Rejected`), not a transport failure.
    async fn add_record(&self, domain: &str, rr: &str, ip: &str) -> Result<(), crate::Error>;

    /// Modify the record identified by `record_id`, setting type "A"
    /// and the given value
    ///
    /// Same success/failure contract as [`DnsProvider::add_record`].
    async fn update_record(&self, record_id: &str, rr: &str, ip: &str)
    -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
