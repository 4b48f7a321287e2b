//! Test doubles and common utilities for reconciler contract tests
//!
//! The mocks count every call and record mutation arguments so tests
//! can assert the "at most one mutation per run" invariant directly.

use async_trait::async_trait;
use dnsync_core::error::{Error, Result};
use dnsync_core::traits::{DnsProvider, DnsRecord, IpResolver};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An IP resolver that always returns the same literal
#[derive(Clone)]
pub struct StaticIpResolver {
    ip: String,
    resolve_call_count: Arc<AtomicUsize>,
}

impl StaticIpResolver {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpResolver for StaticIpResolver {
    async fn resolve(&self) -> Result<String> {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip.clone())
    }
}

/// An IP resolver that always fails, as a non-200 lookup would
#[derive(Clone)]
pub struct FailingIpResolver;

#[async_trait]
impl IpResolver for FailingIpResolver {
    async fn resolve(&self) -> Result<String> {
        Err(Error::ip_lookup("lookup service returned status 503"))
    }
}

/// Recorded arguments of one mutation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationCall {
    Add {
        domain: String,
        rr: String,
        ip: String,
    },
    Update {
        record_id: String,
        rr: String,
        ip: String,
    },
}

/// A mock DnsProvider with a scripted describe result
///
/// Clones share all state, so a test can keep one handle for
/// assertions and hand another to the reconciler.
///
/// With `reflect_mutations` enabled, add/update also rewrite the
/// scripted record the way the real provider's store would, which lets
/// tests re-run the reconciler against the post-mutation state.
#[derive(Clone)]
pub struct MockDnsProvider {
    record: Arc<Mutex<DnsRecord>>,
    calls: Arc<Mutex<Vec<MutationCall>>>,
    describe_call_count: Arc<AtomicUsize>,
    fail_describe: bool,
    reject_mutations: bool,
    reflect_mutations: bool,
}

impl MockDnsProvider {
    /// Provider with no existing record
    pub fn empty() -> Self {
        Self::with_record(DnsRecord::default())
    }

    /// Provider whose describe returns the given record
    pub fn with_record(record: DnsRecord) -> Self {
        Self {
            record: Arc::new(Mutex::new(record)),
            calls: Arc::new(Mutex::new(Vec::new())),
            describe_call_count: Arc::new(AtomicUsize::new(0)),
            fail_describe: false,
            reject_mutations: false,
            reflect_mutations: false,
        }
    }

    /// Make describe fail at the transport level
    pub fn failing_describe(mut self) -> Self {
        self.fail_describe = true;
        self
    }

    /// Make add/update return a logical rejection (empty record id)
    pub fn rejecting_mutations(mut self) -> Self {
        self.reject_mutations = true;
        self
    }

    /// Make add/update rewrite the scripted record like a real store
    pub fn reflecting_mutations(mut self) -> Self {
        self.reflect_mutations = true;
        self
    }

    pub fn describe_call_count(&self) -> usize {
        self.describe_call_count.load(Ordering::SeqCst)
    }

    /// All recorded mutation calls, in order
    pub fn mutation_calls(&self) -> Vec<MutationCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    async fn describe_record(&self, domain: &str, rr: &str) -> Result<DnsRecord> {
        self.describe_call_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_describe {
            return Err(Error::provider("mock", "describe transport failure"));
        }

        let record = self.record.lock().unwrap().clone();

        // Same exact-match contract the real client applies
        if record.exists() && (record.domain_name != domain || record.rr != rr) {
            return Ok(DnsRecord::default());
        }
        Ok(record)
    }

    async fn add_record(&self, domain: &str, rr: &str, ip: &str) -> Result<()> {
        self.calls.lock().unwrap().push(MutationCall::Add {
            domain: domain.to_string(),
            rr: rr.to_string(),
            ip: ip.to_string(),
        });

        if self.reject_mutations {
            return Err(Error::rejected("mock", "InvalidDomainName.NoExist"));
        }

        if self.reflect_mutations {
            let mut record = self.record.lock().unwrap();
            *record = DnsRecord {
                domain_name: domain.to_string(),
                record_id: "mock-created".to_string(),
                rr: rr.to_string(),
                record_type: "A".to_string(),
                value: ip.to_string(),
            };
        }
        Ok(())
    }

    async fn update_record(&self, record_id: &str, rr: &str, ip: &str) -> Result<()> {
        self.calls.lock().unwrap().push(MutationCall::Update {
            record_id: record_id.to_string(),
            rr: rr.to_string(),
            ip: ip.to_string(),
        });

        if self.reject_mutations {
            return Err(Error::rejected("mock", "DomainRecordDuplicate"));
        }

        if self.reflect_mutations {
            let mut record = self.record.lock().unwrap();
            record.value = ip.to_string();
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A record snapshot as a successful describe would build it
pub fn existing_record(record_id: &str, value: &str) -> DnsRecord {
    DnsRecord {
        domain_name: "example.com".to_string(),
        record_id: record_id.to_string(),
        rr: "home".to_string(),
        record_type: "A".to_string(),
        value: value.to_string(),
    }
}

/// Parameters matching the record built by [`existing_record`]
pub fn default_params() -> dnsync_core::ReconcileParams {
    dnsync_core::ReconcileParams::new("test-key", "test-secret", "example.com", "home")
}
