//! Core reconciliation logic
//!
//! The Reconciler is responsible for:
//! - Obtaining the current public IP via IpResolver
//! - Querying the existing record via DnsProvider
//! - Applying the decision policy (no-op / add / update)
//! - Reporting the outcome to the caller
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐          ┌──────────────┐
//! │ IpResolver  │          │ DnsProvider  │
//! │ (current IP)│          │ (describe)   │
//! └──────┬──────┘          └──────┬───────┘
//!        │    both must complete  │
//!        └──────────┬─────────────┘
//!                   ▼
//!           ┌──────────────┐
//!           │  Reconciler  │── decision policy
//!           └──────┬───────┘
//!                  ▼
//!        at most one mutation
//!         (add OR update)
//! ```
//!
//! The reconciler never retries, never exits the process, and never
//! sends notifications; those are caller responsibilities.

use crate::error::Result;
use crate::params::ReconcileParams;
use crate::traits::{DnsProvider, IpResolver};
use tracing::{debug, info};

/// Outcome of one reconciliation run
///
/// Failures are the `Err` side of [`Reconciler::run`]; this enum only
/// describes the ways a run can succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The stored record already matches the current IP
    Unchanged {
        /// The IP both sides agree on
        ip: String,
    },

    /// No record existed; a new one was added
    Created {
        /// The IP written to the new record
        ip: String,
    },

    /// An existing record's value was changed
    Updated {
        /// Provider-assigned id of the modified record
        record_id: String,
        /// Value stored before the update
        previous: String,
        /// The IP written
        ip: String,
    },
}

/// One-shot DNS record reconciler
///
/// Holds the two collaborators for the duration of a single run. The
/// provider value is constructed once and reused for describe and the
/// optional mutation, so a counting mock can verify that at most one
/// mutation call happens per run.
pub struct Reconciler {
    /// Resolver for the host's current public IP
    resolver: Box<dyn IpResolver>,

    /// DNS provider client for describe/add/update
    provider: Box<dyn DnsProvider>,
}

impl Reconciler {
    /// Create a new reconciler from its two collaborators
    pub fn new(resolver: Box<dyn IpResolver>, provider: Box<dyn DnsProvider>) -> Self {
        Self { resolver, provider }
    }

    /// Run one reconciliation
    ///
    /// Validates the input, performs the two independent reads
    /// concurrently, then applies the decision policy:
    ///
    /// 1. current IP equals the stored value → [`Outcome::Unchanged`]
    /// 2. no record exists → add → [`Outcome::Created`]
    /// 3. otherwise → update by record id → [`Outcome::Updated`]
    ///
    /// Branch 3 carries the containment quirk: when
    /// `containment_suppresses_update` is set (the default) and the
    /// stored value contains the new IP as a substring, the update is
    /// suppressed and the run reports [`Outcome::Unchanged`].
    ///
    /// Either read failing aborts the run before any mutation; at most
    /// one mutation call (add or update) occurs per run.
    pub async fn run(&self, params: &ReconcileParams) -> Result<Outcome> {
        params.validate()?;

        // Both reads are independent; issue them together. Either
        // failure surfaces before the decision policy runs.
        let (existing, current_ip) = tokio::try_join!(
            self.provider.describe_record(&params.domain, &params.rr),
            self.resolver.resolve(),
        )?;

        debug!(
            record_id = %existing.record_id,
            stored = %existing.value,
            current = %current_ip,
            "reconciling {}.{}",
            params.rr,
            params.domain
        );

        if current_ip == existing.value {
            info!("record value matches current IP, nothing to do");
            return Ok(Outcome::Unchanged { ip: current_ip });
        }

        if !existing.exists() {
            info!("no existing record, adding {}.{} -> {}", params.rr, params.domain, current_ip);
            self.provider
                .add_record(&params.domain, &params.rr, &current_ip)
                .await?;
            return Ok(Outcome::Created { ip: current_ip });
        }

        if params.containment_suppresses_update && existing.value.contains(current_ip.as_str()) {
            // Stored value contains the new IP as a substring. The
            // original updater treats this the same as an exact match
            // and skips the update.
            info!(
                stored = %existing.value,
                current = %current_ip,
                "stored value contains current IP, suppressing update"
            );
            return Ok(Outcome::Unchanged { ip: current_ip });
        }

        info!(
            "updating record {} from {} to {}",
            existing.record_id, existing.value, current_ip
        );
        self.provider
            .update_record(&existing.record_id, &params.rr, &current_ip)
            .await?;

        Ok(Outcome::Updated {
            record_id: existing.record_id,
            previous: existing.value,
            ip: current_ip,
        })
    }
}
