// # dnsync-core
//
// Core library for the one-shot DNS A-record reconciler.
//
// ## Architecture Overview
//
// This library provides the decision logic for a single reconciliation run:
// - **IpResolver**: Trait for fetching the host's current public IP
// - **DnsProvider**: Trait for describe/add/update operations on the provider
// - **Reconciler**: Compares the stored record against the current IP and
//   applies the minimal corrective action (at most one mutation per run)
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **One-Shot**: One invocation is one complete attempt; no retry loops
// 3. **Library-First**: The binary is a thin integration layer over this crate
// 4. **No Process Control**: The core returns data; exit codes and
//    notifications are the caller's responsibility

pub mod error;
pub mod params;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use error::{Error, Result};
pub use params::ReconcileParams;
pub use reconciler::{Outcome, Reconciler};
pub use traits::{DnsProvider, DnsRecord, IpResolver};
