//! Core traits for the reconciler
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Fetch the host's current public IP
//! - [`DnsProvider`]: Describe/add/update operations against the DNS provider

pub mod dns_provider;
pub mod ip_resolver;

pub use dns_provider::{DnsProvider, DnsRecord};
pub use ip_resolver::IpResolver;
