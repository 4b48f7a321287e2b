// # IP Resolver Trait
//
// Defines the interface for discovering the host's current public IP.
//
// ## Implementations
//
// - HTTP lookup service: `dnsync-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsync_core::IpResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//     let ip = resolver.resolve().await?;
//     println!("public IP: {ip}");
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for public-IP resolver implementations
///
/// A resolver performs exactly one lookup attempt per call. It must not
/// retry internally; a failed lookup aborts the whole run and the
/// scheduler decides whether to try again with a fresh invocation.
///
/// The IP is returned as the literal text reported by the lookup
/// service. The reconciler compares it against the provider's stored
/// value as a string, so implementations must strip incidental framing
/// (trailing newlines, byte-string markers) but not reformat the
/// address itself.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The IPv4 literal (e.g. "1.2.3.4")
    /// - `Err(Error)`: Transport failure or non-200 response
    async fn resolve(&self) -> Result<String, crate::Error>;
}
