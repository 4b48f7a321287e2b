// # dnsync - one-shot DNS record synchronizer
//
// Thin integration layer over dnsync-core. This binary is responsible
// for:
// 1. Parsing command-line arguments / environment variables
// 2. Initializing tracing and the tokio runtime
// 3. Wiring the IP resolver and provider client into the Reconciler
// 4. Mapping the outcome to an exit code
//
// No decision logic lives here; run it from cron or a systemd timer
// and inspect the exit code:
//
// - 0: reconciled (record unchanged, created, or updated)
// - 1: configuration error (missing/empty parameter)
// - 2: runtime failure (IP lookup or provider call failed)
//
// ## Example
//
// ```bash
// dnsync \
//     --access-key-id "$ALIYUN_KEY_ID" \
//     --access-key-secret "$ALIYUN_KEY_SECRET" \
//     --domain example.com \
//     --rr home
// ```

use clap::Parser;
use dnsync_core::{Error, Outcome, ReconcileParams, Reconciler};
use dnsync_ip_http::HttpIpResolver;
use dnsync_provider_alidns::AlidnsProvider;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the different termination scenarios
///
/// Any successful reconciliation maps to 0 so schedulers only alert on
/// genuine failures.
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    /// Record is in sync (no-op, created, or updated)
    Success = 0,
    /// Configuration error (missing or empty parameter)
    ConfigError = 1,
    /// IP lookup or provider failure
    RuntimeError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep a DNS A record pointed at this host's public IP
#[derive(Debug, Parser)]
#[command(name = "dnsync", version, about)]
struct Cli {
    /// Provider API access key id
    #[arg(long, env = "DNSYNC_ACCESS_KEY_ID")]
    access_key_id: String,

    /// Provider API access key secret
    #[arg(long, env = "DNSYNC_ACCESS_KEY_SECRET", hide_env_values = true)]
    access_key_secret: String,

    /// Apex domain the record belongs to (e.g. example.com)
    #[arg(long, env = "DNSYNC_DOMAIN")]
    domain: String,

    /// Host label / subdomain to manage (e.g. home)
    #[arg(long, env = "DNSYNC_RR")]
    rr: String,

    /// URL of the public-IP lookup service
    #[arg(long, env = "DNSYNC_IP_LOOKUP_URL", default_value = dnsync_ip_http::DEFAULT_LOOKUP_URL)]
    ip_lookup_url: String,

    /// Update even when the stored value contains the new IP as a
    /// substring (disables the historical suppression quirk)
    #[arg(long)]
    strict_compare: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DNSYNC_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!("Invalid log level: {}", other);
            return SyncExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(cli)).into()
}

/// Run one reconciliation and map its result to an exit code
async fn run(cli: Cli) -> SyncExitCode {
    let params = ReconcileParams::new(
        cli.access_key_id.clone(),
        cli.access_key_secret.clone(),
        cli.domain,
        cli.rr,
    )
    .with_containment_suppression(!cli.strict_compare);

    let resolver = HttpIpResolver::with_url(cli.ip_lookup_url);
    let provider = AlidnsProvider::new(cli.access_key_id, cli.access_key_secret);
    let reconciler = Reconciler::new(Box::new(resolver), Box::new(provider));

    match reconciler.run(&params).await {
        Ok(Outcome::Unchanged { ip }) => {
            info!("record already points at {}, nothing to do", ip);
            SyncExitCode::Success
        }
        Ok(Outcome::Created { ip }) => {
            info!("created record {}.{} -> {}", params.rr, params.domain, ip);
            SyncExitCode::Success
        }
        Ok(Outcome::Updated {
            record_id,
            previous,
            ip,
        }) => {
            info!(
                "updated record {} ({} -> {})",
                record_id, previous, ip
            );
            SyncExitCode::Success
        }
        Err(e @ Error::Config(_)) => {
            error!("configuration error: {}", e);
            SyncExitCode::ConfigError
        }
        Err(e) => {
            error!("reconciliation failed: {}", e);
            SyncExitCode::RuntimeError
        }
    }
}
