//! Caller-supplied parameters for one reconciliation run

use serde::{Deserialize, Serialize};

/// Input for a single reconciliation run
///
/// All four credential/domain fields must be non-empty; a missing value
/// is a configuration error reported before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileParams {
    /// Provider API access key id
    pub access_key_id: String,

    /// Provider API access key secret
    pub access_key_secret: String,

    /// Apex domain (e.g. "example.com")
    pub domain: String,

    /// Host label / RR prefixed to the apex domain (e.g. "home")
    pub rr: String,

    /// Treat "new IP is a substring of the stored value" as unchanged.
    ///
    /// This reproduces a long-standing quirk of the original updater:
    /// an update is suppressed not only on exact equality but also when
    /// the stored value merely contains the new IP as a substring.
    /// Disable only after confirming no deployment depends on it.
    #[serde(default = "default_containment_suppression")]
    pub containment_suppresses_update: bool,
}

fn default_containment_suppression() -> bool {
    true
}

impl ReconcileParams {
    /// Create parameters with the default update-suppression policy
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        domain: impl Into<String>,
        rr: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            domain: domain.into(),
            rr: rr.into(),
            containment_suppresses_update: default_containment_suppression(),
        }
    }

    /// Override the containment-suppression policy flag
    pub fn with_containment_suppression(mut self, enabled: bool) -> Self {
        self.containment_suppresses_update = enabled;
        self
    }

    /// Validate that all required fields are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.access_key_id.is_empty() {
            return Err(crate::Error::config("access key id must not be empty"));
        }
        if self.access_key_secret.is_empty() {
            return Err(crate::Error::config("access key secret must not be empty"));
        }
        if self.domain.is_empty() {
            return Err(crate::Error::config("domain must not be empty"));
        }
        if self.rr.is_empty() {
            return Err(crate::Error::config("host label (rr) must not be empty"));
        }
        Ok(())
    }
}
