use std::{env, time::Duration};

use singletable_core::table::ProvisionPolicy;

/// Client and provisioning configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Custom endpoint URL, e.g. DynamoDB Local (default: unset)
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Timing of the wait for a new table to become active
    pub provision: ProvisionPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AWS_ENDPOINT_URL` - Custom endpoint (default: unset, real AWS)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `SINGLETABLE_PROVISION_INITIAL_DELAY_MS` - Sleep before the first poll (default: 1000)
    /// - `SINGLETABLE_PROVISION_POLL_INTERVAL_MS` - Sleep between polls (default: 3000)
    /// - `SINGLETABLE_PROVISION_TIMEOUT_SECS` - Provisioning ceiling (default: 60)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let mut provision = ProvisionPolicy::default();
        if let Some(ms) = number("SINGLETABLE_PROVISION_INITIAL_DELAY_MS") {
            provision = provision.with_initial_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = number("SINGLETABLE_PROVISION_POLL_INTERVAL_MS") {
            provision = provision.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(secs) = number("SINGLETABLE_PROVISION_TIMEOUT_SECS") {
            provision = provision.with_timeout(Duration::from_secs(secs));
        }

        Self {
            endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|url| !url.is_empty()),
            region: lookup("AWS_REGION")
                .filter(|region| !region.is_empty())
                .unwrap_or_else(|| "us-east-1".to_string()),
            provision,
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}
