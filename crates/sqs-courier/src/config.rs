//! Per-client configuration.
//!
//! Each [`QueueClient`](crate::QueueClient) is built from its own
//! [`ClientConfig`]. Nothing here touches process-wide SDK state, so clients
//! for different regions can live side by side.
//!
//! Sources for [`ClientConfig::load`], later sources overriding earlier ones:
//!  1. Built-in defaults (`region = "us-east-1"`)
//!  2. An optional configuration file (format inferred from its extension)
//!  3. Environment variables prefixed `SQS_COURIER__`,
//!     e.g. `SQS_COURIER__REGION=eu-west-1`

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SQS_COURIER";

/// Configuration for a single queue client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// AWS region the client's requests are scoped to
    pub region: String,
    /// Endpoint override, e.g. a local SQS emulator
    pub endpoint_url: Option<String>,
    /// Named profile for the shared credentials chain
    pub profile_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            profile_name: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for `region` with everything else defaulted
    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Load configuration from an optional file plus `SQS_COURIER__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading client configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| ConfigurationError::Parsing {
                message: e.to_string(),
            })?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigurationError::Parsing {
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration describes a usable client
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.region.trim().is_empty() {
            return Err(ConfigurationError::Invalid {
                message: "region cannot be empty".to_string(),
            });
        }

        if let Some(endpoint) = &self.endpoint_url {
            let parsed = url::Url::parse(endpoint).map_err(|e| ConfigurationError::Invalid {
                message: format!("endpoint_url '{}' is not a valid URL: {}", endpoint, e),
            })?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigurationError::Invalid {
                    message: format!(
                        "endpoint_url '{}' must use http or https, not '{}'",
                        endpoint,
                        parsed.scheme()
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
