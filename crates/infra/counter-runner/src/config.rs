use std::{fmt, path::PathBuf, time::Duration};

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use crate::{ConfigError, Pacing};

/// Public Sepolia endpoint used when no RPC URL is configured.
pub const DEFAULT_RPC_URL: &str = "https://rpc.sepolia.org";

/// Configuration for a single run.
///
/// This struct is clap-free so the library can be driven from tests or any other source.
/// Required values are kept optional here and checked by [`RunnerConfig::validate`], so a
/// missing key or address surfaces as a [`ConfigError`] instead of a parser failure.
#[derive(Clone)]
pub struct RunnerConfig {
    /// Hex-encoded signing key.
    pub private_key: Option<String>,
    /// JSON-RPC endpoint. Falls back to [`DEFAULT_RPC_URL`] when unset or blank.
    pub rpc_url: Option<String>,
    /// Address of the deployed counter contract.
    pub counter_address: Option<String>,
    /// Number of increment attempts.
    pub attempts: u64,
    /// Lower bound of the pause after a successful attempt.
    pub min_delay: Duration,
    /// Upper bound of the pause after a successful attempt.
    pub max_delay: Duration,
    /// Pause after a failed attempt.
    pub retry_backoff: Duration,
    /// Optional upper bound on the wait for a receipt.
    pub tx_timeout: Option<Duration>,
    /// Block confirmations required before a transaction counts as confirmed.
    pub confirmations: u64,
    /// Seed for the pause generator.
    pub seed: Option<u64>,
    /// Where to write the JSON report, if anywhere.
    pub output: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            rpc_url: None,
            counter_address: None,
            attempts: 50,
            min_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(3_000),
            retry_backoff: Duration::from_millis(5_000),
            tx_timeout: None,
            confirmations: 1,
            seed: None,
            output: None,
        }
    }
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("rpc_url", &self.rpc_url)
            .field("counter_address", &self.counter_address)
            .field("attempts", &self.attempts)
            .field("min_delay", &self.min_delay)
            .field("max_delay", &self.max_delay)
            .field("retry_backoff", &self.retry_backoff)
            .field("tx_timeout", &self.tx_timeout)
            .field("confirmations", &self.confirmations)
            .field("seed", &self.seed)
            .field("output", &self.output)
            .finish()
    }
}

impl RunnerConfig {
    /// Checks every startup value without touching the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signer()?;
        self.counter_address()?;
        self.endpoint()?;
        if self.min_delay > self.max_delay {
            return Err(ConfigError::InvalidDelayRange { min: self.min_delay, max: self.max_delay });
        }
        Ok(())
    }

    /// Parses the signing key.
    pub fn signer(&self) -> Result<PrivateKeySigner, ConfigError> {
        let key = non_empty(self.private_key.as_deref()).ok_or(ConfigError::MissingPrivateKey)?;
        key.parse::<PrivateKeySigner>().map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))
    }

    /// Parses the counter contract address.
    pub fn counter_address(&self) -> Result<Address, ConfigError> {
        let raw =
            non_empty(self.counter_address.as_deref()).ok_or(ConfigError::MissingCounterAddress)?;
        raw.parse::<Address>().map_err(|e| ConfigError::InvalidCounterAddress {
            address: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Parses the RPC endpoint.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = non_empty(self.rpc_url.as_deref()).unwrap_or(DEFAULT_RPC_URL);
        raw.parse::<Url>().map_err(|e| ConfigError::InvalidRpcUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Pause schedule derived from the delay settings.
    pub fn pacing(&self) -> Pacing {
        Pacing::new(self.min_delay, self.max_delay, self.retry_backoff, self.seed)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
