//! Error types for the counter runner.

use std::time::Duration;

use alloy_primitives::{Address, TxHash};
use thiserror::Error;

/// Invalid or missing startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No signing key was supplied.
    #[error("PRIVATE_KEY is not set")]
    MissingPrivateKey,

    /// No counter contract address was supplied.
    #[error("COUNTER_ADDRESS is not set")]
    MissingCounterAddress,

    /// The signing key could not be parsed.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The counter contract address could not be parsed.
    #[error("invalid counter address {address:?}: {reason}")]
    InvalidCounterAddress {
        /// The raw value that failed to parse.
        address: String,
        /// Parser message.
        reason: String,
    },

    /// The RPC endpoint is not a valid URL.
    #[error("invalid rpc url {url:?}: {reason}")]
    InvalidRpcUrl {
        /// The raw value that failed to parse.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The jitter range is inverted.
    #[error("min delay {min:?} exceeds max delay {max:?}")]
    InvalidDelayRange {
        /// Lower bound.
        min: Duration,
        /// Upper bound.
        max: Duration,
    },
}

/// A failed interaction with the endpoint or the counter contract.
#[derive(Debug, Error)]
pub enum ClientError {
    /// JSON-RPC transport or node error.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// Contract call or submission error.
    #[error("contract error: {0}")]
    Contract(String),

    /// Error while waiting for the transaction to be confirmed.
    #[error("confirmation of {tx_hash} failed: {reason}")]
    Confirmation {
        /// Hash of the submitted transaction.
        tx_hash: TxHash,
        /// Underlying message.
        reason: String,
    },

    /// The transaction was included but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// Earlier transactions from the signing account are still unconfirmed.
    #[error("{0} earlier transaction(s) still pending")]
    Outstanding(u64),
}

/// Errors returned from [`run`](crate::run) and [`Runner::run`](crate::Runner::run).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Startup configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The signing account holds no funds.
    #[error("account {0} has zero balance")]
    ZeroBalance(Address),

    /// A startup or shutdown query against the endpoint failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Report(String),
}
