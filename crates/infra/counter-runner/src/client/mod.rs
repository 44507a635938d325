//! Endpoint access for the runner.

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::ClientError;

mod alloy_client;
pub use alloy_client::AlloyCounterClient;

/// Result alias for [`CounterClient`] operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Outcome of a confirmed `increment()` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementReceipt {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was included in, if reported.
    pub block_number: Option<u64>,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Effective gas price reported by the receipt. `None` when the node omits it.
    pub effective_gas_price: Option<u128>,
    /// Counter value emitted by the `Incremented` event, if present in the receipt logs.
    pub new_count: Option<U256>,
}

/// The operations the runner needs from the endpoint and the counter contract.
///
/// Every call is awaited to completion before the next one is issued.
#[async_trait]
pub trait CounterClient: Send + Sync {
    /// Address of the signing identity.
    fn address(&self) -> Address;

    /// Address of the counter contract.
    fn counter_address(&self) -> Address;

    /// Chain id of the connected network.
    async fn chain_id(&self) -> ClientResult<u64>;

    /// Current balance of the signing identity, in wei.
    async fn balance(&self) -> ClientResult<U256>;

    /// Current gas price suggested by the endpoint, in wei.
    async fn gas_price(&self) -> ClientResult<u128>;

    /// Reads `getCount()`.
    async fn count(&self) -> ClientResult<U256>;

    /// Reads `owner()`.
    async fn owner(&self) -> ClientResult<Address>;

    /// Submits `increment()` and waits until it is confirmed.
    ///
    /// A transaction that is included but reverted is an error.
    async fn increment(&self) -> ClientResult<IncrementReceipt>;
}
