use std::{
    fmt,
    time::{Duration, Instant},
};

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{ClientResult, CounterClient, IncrementReceipt};
use crate::{ClientError, ICounter};

/// How often the pending nonce is polled while earlier transactions settle.
const SETTLE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A [`CounterClient`] backed by an alloy HTTP provider with a local signing wallet.
#[derive(Clone)]
pub struct AlloyCounterClient {
    provider: DynProvider,
    counter: ICounter::ICounterInstance<DynProvider>,
    address: Address,
    confirmations: u64,
    tx_timeout: Option<Duration>,
}

impl fmt::Debug for AlloyCounterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyCounterClient")
            .field("address", &self.address)
            .field("counter", self.counter.address())
            .field("confirmations", &self.confirmations)
            .field("tx_timeout", &self.tx_timeout)
            .finish()
    }
}

impl AlloyCounterClient {
    /// Connects to `rpc_url`, signing transactions with `signer`, and binds the counter at
    /// `counter_address`.
    pub fn new(signer: PrivateKeySigner, rpc_url: Url, counter_address: Address) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();
        let counter = ICounter::new(counter_address, provider.clone());

        Self { provider, counter, address, confirmations: 1, tx_timeout: None }
    }

    /// Number of block confirmations to wait for after inclusion.
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    /// Upper bound on how long to wait for a receipt. `None` waits indefinitely.
    ///
    /// The same bound applies to waiting for a timed-out transaction to leave the pending pool
    /// before the next submission.
    pub fn with_tx_timeout(mut self, tx_timeout: Option<Duration>) -> Self {
        self.tx_timeout = tx_timeout;
        self
    }

    /// Waits until the account has no transactions between its latest and pending nonce.
    async fn wait_for_settled_nonce(&self) -> ClientResult<()> {
        let started = Instant::now();
        loop {
            let latest = self
                .provider
                .get_transaction_count(self.address)
                .latest()
                .await
                .map_err(rpc_error)?;
            let pending = self
                .provider
                .get_transaction_count(self.address)
                .pending()
                .await
                .map_err(rpc_error)?;

            if nonce_settled(latest, pending, started.elapsed(), self.tx_timeout)? {
                return Ok(());
            }

            debug!(latest, pending, "waiting for pending transactions to settle");
            tokio::time::sleep(SETTLE_POLL_INTERVAL).await;
        }
    }
}

/// Whether the account has no unconfirmed transactions, or an error once `timeout` has elapsed
/// with some still pending.
fn nonce_settled(
    latest: u64,
    pending: u64,
    elapsed: Duration,
    timeout: Option<Duration>,
) -> ClientResult<bool> {
    let outstanding = pending.saturating_sub(latest);
    if outstanding == 0 {
        return Ok(true);
    }
    if timeout.is_some_and(|timeout| elapsed >= timeout) {
        return Err(ClientError::Outstanding(outstanding));
    }
    Ok(false)
}

/// Maps a receipt for an `increment()` transaction sent to `counter_address`.
///
/// A zero effective gas price is reported as `None`. The new count is read from the first
/// `Incremented` log emitted by the counter itself.
fn summarize(
    receipt: &TransactionReceipt,
    counter_address: Address,
) -> ClientResult<IncrementReceipt> {
    if !receipt.status() {
        return Err(ClientError::Reverted(receipt.transaction_hash));
    }

    let new_count = receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == counter_address)
        .find_map(|log| log.log_decode::<ICounter::Incremented>().ok())
        .map(|log| log.inner.data.newCount);

    Ok(IncrementReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
        effective_gas_price: (receipt.effective_gas_price > 0)
            .then_some(receipt.effective_gas_price),
        new_count,
    })
}

fn rpc_error(err: impl fmt::Display) -> ClientError {
    ClientError::Rpc(err.to_string())
}

fn contract_error(err: impl fmt::Display) -> ClientError {
    ClientError::Contract(err.to_string())
}

#[async_trait]
impl CounterClient for AlloyCounterClient {
    fn address(&self) -> Address {
        self.address
    }

    fn counter_address(&self) -> Address {
        *self.counter.address()
    }

    async fn chain_id(&self) -> ClientResult<u64> {
        self.provider.get_chain_id().await.map_err(rpc_error)
    }

    async fn balance(&self) -> ClientResult<U256> {
        self.provider.get_balance(self.address).await.map_err(rpc_error)
    }

    async fn gas_price(&self) -> ClientResult<u128> {
        self.provider.get_gas_price().await.map_err(rpc_error)
    }

    async fn count(&self) -> ClientResult<U256> {
        self.counter.getCount().call().await.map_err(contract_error)
    }

    async fn owner(&self) -> ClientResult<Address> {
        self.counter.owner().call().await.map_err(contract_error)
    }

    async fn increment(&self) -> ClientResult<IncrementReceipt> {
        // a timed-out transaction from an earlier attempt may still be in the pool
        self.wait_for_settled_nonce().await?;

        let pending = self.counter.increment().send().await.map_err(contract_error)?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, confirmations = self.confirmations, "increment submitted");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.tx_timeout)
            .get_receipt()
            .await
            .map_err(|e| ClientError::Confirmation { tx_hash, reason: e.to_string() })?;

        summarize(&receipt, self.counter_address())
    }
}
