//! The sequential increment loop.

use std::time::Instant;

use alloy_primitives::{U256, utils::format_ether};
use tracing::{debug, error, info, warn};

use crate::{
    AlloyCounterClient, ClientResult, CounterClient, IncrementReceipt, Pacing, RunReport,
    RunStatistics, RunnerConfig, RunnerError, RunnerMetrics, Sleeper, TokioSleeper,
};

const GWEI: u64 = 1_000_000_000;

/// A confirmed attempt with the gas price it was charged at.
#[derive(Debug)]
struct Confirmed {
    receipt: IncrementReceipt,
    gas_price: u128,
    count_before: U256,
}

/// Issues a fixed number of `increment()` transactions one at a time and accounts for them.
///
/// A failed attempt is counted and followed by the fixed backoff; the loop then moves on to the
/// next index. A successful attempt is followed by a random pause unless it was the last one.
#[derive(Debug)]
pub struct Runner<C, S = TokioSleeper> {
    client: C,
    sleeper: S,
    pacing: Pacing,
    attempts: u64,
    metrics: RunnerMetrics,
}

impl<C: CounterClient, S: Sleeper> Runner<C, S> {
    /// Creates a runner that will make `attempts` attempts.
    pub fn new(client: C, sleeper: S, pacing: Pacing, attempts: u64) -> Self {
        Self { client, sleeper, pacing, attempts, metrics: RunnerMetrics::default() }
    }

    /// Runs every attempt and returns the summary.
    ///
    /// Only the startup checks and the closing reads can fail; per-attempt errors are absorbed
    /// into the statistics.
    pub async fn run(mut self) -> Result<RunReport, RunnerError> {
        let account = self.client.address();
        let counter = self.client.counter_address();

        let chain_id = self.client.chain_id().await?;
        match self.client.owner().await {
            Ok(owner) => debug!(%owner, %counter, "counter owner"),
            Err(err) => warn!(error = %err, %counter, "failed to read counter owner"),
        }

        let initial_balance = self.client.balance().await?;
        if initial_balance.is_zero() {
            return Err(RunnerError::ZeroBalance(account));
        }
        let initial_count = self.client.count().await?;

        info!(
            chain_id,
            %account,
            %counter,
            balance_eth = %format_ether(initial_balance),
            count = %initial_count,
            attempts = self.attempts,
            "starting increment run"
        );

        let mut stats = RunStatistics::new(initial_count, initial_balance);

        for attempt in 1..=self.attempts {
            self.metrics.attempts.increment(1);

            match self.attempt(attempt).await {
                Ok(confirmed) => {
                    let receipt = &confirmed.receipt;
                    let cost = stats.record_success(receipt.gas_used, confirmed.gas_price);
                    self.metrics.successes.increment(1);
                    self.metrics.gas_used.record(receipt.gas_used as f64);

                    info!(
                        attempt,
                        total = self.attempts,
                        tx_hash = %receipt.tx_hash,
                        block = ?receipt.block_number,
                        count_before = %confirmed.count_before,
                        new_count = ?receipt.new_count,
                        gas_used = receipt.gas_used,
                        gas_price = confirmed.gas_price,
                        cost_eth = %format_ether(cost),
                        "increment confirmed"
                    );

                    if attempt < self.attempts {
                        let delay = self.pacing.after_success();
                        debug!(attempt, delay_ms = delay.as_millis() as u64, "pausing");
                        self.sleeper.sleep(delay).await;
                    }
                }
                Err(err) => {
                    stats.record_failure();
                    self.metrics.failures.increment(1);

                    let backoff = self.pacing.after_failure();
                    warn!(
                        attempt,
                        total = self.attempts,
                        error = %err,
                        backoff_ms = backoff.as_millis() as u64,
                        "increment attempt failed"
                    );
                    self.sleeper.sleep(backoff).await;
                }
            }
        }

        let (final_count, final_balance) = match self.closing_reads().await {
            Ok(values) => values,
            Err(err) => {
                error!(
                    error = %err,
                    succeeded = stats.succeeded,
                    failed = stats.failed,
                    total_gas_used = stats.total_gas_used,
                    "failed to read final state"
                );
                return Err(err.into());
            }
        };

        Ok(RunReport::new(
            chain_id,
            account,
            counter,
            self.attempts,
            &stats,
            final_count,
            final_balance,
        ))
    }

    async fn attempt(&self, attempt: u64) -> ClientResult<Confirmed> {
        let count_before = self.client.count().await?;
        let balance = self.client.balance().await?;
        self.record_balance(balance);
        debug!(
            attempt,
            count = %count_before,
            balance_eth = %format_ether(balance),
            "pre-submission state"
        );

        let quoted_gas_price = self.client.gas_price().await?;

        let submitted_at = Instant::now();
        let receipt = self.client.increment().await?;
        self.metrics.confirmation_duration.record(submitted_at.elapsed());

        let gas_price = match receipt.effective_gas_price {
            Some(price) => price,
            None => {
                debug!(attempt, quoted_gas_price, "receipt has no effective gas price");
                quoted_gas_price
            }
        };

        Ok(Confirmed { receipt, gas_price, count_before })
    }

    async fn closing_reads(&self) -> ClientResult<(U256, U256)> {
        let count = self.client.count().await?;
        let balance = self.client.balance().await?;
        self.record_balance(balance);
        Ok((count, balance))
    }

    fn record_balance(&self, balance: U256) {
        let gwei = u128::try_from(balance / U256::from(GWEI)).unwrap_or(u128::MAX);
        self.metrics.account_balance_gwei.set(gwei as f64);
    }
}

/// Validates `config`, connects to the endpoint, runs every attempt and prints the summary.
///
/// The summary is also written as JSON when [`RunnerConfig::output`] is set.
pub async fn run(config: RunnerConfig) -> Result<RunReport, RunnerError> {
    config.validate()?;

    let client = AlloyCounterClient::new(
        config.signer()?,
        config.endpoint()?,
        config.counter_address()?,
    )
    .with_confirmations(config.confirmations)
    .with_tx_timeout(config.tx_timeout);

    let report = Runner::new(client, TokioSleeper, config.pacing(), config.attempts).run().await?;

    println!("{report}");

    if let Some(path) = config.output.as_deref() {
        report.save(path)?;
        info!(path = %path.display(), "report written");
    }

    Ok(report)
}
