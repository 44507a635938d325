//! Statistics accumulated over a run.

use alloy_primitives::U256;
use serde::Serialize;

/// Outcome counters and gas totals for a run.
///
/// Owned by the run loop; `succeeded + failed == attempted` holds after every recorded attempt,
/// and the gas totals only move on a success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Attempts issued so far.
    pub attempted: u64,
    /// Attempts whose transaction was confirmed.
    pub succeeded: u64,
    /// Attempts that failed at any step.
    pub failed: u64,
    /// Sum of gas used by confirmed transactions.
    pub total_gas_used: u128,
    /// Sum of `gas_used * gas_price` over confirmed transactions, in wei.
    pub total_gas_cost: U256,
    /// Counter value observed before the first attempt.
    pub initial_count: U256,
    /// Account balance observed before the first attempt, in wei.
    pub initial_balance: U256,
}

impl RunStatistics {
    /// Creates an empty accumulator anchored at the starting counter value and balance.
    pub fn new(initial_count: U256, initial_balance: U256) -> Self {
        Self { initial_count, initial_balance, ..Default::default() }
    }

    /// Records a confirmed transaction and returns its cost in wei.
    pub fn record_success(&mut self, gas_used: u64, gas_price: u128) -> U256 {
        let cost = U256::from(gas_used) * U256::from(gas_price);
        self.attempted += 1;
        self.succeeded += 1;
        self.total_gas_used += u128::from(gas_used);
        self.total_gas_cost = self.total_gas_cost.saturating_add(cost);
        cost
    }

    /// Records a failed attempt.
    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    /// Fraction of `planned` attempts that succeeded, in `[0.0, 1.0]`.
    pub fn success_rate(&self, planned: u64) -> f64 {
        if planned == 0 {
            return 0.0;
        }
        self.succeeded as f64 / planned as f64
    }

    /// Average gas per confirmed transaction, zero when nothing succeeded.
    pub fn average_gas_used(&self) -> u128 {
        if self.succeeded == 0 {
            return 0;
        }
        self.total_gas_used / u128::from(self.succeeded)
    }

    /// Average cost per confirmed transaction in wei, zero when nothing succeeded.
    pub fn average_gas_cost(&self) -> U256 {
        if self.succeeded == 0 {
            return U256::ZERO;
        }
        self.total_gas_cost / U256::from(self.succeeded)
    }
}
