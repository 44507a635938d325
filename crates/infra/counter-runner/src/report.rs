//! End-of-run summary.

use std::{fmt, fs, path::Path};

use alloy_primitives::{
    Address, U256,
    utils::{format_ether, format_units},
};
use serde::{Serialize, Serializer};

use crate::{RunStatistics, RunnerError};

/// Summary emitted once all attempts have been made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Chain the run was executed against.
    pub chain_id: u64,
    /// Signing account.
    pub account: Address,
    /// Counter contract.
    pub counter: Address,
    /// Attempts requested.
    pub planned_attempts: u64,
    /// Counter value before the first attempt.
    #[serde(serialize_with = "decimal")]
    pub initial_count: U256,
    /// Counter value after the last attempt.
    #[serde(serialize_with = "decimal")]
    pub final_count: U256,
    /// `final_count - initial_count`, zero if the counter went backwards.
    #[serde(serialize_with = "decimal")]
    pub count_delta: U256,
    /// Confirmed transactions.
    pub succeeded: u64,
    /// Failed attempts.
    pub failed: u64,
    /// `succeeded / planned_attempts`.
    pub success_rate: f64,
    /// Gas used by confirmed transactions.
    pub total_gas_used: u128,
    /// Wei spent on gas by confirmed transactions.
    #[serde(serialize_with = "decimal")]
    pub total_gas_cost: U256,
    /// Average gas per confirmed transaction.
    pub average_gas_used: u128,
    /// Average wei per confirmed transaction.
    #[serde(serialize_with = "decimal")]
    pub average_gas_cost: U256,
    /// Balance before the first attempt, in wei.
    #[serde(serialize_with = "decimal")]
    pub initial_balance: U256,
    /// Balance after the last attempt, in wei.
    #[serde(serialize_with = "decimal")]
    pub final_balance: U256,
    /// `initial_balance - final_balance`, zero if the balance grew.
    #[serde(serialize_with = "decimal")]
    pub total_spent: U256,
}

impl RunReport {
    /// Builds the report from the accumulated statistics and the closing reads.
    pub fn new(
        chain_id: u64,
        account: Address,
        counter: Address,
        planned_attempts: u64,
        stats: &RunStatistics,
        final_count: U256,
        final_balance: U256,
    ) -> Self {
        Self {
            chain_id,
            account,
            counter,
            planned_attempts,
            initial_count: stats.initial_count,
            final_count,
            count_delta: final_count.saturating_sub(stats.initial_count),
            succeeded: stats.succeeded,
            failed: stats.failed,
            success_rate: stats.success_rate(planned_attempts),
            total_gas_used: stats.total_gas_used,
            total_gas_cost: stats.total_gas_cost,
            average_gas_used: stats.average_gas_used(),
            average_gas_cost: stats.average_gas_cost(),
            initial_balance: stats.initial_balance,
            final_balance,
            total_spent: stats.initial_balance.saturating_sub(final_balance),
        }
    }

    /// Writes the report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), RunnerError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| RunnerError::Report(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| RunnerError::Report(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

/// Writes a `U256` as a base-10 string, matching the printed summary.
fn decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn gwei(wei: U256) -> String {
    format_units(wei, "gwei").unwrap_or_else(|_| wei.to_string())
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== Counter Run Summary ==========")?;
        writeln!(f, "Chain ID:            {}", self.chain_id)?;
        writeln!(f, "Account:             {}", self.account)?;
        writeln!(f, "Counter:             {}", self.counter)?;
        writeln!(f)?;
        writeln!(f, "Initial count:       {}", self.initial_count)?;
        writeln!(f, "Final count:         {}", self.final_count)?;
        writeln!(f, "Count increase:      {}", self.count_delta)?;
        writeln!(f)?;
        writeln!(f, "Successful txs:      {}/{}", self.succeeded, self.planned_attempts)?;
        writeln!(f, "Failed txs:          {}", self.failed)?;
        writeln!(f, "Success rate:        {:.2}%", self.success_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Total gas used:      {}", self.total_gas_used)?;
        writeln!(f, "Total gas cost:      {} ETH", format_ether(self.total_gas_cost))?;
        writeln!(f, "Average gas per tx:  {}", self.average_gas_used)?;
        writeln!(
            f,
            "Average cost per tx: {} ETH ({} gwei)",
            format_ether(self.average_gas_cost),
            gwei(self.average_gas_cost)
        )?;
        writeln!(f)?;
        writeln!(f, "Initial balance:     {} ETH", format_ether(self.initial_balance))?;
        writeln!(f, "Final balance:       {} ETH", format_ether(self.final_balance))?;
        writeln!(f, "Total spent:         {} ETH", format_ether(self.total_spent))?;
        write!(f, "=========================================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stats: &RunStatistics, planned: u64, final_count: u64, final_balance: u64) -> RunReport {
        RunReport::new(
            11_155_111,
            Address::repeat_byte(0xaa),
            Address::repeat_byte(0xbb),
            planned,
            stats,
            U256::from(final_count),
            U256::from(final_balance),
        )
    }

    #[test]
    fn test_all_successful() {
        let mut stats = RunStatistics::new(U256::from(10), U256::from(1_000_000));
        for _ in 0..3 {
            stats.record_success(21_000, 1);
        }
        let report = report(&stats, 3, 13, 937_000);

        assert_eq!(report.count_delta, U256::from(3));
        assert_eq!(report.total_gas_used, 63_000);
        assert_eq!(report.average_gas_used, 21_000);
        assert_eq!(report.total_spent, U256::from(63_000));

        let rendered = report.to_string();
        assert!(rendered.contains("Success rate:        100.00%"));
        assert!(rendered.contains("Successful txs:      3/3"));
        assert!(rendered.contains("Average gas per tx:  21000"));
    }

    #[test]
    fn test_partial_failure_rate() {
        let mut stats = RunStatistics::new(U256::ZERO, U256::from(100_000));
        stats.record_success(21_000, 1);
        stats.record_failure();
        stats.record_success(21_000, 1);
        let rendered = report(&stats, 3, 2, 58_000).to_string();
        assert!(rendered.contains("Success rate:        66.67%"));
        assert!(rendered.contains("Failed txs:          1"));
    }

    #[test]
    fn test_no_successes() {
        let mut stats = RunStatistics::new(U256::from(4), U256::from(50));
        stats.record_failure();
        let report = report(&stats, 1, 4, 50);
        assert_eq!(report.average_gas_used, 0);
        assert_eq!(report.average_gas_cost, U256::ZERO);
        assert_eq!(report.count_delta, U256::ZERO);
        assert!(report.to_string().contains("Success rate:        0.00%"));
    }

    #[test]
    fn test_balance_increase_reports_zero_spent() {
        let stats = RunStatistics::new(U256::ZERO, U256::from(10));
        assert_eq!(report(&stats, 0, 0, 20).total_spent, U256::ZERO);
    }

    #[test]
    fn test_save_writes_json() {
        let mut stats = RunStatistics::new(U256::from(1), U256::from(100_000));
        stats.record_success(21_000, 2);
        let report = report(&stats, 1, 2, 58_000);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["total_gas_used"], 21_000);
        assert_eq!(value["chain_id"], 11_155_111);
        assert_eq!(value["total_gas_cost"], "42000");
        assert_eq!(value["initial_balance"], "100000");
        assert_eq!(value["final_balance"], "58000");
        assert_eq!(value["total_spent"], "42000");
        assert_eq!(value["count_delta"], "1");
    }
}
