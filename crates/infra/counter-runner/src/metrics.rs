use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// Runner metrics. Only exported when a recorder is installed by the binary.
#[derive(Metrics, Clone)]
#[metrics(scope = "counter_runner")]
pub struct RunnerMetrics {
    #[metric(describe = "Count of increment attempts issued")]
    pub attempts: Counter,

    #[metric(describe = "Count of increment transactions confirmed")]
    pub successes: Counter,

    #[metric(describe = "Count of attempts that failed at any step")]
    pub failures: Counter,

    #[metric(describe = "Gas used per confirmed increment transaction")]
    pub gas_used: Histogram,

    #[metric(describe = "Time from submission to confirmed receipt")]
    pub confirmation_duration: Histogram,

    #[metric(describe = "Balance of the signing account in gwei")]
    pub account_balance_gwei: Gauge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder() {
        let metrics = RunnerMetrics::default();
        metrics.attempts.increment(1);
        metrics.gas_used.record(21_000.0);
        metrics.account_balance_gwei.set(1.0);
        assert!(format!("{metrics:?}").contains("RunnerMetrics"));
    }
}
