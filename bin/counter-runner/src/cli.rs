//! CLI definition for the counter-runner binary.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum, error::ErrorKind};
use counter_runner::RunnerConfig;
use tracing::Level;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Sends sequential `increment()` transactions to a Counter contract and reports gas usage.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Hex-encoded private key of the sending account.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub(crate) private_key: Option<String>,

    /// JSON-RPC endpoint of the target network [default: https://rpc.sepolia.org]
    #[arg(long, env = "SEPOLIA_RPC_URL")]
    pub(crate) rpc_url: Option<String>,

    /// Address of the deployed Counter contract.
    #[arg(long, env = "COUNTER_ADDRESS")]
    pub(crate) counter_address: Option<String>,

    /// Number of increment attempts.
    #[arg(long, env = "RUNNER_ATTEMPTS", default_value_t = 50)]
    pub(crate) attempts: u64,

    /// Minimum pause after a successful attempt, in milliseconds.
    #[arg(long, env = "RUNNER_MIN_DELAY_MS", default_value_t = 1_000)]
    pub(crate) min_delay_ms: u64,

    /// Maximum pause after a successful attempt, in milliseconds.
    #[arg(long, env = "RUNNER_MAX_DELAY_MS", default_value_t = 3_000)]
    pub(crate) max_delay_ms: u64,

    /// Pause after a failed attempt, in milliseconds.
    #[arg(long, env = "RUNNER_RETRY_BACKOFF_MS", default_value_t = 5_000)]
    pub(crate) retry_backoff_ms: u64,

    /// Give up waiting for a receipt after this many seconds. Waits indefinitely when unset.
    ///
    /// A timed-out attempt counts as failed, but its transaction is not cancelled. Before the
    /// next attempt the runner waits until the account has no pending transactions left.
    #[arg(long, env = "RUNNER_TX_TIMEOUT_SECS")]
    pub(crate) tx_timeout_secs: Option<u64>,

    /// Block confirmations required before a transaction counts as confirmed.
    #[arg(long, env = "RUNNER_CONFIRMATIONS", default_value_t = 1)]
    pub(crate) confirmations: u64,

    /// Seed for the pause generator.
    #[arg(long, env = "RUNNER_SEED")]
    pub(crate) seed: Option<u64>,

    /// Also write the summary as JSON to this file.
    #[arg(long, env = "RUNNER_OUTPUT")]
    pub(crate) output: Option<PathBuf>,

    /// Serve Prometheus metrics on this port.
    #[arg(long, env = "RUNNER_METRICS_PORT")]
    pub(crate) metrics_port: Option<u16>,

    /// Log level.
    #[arg(long, env = "LOG_LEVEL", default_value_t = Level::INFO)]
    pub(crate) log_level: Level,

    /// Log format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub(crate) log_format: LogFormat,
}

/// Whether a parse error is `--help` or `--version` output rather than a bad argument.
pub(crate) const fn is_informational(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

impl From<Args> for RunnerConfig {
    fn from(args: Args) -> Self {
        Self {
            private_key: args.private_key,
            rpc_url: args.rpc_url,
            counter_address: args.counter_address,
            attempts: args.attempts,
            min_delay: Duration::from_millis(args.min_delay_ms),
            max_delay: Duration::from_millis(args.max_delay_ms),
            retry_backoff: Duration::from_millis(args.retry_backoff_ms),
            tx_timeout: args.tx_timeout_secs.map(Duration::from_secs),
            confirmations: args.confirmations,
            seed: args.seed,
            output: args.output,
        }
    }
}
