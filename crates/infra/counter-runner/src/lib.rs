#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod client;
pub use client::{AlloyCounterClient, ClientResult, CounterClient, IncrementReceipt};

mod config;
pub use config::{DEFAULT_RPC_URL, RunnerConfig};

mod contract;
pub use contract::ICounter;

mod error;
pub use error::{ClientError, ConfigError, RunnerError};

mod metrics;
pub use self::metrics::RunnerMetrics;

mod pacing;
pub use pacing::{Jitter, Pacing, Sleeper, TokioSleeper};

mod report;
pub use report::RunReport;

mod runner;
pub use runner::{Runner, run};

mod stats;
pub use stats::RunStatistics;
