//! Counter runner binary entry point.

mod cli;

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use cli::{Args, LogFormat};
use counter_runner::RunnerConfig;
use dotenvy::dotenv;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{Level, error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: Level, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().with_ansi(false).try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("failed to install prometheus exporter")?;
    info!(%addr, "serving metrics");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if cli::is_informational(e.kind()) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(args.log_level, args.log_format) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    if let Some(port) = args.metrics_port {
        if let Err(e) = init_metrics(port) {
            error!(error = ?e, "error starting metrics server");
            std::process::exit(1);
        }
    }

    let config = RunnerConfig::from(args);
    match counter_runner::run(config).await {
        Ok(report) => {
            info!(
                succeeded = report.succeeded,
                failed = report.failed,
                total_gas_used = report.total_gas_used,
                "finished increment run"
            );
        }
        Err(e) => {
            error!(error = %e, "error running counter runner");
            std::process::exit(1);
        }
    }
}
